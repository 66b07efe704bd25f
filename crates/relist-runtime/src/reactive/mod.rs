#![forbid(unsafe_code)]

//! Change signals and handler turns.
//!
//! - [`Signal`]: shared, version-tracked value that notifies subscribers on
//!   every replacement.
//! - [`HandlerTurn`]: RAII scope for one input handler; defers signal
//!   notifications until the outermost turn ends.
//! - [`RenderRequest`]: coalescing "please re-render" flag.

pub mod signal;
pub mod turn;

pub use signal::{Signal, Subscription};
pub use turn::{HandlerTurn, RenderRequest};
