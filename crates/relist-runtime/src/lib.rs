#![forbid(unsafe_code)]

//! Runtime support for event-driven widgets.
//!
//! Everything here is single-threaded and synchronous: an input handler runs
//! inside a [`reactive::HandlerTurn`], state changes raise [`reactive::Signal`]
//! notifications that the turn defers until the handler is done, and derived
//! values are recomputed through a [`memo::Memo`] only when their inputs
//! changed.

pub mod memo;
pub mod reactive;

pub use memo::Memo;
pub use reactive::{HandlerTurn, RenderRequest, Signal, Subscription};
