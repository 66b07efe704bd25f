#![forbid(unsafe_code)]

//! Accessible reorderable list.
//!
//! A single column of items that can be reordered by pointer drag-and-drop or
//! by an equivalent keyboard sequence (grab, move, drop or cancel), with
//! live-region announcements and a roving tab stop.
//!
//! - [`store`]: the committed order.
//! - [`gesture`]: the in-flight gesture state machine.
//! - [`projector`]: the preview order derived from both.
//! - [`announce`] and [`focus`]: screen-reader text and focus requests.
//! - [`reorder_list`]: the component that ties them together.

pub mod announce;
pub mod error;
pub mod focus;
pub mod gesture;
pub mod item;
pub mod projector;
pub mod reorder_list;
pub mod store;
pub mod view;

pub use error::{InvalidTransition, ReorderError};
pub use item::{Item, ItemId};
pub use reorder_list::{EventResult, ReorderList};
