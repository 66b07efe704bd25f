#![forbid(unsafe_code)]

//! Core: input events, key bindings, and logging for relist.
//!
//! # Role in relist
//! `relist-core` is the input layer. It owns the normalized row events that a
//! view adapter produces and the keymap that turns key presses into reorder
//! actions.
//!
//! # Primary responsibilities
//! - **RowEvent**: drag-start, drag-over, drop, drag-end, and key events.
//! - **ReorderKeymap**: grab/cancel/move bindings with env and TOML loading.
//! - **Logging**: tracing re-exports and an optional JSON subscriber.
//!
//! # How it fits in the system
//! `relist-widgets` consumes `RowEvent` values and drives the reorder state
//! machine. Nothing here depends on a particular rendering technology.

pub mod event;
pub mod keymap;
pub mod logging;
