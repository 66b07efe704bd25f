#![forbid(unsafe_code)]

//! Error taxonomy for the reorderable list.
//!
//! | Error | Raised by | Handling |
//! |-------|-----------|----------|
//! | [`ReorderError::IndexOutOfRange`] | pure reorder / read operations | caller bug; never produced by the state machine |
//! | [`ReorderError::DuplicateId`] | store construction and replacement | rejected input |
//! | [`InvalidTransition`] | gesture tracker | event ignored, state unchanged |
//!
//! `InvalidTransition` never leaves the component: `ReorderList::handle_event`
//! logs it and reports the event as ignored.

use crate::item::ItemId;

/// Errors from [`ItemStore`](crate::store::ItemStore) and the pure
/// [`reorder`](crate::store::reorder) function.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    /// An index outside `[0, len-1]` was passed to a reorder or read.
    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Two items share an id.
    #[error("duplicate item id {0}")]
    DuplicateId(ItemId),
}

/// Why an input event could not be applied to the current gesture state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidTransition {
    /// The event names a row that no longer exists.
    #[error("row {index} is stale (length {len})")]
    StaleIndex { index: usize, len: usize },

    /// A gesture is already in progress.
    #[error("a {mode} gesture is already active")]
    AlreadyActive { mode: &'static str },

    /// The event requires a pointer drag but none is active.
    #[error("no pointer drag is active")]
    NotDragging,

    /// The event requires a keyboard grab but none is active.
    #[error("no item is grabbed")]
    NotGrabbed,

    /// There is no gesture to cancel.
    #[error("no gesture to cancel")]
    NothingToCancel,

    /// The drop payload names a different item than the one being dragged.
    #[error("drop payload names item {payload}, dragging item {active}")]
    PayloadMismatch { payload: ItemId, active: ItemId },

    /// The drop payload is not an item id.
    #[error("malformed drop payload {0:?}")]
    MalformedPayload(String),

    /// Pointer geometry is not a usable number.
    #[error("unusable pointer geometry (offset {offset}, height {row_height})")]
    BadGeometry { offset: f32, row_height: f32 },
}

impl InvalidTransition {
    /// Stable short name used in log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StaleIndex { .. } => "stale_index",
            Self::AlreadyActive { .. } => "already_active",
            Self::NotDragging => "not_dragging",
            Self::NotGrabbed => "not_grabbed",
            Self::NothingToCancel => "nothing_to_cancel",
            Self::PayloadMismatch { .. } => "payload_mismatch",
            Self::MalformedPayload(_) => "malformed_payload",
            Self::BadGeometry { .. } => "bad_geometry",
        }
    }
}
