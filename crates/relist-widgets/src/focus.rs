#![forbid(unsafe_code)]

//! One-shot focus requests.
//!
//! The component never moves focus itself. It records where focus should go
//! and the view adapter takes the request after rendering, so a request is
//! applied at most once and never re-applied on later renders.

use crate::item::ItemId;

/// Why focus is being moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusReason {
    /// A grabbed item moved to a new row.
    Moved,
    /// A keyboard grab started.
    Grabbed,
    /// A gesture ended with a drop.
    Dropped,
    /// A gesture was cancelled.
    Cancelled,
    /// The roving cursor moved while idle.
    Navigated,
}

/// Instruction to focus the row at `index`, which shows `item_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRequest {
    pub index: usize,
    pub item_id: ItemId,
    pub reason: FocusReason,
}

/// Holds at most one pending [`FocusRequest`].
#[derive(Debug, Clone, Default)]
pub struct FocusController {
    pending: Option<FocusRequest>,
}

impl FocusController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request, replacing any pending one.
    pub fn request(&mut self, index: usize, item_id: ItemId, reason: FocusReason) {
        self.pending = Some(FocusRequest {
            index,
            item_id,
            reason,
        });
    }

    /// Consume the pending request.
    pub fn take(&mut self) -> Option<FocusRequest> {
        self.pending.take()
    }

    /// Peek without consuming.
    #[must_use]
    pub fn pending(&self) -> Option<&FocusRequest> {
        self.pending.as_ref()
    }
}
