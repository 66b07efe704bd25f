#![forbid(unsafe_code)]

//! List items.

use std::fmt;
use std::sync::Arc;

/// Stable identity of an item across reorderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl ItemId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Parse the textual form carried in drag transfer data.
    #[must_use]
    pub fn parse_payload(payload: &str) -> Option<Self> {
        payload.trim().parse::<u64>().ok().map(Self)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable list entry. Equal ids denote the same logical item.
///
/// Cloning is cheap: the label is reference-counted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    id: ItemId,
    label: Arc<str>,
}

impl Item {
    /// Create an item.
    #[must_use]
    pub fn new(id: u64, label: impl Into<Arc<str>>) -> Self {
        Self {
            id: ItemId(id),
            label: label.into(),
        }
    }

    /// The item's identity.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Display text.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_parsing() {
        assert_eq!(ItemId::parse_payload("17"), Some(ItemId::new(17)));
        assert_eq!(ItemId::parse_payload(" 3\n"), Some(ItemId::new(3)));
        assert_eq!(ItemId::parse_payload("NaN"), None);
        assert_eq!(ItemId::parse_payload("-1"), None);
        assert_eq!(ItemId::parse_payload(""), None);
    }

    #[test]
    fn clone_shares_label() {
        let a = Item::new(1, "Go running.");
        let b = a.clone();
        assert_eq!(a, b);
        assert!(std::ptr::eq(a.label(), b.label()));
    }
}
