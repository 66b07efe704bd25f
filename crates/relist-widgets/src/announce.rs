#![forbid(unsafe_code)]

//! Live-region announcements.
//!
//! Each gesture transition that matters to a screen-reader user produces one
//! [`Announcement`]. The [`Announcer`] keeps only the latest text: a new
//! announcement overwrites the previous one, and a revision counter lets the
//! view adapter tell a repeated message apart from an unchanged one.
//!
//! Positions are 1-based; `of N` is the committed length.

use std::fmt::Write as _;

use relist_core::keymap::ReorderKeymap;

use crate::item::Item;

/// A message for the live region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    /// An item was picked up with the keyboard.
    Grabbed { item: Item, target: usize, len: usize },
    /// The proposed position changed.
    Moved { item: Item, target: usize, len: usize },
    /// The move was committed.
    Dropped { item: Item, target: usize, len: usize },
    /// The gesture was abandoned.
    Cancelled { item: Item },
}

impl Announcement {
    /// Render the message using key names from `keymap`.
    #[must_use]
    pub fn render(&self, keymap: &ReorderKeymap) -> String {
        let mut out = String::new();
        match self {
            Self::Grabbed { item, target, len } => {
                let _ = write!(
                    out,
                    "{}, grabbed. Current position in list: {} of {}. \
                     Press up and down arrow keys to change position, \
                     {} to drop, {} to cancel.",
                    item.label(),
                    target + 1,
                    len,
                    keymap.grab_key_name(),
                    keymap.cancel_key_name()
                );
            }
            Self::Moved { item, target, len } => {
                let _ = write!(
                    out,
                    "{}. Current position in list: {} of {}.",
                    item.label(),
                    target + 1,
                    len
                );
            }
            Self::Dropped { item, target, len } => {
                let _ = write!(
                    out,
                    "Item {}, dropped. Final position in list: {} of {}.",
                    item.label(),
                    target + 1,
                    len
                );
            }
            Self::Cancelled { item } => {
                let _ = write!(out, "{} reorder cancelled.", item.label());
            }
        }
        out
    }
}

/// Operation hint describing how to start a keyboard reorder.
#[must_use]
pub fn operation_hint(keymap: &ReorderKeymap) -> String {
    format!("Press {} to reorder", keymap.grab_key_name())
}

/// Holder of the current live-region text.
#[derive(Debug, Clone, Default)]
pub struct Announcer {
    text: String,
    revision: u64,
}

impl Announcer {
    /// Create an announcer with empty text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current text.
    pub fn announce(&mut self, announcement: &Announcement, keymap: &ReorderKeymap) {
        self.text = announcement.render(keymap);
        self.revision += 1;
    }

    /// The latest announcement, or `""` before the first one.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of announcements made so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
