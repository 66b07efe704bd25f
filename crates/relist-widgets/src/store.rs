#![forbid(unsafe_code)]

//! Item store: the committed order.
//!
//! The committed sequence is an immutable `Arc<[Item]>` tagged with a
//! generation number. It is never edited in place; a commit builds a new
//! sequence and swaps it in as a whole, so anyone holding the previous `Arc`
//! keeps a consistent snapshot and a changed generation always means a new
//! sequence.
//!
//! # Reorder rule
//!
//! [`reorder`] removes the item at `source` and reinserts it at `target`,
//! where `target` indexes the shortened sequence:
//!
//! ```
//! use relist_widgets::item::Item;
//! use relist_widgets::store::reorder;
//!
//! let items: Vec<Item> = ["a", "b", "c", "d"]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, l)| Item::new(i as u64, *l))
//!     .collect();
//! let moved = reorder(&items, 0, 2).unwrap();
//! let labels: Vec<&str> = moved.iter().map(|i| i.label()).collect();
//! assert_eq!(labels, ["b", "c", "a", "d"]);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use relist_runtime::{Signal, Subscription};

use crate::error::ReorderError;
use crate::item::Item;

/// Move the item at `source` to `target` (post-removal indexing).
///
/// Returns an equal copy when `source == target`.
///
/// # Errors
///
/// [`ReorderError::IndexOutOfRange`] if either index is outside `[0, len-1]`.
pub fn reorder(items: &[Item], source: usize, target: usize) -> Result<Vec<Item>, ReorderError> {
    let len = items.len();
    for index in [source, target] {
        if index >= len {
            return Err(ReorderError::IndexOutOfRange { index, len });
        }
    }
    let mut out = items.to_vec();
    if source != target {
        let moved = out.remove(source);
        out.insert(target, moved);
    }
    Ok(out)
}

fn check_unique(items: &[Item]) -> Result<(), ReorderError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id()) {
            return Err(ReorderError::DuplicateId(item.id()));
        }
    }
    Ok(())
}

/// One committed sequence and its generation.
#[derive(Debug, Clone)]
pub struct Committed {
    generation: u64,
    items: Arc<[Item]>,
}

impl Committed {
    /// Monotonic commit counter; 0 for the initial sequence.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The committed items.
    #[must_use]
    pub fn items(&self) -> &Arc<[Item]> {
        &self.items
    }

    /// Item ids in order.
    #[must_use]
    pub fn ids(&self) -> Vec<u64> {
        self.items.iter().map(|i| i.id().get()).collect()
    }
}

/// Owner of the committed order.
///
/// Host code subscribes to commits with [`ItemStore::subscribe`]; every
/// commit notifies, including one that leaves the order unchanged.
#[derive(Debug, Clone)]
pub struct ItemStore {
    committed: Signal<Committed>,
}

impl ItemStore {
    /// Create a store.
    ///
    /// # Errors
    ///
    /// [`ReorderError::DuplicateId`] if two items share an id.
    pub fn new(items: impl IntoIterator<Item = Item>) -> Result<Self, ReorderError> {
        let items: Vec<Item> = items.into_iter().collect();
        check_unique(&items)?;
        Ok(Self {
            committed: Signal::new(Committed {
                generation: 0,
                items: Arc::from(items),
            }),
        })
    }

    /// Current committed order.
    #[must_use]
    pub fn get_all(&self) -> Arc<[Item]> {
        self.committed.with(|c| Arc::clone(&c.items))
    }

    /// Current committed order with its generation.
    #[must_use]
    pub fn snapshot(&self) -> Committed {
        self.committed.get()
    }

    /// Generation of the current committed order.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.committed.with(|c| c.generation)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.committed.with(|c| c.items.len())
    }

    /// Whether the store holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at `index` in committed order.
    ///
    /// # Errors
    ///
    /// [`ReorderError::IndexOutOfRange`] if `index >= len`.
    pub fn get(&self, index: usize) -> Result<Item, ReorderError> {
        self.committed.with(|c| {
            c.items
                .get(index)
                .cloned()
                .ok_or(ReorderError::IndexOutOfRange {
                    index,
                    len: c.items.len(),
                })
        })
    }

    /// Compute the committed order with one item moved, without committing.
    ///
    /// # Errors
    ///
    /// See [`reorder`].
    pub fn reorder(&self, source: usize, target: usize) -> Result<Vec<Item>, ReorderError> {
        self.committed.with(|c| reorder(&c.items, source, target))
    }

    /// Move one item and commit the result.
    ///
    /// # Errors
    ///
    /// See [`reorder`]. Nothing is committed on error.
    pub fn commit_move(&self, source: usize, target: usize) -> Result<Committed, ReorderError> {
        let next = self.reorder(source, target)?;
        Ok(self.swap_in(next))
    }

    /// Commit a whole new sequence, for example when the host reloads its
    /// collection. Readers see either the previous or the new sequence.
    ///
    /// # Errors
    ///
    /// [`ReorderError::DuplicateId`] if two items share an id; the store is
    /// left unchanged.
    pub fn commit(&self, items: impl IntoIterator<Item = Item>) -> Result<Committed, ReorderError> {
        let items: Vec<Item> = items.into_iter().collect();
        check_unique(&items)?;
        Ok(self.swap_in(items))
    }

    /// Subscribe to commits.
    pub fn subscribe(&self, callback: impl Fn(&Committed) + 'static) -> Subscription {
        self.committed.subscribe(callback)
    }

    fn swap_in(&self, items: Vec<Item>) -> Committed {
        let next = Committed {
            generation: self.generation() + 1,
            items: Arc::from(items),
        };
        let _span = tracing::info_span!(
            "relist.commit",
            generation = next.generation,
            len = next.items.len()
        )
        .entered();
        self.committed.replace(next.clone());
        next
    }
}
