#![forbid(unsafe_code)]

//! Preview projection.
//!
//! The preview is the sequence the user sees while a gesture is in flight:
//! the committed order with the active item shown at its proposed position.
//! [`project`] is pure; [`PreviewProjector`] memoizes it on
//! `(committed generation, gesture snapshot)` so a render that changes
//! neither input reuses the previous result.

use std::sync::Arc;

use relist_runtime::Memo;
use tracing::debug_span;
use web_time::Instant;

use crate::gesture::{GestureSnapshot, GestureState};
use crate::item::Item;
use crate::store::{Committed, reorder};

/// Derive the displayed sequence.
///
/// - No gesture: `committed` itself (pointer-equal).
/// - `source == target`: a fresh copy.
/// - Otherwise: the committed order with the move applied.
#[must_use]
pub fn project(committed: &Arc<[Item]>, gesture: &GestureState) -> Arc<[Item]> {
    let Some(active) = gesture.active() else {
        return Arc::clone(committed);
    };
    match reorder(committed, active.source(), active.target()) {
        Ok(preview) => Arc::from(preview),
        Err(err) => {
            debug_assert!(false, "gesture indices outside committed sequence: {err}");
            tracing::error!(message = "relist.project.stale", error = %err);
            Arc::clone(committed)
        }
    }
}

/// Memoizing wrapper around [`project`].
#[derive(Debug, Default)]
pub struct PreviewProjector {
    memo: Memo<(u64, GestureSnapshot), Arc<[Item]>>,
}

impl PreviewProjector {
    /// Create a projector with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Displayed sequence for the given inputs, recomputed only when the
    /// committed generation or the gesture snapshot changed.
    pub fn preview(&mut self, committed: &Committed, gesture: &GestureState) -> Arc<[Item]> {
        let key = (committed.generation(), gesture.snapshot());
        self.memo.get_or_compute(key, || {
            let start = Instant::now();
            let span = debug_span!(
                "relist.project",
                generation = key.0,
                mode = key.1.mode.as_str(),
                len = committed.items().len(),
                duration_us = tracing::field::Empty
            );
            let _guard = span.enter();
            let out = project(committed.items(), gesture);
            span.record("duration_us", start.elapsed().as_micros() as u64);
            out
        })
    }

    /// How many times the projection actually ran.
    #[must_use]
    pub fn computations(&self) -> u64 {
        self.memo.computations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{GestureTracker, Step};
    use crate::store::ItemStore;

    fn store(n: u64) -> ItemStore {
        ItemStore::new((0..n).map(|i| Item::new(i, format!("row {i}")))).unwrap()
    }

    fn ids(items: &[Item]) -> Vec<u64> {
        items.iter().map(|i| i.id().get()).collect()
    }

    #[test]
    fn idle_projection_is_committed_arc() {
        let store = store(3);
        let committed = store.get_all();
        let out = project(&committed, &GestureState::Idle);
        assert!(Arc::ptr_eq(&out, &committed));
    }

    #[test]
    fn same_index_projection_is_fresh_copy() {
        let store = store(3);
        let committed = store.get_all();
        let mut t = GestureTracker::new();
        t.grab(&committed, 1).unwrap();
        let out = project(&committed, t.state());
        assert!(!Arc::ptr_eq(&out, &committed));
        assert_eq!(ids(&out), ids(&committed));
    }

    #[test]
    fn moved_projection_applies_reorder() {
        let store = store(4);
        let committed = store.get_all();
        let mut t = GestureTracker::new();
        t.grab(&committed, 0).unwrap();
        t.step(4, Step::Down).unwrap();
        t.step(4, Step::Down).unwrap();
        assert_eq!(ids(&project(&committed, t.state())), vec![1, 2, 0, 3]);
    }

    #[test]
    fn memo_recomputes_only_on_input_change() {
        let store = store(4);
        let mut projector = PreviewProjector::new();
        let mut t = GestureTracker::new();

        let first = projector.preview(&store.snapshot(), t.state());
        let again = projector.preview(&store.snapshot(), t.state());
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(projector.computations(), 1);

        t.grab(&store.get_all(), 1).unwrap();
        projector.preview(&store.snapshot(), t.state());
        assert_eq!(projector.computations(), 2);

        // A boundary no-op leaves the snapshot alone.
        t.step(4, Step::Down).unwrap();
        t.step(4, Step::Down).unwrap();
        t.step(4, Step::Down).unwrap();
        projector.preview(&store.snapshot(), t.state());
        projector.preview(&store.snapshot(), t.state());
        assert_eq!(projector.computations(), 3);

        t.reset();
        store.commit_move(0, 0).unwrap();
        projector.preview(&store.snapshot(), t.state());
        assert_eq!(projector.computations(), 4);
    }
}
