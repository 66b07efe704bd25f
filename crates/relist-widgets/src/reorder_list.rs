#![forbid(unsafe_code)]

//! The reorderable list component.
//!
//! [`ReorderList`] wires the item store, gesture tracker, preview projector,
//! announcer and focus controller together behind a single entry point,
//! [`ReorderList::handle_event`]. Each call runs inside a
//! [`HandlerTurn`], so host subscribers see at most one commit notification
//! per event and only after every piece of state has been updated.
//!
//! # Example
//!
//! ```
//! use relist_core::event::{KeyCode, RowEvent};
//! use relist_widgets::item::Item;
//! use relist_widgets::reorder_list::{EventResult, ReorderList};
//!
//! let items = ["Go running.", "Do laundry.", "Write report."]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, l)| Item::new(i as u64, *l));
//! let mut list = ReorderList::new(items).unwrap();
//!
//! list.handle_event(RowEvent::key(KeyCode::SPACE));
//! assert_eq!(list.handle_event(RowEvent::key(KeyCode::Down)), EventResult::Consumed);
//! list.handle_event(RowEvent::key(KeyCode::SPACE));
//!
//! let labels: Vec<String> = list.committed().iter().map(|i| i.label().to_owned()).collect();
//! assert_eq!(labels, ["Do laundry.", "Go running.", "Write report."]);
//! assert_eq!(list.cursor(), 1);
//! ```

use std::sync::Arc;

use relist_core::event::{KeyEvent, RowEvent};
use relist_core::keymap::{KeyAction, ReorderKeymap};
use relist_core::logging::{debug, error};
use relist_runtime::{HandlerTurn, RenderRequest, Subscription};

use crate::announce::{Announcement, Announcer, operation_hint};
use crate::error::{InvalidTransition, ReorderError};
use crate::focus::{FocusController, FocusReason, FocusRequest};
use crate::gesture::{GestureMode, GestureState, GestureTracker, Step, Transition};
use crate::item::Item;
use crate::projector::PreviewProjector;
use crate::store::{Committed, ItemStore};
use crate::view::{RowView, build_rows, render_line};

/// Whether the component handled an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The event was handled; the host should not act on it.
    Consumed,
    /// The event was not for this component.
    Ignored,
}

impl EventResult {
    #[must_use]
    pub fn is_consumed(self) -> bool {
        self == Self::Consumed
    }
}

enum Outcome {
    Applied(Transition),
    Navigated,
    Unbound,
    Invalid(InvalidTransition),
}

impl From<Result<Transition, InvalidTransition>> for Outcome {
    fn from(result: Result<Transition, InvalidTransition>) -> Self {
        match result {
            Ok(t) => Self::Applied(t),
            Err(e) => Self::Invalid(e),
        }
    }
}

/// Accessible reorderable list.
#[derive(Debug)]
pub struct ReorderList {
    store: ItemStore,
    tracker: GestureTracker,
    projector: PreviewProjector,
    announcer: Announcer,
    focus: FocusController,
    cursor: usize,
    keymap: ReorderKeymap,
    render: RenderRequest,
}

impl ReorderList {
    /// Create a list with the default keymap.
    ///
    /// # Errors
    ///
    /// [`ReorderError::DuplicateId`] if two items share an id.
    pub fn new(items: impl IntoIterator<Item = Item>) -> Result<Self, ReorderError> {
        Self::with_keymap(items, ReorderKeymap::default())
    }

    /// Create a list with a custom keymap. Conflicting bindings are repaired
    /// with [`ReorderKeymap::validated`].
    ///
    /// # Errors
    ///
    /// [`ReorderError::DuplicateId`] if two items share an id.
    pub fn with_keymap(
        items: impl IntoIterator<Item = Item>,
        keymap: ReorderKeymap,
    ) -> Result<Self, ReorderError> {
        let mut render = RenderRequest::default();
        render.request();
        Ok(Self {
            store: ItemStore::new(items)?,
            tracker: GestureTracker::new(),
            projector: PreviewProjector::new(),
            announcer: Announcer::new(),
            focus: FocusController::new(),
            cursor: 0,
            keymap: keymap.validated(),
            render,
        })
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Apply one view-layer event.
    ///
    /// Events that do not fit the current state are logged and reported as
    /// [`EventResult::Ignored`]; they never change state.
    pub fn handle_event(&mut self, event: RowEvent) -> EventResult {
        let _turn = HandlerTurn::begin("relist.handle_event");
        let name = event.as_str();
        let action = match &event {
            RowEvent::Key(key) => self.keymap.resolve(key).map_or("none", KeyAction::as_str),
            _ => "none",
        };
        let len = self.store.len();

        let outcome: Outcome = match event {
            RowEvent::DragStart { index } => {
                let items = self.store.get_all();
                self.tracker.start_drag(&items, index).into()
            }
            RowEvent::DragOver {
                index,
                offset,
                row_height,
            } => self.tracker.drag_over(len, index, offset, row_height).into(),
            RowEvent::Drop { payload } => self.tracker.drop_drag(payload.as_deref()).into(),
            RowEvent::DragEnd => self.tracker.end_drag().into(),
            RowEvent::Key(key) => self.handle_key(&key),
        };

        match outcome {
            Outcome::Applied(transition) => {
                let snapshot = self.tracker.state().snapshot();
                debug!(
                    message = "relist.transition",
                    event = name,
                    action,
                    kind = transition.kind(),
                    mode = snapshot.mode.as_str(),
                    source = snapshot.source,
                    target = snapshot.target,
                    len
                );
                self.apply(transition);
                EventResult::Consumed
            }
            Outcome::Navigated => {
                debug!(
                    message = "relist.transition",
                    event = name,
                    action,
                    kind = "navigated",
                    cursor = self.cursor,
                    len
                );
                EventResult::Consumed
            }
            Outcome::Unbound => EventResult::Ignored,
            Outcome::Invalid(err) => {
                debug!(
                    message = "relist.ignored",
                    event = name,
                    reason = err.as_str(),
                    error = %err,
                    mode = self.tracker.mode().as_str()
                );
                EventResult::Ignored
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Outcome {
        let Some(action) = self.keymap.resolve(key) else {
            return Outcome::Unbound;
        };
        let len = self.store.len();
        match (action, self.tracker.mode()) {
            (KeyAction::ToggleGrab, GestureMode::KeyboardDrag) => self.tracker.drop_grab().into(),
            (KeyAction::ToggleGrab, _) => {
                let items = self.store.get_all();
                self.tracker.grab(&items, self.cursor).into()
            }
            (KeyAction::Cancel, _) => self.tracker.cancel().into(),
            (KeyAction::MoveUp, GestureMode::Idle) => self.navigate(Step::Up, len),
            (KeyAction::MoveDown, GestureMode::Idle) => self.navigate(Step::Down, len),
            (KeyAction::MoveUp, _) => self.tracker.step(len, Step::Up).into(),
            (KeyAction::MoveDown, _) => self.tracker.step(len, Step::Down).into(),
        }
    }

    fn navigate(&mut self, step: Step, len: usize) -> Outcome {
        if len == 0 {
            return Outcome::Invalid(InvalidTransition::StaleIndex {
                index: self.cursor,
                len,
            });
        }
        let last = len - 1;
        let wrap = self.keymap.wrap_navigation;
        let next = match step {
            Step::Up if self.cursor > 0 => self.cursor - 1,
            Step::Up if wrap => last,
            Step::Down if self.cursor < last => self.cursor + 1,
            Step::Down if wrap => 0,
            _ => return Outcome::Navigated,
        };
        if next != self.cursor {
            self.cursor = next;
            self.request_focus(next, FocusReason::Navigated);
            self.render.request();
        }
        Outcome::Navigated
    }

    fn apply(&mut self, transition: Transition) {
        let len = self.store.len();
        match transition {
            Transition::DragStarted { .. } => {}
            Transition::Grabbed { source, item } => {
                self.announce(&Announcement::Grabbed {
                    item,
                    target: source,
                    len,
                });
                self.request_focus(self.cursor, FocusReason::Grabbed);
            }
            Transition::Moved { mode, to, item, .. } => {
                self.announce(&Announcement::Moved {
                    item,
                    target: to,
                    len,
                });
                if mode == GestureMode::KeyboardDrag {
                    self.request_focus(to, FocusReason::Moved);
                }
            }
            Transition::Dropped {
                source,
                target,
                item,
                ..
            } => {
                if let Err(err) = self.store.commit_move(source, target) {
                    debug_assert!(false, "gesture produced an invalid move: {err}");
                    error!(message = "relist.commit.rejected", error = %err);
                    return;
                }
                self.cursor = target;
                self.announce(&Announcement::Dropped { item, target, len });
                self.request_focus(target, FocusReason::Dropped);
            }
            Transition::Cancelled { mode, item } => {
                self.announce(&Announcement::Cancelled { item });
                if mode == GestureMode::KeyboardDrag {
                    self.request_focus(self.cursor, FocusReason::Cancelled);
                }
            }
            Transition::Unchanged => return,
        }
        self.render.request();
    }

    fn announce(&mut self, announcement: &Announcement) {
        self.announcer.announce(announcement, &self.keymap);
    }

    fn request_focus(&mut self, index: usize, reason: FocusReason) {
        let id = self.preview().get(index).map(Item::id);
        if let Some(id) = id {
            self.focus.request(index, id, reason);
        }
    }

    // -----------------------------------------------------------------------
    // Host API
    // -----------------------------------------------------------------------

    /// The committed order.
    #[must_use]
    pub fn committed(&self) -> Arc<[Item]> {
        self.store.get_all()
    }

    /// The committed order with its generation.
    #[must_use]
    pub fn snapshot(&self) -> Committed {
        self.store.snapshot()
    }

    /// Subscribe to commits. Called once per committing event, after the
    /// event has been fully applied.
    pub fn subscribe(&self, callback: impl Fn(&Committed) + 'static) -> Subscription {
        self.store.subscribe(callback)
    }

    /// Replace the collection. Any gesture in progress is dropped without an
    /// announcement and the cursor is clamped to the new length.
    ///
    /// # Errors
    ///
    /// [`ReorderError::DuplicateId`]; nothing changes on error.
    pub fn set_items(&mut self, items: impl IntoIterator<Item = Item>) -> Result<(), ReorderError> {
        let _turn = HandlerTurn::begin("relist.set_items");
        let committed = self.store.commit(items)?;
        if self.tracker.mode().is_active() {
            debug!(
                message = "relist.gesture.reset",
                mode = self.tracker.mode().as_str()
            );
            self.tracker.reset();
        }
        self.cursor = self.cursor.min(committed.items().len().saturating_sub(1));
        self.render.request();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // View API
    // -----------------------------------------------------------------------

    /// The sequence to display.
    pub fn preview(&mut self) -> Arc<[Item]> {
        let committed = self.store.snapshot();
        self.projector.preview(&committed, self.tracker.state())
    }

    /// Rows to render.
    pub fn rows(&mut self) -> Vec<RowView> {
        let preview = self.preview();
        build_rows(&preview, self.tracker.state(), self.cursor)
    }

    /// One text line per row, each at most `width` columns wide.
    pub fn render_lines(&mut self, width: usize) -> Vec<String> {
        self.rows().iter().map(|row| render_line(row, width)).collect()
    }

    /// Current live-region text.
    #[must_use]
    pub fn announcement(&self) -> &str {
        self.announcer.text()
    }

    /// Number of announcements made so far.
    #[must_use]
    pub fn announcement_revision(&self) -> u64 {
        self.announcer.revision()
    }

    /// Description attached to every row.
    #[must_use]
    pub fn operation_hint(&self) -> String {
        operation_hint(&self.keymap)
    }

    /// Consume the pending focus request, if any.
    pub fn take_focus_request(&mut self) -> Option<FocusRequest> {
        self.focus.take()
    }

    /// Consume the pending render request. Returns `true` if a render is due.
    pub fn take_render_request(&mut self) -> bool {
        self.render.take()
    }

    /// Roving-tabindex anchor.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current gesture.
    #[must_use]
    pub fn gesture(&self) -> &GestureState {
        self.tracker.state()
    }

    /// Active keymap.
    #[must_use]
    pub fn keymap(&self) -> &ReorderKeymap {
        &self.keymap
    }

    /// How many times the preview was actually recomputed.
    #[must_use]
    pub fn projection_count(&self) -> u64 {
        self.projector.computations()
    }
}
