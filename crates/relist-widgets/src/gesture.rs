#![forbid(unsafe_code)]

//! Gesture tracker: the reorder state machine.
//!
//! # State Machine
//!
//! ```text
//!              drag-start(i)                      grab key (cursor)
//!   ┌──────────────────────────┐   ┌──────┐   ┌──────────────────────────┐
//!   │                          ▼   │      │   ▼                          │
//!   │   ┌────────────────┐  drop / drag-end │  ┌─────────────────┐        │
//!   │   │ PointerDragging│─────────▶│ Idle │◀─│ KeyboardGrabbed │        │
//!   │   └────────────────┘          └──────┘  └─────────────────┘        │
//!   │     ▲   │ drag-over(j)                    ▲   │ up / down          │
//!   │     └───┘ (midpoint rule)                 └───┘ (±1, clamped)      │
//!   └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. A target index exists only while a gesture is active; [`GestureState`]
//!    makes any other combination unrepresentable.
//! 2. `source` never changes during a gesture; `target` is always a valid
//!    index into the committed sequence.
//! 3. Only one gesture is active at a time. Starting a second one fails with
//!    [`InvalidTransition::AlreadyActive`].
//! 4. The tracker never touches the item store. Finishing a gesture yields a
//!    [`Transition::Dropped`] describing the move; the caller commits it.
//!
//! # Failure Modes
//!
//! Every method returns `Err(InvalidTransition)` instead of changing state
//! when an event does not fit: stale row indices, events for the wrong
//! mode, mismatched or malformed drop payloads, unusable geometry.

use crate::error::InvalidTransition;
use crate::item::{Item, ItemId};

/// Interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureMode {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pointer drag-and-drop in progress.
    PointerDrag,
    /// Keyboard grab in progress.
    KeyboardDrag,
}

impl GestureMode {
    /// Returns true if a gesture is in progress.
    #[must_use]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PointerDrag => "pointer",
            Self::KeyboardDrag => "keyboard",
        }
    }
}

/// An in-progress move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveGesture {
    source: usize,
    target: usize,
    active_item: Item,
}

impl ActiveGesture {
    /// Committed index of the item being moved.
    #[must_use]
    pub fn source(&self) -> usize {
        self.source
    }

    /// Proposed drop position.
    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    /// The item being moved, captured at gesture start.
    #[must_use]
    pub fn active_item(&self) -> &Item {
        &self.active_item
    }
}

/// Gesture state as a single tagged variant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GestureState {
    /// No gesture.
    #[default]
    Idle,
    /// Pointer drag.
    PointerDragging(ActiveGesture),
    /// Keyboard grab.
    KeyboardGrabbed(ActiveGesture),
}

impl GestureState {
    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> GestureMode {
        match self {
            Self::Idle => GestureMode::Idle,
            Self::PointerDragging(_) => GestureMode::PointerDrag,
            Self::KeyboardGrabbed(_) => GestureMode::KeyboardDrag,
        }
    }

    /// The active gesture, if any.
    #[must_use]
    pub fn active(&self) -> Option<&ActiveGesture> {
        match self {
            Self::Idle => None,
            Self::PointerDragging(g) | Self::KeyboardGrabbed(g) => Some(g),
        }
    }

    /// Compact copy used as a memoization key.
    #[must_use]
    pub fn snapshot(&self) -> GestureSnapshot {
        match self.active() {
            None => GestureSnapshot::IDLE,
            Some(g) => GestureSnapshot {
                mode: self.mode(),
                source: g.source,
                target: g.target,
            },
        }
    }
}

/// Copyable summary of a [`GestureState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GestureSnapshot {
    /// Interaction mode.
    pub mode: GestureMode,
    /// Source index (0 when idle).
    pub source: usize,
    /// Target index (0 when idle).
    pub target: usize,
}

impl GestureSnapshot {
    /// Snapshot of the idle state.
    pub const IDLE: Self = Self {
        mode: GestureMode::Idle,
        source: 0,
        target: 0,
    };
}

/// Direction of a keyboard move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Toward index 0.
    Up,
    /// Toward the last index.
    Down,
}

/// Outcome of an accepted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A pointer drag began.
    DragStarted { source: usize, item: Item },
    /// An item was grabbed with the keyboard.
    Grabbed { source: usize, item: Item },
    /// The proposed position changed.
    Moved {
        mode: GestureMode,
        from: usize,
        to: usize,
        item: Item,
    },
    /// The gesture finished with a drop; the move must now be committed.
    Dropped {
        mode: GestureMode,
        source: usize,
        target: usize,
        item: Item,
    },
    /// The gesture was abandoned.
    Cancelled { mode: GestureMode, item: Item },
    /// The event was valid but changed nothing (e.g. moving past an end).
    Unchanged,
}

impl Transition {
    /// Stable short name used in log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DragStarted { .. } => "drag_started",
            Self::Grabbed { .. } => "grabbed",
            Self::Moved { .. } => "moved",
            Self::Dropped { .. } => "dropped",
            Self::Cancelled { .. } => "cancelled",
            Self::Unchanged => "unchanged",
        }
    }

    /// Whether the transition changed gesture state.
    #[must_use]
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Midpoint rule for a drag over row `index`.
///
/// Hovering the upper half of row `j > 0` proposes `j - 1` (dropping just
/// after the previous row); anywhere else proposes `j`. Each boundary between
/// rows therefore maps to exactly one index, which avoids flicker.
#[must_use]
pub fn midpoint_target(index: usize, offset: f32, row_height: f32) -> usize {
    if offset < row_height / 2.0 && index > 0 {
        index - 1
    } else {
        index
    }
}

/// The reorder state machine.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    state: GestureState,
}

impl GestureTracker {
    /// Create an idle tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Current mode.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> GestureMode {
        self.state.mode()
    }

    /// Id of the item being moved, if any.
    #[must_use]
    pub fn active_id(&self) -> Option<ItemId> {
        self.state.active().map(|g| g.active_item.id())
    }

    /// Drop any gesture without producing a transition.
    ///
    /// Used when the committed sequence is replaced underneath an
    /// in-flight gesture.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }

    fn ensure_idle(&self) -> Result<(), InvalidTransition> {
        match self.state.mode() {
            GestureMode::Idle => Ok(()),
            mode => Err(InvalidTransition::AlreadyActive {
                mode: mode.as_str(),
            }),
        }
    }

    fn capture(items: &[Item], index: usize) -> Result<ActiveGesture, InvalidTransition> {
        let item = items.get(index).ok_or(InvalidTransition::StaleIndex {
            index,
            len: items.len(),
        })?;
        Ok(ActiveGesture {
            source: index,
            target: index,
            active_item: item.clone(),
        })
    }

    /// `Idle → PointerDragging` on drag-start over row `index`.
    pub fn start_drag(
        &mut self,
        items: &[Item],
        index: usize,
    ) -> Result<Transition, InvalidTransition> {
        self.ensure_idle()?;
        let gesture = Self::capture(items, index)?;
        let transition = Transition::DragStarted {
            source: index,
            item: gesture.active_item.clone(),
        };
        self.state = GestureState::PointerDragging(gesture);
        Ok(transition)
    }

    /// `PointerDragging → PointerDragging` on drag-over row `index`.
    ///
    /// `len` is the length of the committed sequence.
    pub fn drag_over(
        &mut self,
        len: usize,
        index: usize,
        offset: f32,
        row_height: f32,
    ) -> Result<Transition, InvalidTransition> {
        let GestureState::PointerDragging(gesture) = &mut self.state else {
            return Err(InvalidTransition::NotDragging);
        };
        if index >= len {
            return Err(InvalidTransition::StaleIndex { index, len });
        }
        if !offset.is_finite() || !row_height.is_finite() || row_height <= 0.0 {
            return Err(InvalidTransition::BadGeometry { offset, row_height });
        }
        let to = midpoint_target(index, offset, row_height);
        if to == gesture.target {
            return Ok(Transition::Unchanged);
        }
        let from = std::mem::replace(&mut gesture.target, to);
        Ok(Transition::Moved {
            mode: GestureMode::PointerDrag,
            from,
            to,
            item: gesture.active_item.clone(),
        })
    }

    /// `PointerDragging → Idle` on drop.
    ///
    /// A payload, when present, must name the dragged item.
    pub fn drop_drag(&mut self, payload: Option<&str>) -> Result<Transition, InvalidTransition> {
        let GestureState::PointerDragging(gesture) = &self.state else {
            return Err(InvalidTransition::NotDragging);
        };
        if let Some(raw) = payload {
            let id = ItemId::parse_payload(raw)
                .ok_or_else(|| InvalidTransition::MalformedPayload(raw.to_owned()))?;
            let active = gesture.active_item.id();
            if id != active {
                return Err(InvalidTransition::PayloadMismatch {
                    payload: id,
                    active,
                });
            }
        }
        Ok(self.finish(GestureMode::PointerDrag))
    }

    /// `PointerDragging → Idle` on drag-end without a drop.
    ///
    /// A drag-end after a successful drop finds the tracker idle and is
    /// reported as [`Transition::Unchanged`].
    pub fn end_drag(&mut self) -> Result<Transition, InvalidTransition> {
        match self.state.mode() {
            GestureMode::PointerDrag => Ok(self.abandon()),
            GestureMode::Idle => Ok(Transition::Unchanged),
            GestureMode::KeyboardDrag => Err(InvalidTransition::NotDragging),
        }
    }

    /// `Idle → KeyboardGrabbed` on the grab key over the cursor row.
    pub fn grab(&mut self, items: &[Item], cursor: usize) -> Result<Transition, InvalidTransition> {
        self.ensure_idle()?;
        let gesture = Self::capture(items, cursor)?;
        let transition = Transition::Grabbed {
            source: cursor,
            item: gesture.active_item.clone(),
        };
        self.state = GestureState::KeyboardGrabbed(gesture);
        Ok(transition)
    }

    /// `KeyboardGrabbed → KeyboardGrabbed` on a move key.
    ///
    /// Moving past either end is a no-op.
    pub fn step(&mut self, len: usize, step: Step) -> Result<Transition, InvalidTransition> {
        let GestureState::KeyboardGrabbed(gesture) = &mut self.state else {
            return Err(InvalidTransition::NotGrabbed);
        };
        let from = gesture.target;
        let to = match step {
            Step::Up => from.checked_sub(1),
            Step::Down => from.checked_add(1).filter(|&t| t < len),
        };
        let Some(to) = to else {
            return Ok(Transition::Unchanged);
        };
        gesture.target = to;
        Ok(Transition::Moved {
            mode: GestureMode::KeyboardDrag,
            from,
            to,
            item: gesture.active_item.clone(),
        })
    }

    /// `KeyboardGrabbed → Idle` on the grab key (toggle).
    pub fn drop_grab(&mut self) -> Result<Transition, InvalidTransition> {
        match self.state.mode() {
            GestureMode::KeyboardDrag => Ok(self.finish(GestureMode::KeyboardDrag)),
            _ => Err(InvalidTransition::NotGrabbed),
        }
    }

    /// Any active gesture `→ Idle` on the cancel key.
    pub fn cancel(&mut self) -> Result<Transition, InvalidTransition> {
        if self.state.mode().is_active() {
            Ok(self.abandon())
        } else {
            Err(InvalidTransition::NothingToCancel)
        }
    }

    fn finish(&mut self, mode: GestureMode) -> Transition {
        match std::mem::take(&mut self.state) {
            GestureState::Idle => Transition::Unchanged,
            GestureState::PointerDragging(g) | GestureState::KeyboardGrabbed(g) => {
                Transition::Dropped {
                    mode,
                    source: g.source,
                    target: g.target,
                    item: g.active_item,
                }
            }
        }
    }

    fn abandon(&mut self) -> Transition {
        let mode = self.state.mode();
        match std::mem::take(&mut self.state) {
            GestureState::Idle => Transition::Unchanged,
            GestureState::PointerDragging(g) | GestureState::KeyboardGrabbed(g) => {
                Transition::Cancelled {
                    mode,
                    item: g.active_item,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: u64) -> Vec<Item> {
        (0..n).map(|i| Item::new(i, format!("task {i}"))).collect()
    }

    #[test]
    fn midpoint_rule() {
        assert_eq!(midpoint_target(3, 0.0, 10.0), 2);
        assert_eq!(midpoint_target(3, 4.99, 10.0), 2);
        assert_eq!(midpoint_target(3, 5.0, 10.0), 3);
        assert_eq!(midpoint_target(3, 9.0, 10.0), 3);
        assert_eq!(midpoint_target(0, 0.0, 10.0), 0);
    }

    #[test]
    fn drag_start_sets_source_and_target() {
        let list = items(5);
        let mut t = GestureTracker::new();
        let tr = t.start_drag(&list, 2).unwrap();
        assert_eq!(tr.kind(), "drag_started");
        let g = t.state().active().unwrap();
        assert_eq!((g.source(), g.target()), (2, 2));
        assert_eq!(g.active_item().id(), ItemId::new(2));
        assert_eq!(t.mode(), GestureMode::PointerDrag);
    }

    #[test]
    fn second_drag_start_is_rejected() {
        let list = items(3);
        let mut t = GestureTracker::new();
        t.start_drag(&list, 0).unwrap();
        assert_eq!(
            t.start_drag(&list, 1),
            Err(InvalidTransition::AlreadyActive { mode: "pointer" })
        );
        assert_eq!(t.state().active().unwrap().source(), 0);
    }

    #[test]
    fn drag_over_moves_target() {
        let list = items(5);
        let mut t = GestureTracker::new();
        t.start_drag(&list, 0).unwrap();
        let tr = t.drag_over(5, 3, 8.0, 10.0).unwrap();
        assert_eq!(
            tr,
            Transition::Moved {
                mode: GestureMode::PointerDrag,
                from: 0,
                to: 3,
                item: list[0].clone()
            }
        );
        // Upper half of row 3 resolves to 2.
        t.drag_over(5, 3, 1.0, 10.0).unwrap();
        assert_eq!(t.state().snapshot().target, 2);
        // Same resolved index again: unchanged.
        assert_eq!(t.drag_over(5, 2, 9.0, 10.0).unwrap(), Transition::Unchanged);
    }

    #[test]
    fn drag_over_rejects_stale_and_bad_input() {
        let list = items(3);
        let mut t = GestureTracker::new();
        assert_eq!(
            t.drag_over(3, 1, 0.0, 10.0),
            Err(InvalidTransition::NotDragging)
        );
        t.start_drag(&list, 1).unwrap();
        assert_eq!(
            t.drag_over(3, 3, 0.0, 10.0),
            Err(InvalidTransition::StaleIndex { index: 3, len: 3 })
        );
        assert!(matches!(
            t.drag_over(3, 0, f32::NAN, 10.0),
            Err(InvalidTransition::BadGeometry { .. })
        ));
        assert!(t.drag_over(3, 0, 1.0, 0.0).is_err());
        assert_eq!(t.state().snapshot().target, 1);
    }

    #[test]
    fn drop_checks_payload() {
        let list = items(4);
        let mut t = GestureTracker::new();
        t.start_drag(&list, 1).unwrap();
        t.drag_over(4, 3, 9.0, 10.0).unwrap();

        assert_eq!(
            t.drop_drag(Some("2")),
            Err(InvalidTransition::PayloadMismatch {
                payload: ItemId::new(2),
                active: ItemId::new(1)
            })
        );
        assert_eq!(
            t.drop_drag(Some("abc")),
            Err(InvalidTransition::MalformedPayload("abc".to_owned()))
        );
        assert_eq!(t.mode(), GestureMode::PointerDrag);

        let tr = t.drop_drag(Some("1")).unwrap();
        assert!(matches!(
            tr,
            Transition::Dropped {
                mode: GestureMode::PointerDrag,
                source: 1,
                target: 3,
                ..
            }
        ));
        assert_eq!(t.mode(), GestureMode::Idle);
    }

    #[test]
    fn drop_without_payload_is_accepted() {
        let list = items(2);
        let mut t = GestureTracker::new();
        t.start_drag(&list, 0).unwrap();
        assert!(matches!(t.drop_drag(None), Ok(Transition::Dropped { .. })));
    }

    #[test]
    fn drag_end_cancels_or_is_noop() {
        let list = items(2);
        let mut t = GestureTracker::new();
        t.start_drag(&list, 1).unwrap();
        assert!(matches!(
            t.end_drag(),
            Ok(Transition::Cancelled {
                mode: GestureMode::PointerDrag,
                ..
            })
        ));
        assert_eq!(t.end_drag(), Ok(Transition::Unchanged));
    }

    #[test]
    fn keyboard_steps_clamp() {
        let list = items(3);
        let mut t = GestureTracker::new();
        t.grab(&list, 0).unwrap();
        assert_eq!(t.step(3, Step::Up), Ok(Transition::Unchanged));
        assert!(t.step(3, Step::Down).unwrap().is_change());
        assert!(t.step(3, Step::Down).unwrap().is_change());
        assert_eq!(t.step(3, Step::Down), Ok(Transition::Unchanged));
        assert_eq!(t.state().snapshot().target, 2);
        assert_eq!(t.state().snapshot().source, 0);
    }

    #[test]
    fn keyboard_drop_and_cancel() {
        let list = items(3);
        let mut t = GestureTracker::new();
        assert_eq!(t.drop_grab(), Err(InvalidTransition::NotGrabbed));
        assert_eq!(t.cancel(), Err(InvalidTransition::NothingToCancel));

        t.grab(&list, 2).unwrap();
        t.step(3, Step::Up).unwrap();
        assert!(matches!(
            t.drop_grab(),
            Ok(Transition::Dropped {
                mode: GestureMode::KeyboardDrag,
                source: 2,
                target: 1,
                ..
            })
        ));

        t.grab(&list, 0).unwrap();
        assert!(matches!(t.cancel(), Ok(Transition::Cancelled { .. })));
        assert_eq!(t.mode(), GestureMode::Idle);
    }

    #[test]
    fn keyboard_and_pointer_are_exclusive() {
        let list = items(3);
        let mut t = GestureTracker::new();
        t.grab(&list, 1).unwrap();
        assert!(t.start_drag(&list, 0).is_err());
        assert_eq!(t.drop_drag(None), Err(InvalidTransition::NotDragging));
        assert_eq!(t.end_drag(), Err(InvalidTransition::NotDragging));
        assert_eq!(t.mode(), GestureMode::KeyboardDrag);
    }

    #[test]
    fn grab_on_empty_list_is_stale() {
        let mut t = GestureTracker::new();
        assert_eq!(
            t.grab(&[], 0),
            Err(InvalidTransition::StaleIndex { index: 0, len: 0 })
        );
    }

    #[test]
    fn idle_snapshot() {
        assert_eq!(GestureTracker::new().state().snapshot(), GestureSnapshot::IDLE);
    }
}
