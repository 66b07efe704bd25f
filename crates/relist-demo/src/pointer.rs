#![forbid(unsafe_code)]

//! Mouse to row-event translation.
//!
//! Each row occupies [`ROW_HEIGHT`] terminal lines so that the upper and
//! lower half of a row are distinguishable. A drag starts on the first
//! motion after a press, not on the press itself, so a plain click never
//! commits anything.

use relist_core::event::RowEvent;

/// Terminal lines per row.
pub const ROW_HEIGHT: u16 = 2;

/// Row geometry on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    /// First terminal line of row 0.
    pub top: u16,
    /// Number of rows.
    pub len: usize,
}

impl RowLayout {
    /// Row index under terminal line `y` and the line offset inside it.
    #[must_use]
    pub fn hit(&self, y: u16) -> Option<(usize, u16)> {
        let rel = y.checked_sub(self.top)?;
        let index = usize::from(rel / ROW_HEIGHT);
        (index < self.len).then_some((index, rel % ROW_HEIGHT))
    }

    /// First terminal line of row `index`.
    #[must_use]
    pub fn line_of(&self, index: usize) -> u16 {
        let index = u16::try_from(index).unwrap_or(u16::MAX);
        self.top.saturating_add(index.saturating_mul(ROW_HEIGHT))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Up,
    Pressed { index: usize },
    Dragging,
}

/// Mouse button state machine producing [`RowEvent`]s.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    phase: Phase,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self { phase: Phase::Up }
    }
}

impl PointerTracker {
    /// Left button pressed at line `y`.
    pub fn press(&mut self, layout: RowLayout, y: u16) -> Vec<RowEvent> {
        self.phase = match layout.hit(y) {
            Some((index, _)) => Phase::Pressed { index },
            None => Phase::Up,
        };
        Vec::new()
    }

    /// Pointer moved to line `y` with the left button held.
    pub fn drag(&mut self, layout: RowLayout, y: u16) -> Vec<RowEvent> {
        let mut out = Vec::new();
        match self.phase {
            Phase::Up => return out,
            Phase::Pressed { index } => {
                out.push(RowEvent::DragStart { index });
                self.phase = Phase::Dragging;
            }
            Phase::Dragging => {}
        }
        if let Some((index, line)) = layout.hit(y) {
            // Sample the middle of the terminal cell.
            let offset = f32::from(line) + 0.5;
            out.push(RowEvent::drag_over(index, offset, f32::from(ROW_HEIGHT)));
        }
        out
    }

    /// Left button released at line `y`; `payload` identifies the dragged item.
    pub fn release(&mut self, layout: RowLayout, y: u16, payload: Option<String>) -> Vec<RowEvent> {
        let phase = std::mem::replace(&mut self.phase, Phase::Up);
        if phase != Phase::Dragging {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(2);
        if layout.hit(y).is_some() {
            out.push(RowEvent::Drop { payload });
        }
        out.push(RowEvent::DragEnd);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: RowLayout = RowLayout { top: 2, len: 3 };

    #[test]
    fn hit_testing() {
        assert_eq!(LAYOUT.hit(1), None);
        assert_eq!(LAYOUT.hit(2), Some((0, 0)));
        assert_eq!(LAYOUT.hit(3), Some((0, 1)));
        assert_eq!(LAYOUT.hit(6), Some((2, 0)));
        assert_eq!(LAYOUT.hit(8), None);
        assert_eq!(LAYOUT.line_of(2), 6);
    }

    #[test]
    fn click_without_motion_emits_nothing() {
        let mut p = PointerTracker::default();
        assert!(p.press(LAYOUT, 2).is_empty());
        assert!(p.release(LAYOUT, 2, Some("1".into())).is_empty());
    }

    #[test]
    fn drag_sequence() {
        let mut p = PointerTracker::default();
        p.press(LAYOUT, 2);
        let first = p.drag(LAYOUT, 5);
        assert_eq!(first[0], RowEvent::DragStart { index: 0 });
        assert_eq!(first[1], RowEvent::drag_over(1, 1.5, 2.0));
        assert_eq!(p.drag(LAYOUT, 6), vec![RowEvent::drag_over(2, 0.5, 2.0)]);
        assert!(p.drag(LAYOUT, 20).is_empty());

        let end = p.release(LAYOUT, 6, Some("1".into()));
        assert_eq!(
            end,
            vec![
                RowEvent::Drop {
                    payload: Some("1".into())
                },
                RowEvent::DragEnd
            ]
        );
    }

    #[test]
    fn release_outside_only_ends() {
        let mut p = PointerTracker::default();
        p.press(LAYOUT, 4);
        p.drag(LAYOUT, 4);
        assert_eq!(p.release(LAYOUT, 30, None), vec![RowEvent::DragEnd]);
    }
}
