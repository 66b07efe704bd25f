#![forbid(unsafe_code)]

//! Row view model and plain-text rendering.
//!
//! [`build_rows`] turns the preview sequence and gesture state into the
//! per-row flags a view layer needs. [`render_line`] is a minimal text
//! renderer for terminals and tests:
//!
//! ```text
//! >  Go running.          focusable (roving cursor)
//! >* Do laundry.          focusable and selected (grabbed)
//!    Write report.
//! ```

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::gesture::GestureState;
use crate::item::Item;

const ELLIPSIS: &str = "…";

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Position in the preview sequence.
    pub index: usize,
    pub item: Item,
    /// The row shows the item being moved.
    pub selected: bool,
    /// The row carries the single tab stop.
    pub focusable: bool,
    /// A pointer drag may start on this row.
    pub draggable: bool,
}

/// Build the rows for `preview`.
///
/// While a keyboard grab is active the tab stop follows the grabbed item;
/// otherwise it sits on `cursor`. Rows are draggable only while idle.
#[must_use]
pub fn build_rows(preview: &[Item], gesture: &GestureState, cursor: usize) -> Vec<RowView> {
    let active_id = gesture.active().map(|g| g.active_item().id());
    let grabbed = matches!(gesture, GestureState::KeyboardGrabbed(_));
    let idle = active_id.is_none();

    preview
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let selected = active_id == Some(item.id());
            let focusable = if grabbed { selected } else { index == cursor };
            RowView {
                index,
                item: item.clone(),
                selected,
                focusable,
                draggable: idle,
            }
        })
        .collect()
}

/// Render one row as a line of at most `width` display columns.
#[must_use]
pub fn render_line(row: &RowView, width: usize) -> String {
    let mut line = String::with_capacity(row.item.label().len() + 3);
    line.push(if row.focusable { '>' } else { ' ' });
    line.push(if row.selected { '*' } else { ' ' });
    line.push(' ');
    line.push_str(row.item.label());
    truncate_with_ellipsis(&line, width)
}

/// Display width of `text` in terminal columns.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.graphemes(true).map(UnicodeWidthStr::width).sum()
}

/// Truncate `text` to `max_width` columns, ending in an ellipsis when cut.
/// Never splits a grapheme cluster.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_owned();
    }
    let ellipsis_width = ELLIPSIS.width();
    if max_width <= ellipsis_width {
        return truncate_to_width(text, max_width);
    }
    let mut out = truncate_to_width(text, max_width - ellipsis_width);
    out.push_str(ELLIPSIS);
    out
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w > max_width {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureTracker;

    fn items() -> Vec<Item> {
        vec![
            Item::new(1, "Go running."),
            Item::new(2, "Do laundry."),
            Item::new(3, "Write report."),
        ]
    }

    #[test]
    fn idle_rows_follow_cursor() {
        let rows = build_rows(&items(), &GestureState::Idle, 1);
        assert!(rows.iter().all(|r| r.draggable && !r.selected));
        let focusable: Vec<bool> = rows.iter().map(|r| r.focusable).collect();
        assert_eq!(focusable, vec![false, true, false]);
    }

    #[test]
    fn grabbed_rows_follow_active_item() {
        let list = items();
        let mut t = GestureTracker::new();
        t.grab(&list, 0).unwrap();
        // Preview with item 1 moved to the end.
        let preview = vec![list[1].clone(), list[2].clone(), list[0].clone()];
        let rows = build_rows(&preview, t.state(), 0);
        assert!(rows.iter().all(|r| !r.draggable));
        assert!(rows[2].selected && rows[2].focusable);
        assert!(!rows[0].focusable);
    }

    #[test]
    fn pointer_drag_keeps_cursor_tab_stop() {
        let list = items();
        let mut t = GestureTracker::new();
        t.start_drag(&list, 2).unwrap();
        let rows = build_rows(&list, t.state(), 0);
        assert!(rows[0].focusable);
        assert!(rows[2].selected && !rows[2].focusable);
    }

    #[test]
    fn render_marks_and_truncates() {
        let rows = build_rows(&items(), &GestureState::Idle, 0);
        assert_eq!(render_line(&rows[0], 40), ">  Go running.");
        assert_eq!(render_line(&rows[1], 40), "   Do laundry.");
        assert_eq!(render_line(&rows[0], 8), ">  Go r…");
    }

    #[test]
    fn truncation_respects_wide_graphemes() {
        assert_eq!(display_width("你好"), 4);
        assert_eq!(truncate_with_ellipsis("你好世界", 5), "你好…");
        assert_eq!(truncate_with_ellipsis("abc", 1), "a");
        assert_eq!(truncate_with_ellipsis("e\u{301}tude", 3), "e\u{301}t…");
    }
}
