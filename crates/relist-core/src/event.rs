#![forbid(unsafe_code)]

//! Canonical input event types consumed by the reorderable list.
//!
//! The view layer translates whatever its host delivers (terminal input,
//! DOM events, test scripts) into [`RowEvent`] values. Every event carries
//! the geometric or identity data the reorder state machine needs, so the
//! state machine never reaches back into the view.
//!
//! # Design Notes
//!
//! - Row indices refer to the sequence as it is currently *displayed*.
//! - `KeyEventKind` defaults to `Press` when the host cannot distinguish.
//! - `Modifiers` use bitflags for easy combination.
//! - Drop payloads are raw strings; a malformed payload is not an error here,
//!   it is resolved by the consumer.

use bitflags::bitflags;

/// Row-level input event delivered by the view layer.
#[derive(Debug, Clone, PartialEq)]
pub enum RowEvent {
    /// A pointer drag started on the row at `index`.
    DragStart {
        /// Displayed index of the row being dragged.
        index: usize,
    },

    /// The pointer is dragging over the row at `index`.
    DragOver {
        /// Displayed index of the hovered row.
        index: usize,
        /// Vertical pointer offset inside the hovered row.
        offset: f32,
        /// Rendered height of the hovered row.
        row_height: f32,
    },

    /// The pointer was released over a valid drop target.
    Drop {
        /// Transfer data attached at drag start (the item id as text), if any.
        payload: Option<String>,
    },

    /// The drag finished. Fires after `Drop`, or alone when the pointer was
    /// released outside any target.
    DragEnd,

    /// A key was pressed on the focused row.
    Key(KeyEvent),
}

impl RowEvent {
    /// Create a drag-over event.
    #[must_use]
    pub const fn drag_over(index: usize, offset: f32, row_height: f32) -> Self {
        Self::DragOver {
            index,
            offset,
            row_height,
        }
    }

    /// Create a drop event carrying an item id payload.
    #[must_use]
    pub fn drop_with_id(id: u64) -> Self {
        Self::Drop {
            payload: Some(id.to_string()),
        }
    }

    /// Create a key event from a bare key code.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    /// Stable short name used in log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DragStart { .. } => "drag_start",
            Self::DragOver { .. } => "drag_over",
            Self::Drop { .. } => "drop",
            Self::DragEnd => "drag_end",
            Self::Key(_) => "key",
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Super/Meta/Cmd modifier is held.
    #[must_use]
    pub const fn super_key(&self) -> bool {
        self.modifiers.contains(Modifiers::SUPER)
    }

    /// Convert a crossterm key event. Keys with no counterpart return `None`.
    #[cfg(all(feature = "crossterm", not(target_arch = "wasm32")))]
    #[must_use]
    pub fn from_crossterm(event: crossterm::event::KeyEvent) -> Option<Self> {
        use crossterm::event::{KeyCode as Ct, KeyEventKind as CtKind, KeyModifiers};

        let code = match event.code {
            Ct::Char(c) => KeyCode::Char(c),
            Ct::Enter => KeyCode::Enter,
            Ct::Esc => KeyCode::Escape,
            Ct::Backspace => KeyCode::Backspace,
            Ct::Tab => KeyCode::Tab,
            Ct::BackTab => KeyCode::BackTab,
            Ct::Delete => KeyCode::Delete,
            Ct::Home => KeyCode::Home,
            Ct::End => KeyCode::End,
            Ct::PageUp => KeyCode::PageUp,
            Ct::PageDown => KeyCode::PageDown,
            Ct::Up => KeyCode::Up,
            Ct::Down => KeyCode::Down,
            Ct::Left => KeyCode::Left,
            Ct::Right => KeyCode::Right,
            Ct::F(n) => KeyCode::F(n),
            _ => return None,
        };

        let mut modifiers = Modifiers::NONE;
        if event.modifiers.contains(KeyModifiers::SHIFT) {
            modifiers |= Modifiers::SHIFT;
        }
        if event.modifiers.contains(KeyModifiers::ALT) {
            modifiers |= Modifiers::ALT;
        }
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            modifiers |= Modifiers::CTRL;
        }
        if event
            .modifiers
            .intersects(KeyModifiers::SUPER | KeyModifiers::META)
        {
            modifiers |= Modifiers::SUPER;
        }

        let kind = match event.kind {
            CtKind::Press => KeyEventKind::Press,
            CtKind::Repeat => KeyEventKind::Repeat,
            CtKind::Release => KeyEventKind::Release,
        };

        Some(Self {
            code,
            modifiers,
            kind,
        })
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key. The space bar is `Char(' ')`.
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Backspace key.
    Backspace,

    /// Tab key.
    Tab,

    /// Shift+Tab (back-tab).
    BackTab,

    /// Delete key.
    Delete,

    /// Home key.
    Home,

    /// End key.
    End,

    /// Page Up key.
    PageUp,

    /// Page Down key.
    PageDown,

    /// Up arrow key.
    Up,

    /// Down arrow key.
    Down,

    /// Left arrow key.
    Left,

    /// Right arrow key.
    Right,

    /// Function key (F1-F24).
    F(u8),
}

impl KeyCode {
    /// The space bar.
    pub const SPACE: Self = Self::Char(' ');

    /// Human-readable name, as spoken in announcements.
    #[must_use]
    pub fn display_name(self) -> String {
        match self {
            Self::Char(' ') => "Spacebar".to_owned(),
            Self::Char(c) => format!("{} key", c.to_uppercase()),
            Self::Enter => "Enter key".to_owned(),
            Self::Escape => "Escape key".to_owned(),
            Self::Backspace => "Backspace key".to_owned(),
            Self::Tab => "Tab key".to_owned(),
            Self::BackTab => "Shift Tab".to_owned(),
            Self::Delete => "Delete key".to_owned(),
            Self::Home => "Home key".to_owned(),
            Self::End => "End key".to_owned(),
            Self::PageUp => "Page Up key".to_owned(),
            Self::PageDown => "Page Down key".to_owned(),
            Self::Up => "up arrow key".to_owned(),
            Self::Down => "down arrow key".to_owned(),
            Self::Left => "left arrow key".to_owned(),
            Self::Right => "right arrow key".to_owned(),
            Self::F(n) => format!("F{n} key"),
        }
    }

    /// Parse a key name such as `"space"`, `"escape"`, `"up"`, `"f5"` or a
    /// single character. Matching is case-insensitive for named keys.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(Self::Char(c));
        }
        let lower = trimmed.to_ascii_lowercase();
        let code = match lower.as_str() {
            "space" | "spacebar" => Self::SPACE,
            "enter" | "return" => Self::Enter,
            "esc" | "escape" => Self::Escape,
            "backspace" => Self::Backspace,
            "tab" => Self::Tab,
            "backtab" => Self::BackTab,
            "delete" | "del" => Self::Delete,
            "home" => Self::Home,
            "end" => Self::End,
            "pageup" => Self::PageUp,
            "pagedown" => Self::PageDown,
            "up" | "arrowup" => Self::Up,
            "down" | "arrowdown" => Self::Down,
            "left" | "arrowleft" => Self::Left,
            "right" | "arrowright" => Self::Right,
            other => {
                let n = other.strip_prefix('f')?.parse::<u8>().ok()?;
                if (1..=24).contains(&n) {
                    Self::F(n)
                } else {
                    return None;
                }
            }
        };
        Some(code)
    }
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_modifiers() {
        let event = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        assert!(event.ctrl());
        assert!(!event.super_key());
    }

    #[test]
    fn key_event_kind() {
        let press = KeyEvent::new(KeyCode::Enter);
        assert_eq!(press.kind, KeyEventKind::Press);

        let release = press.with_kind(KeyEventKind::Release);
        assert_eq!(release.kind, KeyEventKind::Release);
    }

    #[test]
    fn parse_named_keys() {
        assert_eq!(KeyCode::parse("space"), Some(KeyCode::SPACE));
        assert_eq!(KeyCode::parse("Escape"), Some(KeyCode::Escape));
        assert_eq!(KeyCode::parse("ArrowUp"), Some(KeyCode::Up));
        assert_eq!(KeyCode::parse("f5"), Some(KeyCode::F(5)));
        assert_eq!(KeyCode::parse("x"), Some(KeyCode::Char('x')));
        assert_eq!(KeyCode::parse(" "), None);
        assert_eq!(KeyCode::parse("f99"), None);
        assert_eq!(KeyCode::parse("hyper"), None);
    }

    #[test]
    fn display_names_match_announcement_wording() {
        assert_eq!(KeyCode::SPACE.display_name(), "Spacebar");
        assert_eq!(KeyCode::Escape.display_name(), "Escape key");
        assert_eq!(KeyCode::Char('g').display_name(), "G key");
    }

    #[test]
    fn drop_with_id_encodes_payload() {
        assert_eq!(
            RowEvent::drop_with_id(42),
            RowEvent::Drop {
                payload: Some("42".to_owned())
            }
        );
    }

    #[test]
    fn row_event_names_are_stable() {
        assert_eq!(RowEvent::DragStart { index: 0 }.as_str(), "drag_start");
        assert_eq!(RowEvent::drag_over(1, 0.0, 2.0).as_str(), "drag_over");
        assert_eq!(RowEvent::DragEnd.as_str(), "drag_end");
        assert_eq!(RowEvent::key(KeyCode::Up).as_str(), "key");
    }

    #[test]
    fn modifiers_default() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
    }
}
