#![forbid(unsafe_code)]

//! Key bindings for keyboard reordering.
//!
//! [`ReorderKeymap`] maps raw [`KeyEvent`]s to [`KeyAction`]s. The same key
//! toggles grab and drop; a separate key cancels; two keys move the grabbed
//! item (or the roving cursor when nothing is grabbed).
//!
//! # Defaults
//!
//! | Action | Default key |
//! |--------|-------------|
//! | grab / drop | Space |
//! | cancel | Escape |
//! | move up | Up |
//! | move down | Down |
//!
//! Events with a held accelerator modifier (Ctrl or Super by default) never
//! resolve to an action so that host and OS shortcuts keep working.
//!
//! # Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `RELIST_GRAB_KEY` | key name | `space` | Grab/drop toggle |
//! | `RELIST_CANCEL_KEY` | key name | `escape` | Cancel a gesture |
//! | `RELIST_WRAP_NAVIGATION` | bool | `false` | Wrap cursor at list ends |
//!
//! # Example
//!
//! ```
//! use relist_core::event::{KeyCode, KeyEvent, Modifiers};
//! use relist_core::keymap::{KeyAction, ReorderKeymap};
//!
//! let keymap = ReorderKeymap::default();
//! assert_eq!(keymap.resolve(&KeyEvent::new(KeyCode::Char(' '))), Some(KeyAction::ToggleGrab));
//!
//! let ctrl_up = KeyEvent::new(KeyCode::Up).with_modifiers(Modifiers::CTRL);
//! assert_eq!(keymap.resolve(&ctrl_up), None);
//! ```

use crate::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};

/// High-level action a key resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Grab the focused row, or drop the grabbed one.
    ToggleGrab,
    /// Abandon the current gesture.
    Cancel,
    /// Move toward the start of the list.
    MoveUp,
    /// Move toward the end of the list.
    MoveDown,
}

impl KeyAction {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToggleGrab => "toggle_grab",
            Self::Cancel => "cancel",
            Self::MoveUp => "move_up",
            Self::MoveDown => "move_down",
        }
    }

    /// Whether a held (repeating) key may trigger this action.
    #[must_use]
    pub const fn accepts_repeat(self) -> bool {
        matches!(self, Self::MoveUp | Self::MoveDown)
    }
}

/// Keyboard configuration for a reorderable list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "keymap-config", derive(serde::Deserialize))]
#[cfg_attr(feature = "keymap-config", serde(try_from = "KeymapDocument"))]
pub struct ReorderKeymap {
    /// Grab/drop toggle. Default: Space.
    pub grab: KeyCode,
    /// Cancel key. Default: Escape.
    pub cancel: KeyCode,
    /// Move toward the start. Default: Up.
    pub move_up: KeyCode,
    /// Move toward the end. Default: Down.
    pub move_down: KeyCode,
    /// Wrap the roving cursor at list boundaries when nothing is grabbed.
    /// Never applies to a grabbed item. Default: false.
    pub wrap_navigation: bool,
    /// Modifiers whose presence makes a key event pass through untouched.
    /// Default: Ctrl | Super.
    pub ignored_modifiers: Modifiers,
}

impl Default for ReorderKeymap {
    fn default() -> Self {
        Self {
            grab: KeyCode::SPACE,
            cancel: KeyCode::Escape,
            move_up: KeyCode::Up,
            move_down: KeyCode::Down,
            wrap_navigation: false,
            ignored_modifiers: Modifiers::CTRL | Modifiers::SUPER,
        }
    }
}

impl ReorderKeymap {
    /// Set the grab/drop key.
    #[must_use]
    pub fn with_grab(mut self, key: KeyCode) -> Self {
        self.grab = key;
        self
    }

    /// Set the cancel key.
    #[must_use]
    pub fn with_cancel(mut self, key: KeyCode) -> Self {
        self.cancel = key;
        self
    }

    /// Set the movement keys.
    #[must_use]
    pub fn with_move_keys(mut self, up: KeyCode, down: KeyCode) -> Self {
        self.move_up = up;
        self.move_down = down;
        self
    }

    /// Enable or disable cursor wrap-around.
    #[must_use]
    pub fn with_wrap_navigation(mut self, wrap: bool) -> Self {
        self.wrap_navigation = wrap;
        self
    }

    /// Set the pass-through modifiers.
    #[must_use]
    pub fn with_ignored_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.ignored_modifiers = modifiers;
        self
    }

    /// Load the keymap from environment variables.
    ///
    /// Unparseable values are ignored and the default is kept.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the keymap from an arbitrary variable lookup.
    ///
    /// [`from_env`](Self::from_env) delegates here; tests pass a map instead
    /// of touching the process environment.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut keymap = Self::default();

        if let Some(val) = lookup("RELIST_GRAB_KEY")
            && let Some(code) = KeyCode::parse(&val)
        {
            keymap.grab = code;
        }

        if let Some(val) = lookup("RELIST_CANCEL_KEY")
            && let Some(code) = KeyCode::parse(&val)
        {
            keymap.cancel = code;
        }

        if let Some(val) = lookup("RELIST_WRAP_NAVIGATION") {
            keymap.wrap_navigation = val == "1" || val.eq_ignore_ascii_case("true");
        }

        keymap.validated()
    }

    /// Resolve conflicting bindings.
    ///
    /// Every action needs its own key. A binding that collides with one
    /// resolved earlier (priority: grab, cancel, move up, move down) is
    /// reset to its default, and if the default collides too the whole
    /// keymap falls back to the default bindings.
    #[must_use]
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if self.cancel == self.grab {
            self.cancel = defaults.cancel;
        }
        if self.move_up == self.grab || self.move_up == self.cancel {
            self.move_up = defaults.move_up;
        }
        if self.move_down == self.grab
            || self.move_down == self.cancel
            || self.move_down == self.move_up
        {
            self.move_down = defaults.move_down;
        }
        if !self.is_valid() {
            tracing::warn!(
                message = "relist.keymap.conflict",
                grab = ?self.grab,
                cancel = ?self.cancel,
            );
            return Self {
                wrap_navigation: self.wrap_navigation,
                ignored_modifiers: self.ignored_modifiers,
                ..defaults
            };
        }
        self
    }

    /// Check that no two actions share a key.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let keys = [self.grab, self.cancel, self.move_up, self.move_down];
        keys.iter()
            .enumerate()
            .all(|(i, a)| keys.iter().skip(i + 1).all(|b| a != b))
    }

    /// Map a key event to an action.
    ///
    /// Returns `None` for unbound keys, release events, repeats of
    /// non-repeatable actions, and events with a pass-through modifier held.
    #[must_use]
    pub fn resolve(&self, event: &KeyEvent) -> Option<KeyAction> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        if event.modifiers.intersects(self.ignored_modifiers) {
            return None;
        }
        let action = if event.code == self.grab {
            KeyAction::ToggleGrab
        } else if event.code == self.cancel {
            KeyAction::Cancel
        } else if event.code == self.move_up {
            KeyAction::MoveUp
        } else if event.code == self.move_down {
            KeyAction::MoveDown
        } else {
            return None;
        };
        if event.kind == KeyEventKind::Repeat && !action.accepts_repeat() {
            return None;
        }
        Some(action)
    }

    /// Spoken name of the grab/drop key.
    #[must_use]
    pub fn grab_key_name(&self) -> String {
        self.grab.display_name()
    }

    /// Spoken name of the cancel key.
    #[must_use]
    pub fn cancel_key_name(&self) -> String {
        self.cancel.display_name()
    }
}

// ---------------------------------------------------------------------------
// TOML loading
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a keymap document.
#[cfg(feature = "keymap-config")]
#[derive(Debug, thiserror::Error)]
pub enum KeymapConfigError {
    /// The document is not valid TOML or has the wrong shape.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Serialized form: key names as strings, every field optional.
#[cfg(feature = "keymap-config")]
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct KeymapDocument {
    grab: Option<String>,
    cancel: Option<String>,
    move_up: Option<String>,
    move_down: Option<String>,
    wrap_navigation: Option<bool>,
    ignore_ctrl: Option<bool>,
    ignore_super: Option<bool>,
    ignore_alt: Option<bool>,
}

#[cfg(feature = "keymap-config")]
impl TryFrom<KeymapDocument> for ReorderKeymap {
    type Error = String;

    fn try_from(doc: KeymapDocument) -> Result<Self, Self::Error> {
        fn key(name: Option<String>, fallback: KeyCode) -> Result<KeyCode, String> {
            match name {
                None => Ok(fallback),
                Some(name) => KeyCode::parse(&name).ok_or_else(|| format!("unknown key '{name}'")),
            }
        }

        let defaults = Self::default();
        let mut ignored = defaults.ignored_modifiers;
        for (flag, modifier) in [
            (doc.ignore_ctrl, Modifiers::CTRL),
            (doc.ignore_super, Modifiers::SUPER),
            (doc.ignore_alt, Modifiers::ALT),
        ] {
            if let Some(on) = flag {
                ignored.set(modifier, on);
            }
        }

        Ok(Self {
            grab: key(doc.grab, defaults.grab)?,
            cancel: key(doc.cancel, defaults.cancel)?,
            move_up: key(doc.move_up, defaults.move_up)?,
            move_down: key(doc.move_down, defaults.move_down)?,
            wrap_navigation: doc.wrap_navigation.unwrap_or(defaults.wrap_navigation),
            ignored_modifiers: ignored,
        }
        .validated())
    }
}

#[cfg(feature = "keymap-config")]
impl ReorderKeymap {
    /// Parse a keymap from a TOML document.
    ///
    /// ```toml
    /// grab = "enter"
    /// cancel = "escape"
    /// wrap_navigation = true
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, KeymapConfigError> {
        Ok(toml::from_str(source)?)
    }
}
