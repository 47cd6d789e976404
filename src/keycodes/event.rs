//! Physical key events mapped into the canonical label space.
//!
//! Browser-style key names ("ArrowLeft", " ", "Escape") are first rewritten
//! to the devicetree keymap's own spelling and then piped through
//! [`normalize`], so highlighting agrees with rendered labels exactly.

use super::normalize::normalize;

/// Modifier keys held when an event fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift held
    pub shift: bool,
    /// Control held
    pub ctrl: bool,
    /// Alt/Option held
    pub alt: bool,
    /// Meta/Super/Windows held
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Returns true if any modifier is held.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// A key press or release reported by the host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Reported key name (e.g., "a", "Shift", "ArrowUp", " ")
    pub key: String,
    /// Modifier state at the time of the event
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Creates an event with no modifiers held.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Sets the modifier state.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Rewrites an upper-cased platform key name to the keymap's spelling.
fn keymap_spelling(upper: &str) -> Option<&'static str> {
    let spelled = match upper {
        " " => "SPACE",
        "ESCAPE" => "ESC",
        "CONTROL" => "CTRL",
        "META" | "OS" => "WIN",
        "ALTGRAPH" => "ALT",
        "CAPSLOCK" => "CAPS",
        "\\" => "YEN",
        "[" => "LBKT",
        "]" => "RBKT",
        ";" => "SEMI",
        ":" => "COLON",
        "'" => "SQT",
        "," => "COMMA",
        "." => "DOT",
        "/" => "FSLH",
        "-" => "MINUS",
        "=" => "EQUAL",
        "ARROWLEFT" => "LEFT",
        "ARROWUP" => "UP",
        "ARROWRIGHT" => "RIGHT",
        "ARROWDOWN" => "DOWN",
        _ => return None,
    };
    Some(spelled)
}

/// Converts a key event into the canonical label used for highlighting.
///
/// Modifier state does not change the label: a held Shift reports its own
/// event, and shifted characters are matched as reported.
///
/// Returns `None` only when the event carries no key name at all.
///
/// # Examples
///
/// ```
/// use keyviz::keycodes::{map_event, KeyEvent};
///
/// assert_eq!(map_event(&KeyEvent::new("a")).as_deref(), Some("A"));
/// assert_eq!(map_event(&KeyEvent::new(" ")).as_deref(), Some("SPACE"));
/// assert_eq!(map_event(&KeyEvent::new("ArrowLeft")).as_deref(), Some("LEFT"));
/// assert_eq!(map_event(&KeyEvent::new("1")).as_deref(), Some("1"));
/// ```
#[must_use]
pub fn map_event(event: &KeyEvent) -> Option<String> {
    if event.key.is_empty() {
        return None;
    }

    let upper = event.key.to_uppercase();
    let spelled = keymap_spelling(&upper).unwrap_or(&upper);
    Some(normalize(spelled))
}
