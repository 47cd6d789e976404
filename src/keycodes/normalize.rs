//! Canonical display labels for raw key-code tokens.
//!
//! This table is the single source of truth for label spelling. Both keymap
//! parsers and the key-event mapper route through [`normalize`], so a pressed
//! physical key always resolves to the same label the renderer drew.

/// Label drawn for transparent keys.
pub const TRANSPARENT_LABEL: &str = "---";

/// Raw token emitted by parsers for transparent bindings.
pub const TRANSPARENT_TOKEN: &str = "TRANS";

/// Label used for key slots with no recognizable binding.
pub const PLACEHOLDER_LABEL: &str = "?";

/// Looks up the canonical spelling for a raw token, if the table has one.
#[must_use]
pub fn canonical(raw: &str) -> Option<&'static str> {
    let label = match raw {
        // Digit row
        "N1" => "1",
        "N2" => "2",
        "N3" => "3",
        "N4" => "4",
        "N5" => "5",
        "N6" => "6",
        "N7" => "7",
        "N8" => "8",
        "N9" => "9",
        "N0" => "0",

        // Left/right modifiers collapse to one name
        "LALT" | "RALT" => "ALT",
        "LSHFT" | "LSHIFT" | "RSHFT" | "RSHIFT" => "SHIFT",
        "LCTRL" | "RCTRL" => "CTRL",
        "LGUI" | "RGUI" => "WIN",

        // Editing and whitespace
        "SPACE" => "SPACE",
        "ENTER" | "RET" | "RETURN" => "ENTER",
        "ESC" | "ESCAPE" => "ESC",
        "BKSP" | "BSPC" => "BACKSPACE",
        "TAB" => "TAB",
        "DELETE" => "DEL",
        "INT3" => "INT3",
        "ALPHANUMERIC" => "CAPS",

        // Navigation
        "PAGEUP" | "PAGE_UP" => "PG_UP",
        "PAGEDOWN" | "PAGE_DOWN" => "PG_DN",
        "PRINTSCREEN" | "PRINTSCRN" => "PSCRN",
        "LEFT_ARROW" => "LEFT",
        "RIGHT_ARROW" => "RIGHT",
        "UP_ARROW" => "UP",
        "DOWN_ARROW" => "DOWN",

        // Punctuation prints as the character
        "MINUS" => "-",
        "EQUAL" => "=",
        "LBRACKET" => "[",
        "RBRACKET" => "]",
        "LBKT" => "{",
        "RBKT" => "}",
        "SEMI" => ";",
        "COLON" => ":",
        "SQT" => "'",
        "BSLH" | "YEN" => "\\",
        "COMMA" => ",",
        "DOT" => ".",
        "FSLH" => "/",

        "TRANS" => TRANSPARENT_LABEL,
        _ => return None,
    };
    Some(label)
}

/// Maps a raw key-code token to its canonical display label.
///
/// Total: tokens missing from the table pass through unchanged so unknown
/// codes still render.
///
/// # Examples
///
/// ```
/// use keyviz::keycodes::normalize;
///
/// assert_eq!(normalize("N1"), "1");
/// assert_eq!(normalize("RALT"), "ALT");
/// assert_eq!(normalize("TRANS"), "---");
/// assert_eq!(normalize("C_VOL_UP"), "C_VOL_UP");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    canonical(raw).map_or_else(|| raw.to_string(), str::to_string)
}

/// Returns true if the canonical label marks a transparent key.
#[must_use]
pub fn is_transparent(label: &str) -> bool {
    label == TRANSPARENT_LABEL || label == TRANSPARENT_TOKEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_row() {
        for (raw, expected) in [("N0", "0"), ("N5", "5"), ("N9", "9")] {
            assert_eq!(normalize(raw), expected);
        }
    }

    #[test]
    fn test_modifier_sides_collapse() {
        assert_eq!(normalize("LALT"), normalize("RALT"));
        assert_eq!(normalize("LSHFT"), "SHIFT");
        assert_eq!(normalize("RSHIFT"), "SHIFT");
        assert_eq!(normalize("RCTRL"), "CTRL");
        assert_eq!(normalize("LGUI"), "WIN");
    }

    #[test]
    fn test_punctuation_prints_character() {
        assert_eq!(normalize("MINUS"), "-");
        assert_eq!(normalize("FSLH"), "/");
        assert_eq!(normalize("SQT"), "'");
        assert_eq!(normalize("YEN"), "\\");
        assert_eq!(normalize("LBKT"), "{");
    }

    #[test]
    fn test_navigation_short_forms() {
        assert_eq!(normalize("DELETE"), "DEL");
        assert_eq!(normalize("PAGEUP"), "PG_UP");
        assert_eq!(normalize("PAGEDOWN"), "PG_DN");
        assert_eq!(normalize("PRINTSCREEN"), "PSCRN");
    }

    #[test]
    fn test_unknown_passes_through() {
        for raw in ["", "?", "F13", "BT_CLR", "CTL+C", "日本語", "&kp"] {
            assert_eq!(normalize(raw), raw);
            assert!(canonical(raw).is_none());
        }
    }

    #[test]
    fn test_transparent() {
        assert_eq!(normalize(TRANSPARENT_TOKEN), TRANSPARENT_LABEL);
        assert!(is_transparent(&normalize("TRANS")));
        assert!(!is_transparent("A"));
    }

    #[test]
    fn test_canonical_labels_are_fixed_points() {
        // Normalizing twice must not drift (e.g. "ALT" stays "ALT").
        for raw in ["LALT", "BSPC", "N3", "PAGEUP", "LBRACKET", "ESCAPE"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "{raw} drifted");
        }
    }
}
