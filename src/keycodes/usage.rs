//! HID keyboard usage codes translated into devicetree binding text.
//!
//! Device keymap responses carry 16-bit usage codes. They are rendered as
//! `&kp TOKEN` bindings so the keymap parser can ingest them like any other
//! devicetree keymap.

/// Devicetree token for a keyboard-page usage, if the table knows it.
#[must_use]
pub fn usage_token(code: u16) -> Option<&'static str> {
    const LETTERS: [&str; 26] = [
        "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
        "S", "T", "U", "V", "W", "X", "Y", "Z",
    ];
    const DIGITS: [&str; 10] = ["N1", "N2", "N3", "N4", "N5", "N6", "N7", "N8", "N9", "N0"];
    const FUNCTION: [&str; 12] = [
        "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
    ];
    const MODIFIERS: [&str; 8] = [
        "LCTRL", "LSHFT", "LALT", "LGUI", "RCTRL", "RSHFT", "RALT", "RGUI",
    ];

    let token = match code {
        0x04..=0x1d => LETTERS[usize::from(code - 0x04)],
        0x1e..=0x27 => DIGITS[usize::from(code - 0x1e)],
        0x28 => "ENTER",
        0x29 => "ESC",
        0x2a => "BSPC",
        0x2b => "TAB",
        0x2c => "SPACE",
        0x2d => "MINUS",
        0x2e => "EQUAL",
        0x2f => "LBKT",
        0x30 => "RBKT",
        0x3a..=0x45 => FUNCTION[usize::from(code - 0x3a)],
        0xe0..=0xe7 => MODIFIERS[usize::from(code - 0xe0)],
        _ => return None,
    };
    Some(token)
}

/// Renders one usage code as a devicetree binding.
///
/// `0x0000` is transparent; unmapped codes become a `&none` binding that
/// carries the raw code in a comment so nothing is silently lost.
///
/// # Examples
///
/// ```
/// use keyviz::keycodes::binding_for_usage;
///
/// assert_eq!(binding_for_usage(0x0004), "&kp A");
/// assert_eq!(binding_for_usage(0x0000), "&trans");
/// assert_eq!(binding_for_usage(0x00b3), "&none /* 0x00b3 */");
/// ```
#[must_use]
pub fn binding_for_usage(code: u16) -> String {
    if code == 0x0000 {
        return "&trans".to_string();
    }
    match usage_token(code) {
        Some(token) => format!("&kp {token}"),
        None => format!("&none /* 0x{code:04x} */"),
    }
}
