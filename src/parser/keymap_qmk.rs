//! QMK `keymap.c` parser.
//!
//! Each `[_NAME] = LAYOUT...(` entry becomes a layer named `NAME`. The macro
//! arguments run to the balancing `)` and are split on top-level commas, so
//! wrapped keycodes such as `LCTL(KC_C)` stay one key. Comments are removed
//! first so they neither merge into tokens nor unbalance the parentheses.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::strip_comments;
use crate::keycodes::TRANSPARENT_TOKEN;
use crate::models::{KeymapDocument, Layer};

static LAYER_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[_(\w+)\]\s*=\s*LAYOUT\w*\s*\(").expect("valid layout head regex")
});

static MOD_WRAPPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(LCTL|RCTL|LSFT|RSFT|LALT|RALT|LGUI|RGUI)\((.*)\)$")
        .expect("valid modifier regex")
});

/// Returns the argument text up to the `)` balancing an already-consumed `(`.
fn balanced_args(text: &str) -> (&str, bool) {
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => return (&text[..idx], true),
            ')' => depth -= 1,
            _ => {}
        }
    }
    (text, false)
}

/// Splits on commas that are not inside parentheses. Empty pieces are dropped.
fn split_top_level(args: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in args.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => tokens.push(std::mem::take(&mut current)),
            c if c.is_whitespace() => {}
            _ => current.push(ch),
        }
    }
    tokens.push(current);
    tokens.retain(|t| !t.is_empty());
    tokens
}

/// Maps a QMK keycode to the token spelling the label normalizer understands.
#[must_use]
pub fn normalize_qmk_keycode(code: &str) -> String {
    let code = code.strip_prefix("KC_").unwrap_or(code);

    match code {
        "_______" | "TRNS" => return TRANSPARENT_TOKEN.to_string(),
        "0x0068" => return "F13".to_string(),
        "0x0069" => return "F14".to_string(),
        _ => {}
    }

    if let Some(caps) = MOD_WRAPPER.captures(code) {
        let modifier = &caps[1][1..];
        return format!("{}+{}", modifier, normalize_qmk_keycode(&caps[2]));
    }

    let renamed = match code {
        "MINS" => "MINUS",
        "EQL" => "EQUAL",
        "LBRC" => "[",
        "RBRC" => "]",
        "QUOT" => "SQT",
        "SLSH" => "FSLH",
        "INT1" => "CAPS",
        "INT3" => "INT3",
        "MS_BTN1" => "BTN1",
        "MS_BTN2" => "BTN2",
        "MS_BTN3" => "BTN3",
        "WWW_BACK" => "WWW_PREV",
        "WWW_FORWARD" => "WWW_NEXT",
        other => other,
    };
    renamed.to_string()
}

/// Parses a QMK keymap source into layers.
#[must_use]
pub fn parse_qmk_keymap(text: &str) -> KeymapDocument {
    let mut doc = KeymapDocument::new();
    let text = strip_comments(text);

    for caps in LAYER_HEAD.captures_iter(&text) {
        let name = caps[1].to_string();
        let Some(head) = caps.get(0) else { continue };

        let (args, closed) = balanced_args(&text[head.end()..]);
        if !closed {
            warn!("LAYOUT for layer '{}' is not closed, reading to end of text", name);
        }

        let keys: Vec<String> = split_top_level(args)
            .iter()
            .map(|token| normalize_qmk_keycode(token))
            .collect();
        doc.insert(Layer::new(name.clone()).with_label(name).with_keys(keys));
    }

    doc
}
