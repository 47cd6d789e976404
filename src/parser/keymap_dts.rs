//! ZMK `.keymap` parser.
//!
//! The file is scanned line by line. A `<name>_layer {` line opens a layer,
//! `label = "..."` (or `display-name`) labels it, and everything between
//! `bindings = <` and `>;` is split on `&` into one binding per key.
//! Comments of either style are removed before scanning.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::strip_comments;
use crate::keycodes::{PLACEHOLDER_LABEL, TRANSPARENT_TOKEN};
use crate::models::{KeymapDocument, Layer};

static LAYER_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)_layer\s*\{").expect("valid layer regex"));

static LAYER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:label|display-name)\s*=\s*"([^"]+)""#).expect("valid label regex")
});

static BINDINGS_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s{;])bindings\s*=\s*<").expect("valid bindings regex")
});

const BINDINGS_CLOSE: &str = ">;";

/// A binding pattern and the label it produces.
struct BindingRule {
    pattern: Regex,
    emit: fn(&Captures<'_>) -> String,
}

fn captured(caps: &Captures<'_>) -> String {
    caps[1].to_string()
}

/// Binding rules in priority order; the first match wins.
static BINDING_RULES: LazyLock<Vec<BindingRule>> = LazyLock::new(|| {
    let rule = |pattern: &str, emit: fn(&Captures<'_>) -> String| BindingRule {
        pattern: Regex::new(pattern).expect("valid binding regex"),
        emit,
    };
    vec![
        rule(r"&kp\s+(\S+)", captured),
        rule(r"&lt\s+\d+\s+(\S+)", captured),
        rule(r"&mt\s+\S+\s+(\S+)", captured),
        rule(r"&toJIS\s+\d+\s+(\S+)", captured),
        rule(r"&mF(\d+)", |caps| format!("F{}", &caps[1])),
        rule(r"&trans\b", |_| TRANSPARENT_TOKEN.to_string()),
    ]
});

/// Extracts the display token from one `&...` binding.
///
/// Unknown behaviors (`&mo 1`, `&bt BT_CLR`, ...) become `"?"`.
#[must_use]
pub fn binding_label(binding: &str) -> String {
    BINDING_RULES
        .iter()
        .find_map(|rule| rule.pattern.captures(binding).map(|caps| (rule.emit)(&caps)))
        .unwrap_or_else(|| PLACEHOLDER_LABEL.to_string())
}

/// Splits a run of binding text on `&` and appends one label per binding.
fn push_bindings(layer: &mut Layer, text: &str) {
    for part in text.split('&').map(str::trim).filter(|p| !p.is_empty()) {
        layer.keys.push(binding_label(&format!("&{part}")));
    }
}

/// Parses a ZMK keymap into layers.
#[must_use]
pub fn parse_dts_keymap(text: &str) -> KeymapDocument {
    let mut doc = KeymapDocument::new();
    let mut current: Option<String> = None;
    let mut in_bindings = false;

    let text = strip_comments(text);
    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = LAYER_START.captures(line) {
            let name = caps[1].to_string();
            doc.insert(Layer::new(name.clone()));
            current = Some(name);
            in_bindings = false;
            continue;
        }

        let Some(layer) = current.as_deref().and_then(|name| doc.get_mut(name)) else {
            continue;
        };

        if let Some(caps) = LAYER_LABEL.captures(line) {
            layer.label = caps[1].to_string();
            continue;
        }

        if let Some(open) = BINDINGS_OPEN.find(line) {
            let rest = &line[open.end()..];
            match rest.find(BINDINGS_CLOSE) {
                Some(end) => push_bindings(layer, &rest[..end]),
                None => {
                    push_bindings(layer, rest);
                    in_bindings = true;
                }
            }
            continue;
        }

        if let Some(end) = line.find(BINDINGS_CLOSE) {
            if in_bindings {
                push_bindings(layer, &line[..end]);
            }
            in_bindings = false;
            continue;
        }

        if in_bindings {
            push_bindings(layer, line);
        }
    }

    doc
}
