//! Parsing for physical layout and keymap sources.
//!
//! Layout text is either ZMK devicetree (`zmk,physical-layout`) or KLE-style
//! JSON with a top-level `layouts` object. Keymap text is either a ZMK
//! `.keymap` file or a QMK `keymap.c` with a `PROGMEM keymaps[][` array.
//!
//! Dialects are picked by ordered marker predicates; the first match wins
//! and the last dialect in each list is the fallback. Parse failures are
//! logged and yield empty results so a caller can keep drawing.

pub mod keymap_dts;
pub mod keymap_qmk;
pub mod kle_json;
pub mod physical;

use tracing::{debug, warn};

use crate::models::{KeyGeometry, KeymapDocument};

/// Marker identifying a ZMK physical-layout node.
pub const PHYSICAL_LAYOUT_MARKER: &str = "compatible = \"zmk,physical-layout\"";

/// Marker identifying a ZMK keymap node.
pub const KEYMAP_MARKER: &str = "compatible = \"zmk,keymap\"";

/// Marker identifying a QMK keymap array.
pub const QMK_KEYMAP_MARKER: &str = "PROGMEM keymaps[][";

/// Source dialect of a physical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutDialect {
    /// ZMK devicetree with `&key_physical_attrs` directives
    Devicetree,
    /// JSON with a `layouts` object
    KleJson,
}

/// Source dialect of a keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapDialect {
    /// ZMK `.keymap` devicetree
    Devicetree,
    /// QMK `keymap.c` LAYOUT macros
    QmkArray,
}

type Detector<D> = (fn(&str) -> bool, D);

const LAYOUT_DETECTORS: &[Detector<LayoutDialect>] =
    &[(is_devicetree_layout, LayoutDialect::Devicetree)];

const KEYMAP_DETECTORS: &[Detector<KeymapDialect>] =
    &[(is_qmk_keymap, KeymapDialect::QmkArray)];

fn is_devicetree_layout(text: &str) -> bool {
    text.contains(PHYSICAL_LAYOUT_MARKER) || text.contains(KEYMAP_MARKER)
}

fn is_qmk_keymap(text: &str) -> bool {
    text.contains(QMK_KEYMAP_MARKER)
}

impl LayoutDialect {
    /// Picks the layout dialect for `text`. Falls back to JSON.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        LAYOUT_DETECTORS
            .iter()
            .find(|(matches, _)| matches(text))
            .map_or(Self::KleJson, |(_, dialect)| *dialect)
    }
}

impl KeymapDialect {
    /// Picks the keymap dialect for `text`. Falls back to devicetree.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        KEYMAP_DETECTORS
            .iter()
            .find(|(matches, _)| matches(text))
            .map_or(Self::Devicetree, |(_, dialect)| *dialect)
    }
}

/// Removes `//` line comments and `/* */` block comments.
///
/// Newlines inside block comments are kept so line-oriented scanners see
/// the same line structure. Text inside double quotes is left alone.
#[must_use]
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        if in_string {
            in_string = ch != '"';
            out.push(ch);
            continue;
        }
        match (ch, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            ('/', Some('/')) => {
                if chars.by_ref().any(|next| next == '\n') {
                    out.push('\n');
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    if next == '\n' {
                        out.push('\n');
                    }
                    prev = next;
                }
                out.push(' ');
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Parses layout text of either dialect into key geometries.
///
/// Returns an empty list (with a logged warning) when nothing usable is found.
#[must_use]
pub fn parse_layout(text: &str) -> Vec<KeyGeometry> {
    if text.trim().is_empty() {
        debug!("Layout text is empty");
        return Vec::new();
    }

    let dialect = LayoutDialect::detect(text);
    let keys = match dialect {
        LayoutDialect::Devicetree => physical::parse_physical_layout(text),
        LayoutDialect::KleJson => kle_json::parse_kle_layout(text),
    };

    if keys.is_empty() {
        warn!("No keys found in {:?} layout", dialect);
    } else {
        debug!("Parsed {} keys from {:?} layout", keys.len(), dialect);
    }
    keys
}

/// Parses keymap text of either dialect into a layer document.
#[must_use]
pub fn parse_keymap(text: &str) -> KeymapDocument {
    if text.trim().is_empty() {
        debug!("Keymap text is empty");
        return KeymapDocument::new();
    }

    let dialect = KeymapDialect::detect(text);
    let doc = match dialect {
        KeymapDialect::Devicetree => keymap_dts::parse_dts_keymap(text),
        KeymapDialect::QmkArray => keymap_qmk::parse_qmk_keymap(text),
    };

    if doc.is_empty() {
        warn!("No layers found in {:?} keymap", dialect);
    } else {
        debug!("Parsed {} layers from {:?} keymap", doc.len(), dialect);
    }
    doc
}
