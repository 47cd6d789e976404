//! ZMK devicetree physical-layout parser.
//!
//! Reads `&key_physical_attrs w h x y r rx ry` directives from the node whose
//! `compatible` is `"zmk,physical-layout"`. Every field is an integer in
//! hundredths (key-units for distances, degrees for `r`); negative values may
//! be written bare (`-50`) or parenthesized (`(-50)`).

use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::KeyGeometry;

static LAYOUT_COMPATIBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"compatible\s*=\s*"zmk,physical-layout""#).expect("valid layout marker regex")
});

static KEY_ATTRS: LazyLock<Regex> = LazyLock::new(|| {
    let field = r"\s+(-?\d+|\(-?\d+\))";
    Regex::new(&format!("&key_physical_attrs{}", field.repeat(7)))
        .expect("valid key attrs regex")
});

/// A key in integer hundredths, the unit shared by both layout dialects.
///
/// Deduplication compares these exact integers, so two keys that differ
/// only past the second decimal collapse into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CentiKey {
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Rotation (hundredths of a degree)
    pub r: i32,
    /// Pivot X
    pub rx: i32,
    /// Pivot Y
    pub ry: i32,
}

impl CentiKey {
    /// Replaces a non-positive width or height with one key-unit.
    #[must_use]
    pub fn with_drawable_size(mut self) -> Self {
        if self.w <= 0 || self.h <= 0 {
            warn!(
                "Key at ({}, {}) has size {}x{}, drawing it as 1u",
                self.x, self.y, self.w, self.h
            );
            if self.w <= 0 {
                self.w = 100;
            }
            if self.h <= 0 {
                self.h = 100;
            }
        }
        self
    }

    /// Converts to key-units and degrees.
    #[must_use]
    pub fn to_geometry(self) -> KeyGeometry {
        let unit = |v: i32| f64::from(v) / 100.0;
        KeyGeometry::new(unit(self.x), unit(self.y))
            .with_size(unit(self.w), unit(self.h))
            .with_rotation(unit(self.r), unit(self.rx), unit(self.ry))
    }
}

/// Drops exact duplicates, first occurrence wins.
///
/// Keys with a non-positive size keep their slot so later labels stay
/// aligned; see [`CentiKey::with_drawable_size`].
pub fn dedup_keys(keys: impl IntoIterator<Item = CentiKey>) -> Vec<KeyGeometry> {
    let unique: IndexSet<CentiKey> = keys.into_iter().collect();
    unique
        .into_iter()
        .map(|key| key.with_drawable_size().to_geometry())
        .collect()
}

/// Parses one attribute field, accepting the `(-N)` form.
fn parse_field(raw: &str) -> Option<i32> {
    raw.trim_start_matches('(').trim_end_matches(')').parse().ok()
}

/// Returns the body of the innermost `{ ... }` block enclosing the
/// physical-layout marker.
///
/// An unterminated block runs to the end of the text.
pub fn find_layout_block(text: &str) -> Option<&str> {
    let marker = LAYOUT_COMPATIBLE.find(text)?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut open = None;
    for idx in (0..marker.start()).rev() {
        match bytes[idx] {
            b'}' => depth += 1,
            b'{' if depth == 0 => {
                open = Some(idx);
                break;
            }
            b'{' => depth -= 1,
            _ => {}
        }
    }
    let open = open?;

    let mut depth = 0usize;
    for (idx, byte) in bytes.iter().enumerate().skip(open + 1) {
        match byte {
            b'{' => depth += 1,
            b'}' if depth == 0 => return Some(&text[open + 1..idx]),
            b'}' => depth -= 1,
            _ => {}
        }
    }
    debug!("Physical layout block is not closed, reading to end of text");
    Some(&text[open + 1..])
}

/// Parses the first physical-layout node in `text`.
#[must_use]
pub fn parse_physical_layout(text: &str) -> Vec<KeyGeometry> {
    let Some(block) = find_layout_block(text) else {
        warn!("No zmk,physical-layout block found");
        return Vec::new();
    };

    let keys = KEY_ATTRS.captures_iter(block).filter_map(|caps| {
        let fields: Option<Vec<i32>> = (1..=7).map(|i| parse_field(&caps[i])).collect();
        match fields.as_deref() {
            Some(&[w, h, x, y, r, rx, ry]) => Some(CentiKey { w, h, x, y, r, rx, ry }),
            _ => {
                warn!("Skipping unreadable directive: {}", &caps[0]);
                None
            }
        }
    });

    dedup_keys(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
/ {
    physical_layout0: physical_layout_0 {
        compatible = "zmk,physical-layout";
        display-name = "Default";
        keys
            = <&key_physical_attrs 100 100 0 0 0 0 0>
            , <&key_physical_attrs 100 100 100 0 0 0 0>
            , <&key_physical_attrs 150 100 0 100 (-1500) 75 150>
            ;
    };
};
"#;

    #[test]
    fn test_parse_sample() {
        let keys = parse_physical_layout(SAMPLE);
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0], KeyGeometry::new(0.0, 0.0));
        assert_eq!(keys[1], KeyGeometry::new(1.0, 0.0));
        assert_eq!(
            keys[2],
            KeyGeometry::new(0.0, 1.0)
                .with_size(1.5, 1.0)
                .with_rotation(-15.0, 0.75, 1.5)
        );
    }

    #[test]
    fn test_duplicates_collapse_in_order() {
        let text = r#"layout { compatible = "zmk,physical-layout"; keys
            = <&key_physical_attrs 100 100 0 0 0 0 0>
            , <&key_physical_attrs 100 100 100 0 0 0 0>
            , <&key_physical_attrs 100 100 0 0 0 0 0>; };"#;
        let keys = parse_physical_layout(text);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].x, 0.0);
        assert_eq!(keys[1].x, 1.0);
    }

    #[test]
    fn test_bare_and_parenthesized_negatives_agree() {
        assert_eq!(parse_field("-50"), Some(-50));
        assert_eq!(parse_field("(-50)"), Some(-50));
        assert_eq!(parse_field("75"), Some(75));
    }

    #[test]
    fn test_only_layout_block_is_read() {
        let text = r#"
other { &key_physical_attrs 100 100 900 900 0 0 0 };
layout { compatible = "zmk,physical-layout"; keys = <&key_physical_attrs 100 100 0 0 0 0 0>; };
"#;
        let keys = parse_physical_layout(text);
        assert_eq!(keys, vec![KeyGeometry::new(0.0, 0.0)]);
    }

    #[test]
    fn test_zero_size_key_keeps_its_slot() {
        let text = r#"layout { compatible = "zmk,physical-layout"; keys
            = <&key_physical_attrs 100 100 0 0 0 0 0>
            , <&key_physical_attrs 0 100 100 0 0 0 0>
            , <&key_physical_attrs 100 (-50) 200 0 0 0 0>
            , <&key_physical_attrs 100 100 300 0 0 0 0>; };"#;
        let keys = parse_physical_layout(text);
        assert_eq!(keys.len(), 4);
        assert_eq!(keys[1], KeyGeometry::new(1.0, 0.0));
        assert_eq!(keys[2], KeyGeometry::new(2.0, 0.0));
        assert_eq!(keys[3].x, 3.0);
    }

    #[test]
    fn test_missing_block() {
        assert!(parse_physical_layout("keymap { };").is_empty());
    }

    #[test]
    fn test_unterminated_block_reads_to_end() {
        let text = r#"layout { compatible = "zmk,physical-layout"; keys = <&key_physical_attrs 100 100 0 0 0 0 0>"#;
        assert_eq!(parse_physical_layout(text).len(), 1);
    }
}
