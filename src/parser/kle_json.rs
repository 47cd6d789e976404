//! JSON layout parser for `info.json`-style files.
//!
//! Only the first entry of the top-level `layouts` object is read. Key
//! fields default to `x = y = r = rx = ry = 0` and `w = h = 1`; a width or
//! height of zero also falls back to 1. Distances are snapped to hundredths
//! like the devicetree path, while `r` is kept as written. Entries map one
//! to one onto keys in document order; nothing is deduplicated.

#![allow(clippy::cast_possible_truncation)]

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

use super::physical::CentiKey;
use crate::models::KeyGeometry;

/// Top-level JSON layout file (only the fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutFile {
    /// Named layouts in document order
    #[serde(default)]
    pub layouts: Option<IndexMap<String, LayoutDefinition>>,
}

/// One named layout.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutDefinition {
    /// Physical key entries
    #[serde(default)]
    pub layout: Vec<KeyPosition>,
}

/// Key entry; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyPosition {
    /// Left edge in key-units
    pub x: Option<f64>,
    /// Top edge in key-units
    pub y: Option<f64>,
    /// Width in key-units
    pub w: Option<f64>,
    /// Height in key-units
    pub h: Option<f64>,
    /// Rotation in degrees
    pub r: Option<f64>,
    /// Pivot X in key-units
    pub rx: Option<f64>,
    /// Pivot Y in key-units
    pub ry: Option<f64>,
}

fn centi(value: f64) -> i32 {
    (value * 100.0).round() as i32
}

fn size_or_one(value: Option<f64>) -> f64 {
    value.filter(|v| *v != 0.0).unwrap_or(1.0)
}

impl KeyPosition {
    fn to_geometry(&self) -> KeyGeometry {
        let key = CentiKey {
            w: centi(size_or_one(self.w)),
            h: centi(size_or_one(self.h)),
            x: centi(self.x.unwrap_or(0.0)),
            y: centi(self.y.unwrap_or(0.0)),
            r: 0,
            rx: centi(self.rx.unwrap_or(0.0)),
            ry: centi(self.ry.unwrap_or(0.0)),
        }
        .with_drawable_size()
        .to_geometry();
        key.with_rotation(self.r.unwrap_or(0.0), key.rx, key.ry)
    }
}

/// Parses JSON text and returns the first layout's keys.
pub fn try_parse_kle_layout(text: &str) -> Result<Vec<KeyGeometry>> {
    let file: LayoutFile =
        serde_json::from_str(text).context("Failed to parse layout JSON")?;

    let Some((name, definition)) = file.layouts.as_ref().and_then(|l| l.first()) else {
        debug!("Layout JSON has no layouts");
        return Ok(Vec::new());
    };

    debug!("Using layout '{}' with {} entries", name, definition.layout.len());
    Ok(definition.layout.iter().map(KeyPosition::to_geometry).collect())
}

/// Parses JSON text, logging and returning an empty list on failure.
#[must_use]
pub fn parse_kle_layout(text: &str) -> Vec<KeyGeometry> {
    try_parse_kle_layout(text).unwrap_or_else(|err| {
        warn!("{:#}", err);
        Vec::new()
    })
}
