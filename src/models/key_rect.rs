//! Screen-space rectangles produced by a draw pass.

use serde::Serialize;

/// Where one key landed on screen during the most recent draw.
///
/// `x`/`y` are the scaled, offset top-left anchor in pixels, `w`/`h` the
/// scaled size, and `r` the key rotation in degrees. Used only to find a
/// label's on-screen position, never to index geometry or layer data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedKeyRect {
    /// Canonical label drawn on the key
    pub label: String,
    /// Anchor X in pixels
    pub x: f64,
    /// Anchor Y in pixels
    pub y: f64,
    /// Width in pixels
    pub w: f64,
    /// Height in pixels
    pub h: f64,
    /// Rotation in degrees
    pub r: f64,
}

impl RenderedKeyRect {
    /// Centre of the drawn key body.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Finds the first rectangle drawn with `label`.
#[must_use]
pub fn find_by_label<'a>(rects: &'a [RenderedKeyRect], label: &str) -> Option<&'a RenderedKeyRect> {
    rects.iter().find(|rect| rect.label == label)
}
