//! Layout-space math: bounding boxes, auto-fit scale and rotation.

use serde::{Deserialize, Serialize};

use crate::models::KeyGeometry;

/// Which key extents feed the bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundsPolicy {
    /// Unrotated `x, y, x + w, y + h` rectangles
    #[default]
    Unrotated,
    /// Corners of each key after its rotation
    Rotated,
}

/// Axis-aligned rectangle in layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest X
    pub min_x: f64,
    /// Smallest Y
    pub min_y: f64,
    /// Largest X
    pub max_x: f64,
    /// Largest Y
    pub max_y: f64,
}

impl Bounds {
    /// Width of the box.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    fn include(&mut self, (x, y): (f64, f64)) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

/// Rotates `point` by `degrees` about `pivot`.
#[must_use]
pub fn rotate_point(point: (f64, f64), pivot: (f64, f64), degrees: f64) -> (f64, f64) {
    if degrees == 0.0 {
        return point;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = point.0 - pivot.0;
    let dy = point.1 - pivot.1;
    (pivot.0 + dx * cos - dy * sin, pivot.1 + dx * sin + dy * cos)
}

/// Corners of a key after the full draw transform: anchor rotated about the
/// pivot, then the body rotated about its own center.
#[must_use]
pub fn rotated_corners(key: &KeyGeometry) -> [(f64, f64); 4] {
    let (ax, ay) = rotate_point((key.x, key.y), (key.rx, key.ry), key.r);
    let center = (ax + key.w / 2.0, ay + key.h / 2.0);
    [
        (ax, ay),
        (ax + key.w, ay),
        (ax + key.w, ay + key.h),
        (ax, ay + key.h),
    ]
    .map(|corner| rotate_point(corner, center, key.r))
}

/// Bounding box of all keys, or `None` for an empty layout.
#[must_use]
pub fn layout_bounds(keys: &[KeyGeometry], policy: BoundsPolicy) -> Option<Bounds> {
    if keys.is_empty() {
        return None;
    }

    let mut bounds = Bounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    for key in keys {
        match policy {
            BoundsPolicy::Unrotated => {
                bounds.include((key.x, key.y));
                bounds.include((key.x + key.w, key.y + key.h));
            }
            BoundsPolicy::Rotated => rotated_corners(key)
                .into_iter()
                .for_each(|corner| bounds.include(corner)),
        }
    }
    Some(bounds)
}

/// Uniform scale and offset that map layout units onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    /// Pixels per layout unit
    pub scale: f64,
    /// Horizontal offset in pixels
    pub offset_x: f64,
    /// Vertical offset in pixels
    pub offset_y: f64,
}

impl Fit {
    /// Fits `bounds` into a `width x height` canvas at `ratio` of the
    /// limiting dimension, centered on both axes.
    ///
    /// A zero-extent axis does not constrain the scale. If both axes are
    /// degenerate the scale is 1.
    #[must_use]
    pub fn compute(bounds: &Bounds, width: f64, height: f64, ratio: f64) -> Self {
        let scale_x = (bounds.width() > 0.0).then(|| ratio * width / bounds.width());
        let scale_y = (bounds.height() > 0.0).then(|| ratio * height / bounds.height());
        let scale = match (scale_x, scale_y) {
            (Some(sx), Some(sy)) => sx.min(sy),
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => 1.0,
        };

        Self {
            scale,
            offset_x: (width - bounds.width() * scale) / 2.0 - bounds.min_x * scale,
            offset_y: (height - bounds.height() * scale) / 2.0 - bounds.min_y * scale,
        }
    }

    /// Maps a layout point to canvas pixels.
    #[must_use]
    pub fn apply(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x * self.scale + self.offset_x, y * self.scale + self.offset_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rotate_point_quarter_turn() {
        let (x, y) = rotate_point((1.0, 0.0), (0.0, 0.0), 90.0);
        assert!(approx(x, 0.0));
        assert!(approx(y, 1.0));
        assert_eq!(rotate_point((3.0, 4.0), (1.0, 1.0), 0.0), (3.0, 4.0));
    }

    #[test]
    fn test_unrotated_bounds_ignore_rotation() {
        let keys = [
            KeyGeometry::new(0.0, 0.0),
            KeyGeometry::new(2.0, 1.0).with_rotation(45.0, 0.0, 0.0),
        ];
        let bounds = layout_bounds(&keys, BoundsPolicy::Unrotated).unwrap();
        assert_eq!(bounds, Bounds { min_x: 0.0, min_y: 0.0, max_x: 3.0, max_y: 2.0 });
    }

    #[test]
    fn test_rotated_bounds_cover_corners() {
        let keys = [KeyGeometry::new(0.0, 0.0).with_rotation(45.0, 0.0, 0.0)];
        let bounds = layout_bounds(&keys, BoundsPolicy::Rotated).unwrap();
        let half_diag = std::f64::consts::SQRT_2 / 2.0;
        assert!(approx(bounds.min_x, 0.5 - half_diag));
        assert!(approx(bounds.max_y, 0.5 + half_diag));
    }

    #[test]
    fn test_empty_layout_has_no_bounds() {
        assert!(layout_bounds(&[], BoundsPolicy::Unrotated).is_none());
    }

    #[test]
    fn test_fit_limited_by_width() {
        let bounds = Bounds { min_x: 0.0, min_y: 0.0, max_x: 10.0, max_y: 2.0 };
        let fit = Fit::compute(&bounds, 1000.0, 500.0, 0.9);
        assert!(approx(fit.scale, 90.0));
        assert!(approx(fit.offset_x, 50.0));
        assert!(approx(fit.offset_y, 160.0));
    }

    #[test]
    fn test_fit_centers_offset_layout() {
        let bounds = Bounds { min_x: 2.0, min_y: 1.0, max_x: 4.0, max_y: 3.0 };
        let fit = Fit::compute(&bounds, 200.0, 200.0, 0.9);
        let (left, top) = fit.apply((2.0, 1.0));
        let (right, bottom) = fit.apply((4.0, 3.0));
        assert!(approx(left, 200.0 - right));
        assert!(approx(top, 200.0 - bottom));
    }
}
