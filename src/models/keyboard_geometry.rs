//! Physical key geometry shared by every layout dialect.

use serde::{Deserialize, Serialize};

/// One physical key's position, size and rotation.
///
/// All distances are in key-units (1.0 = one standard 1u keycap). The
/// rotation `r` is in degrees and is applied about the pivot `(rx, ry)`.
///
/// # Validation
///
/// - `w` and `h` must be strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyGeometry {
    /// Left edge in key-units
    pub x: f64,
    /// Top edge in key-units
    pub y: f64,
    /// Width in key-units (default 1.0)
    pub w: f64,
    /// Height in key-units (default 1.0)
    pub h: f64,
    /// Rotation in degrees (default 0.0)
    pub r: f64,
    /// Rotation pivot X in key-units
    pub rx: f64,
    /// Rotation pivot Y in key-units
    pub ry: f64,
}

impl KeyGeometry {
    /// Creates an unrotated 1u key at the given position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            w: 1.0,
            h: 1.0,
            r: 0.0,
            rx: 0.0,
            ry: 0.0,
        }
    }

    /// Sets the key size.
    #[must_use]
    pub const fn with_size(mut self, w: f64, h: f64) -> Self {
        self.w = w;
        self.h = h;
        self
    }

    /// Sets the rotation angle and its pivot.
    #[must_use]
    pub const fn with_rotation(mut self, r: f64, rx: f64, ry: f64) -> Self {
        self.r = r;
        self.rx = rx;
        self.ry = ry;
        self
    }

    /// Returns true when the key has a drawable (positive) size.
    #[must_use]
    pub fn has_valid_size(&self) -> bool {
        self.w > 0.0 && self.h > 0.0
    }

    /// Returns true when the key carries a rotation.
    #[must_use]
    pub fn is_rotated(&self) -> bool {
        self.r != 0.0
    }
}

impl Default for KeyGeometry {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_geometry_new() {
        let key = KeyGeometry::new(2.0, 1.0);
        assert_eq!(key.x, 2.0);
        assert_eq!(key.y, 1.0);
        assert_eq!(key.w, 1.0);
        assert_eq!(key.h, 1.0);
        assert_eq!(key.r, 0.0);
        assert_eq!(key.rx, 0.0);
        assert_eq!(key.ry, 0.0);
        assert!(!key.is_rotated());
    }

    #[test]
    fn test_key_geometry_builder() {
        let key = KeyGeometry::new(0.0, 0.0)
            .with_size(1.5, 2.0)
            .with_rotation(15.0, 3.0, 4.0);

        assert_eq!(key.w, 1.5);
        assert_eq!(key.h, 2.0);
        assert_eq!(key.r, 15.0);
        assert_eq!(key.rx, 3.0);
        assert_eq!(key.ry, 4.0);
        assert!(key.is_rotated());
    }

    #[test]
    fn test_has_valid_size() {
        assert!(KeyGeometry::default().has_valid_size());
        assert!(!KeyGeometry::new(0.0, 0.0).with_size(0.0, 1.0).has_valid_size());
        assert!(!KeyGeometry::new(0.0, 0.0).with_size(1.0, -1.0).has_valid_size());
    }
}
