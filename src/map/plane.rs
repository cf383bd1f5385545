use std::fmt;

use glam::{DAffine2, DVec2};

/// A point on the projected plane. Backed by a `DVec2`; all operations
/// return new values, there is no shared mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlanarPoint(pub DVec2);

impl PlanarPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    pub fn x(self) -> f64 {
        self.0.x
    }

    pub fn y(self) -> f64 {
        self.0.y
    }

    /// Translate by a delta vector.
    pub fn translated(self, delta: DVec2) -> Self {
        Self(self.0 + delta)
    }

    /// Scale about the origin.
    pub fn scaled(self, k: f64) -> Self {
        Self(self.0 * k)
    }

    /// Rotate about the origin by `deg` degrees (screen coordinates,
    /// y down: positive angles turn clockwise on screen).
    pub fn rotated(self, deg: f64) -> Self {
        Self(DVec2::from_angle(deg.to_radians()).rotate(self.0))
    }

    /// Apply a full affine transform.
    pub fn transformed(self, t: DAffine2) -> Self {
        Self(t.transform_point2(self.0))
    }

    /// Bearing from this point towards `other`, in degrees, measured in
    /// screen coordinates (0° = +x, 90° = +y, i.e. downwards).
    pub fn bearing_to(self, other: Self) -> f64 {
        let d = other.0 - self.0;
        d.y.atan2(d.x).to_degrees()
    }
}

impl From<DVec2> for PlanarPoint {
    fn from(v: DVec2) -> Self {
        Self(v)
    }
}

/// Path output precision: 3 fractional digits, for byte-stable output
/// and bounded file size.
impl fmt::Display for PlanarPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3},{:.3}", self.0.x, self.0.y)
    }
}
