/// Degrees in a full circle.
pub const DEGS_IN_CIRCLE: f64 = 360.0;

/// Degrees in a quarter circle (pole to equator).
pub const QUARTER_TURN: f64 = 90.0;

/// Earth's axial tilt in degrees; fixes the tropic and polar circle latitudes.
pub const EARTH_TILT: f64 = 23.43;

/// A geographic point in degrees. Latitude in [-90, 90]; longitude is
/// logically (-180, 180] but may run past 180 when a caller is working
/// inside a facet's antimeridian extension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// The point one `dlon` degrees east at the same latitude.
    pub fn east(self, dlon: f64) -> Self {
        Self::new(self.lat, self.lon + dlon)
    }
}

/// Normalize longitude to (-180, 180].
#[inline(always)]
pub fn wrap_lon(lon: f64) -> f64 {
    let w = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if w == -180.0 { 180.0 } else { w }
}
