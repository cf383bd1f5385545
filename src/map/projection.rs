use crate::geo::GeoPoint;
use crate::map::facets::{FacetId, FacetTable};
use crate::map::plane::PlanarPoint;

/// Immutable per-render-pass configuration of the projection surface.
#[derive(Clone, Debug)]
pub struct MapConfig {
    /// Plane-space offset of the viewBox origin.
    pub view_origin: PlanarPoint,
    /// Output width in plane units.
    pub width: f64,
    /// Output height in plane units.
    pub height: f64,
    /// Rotation of the whole map frame, applied by the drawing sink.
    pub frame_rotation_deg: f64,
    /// Linear scale of every facet placement.
    pub units_per_degree: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            view_origin: PlanarPoint::new(45.0, 95.0),
            width: 445.0,
            height: 225.0,
            frame_rotation_deg: 0.0,
            units_per_degree: 1.0,
        }
    }
}

/// The projection engine: maps geographic points onto the plane through
/// the facet table. Holds no mutable state; one value is shared by all
/// generators for a render pass.
#[derive(Clone, Debug)]
pub struct Projector {
    pub config: MapConfig,
    pub table: FacetTable,
}

impl Projector {
    pub fn new(config: MapConfig, table: FacetTable) -> Self {
        Self { config, table }
    }

    pub fn standard() -> Self {
        Self::new(MapConfig::default(), FacetTable::standard())
    }

    /// Project a point, inferring its facet from the table (first match
    /// in table order).
    ///
    /// # Panics
    ///
    /// Panics if no facet contains the point. The facet table must tile
    /// the sphere; a miss is a configuration error, not a data error.
    pub fn project(&self, p: GeoPoint) -> PlanarPoint {
        let facet = self.table.find(p).unwrap_or_else(|| {
            panic!(
                "({}, {}) lies outside every facet; the facet table must tile the sphere",
                p.lat, p.lon
            )
        });
        facet.place(p, self.config.units_per_degree)
    }

    /// Project a point under an explicitly chosen facet's placement.
    /// Required for seam-adjacent vertices: a boundary point is contained
    /// by both neighbours, and only the caller knows which placement
    /// keeps the path continuous with its neighbouring points.
    pub fn project_in(&self, p: GeoPoint, facet: FacetId) -> PlanarPoint {
        self.table.get(facet).place(p, self.config.units_per_degree)
    }

    /// Bearing of the local east direction at `p`, in degrees: the
    /// direction towards the point one degree further east, as seen on
    /// the plane. Approximates the projection's east tangent, so label
    /// rotation follows local map distortion.
    pub fn east_bearing(&self, p: GeoPoint) -> f64 {
        self.project(p).bearing_to(self.project(p.east(1.0)))
    }
}
