use glam::DVec2;

use crate::geo::{GeoPoint, DEGS_IN_CIRCLE};
use crate::map::plane::PlanarPoint;

/// Slack for boundary-inclusive containment tests on half-degree seams.
const EDGE_EPS: f64 = 1e-9;

/// The twelve facets of the standard interrupted layout, in table order.
/// Order is significant: facet inference takes the first match, and the
/// stitching scripts in `circles.rs` name facets by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FacetId {
    NorthAmerica,
    NorthAtlantic,
    NorthAfricaEurope,
    NorthAsia,
    NorthPacific,
    SouthPacificFar,
    SouthPacificNear,
    SouthAmericas,
    SouthAfrica,
    SouthIndian,
    SouthAustralia,
    SouthPacificEast,
}

impl FacetId {
    pub const ALL: [FacetId; 12] = [
        FacetId::NorthAmerica,
        FacetId::NorthAtlantic,
        FacetId::NorthAfricaEurope,
        FacetId::NorthAsia,
        FacetId::NorthPacific,
        FacetId::SouthPacificFar,
        FacetId::SouthPacificNear,
        FacetId::SouthAmericas,
        FacetId::SouthAfrica,
        FacetId::SouthIndian,
        FacetId::SouthAustralia,
        FacetId::SouthPacificEast,
    ];

    /// The five facets of the attached northern strip, west to east.
    pub const NORTH_STRIP: [FacetId; 5] = [
        FacetId::NorthAmerica,
        FacetId::NorthAtlantic,
        FacetId::NorthAfricaEurope,
        FacetId::NorthAsia,
        FacetId::NorthPacific,
    ];
}

/// Rigid placement of a facet's lat/lon rectangle onto the plane:
/// `geo_anchor` maps to `plane_anchor`, axes scaled by the projector's
/// units-per-degree and rotated by `rotation_deg` (screen coords, y down).
#[derive(Clone, Copy, Debug)]
pub struct Placement {
    pub geo_anchor: GeoPoint,
    pub plane_anchor: PlanarPoint,
    pub rotation_deg: f64,
}

/// One rectangular lat/lon region of the globe with its own planar
/// placement rule. `antimeridian` marks facets whose eastern bound runs
/// past 180°; `ne.lon` stays stored in wrapped form and
/// [`Facet::east_lon`] gives the extended bound.
#[derive(Clone, Copy, Debug)]
pub struct Facet {
    pub id: FacetId,
    pub sw: GeoPoint,
    pub ne: GeoPoint,
    pub antimeridian: bool,
    pub placement: Placement,
}

impl Facet {
    /// Eastern longitude bound, extended past 180° when the facet
    /// straddles the antimeridian.
    pub fn east_lon(&self) -> f64 {
        if self.antimeridian {
            self.ne.lon + DEGS_IN_CIRCLE
        } else {
            self.ne.lon
        }
    }

    pub fn sw_corner(&self) -> GeoPoint {
        self.sw
    }

    pub fn ne_corner(&self) -> GeoPoint {
        self.ne
    }

    pub fn nw_corner(&self) -> GeoPoint {
        GeoPoint::new(self.ne.lat, self.sw.lon)
    }

    pub fn se_corner(&self) -> GeoPoint {
        GeoPoint::new(self.sw.lat, self.ne.lon)
    }

    /// Bring a longitude into this facet's [west, east] span where a
    /// ±360° shift does so; otherwise return it unchanged.
    fn unwrap_lon(&self, lon: f64) -> f64 {
        let west = self.sw.lon;
        let east = self.east_lon();
        if lon < west - EDGE_EPS && lon + DEGS_IN_CIRCLE <= east + EDGE_EPS {
            lon + DEGS_IN_CIRCLE
        } else if lon > east + EDGE_EPS && lon - DEGS_IN_CIRCLE >= west - EDGE_EPS {
            lon - DEGS_IN_CIRCLE
        } else {
            lon
        }
    }

    /// Boundary-inclusive containment. Points on a shared edge are
    /// contained by both neighbours; inference order breaks the tie.
    /// Longitude is tested directly and shifted by +360° against the
    /// extended eastern bound, so antimeridian facets match on both
    /// sides of the wrap.
    pub fn contains(&self, p: GeoPoint) -> bool {
        if p.lat < self.sw.lat - EDGE_EPS || p.lat > self.ne.lat + EDGE_EPS {
            return false;
        }
        let in_span = |lon: f64| {
            lon >= self.sw.lon - EDGE_EPS && lon <= self.east_lon() + EDGE_EPS
        };
        in_span(p.lon) || in_span(p.lon + DEGS_IN_CIRCLE)
    }

    /// Place a geographic point on the plane under this facet's rule.
    /// The point need not lie inside the rectangle; the mapping is the
    /// same linear rule everywhere, which is what lets seam-adjacent
    /// callers pin a boundary vertex to a chosen facet.
    pub fn place(&self, p: GeoPoint, units_per_degree: f64) -> PlanarPoint {
        let lon = self.unwrap_lon(p.lon);
        let u = (lon - self.placement.geo_anchor.lon) * units_per_degree;
        let v = -(p.lat - self.placement.geo_anchor.lat) * units_per_degree;
        let rot = DVec2::from_angle(self.placement.rotation_deg.to_radians());
        self.placement.plane_anchor.translated(rot.rotate(DVec2::new(u, v)))
    }
}

/// Ordered facet collection. The standard table is the fixed topological
/// layout the stitching scripts are written against; custom tables are
/// supported for testing and alternative configurations.
#[derive(Clone, Debug)]
pub struct FacetTable {
    facets: Vec<Facet>,
}

impl FacetTable {
    pub fn new(facets: Vec<Facet>) -> Self {
        Self { facets }
    }

    /// The standard 12-facet interrupted layout: a five-facet northern
    /// strip, an attached mid-southern strip, and two detached southern
    /// wings rotated ±12° about their equator anchors. Adjacent facets
    /// within a strip or wing share placements exactly, so their seams
    /// are coincident; wing tops and the 190.5°/-169.5° seam are cuts
    /// that need explicit facet selection.
    pub fn standard() -> Self {
        fn rect(
            id: FacetId,
            lat0: f64,
            lat1: f64,
            lon0: f64,
            lon1: f64,
            antimeridian: bool,
            placement: Placement,
        ) -> Facet {
            Facet {
                id,
                sw: GeoPoint::new(lat0, lon0),
                ne: GeoPoint::new(lat1, lon1),
                antimeridian,
                placement,
            }
        }

        // Attached strips: x = lon + 169.5, y = -lat, no rotation.
        fn strip(lon: f64) -> Placement {
            Placement {
                geo_anchor: GeoPoint::new(0.0, lon),
                plane_anchor: PlanarPoint::new(lon + 169.5, 0.0),
                rotation_deg: 0.0,
            }
        }

        let west_wing = Placement {
            geo_anchor: GeoPoint::new(0.0, -97.5),
            plane_anchor: PlanarPoint::new(32.0, 25.0),
            rotation_deg: -12.0,
        };
        let east_wing = Placement {
            geo_anchor: GeoPoint::new(0.0, 118.5),
            plane_anchor: PlanarPoint::new(328.0, 25.0),
            rotation_deg: 12.0,
        };

        use FacetId::*;
        Self::new(vec![
            rect(NorthAmerica, 0.0, 90.0, -169.5, -97.5, false, strip(-169.5)),
            rect(NorthAtlantic, 0.0, 90.0, -97.5, -25.5, false, strip(-97.5)),
            rect(NorthAfricaEurope, 0.0, 90.0, -25.5, 46.5, false, strip(-25.5)),
            rect(NorthAsia, 0.0, 90.0, 46.5, 118.5, false, strip(46.5)),
            rect(NorthPacific, 0.0, 90.0, 118.5, -169.5, true, strip(118.5)),
            rect(SouthPacificFar, -90.0, 0.0, -169.5, -133.5, false, west_wing),
            rect(SouthPacificNear, -90.0, 0.0, -133.5, -97.5, false, west_wing),
            rect(SouthAmericas, -90.0, 0.0, -97.5, -25.5, false, strip(-97.5)),
            rect(SouthAfrica, -90.0, 0.0, -25.5, 46.5, false, strip(-25.5)),
            rect(SouthIndian, -90.0, 0.0, 46.5, 118.5, false, strip(46.5)),
            rect(SouthAustralia, -90.0, 0.0, 118.5, 154.5, false, east_wing),
            rect(SouthPacificEast, -90.0, 0.0, 154.5, -169.5, true, east_wing),
        ])
    }

    pub fn get(&self, id: FacetId) -> &Facet {
        self.facets
            .iter()
            .find(|f| f.id == id)
            .unwrap_or_else(|| panic!("facet table has no facet {id:?}"))
    }

    /// First facet containing `p`, in table order.
    pub fn find(&self, p: GeoPoint) -> Option<&Facet> {
        self.facets.iter().find(|f| f.contains(p))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Facet> {
        self.facets.iter()
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_tiles_the_sphere() {
        let table = FacetTable::standard();
        for lat10 in -900..=900 {
            let lat = lat10 as f64 / 10.0;
            for lon in -180..180 {
                let p = GeoPoint::new(lat, lon as f64 + 0.25);
                assert!(
                    table.find(p).is_some(),
                    "({lat}, {}) not covered by any facet",
                    p.lon
                );
            }
        }
    }

    #[test]
    fn test_antimeridian_extension() {
        let table = FacetTable::standard();
        let f = table.get(FacetId::NorthPacific);
        assert_eq!(f.east_lon(), 190.5);
        assert!(f.contains(GeoPoint::new(45.0, 185.0)));
        assert!(f.contains(GeoPoint::new(45.0, -175.0)));
        assert!(!f.contains(GeoPoint::new(45.0, -169.0)));
    }

    #[test]
    fn test_attached_strip_seams_coincide() {
        let table = FacetTable::standard();
        // Meridian seam within the northern strip.
        let a = table.get(FacetId::NorthAmerica);
        let b = table.get(FacetId::NorthAtlantic);
        for lat in [0.0, 30.0, 90.0] {
            let p = GeoPoint::new(lat, -97.5);
            let pa = a.place(p, 1.0);
            let pb = b.place(p, 1.0);
            assert!((pa.x() - pb.x()).abs() < 1e-9);
            assert!((pa.y() - pb.y()).abs() < 1e-9);
        }
        // Equator seam between the strips.
        let n = table.get(FacetId::NorthAtlantic);
        let s = table.get(FacetId::SouthAmericas);
        let p = GeoPoint::new(0.0, -60.0);
        assert!((n.place(p, 1.0).x() - s.place(p, 1.0).x()).abs() < 1e-9);
        assert!((n.place(p, 1.0).y() - s.place(p, 1.0).y()).abs() < 1e-9);
    }

    #[test]
    fn test_wing_seam_coincides_internally() {
        let table = FacetTable::standard();
        let a = table.get(FacetId::SouthPacificFar);
        let b = table.get(FacetId::SouthPacificNear);
        let p = GeoPoint::new(-40.0, -133.5);
        assert_eq!(a.place(p, 1.0), b.place(p, 1.0));
    }

    #[test]
    fn test_wing_top_is_a_cut() {
        let table = FacetTable::standard();
        let wing = table.get(FacetId::SouthPacificNear);
        let strip = table.get(FacetId::NorthAtlantic);
        let p = GeoPoint::new(0.0, -110.0);
        let d = wing.place(p, 1.0).0 - strip.place(p, 1.0).0;
        assert!(d.length() > 1.0, "wing top must be detached from the strip");
    }

    #[test]
    fn test_inference_order_breaks_boundary_ties() {
        let table = FacetTable::standard();
        // Equator points belong to the northern strip first.
        assert_eq!(table.find(GeoPoint::new(0.0, -60.0)).unwrap().id, FacetId::NorthAtlantic);
        // The -97.5 meridian below the equator belongs to the wing
        // before the attached strip.
        assert_eq!(
            table.find(GeoPoint::new(-10.0, -97.5)).unwrap().id,
            FacetId::SouthPacificNear
        );
    }

    #[test]
    fn test_extended_longitude_inference() {
        let table = FacetTable::standard();
        assert_eq!(table.find(GeoPoint::new(10.0, 185.5)).unwrap().id, FacetId::NorthPacific);
        assert_eq!(
            table.find(GeoPoint::new(-10.0, 185.5)).unwrap().id,
            FacetId::SouthPacificEast
        );
    }
}
