use std::fmt::Write;

use geojson::{LineStringType, PolygonType, Value};

use crate::geo::GeoPoint;
use crate::map::facets::FacetId;
use crate::map::plane::PlanarPoint;
use crate::map::projection::Projector;

/// One stitched polyline on the plane.
pub type PointList = Vec<PlanarPoint>;

/// Assemble a compound SVG path description from point lists: each list
/// opens with `M`, continues with `L`, and appends `z` when `close` is
/// set. Emission order is preserved. Coordinates render at the fixed
/// 3-decimal precision of [`PlanarPoint`]'s `Display`.
pub fn compound_path(lists: &[PointList], close: bool) -> String {
    let mut d = String::new();
    for list in lists {
        for (idx, point) in list.iter().enumerate() {
            let cmd = if idx == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{point}");
        }
        if close {
            d.push('z');
        }
    }
    d
}

/// Project a GeoJSON geometry and synthesize its path description in one
/// pass. Line geometries stay open; polygon rings are force-closed, each
/// ring an independent subpath (holes rely on the sink's fill rule).
/// Pure: identical input always yields an identical string.
///
/// # Panics
///
/// Panics on geometry kinds that have no path form (points,
/// collections); feeding one here is an input-contract violation.
pub fn geometry_path(proj: &Projector, geometry: &Value, facet: Option<FacetId>) -> String {
    match geometry {
        Value::LineString(line) => compound_path(&[project_line(proj, line, facet)], false),
        Value::MultiLineString(lines) => {
            let lists: Vec<PointList> =
                lines.iter().map(|l| project_line(proj, l, facet)).collect();
            compound_path(&lists, false)
        }
        Value::Polygon(rings) => compound_path(&project_rings(proj, rings, facet), true),
        Value::MultiPolygon(polygons) => {
            let lists: Vec<PointList> = polygons
                .iter()
                .flat_map(|rings| project_rings(proj, rings, facet))
                .collect();
            compound_path(&lists, true)
        }
        other => panic!("geometry {} has no path form", other.type_name()),
    }
}

fn project_line(proj: &Projector, line: &LineStringType, facet: Option<FacetId>) -> PointList {
    line.iter()
        .map(|position| {
            // GeoJSON positions are [lon, lat].
            let p = GeoPoint::new(position[1], position[0]);
            match facet {
                Some(id) => proj.project_in(p, id),
                None => proj.project(p),
            }
        })
        .collect()
}

fn project_rings(proj: &Projector, rings: &PolygonType, facet: Option<FacetId>) -> Vec<PointList> {
    rings.iter().map(|ring| project_line(proj, ring, facet)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_path_move_line_close() {
        let lists = vec![
            vec![PlanarPoint::new(0.0, 0.0), PlanarPoint::new(1.0, 0.0), PlanarPoint::new(1.0, 1.0)],
            vec![PlanarPoint::new(2.0, 2.0), PlanarPoint::new(3.0, 2.0)],
        ];
        assert_eq!(
            compound_path(&lists, true),
            "M0.000,0.000L1.000,0.000L1.000,1.000zM2.000,2.000L3.000,2.000z"
        );
        assert_eq!(
            compound_path(&lists, false),
            "M0.000,0.000L1.000,0.000L1.000,1.000M2.000,2.000L3.000,2.000"
        );
    }

    #[test]
    fn test_line_geometry_stays_open() {
        let proj = Projector::standard();
        let line = Value::LineString(vec![vec![-120.0, 40.0], vec![-119.0, 41.0]]);
        let d = geometry_path(&proj, &line, None);
        assert!(d.starts_with('M'));
        assert!(!d.contains('z'));
    }

    #[test]
    fn test_polygon_rings_close_independently() {
        let proj = Projector::standard();
        let polygon = Value::MultiPolygon(vec![vec![
            vec![vec![-120.0, 40.0], vec![-119.0, 40.0], vec![-119.0, 41.0], vec![-120.0, 40.0]],
            vec![vec![-119.8, 40.2], vec![-119.2, 40.2], vec![-119.5, 40.6], vec![-119.8, 40.2]],
        ]]);
        let d = geometry_path(&proj, &polygon, None);
        assert_eq!(d.matches('z').count(), 2);
        assert_eq!(d.matches('M').count(), 2);
    }

    #[test]
    fn test_geometry_path_is_deterministic() {
        let proj = Projector::standard();
        let line = Value::LineString(vec![vec![10.0, 50.0], vec![11.33333, 50.77777]]);
        assert_eq!(geometry_path(&proj, &line, None), geometry_path(&proj, &line, None));
    }

    #[test]
    #[should_panic(expected = "no path form")]
    fn test_point_geometry_is_fatal() {
        let proj = Projector::standard();
        geometry_path(&proj, &Value::Point(vec![0.0, 0.0]), None);
    }
}
