//! Fixed-latitude reference circles and the map background outline.
//!
//! These are the pieces that cannot be generated facet-by-facet: they
//! run across cut seams, so each is an explicit stitching script over
//! named facets. The scripts are written against the standard facet
//! table; corner references and explicit facet pins resolve the seam
//! ambiguity described in `projection.rs`.

use crate::geo::{GeoPoint, EARTH_TILT, QUARTER_TURN};
use crate::map::facets::FacetId;
use crate::map::path::{compound_path, PointList};
use crate::map::projection::Projector;

use FacetId::*;

/// The equator and the tropic/polar circles, each as one unclosed
/// compound path description.
#[derive(Clone, Debug)]
pub struct SpecialCircles {
    pub equator: String,
    pub tropics_and_polar: String,
}

/// Generate both special-circle paths. The equator string is emitted
/// twice by the renderer: once as a stroke, once as the identically
/// shaped clipping mask.
pub fn special_circles(proj: &Projector) -> SpecialCircles {
    SpecialCircles {
        equator: compound_path(&equator_paths(proj), false),
        tropics_and_polar: compound_path(&tropic_and_polar_paths(proj), false),
    }
}

/// Equator stitching script. The geometry is pre-known to follow facet
/// seams exactly, so corner vertices suffice: the north-strip bottom is
/// one straight traversal of the strip's southwest corners, and each
/// detached wing contributes its own straight top edge.
pub fn equator_paths(proj: &Projector) -> Vec<PointList> {
    let mut lists = Vec::new();

    // North strip bottom, west corner to east corner.
    let mut points: PointList = FacetId::NORTH_STRIP
        .iter()
        .map(|&id| proj.project(proj.table.get(id).sw_corner()))
        .collect();
    points.push(proj.project_in(proj.table.get(NorthAmerica).sw_corner(), NorthPacific));
    lists.push(points);

    // West wing top edge.
    lists.push(vec![
        proj.project_in(GeoPoint::new(0.0, proj.table.get(SouthPacificFar).sw.lon), SouthPacificFar),
        proj.project_in(GeoPoint::new(0.0, proj.table.get(SouthPacificNear).ne.lon), SouthPacificNear),
    ]);

    // East wing top edge.
    lists.push(vec![
        proj.project_in(GeoPoint::new(0.0, proj.table.get(SouthAustralia).sw.lon), SouthAustralia),
        proj.project_in(
            GeoPoint::new(0.0, proj.table.get(SouthPacificEast).east_lon()),
            SouthPacificEast,
        ),
    ]);

    lists
}

/// Tropic and polar circle stitching script: Cancer and the Arctic
/// Circle run once across the whole north strip; Capricorn and the
/// Antarctic Circle are sampled per attachment group (west wing,
/// attached strip, east wing), the first sample of a range pinned to
/// its facet where inference would land on the wrong side of a cut.
pub fn tropic_and_polar_paths(proj: &Projector) -> Vec<PointList> {
    let mut lists = Vec::new();

    // Tropic of Cancer and Arctic Circle: the north strip is seamless,
    // so one range spans it. First and last samples pin the exact facet
    // corners on the Bering-side seam.
    let west = proj.table.get(NorthAmerica).sw.lon;
    let east = proj.table.get(NorthPacific).east_lon();
    for lat in [EARTH_TILT, QUARTER_TURN - EARTH_TILT] {
        let mut points = vec![proj.project(GeoPoint::new(lat, west))];
        let mut lon = west.trunc();
        while lon < east {
            points.push(proj.project(GeoPoint::new(lat, lon)));
            lon += 1.0;
        }
        points.push(proj.project_in(GeoPoint::new(lat, east), NorthPacific));
        lists.push(points);
    }

    // Tropic of Capricorn and Antarctic Circle: three ranges each.
    for lat in [-EARTH_TILT, -QUARTER_TURN + EARTH_TILT] {
        lists.push(sample_range(
            proj,
            lat,
            proj.table.get(SouthPacificFar).sw.lon,
            proj.table.get(SouthPacificNear).ne.lon,
            None,
        ));
        lists.push(sample_range(
            proj,
            lat,
            proj.table.get(SouthAmericas).sw.lon,
            proj.table.get(SouthIndian).ne.lon,
            Some(SouthAmericas),
        ));
        lists.push(sample_range(
            proj,
            lat,
            proj.table.get(SouthAustralia).sw.lon,
            proj.table.get(SouthPacificEast).east_lon(),
            Some(SouthAustralia),
        ));
    }

    lists
}

/// Sample a fixed-latitude run at 1° longitude steps. `first_facet`
/// pins the first sample when it sits on a cut boundary shared with an
/// earlier facet in table order.
fn sample_range(
    proj: &Projector,
    lat: f64,
    west: f64,
    east: f64,
    first_facet: Option<FacetId>,
) -> PointList {
    let mut points = Vec::new();
    let mut lon = west;
    while lon <= east + 1e-9 {
        let p = GeoPoint::new(lat, lon);
        let planar = match first_facet {
            Some(id) if points.is_empty() => proj.project_in(p, id),
            _ => proj.project(p),
        };
        points.push(planar);
        lon += 1.0;
    }
    points
}

/// Map background/outline: one ring tracing the attached strips and one
/// ring per detached wing, each sampled at 1° along its geographic
/// edges. Unclosed, like the original outline; every ring returns to
/// its starting vertex.
pub fn background_paths(proj: &Projector) -> Vec<PointList> {
    let mut lists = Vec::new();

    // Main region: north strip plus attached mid-south strip.
    {
        let mut points = Vec::new();
        let nw = proj.table.get(NorthAmerica).nw_corner();
        let east = proj.table.get(NorthPacific).east_lon();

        // Along the north pole edge, west to east.
        let mut lon = nw.lon;
        while lon < east {
            points.push(proj.project(GeoPoint::new(QUARTER_TURN, lon)));
            lon += 1.0;
        }
        points.push(proj.project_in(GeoPoint::new(QUARTER_TURN, east), NorthPacific));

        // Down the eastern seam edge.
        let mut lat = QUARTER_TURN - 1.0;
        while lat >= 0.0 {
            points.push(proj.project_in(GeoPoint::new(lat, east), NorthPacific));
            lat -= 1.0;
        }

        // West along the equator overhang above the east wing.
        let mid_east = proj.table.get(SouthIndian).ne.lon;
        let mut lon = east - 1.0;
        while lon > mid_east {
            points.push(proj.project_in(GeoPoint::new(0.0, lon), NorthPacific));
            lon -= 1.0;
        }

        // Down the mid-strip's eastern edge.
        let mut lat = 0.0;
        while lat >= -QUARTER_TURN {
            points.push(proj.project(GeoPoint::new(lat, mid_east)));
            lat -= 1.0;
        }

        // West along the south pole edge.
        let mid_west = proj.table.get(SouthAmericas).sw.lon;
        let mut lon = mid_east - 1.0;
        while lon > mid_west {
            points.push(proj.project(GeoPoint::new(-QUARTER_TURN, lon)));
            lon -= 1.0;
        }
        points.push(proj.project_in(GeoPoint::new(-QUARTER_TURN, mid_west), SouthAmericas));

        // Up the mid-strip's western edge.
        let mut lat = -QUARTER_TURN + 1.0;
        while lat <= 0.0 {
            points.push(proj.project_in(GeoPoint::new(lat, mid_west), SouthAmericas));
            lat += 1.0;
        }

        // West along the equator overhang above the west wing.
        let mut lon = mid_west - 1.0;
        while lon > nw.lon {
            points.push(proj.project(GeoPoint::new(0.0, lon)));
            lon -= 1.0;
        }
        points.push(proj.project(GeoPoint::new(0.0, nw.lon)));

        // Up the western seam edge, back to the start.
        let mut lat = 1.0;
        while lat <= QUARTER_TURN {
            points.push(proj.project(GeoPoint::new(lat, nw.lon)));
            lat += 1.0;
        }
        lists.push(points);
    }

    // Detached wings.
    lists.push(wing_outline(proj, SouthPacificFar, SouthPacificNear));
    lists.push(wing_outline(proj, SouthAustralia, SouthPacificEast));

    lists
}

/// Outline of one two-facet wing: west edge down, south edge east, east
/// edge up, top edge back west. The top edge runs along the equator cut
/// where inference would resolve to the north strip, so both of its
/// vertices are pinned.
fn wing_outline(proj: &Projector, west_facet: FacetId, east_facet: FacetId) -> PointList {
    let west = proj.table.get(west_facet).sw.lon;
    let east = proj.table.get(east_facet).east_lon();
    let mut points = Vec::new();

    points.push(proj.project_in(GeoPoint::new(0.0, west), west_facet));
    let mut lat = -1.0;
    while lat >= -QUARTER_TURN {
        points.push(proj.project_in(GeoPoint::new(lat, west), west_facet));
        lat -= 1.0;
    }
    let mut lon = west + 1.0;
    while lon < east {
        points.push(proj.project_in(GeoPoint::new(-QUARTER_TURN, lon), wing_side(proj, west_facet, east_facet, lon)));
        lon += 1.0;
    }
    let mut lat = -QUARTER_TURN;
    while lat <= 0.0 {
        points.push(proj.project_in(GeoPoint::new(lat, east), east_facet));
        lat += 1.0;
    }
    points.push(proj.project_in(GeoPoint::new(0.0, west), west_facet));
    points
}

fn wing_side(proj: &Projector, west_facet: FacetId, east_facet: FacetId, lon: f64) -> FacetId {
    if lon <= proj.table.get(west_facet).ne.lon {
        west_facet
    } else {
        east_facet
    }
}
