use log::warn;

use crate::geo::GeoPoint;
use crate::map::path::{compound_path, PointList};
use crate::map::projection::Projector;

/// Graticule interval whitelist, in degrees.
pub const VALID_INTERVALS: [u32; 7] = [1, 2, 5, 10, 15, 20, 30];

/// Fallback when a caller asks for an interval outside the whitelist.
pub const DEFAULT_INTERVAL: u32 = 15;

const SAMPLE_EPS: f64 = 1e-9;

/// Poleward clamp for a longitude line: lines on 20° multiples run to
/// the poles, other 10° multiples stop at ±85°, everything else at ±80°.
/// Thins the line bundle that would otherwise crowd the poles.
pub fn pole_clamp(lon: i64) -> (f64, f64) {
    if lon % 10 == 0 {
        if lon % 20 == 0 {
            (-90.0, 90.0)
        } else {
            (-85.0, 85.0)
        }
    } else {
        (-80.0, 80.0)
    }
}

/// Generate the graticule point lists for every facet at the given
/// interval. Out-of-whitelist intervals are substituted with
/// [`DEFAULT_INTERVAL`], never rejected. The equator is skipped (the
/// special-circle generator owns it).
pub fn graticule_paths(proj: &Projector, interval: u32) -> Vec<PointList> {
    let interval = if VALID_INTERVALS.contains(&interval) {
        interval
    } else {
        warn!("graticule interval {interval} not in {VALID_INTERVALS:?}; using {DEFAULT_INTERVAL}");
        DEFAULT_INTERVAL
    };
    let iv = f64::from(interval);

    let mut lists = Vec::new();
    for facet in proj.table.iter() {
        let west = facet.sw.lon;
        let east = facet.east_lon();

        // Latitude lines at interval multiples inside the facet,
        // sampled at 1° longitude steps across the full span.
        let mut lat = (facet.sw.lat / iv).ceil() * iv;
        while lat <= facet.ne.lat + SAMPLE_EPS {
            if lat != 0.0 {
                let mut points = Vec::new();
                let mut lon = west;
                while lon <= east + SAMPLE_EPS {
                    points.push(proj.project_in(GeoPoint::new(lat, lon), facet.id));
                    lon += 1.0;
                }
                // A span with a fractional offset (half-degree seam)
                // misses its own eastern edge on whole-degree steps.
                if (east - west).fract().abs() > SAMPLE_EPS {
                    points.push(proj.project_in(GeoPoint::new(lat, east), facet.id));
                }
                lists.push(points);
            }
            lat += iv;
        }

        // Longitude lines at interval multiples, clamped poleward.
        let mut lon = (west / iv).ceil() * iv;
        while lon <= (east / iv).floor() * iv + SAMPLE_EPS {
            let (south_clamp, north_clamp) = pole_clamp(lon.round() as i64);
            let mut points = Vec::new();
            let mut lat = south_clamp.max(facet.sw.lat);
            let top = north_clamp.min(facet.ne.lat);
            while lat <= top + SAMPLE_EPS {
                points.push(proj.project_in(GeoPoint::new(lat, lon), facet.id));
                lat += 1.0;
            }
            lists.push(points);
            lon += iv;
        }
    }
    lists
}

/// Generate the graticule as one unclosed compound path.
pub fn graticule(proj: &Projector, interval: u32) -> String {
    compound_path(&graticule_paths(proj, interval), false)
}
