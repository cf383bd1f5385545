//! The render pass: draws every layer into the SVG sink in a fixed
//! stacking order. Each category reads its own feed and writes its own
//! layer, so categories are independent of each other; within a
//! category, path synthesis fans out over rayon and collects back in
//! input order, keeping the output byte-deterministic.

use std::path::Path;

use anyhow::Result;
use geojson::JsonObject;
use log::info;
use rayon::prelude::*;

use crate::data::{self, label_spec, prop_f64, prop_str, FeatureRecord};
use crate::geo::GeoPoint;
use crate::map::circles::{background_paths, special_circles};
use crate::map::graticule::graticule;
use crate::map::labels::{place_label, LabelBody, LabelSpec};
use crate::map::path::{compound_path, geometry_path};
use crate::map::projection::Projector;
use crate::svg::SvgDocument;

/// Countries whose first-level admin boundaries and capitals are shown.
const SHOW_ADMIN1: [&str; 3] = ["USA", "AUS", "CAN"];

/// Graticule interval used by the full render pass, degrees.
const GRATICULE_INTERVAL: u32 = 5;

const COUNTRIES_FILE: &str = "ne_10m_admin_0_countries_lakes.json";
const BOUNDARIES_FILE: &str = "ne_10m_admin_0_boundary_lines_land.json";
const STATES_FILE: &str = "ne_10m_admin_1_states_provinces_lines.json";
const UK_UNITS_FILE: &str = "ne_10m_admin_0_boundary_lines_map_units_UK.json";
const CITIES_FILE: &str = "ne_10m_populated_places_simple.json";

const COUNTRY_LABEL_SCALE: f64 = 1.0;
const STATE_LABEL_SCALE: f64 = 0.8;
const CITY_LABEL_SIZE: f64 = 1.0;
const CITY_DOT_RADIUS: f64 = 0.1;

/// Render the whole map. Layer order is fixed so later categories
/// visually stack over earlier ones.
pub fn render_map(proj: &Projector, doc: &mut SvgDocument, data_dir: &Path) -> Result<()> {
    doc.init_frame();

    draw_background(proj, doc);
    draw_graticule(proj, doc);
    draw_special_circles(proj, doc);
    draw_countries(proj, doc, data_dir);
    draw_state_boundaries(proj, doc, data_dir);
    draw_boundaries(proj, doc, data_dir);
    draw_cities(proj, doc, data_dir);

    Ok(())
}

fn draw_background(proj: &Projector, doc: &mut SvgDocument) {
    let d = compound_path(&background_paths(proj), false);
    doc.path("background", &d, None);
}

fn draw_graticule(proj: &Projector, doc: &mut SvgDocument) {
    doc.path("graticule", &graticule(proj, GRATICULE_INTERVAL), None);
}

fn draw_special_circles(proj: &Projector, doc: &mut SvgDocument) {
    let circles = special_circles(proj);
    doc.path("circles", &circles.equator, Some("equator"));
    // Identically shaped mask copy that clips overlapping content.
    doc.path("equator-mask", &circles.equator, None);
    doc.path("circles", &circles.tropics_and_polar, Some("polar-tropic"));
}

fn draw_countries(proj: &Projector, doc: &mut SvgDocument, data_dir: &Path) {
    let countries = data::load_category_or_empty(data_dir, COUNTRIES_FILE);
    info!("drawing {} country features", countries.len());

    let paths: Vec<(String, Option<String>)> = countries
        .par_iter()
        .map(|country| {
            let class = prop_f64(&country.properties, "MAPCOLOR7")
                .map(|c| format!("c{c}"));
            (geometry_path(proj, &country.geometry, None), class)
        })
        .collect();
    for (d, class) in &paths {
        doc.path("countries", d, class.as_deref());
    }

    draw_labels(proj, doc, &countries, "country-labels", COUNTRY_LABEL_SCALE, |_| true);
}

fn draw_state_boundaries(proj: &Projector, doc: &mut SvgDocument, data_dir: &Path) {
    let states = data::load_category_or_empty(data_dir, STATES_FILE);
    for state in &states {
        let adm0 = prop_str(&state.properties, "ADM0_A3").unwrap_or("");
        if SHOW_ADMIN1.contains(&adm0) {
            doc.path("state-boundaries", &geometry_path(proj, &state.geometry, None), None);
        }
    }
    draw_labels(proj, doc, &states, "state-labels", STATE_LABEL_SCALE, |props| {
        prop_str(props, "ADM0_A3").is_some_and(|a| SHOW_ADMIN1.contains(&a))
    });

    // UK map units are kept in a separate feed but drawn on the same layer.
    for unit in &data::load_category_or_empty(data_dir, UK_UNITS_FILE) {
        doc.path("state-boundaries", &geometry_path(proj, &unit.geometry, None), None);
    }
}

fn draw_boundaries(proj: &Projector, doc: &mut SvgDocument, data_dir: &Path) {
    for boundary in &data::load_category_or_empty(data_dir, BOUNDARIES_FILE) {
        let class = prop_str(&boundary.properties, "FEATURECLA").unwrap_or("");
        if class == "Lease limit" || class == "Overlay limit" {
            continue;
        }
        let disputed = if class != "International boundary (verify)" {
            Some("disputed")
        } else {
            None
        };
        doc.path("boundaries", &geometry_path(proj, &boundary.geometry, None), disputed);
    }
}

fn draw_cities(proj: &Projector, doc: &mut SvgDocument, data_dir: &Path) {
    for city in &data::load_category_or_empty(data_dir, CITIES_FILE) {
        if !city_is_shown(&city.properties) {
            continue;
        }
        let geojson::Value::Point(ref position) = city.geometry else {
            continue;
        };
        let at = GeoPoint::new(position[1], position[0]);
        let name = prop_str(&city.properties, "name").unwrap_or("").to_owned();
        if name.is_empty() {
            continue;
        }

        doc.circle("cities", proj.project(at), CITY_DOT_RADIUS);
        let spec = LabelSpec::plain(name, at, CITY_LABEL_SIZE);
        emit_label(proj, doc, "cities", &spec, 1.0);
    }
}

/// Show a city when it is globally prominent or a capital (admin-1
/// capitals only for the countries whose states are drawn).
fn city_is_shown(props: &JsonObject) -> bool {
    let featurecla = prop_str(props, "featurecla").unwrap_or("");
    prop_f64(props, "scalerank").is_some_and(|r| r <= 2.0)
        || featurecla == "Admin-0 capital"
        || (featurecla == "Admin-1 capital"
            && prop_str(props, "adm0_a3").is_some_and(|a| SHOW_ADMIN1.contains(&a)))
}

/// Place and emit labels for every feature that carries one and passes
/// the display predicate.
fn draw_labels(
    proj: &Projector,
    doc: &mut SvgDocument,
    features: &[FeatureRecord],
    layer: &str,
    font_scale: f64,
    show: impl Fn(&JsonObject) -> bool,
) {
    for feature in features {
        if !show(&feature.properties) {
            continue;
        }
        let Some(spec) = label_spec(&feature.properties) else {
            continue;
        };
        emit_label(proj, doc, layer, &spec, font_scale);
    }
}

fn emit_label(proj: &Projector, doc: &mut SvgDocument, layer: &str, spec: &LabelSpec, font_scale: f64) {
    let placed = place_label(proj, spec, font_scale);
    match placed.body {
        LabelBody::Straight { ref lines, offset, align, .. } => {
            doc.text(layer, placed.anchor, offset, placed.rotation_deg, placed.size, align, lines);
        }
        LabelBody::Curved { ref baseline, ref text } => {
            doc.text_on_path(layer, baseline, text, placed.size);
        }
    }
    if let Some(leader) = placed.leader {
        doc.line(layer, leader.from, leader.to);
    }
}
