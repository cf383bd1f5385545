use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{GeoJson, JsonObject, Value};
use log::warn;

use crate::geo::GeoPoint;
use crate::map::labels::{AnchorDir, LabelSpec};

/// One feature from the external feed: a geometry plus its property
/// bag. The core treats both as opaque until a draw routine picks the
/// fields it needs.
#[derive(Clone, Debug)]
pub struct FeatureRecord {
    pub geometry: Value,
    pub properties: JsonObject,
}

/// Load one feature category from a GeoJSON file.
pub fn load_category(path: &Path) -> Result<Vec<FeatureRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("parsing {}", path.display()))?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => {
            return Ok(vec![FeatureRecord { geometry: g.value, properties: JsonObject::new() }]);
        }
    };

    Ok(features
        .into_iter()
        .filter_map(|f| {
            let geometry = f.geometry?.value;
            let properties = f.properties.unwrap_or_default();
            Some(FeatureRecord { geometry, properties })
        })
        .collect())
}

/// Load a category, treating an absent or unreadable feed as an empty
/// one: the corresponding layer simply stays blank.
pub fn load_category_or_empty(dir: &Path, filename: &str) -> Vec<FeatureRecord> {
    let path = dir.join(filename);
    if !path.exists() {
        warn!("feature feed {} not present; leaving its layer empty", path.display());
        return Vec::new();
    }
    match load_category(&path) {
        Ok(features) => features,
        Err(e) => {
            warn!("failed to load {}: {e:#}; leaving its layer empty", path.display());
            Vec::new()
        }
    }
}

/// String property accessor.
pub fn prop_str<'a>(props: &'a JsonObject, key: &str) -> Option<&'a str> {
    props.get(key).and_then(|v| v.as_str())
}

/// Numeric property accessor.
pub fn prop_f64(props: &JsonObject, key: &str) -> Option<f64> {
    props.get(key).and_then(|v| v.as_f64())
}

/// Extract an authored label from a feature's property bag. Returns
/// `None` when the feature carries no label or a zero label size; the
/// caller's display predicate must stay consistent with this.
pub fn label_spec(props: &JsonObject) -> Option<LabelSpec> {
    let size = prop_f64(props, "label_size").unwrap_or(0.0);
    if size == 0.0 {
        return None;
    }
    let text = prop_str(props, "label")?.to_owned();
    let at = GeoPoint::new(prop_f64(props, "label_lat")?, prop_f64(props, "label_lon")?);

    let leader_target = match (prop_f64(props, "leader_lat"), prop_f64(props, "leader_lon")) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
        _ => None,
    };
    let leader_anchor = match (prop_f64(props, "leader_px"), prop_f64(props, "leader_py")) {
        (Some(px), Some(py)) => Some((px, py)),
        _ => None,
    };

    Some(LabelSpec {
        text,
        at,
        angle_deg: prop_f64(props, "label_angle").unwrap_or(0.0),
        size,
        bend_half_width: prop_f64(props, "label_bend"),
        anchor: prop_str(props, "label_anchor")
            .and_then(AnchorDir::from_code)
            .unwrap_or_default(),
        leader_target,
        leader_anchor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: serde_json::Value) -> JsonObject {
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_label_spec_extraction() {
        let p = props(json!({
            "label": "Atacama",
            "label_lat": -24.5,
            "label_lon": -69.25,
            "label_size": 1.5,
            "label_angle": 10.0,
            "label_anchor": "w",
            "label_bend": 3.0,
        }));
        let spec = label_spec(&p).expect("label expected");
        assert_eq!(spec.text, "Atacama");
        assert_eq!(spec.at, GeoPoint::new(-24.5, -69.25));
        assert_eq!(spec.angle_deg, 10.0);
        assert_eq!(spec.anchor, AnchorDir::West);
        assert_eq!(spec.bend_half_width, Some(3.0));
        assert!(spec.leader_target.is_none());
    }

    #[test]
    fn test_zero_size_means_no_label() {
        let p = props(json!({"label": "X", "label_lat": 0.0, "label_lon": 0.0}));
        assert!(label_spec(&p).is_none());
        let p = props(json!({
            "label": "X", "label_lat": 0.0, "label_lon": 0.0, "label_size": 0.0
        }));
        assert!(label_spec(&p).is_none());
    }

    #[test]
    fn test_leader_fields() {
        let p = props(json!({
            "label": "Easter Island",
            "label_lat": -27.1,
            "label_lon": -109.3,
            "label_size": 0.8,
            "leader_lat": -27.15,
            "leader_lon": -109.43,
            "leader_px": 100.0,
            "leader_py": 50.0,
        }));
        let spec = label_spec(&p).expect("label expected");
        assert_eq!(spec.leader_target, Some(GeoPoint::new(-27.15, -109.43)));
        assert_eq!(spec.leader_anchor, Some((100.0, 50.0)));
    }

    #[test]
    fn test_missing_feed_is_empty() {
        let features = load_category_or_empty(Path::new("/nonexistent"), "countries.json");
        assert!(features.is_empty());
    }
}
