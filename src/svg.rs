//! SVG drawing sink: named destination layers, path/text/line
//! primitives, and the one-time projection-surface frame setup.

use std::fmt::Write;

use crate::map::labels::TextAlign;
use crate::map::plane::PlanarPoint;
use crate::map::projection::MapConfig;

/// Destination layers in stacking order: later layers draw over
/// earlier ones.
pub const LAYERS: [&str; 10] = [
    "background",
    "graticule",
    "circles",
    "equator-mask",
    "countries",
    "country-labels",
    "state-boundaries",
    "state-labels",
    "boundaries",
    "cities",
];

/// An SVG document under construction. Holds one markup buffer per
/// named layer plus the frame configuration; `init_frame` is the
/// explicit, idempotent replacement for a module-global "surface
/// initialized" flag.
pub struct SvgDocument {
    config: MapConfig,
    layers: Vec<(&'static str, String)>,
    frame_initialized: bool,
    view_box: String,
    frame_transform: String,
    next_path_id: usize,
}

impl SvgDocument {
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            layers: LAYERS.iter().map(|&name| (name, String::new())).collect(),
            frame_initialized: false,
            view_box: String::new(),
            frame_transform: String::new(),
            next_path_id: 0,
        }
    }

    /// Set up the coordinate frame: viewBox from the view origin and
    /// output size, and the global frame rotation on the wrapper group.
    /// Idempotent; later calls are no-ops.
    pub fn init_frame(&mut self) {
        if self.frame_initialized {
            return;
        }
        self.frame_initialized = true;
        self.view_box = format!(
            "{} {} {} {}",
            -self.config.view_origin.x(),
            -self.config.view_origin.y(),
            self.config.width,
            self.config.height
        );
        self.frame_transform = format!("rotate({})", self.config.frame_rotation_deg);
    }

    fn layer_mut(&mut self, layer: &str) -> &mut String {
        self.layers
            .iter_mut()
            .find(|(name, _)| *name == layer)
            .map(|(_, buf)| buf)
            .unwrap_or_else(|| panic!("unknown destination layer {layer:?}"))
    }

    /// Append a path with an optional class attribute.
    pub fn path(&mut self, layer: &str, d: &str, class: Option<&str>) {
        let buf = self.layer_mut(layer);
        match class {
            Some(class) => {
                let _ = writeln!(buf, r#"    <path class="{}" d="{}"/>"#, xml_escape(class), d);
            }
            None => {
                let _ = writeln!(buf, r#"    <path d="{}"/>"#, d);
            }
        }
    }

    /// Append stacked text lines rotated about `at`.
    pub fn text(
        &mut self,
        layer: &str,
        at: PlanarPoint,
        offset: glam::DVec2,
        rotation_deg: f64,
        size: f64,
        align: TextAlign,
        lines: &[String],
    ) {
        let anchor = align.svg_value();
        let rotate = format!("rotate({:.3}, {:.3}, {:.3})", rotation_deg, at.x(), at.y());
        let buf = self.layer_mut(layer);
        for (idx, line) in lines.iter().enumerate() {
            let y = at.y() + offset.y + idx as f64 * 1.1 * size;
            let _ = writeln!(
                buf,
                r#"    <text x="{:.3}" y="{:.3}" font-size="{:.3}" text-anchor="{}" transform="{}">{}</text>"#,
                at.x() + offset.x,
                y,
                size,
                anchor,
                rotate,
                xml_escape(line),
            );
        }
    }

    /// Append text bound to an invisible baseline path at its midpoint
    /// (curved labels).
    pub fn text_on_path(&mut self, layer: &str, baseline_d: &str, text: &str, size: f64) {
        let id = format!("label-path-{}", self.next_path_id);
        self.next_path_id += 1;
        let escaped = xml_escape(text);
        let buf = self.layer_mut(layer);
        let _ = writeln!(buf, r#"    <path id="{id}" fill="none" stroke="none" d="{baseline_d}"/>"#);
        let _ = writeln!(
            buf,
            r##"    <text font-size="{size:.3}" text-anchor="middle"><textPath href="#{id}" startOffset="50%">{escaped}</textPath></text>"##,
        );
    }

    /// Append a straight line (leader lines).
    pub fn line(&mut self, layer: &str, from: PlanarPoint, to: PlanarPoint) {
        let buf = self.layer_mut(layer);
        let _ = writeln!(
            buf,
            r#"    <line x1="{:.3}" y1="{:.3}" x2="{:.3}" y2="{:.3}"/>"#,
            from.x(),
            from.y(),
            to.x(),
            to.y()
        );
    }

    /// Append a dot marker (cities).
    pub fn circle(&mut self, layer: &str, center: PlanarPoint, radius: f64) {
        let buf = self.layer_mut(layer);
        let _ = writeln!(
            buf,
            r#"    <circle cx="{:.3}" cy="{:.3}" r="{:.3}"/>"#,
            center.x(),
            center.y(),
            radius
        );
    }

    /// Markup accumulated for one layer. Test hook.
    pub fn layer_markup(&self, layer: &str) -> &str {
        self.layers
            .iter()
            .find(|(name, _)| *name == layer)
            .map(|(_, buf)| buf.as_str())
            .unwrap_or_else(|| panic!("unknown destination layer {layer:?}"))
    }

    /// Assemble the document: layers in stacking order inside the
    /// rotated wrapper group.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{}">"#,
            self.view_box
        );
        let _ = writeln!(out, r#"  <g id="map-wrapper" transform="{}">"#, self.frame_transform);
        for (name, markup) in &self.layers {
            let _ = writeln!(out, r#"  <g id="{name}">"#);
            out.push_str(markup);
            let _ = writeln!(out, "  </g>");
        }
        let _ = writeln!(out, "  </g>");
        let _ = writeln!(out, "</svg>");
        out
    }
}

/// Escape the five XML special characters for element text and
/// attribute values.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn test_init_frame_is_idempotent() {
        let mut doc = SvgDocument::new(MapConfig::default());
        doc.init_frame();
        let first = doc.to_svg();
        doc.init_frame();
        assert_eq!(doc.to_svg(), first);
        assert!(first.contains(r#"viewBox="-45 -95 445 225""#));
    }

    #[test]
    fn test_layer_routing_and_order() {
        let mut doc = SvgDocument::new(MapConfig::default());
        doc.init_frame();
        doc.path("graticule", "M0.000,0.000L1.000,1.000", None);
        doc.path("countries", "M2.000,2.000z", Some("c3"));
        let svg = doc.to_svg();
        let graticule = svg.find(r#"<g id="graticule">"#).unwrap();
        let countries = svg.find(r#"<g id="countries">"#).unwrap();
        assert!(graticule < countries, "countries must stack over the graticule");
        assert!(doc.layer_markup("countries").contains(r#"class="c3""#));
        assert!(doc.layer_markup("graticule").contains("M0.000,0.000"));
    }

    #[test]
    #[should_panic(expected = "unknown destination layer")]
    fn test_unknown_layer_is_fatal() {
        let mut doc = SvgDocument::new(MapConfig::default());
        doc.path("oceans", "M0,0", None);
    }

    #[test]
    fn test_text_escapes_markup() {
        let mut doc = SvgDocument::new(MapConfig::default());
        doc.text(
            "cities",
            PlanarPoint::new(0.0, 0.0),
            DVec2::ZERO,
            0.0,
            1.0,
            TextAlign::Start,
            &["A & B <C>".to_string()],
        );
        let markup = doc.layer_markup("cities");
        assert!(markup.contains("A &amp; B &lt;C&gt;"));
    }

    #[test]
    fn test_text_on_path_ids_are_unique() {
        let mut doc = SvgDocument::new(MapConfig::default());
        doc.text_on_path("country-labels", "M0,0L1,1", "Andes", 2.0);
        doc.text_on_path("country-labels", "M2,2L3,3", "Atacama", 2.0);
        let markup = doc.layer_markup("country-labels");
        assert!(markup.contains("label-path-0"));
        assert!(markup.contains("label-path-1"));
        assert!(markup.contains(r#"startOffset="50%""#));
    }
}
