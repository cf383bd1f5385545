//! Faceted world-map renderer: projects spherical coordinates onto an
//! interrupted multi-facet plane and draws the result as layered SVG.

pub mod data;
pub mod geo;
pub mod map;
pub mod render;
pub mod svg;

pub use geo::GeoPoint;
pub use map::{FacetId, MapConfig, PlanarPoint, Projector};
pub use render::render_map;
pub use svg::SvgDocument;
