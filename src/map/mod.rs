//! The projection core: facet table, planar geometry, path synthesis,
//! and the generated overlays (graticule, special circles, labels).

pub mod circles;
pub mod facets;
pub mod graticule;
pub mod labels;
pub mod path;
pub mod plane;
pub mod projection;

pub use facets::{Facet, FacetId, FacetTable, Placement};
pub use plane::PlanarPoint;
pub use projection::{MapConfig, Projector};
