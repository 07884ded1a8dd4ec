//! Spatial lookups over a fixed set of geographic nodes.
//!
//! Provides great-circle distance, service-area containment, and
//! nearest-node / nearest-edge queries backed by R-trees.

mod area;
mod distance;
mod error;
mod index;
mod street;

pub use area::ServiceArea;
pub use distance::{EARTH_RADIUS_KM, haversine_m};
pub use error::GeoDataError;
pub use index::{GeoIndex, GeoNode};
pub use street::{StreetEdge, StreetGraph};
