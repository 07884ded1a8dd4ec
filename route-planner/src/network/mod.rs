//! Transit network ingestion.
//!
//! Reads the per-line stop and route dumps (one file per physical line),
//! restricts them to the service area, and assembles the directional
//! service lines and the stop → services index.

mod builder;
mod error;
mod loader;
mod records;

pub use builder::{NetworkBuilder, TransitNetwork};
pub use error::{FileError, FileErrorKind, LoadError};
pub use loader::{LoadReport, NetworkData, load_network};
pub use records::{LineRoutes, LineStops, RawNetwork, StopRecord};
