//! Loading network data from a data directory.
//!
//! Layout:
//!
//! ```text
//! <dir>/stops/B<service>.json    stop dump per line (required, at least one usable)
//! <dir>/routes/R<service>.json   route geometry per line (optional)
//! <dir>/area.geojson             service-area polygon (required)
//! <dir>/bus_stops.geojson        geographic stop nodes (required)
//! <dir>/streets.geojson          walkable street network (optional)
//! ```
//!
//! A line file that cannot be read or parsed is skipped and reported; the
//! other files still load.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::domain::ServiceId;
use crate::spatial::{GeoDataError, GeoIndex, ServiceArea, StreetGraph};

use super::{FileError, FileErrorKind, LineRoutes, LineStops, LoadError, RawNetwork};

/// Everything read from a data directory.
#[derive(Debug, Clone)]
pub struct NetworkData {
    pub raw: RawNetwork,
    pub area: ServiceArea,
    /// Geographic nodes inside `area`.
    pub geo_index: GeoIndex,
    pub streets: Option<StreetGraph>,
}

/// Outcome of a load: how many line files were used and which were skipped.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub stop_files: usize,
    pub route_files: usize,
    pub errors: Vec<FileError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Load a data directory.
pub fn load_network(dir: &Path) -> Result<(NetworkData, LoadReport), LoadError> {
    let mut report = LoadReport::default();

    let (stops, stop_errors) = load_line_files(&dir.join("stops"), "B", LineStops::from_dto)?;
    if stops.is_empty() {
        return Err(LoadError::NoUsableFiles {
            dataset: "bus stop",
            failures: stop_errors,
        });
    }
    report.stop_files = stops.len();
    report.errors.extend(stop_errors);

    let routes_dir = dir.join("routes");
    let routes = if routes_dir.is_dir() {
        let (routes, route_errors) =
            load_line_files(&routes_dir, "R", LineRoutes::from_dto)?;
        report.errors.extend(route_errors);
        routes
    } else {
        debug!(dir = %routes_dir.display(), "no route geometry directory");
        Vec::new()
    };
    report.route_files = routes.len();

    let area = read_geojson(&dir.join("area.geojson"), ServiceArea::from_geojson_str)?;
    let geo_index =
        read_geojson(&dir.join("bus_stops.geojson"), GeoIndex::from_geojson_str)?.within(&area);

    let streets_path = dir.join("streets.geojson");
    let streets = if streets_path.is_file() {
        Some(read_geojson(&streets_path, StreetGraph::from_geojson_str)?)
    } else {
        None
    };

    for error in &report.errors {
        warn!(file = %error.file.display(), error = %error.kind, "skipped data file");
    }
    info!(
        stop_files = report.stop_files,
        route_files = report.route_files,
        skipped = report.errors.len(),
        geo_nodes = geo_index.len(),
        street_nodes = streets.as_ref().map_or(0, StreetGraph::node_count),
        "loaded network data"
    );

    Ok((
        NetworkData {
            raw: RawNetwork { stops, routes },
            area,
            geo_index,
            streets,
        },
        report,
    ))
}

/// Load every `<prefix><service>.json` file in `dir`, in file-name order.
///
/// Only failing to list the directory is fatal; per-file problems are
/// returned alongside the successfully parsed files.
fn load_line_files<D, T>(
    dir: &Path,
    prefix: &str,
    convert: impl Fn(ServiceId, D) -> Result<T, FileErrorKind>,
) -> Result<(Vec<T>, Vec<FileError>), LoadError>
where
    D: DeserializeOwned,
{
    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut loaded = Vec::with_capacity(paths.len());
    let mut errors = Vec::new();

    for path in paths {
        match load_line_file(&path, prefix, &convert) {
            Ok(item) => loaded.push(item),
            Err(kind) => errors.push(FileError::new(path, kind)),
        }
    }

    Ok((loaded, errors))
}

fn load_line_file<D, T>(
    path: &Path,
    prefix: &str,
    convert: impl Fn(ServiceId, D) -> Result<T, FileErrorKind>,
) -> Result<T, FileErrorKind>
where
    D: DeserializeOwned,
{
    let service = service_id_from_path(path, prefix).ok_or(FileErrorKind::NoServiceId)?;
    let json = std::fs::read_to_string(path)?;
    let dto: D = serde_json::from_str(&json)?;
    convert(service, dto)
}

/// Service id from a file name: `B3.json` with prefix `B` gives `3`.
fn service_id_from_path(path: &Path, prefix: &str) -> Option<ServiceId> {
    let stem = path.file_stem()?.to_str()?;
    let id = stem.strip_prefix(prefix)?;
    (!id.is_empty()).then(|| ServiceId::new(id))
}

fn read_geojson<T>(
    path: &Path,
    parse: impl Fn(&str) -> Result<T, GeoDataError>,
) -> Result<T, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text).map_err(|source| LoadError::GeoData {
        path: path.to_path_buf(),
        source,
    })
}
