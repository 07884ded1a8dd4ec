//! Spatial data error types.

/// Errors from reading GeoJSON boundary, node and street data.
#[derive(Debug, thiserror::Error)]
pub enum GeoDataError {
    #[error("GeoJSON parse error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("no polygon geometry found")]
    NoPolygon,

    #[error("expected a FeatureCollection")]
    NotFeatureCollection,
}
