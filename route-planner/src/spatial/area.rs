//! Service-area polygon.

use geo::{Contains, Geometry, MultiPolygon, Polygon, Rect, coord};
use geojson::GeoJson;

use crate::domain::GeoPoint;

use super::GeoDataError;

/// Geographic boundary restricting which stops and lines are considered.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceArea {
    polygons: MultiPolygon<f64>,
}

impl ServiceArea {
    pub fn new(polygons: MultiPolygon<f64>) -> Self {
        Self { polygons }
    }

    /// An axis-aligned box between two corners.
    pub fn rectangle(south_west: GeoPoint, north_east: GeoPoint) -> Self {
        let rect = Rect::new(
            coord! { x: south_west.lon(), y: south_west.lat() },
            coord! { x: north_east.lon(), y: north_east.lat() },
        );
        Self::new(MultiPolygon::new(vec![rect.to_polygon()]))
    }

    /// Parse a boundary from GeoJSON text.
    ///
    /// Accepts a bare geometry, a feature, or a feature collection; the
    /// first Polygon or MultiPolygon found is used.
    pub fn from_geojson_str(text: &str) -> Result<Self, GeoDataError> {
        let geojson: GeoJson = text.parse()?;

        let geometries: Vec<geojson::Geometry> = match geojson {
            GeoJson::Geometry(g) => vec![g],
            GeoJson::Feature(f) => f.geometry.into_iter().collect(),
            GeoJson::FeatureCollection(fc) => {
                fc.features.into_iter().filter_map(|f| f.geometry).collect()
            }
        };

        for geometry in geometries {
            match Geometry::<f64>::try_from(geometry)? {
                Geometry::Polygon(polygon) => return Ok(Self::from(polygon)),
                Geometry::MultiPolygon(polygons) => return Ok(Self::new(polygons)),
                _ => continue,
            }
        }

        Err(GeoDataError::NoPolygon)
    }

    /// Returns true if `point` lies strictly inside the boundary.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.polygons.contains(&point.to_geo())
    }
}

impl From<Polygon<f64>> for ServiceArea {
    fn from(polygon: Polygon<f64>) -> Self {
        Self::new(MultiPolygon::new(vec![polygon]))
    }
}
