//! Geographic coordinate type.

use std::fmt;

use serde::Serialize;

use crate::spatial::haversine_m;

/// Error returned when a latitude/longitude pair is not a valid WGS84 position.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lat}, {lon}): {reason}")]
pub struct InvalidCoordinate {
    lat: f64,
    lon: f64,
    reason: &'static str,
}

/// A WGS84 position in decimal degrees.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180];
/// both are finite. This type guarantees validity by construction.
///
/// # Examples
///
/// ```
/// use route_planner::domain::GeoPoint;
///
/// let punggol = GeoPoint::new(1.4052585, 103.9023302).unwrap();
/// assert_eq!(punggol.lat(), 1.4052585);
///
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Create a point, validating the latitude and longitude ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "latitude out of range",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinate {
                lat,
                lon,
                reason: "longitude out of range",
            });
        }
        Ok(Self { lat, lon })
    }

    /// Create a point from a GeoJSON-ordered `[lon, lat]` pair.
    pub fn from_lon_lat(lon: f64, lat: f64) -> Result<Self, InvalidCoordinate> {
        Self::new(lat, lon)
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        haversine_m(self, other)
    }

    /// Returns true if `other` lies within `tolerance_m` metres.
    pub fn is_near(&self, other: &GeoPoint, tolerance_m: f64) -> bool {
        self.distance_m(other) <= tolerance_m
    }

    /// Planar `[lon, lat]` representation used for spatial indexing.
    pub(crate) fn as_xy(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub(crate) fn to_geo(self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

impl fmt::Debug for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeoPoint({}, {})", self.lat, self.lon)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}
