//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{GeoPoint, Itinerary, Mode, NodeRef, RouteLeg, Waypoint};

/// Query for `GET /route`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RouteRequest {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
}

/// A planned route.
#[derive(Debug, Serialize)]
pub struct ItineraryResult {
    /// Legs in travel order
    pub legs: Vec<LegResult>,

    /// Total distance in metres
    pub distance_m: f64,

    /// Service changes, within and between transit legs
    pub transfers: usize,
}

impl ItineraryResult {
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        Self {
            legs: itinerary.legs().iter().map(LegResult::from_leg).collect(),
            distance_m: itinerary.distance_m(),
            transfers: itinerary.transfer_count(),
        }
    }
}

/// One leg of a route.
#[derive(Debug, Serialize)]
pub struct LegResult {
    pub mode: Mode,

    pub distance_m: f64,

    /// Services ridden, in order
    pub services: Vec<String>,

    pub waypoints: Vec<WaypointResult>,

    /// Polyline for drawing, as `[lat, lon]` pairs
    pub shape: Vec<[f64; 2]>,
}

impl LegResult {
    pub fn from_leg(leg: &RouteLeg) -> Self {
        Self {
            mode: leg.mode(),
            distance_m: leg.distance_m(),
            services: leg.services().iter().map(|s| s.as_str().to_string()).collect(),
            waypoints: leg.waypoints().iter().map(WaypointResult::from_waypoint).collect(),
            shape: leg.shape().iter().map(lat_lon).collect(),
        }
    }
}

/// A point along a leg.
#[derive(Debug, Serialize)]
pub struct WaypointResult {
    pub lat: f64,
    pub lon: f64,

    /// Stop, station or street node at this point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeRef>,

    /// Stop description or station name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Service ridden to reach this point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl WaypointResult {
    pub fn from_waypoint(waypoint: &Waypoint) -> Self {
        Self {
            lat: waypoint.point.lat(),
            lon: waypoint.point.lon(),
            node: waypoint.node,
            label: waypoint.label.clone(),
            service: waypoint.service.as_ref().map(|s| s.as_str().to_string()),
        }
    }
}

fn lat_lon(point: &GeoPoint) -> [f64; 2] {
    [point.lat(), point.lon()]
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ServiceId, StopCode};

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn bus_leg() -> RouteLeg {
        let stop = |code: u32, lat: f64, service: Option<&str>| Waypoint {
            point: pt(lat, 103.9),
            node: Some(NodeRef::Stop(StopCode::new(code))),
            label: Some(format!("Blk {code}")),
            service: service.map(ServiceId::new),
        };
        RouteLeg::new(
            Mode::Bus,
            vec![
                stop(65009, 1.400, None),
                stop(65011, 1.402, Some("3")),
                stop(65021, 1.404, Some("83")),
            ],
            445.0,
        )
        .unwrap()
    }

    #[test]
    fn leg_conversion() {
        let result = LegResult::from_leg(&bus_leg());

        assert_eq!(result.mode, Mode::Bus);
        assert_eq!(result.distance_m, 445.0);
        assert_eq!(result.services, vec!["3", "83"]);
        assert_eq!(result.waypoints.len(), 3);
        assert_eq!(result.waypoints[1].service.as_deref(), Some("3"));
        assert_eq!(result.shape[0], [1.400, 103.9]);
    }

    #[test]
    fn itinerary_conversion() {
        let leg = bus_leg();
        let walk = RouteLeg::direct_walk(leg.end(), pt(1.405, 103.9));
        let itinerary = Itinerary::new(vec![leg, walk], 25.0).unwrap();

        let result = ItineraryResult::from_itinerary(&itinerary);
        assert_eq!(result.legs.len(), 2);
        assert_eq!(result.transfers, 1);
        assert!((result.distance_m - itinerary.distance_m()).abs() < 1e-9);
    }

    #[test]
    fn json_shape() {
        let walk = RouteLeg::direct_walk(pt(1.4, 103.9), pt(1.4, 103.9));
        let json = serde_json::to_value(LegResult::from_leg(&walk)).unwrap();

        assert_eq!(json["mode"], "walk");
        assert_eq!(json["distance_m"], 0.0);
        // Empty optionals are omitted
        assert!(json["waypoints"][0].get("node").is_none());

        let json = serde_json::to_value(LegResult::from_leg(&bus_leg())).unwrap();
        assert_eq!(json["waypoints"][0]["node"]["kind"], "stop");
        assert_eq!(json["waypoints"][0]["node"]["id"], 65009);
    }
}
