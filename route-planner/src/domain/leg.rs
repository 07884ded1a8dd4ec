//! Route leg type.
//!
//! A `RouteLeg` is one mode's contiguous portion of an itinerary: an
//! ordered list of waypoints travelled on foot, by bus or by rail.

use std::fmt;

use serde::Serialize;

use super::{DomainError, GeoPoint, ServiceId, StopCode};

/// Travel mode of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Walk,
    Bus,
    Rail,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Walk => f.write_str("walk"),
            Mode::Bus => f.write_str("bus"),
            Mode::Rail => f.write_str("rail"),
        }
    }
}

/// Identifier of a rail station (an OpenStreetMap node id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StationId(pub u64);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The network node a waypoint corresponds to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum NodeRef {
    Stop(StopCode),
    Station(StationId),
    Street(u64),
}

/// A point along a leg.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub point: GeoPoint,
    pub node: Option<NodeRef>,
    /// Human-readable name (stop description or station name).
    pub label: Option<String>,
    /// Service used to reach this waypoint from the previous one.
    pub service: Option<ServiceId>,
}

impl Waypoint {
    /// A bare coordinate with no network node attached.
    pub fn at(point: GeoPoint) -> Self {
        Self {
            point,
            node: None,
            label: None,
            service: None,
        }
    }
}

/// One mode's path through the network.
///
/// # Invariants
///
/// - At least two waypoints (a zero-length leg repeats its single point)
/// - `distance_m` is finite and non-negative
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    mode: Mode,
    waypoints: Vec<Waypoint>,
    distance_m: f64,
    shape: Vec<GeoPoint>,
}

impl RouteLeg {
    /// Construct a leg from its waypoints and travelled distance.
    ///
    /// # Errors
    ///
    /// Returns `Err` if fewer than two waypoints are given or the distance
    /// is negative or not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_planner::domain::{GeoPoint, Mode, RouteLeg, Waypoint};
    ///
    /// let a = GeoPoint::new(1.402235, 103.905384).unwrap();
    /// let b = GeoPoint::new(1.392949, 103.912034).unwrap();
    ///
    /// let leg = RouteLeg::new(Mode::Walk, vec![Waypoint::at(a), Waypoint::at(b)], 1268.0).unwrap();
    /// assert_eq!(leg.start(), a);
    /// assert_eq!(leg.end(), b);
    /// assert_eq!(leg.transfer_count(), 0);
    /// ```
    pub fn new(mode: Mode, waypoints: Vec<Waypoint>, distance_m: f64) -> Result<Self, DomainError> {
        if waypoints.len() < 2 {
            return Err(DomainError::InvalidLeg("a leg needs at least two waypoints"));
        }
        if !distance_m.is_finite() || distance_m < 0.0 {
            return Err(DomainError::InvalidLeg("distance must be finite and non-negative"));
        }
        Ok(Self {
            mode,
            waypoints,
            distance_m,
            shape: Vec::new(),
        })
    }

    /// A straight walk between two points, measured by great-circle distance.
    pub fn direct_walk(start: GeoPoint, end: GeoPoint) -> Self {
        Self {
            mode: Mode::Walk,
            waypoints: vec![Waypoint::at(start), Waypoint::at(end)],
            distance_m: start.distance_m(&end),
            shape: Vec::new(),
        }
    }

    /// Attach a detailed drawing geometry (e.g. the bus route polyline).
    pub fn with_shape(mut self, shape: Vec<GeoPoint>) -> Self {
        self.shape = shape;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    /// Drawing geometry; falls back to the waypoint coordinates.
    pub fn shape(&self) -> Vec<GeoPoint> {
        if self.shape.is_empty() {
            self.waypoints.iter().map(|w| w.point).collect()
        } else {
            self.shape.clone()
        }
    }

    pub fn start(&self) -> GeoPoint {
        // Safe: validated to hold at least two waypoints
        self.waypoints[0].point
    }

    pub fn end(&self) -> GeoPoint {
        self.waypoints[self.waypoints.len() - 1].point
    }

    /// Services in the order they are ridden, consecutive repeats collapsed.
    pub fn services(&self) -> Vec<&ServiceId> {
        let mut services: Vec<&ServiceId> = Vec::new();
        for service in self.waypoints.iter().filter_map(|w| w.service.as_ref()) {
            if services.last() != Some(&service) {
                services.push(service);
            }
        }
        services
    }

    /// Number of service changes within the leg.
    pub fn transfer_count(&self) -> usize {
        self.services().len().saturating_sub(1)
    }
}
