//! Service line types.

use std::fmt;

use serde::Serialize;

use super::{GeoPoint, StopCode};

/// Identifier of a bus service or rail line (e.g. `"3"`, `"34"`, `"PE"`).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceId({})", self.0)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Direction of travel on a line.
///
/// Line files key their stop sequences by `"1"` and `"2"`; the same service
/// has one ordered sequence per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Direction {
    Outbound,
    Inbound,
}

impl Direction {
    /// Map a 1-based direction number to a direction.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Direction::Outbound),
            2 => Some(Direction::Inbound),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Direction::Outbound => 1,
            Direction::Inbound => 2,
        }
    }
}

/// Key of a directional service line.
pub type LineKey = (ServiceId, Direction);

/// Deterministic identifier of a route geometry point: line, direction and
/// position along the line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoutePointId {
    pub service: ServiceId,
    pub direction: Direction,
    pub seq: usize,
}

impl fmt::Display for RoutePointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.service, self.direction.number(), self.seq)
    }
}

/// A point of a line's route geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePoint {
    pub id: RoutePointId,
    pub point: GeoPoint,
}

/// A stop as reported by a particular line's stop list.
///
/// The coordinate is the line file's own value, used when no better
/// source is available for the stop.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStop {
    pub code: StopCode,
    pub point: GeoPoint,
}

/// One directional sequence of stops operated under a single service id.
///
/// # Invariants
///
/// - `stops` is ordered in the direction of travel
/// - a line held by a network has at least one stop or route point
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceLine {
    pub service: ServiceId,
    pub direction: Direction,
    pub stops: Vec<LineStop>,
    pub geometry: Vec<RoutePoint>,
}

impl ServiceLine {
    pub fn new(service: ServiceId, direction: Direction) -> Self {
        Self {
            service,
            direction,
            stops: Vec::new(),
            geometry: Vec::new(),
        }
    }

    pub fn key(&self) -> LineKey {
        (self.service.clone(), self.direction)
    }

    /// Returns true if the line has neither stops nor route geometry.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty() && self.geometry.is_empty()
    }

    /// Appends a route geometry point, minting its id from the current length.
    pub fn push_route_point(&mut self, point: GeoPoint) {
        let id = RoutePointId {
            service: self.service.clone(),
            direction: self.direction,
            seq: self.geometry.len(),
        };
        self.geometry.push(RoutePoint { id, point });
    }

    /// The line's own coordinate for `code`, if the stop is on this line.
    pub fn stop_point(&self, code: StopCode) -> Option<GeoPoint> {
        self.stops.iter().find(|s| s.code == code).map(|s| s.point)
    }

    /// Returns true if the line calls at `from` and later at `to`.
    pub fn runs_from(&self, from: StopCode, to: StopCode) -> bool {
        let position = |code| self.stops.iter().position(|s| s.code == code);
        matches!((position(from), position(to)), (Some(a), Some(b)) if a < b)
    }

    /// Consecutive stop pairs in travel order.
    pub fn hops(&self) -> impl Iterator<Item = (&LineStop, &LineStop)> {
        self.stops.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Route geometry between the points nearest to `from` and `to`.
    ///
    /// If the nearest point to `to` precedes the nearest point to `from`
    /// (loop services revisit the same area), the slice is taken in reverse.
    pub fn geometry_between(&self, from: &GeoPoint, to: &GeoPoint) -> Vec<GeoPoint> {
        let nearest = |target: &GeoPoint| {
            self.geometry
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    a.point
                        .distance_m(target)
                        .total_cmp(&b.point.distance_m(target))
                })
                .map(|(i, _)| i)
        };

        let (Some(start), Some(end)) = (nearest(from), nearest(to)) else {
            return Vec::new();
        };

        if start <= end {
            self.geometry[start..=end].iter().map(|p| p.point).collect()
        } else {
            self.geometry[end..=start]
                .iter()
                .rev()
                .map(|p| p.point)
                .collect()
        }
    }
}
