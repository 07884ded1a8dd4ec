//! Rail network and fewest-stops search.
//!
//! Rail lines are short loops with uniform station spacing, so hop count
//! stands in for distance and a breadth-first search is enough.

use std::collections::{BTreeMap, VecDeque};

use tracing::debug;

use crate::domain::{GeoPoint, Mode, NodeRef, RouteLeg, StationId, Waypoint};

use super::mode::{ModePlanner, RouteFailure};

/// A rail station.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub line: String,
    pub point: GeoPoint,
}

/// Outcome of a station-to-station search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RailSearch {
    /// Stations in travel order, both ends included.
    Found(Vec<StationId>),
    SameStation,
    /// Unreachable, or one of the stations is not in the graph.
    NoRoute,
}

/// Undirected station graph. Neighbour order is significant: among paths
/// with the fewest hops, the one discovered first wins.
#[derive(Debug, Clone, Default)]
pub struct RailGraph {
    stations: BTreeMap<StationId, Station>,
    adjacency: BTreeMap<StationId, Vec<StationId>>,
}

impl RailGraph {
    pub fn new(
        stations: impl IntoIterator<Item = Station>,
        adjacency: BTreeMap<StationId, Vec<StationId>>,
    ) -> Self {
        Self {
            stations: stations.into_iter().map(|s| (s.id, s)).collect(),
            adjacency,
        }
    }

    /// The Punggol LRT: East and West loops joined at Punggol.
    pub fn punggol_lrt() -> Self {
        const EAST: &str = "Punggol LRT East Loop";
        const WEST: &str = "Punggol LRT West Loop";
        const BOTH: &str = "Punggol LRT";

        #[rustfmt::skip]
        let stations: [(u64, &str, &str, f64, f64); 14] = [
            (213085056, "Punggol", BOTH, 1.4052585, 103.9023302),
            (1840734608, "Soo Teck", WEST, 1.4053014, 103.8972748),
            (1840734610, "Sumang", WEST, 1.4085322, 103.8985342),
            (1840734598, "Nibong", WEST, 1.4118877, 103.9003304),
            (1840734607, "Samudera", WEST, 1.4159537, 103.9021398),
            (1840734600, "Punggol Point", WEST, 1.4168814, 103.9066298),
            (1840734606, "Sam Kee", WEST, 1.4097076, 103.904874),
            (1840734593, "Damai", EAST, 1.4052523, 103.9085982),
            (1840734599, "Oasis", EAST, 1.4022823, 103.9127329),
            (1840734594, "Kadaloor", EAST, 1.399601, 103.9164448),
            (1840734604, "Riviera", EAST, 1.394538, 103.9161538),
            (1840734578, "Coral Edge", EAST, 1.3939318, 103.9125723),
            (1840734597, "Meridian", EAST, 1.3969357, 103.9088889),
            (1840734592, "Cove", EAST, 1.3994603, 103.9058059),
        ];

        #[rustfmt::skip]
        let adjacency: [(u64, &[u64]); 14] = [
            (213085056, &[1840734593, 1840734592, 1840734608, 1840734606]),
            (1840734593, &[213085056, 1840734599]),
            (1840734599, &[1840734593, 1840734594]),
            (1840734594, &[1840734599, 1840734604]),
            (1840734604, &[1840734594, 1840734578]),
            (1840734578, &[1840734604, 1840734597]),
            (1840734597, &[1840734578, 1840734592]),
            (1840734592, &[1840734597, 213085056]),
            (1840734608, &[213085056, 1840734610]),
            (1840734610, &[1840734608, 1840734598]),
            (1840734598, &[1840734610, 1840734607]),
            (1840734607, &[1840734598, 1840734600]),
            (1840734600, &[1840734607, 1840734606]),
            (1840734606, &[1840734600, 213085056]),
        ];

        let stations = stations
            .into_iter()
            .filter_map(|(id, name, line, lat, lon)| {
                Some(Station {
                    id: StationId(id),
                    name: name.to_string(),
                    line: line.to_string(),
                    point: GeoPoint::new(lat, lon).ok()?,
                })
            });
        let adjacency = adjacency
            .into_iter()
            .map(|(id, next)| {
                (
                    StationId(id),
                    next.iter().copied().map(StationId).collect(),
                )
            })
            .collect();

        Self::new(stations, adjacency)
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn neighbours(&self, id: StationId) -> &[StationId] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fewest-hops path from `start` to `end`.
    pub fn bfs(&self, start: StationId, end: StationId) -> RailSearch {
        if start == end {
            return RailSearch::SameStation;
        }
        if !self.adjacency.contains_key(&start) {
            return RailSearch::NoRoute;
        }

        // Predecessor of each discovered station; the start maps to itself
        let mut prev: BTreeMap<StationId, StationId> = BTreeMap::from([(start, start)]);
        let mut queue = VecDeque::from([start]);

        while let Some(station) = queue.pop_front() {
            for &next in self.neighbours(station) {
                if prev.contains_key(&next) {
                    continue;
                }
                prev.insert(next, station);

                if next == end {
                    let mut path = vec![end];
                    let mut cursor = end;
                    while cursor != start {
                        cursor = prev[&cursor];
                        path.push(cursor);
                    }
                    path.reverse();
                    return RailSearch::Found(path);
                }
                queue.push_back(next);
            }
        }

        RailSearch::NoRoute
    }

    /// Station closest to `point` by great-circle distance.
    pub fn nearest_station(&self, point: &GeoPoint) -> Option<&Station> {
        self.stations
            .values()
            .min_by(|a, b| a.point.distance_m(point).total_cmp(&b.point.distance_m(point)))
    }

    /// The station at `point`, if one lies within `tolerance_m`.
    pub fn station_at(&self, point: &GeoPoint, tolerance_m: f64) -> Option<&Station> {
        self.nearest_station(point)
            .filter(|s| s.point.is_near(point, tolerance_m))
    }
}

/// Rail legs between the stations nearest to each end.
#[derive(Debug, Clone, Copy)]
pub struct RailPlanner<'a> {
    rail: &'a RailGraph,
}

impl<'a> RailPlanner<'a> {
    pub fn new(rail: &'a RailGraph) -> Self {
        Self { rail }
    }
}

impl ModePlanner for RailPlanner<'_> {
    fn mode(&self) -> Mode {
        Mode::Rail
    }

    fn plan_leg(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteLeg, RouteFailure> {
        let no_route = RouteFailure::NoRouteFound(Mode::Rail);
        let from = self.rail.nearest_station(&start).ok_or(no_route.clone())?;
        let to = self.rail.nearest_station(&end).ok_or(no_route.clone())?;

        let ids = match self.rail.bfs(from.id, to.id) {
            RailSearch::Found(ids) => ids,
            RailSearch::SameStation => return Err(RouteFailure::SameStop),
            RailSearch::NoRoute => return Err(no_route),
        };
        debug!(from = %from.name, to = %to.name, stations = ids.len(), "rail path found");

        let stations = ids
            .iter()
            .map(|id| self.rail.station(*id).ok_or(no_route.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        let distance_m = stations
            .windows(2)
            .map(|w| w[0].point.distance_m(&w[1].point))
            .sum();
        let waypoints = stations
            .iter()
            .map(|s| Waypoint {
                point: s.point,
                node: Some(NodeRef::Station(s.id)),
                label: Some(s.name.clone()),
                service: None,
            })
            .collect();

        Ok(RouteLeg::new(Mode::Rail, waypoints, distance_m)?)
    }
}
