//! Walking legs over the street network.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::domain::{GeoPoint, Mode, NodeRef, RouteLeg, Waypoint};
use crate::spatial::StreetGraph;

use super::mode::{ModePlanner, RouteFailure};

/// Shortest street path between two nodes, with its length in metres.
pub fn street_path(streets: &StreetGraph, from: u64, to: u64) -> Option<(Vec<u64>, f64)> {
    streets.point(from)?;
    if from == to {
        return Some((vec![from], 0.0));
    }

    let mut dist: BTreeMap<u64, f64> = BTreeMap::from([(from, 0.0)]);
    let mut prev: BTreeMap<u64, u64> = BTreeMap::new();
    let mut heap = BinaryHeap::from([Reverse((OrderedFloat(0.0), from))]);

    while let Some(Reverse((OrderedFloat(d), node))) = heap.pop() {
        if node == to {
            let mut path = vec![to];
            let mut cursor = to;
            while let Some(&p) = prev.get(&cursor) {
                path.push(p);
                cursor = p;
            }
            path.reverse();
            return Some((path, d));
        }
        if dist.get(&node).is_some_and(|&best| d > best) {
            continue;
        }

        for edge in streets.edges_from(node) {
            let next = d + edge.length_m;
            if dist.get(&edge.to).is_none_or(|&best| next < best) {
                dist.insert(edge.to, next);
                prev.insert(edge.to, node);
                heap.push(Reverse((OrderedFloat(next), edge.to)));
            }
        }
    }

    None
}

/// Walking legs, along streets when a street network is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkPlanner<'a> {
    streets: Option<&'a StreetGraph>,
}

impl<'a> WalkPlanner<'a> {
    pub fn new(streets: Option<&'a StreetGraph>) -> Self {
        Self { streets }
    }

    /// Walk along streets, or in a straight line when that is not possible.
    pub fn walk(&self, start: GeoPoint, end: GeoPoint) -> RouteLeg {
        if start == end {
            return RouteLeg::direct_walk(start, end);
        }
        self.street_leg(start, end)
            .unwrap_or_else(|| RouteLeg::direct_walk(start, end))
    }

    fn street_leg(&self, start: GeoPoint, end: GeoPoint) -> Option<RouteLeg> {
        let streets = self.streets?;
        let from = streets.nearest_edge_endpoint(&start)?;
        let to = streets.nearest_edge_endpoint(&end)?;

        let Some((nodes, street_m)) = street_path(streets, from, to) else {
            debug!(from, to, "street network disconnected; walking direct");
            return None;
        };

        let mut waypoints = Vec::with_capacity(nodes.len() + 2);
        waypoints.push(Waypoint::at(start));
        for id in &nodes {
            waypoints.push(Waypoint {
                node: Some(NodeRef::Street(*id)),
                ..Waypoint::at(streets.point(*id)?)
            });
        }
        waypoints.push(Waypoint::at(end));

        let access_m = start.distance_m(&waypoints[1].point);
        let egress_m = waypoints[waypoints.len() - 2].point.distance_m(&end);
        RouteLeg::new(Mode::Walk, waypoints, access_m + street_m + egress_m).ok()
    }
}

impl ModePlanner for WalkPlanner<'_> {
    fn mode(&self) -> Mode {
        Mode::Walk
    }

    fn plan_leg(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteLeg, RouteFailure> {
        Ok(self.walk(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    /// A square block 1-2-3-4 with a long detour 1-5-3 and a separate
    /// island 8-9.
    fn streets() -> StreetGraph {
        StreetGraph::new(
            vec![
                (1, pt(1.400, 103.900)),
                (2, pt(1.401, 103.900)),
                (3, pt(1.401, 103.901)),
                (4, pt(1.400, 103.901)),
                (5, pt(1.395, 103.905)),
                (8, pt(1.420, 103.920)),
                (9, pt(1.421, 103.920)),
            ],
            &[(1, 2), (2, 3), (3, 4), (4, 1), (1, 5), (5, 3), (8, 9)],
        )
    }

    #[test]
    fn path_along_streets() {
        let g = streets();
        let (path, d) = street_path(&g, 1, 3).unwrap();

        assert_eq!(path.len(), 3);
        assert_eq!(path[0], 1);
        assert_eq!(path[2], 3);
        let expected = pt(1.400, 103.900).distance_m(&pt(1.401, 103.900))
            + pt(1.401, 103.900).distance_m(&pt(1.401, 103.901));
        assert!((d - expected).abs() < 1.0);
    }

    #[test]
    fn disconnected_nodes() {
        let g = streets();
        assert!(street_path(&g, 1, 9).is_none());
        assert!(street_path(&g, 42, 1).is_none());
        assert_eq!(street_path(&g, 2, 2), Some((vec![2], 0.0)));
    }

    #[test]
    fn walk_snaps_to_streets() {
        let g = streets();
        let planner = WalkPlanner::new(Some(&g));
        let start = pt(1.39995, 103.89995);
        let end = pt(1.40105, 103.90105);

        let leg = planner.walk(start, end);
        assert_eq!(leg.mode(), Mode::Walk);
        assert_eq!(leg.start(), start);
        assert_eq!(leg.end(), end);
        assert_eq!(leg.waypoints()[1].node, Some(NodeRef::Street(1)));
        assert_eq!(
            leg.waypoints()[leg.waypoints().len() - 2].node,
            Some(NodeRef::Street(3))
        );
        assert!(leg.distance_m() > start.distance_m(&end));
    }

    #[test]
    fn walk_without_streets_is_direct() {
        let planner = WalkPlanner::default();
        let start = pt(1.400, 103.900);
        let end = pt(1.405, 103.900);

        let leg = planner.walk(start, end);
        assert_eq!(leg, RouteLeg::direct_walk(start, end));
    }

    #[test]
    fn walk_across_disconnected_streets_is_direct() {
        let g = streets();
        let planner = WalkPlanner::new(Some(&g));
        let start = pt(1.400, 103.900);
        let end = pt(1.4205, 103.920);

        let leg = planner.walk(start, end);
        assert_eq!(leg.waypoints().len(), 2);
        assert!((leg.distance_m() - start.distance_m(&end)).abs() < 1e-9);
    }

    #[test]
    fn zero_length_walk() {
        let g = streets();
        let p = pt(1.4003, 103.9003);
        let leg = WalkPlanner::new(Some(&g)).plan_leg(p, p).unwrap();
        assert_eq!(leg.distance_m(), 0.0);
        assert_eq!(leg.waypoints().len(), 2);
    }
}
