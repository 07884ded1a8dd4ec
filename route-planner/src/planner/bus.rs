//! Bus legs between the stops nearest to each end.

use tracing::debug;

use crate::domain::{GeoPoint, Mode, NodeRef, RouteLeg, StopCode, Waypoint};
use crate::graph::AdjacencyGraphBuilder;
use crate::network::{NetworkBuilder, NetworkData, TransitNetwork};

use super::config::TransferPolicy;
use super::dijkstra::{BusPath, segment_by_service, shortest_path};
use super::mode::{ModePlanner, RouteFailure};

/// Plans bus legs over a freshly built network.
///
/// The network and stop graph are rebuilt for every leg from the shared
/// raw records, so concurrent requests never share mutable state.
#[derive(Debug, Clone, Copy)]
pub struct BusPlanner<'a> {
    data: &'a NetworkData,
    policy: TransferPolicy,
    transfer_bonus: f64,
}

impl<'a> BusPlanner<'a> {
    pub fn new(data: &'a NetworkData, policy: TransferPolicy, transfer_bonus: f64) -> Self {
        Self {
            data,
            policy,
            transfer_bonus,
        }
    }

    /// The stop whose geographic node is nearest to `point`.
    fn snap(&self, point: &GeoPoint) -> Result<StopCode, RouteFailure> {
        let node = self
            .data
            .geo_index
            .nearest(point)
            .ok_or(RouteFailure::NoRouteFound(Mode::Bus))?;
        node.stop_code()
            .ok_or(RouteFailure::AmbiguousOrInvalidStop { node: node.id })
    }

    fn stop_point(&self, network: &TransitNetwork, code: StopCode) -> Option<GeoPoint> {
        self.data
            .geo_index
            .stop_point(code)
            .or_else(|| network.stop(code).map(|s| s.point))
    }

    fn waypoints(&self, network: &TransitNetwork, path: &BusPath) -> Option<Vec<Waypoint>> {
        path.steps
            .iter()
            .map(|step| {
                Some(Waypoint {
                    point: self.stop_point(network, step.stop)?,
                    node: Some(NodeRef::Stop(step.stop)),
                    label: network.stop(step.stop).map(|s| s.description.clone()),
                    service: step.service.clone(),
                })
            })
            .collect()
    }

    /// Route geometry of each ridden segment, joined end to end.
    fn shape(&self, network: &TransitNetwork, path: &BusPath) -> Vec<GeoPoint> {
        let mut shape = Vec::new();

        for segment in segment_by_service(path) {
            let (Some(&first), Some(&last)) = (segment.stops.first(), segment.stops.last())
            else {
                continue;
            };
            let (Some(from), Some(to)) =
                (self.stop_point(network, first), self.stop_point(network, last))
            else {
                continue;
            };
            let line = network
                .lines()
                .find(|l| l.service == segment.service && l.runs_from(first, last));
            match line.map(|l| l.geometry_between(&from, &to)) {
                Some(points) if !points.is_empty() => shape.extend(points),
                _ => shape.extend([from, to]),
            }
        }

        shape
    }
}

impl ModePlanner for BusPlanner<'_> {
    fn mode(&self) -> Mode {
        Mode::Bus
    }

    fn plan_leg(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteLeg, RouteFailure> {
        let from = self.snap(&start)?;
        let to = self.snap(&end)?;
        if from == to {
            return Err(RouteFailure::SameStop);
        }

        let network = NetworkBuilder::new(&self.data.area).build(&self.data.raw);
        for code in [from, to] {
            if network.services_at(code).is_none_or(|s| s.is_empty()) {
                return Err(RouteFailure::NoCommonService(code));
            }
        }

        let graph = AdjacencyGraphBuilder::new(&self.data.geo_index).build(&network);
        let path = shortest_path(&graph, from, to, self.policy, self.transfer_bonus)
            .map_err(|e| {
                debug!(error = %e, "bus search failed");
                RouteFailure::NoRouteFound(Mode::Bus)
            })?;
        debug!(
            %from,
            %to,
            stops = path.steps.len(),
            transfers = path.transfer_count(),
            distance_m = path.distance_m,
            "bus path found"
        );

        let waypoints = self
            .waypoints(&network, &path)
            .ok_or(RouteFailure::NoRouteFound(Mode::Bus))?;
        let shape = self.shape(&network, &path);
        Ok(RouteLeg::new(Mode::Bus, waypoints, path.distance_m)?.with_shape(shape))
    }
}
