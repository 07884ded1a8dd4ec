//! Directed stop-to-stop graph with service-tagged edges.
//!
//! An edge `a → b` tagged `s` means service `s` calls at `a` and then at
//! `b`. Parallel edges between the same stops exist once per common
//! service, so the search can tell staying on a bus from changing.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::domain::{GeoPoint, ServiceId, ServiceLine, StopCode};
use crate::network::TransitNetwork;
use crate::spatial::GeoIndex;

/// An outgoing edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusEdge<'a> {
    pub to: StopCode,
    pub service: &'a ServiceId,
    pub distance_m: f64,
}

/// Stop → {(neighbour, service) → metres}.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjacencyGraph {
    edges: BTreeMap<StopCode, BTreeMap<(StopCode, ServiceId), f64>>,
    /// Every stop at either end of an edge.
    stops: BTreeSet<StopCode>,
}

impl AdjacencyGraph {
    /// Outgoing edges of `stop`, ordered by neighbour then service.
    pub fn edges_from(&self, stop: StopCode) -> impl Iterator<Item = BusEdge<'_>> {
        self.edges
            .get(&stop)
            .into_iter()
            .flatten()
            .map(|((to, service), &distance_m)| BusEdge {
                to: *to,
                service,
                distance_m,
            })
    }

    /// Distance of the edge `from → to` on `service`.
    pub fn edge(&self, from: StopCode, to: StopCode, service: &ServiceId) -> Option<f64> {
        self.edges
            .get(&from)?
            .get(&(to, service.clone()))
            .copied()
    }

    /// Returns true if `stop` appears as either end of an edge.
    pub fn contains(&self, stop: StopCode) -> bool {
        self.stops.contains(&stop)
    }

    /// Number of stops at either end of an edge.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    fn insert(&mut self, from: StopCode, to: StopCode, service: ServiceId, distance_m: f64) {
        self.stops.extend([from, to]);
        self.edges
            .entry(from)
            .or_default()
            .insert((to, service), distance_m);
    }
}

/// Builds an [`AdjacencyGraph`] from a transit network.
///
/// Stop coordinates come from the geographic index when it knows the stop
/// code, otherwise from the line's own stop list.
#[derive(Debug, Clone, Copy)]
pub struct AdjacencyGraphBuilder<'a> {
    geo_index: &'a GeoIndex,
}

impl<'a> AdjacencyGraphBuilder<'a> {
    pub fn new(geo_index: &'a GeoIndex) -> Self {
        Self { geo_index }
    }

    pub fn build(&self, network: &TransitNetwork) -> AdjacencyGraph {
        let mut graph = AdjacencyGraph::default();

        for line in network.lines() {
            for (a, b) in line.hops() {
                let (Some(pa), Some(pb)) =
                    (self.resolve(line, a.code), self.resolve(line, b.code))
                else {
                    debug!(
                        service = %line.service,
                        from = %a.code,
                        to = %b.code,
                        "no coordinate for hop"
                    );
                    continue;
                };

                let distance_m = pa.distance_m(&pb);
                if distance_m == 0.0 {
                    trace!(
                        service = %line.service,
                        from = %a.code,
                        to = %b.code,
                        "zero-length hop"
                    );
                    continue;
                }

                let (Some(at_a), Some(at_b)) =
                    (network.services_at(a.code), network.services_at(b.code))
                else {
                    continue;
                };
                for service in at_a.intersection(at_b) {
                    graph.insert(a.code, b.code, service.clone(), distance_m);
                }
            }
        }

        debug!(
            stops = graph.stop_count(),
            edges = graph.edge_count(),
            "built adjacency graph"
        );
        graph
    }

    fn resolve(&self, line: &ServiceLine, code: StopCode) -> Option<GeoPoint> {
        self.geo_index
            .stop_point(code)
            .or_else(|| line.stop_point(code))
    }
}
