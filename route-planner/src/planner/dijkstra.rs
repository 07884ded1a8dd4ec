//! Shortest path over the service-tagged stop graph.
//!
//! Plain Dijkstra on distance, with an optional bias towards staying on
//! the service already being ridden. A stop is finalized the first time it
//! is popped; later entries for it are discarded.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::domain::{ServiceId, StopCode};
use crate::graph::AdjacencyGraph;

use super::config::TransferPolicy;

/// Error from a stop-graph search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The stop has no edges in the graph
    #[error("stop {0} is not in the graph")]
    UnknownStop(StopCode),

    /// The search ran out of edges before reaching the end
    #[error("no route from {from} to {to}")]
    NoRouteFound { from: StopCode, to: StopCode },
}

/// A stop on a path and the service ridden to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub stop: StopCode,
    /// `None` only for the first step.
    pub service: Option<ServiceId>,
}

/// A path through the stop graph.
#[derive(Debug, Clone, PartialEq)]
pub struct BusPath {
    pub steps: Vec<PathStep>,
    /// Physical length in metres, whatever the search priority was.
    pub distance_m: f64,
}

impl BusPath {
    pub fn stops(&self) -> impl Iterator<Item = StopCode> + '_ {
        self.steps.iter().map(|s| s.stop)
    }

    /// Number of service changes along the path.
    pub fn transfer_count(&self) -> usize {
        segment_by_service(self).len().saturating_sub(1)
    }
}

/// A maximal run of a path ridden on one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSegment {
    pub service: ServiceId,
    /// Boarding stop first, alighting stop last.
    pub stops: Vec<StopCode>,
}

/// Split a path into per-service segments.
///
/// A new segment opens whenever the service changes; the stop where the
/// change happens ends one segment and starts the next. A single-stop path
/// has no segments.
pub fn segment_by_service(path: &BusPath) -> Vec<ServiceSegment> {
    let mut segments: Vec<ServiceSegment> = Vec::new();

    for pair in path.steps.windows(2) {
        let Some(service) = pair[1].service.as_ref() else {
            continue;
        };
        match segments.last_mut() {
            Some(current) if &current.service == service => current.stops.push(pair[1].stop),
            _ => segments.push(ServiceSegment {
                service: service.clone(),
                stops: vec![pair[0].stop, pair[1].stop],
            }),
        }
    }

    segments
}

/// Queue entry. Ordered so that `BinaryHeap` pops the lowest priority
/// first, ties broken by stop code and then service.
#[derive(Debug, Clone)]
struct Entry {
    priority: OrderedFloat<f64>,
    distance_m: f64,
    prev: Option<StopCode>,
    stop: StopCode,
    service: Option<ServiceId>,
}

impl Entry {
    fn key(&self) -> (OrderedFloat<f64>, StopCode, Option<&ServiceId>) {
        (self.priority, self.stop, self.service.as_ref())
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// How a finalized stop was reached.
struct Settled {
    prev: Option<StopCode>,
    service: Option<ServiceId>,
    distance_m: f64,
}

/// Find a path from `start` to `end`.
///
/// Under [`TransferPolicy::LeastTransfers`], every edge that continues on
/// the current service is queued twice: once at its true cost and once
/// with `transfer_bonus` subtracted from its priority. This is a heuristic
/// and may return a longer path with fewer changes; the reported distance
/// is always the physical one.
pub fn shortest_path(
    graph: &AdjacencyGraph,
    start: StopCode,
    end: StopCode,
    policy: TransferPolicy,
    transfer_bonus: f64,
) -> Result<BusPath, PathError> {
    for stop in [start, end] {
        if !graph.contains(stop) {
            return Err(PathError::UnknownStop(stop));
        }
    }

    if start == end {
        return Ok(BusPath {
            steps: vec![PathStep {
                stop: start,
                service: None,
            }],
            distance_m: 0.0,
        });
    }

    let mut settled: BTreeMap<StopCode, Settled> = BTreeMap::new();
    let mut heap = BinaryHeap::new();
    heap.push(Entry {
        priority: OrderedFloat(0.0),
        distance_m: 0.0,
        prev: None,
        stop: start,
        service: None,
    });

    while let Some(entry) = heap.pop() {
        if settled.contains_key(&entry.stop) {
            continue;
        }
        trace!(stop = %entry.stop, priority = entry.priority.0, "settle");

        settled.insert(
            entry.stop,
            Settled {
                prev: entry.prev,
                service: entry.service.clone(),
                distance_m: entry.distance_m,
            },
        );

        if entry.stop == end {
            debug!(%start, %end, settled = settled.len(), "bus path found");
            return Ok(rebuild(&settled, end));
        }

        for edge in graph.edges_from(entry.stop) {
            if settled.contains_key(&edge.to) {
                continue;
            }
            let priority = entry.priority.0 + edge.distance_m;
            let distance_m = entry.distance_m + edge.distance_m;
            let next = |priority: f64| Entry {
                priority: OrderedFloat(priority),
                distance_m,
                prev: Some(entry.stop),
                stop: edge.to,
                service: Some(edge.service.clone()),
            };

            heap.push(next(priority));
            if policy == TransferPolicy::LeastTransfers
                && entry.service.as_ref() == Some(edge.service)
            {
                heap.push(next(priority - transfer_bonus));
            }
        }
    }

    debug!(%start, %end, settled = settled.len(), "bus search exhausted");
    Err(PathError::NoRouteFound {
        from: start,
        to: end,
    })
}

fn rebuild(settled: &BTreeMap<StopCode, Settled>, end: StopCode) -> BusPath {
    let distance_m = settled[&end].distance_m;
    let mut steps = Vec::new();
    let mut cursor = Some(end);

    while let Some(stop) = cursor {
        let via = &settled[&stop];
        steps.push(PathStep {
            stop,
            service: via.service.clone(),
        });
        cursor = via.prev;
    }

    steps.reverse();
    BusPath { steps, distance_m }
}
