//! Assembling service lines from raw records.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::domain::{LineKey, LineStop, ServiceId, ServiceLine, Stop, StopCode};
use crate::spatial::ServiceArea;

use super::RawNetwork;

/// Service lines and stops inside a service area.
///
/// # Invariants
///
/// - every line is non-empty
/// - every stop is served by at least one line that lists it
#[derive(Debug, Clone, Default)]
pub struct TransitNetwork {
    lines: BTreeMap<LineKey, ServiceLine>,
    stops: BTreeMap<StopCode, Stop>,
}

impl TransitNetwork {
    pub fn lines(&self) -> impl Iterator<Item = &ServiceLine> {
        self.lines.values()
    }

    pub fn line(&self, key: &LineKey) -> Option<&ServiceLine> {
        self.lines.get(key)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn stop(&self, code: StopCode) -> Option<&Stop> {
        self.stops.get(&code)
    }

    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.values()
    }

    /// Services calling at `code`, or `None` for a stop outside the network.
    pub fn services_at(&self, code: StopCode) -> Option<&BTreeSet<ServiceId>> {
        self.stops.get(&code).map(|s| &s.services)
    }
}

/// Builds a [`TransitNetwork`] restricted to a service area.
#[derive(Debug, Clone, Copy)]
pub struct NetworkBuilder<'a> {
    area: &'a ServiceArea,
}

impl<'a> NetworkBuilder<'a> {
    pub fn new(area: &'a ServiceArea) -> Self {
        Self { area }
    }

    /// Keep the records inside the area, in their original order.
    ///
    /// A stop's description is taken from the first line that lists it.
    /// Lines with nothing left after filtering are dropped.
    pub fn build(&self, raw: &RawNetwork) -> TransitNetwork {
        let mut lines: BTreeMap<LineKey, ServiceLine> = BTreeMap::new();
        let mut stops: BTreeMap<StopCode, Stop> = BTreeMap::new();

        for file in &raw.stops {
            for (direction, records) in &file.directions {
                let line = lines
                    .entry((file.service.clone(), *direction))
                    .or_insert_with(|| ServiceLine::new(file.service.clone(), *direction));

                for record in records.iter().filter(|r| self.area.contains(&r.point)) {
                    line.stops.push(LineStop {
                        code: record.code,
                        point: record.point,
                    });
                    stops
                        .entry(record.code)
                        .or_insert_with(|| Stop {
                            code: record.code,
                            point: record.point,
                            description: record.description.clone(),
                            services: BTreeSet::new(),
                        })
                        .services
                        .insert(file.service.clone());
                }
            }
        }

        for file in &raw.routes {
            for (direction, points) in &file.directions {
                let line = lines
                    .entry((file.service.clone(), *direction))
                    .or_insert_with(|| ServiceLine::new(file.service.clone(), *direction));

                for point in points.iter().filter(|p| self.area.contains(p)) {
                    line.push_route_point(*point);
                }
            }
        }

        lines.retain(|(service, direction), line| {
            let keep = !line.is_empty();
            if !keep {
                debug!(%service, direction = direction.number(), "line has no points in area");
            }
            keep
        });

        debug!(lines = lines.len(), stops = stops.len(), "built transit network");
        TransitNetwork { lines, stops }
    }
}
