//! Mode selection and itinerary assembly.
//!
//! The trip distance picks the main mode; walks fill the gaps around it.
//! Transit legs are best effort: a failed bus or rail leg is logged and
//! left out, and the itinerary walks instead.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{GeoPoint, Itinerary, Mode, RouteLeg};
use crate::network::NetworkData;

use super::bus::BusPlanner;
use super::config::PlannerConfig;
use super::mode::{ModePlanner, RouteFailure};
use super::rail::{RailGraph, RailPlanner};
use super::walk::WalkPlanner;

/// Accumulates legs, tracking where the traveller currently is.
pub struct ItineraryBuilder<'a> {
    walk: WalkPlanner<'a>,
    tolerance_m: f64,
    cursor: GeoPoint,
    legs: Vec<RouteLeg>,
}

impl<'a> ItineraryBuilder<'a> {
    pub fn new(start: GeoPoint, walk: WalkPlanner<'a>, tolerance_m: f64) -> Self {
        Self {
            walk,
            tolerance_m,
            cursor: start,
            legs: Vec::new(),
        }
    }

    /// End of the last leg, or the origin.
    pub fn cursor(&self) -> GeoPoint {
        self.cursor
    }

    /// Append a transit leg, walking to its start if it begins elsewhere.
    pub fn push_transit(&mut self, leg: RouteLeg) {
        if !self.cursor.is_near(&leg.start(), self.tolerance_m) {
            self.legs.push(self.walk.walk(self.cursor, leg.start()));
        }
        self.cursor = leg.end();
        self.legs.push(leg);
    }

    /// Plan a leg from the cursor with `planner` and append it.
    ///
    /// Failures are logged and dropped; the cursor stays put.
    pub fn try_leg(&mut self, planner: &dyn ModePlanner, end: GeoPoint) {
        match planner.plan_leg(self.cursor, end) {
            Ok(leg) => self.push_transit(leg),
            Err(RouteFailure::SameStop) => {
                debug!(mode = %planner.mode(), "leg not needed");
            }
            Err(e) => {
                warn!(mode = %planner.mode(), error = %e, "leg failed; walking instead");
            }
        }
    }

    /// Walk the rest of the way to `end` and validate the result.
    pub fn finish(mut self, end: GeoPoint) -> Result<Itinerary, RouteFailure> {
        if self.legs.is_empty() || self.cursor != end {
            self.legs.push(self.walk.walk(self.cursor, end));
        }
        Ok(Itinerary::new(self.legs, self.tolerance_m)?)
    }
}

/// Main mode for a trip of `distance_m` that does not start at a station.
///
/// Thresholds are exclusive: a trip exactly at a threshold takes the
/// lighter mode.
pub fn mode_for_distance(config: &PlannerConfig, distance_m: f64) -> Mode {
    if distance_m > config.rail_threshold_m {
        Mode::Rail
    } else if distance_m > config.bus_threshold_m {
        Mode::Bus
    } else {
        Mode::Walk
    }
}

/// Multimodal route planner over shared network data.
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    data: Arc<NetworkData>,
    rail: RailGraph,
    config: PlannerConfig,
}

impl RoutePlanner {
    pub fn new(data: Arc<NetworkData>, rail: RailGraph, config: PlannerConfig) -> Self {
        Self { data, rail, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a route between two raw coordinates.
    pub fn plan_route(
        &self,
        start_lat: f64,
        start_lon: f64,
        end_lat: f64,
        end_lon: f64,
    ) -> Result<Itinerary, RouteFailure> {
        let start = GeoPoint::new(start_lat, start_lon)?;
        let end = GeoPoint::new(end_lat, end_lon)?;
        self.plan(start, end)
    }

    /// Plan a route between two points.
    ///
    /// Starting at a station rides rail first, then a bus unless the rail
    /// terminal is close to the destination. Otherwise the straight-line
    /// distance picks a single main mode.
    pub fn plan(&self, start: GeoPoint, end: GeoPoint) -> Result<Itinerary, RouteFailure> {
        let walk = WalkPlanner::new(self.data.streets.as_ref());
        let bus = BusPlanner::new(
            &self.data,
            self.config.transfer_policy,
            self.config.transfer_bonus,
        );
        let rail = RailPlanner::new(&self.rail);

        let mut builder = ItineraryBuilder::new(start, walk, self.config.leg_join_tolerance_m);

        if let Some(station) = self.rail.station_at(&start, self.config.station_match_m) {
            debug!(station = %station.name, "starting at a station");
            builder.try_leg(&rail, end);
            if !builder.cursor().is_near(&end, self.config.rail_final_walk_m) {
                builder.try_leg(&bus, end);
            }
        } else {
            let distance_m = start.distance_m(&end);
            let mode = mode_for_distance(&self.config, distance_m);
            debug!(distance_m, %mode, "selected main mode");
            match mode {
                Mode::Rail => builder.try_leg(&rail, end),
                Mode::Bus => builder.try_leg(&bus, end),
                Mode::Walk => {}
            }
        }

        let itinerary = builder.finish(end)?;
        info!(
            %start,
            %end,
            legs = itinerary.legs().len(),
            distance_m = itinerary.distance_m(),
            "planned route"
        );
        Ok(itinerary)
    }
}
