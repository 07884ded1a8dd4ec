//! Multimodal route planning.
//!
//! Each request is answered by picking a main mode from the trip distance
//! (or from starting at a station), planning that leg with the matching
//! [`ModePlanner`], and walking the gaps. The bus leg runs Dijkstra over a
//! stop graph whose edges are tagged with the service that links them, so
//! the search can optionally favour staying on the same bus.

mod bus;
mod config;
mod dijkstra;
mod mode;
mod rail;
mod selector;
mod walk;

#[cfg(test)]
mod search_tests;

pub use bus::BusPlanner;
pub use config::{PlannerConfig, TransferPolicy};
pub use dijkstra::{
    BusPath, PathError, PathStep, ServiceSegment, segment_by_service, shortest_path,
};
pub use mode::{ModePlanner, RouteFailure};
pub use rail::{RailGraph, RailPlanner, RailSearch, Station};
pub use selector::{ItineraryBuilder, RoutePlanner, mode_for_distance};
pub use walk::{WalkPlanner, street_path};
