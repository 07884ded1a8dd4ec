//! Domain types for the multimodal route planner.
//!
//! Coordinates, stops, service lines and the legs of an itinerary.
//! Constructors validate, so a `GeoPoint` or `RouteLeg` in hand is always
//! well formed.

mod error;
mod itinerary;
mod leg;
mod point;
mod service;
mod stop;

pub use error::DomainError;
pub use itinerary::Itinerary;
pub use leg::{Mode, NodeRef, RouteLeg, StationId, Waypoint};
pub use point::{GeoPoint, InvalidCoordinate};
pub use service::{Direction, LineKey, LineStop, RoutePoint, RoutePointId, ServiceId, ServiceLine};
pub use stop::{InvalidStopCode, Stop, StopCode};
