//! Per-mode leg planners.

use crate::domain::{DomainError, GeoPoint, InvalidCoordinate, Mode, RouteLeg, StopCode};

/// Why a leg (or a whole route) could not be planned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteFailure {
    /// The search for this mode was exhausted
    #[error("no {0} route found")]
    NoRouteFound(Mode),

    /// A snapped stop is not served by any line
    #[error("no service calls at stop {0}")]
    NoCommonService(StopCode),

    /// The nearest node carries no usable stop code
    #[error("node {node} has no valid stop code")]
    AmbiguousOrInvalidStop { node: u64 },

    /// Both ends snap to the same stop or station
    #[error("start and end resolve to the same stop")]
    SameStop,

    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Plans a single leg in one mode.
///
/// Implementations may snap the endpoints to their own network; the
/// returned leg starts and ends at the snapped positions.
pub trait ModePlanner {
    fn mode(&self) -> Mode;

    fn plan_leg(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteLeg, RouteFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            RouteFailure::NoRouteFound(Mode::Bus).to_string(),
            "no bus route found"
        );
        assert_eq!(
            RouteFailure::NoCommonService(StopCode::new(65009)).to_string(),
            "no service calls at stop 65009"
        );
        assert_eq!(
            RouteFailure::AmbiguousOrInvalidStop { node: 42 }.to_string(),
            "node 42 has no valid stop code"
        );
        assert_eq!(
            RouteFailure::Domain(DomainError::EmptyItinerary).to_string(),
            "itinerary must have at least one leg"
        );
    }
}
