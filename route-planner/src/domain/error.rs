//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from loading and search errors.

use super::GeoPoint;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Invalid leg construction
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Consecutive legs don't meet
    #[error("legs are not connected: {from} to {to} is {gap_m:.1} m apart")]
    LegsNotConnected {
        from: GeoPoint,
        to: GeoPoint,
        gap_m: f64,
    },

    /// Itinerary has no legs
    #[error("itinerary must have at least one leg")]
    EmptyItinerary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::InvalidLeg("a leg needs at least two waypoints");
        assert_eq!(
            err.to_string(),
            "invalid leg: a leg needs at least two waypoints"
        );

        let err = DomainError::LegsNotConnected {
            from: GeoPoint::new(1.5, 103.5).unwrap(),
            to: GeoPoint::new(1.25, 103.75).unwrap(),
            gap_m: 1234.56,
        };
        assert_eq!(
            err.to_string(),
            "legs are not connected: 1.5,103.5 to 1.25,103.75 is 1234.6 m apart"
        );

        let err = DomainError::EmptyItinerary;
        assert_eq!(err.to_string(), "itinerary must have at least one leg");
    }
}
