//! Itinerary type.
//!
//! An `Itinerary` is the ordered list of legs that takes a traveller from
//! the requested origin to the requested destination.

use super::{DomainError, Mode, RouteLeg};

/// A complete itinerary.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs join: `legs[i].end()` lies within the join tolerance
///   of `legs[i + 1].start()`
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    legs: Vec<RouteLeg>,
}

impl Itinerary {
    /// Constructs an itinerary, checking that consecutive legs join within
    /// `tolerance_m` metres.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_planner::domain::{GeoPoint, Itinerary, RouteLeg};
    ///
    /// let a = GeoPoint::new(1.4000, 103.9).unwrap();
    /// let b = GeoPoint::new(1.4010, 103.9).unwrap();
    /// let c = GeoPoint::new(1.4020, 103.9).unwrap();
    ///
    /// let itinerary = Itinerary::new(
    ///     vec![RouteLeg::direct_walk(a, b), RouteLeg::direct_walk(b, c)],
    ///     1.0,
    /// )
    /// .unwrap();
    /// assert_eq!(itinerary.legs().len(), 2);
    /// ```
    pub fn new(legs: Vec<RouteLeg>, tolerance_m: f64) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        for window in legs.windows(2) {
            let gap_m = window[0].end().distance_m(&window[1].start());
            if gap_m > tolerance_m {
                return Err(DomainError::LegsNotConnected {
                    from: window[0].end(),
                    to: window[1].start(),
                    gap_m,
                });
            }
        }

        Ok(Self { legs })
    }

    pub fn legs(&self) -> &[RouteLeg] {
        &self.legs
    }

    /// Total travelled distance in metres.
    pub fn distance_m(&self) -> f64 {
        self.legs.iter().map(RouteLeg::distance_m).sum()
    }

    /// Modes in leg order.
    pub fn modes(&self) -> Vec<Mode> {
        self.legs.iter().map(RouteLeg::mode).collect()
    }

    /// Returns true if the itinerary only walks.
    pub fn is_walk_only(&self) -> bool {
        self.legs.iter().all(|leg| leg.mode() == Mode::Walk)
    }

    /// Number of transit boardings beyond the first, counting changes within
    /// bus legs as well as between transit legs.
    pub fn transfer_count(&self) -> usize {
        let transit: Vec<&RouteLeg> = self
            .legs
            .iter()
            .filter(|leg| leg.mode() != Mode::Walk)
            .collect();
        let within: usize = transit.iter().map(|leg| leg.transfer_count()).sum();
        within + transit.len().saturating_sub(1)
    }
}
