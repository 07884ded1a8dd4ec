//! Bus stop types.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::{GeoPoint, ServiceId};

/// Error returned when parsing an invalid stop code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop code: {reason}")]
pub struct InvalidStopCode {
    reason: &'static str,
}

/// A bus stop code, unique per physical stop.
///
/// Codes are non-negative integers. Published codes are often zero-padded
/// strings such as `"03011"`; padding is discarded when parsing.
///
/// # Examples
///
/// ```
/// use route_planner::domain::StopCode;
///
/// let code = StopCode::parse("65009").unwrap();
/// assert_eq!(code.value(), 65009);
///
/// assert_eq!(StopCode::parse(" 03011 ").unwrap().value(), 3011);
/// assert!(StopCode::parse("65A09").is_err());
/// assert!(StopCode::parse("").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StopCode(u32);

impl StopCode {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Parse a stop code from its textual form.
    pub fn parse(s: &str) -> Result<Self, InvalidStopCode> {
        let s = s.trim();
        if s.is_empty() {
            return Err(InvalidStopCode {
                reason: "must not be empty",
            });
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStopCode {
                reason: "must contain only digits",
            });
        }
        s.parse::<u32>().map(Self).map_err(|_| InvalidStopCode {
            reason: "value too large",
        })
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopCode({})", self.0)
    }
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A physical bus stop and the services that call at it.
///
/// Created during network ingestion; immutable afterwards. A stop only
/// exists in a network if at least one loaded line passes through it.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub code: StopCode,
    pub point: GeoPoint,
    pub description: String,
    pub services: BTreeSet<ServiceId>,
}

impl Stop {
    /// Returns true if `service` calls at this stop.
    pub fn is_served_by(&self, service: &ServiceId) -> bool {
        self.services.contains(service)
    }
}
