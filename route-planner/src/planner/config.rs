//! Planner configuration.

/// How the bus search weighs changing services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferPolicy {
    /// Minimise distance only.
    #[default]
    ShortestDistance,
    /// Strongly prefer staying on the current service, even at the cost of
    /// a longer ride.
    LeastTransfers,
}

/// Configuration parameters for route planning.
///
/// All distances are in metres.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Trips longer than this start with a rail leg.
    pub rail_threshold_m: f64,

    /// Trips longer than this (but not rail-length) take a bus.
    pub bus_threshold_m: f64,

    /// A rail terminal this close to the destination is followed by a walk
    /// rather than a bus.
    pub rail_final_walk_m: f64,

    /// How close the origin must be to a station to count as "at" it.
    pub station_match_m: f64,

    /// Largest gap between consecutive legs bridged without an extra walk.
    pub leg_join_tolerance_m: f64,

    /// Priority reduction for staying on the same service under
    /// [`TransferPolicy::LeastTransfers`].
    pub transfer_bonus: f64,

    pub transfer_policy: TransferPolicy,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        rail_threshold_m: f64,
        bus_threshold_m: f64,
        rail_final_walk_m: f64,
        station_match_m: f64,
        leg_join_tolerance_m: f64,
        transfer_bonus: f64,
        transfer_policy: TransferPolicy,
    ) -> Self {
        Self {
            rail_threshold_m,
            bus_threshold_m,
            rail_final_walk_m,
            station_match_m,
            leg_join_tolerance_m,
            transfer_bonus,
            transfer_policy,
        }
    }

    /// Same configuration with a different transfer policy.
    pub fn with_transfer_policy(mut self, policy: TransferPolicy) -> Self {
        self.transfer_policy = policy;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            rail_threshold_m: 600.0,
            bus_threshold_m: 400.0,
            rail_final_walk_m: 200.0,
            station_match_m: 10.0,
            leg_join_tolerance_m: 25.0,
            transfer_bonus: 99_999.0,
            transfer_policy: TransferPolicy::ShortestDistance,
        }
    }
}
