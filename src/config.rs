//! Solve configuration.
//!
//! Plain values passed into the engine by the caller; the engine never
//! fetches configuration itself. Defaults mirror typical teaching-day
//! settings: preferred window 09:00-17:00, six-hour daily cap per level,
//! utilization band [0.3, 0.9].

use serde::{Deserialize, Serialize};

/// Weights applied to individual soft-constraint penalties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftWeights {
    /// Idle-gap penalty weight (per idle hour between lectures).
    pub gap: f64,
    /// Out-of-band utilization penalty weight.
    pub utilization: f64,
    /// Outside-preferred-window penalty weight.
    pub time_preference: f64,
    /// Over-cap daily load penalty weight.
    pub daily_load: f64,
    /// Uneven day distribution penalty weight.
    pub day_balance: f64,
}

impl Default for SoftWeights {
    fn default() -> Self {
        Self {
            gap: 1.0,
            utilization: 1.0,
            time_preference: 0.5,
            daily_load: 0.5,
            day_balance: 0.25,
        }
    }
}

/// Configuration consumed (not owned) by the solving pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveConfig {
    /// Soft-constraint weights.
    pub weights: SoftWeights,
    /// Resources used below this ratio are penalized.
    pub low_utilization: f64,
    /// Resources used above this ratio are penalized.
    pub high_utilization: f64,
    /// Earliest preferred lecture start (minutes from midnight).
    pub preferred_start_min: i32,
    /// Latest preferred lecture end (minutes from midnight).
    pub preferred_end_min: i32,
    /// Maximum teaching hours per level per day before the daily-load
    /// penalty applies.
    pub max_daily_hours: f64,
    /// Decision-point budget for one level's search.
    pub max_decisions: u64,
    /// How many distinct solutions to enumerate per level; the best-scoring
    /// one is committed.
    pub solution_count: usize,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            weights: SoftWeights::default(),
            low_utilization: 0.3,
            high_utilization: 0.9,
            preferred_start_min: 9 * 60,
            preferred_end_min: 17 * 60,
            max_daily_hours: 6.0,
            max_decisions: 100_000,
            solution_count: 1,
        }
    }
}

impl SolveConfig {
    /// Creates a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the soft-constraint weights.
    pub fn with_weights(mut self, weights: SoftWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the utilization band [low, high].
    pub fn with_utilization_band(mut self, low: f64, high: f64) -> Self {
        self.low_utilization = low;
        self.high_utilization = high;
        self
    }

    /// Sets the preferred time window.
    pub fn with_preferred_window(mut self, start_min: i32, end_min: i32) -> Self {
        self.preferred_start_min = start_min;
        self.preferred_end_min = end_min;
        self
    }

    /// Sets the daily-load cap in hours.
    pub fn with_max_daily_hours(mut self, hours: f64) -> Self {
        self.max_daily_hours = hours;
        self
    }

    /// Sets the decision budget.
    pub fn with_max_decisions(mut self, max_decisions: u64) -> Self {
        self.max_decisions = max_decisions;
        self
    }

    /// Sets the requested solution count.
    pub fn with_solution_count(mut self, count: usize) -> Self {
        self.solution_count = count.max(1);
        self
    }
}
