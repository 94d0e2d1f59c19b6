//! Projection output types
//!
//! Field names follow the JSON shape the service layer returns to clients.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::assumptions::AssumptionsSnapshot;
use super::ids::GoalId;

/// Percentile balances for one simulated year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyProjection {
    pub year: i16,
    pub age: i32,
    pub p5: u64,
    pub p25: u64,
    pub p50: u64,
    pub p75: u64,
    pub p95: u64,
}

impl YearlyProjection {
    /// Whether the band is ordered `p5 <= p25 <= p50 <= p75 <= p95`
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.p5 <= self.p25 && self.p25 <= self.p50 && self.p50 <= self.p75 && self.p75 <= self.p95
    }
}

/// Likelihood of reaching one goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProbability {
    pub goal_id: GoalId,
    pub title: String,
    pub target_amount: u64,
    pub target_year: i16,
    /// Fraction of trials at or above target in the target year, 4 decimals
    pub probability: f64,
    /// First year whose median balance reaches the target
    pub expected_achievement_year: Option<i16>,
}

/// Complete result of one projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub calculated_at: Timestamp,
    pub assumptions_snapshot: AssumptionsSnapshot,
    pub yearly_projections: Vec<YearlyProjection>,
    pub goal_probabilities: Vec<GoalProbability>,
}

impl SimulationResponse {
    /// Projection for a given calendar year, if it was simulated
    #[must_use]
    pub fn projection_for(&self, year: i16) -> Option<&YearlyProjection> {
        self.yearly_projections.iter().find(|p| p.year == year)
    }

    /// Probability entry for a given goal
    #[must_use]
    pub fn probability_for(&self, goal_id: &GoalId) -> Option<&GoalProbability> {
        self.goal_probabilities.iter().find(|g| &g.goal_id == goal_id)
    }
}
