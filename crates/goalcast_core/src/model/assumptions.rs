//! Household assumptions that drive a projection
//!
//! Rates are stored as percentages (`3.0` means 3%) exactly as the user
//! enters them; the trial engine divides by 100 when sampling.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Trial counts a user may pick for their stored assumptions
pub const ALLOWED_TRIAL_COUNTS: [u32; 3] = [100, 500, 1000];

pub const DEFAULT_AGE: u8 = 30;
pub const DEFAULT_INCOME_GROWTH: f64 = 3.0;
pub const DEFAULT_INVESTMENT_RETURN: f64 = 5.0;
pub const DEFAULT_INFLATION_RATE: f64 = 2.0;
pub const DEFAULT_MONTHLY_INVESTMENT: u64 = 0;
pub const DEFAULT_SIMULATION_TRIALS: u32 = 1000;

/// Immutable copy of the assumptions captured when a projection runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssumptionsSnapshot {
    pub age: u8,
    pub annual_income_growth: f64,
    pub investment_return: f64,
    pub inflation_rate: f64,
    pub monthly_investment: u64,
    pub simulation_trials: u32,
}

impl Default for AssumptionsSnapshot {
    fn default() -> Self {
        Self {
            age: DEFAULT_AGE,
            annual_income_growth: DEFAULT_INCOME_GROWTH,
            investment_return: DEFAULT_INVESTMENT_RETURN,
            inflation_rate: DEFAULT_INFLATION_RATE,
            monthly_investment: DEFAULT_MONTHLY_INVESTMENT,
            simulation_trials: DEFAULT_SIMULATION_TRIALS,
        }
    }
}

impl AssumptionsSnapshot {
    /// Whether every rate is a finite number
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.annual_income_growth.is_finite()
            && self.investment_return.is_finite()
            && self.inflation_rate.is_finite()
    }

    /// Yearly contribution before income growth is applied
    #[must_use]
    pub fn annual_investment(&self) -> f64 {
        self.monthly_investment as f64 * 12.0
    }
}

/// Stored assumptions row for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub user_id: UserId,
    #[serde(flatten)]
    pub snapshot: AssumptionsSnapshot,
    pub updated_at: Timestamp,
}

/// Full replacement of a user's assumptions
///
/// `simulation_trials` may be omitted, in which case the default trial count
/// is stored rather than the previous value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssumptionsUpdate {
    pub age: u8,
    pub annual_income_growth: f64,
    pub investment_return: f64,
    pub inflation_rate: f64,
    pub monthly_investment: u64,
    #[serde(default)]
    pub simulation_trials: Option<u32>,
}

impl AssumptionsUpdate {
    #[must_use]
    pub fn into_snapshot(self) -> AssumptionsSnapshot {
        AssumptionsSnapshot {
            age: self.age,
            annual_income_growth: self.annual_income_growth,
            investment_return: self.investment_return,
            inflation_rate: self.inflation_rate,
            monthly_investment: self.monthly_investment,
            simulation_trials: self.simulation_trials.unwrap_or(DEFAULT_SIMULATION_TRIALS),
        }
    }
}

/// Partial assumptions used by what-if scenarios
///
/// Present fields replace the stored value for one computation only; nothing
/// is written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssumptionOverrides {
    pub age: Option<u8>,
    pub annual_income_growth: Option<f64>,
    pub investment_return: Option<f64>,
    pub inflation_rate: Option<f64>,
    pub monthly_investment: Option<u64>,
    pub simulation_trials: Option<u32>,
}

impl AssumptionOverrides {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the overrides onto `base`
    #[must_use]
    pub fn apply_to(&self, base: &AssumptionsSnapshot) -> AssumptionsSnapshot {
        AssumptionsSnapshot {
            age: self.age.unwrap_or(base.age),
            annual_income_growth: self
                .annual_income_growth
                .unwrap_or(base.annual_income_growth),
            investment_return: self.investment_return.unwrap_or(base.investment_return),
            inflation_rate: self.inflation_rate.unwrap_or(base.inflation_rate),
            monthly_investment: self.monthly_investment.unwrap_or(base.monthly_investment),
            simulation_trials: self.simulation_trials.unwrap_or(base.simulation_trials),
        }
    }
}
