//! Household inputs and projection results

mod assumptions;
mod goals;
mod ids;
mod results;

pub use assumptions::{
    ALLOWED_TRIAL_COUNTS, AssumptionOverrides, Assumptions, AssumptionsSnapshot,
    AssumptionsUpdate, DEFAULT_AGE, DEFAULT_INCOME_GROWTH, DEFAULT_INFLATION_RATE,
    DEFAULT_INVESTMENT_RETURN, DEFAULT_MONTHLY_INVESTMENT, DEFAULT_SIMULATION_TRIALS,
};
pub use goals::{Goal, GoalUpdate, NewGoal, total_saved};
pub use ids::{GoalId, UserId};
pub use results::{GoalProbability, SimulationResponse, YearlyProjection};
