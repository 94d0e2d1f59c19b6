//! Projection pipeline: trials, then percentile bands, then goal probabilities

use jiff::Timestamp;

use crate::config::EngineConfig;
use crate::model::{AssumptionsSnapshot, Goal, SimulationResponse};
use crate::percentiles::aggregate;
use crate::probability::estimate;
use crate::trials::{YearRange, run_trials};
use crate::variate::VariateSource;

/// Everything a single projection needs besides randomness and tuning
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInputs<'a> {
    pub assumptions: &'a AssumptionsSnapshot,
    pub goals: &'a [Goal],
    pub current_year: i16,
    pub calculated_at: Timestamp,
}

/// Run a full projection
///
/// The year range runs from `current_year` to the latest goal year plus the
/// configured padding, or covers `current_year` alone when there are no goals.
/// Goal probabilities keep the order of `inputs.goals`.
pub fn project<S: VariateSource>(
    inputs: ProjectionInputs<'_>,
    source: &S,
    config: &EngineConfig,
) -> SimulationResponse {
    let range = YearRange::for_goals(
        inputs.current_year,
        inputs.goals,
        config.horizon_padding_years,
    );

    let mut samples = run_trials(inputs.assumptions, inputs.goals, range, source, config);
    let yearly_projections = aggregate(&mut samples, inputs.current_year, inputs.assumptions.age);

    let goal_probabilities = inputs
        .goals
        .iter()
        .map(|goal| {
            estimate(
                goal,
                &samples,
                &yearly_projections,
                inputs.assumptions.simulation_trials,
                inputs.current_year,
            )
        })
        .collect();

    SimulationResponse {
        calculated_at: inputs.calculated_at,
        assumptions_snapshot: *inputs.assumptions,
        yearly_projections,
        goal_probabilities,
    }
}
