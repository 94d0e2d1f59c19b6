//! Entry points used by the surrounding service layer
//!
//! [`ProjectionService`] wires the stores, clock, cache and variate source
//! together. `run_simulation` consults the cache; `run_scenario` never does.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::cache::{CacheEntry, Fingerprint, InMemoryCache, ResultCache};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::engine::{ProjectionInputs, project};
use crate::error::Result;
use crate::model::{AssumptionOverrides, AssumptionsSnapshot, Goal, SimulationResponse, UserId};
use crate::store::{AssumptionsStore, GoalsStore};
use crate::variate::{RngSource, VariateSource};

pub struct ProjectionService<S = RngSource> {
    assumptions: Arc<dyn AssumptionsStore>,
    goals: Arc<dyn GoalsStore>,
    clock: Arc<dyn Clock>,
    cache: Arc<dyn ResultCache>,
    source: S,
    config: EngineConfig,
}

impl ProjectionService<RngSource> {
    /// Service with the system clock, an in-memory cache and an RNG source
    /// built from `config`
    pub fn new(
        assumptions: Arc<dyn AssumptionsStore>,
        goals: Arc<dyn GoalsStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            assumptions,
            goals,
            clock: Arc::new(SystemClock),
            cache: Arc::new(InMemoryCache::new()),
            source: RngSource::from_config(&config),
            config,
        }
    }
}

impl<S: VariateSource> ProjectionService<S> {
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Swap the variate source, e.g. for a deterministic one in tests
    #[must_use]
    pub fn with_source<T: VariateSource>(self, source: T) -> ProjectionService<T> {
        ProjectionService {
            assumptions: self.assumptions,
            goals: self.goals,
            clock: self.clock,
            cache: self.cache,
            source,
            config: self.config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Staleness key for the user's current inputs
    ///
    /// Missing assumptions or goals contribute `none`, never an error.
    pub fn fingerprint(&self, user_id: &UserId) -> Result<Fingerprint> {
        let assumptions_updated_at = self
            .assumptions
            .get_assumptions(user_id)?
            .map(|a| a.updated_at);
        let latest_goal_update = self
            .goals
            .list_goals_by_newest_update(user_id)?
            .first()
            .map(|g| g.updated_at);
        Ok(Fingerprint::new(assumptions_updated_at, latest_goal_update))
    }

    /// Project the user's stored plan, reusing the cached result when the
    /// fingerprint is unchanged and `force` is false
    ///
    /// A hit returns the very allocation that was cached. Concurrent misses for
    /// the same user may both compute; the last write wins.
    pub fn run_simulation(&self, user_id: &UserId, force: bool) -> Result<Arc<SimulationResponse>> {
        let fingerprint = self.fingerprint(user_id)?;

        if !force {
            if let Some(entry) = self.cache.get(user_id) {
                if entry.fingerprint == fingerprint {
                    debug!(user = %user_id, %fingerprint, "projection cache hit");
                    return Ok(entry.result);
                }
            }
        }
        debug!(user = %user_id, %fingerprint, force, "projection cache miss");

        let (assumptions, goals) = self.load_inputs(user_id)?;
        let result = Arc::new(self.compute(user_id, &assumptions, &goals));
        self.cache.set(
            user_id,
            CacheEntry {
                fingerprint,
                result: result.clone(),
            },
        );
        Ok(result)
    }

    /// Project the stored plan with `overrides` merged onto the assumptions
    ///
    /// Nothing is persisted and the cache is neither read nor written.
    pub fn run_scenario(
        &self,
        user_id: &UserId,
        overrides: &AssumptionOverrides,
    ) -> Result<SimulationResponse> {
        let (stored, goals) = self.load_inputs(user_id)?;
        let assumptions = overrides.apply_to(&stored);
        Ok(self.compute(user_id, &assumptions, &goals))
    }

    /// Stored assumptions (defaults created if absent) and goals in list order
    pub fn load_inputs(&self, user_id: &UserId) -> Result<(AssumptionsSnapshot, Vec<Goal>)> {
        let assumptions = match self.assumptions.get_assumptions(user_id)? {
            Some(row) => row,
            None => self.assumptions.create_default_assumptions(user_id)?,
        };
        let goals = self.goals.list_goals(user_id)?;
        Ok((assumptions.snapshot, goals))
    }

    fn compute(
        &self,
        user_id: &UserId,
        assumptions: &AssumptionsSnapshot,
        goals: &[Goal],
    ) -> SimulationResponse {
        let start = Instant::now();
        let inputs = ProjectionInputs {
            assumptions,
            goals,
            current_year: self.clock.current_year(),
            calculated_at: self.clock.now(),
        };
        let response = project(inputs, &self.source, &self.config);
        info!(
            user = %user_id,
            trials = assumptions.simulation_trials,
            years = response.yearly_projections.len(),
            goals = goals.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "projection computed"
        );
        response
    }
}
