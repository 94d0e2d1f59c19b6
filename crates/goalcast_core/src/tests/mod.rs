//! Integration tests for the projection engine and service
//!
//! Tests are organized by topic:
//! - `projection` - End-to-end projection shape and invariants
//! - `caching` - Fingerprinting, cache hits, invalidation and forcing
//! - `scenario` - What-if overrides and their isolation from the cache
//! - `statistics` - Seeded Monte Carlo properties checked with loose bounds

mod projection;

use std::sync::Arc;

use jiff::Timestamp;

use crate::cache::InMemoryCache;
use crate::clock::FixedClock;
use crate::config::EngineConfig;
use crate::memory::{InMemoryAssumptionsStore, InMemoryGoalsStore};
use crate::model::{Goal, GoalId};
use crate::service::ProjectionService;
use crate::variate::{NormalSampler, RngSource, VariateSource};

/// Variate source whose draws always equal the requested mean
#[derive(Debug, Clone, Copy)]
pub(crate) struct ConstantSource;

impl NormalSampler for ConstantSource {
    fn normal(&mut self, mean: f64, _std_dev: f64) -> f64 {
        mean
    }
}

impl VariateSource for ConstantSource {
    type Sampler = ConstantSource;

    fn sampler(&self, _stream: u64) -> ConstantSource {
        ConstantSource
    }
}

pub(crate) fn goal(id: &str, target_amount: u64, target_year: i16, saved_amount: u64) -> Goal {
    Goal {
        id: GoalId::new(id),
        title: id.to_string(),
        target_amount,
        target_year,
        saved_amount,
        updated_at: "2026-01-01T00:00:00Z".parse().unwrap(),
    }
}

pub(crate) const START: &str = "2026-03-15T09:00:00Z";
pub(crate) const CURRENT_YEAR: i16 = 2026;

/// Service wired to in-memory stores, a fixed clock and an inspectable cache
pub(crate) struct Fixture<S: VariateSource> {
    pub clock: Arc<FixedClock>,
    pub assumptions: Arc<InMemoryAssumptionsStore>,
    pub goals: Arc<InMemoryGoalsStore>,
    pub cache: Arc<InMemoryCache>,
    pub service: ProjectionService<S>,
}

pub(crate) fn fixture_with<S: VariateSource>(source: S, config: EngineConfig) -> Fixture<S> {
    let clock = Arc::new(FixedClock::new(START.parse::<Timestamp>().unwrap()));
    let assumptions = Arc::new(InMemoryAssumptionsStore::new(clock.clone()));
    let goals = Arc::new(InMemoryGoalsStore::new(clock.clone()));
    let cache = Arc::new(InMemoryCache::new());
    let service = ProjectionService::new(assumptions.clone(), goals.clone(), config)
        .with_clock(clock.clone())
        .with_cache(cache.clone())
        .with_source(source);
    Fixture {
        clock,
        assumptions,
        goals,
        cache,
        service,
    }
}

pub(crate) fn seeded_fixture(seed: u64) -> Fixture<RngSource> {
    let config = EngineConfig::default().with_seed(seed);
    fixture_with(RngSource::from_config(&config), config)
}
