//! Household savings projection library
//!
//! This crate provides a Monte Carlo engine that projects a household's savings
//! balance year by year and estimates how likely each savings goal is to be met.
//! It supports:
//! - Stochastic income growth, investment return and inflation per year
//! - Percentile bands (p5/p25/p50/p75/p95) for every projected year
//! - Goal probabilities and expected achievement years
//! - A per-user result cache invalidated by input timestamps
//! - What-if scenarios that override assumptions without persisting them
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use goalcast_core::{EngineConfig, InMemoryAssumptionsStore, InMemoryGoalsStore,
//!     ProjectionService, SystemClock, UserId};
//!
//! let clock = Arc::new(SystemClock);
//! let assumptions = Arc::new(InMemoryAssumptionsStore::new(clock.clone()));
//! let goals = Arc::new(InMemoryGoalsStore::new(clock));
//! let service = ProjectionService::new(assumptions, goals, EngineConfig::default());
//!
//! let response = service.run_simulation(&UserId::new("alice"), false)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod engine;
pub mod percentiles;
pub mod probability;
pub mod trials;
pub mod variate;

// ============================================================================
// Service and collaborator modules
// ============================================================================

pub mod cache;
pub mod clock;
pub mod memory;
pub mod service;
pub mod store;
pub mod validation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod error;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use cache::{CacheEntry, Fingerprint, InMemoryCache, NullCache, ResultCache};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{EngineConfig, SamplerKind, Volatility};
pub use engine::{ProjectionInputs, project};
pub use error::{StoreError, ValidationError};
pub use memory::{InMemoryAssumptionsStore, InMemoryGoalsStore};
pub use model::{
    AssumptionOverrides, Assumptions, AssumptionsSnapshot, AssumptionsUpdate, Goal, GoalId,
    GoalProbability, GoalUpdate, NewGoal, SimulationResponse, UserId, YearlyProjection,
};
pub use service::ProjectionService;
pub use store::{AssumptionsStore, GoalsStore};
pub use variate::{BoxMuller, NormalSampler, RngSource, VariateSource, Ziggurat};
