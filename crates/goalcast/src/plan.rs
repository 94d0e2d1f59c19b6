//! Household plan file
//!
//! A plan file lists the households the CLI can project, plus optional engine
//! tuning:
//!
//! ```yaml
//! engine:
//!   seed: 42
//! users:
//!   - id: alice
//!     assumptions:
//!       age: 30
//!       annual_income_growth: 3.0
//!       investment_return: 5.0
//!       inflation_rate: 2.0
//!       monthly_investment: 10000
//!     goals:
//!       - id: house
//!         title: House
//!         target_amount: 5000000
//!         target_year: 2030
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use goalcast_core::model::{AssumptionsUpdate, NewGoal, UserId};
use goalcast_core::validation::{validate_new_goal, validate_update};
use goalcast_core::{
    Clock, EngineConfig, InMemoryAssumptionsStore, InMemoryGoalsStore, StoreError,
    ValidationError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanFile {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub users: Vec<UserPlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPlan {
    pub id: UserId,
    /// Absent means the user starts on the default assumptions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<AssumptionsUpdate>,
    #[serde(default)]
    pub goals: Vec<NewGoal>,
}

#[derive(Debug)]
pub enum PlanError {
    Io(String),
    Parse(String),
    Invalid { user: UserId, source: ValidationError },
    Store(StoreError),
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::Io(msg) => write!(f, "IO error: {}", msg),
            PlanError::Parse(msg) => write!(f, "Parse error: {}", msg),
            PlanError::Invalid { user, source } => write!(f, "user {user}: {source}"),
            PlanError::Store(err) => write!(f, "Store error: {}", err),
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanError::Invalid { source, .. } => Some(source),
            PlanError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for PlanError {
    fn from(err: StoreError) -> Self {
        PlanError::Store(err)
    }
}

impl PlanFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, PlanError> {
        serde_saphyr::from_str(yaml)
            .map_err(|e| PlanError::Parse(format!("Failed to parse plan: {}", e)))
    }

    /// Load the plan at `path`; a missing file is an empty plan
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no plan file, starting empty");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| PlanError::Io(format!("Failed to read plan: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Check every user's assumptions and goals against the input rules
    pub fn validate(&self, current_year: i16) -> Result<(), PlanError> {
        for user in &self.users {
            let invalid = |source| PlanError::Invalid {
                user: user.id.clone(),
                source,
            };
            if let Some(update) = &user.assumptions {
                validate_update(update).map_err(invalid)?;
            }
            for goal in &user.goals {
                validate_new_goal(goal, current_year).map_err(invalid)?;
            }
        }
        Ok(())
    }

    /// Validate the plan and load it into fresh in-memory stores
    pub fn into_workspace(self, clock: Arc<dyn Clock>) -> Result<Workspace, PlanError> {
        self.validate(clock.current_year())?;

        let assumptions = Arc::new(InMemoryAssumptionsStore::new(clock.clone()));
        let goals = Arc::new(InMemoryGoalsStore::new(clock));

        for user in self.users {
            if let Some(update) = user.assumptions {
                assumptions.put(&user.id, update)?;
            }
            for goal in user.goals {
                goals.insert(&user.id, goal)?;
            }
        }

        Ok(Workspace {
            engine: self.engine,
            assumptions,
            goals,
        })
    }
}

/// Stores populated from a plan, ready to back a projection service
pub struct Workspace {
    pub engine: EngineConfig,
    pub assumptions: Arc<InMemoryAssumptionsStore>,
    pub goals: Arc<InMemoryGoalsStore>,
}
