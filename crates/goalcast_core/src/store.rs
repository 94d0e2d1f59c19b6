//! Collaborator interfaces for stored assumptions and goals
//!
//! The engine reads through these traits only. Persistence is someone else's
//! concern; [`crate::memory`] provides process-local implementations.

use crate::error::Result;
use crate::model::{Assumptions, Goal, UserId};

pub trait AssumptionsStore: Send + Sync {
    /// Stored assumptions for `user_id`, if any
    fn get_assumptions(&self, user_id: &UserId) -> Result<Option<Assumptions>>;

    /// Create and return the default assumptions row for `user_id`
    fn create_default_assumptions(&self, user_id: &UserId) -> Result<Assumptions>;
}

pub trait GoalsStore: Send + Sync {
    /// Goals in the store's display order
    fn list_goals(&self, user_id: &UserId) -> Result<Vec<Goal>>;

    /// Goals ordered by `updated_at`, newest first
    fn list_goals_by_newest_update(&self, user_id: &UserId) -> Result<Vec<Goal>>;
}
