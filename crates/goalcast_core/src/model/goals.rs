//! Savings goals and the starting balance they seed

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::ids::GoalId;

/// A savings goal as stored by the goals collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub target_amount: u64,
    pub target_year: i16,
    /// Progress so far; summed across goals to seed each trial's balance
    pub saved_amount: u64,
    pub updated_at: Timestamp,
}

/// Goal fields supplied when a goal is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGoal {
    pub id: GoalId,
    pub title: String,
    pub target_amount: u64,
    pub target_year: i16,
    #[serde(default)]
    pub saved_amount: u64,
}

/// Partial goal edit; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub target_amount: Option<u64>,
    pub target_year: Option<i16>,
    pub saved_amount: Option<u64>,
}

impl NewGoal {
    #[must_use]
    pub fn stamp(self, updated_at: Timestamp) -> Goal {
        Goal {
            id: self.id,
            title: self.title,
            target_amount: self.target_amount,
            target_year: self.target_year,
            saved_amount: self.saved_amount,
            updated_at,
        }
    }
}

impl GoalUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, goal: &mut Goal, updated_at: Timestamp) {
        if let Some(title) = self.title {
            goal.title = title;
        }
        if let Some(target_amount) = self.target_amount {
            goal.target_amount = target_amount;
        }
        if let Some(target_year) = self.target_year {
            goal.target_year = target_year;
        }
        if let Some(saved_amount) = self.saved_amount {
            goal.saved_amount = saved_amount;
        }
        goal.updated_at = updated_at;
    }
}

/// Sum of saved amounts, the starting balance of every trial
///
/// Summed in floating point; the total of several large goals may exceed
/// `u64::MAX`.
pub fn total_saved(goals: &[Goal]) -> f64 {
    goals.iter().map(|g| g.saved_amount as f64).sum()
}
