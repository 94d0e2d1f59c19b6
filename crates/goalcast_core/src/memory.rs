//! In-process assumptions and goals stores
//!
//! Every mutation is stamped with the store's clock, so edits move the
//! projection fingerprint exactly as a database-backed store would.

use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::clock::Clock;
use crate::error::{Result, StoreError};
use crate::model::{
    Assumptions, AssumptionsSnapshot, AssumptionsUpdate, Goal, GoalId, GoalUpdate, NewGoal,
    UserId,
};
use crate::store::{AssumptionsStore, GoalsStore};

pub struct InMemoryAssumptionsStore {
    clock: Arc<dyn Clock>,
    rows: RwLock<FxHashMap<UserId, Assumptions>>,
}

impl InMemoryAssumptionsStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            rows: RwLock::new(FxHashMap::default()),
        }
    }

    /// Replace the user's assumptions, creating the row if needed
    pub fn put(&self, user_id: &UserId, update: AssumptionsUpdate) -> Result<Assumptions> {
        self.insert(user_id, update.into_snapshot())
    }

    /// Store a complete snapshot for the user
    pub fn insert(&self, user_id: &UserId, snapshot: AssumptionsSnapshot) -> Result<Assumptions> {
        let row = Assumptions {
            user_id: user_id.clone(),
            snapshot,
            updated_at: self.clock.now(),
        };
        self.rows.write()?.insert(user_id.clone(), row.clone());
        Ok(row)
    }
}

impl AssumptionsStore for InMemoryAssumptionsStore {
    fn get_assumptions(&self, user_id: &UserId) -> Result<Option<Assumptions>> {
        Ok(self.rows.read()?.get(user_id).cloned())
    }

    fn create_default_assumptions(&self, user_id: &UserId) -> Result<Assumptions> {
        debug!(user = %user_id, "creating default assumptions");
        self.insert(user_id, AssumptionsSnapshot::default())
    }
}

pub struct InMemoryGoalsStore {
    clock: Arc<dyn Clock>,
    goals: RwLock<FxHashMap<UserId, Vec<Goal>>>,
}

impl InMemoryGoalsStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            goals: RwLock::new(FxHashMap::default()),
        }
    }

    /// Append a goal; an existing goal with the same id is replaced in place
    pub fn insert(&self, user_id: &UserId, goal: NewGoal) -> Result<Goal> {
        let goal = goal.stamp(self.clock.now());
        let mut all = self.goals.write()?;
        let goals = all.entry(user_id.clone()).or_default();
        match goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => *existing = goal.clone(),
            None => goals.push(goal.clone()),
        }
        Ok(goal)
    }

    pub fn update(&self, user_id: &UserId, goal_id: &GoalId, update: GoalUpdate) -> Result<Goal> {
        let now = self.clock.now();
        let mut all = self.goals.write()?;
        let goal = all
            .get_mut(user_id)
            .and_then(|goals| goals.iter_mut().find(|g| &g.id == goal_id))
            .ok_or_else(|| StoreError::GoalNotFound(goal_id.clone()))?;
        update.apply(goal, now);
        Ok(goal.clone())
    }

    pub fn remove(&self, user_id: &UserId, goal_id: &GoalId) -> Result<Goal> {
        let mut all = self.goals.write()?;
        let goals = all
            .get_mut(user_id)
            .ok_or_else(|| StoreError::GoalNotFound(goal_id.clone()))?;
        let index = goals
            .iter()
            .position(|g| &g.id == goal_id)
            .ok_or_else(|| StoreError::GoalNotFound(goal_id.clone()))?;
        Ok(goals.remove(index))
    }
}

impl GoalsStore for InMemoryGoalsStore {
    fn list_goals(&self, user_id: &UserId) -> Result<Vec<Goal>> {
        Ok(self.goals.read()?.get(user_id).cloned().unwrap_or_default())
    }

    fn list_goals_by_newest_update(&self, user_id: &UserId) -> Result<Vec<Goal>> {
        let mut goals = self.list_goals(user_id)?;
        goals.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(goals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use jiff::{SignedDuration, Timestamp};

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new("2026-05-01T12:00:00Z".parse::<Timestamp>().unwrap()))
    }

    fn new_goal(id: &str, year: i16) -> NewGoal {
        NewGoal {
            id: GoalId::new(id),
            title: id.to_string(),
            target_amount: 1_000,
            target_year: year,
            saved_amount: 100,
        }
    }

    #[test]
    fn test_defaults_created_with_clock_time() {
        let clock = clock();
        let store = InMemoryAssumptionsStore::new(clock.clone());
        let user = UserId::new("u1");

        assert!(store.get_assumptions(&user).unwrap().is_none());
        let created = store.create_default_assumptions(&user).unwrap();
        assert_eq!(created.snapshot, AssumptionsSnapshot::default());
        assert_eq!(created.updated_at, clock.now());
        assert_eq!(store.get_assumptions(&user).unwrap(), Some(created));
    }

    #[test]
    fn test_put_restamps_row() {
        let clock = clock();
        let store = InMemoryAssumptionsStore::new(clock.clone());
        let user = UserId::new("u1");
        let first = store.create_default_assumptions(&user).unwrap();

        clock.advance(SignedDuration::from_secs(60));
        let updated = store
            .put(
                &user,
                AssumptionsUpdate {
                    age: 35,
                    annual_income_growth: 2.0,
                    investment_return: 6.0,
                    inflation_rate: 2.0,
                    monthly_investment: 500,
                    simulation_trials: Some(500),
                },
            )
            .unwrap();
        assert!(updated.updated_at > first.updated_at);
        assert_eq!(updated.snapshot.simulation_trials, 500);
        assert_eq!(updated.snapshot.age, 35);
    }

    #[test]
    fn test_goals_listed_newest_first() {
        let clock = clock();
        let store = InMemoryGoalsStore::new(clock.clone());
        let user = UserId::new("u1");

        store.insert(&user, new_goal("a", 2030)).unwrap();
        clock.advance(SignedDuration::from_secs(1));
        store.insert(&user, new_goal("b", 2031)).unwrap();
        clock.advance(SignedDuration::from_secs(1));
        store
            .update(
                &user,
                &GoalId::new("a"),
                GoalUpdate {
                    saved_amount: Some(500),
                    ..Default::default()
                },
            )
            .unwrap();

        let listed: Vec<_> = store.list_goals(&user).unwrap().into_iter().map(|g| g.id).collect();
        assert_eq!(listed, vec![GoalId::new("a"), GoalId::new("b")]);

        let newest: Vec<_> = store
            .list_goals_by_newest_update(&user)
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(newest, vec![GoalId::new("a"), GoalId::new("b")]);
    }

    #[test]
    fn test_update_missing_goal_fails() {
        let store = InMemoryGoalsStore::new(clock());
        let err = store
            .update(&UserId::new("u1"), &GoalId::new("nope"), GoalUpdate::default())
            .unwrap_err();
        assert_eq!(err, StoreError::GoalNotFound(GoalId::new("nope")));
    }

    #[test]
    fn test_remove_goal() {
        let store = InMemoryGoalsStore::new(clock());
        let user = UserId::new("u1");
        store.insert(&user, new_goal("a", 2030)).unwrap();
        store.insert(&user, new_goal("b", 2030)).unwrap();

        let removed = store.remove(&user, &GoalId::new("a")).unwrap();
        assert_eq!(removed.id, GoalId::new("a"));
        assert_eq!(store.list_goals(&user).unwrap().len(), 1);
        assert!(store.remove(&user, &GoalId::new("a")).is_err());
    }

    #[test]
    fn test_insert_same_id_replaces() {
        let store = InMemoryGoalsStore::new(clock());
        let user = UserId::new("u1");
        store.insert(&user, new_goal("a", 2030)).unwrap();
        store.insert(&user, new_goal("a", 2040)).unwrap();

        let goals = store.list_goals(&user).unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].target_year, 2040);
    }
}
