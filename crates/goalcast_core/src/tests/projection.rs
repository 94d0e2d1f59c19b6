//! End-to-end projection tests
//!
//! These tests verify:
//! - The year range and response shape for a typical household
//! - Percentile bands are ordered and probabilities bounded
//! - Expected achievement years are the first median crossing
//! - Degenerate inputs (no goals, zero trials) still produce a response

use super::{CURRENT_YEAR, ConstantSource, fixture_with, goal, seeded_fixture};
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::engine::{ProjectionInputs, project};
use crate::model::{AssumptionsSnapshot, AssumptionsUpdate, GoalId, NewGoal, UserId};
use crate::variate::RngSource;

fn household() -> AssumptionsUpdate {
    AssumptionsUpdate {
        age: 30,
        annual_income_growth: 3.0,
        investment_return: 5.0,
        inflation_rate: 2.0,
        monthly_investment: 10_000,
        simulation_trials: Some(1000),
    }
}

fn house_goal() -> NewGoal {
    NewGoal {
        id: GoalId::new("house"),
        title: "House".to_string(),
        target_amount: 5_000_000,
        target_year: CURRENT_YEAR + 3,
        saved_amount: 0,
    }
}

#[test]
fn test_typical_household_response_shape() {
    let fx = seeded_fixture(42);
    let user = UserId::new("alice");
    fx.assumptions.put(&user, household()).unwrap();
    fx.goals.insert(&user, house_goal()).unwrap();

    let response = fx.service.run_simulation(&user, false).unwrap();

    assert_eq!(response.yearly_projections.len(), 9);
    let years: Vec<i16> = response.yearly_projections.iter().map(|p| p.year).collect();
    let expected: Vec<i16> = (CURRENT_YEAR..=CURRENT_YEAR + 8).collect();
    assert_eq!(years, expected);

    assert_eq!(response.goal_probabilities.len(), 1);
    assert_eq!(response.goal_probabilities[0].goal_id, GoalId::new("house"));
    assert_eq!(response.assumptions_snapshot.monthly_investment, 10_000);
    assert_eq!(response.calculated_at, fx.clock.now());
}

#[test]
fn test_ages_follow_years() {
    let fx = seeded_fixture(1);
    let user = UserId::new("alice");
    fx.assumptions.put(&user, household()).unwrap();
    fx.goals.insert(&user, house_goal()).unwrap();

    let response = fx.service.run_simulation(&user, false).unwrap();
    for p in &response.yearly_projections {
        assert_eq!(p.age, 30 + i32::from(p.year - CURRENT_YEAR));
    }
}

#[test]
fn test_bands_ordered_and_probabilities_bounded() {
    for seed in 0..5 {
        let fx = seeded_fixture(seed);
        let user = UserId::new("bob");
        fx.assumptions.put(&user, household()).unwrap();
        fx.goals.insert(&user, house_goal()).unwrap();
        fx.goals
            .insert(
                &user,
                NewGoal {
                    id: GoalId::new("car"),
                    title: "Car".to_string(),
                    target_amount: 300_000,
                    target_year: CURRENT_YEAR + 1,
                    saved_amount: 50_000,
                },
            )
            .unwrap();

        let response = fx.service.run_simulation(&user, true).unwrap();
        assert!(response.yearly_projections.iter().all(|p| p.is_ordered()));
        for g in &response.goal_probabilities {
            assert!((0.0..=1.0).contains(&g.probability), "{g:?}");
        }
    }
}

#[test]
fn test_goal_probabilities_keep_goal_order() {
    let fx = seeded_fixture(7);
    let user = UserId::new("carol");
    for (id, year) in [("b", CURRENT_YEAR + 4), ("a", CURRENT_YEAR + 1), ("c", CURRENT_YEAR + 2)] {
        fx.goals
            .insert(
                &user,
                NewGoal {
                    id: GoalId::new(id),
                    title: id.to_uppercase(),
                    target_amount: 1_000,
                    target_year: year,
                    saved_amount: 0,
                },
            )
            .unwrap();
    }

    let response = fx.service.run_simulation(&user, false).unwrap();
    let ids: Vec<&str> = response
        .goal_probabilities
        .iter()
        .map(|g| g.goal_id.as_str())
        .collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
}

#[test]
fn test_expected_year_is_minimal_median_crossing() {
    let fx = seeded_fixture(99);
    let user = UserId::new("dave");
    fx.assumptions.put(&user, household()).unwrap();
    fx.goals.insert(&user, house_goal()).unwrap();

    let response = fx.service.run_simulation(&user, false).unwrap();
    let g = &response.goal_probabilities[0];
    let first_crossing = response
        .yearly_projections
        .iter()
        .find(|p| p.p50 >= g.target_amount)
        .map(|p| p.year);
    assert_eq!(g.expected_achievement_year, first_crossing);
}

#[test]
fn test_no_goals_projects_current_year_only() {
    let fx = seeded_fixture(3);
    let user = UserId::new("erin");

    let response = fx.service.run_simulation(&user, false).unwrap();
    assert_eq!(response.yearly_projections.len(), 1);
    assert_eq!(response.yearly_projections[0].year, CURRENT_YEAR);
    assert!(response.goal_probabilities.is_empty());
    // a brand-new user is simulated with the default assumptions
    assert_eq!(response.assumptions_snapshot, AssumptionsSnapshot::default());
}

#[test]
fn test_zero_trials_gives_zero_probability() {
    let goals = vec![goal("g", 1, CURRENT_YEAR + 1, 1_000_000)];
    let assumptions = AssumptionsSnapshot {
        simulation_trials: 0,
        ..Default::default()
    };
    let config = EngineConfig::default().with_seed(5);
    let response = project(
        ProjectionInputs {
            assumptions: &assumptions,
            goals: &goals,
            current_year: CURRENT_YEAR,
            calculated_at: super::START.parse().unwrap(),
        },
        &RngSource::from_config(&config),
        &config,
    );

    assert_eq!(response.goal_probabilities[0].probability, 0.0);
    assert_eq!(response.yearly_projections.len(), 7);
    assert!(response.yearly_projections.iter().all(|p| p.p50 == 0));
}

#[test]
fn test_constant_source_gives_degenerate_bands() {
    let fx = fixture_with(ConstantSource, EngineConfig::default());
    let user = UserId::new("fay");
    fx.assumptions
        .put(
            &user,
            AssumptionsUpdate {
                annual_income_growth: 0.0,
                investment_return: 0.0,
                inflation_rate: 0.0,
                monthly_investment: 1_000,
                simulation_trials: Some(100),
                ..household()
            },
        )
        .unwrap();
    fx.goals
        .insert(
            &user,
            NewGoal {
                id: GoalId::new("fund"),
                title: "Fund".to_string(),
                target_amount: 24_000,
                target_year: CURRENT_YEAR + 1,
                saved_amount: 0,
            },
        )
        .unwrap();

    // flat rates: balance grows by exactly 12_000 per year
    let response = fx.service.run_simulation(&user, false).unwrap();
    for (i, p) in response.yearly_projections.iter().enumerate() {
        let expected = 12_000 * (i as u64 + 1);
        assert_eq!((p.p5, p.p50, p.p95), (expected, expected, expected));
    }
    let fund = &response.goal_probabilities[0];
    assert_eq!(fund.probability, 1.0);
    assert_eq!(fund.expected_achievement_year, Some(CURRENT_YEAR + 1));
}

#[test]
fn test_goal_outside_range_has_zero_probability() {
    let goals = vec![
        goal("past", 1, CURRENT_YEAR - 20, 0),
        goal("soon", 1, CURRENT_YEAR, 10_000),
    ];
    let assumptions = AssumptionsSnapshot::default();
    let response = project(
        ProjectionInputs {
            assumptions: &assumptions,
            goals: &goals,
            current_year: CURRENT_YEAR,
            calculated_at: super::START.parse().unwrap(),
        },
        &ConstantSource,
        &EngineConfig::default(),
    );

    assert_eq!(response.goal_probabilities[0].probability, 0.0);
    assert_eq!(response.goal_probabilities[1].probability, 1.0);
}

#[test]
fn test_saved_amounts_beyond_u64_range_saturate_bands() {
    let fx = seeded_fixture(11);
    let user = UserId::new("whale");
    fx.assumptions.put(&user, household()).unwrap();
    for id in ["vault", "yacht"] {
        fx.goals
            .insert(
                &user,
                NewGoal {
                    id: GoalId::new(id),
                    title: id.to_string(),
                    target_amount: 1_000_000,
                    target_year: CURRENT_YEAR + 2,
                    saved_amount: u64::MAX / 2 + 1,
                },
            )
            .unwrap();
    }

    let response = fx.service.run_simulation(&user, false).unwrap();
    let first = &response.yearly_projections[0];
    assert!(first.p5 > u64::MAX / 2);
    assert!(
        response
            .goal_probabilities
            .iter()
            .all(|g| g.probability == 1.0)
    );
}
