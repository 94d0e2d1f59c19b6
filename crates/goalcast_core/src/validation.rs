//! Input checks applied by callers before anything reaches the engine
//!
//! The numeric core assumes finite, in-range inputs and never calls these
//! itself.

use std::ops::RangeInclusive;

use crate::error::ValidationError;
use crate::model::{
    ALLOWED_TRIAL_COUNTS, AssumptionOverrides, AssumptionsSnapshot, AssumptionsUpdate, NewGoal,
};

pub const AGE_RANGE: RangeInclusive<u8> = 18..=100;
pub const INCOME_GROWTH_RANGE: RangeInclusive<f64> = -10.0..=30.0;
pub const INVESTMENT_RETURN_RANGE: RangeInclusive<f64> = -10.0..=30.0;
pub const INFLATION_RANGE: RangeInclusive<f64> = 0.0..=20.0;
pub const MAX_GOAL_TITLE_CHARS: usize = 50;

pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_age(age: u8) -> ValidationResult {
    if !AGE_RANGE.contains(&age) {
        return Err(ValidationError::new(
            "age",
            format!(
                "must be between {} and {}, got {age}",
                AGE_RANGE.start(),
                AGE_RANGE.end()
            ),
        ));
    }
    Ok(())
}

fn validate_rate(field: &'static str, value: f64, range: &RangeInclusive<f64>) -> ValidationResult {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if !range.contains(&value) {
        return Err(ValidationError::new(
            field,
            format!(
                "must be between {} and {}, got {value}",
                range.start(),
                range.end()
            ),
        ));
    }
    Ok(())
}

pub fn validate_trials(trials: u32) -> ValidationResult {
    if !ALLOWED_TRIAL_COUNTS.contains(&trials) {
        return Err(ValidationError::new(
            "simulation_trials",
            format!("must be one of {ALLOWED_TRIAL_COUNTS:?}, got {trials}"),
        ));
    }
    Ok(())
}

pub fn validate_assumptions(snapshot: &AssumptionsSnapshot) -> ValidationResult {
    validate_age(snapshot.age)?;
    validate_rate(
        "annual_income_growth",
        snapshot.annual_income_growth,
        &INCOME_GROWTH_RANGE,
    )?;
    validate_rate(
        "investment_return",
        snapshot.investment_return,
        &INVESTMENT_RETURN_RANGE,
    )?;
    validate_rate("inflation_rate", snapshot.inflation_rate, &INFLATION_RANGE)?;
    validate_trials(snapshot.simulation_trials)
}

pub fn validate_update(update: &AssumptionsUpdate) -> ValidationResult {
    validate_assumptions(&update.into_snapshot())
}

/// Check each override that is present; absent fields are not inspected
pub fn validate_overrides(overrides: &AssumptionOverrides) -> ValidationResult {
    if let Some(age) = overrides.age {
        validate_age(age)?;
    }
    if let Some(growth) = overrides.annual_income_growth {
        validate_rate("annual_income_growth", growth, &INCOME_GROWTH_RANGE)?;
    }
    if let Some(ret) = overrides.investment_return {
        validate_rate("investment_return", ret, &INVESTMENT_RETURN_RANGE)?;
    }
    if let Some(inflation) = overrides.inflation_rate {
        validate_rate("inflation_rate", inflation, &INFLATION_RANGE)?;
    }
    if let Some(trials) = overrides.simulation_trials {
        validate_trials(trials)?;
    }
    Ok(())
}

pub fn validate_new_goal(goal: &NewGoal, current_year: i16) -> ValidationResult {
    let title_len = goal.title.trim().chars().count();
    if title_len == 0 {
        return Err(ValidationError::new("title", "cannot be empty"));
    }
    if title_len > MAX_GOAL_TITLE_CHARS {
        return Err(ValidationError::new(
            "title",
            format!("cannot exceed {MAX_GOAL_TITLE_CHARS} characters"),
        ));
    }
    if goal.target_amount < 1 {
        return Err(ValidationError::new("target_amount", "must be at least 1"));
    }
    if goal.target_year < current_year {
        return Err(ValidationError::new(
            "target_year",
            format!("cannot be before {current_year}"),
        ));
    }
    Ok(())
}
