//! Goal probability estimation

use crate::model::{Goal, GoalProbability, YearlyProjection};
use crate::trials::YearSamples;

const PROBABILITY_SCALE: f64 = 10_000.0;

/// Estimate how likely `goal` is to be reached
///
/// The probability is the share of the `trials` balances in the goal's target
/// year that meet the target, rounded to four decimals. A target year outside
/// the simulated range has no balances and therefore probability 0, as does a
/// run with zero trials. The expected achievement year is the first projected
/// year, from `current_year` on, whose median meets the target.
pub fn estimate(
    goal: &Goal,
    samples: &YearSamples,
    projections: &[YearlyProjection],
    trials: u32,
    current_year: i16,
) -> GoalProbability {
    let probability = if trials == 0 {
        0.0
    } else {
        let target = goal.target_amount as f64;
        let successes = samples.for_year(goal.target_year).map_or(0, |balances| {
            count_at_least(balances, target, samples.is_sorted())
        });
        round_probability(successes as f64 / f64::from(trials))
    };

    let expected_achievement_year = projections
        .iter()
        .find(|p| p.year >= current_year && p.p50 >= goal.target_amount)
        .map(|p| p.year);

    GoalProbability {
        goal_id: goal.id.clone(),
        title: goal.title.clone(),
        target_amount: goal.target_amount,
        target_year: goal.target_year,
        probability,
        expected_achievement_year,
    }
}

fn count_at_least(balances: &[f64], target: f64, sorted: bool) -> usize {
    if sorted {
        balances.len() - balances.partition_point(|b| *b < target)
    } else {
        balances.iter().filter(|b| **b >= target).count()
    }
}

fn round_probability(value: f64) -> f64 {
    (value * PROBABILITY_SCALE).round() / PROBABILITY_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::goal;
    use crate::trials::YearRange;

    fn projection(year: i16, p50: u64) -> YearlyProjection {
        YearlyProjection {
            year,
            age: 30,
            p5: p50 / 2,
            p25: p50,
            p50,
            p75: p50,
            p95: p50 * 2,
        }
    }

    fn samples_for(year: i16, balances: &[f64]) -> YearSamples {
        let paths: Vec<Vec<f64>> = balances.iter().map(|b| vec![*b]).collect();
        YearSamples::from_trial_paths(YearRange::new(year, year), &paths)
    }

    #[test]
    fn test_probability_counts_trials_at_or_above_target() {
        let samples = samples_for(2030, &[50.0, 100.0, 150.0, 99.99]);
        let g = goal("car", 100, 2030, 0);
        let result = estimate(&g, &samples, &[], 4, 2026);
        assert_eq!(result.probability, 0.5);
        assert_eq!(result.goal_id, g.id);
        assert_eq!(result.title, "car");
        assert_eq!(result.target_year, 2030);
    }

    #[test]
    fn test_sorted_and_unsorted_counts_agree() {
        let mut samples = samples_for(2030, &[300.0, 10.0, 100.0, 250.0, 100.0]);
        let g = goal("trip", 100, 2030, 0);
        let unsorted = estimate(&g, &samples, &[], 5, 2026);
        samples.sort();
        let sorted = estimate(&g, &samples, &[], 5, 2026);
        assert_eq!(unsorted.probability, 0.8);
        assert_eq!(sorted.probability, 0.8);
    }

    #[test]
    fn test_probability_rounds_to_four_decimals() {
        let balances: Vec<f64> = (0..3).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect();
        let samples = samples_for(2030, &balances);
        let result = estimate(&goal("g", 1, 2030, 0), &samples, &[], 3, 2026);
        assert_eq!(result.probability, 0.3333);
    }

    #[test]
    fn test_zero_trials_gives_zero_probability() {
        let samples = samples_for(2030, &[]);
        let result = estimate(&goal("g", 1, 2030, 0), &samples, &[], 0, 2026);
        assert_eq!(result.probability, 0.0);
    }

    #[test]
    fn test_target_year_outside_range_gives_zero() {
        let samples = samples_for(2030, &[1_000.0, 2_000.0]);
        let result = estimate(&goal("g", 1, 2045, 0), &samples, &[], 2, 2026);
        assert_eq!(result.probability, 0.0);
    }

    #[test]
    fn test_expected_year_is_first_median_crossing() {
        let projections = vec![
            projection(2026, 100),
            projection(2027, 900),
            projection(2028, 1_000),
            projection(2029, 1_500),
        ];
        let samples = samples_for(2026, &[0.0]);
        let result = estimate(&goal("g", 1_000, 2029, 0), &samples, &projections, 1, 2026);
        assert_eq!(result.expected_achievement_year, Some(2028));
    }

    #[test]
    fn test_expected_year_none_when_median_never_reaches() {
        let projections = vec![projection(2026, 100), projection(2027, 200)];
        let samples = samples_for(2026, &[0.0]);
        let result = estimate(&goal("g", 1_000, 2027, 0), &samples, &projections, 1, 2026);
        assert_eq!(result.expected_achievement_year, None);
    }
}
