//! Percentile aggregation of per-year trial balances

use crate::model::YearlyProjection;
use crate::trials::YearSamples;

/// Percentiles reported for every projected year
pub mod standard {
    pub const P5: f64 = 0.05;
    pub const P25: f64 = 0.25;
    pub const P50: f64 = 0.50;
    pub const P75: f64 = 0.75;
    pub const P95: f64 = 0.95;
}

/// Linearly interpolated percentile of an ascending slice
///
/// `p` is a fraction in `[0, 1]`. The rank is `(n - 1) * p`; a fractional rank
/// interpolates between its two neighbours. An empty slice yields 0.
pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    let Some(last) = sorted_values.len().checked_sub(1) else {
        return 0.0;
    };

    let index = last as f64 * p;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    let lower_value = sorted_values.get(lower).copied().unwrap_or(0.0);
    if lower == upper {
        return lower_value;
    }

    let weight = index - lower as f64;
    let upper_value = sorted_values.get(upper).copied().unwrap_or(0.0);
    lower_value * (1.0 - weight) + upper_value * weight
}

/// Round to the nearest whole currency unit, halves going up
///
/// Balances are never negative, so the result is clamped at zero.
pub fn round_half_up(value: f64) -> u64 {
    (value + 0.5).floor().max(0.0) as u64
}

/// The five reported percentiles of one year's balances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PercentileBand {
    pub p5: u64,
    pub p25: u64,
    pub p50: u64,
    pub p75: u64,
    pub p95: u64,
}

impl PercentileBand {
    pub fn from_sorted(sorted_values: &[f64]) -> Self {
        let at = |p| round_half_up(percentile(sorted_values, p));
        Self {
            p5: at(standard::P5),
            p25: at(standard::P25),
            p50: at(standard::P50),
            p75: at(standard::P75),
            p95: at(standard::P95),
        }
    }
}

/// Collapse every simulated year into a [`YearlyProjection`]
///
/// Sorts `samples` in place. `age` is the user's age in `current_year`.
pub fn aggregate(samples: &mut YearSamples, current_year: i16, age: u8) -> Vec<YearlyProjection> {
    samples.sort();
    samples
        .iter()
        .map(|(year, balances)| {
            let band = PercentileBand::from_sorted(balances);
            YearlyProjection {
                year,
                age: i32::from(age) + (i32::from(year) - i32::from(current_year)),
                p5: band.p5,
                p25: band.p25,
                p50: band.p50,
                p75: band.p75,
                p95: band.p95,
            }
        })
        .collect()
}
