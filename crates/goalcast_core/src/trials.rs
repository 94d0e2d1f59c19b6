//! Trial engine
//!
//! Each trial walks the year range in order, carrying a single balance
//! forward. Trials are grouped into batches that share one sampler stream;
//! batches are independent and may run in parallel. The trial-major output of
//! the batches is transposed into one sample vector per year.

use std::ops::RangeInclusive;

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::{EngineConfig, Volatility};
use crate::model::{AssumptionsSnapshot, Goal, total_saved};
use crate::variate::{NormalSampler, VariateSource};

/// Inclusive, ascending range of calendar years
///
/// Empty when `end < start`, which happens only if every goal lies further
/// in the past than the horizon padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i16,
    pub end: i16,
}

impl YearRange {
    pub fn new(start: i16, end: i16) -> Self {
        Self { start, end }
    }

    /// Current year through the latest goal year plus `padding`
    ///
    /// With no goals the range is the current year alone.
    pub fn for_goals(current_year: i16, goals: &[Goal], padding: i16) -> Self {
        match goals.iter().map(|g| g.target_year).max() {
            Some(max_goal_year) => Self::new(current_year, max_goal_year.saturating_add(padding)),
            None => Self::new(current_year, current_year),
        }
    }

    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (i32::from(self.end) - i32::from(self.start) + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, year: i16) -> bool {
        year >= self.start && year <= self.end
    }

    /// Position of `year` within the range
    pub fn index_of(&self, year: i16) -> Option<usize> {
        self.contains(year)
            .then(|| (i32::from(year) - i32::from(self.start)) as usize)
    }

    pub fn iter(&self) -> RangeInclusive<i16> {
        self.start..=self.end
    }
}

/// Per-year balances across all trials (year-major)
#[derive(Debug, Clone, PartialEq)]
pub struct YearSamples {
    range: YearRange,
    samples: Vec<Vec<f64>>,
    sorted: bool,
}

impl YearSamples {
    /// Transpose trial paths (one balance per year each) into per-year samples
    pub fn from_trial_paths(range: YearRange, paths: &[Vec<f64>]) -> Self {
        let mut samples: Vec<Vec<f64>> = (0..range.len())
            .map(|_| Vec::with_capacity(paths.len()))
            .collect();
        for path in paths {
            for (year_samples, balance) in samples.iter_mut().zip(path) {
                year_samples.push(*balance);
            }
        }
        Self {
            range,
            samples,
            sorted: false,
        }
    }

    pub fn range(&self) -> YearRange {
        self.range
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Number of trials recorded for each year
    pub fn trial_count(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }

    /// Balances for `year`, or `None` if the year was not simulated
    pub fn for_year(&self, year: i16) -> Option<&[f64]> {
        self.range
            .index_of(year)
            .and_then(|i| self.samples.get(i))
            .map(Vec::as_slice)
    }

    /// Sort every year's balances ascending (idempotent)
    pub fn sort(&mut self) {
        if self.sorted {
            return;
        }
        for year in &mut self.samples {
            year.sort_by(f64::total_cmp);
        }
        self.sorted = true;
    }

    pub fn iter(&self) -> impl Iterator<Item = (i16, &[f64])> {
        self.range.iter().zip(self.samples.iter().map(Vec::as_slice))
    }
}

/// Numbers shared by every trial of one run
#[derive(Debug, Clone, Copy)]
struct TrialPlan {
    initial_balance: f64,
    annual_investment: f64,
    income_growth_mean: f64,
    return_mean: f64,
    inflation_mean: f64,
    volatility: Volatility,
    years: usize,
}

impl TrialPlan {
    fn new(
        assumptions: &AssumptionsSnapshot,
        goals: &[Goal],
        volatility: Volatility,
        years: usize,
    ) -> Self {
        Self {
            initial_balance: total_saved(goals),
            annual_investment: assumptions.annual_investment(),
            income_growth_mean: assumptions.annual_income_growth / 100.0,
            return_mean: assumptions.investment_return / 100.0,
            inflation_mean: assumptions.inflation_rate / 100.0,
            volatility,
            years,
        }
    }

    /// One trial path: the end-of-year balance for every year in order
    fn run<N: NormalSampler>(&self, sampler: &mut N) -> Vec<f64> {
        let mut path = Vec::with_capacity(self.years);
        let mut balance = self.initial_balance;

        for _ in 0..self.years {
            let growth = sampler.normal(self.income_growth_mean, self.volatility.income_growth);
            let return_rate = sampler.normal(self.return_mean, self.volatility.investment_return);
            let inflation = sampler.normal(self.inflation_mean, self.volatility.inflation);

            let contribution = self.annual_investment * (1.0 + growth).max(0.0);
            balance = ((balance + contribution) * (1.0 + return_rate - inflation)).max(0.0);
            path.push(balance);
        }

        path
    }

    fn run_batch<S: VariateSource>(&self, source: &S, batch: usize, size: usize) -> Vec<Vec<f64>> {
        let mut sampler = source.sampler(batch as u64);
        (0..size).map(|_| self.run(&mut sampler)).collect()
    }
}

/// Run `assumptions.simulation_trials` trials over `range`
///
/// Trials are split into batches of `config.batch_size`; batch `i` draws from
/// stream `i` of `source`. Output order is independent of scheduling.
pub fn run_trials<S: VariateSource>(
    assumptions: &AssumptionsSnapshot,
    goals: &[Goal],
    range: YearRange,
    source: &S,
    config: &EngineConfig,
) -> YearSamples {
    let plan = TrialPlan::new(assumptions, goals, config.volatility, range.len());
    let num_trials = assumptions.simulation_trials as usize;
    let batch_size = config.effective_batch_size();
    let num_batches = num_trials.div_ceil(batch_size);

    let batch_len = |i: usize| {
        if i == num_batches - 1 {
            num_trials - i * batch_size
        } else {
            batch_size
        }
    };

    let paths: Vec<Vec<f64>> = if config.parallel {
        run_batches_parallel(&plan, source, num_batches, batch_len)
    } else {
        (0..num_batches)
            .flat_map(|i| plan.run_batch(source, i, batch_len(i)))
            .collect()
    };

    YearSamples::from_trial_paths(range, &paths)
}

#[cfg(feature = "parallel")]
fn run_batches_parallel<S, F>(
    plan: &TrialPlan,
    source: &S,
    num_batches: usize,
    batch_len: F,
) -> Vec<Vec<f64>>
where
    S: VariateSource,
    F: Fn(usize) -> usize + Sync,
{
    (0..num_batches)
        .into_par_iter()
        .flat_map_iter(|i| plan.run_batch(source, i, batch_len(i)))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_batches_parallel<S, F>(
    plan: &TrialPlan,
    source: &S,
    num_batches: usize,
    batch_len: F,
) -> Vec<Vec<f64>>
where
    S: VariateSource,
    F: Fn(usize) -> usize + Sync,
{
    (0..num_batches)
        .flat_map(|i| plan.run_batch(source, i, batch_len(i)))
        .collect()
}
