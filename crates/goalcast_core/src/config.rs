//! Engine configuration
//!
//! Every field has a default, so an empty `engine:` section (or none at all)
//! reproduces the stock model.

use serde::{Deserialize, Serialize};

fn default_horizon_padding_years() -> i16 {
    5
}

fn default_batch_size() -> usize {
    100
}

fn default_true() -> bool {
    true
}

/// Standard deviations of the yearly draws, as fractions (0.10 = 10 points)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volatility {
    pub income_growth: f64,
    pub investment_return: f64,
    pub inflation: f64,
}

impl Default for Volatility {
    fn default() -> Self {
        Self {
            income_growth: 0.02,
            investment_return: 0.10,
            inflation: 0.01,
        }
    }
}

/// Algorithm used to turn uniform draws into normal variates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplerKind {
    /// Two-uniform Box-Muller transform
    #[default]
    BoxMuller,
    /// `rand_distr` ziggurat sampler
    Ziggurat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub volatility: Volatility,

    /// Years simulated past the latest goal's target year
    #[serde(default = "default_horizon_padding_years")]
    pub horizon_padding_years: i16,

    /// Trials sharing one random stream; also the unit of parallel work
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Run batches on the rayon pool (ignored without the `parallel` feature)
    #[serde(default = "default_true")]
    pub parallel: bool,

    #[serde(default)]
    pub sampler: SamplerKind,

    /// Fixed seed for reproducible runs; `None` draws from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            volatility: Volatility::default(),
            horizon_padding_years: default_horizon_padding_years(),
            batch_size: default_batch_size(),
            parallel: true,
            sampler: SamplerKind::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Batch size clamped to at least one trial
    #[must_use]
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}
