//! Normal variate generation for the trial engine
//!
//! The engine never touches a random number generator directly. It asks a
//! [`VariateSource`] for one [`NormalSampler`] per batch of trials, so batches
//! can run on different threads and tests can substitute fixed sequences.

use std::f64::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng, distr::Distribution};
use rand_distr::StandardNormal;

use crate::config::{EngineConfig, SamplerKind};

/// Produces draws from a normal distribution
pub trait NormalSampler {
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64;
}

/// Hands out independent samplers, one per stream of trials
pub trait VariateSource: Sync {
    type Sampler: NormalSampler;

    fn sampler(&self, stream: u64) -> Self::Sampler;
}

/// Box-Muller transform over two uniform draws
#[derive(Debug, Clone)]
pub struct BoxMuller<R> {
    rng: R,
}

impl<R: Rng> BoxMuller<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform draw in (0, 1); zero is redrawn so the logarithm stays finite
    fn open_unit(&mut self) -> f64 {
        loop {
            let u: f64 = self.rng.random();
            if u != 0.0 {
                return u;
            }
        }
    }
}

impl<R: Rng> NormalSampler for BoxMuller<R> {
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u = self.open_unit();
        let v = self.open_unit();
        let z = (-2.0 * u.ln()).sqrt() * (TAU * v).cos();
        mean + z * std_dev
    }
}

/// Standard normal draws from `rand_distr`, scaled and shifted
#[derive(Debug, Clone)]
pub struct Ziggurat<R> {
    rng: R,
}

impl<R: Rng> Ziggurat<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> NormalSampler for Ziggurat<R> {
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let z: f64 = StandardNormal.sample(&mut self.rng);
        mean + z * std_dev
    }
}

/// Sampler chosen at runtime from [`SamplerKind`]
#[derive(Debug, Clone)]
pub enum RngSampler {
    BoxMuller(BoxMuller<SmallRng>),
    Ziggurat(Ziggurat<SmallRng>),
}

impl NormalSampler for RngSampler {
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        match self {
            RngSampler::BoxMuller(s) => s.normal(mean, std_dev),
            RngSampler::Ziggurat(s) => s.normal(mean, std_dev),
        }
    }
}

/// Production variate source backed by a small fast PRNG per stream
///
/// With a seed, stream `i` is always seeded the same way, so a whole run is
/// reproducible regardless of how batches are scheduled across threads.
/// Without one, every stream is seeded from OS entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RngSource {
    pub kind: SamplerKind,
    pub seed: Option<u64>,
}

impl RngSource {
    pub fn new(kind: SamplerKind, seed: Option<u64>) -> Self {
        Self { kind, seed }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.sampler, config.seed)
    }

    fn stream_rng(&self, stream: u64) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(mix_stream(seed, stream)),
            None => SmallRng::from_os_rng(),
        }
    }
}

impl VariateSource for RngSource {
    type Sampler = RngSampler;

    fn sampler(&self, stream: u64) -> RngSampler {
        let rng = self.stream_rng(stream);
        match self.kind {
            SamplerKind::BoxMuller => RngSampler::BoxMuller(BoxMuller::new(rng)),
            SamplerKind::Ziggurat => RngSampler::Ziggurat(Ziggurat::new(rng)),
        }
    }
}

/// SplitMix64 finalizer over seed and stream index
fn mix_stream(seed: u64, stream: u64) -> u64 {
    let mut z = seed.wrapping_add(stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
