//! Injectable random number source.
//!
//! `calculate_next_event_time` needs a normal draw; hiding that behind a
//! trait lets tests pin deterministic sequences (Scenario F needs a source
//! that always returns the mean) instead of seeding a global generator.

use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A source of normally-distributed samples.
pub trait RandomSource {
    /// Draw one sample from `Normal(mean, stddev)`.
    fn normal(&mut self, mean: f64, stddev: f64) -> f64;
}

/// `rand`-backed implementation using a Box–Muller transform; no
/// distribution crate is pulled in for a single call site.
pub struct StdRandomSource {
    rng: StdRng,
}

impl StdRandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }
}

impl RandomSource for StdRandomSource {
    fn normal(&mut self, mean: f64, stddev: f64) -> f64 {
        // Box-Muller, polar-free form: two U(0,1) draws -> one N(0,1) sample.
        let u1: f64 = self.rng.random::<f64>().max(f64::MIN_POSITIVE);
        let u2: f64 = self.rng.random::<f64>();
        let z0 = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        mean + stddev * z0
    }
}

/// Test double that always returns `mean`, exactly as Scenario F requires.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanRandomSource;

impl RandomSource for MeanRandomSource {
    fn normal(&mut self, mean: f64, _stddev: f64) -> f64 {
        mean
    }
}

/// Test double returning a fixed offset from the mean, useful for forcing a
/// negative draw to exercise the clamp-to-1ms behaviour.
#[derive(Debug, Clone, Copy)]
pub struct OffsetRandomSource {
    pub offset: f64,
}

impl RandomSource for OffsetRandomSource {
    fn normal(&mut self, mean: f64, _stddev: f64) -> f64 {
        mean + self.offset
    }
}
