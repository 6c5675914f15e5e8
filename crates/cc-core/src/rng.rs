//! Seeded random sources for the stochastic parts of the loop.
//!
//! Every component that draws random numbers owns its own generator. A single
//! scenario seed is split into independent ChaCha streams, one per component,
//! so adding draws to the sensor never perturbs the road or the fault process.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generator type used by all stochastic components.
pub type SimRng = ChaCha8Rng;

/// Deterministic generator for `seed`.
pub fn seeded_rng(seed: u64) -> SimRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Generator seeded from the operating system.
pub fn entropy_rng() -> SimRng {
    ChaCha8Rng::from_entropy()
}

/// Independent random stream owned by one component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RngStream {
    Sensor,
    Fault,
    Road,
}

impl RngStream {
    fn stream_id(self) -> u64 {
        match self {
            RngStream::Sensor => 1,
            RngStream::Fault => 2,
            RngStream::Road => 3,
        }
    }
}

/// Hands out one generator per stream, either from a fixed seed or from entropy.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeedPlan {
    seed: Option<u64>,
}

impl SeedPlan {
    pub fn fixed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn entropy() -> Self {
        Self { seed: None }
    }

    pub fn from_option(seed: Option<u64>) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn rng_for(&self, stream: RngStream) -> SimRng {
        let mut rng = match self.seed {
            Some(seed) => seeded_rng(seed),
            None => entropy_rng(),
        };
        rng.set_stream(stream.stream_id());
        rng
    }
}
