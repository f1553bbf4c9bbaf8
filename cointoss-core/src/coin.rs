//! Seeded coin used for automatic tosses and simulated sessions.
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::state::Outcome;

/// Commonly cited odds of a nickel landing on its edge.
pub const DEFAULT_EDGE_PROBABILITY: f64 = 1.0 / 6000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinConfig {
    /// Chance that a toss lands on the rim; the rest splits evenly.
    pub edge_probability: f64,
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self {
            edge_probability: DEFAULT_EDGE_PROBABILITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoinConfigError {
    #[error("edge probability must be within [0, 1], got {0}")]
    EdgeProbability(f64),
}

impl CoinConfig {
    /// # Errors
    ///
    /// Returns an error if the edge probability is outside `[0, 1]` or not finite.
    pub fn validate(&self) -> Result<(), CoinConfigError> {
        if (0.0..=1.0).contains(&self.edge_probability) {
            Ok(())
        } else {
            Err(CoinConfigError::EdgeProbability(self.edge_probability))
        }
    }
}

pub struct Coin {
    config: CoinConfig,
    rng: ChaCha20Rng,
}

impl Coin {
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(seed: u64, config: CoinConfig) -> Result<Self, CoinConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
        })
    }

    #[must_use]
    pub fn fair(seed: u64) -> Self {
        Self {
            config: CoinConfig::default(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn toss(&mut self) -> Outcome {
        if self.rng.gen_bool(self.config.edge_probability) {
            Outcome::Edge
        } else if self.rng.gen_bool(0.5) {
            Outcome::Heads
        } else {
            Outcome::Tails
        }
    }
}

impl Iterator for Coin {
    type Item = Outcome;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.toss())
    }
}
