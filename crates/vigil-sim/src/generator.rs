//! Synthetic signal source.
//!
//! Random walk with gaussian drift and occasional shocks, floor-clamped to
//! a minimum value. The monitor treats its output as an opaque real number
//! and assumes nothing about the distribution.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Walk parameters, matching the demo dashboard's defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub start_value: f64,
    pub drift_std: f64,
    pub shock_std: f64,
    pub shock_probability: f64,
    pub floor: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start_value: 100.0,
            drift_std: 0.2,
            shock_std: 10.0,
            shock_probability: 0.05,
            floor: 10.0,
        }
    }
}

/// Drifting random walk with shock events.
#[derive(Debug, Clone)]
pub struct RandomWalk {
    config: GeneratorConfig,
    value: f64,
}

impl RandomWalk {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            value: config.start_value,
            config,
        }
    }

    /// Advance one step and return the new value.
    pub fn next_value(&mut self) -> f64 {
        let mut rng = rand::rng();

        let drift = Normal::new(0.0, self.config.drift_std)
            .map(|dist| dist.sample(&mut rng))
            .unwrap_or(0.0);

        let shock_probability = self.config.shock_probability.clamp(0.0, 1.0);
        let shock = if rng.random_bool(shock_probability) {
            Normal::new(0.0, self.config.shock_std)
                .map(|dist| dist.sample(&mut rng))
                .unwrap_or(0.0)
        } else {
            0.0
        };

        self.value = (self.value + drift + shock).max(self.config.floor);
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Restore the starting value.
    pub fn reset(&mut self) {
        self.value = self.config.start_value;
    }
}

impl Default for RandomWalk {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}
