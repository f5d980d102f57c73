//! Learning configuration.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error};

/// Default learning rate α.
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;
/// Default discount factor γ.
pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.9;
/// Default exploitation probability ε.
pub const DEFAULT_EPSILON: f64 = 0.9;

/// Hyperparameters of a Q-learning table.
///
/// The values are fixed for the lifetime of a table. Note that `epsilon` is
/// the probability of *exploiting* the best known action; with probability
/// `1 - epsilon` a uniformly random candidate is explored instead.
///
/// # Examples
///
/// ```
/// use athene::config::QLearningConfig;
///
/// let config = QLearningConfig::default()
///     .with_learning_rate(0.1)
///     .with_epsilon(0.95)
///     .with_seed(42);
/// config.validate()?;
/// # Ok::<(), athene::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Learning rate α, in (0, 1]
    pub learning_rate: f64,
    /// Discount factor γ, in [0, 1]
    pub discount_factor: f64,
    /// Exploitation probability ε, in [0, 1]
    pub epsilon: f64,
    /// Random seed for reproducible selection
    pub seed: Option<u64>,
}

impl QLearningConfig {
    /// Create a configuration with explicit hyperparameters and no seed.
    pub fn new(learning_rate: f64, discount_factor: f64, epsilon: f64) -> Self {
        Self {
            learning_rate,
            discount_factor,
            epsilon,
            seed: None,
        }
    }

    /// Set the learning rate α.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the discount factor γ.
    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set the exploitation probability ε.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every hyperparameter is finite and within range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the offending parameter.
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 || self.learning_rate > 1.0
        {
            return Err(invalid(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(invalid(format!(
                "discount_factor must be in [0, 1], got {}",
                self.discount_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(invalid(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        Ok(())
    }

    /// Read a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config file {path:?}"),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_LEARNING_RATE,
            DEFAULT_DISCOUNT_FACTOR,
            DEFAULT_EPSILON,
        )
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfiguration { message }
}
