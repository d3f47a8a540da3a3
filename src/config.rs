use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::model::topics::{Hyperparameters, PrototypeTopics};
use crate::model::DEFAULT_SEED;

/// Central configuration for a sampling run.
///
/// Defaults come from environment variables (a .env file is loaded at
/// startup via dotenvy); command-line flags override individual fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of unsupervised topics
    pub topics: usize,
    pub hyper: Hyperparameters,
    /// Gibbs sweeps over the training corpus
    pub iterations: usize,
    /// Gibbs sweeps over unseen documents
    pub infer_iterations: usize,
    /// Added to every topic count when writing distributions
    pub smooth: f64,
    /// RNG seed, so runs are reproducible
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            topics: 10,
            hyper: Hyperparameters::default(),
            iterations: 1000,
            infer_iterations: 100,
            smooth: 0.0,
            seed: DEFAULT_SEED,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            topics: env_or("PROTOLDA_TOPICS", defaults.topics)?,
            hyper: Hyperparameters {
                alpha: env_or("PROTOLDA_ALPHA", defaults.hyper.alpha)?,
                beta: env_or("PROTOLDA_BETA", defaults.hyper.beta)?,
                gamma: env_or("PROTOLDA_GAMMA", defaults.hyper.gamma)?,
            },
            iterations: env_or("PROTOLDA_ITERATIONS", defaults.iterations)?,
            infer_iterations: env_or("PROTOLDA_INFER_ITERATIONS", defaults.infer_iterations)?,
            smooth: env_or("PROTOLDA_SMOOTH", defaults.smooth)?,
            seed: env_or("PROTOLDA_SEED", defaults.seed)?,
        })
    }

    /// Reject hyperparameters the sampler cannot work with.
    ///
    /// Call this before building a model; the sampler itself only notices a
    /// bad configuration once a conditional sums to zero.
    pub fn validate(&self, prototypes: &PrototypeTopics) -> Result<()> {
        if !(self.hyper.alpha > 0.0) {
            anyhow::bail!("alpha must be positive, got {}", self.hyper.alpha);
        }
        if !(self.hyper.beta > 0.0) {
            anyhow::bail!("beta must be positive, got {}", self.hyper.beta);
        }
        if !(self.hyper.gamma >= 0.0) {
            anyhow::bail!("gamma must be non-negative, got {}", self.hyper.gamma);
        }
        if self.topics == 0 && prototypes.is_empty() {
            anyhow::bail!(
                "No topics configured. Set --topics (or PROTOLDA_TOPICS) above zero,\n\
                 or pass --prototypes with at least one prototype topic."
            );
        }
        Ok(())
    }
}

/// Read prototype topics from a JSON object of `name -> [seed words]`.
pub fn load_prototypes(path: &Path) -> Result<PrototypeTopics> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read prototype file {}", path.display()))?;
    parse_prototypes(&json)
        .with_context(|| format!("Invalid prototype file {}", path.display()))
}

pub fn parse_prototypes(json: &str) -> Result<PrototypeTopics> {
    let prototypes: PrototypeTopics = serde_json::from_str(json)?;
    if let Some((name, _)) = prototypes.iter().find(|(_, words)| words.is_empty()) {
        anyhow::bail!("Prototype topic {name:?} has no seed words");
    }
    Ok(prototypes)
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {value:?}")),
        Err(_) => Ok(default),
    }
}
