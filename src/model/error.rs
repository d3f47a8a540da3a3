//! Error types for model construction and sampling.

use thiserror::Error;

/// Errors raised by the topic model.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ModelError {
    /// The conditional distribution summed to zero, a negative value or NaN.
    /// Only reachable with non-positive hyperparameters.
    #[error("configuration error: total sampling weight is {total}, check alpha/beta/gamma")]
    NonPositiveWeight { total: f64 },

    /// `infer` was called before `train`.
    #[error("model has not been trained; call train() before infer()")]
    NotTrained,

    /// The topic space would contain no topics at all.
    #[error("configuration error: at least one regular or prototype topic is required")]
    NoTopics,

    /// A prototype topic name clashes with a generated regular-topic label.
    #[error("configuration error: prototype topic {0:?} collides with a regular topic label")]
    TopicLabelCollision(String),
}
