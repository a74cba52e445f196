use thiserror::Error;

/// Configuration rejected before it can reach the detection path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("window capacity must be at least 1 (got {0})")]
    InvalidCapacity(usize),

    #[error("{name} threshold must be finite and greater than zero (got {value})")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("contamination must be in (0.0, 0.5] (got {0})")]
    InvalidContamination(f64),
}
