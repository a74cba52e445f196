//! Outlier scoring over a window snapshot.
//!
//! Three interchangeable variants, each a pure function over the current
//! window contents. Nothing persists between calls; the isolation forest
//! rebuilds its ensemble on every evaluation.

pub mod iforest;
pub mod mad;
pub mod zscore;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Denominator stabilizer shared by the score-based variants.
pub(crate) const EPSILON: f64 = 1e-9;

/// Selectable detection variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    #[default]
    ZScore,
    Mad,
    IsolationForest,
}

impl Method {
    /// Stable identifier, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ZScore => "z_score",
            Self::Mad => "mad",
            Self::IsolationForest => "isolation_forest",
        }
    }

    /// Display label for UIs and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ZScore => "Z-Score",
            Self::Mad => "Median Absolute Deviation (MAD)",
            Self::IsolationForest => "Isolation Forest",
        }
    }

    /// Parse a method name, accepting a few common spellings.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "z_score" | "zscore" | "z-score" => Some(Self::ZScore),
            "mad" | "median_absolute_deviation" => Some(Self::Mad),
            "isolation_forest" | "isolation-forest" | "iforest" => Some(Self::IsolationForest),
            _ => None,
        }
    }

    pub fn all() -> [Method; 3] {
        [Self::ZScore, Self::Mad, Self::IsolationForest]
    }
}

/// List available methods with descriptions.
pub fn list_methods() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "z_score",
            "Standardized deviation from the window mean in units of sigma",
        ),
        (
            "mad",
            "Modified z-score from median absolute deviation, robust to outliers",
        ),
        (
            "isolation_forest",
            "Random-partitioning ensemble, retrained on every evaluation",
        ),
    ]
}

/// Detector configuration bag.
///
/// Every variant keeps its own parameter slot regardless of which one is
/// selected; conditionally exposing parameters is a UI concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorSettings {
    pub method: Method,
    pub z_threshold: f64,
    pub mad_threshold: f64,
    pub contamination: f64,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            method: Method::ZScore,
            z_threshold: 3.0,
            mad_threshold: 3.5,
            contamination: 0.05,
        }
    }
}

impl DetectorSettings {
    /// Reject out-of-range parameters before they reach the detection path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.z_threshold.is_finite() || self.z_threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold {
                name: "z-score",
                value: self.z_threshold,
            });
        }
        if !self.mad_threshold.is_finite() || self.mad_threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold {
                name: "mad",
                value: self.mad_threshold,
            });
        }
        if !self.contamination.is_finite()
            || self.contamination <= 0.0
            || self.contamination > 0.5
        {
            return Err(ConfigError::InvalidContamination(self.contamination));
        }
        Ok(())
    }

    /// Run the selected variant over a window snapshot.
    ///
    /// Returns one flag per element, in input order.
    pub fn detect(&self, series: &[f64]) -> Vec<bool> {
        match self.method {
            Method::ZScore => zscore::detect(series, self.z_threshold),
            Method::Mad => mad::detect(series, self.mad_threshold),
            Method::IsolationForest => iforest::detect(series, self.contamination),
        }
    }
}
