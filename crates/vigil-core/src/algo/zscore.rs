//! Z-score outlier detection.

use super::EPSILON;

/// Flag elements whose standardized deviation from the series mean exceeds
/// `threshold`.
///
/// Mean and standard deviation are the population statistics of the whole
/// series, including the element being scored, so a single extreme value
/// inflates sigma and can partially mask itself. That is the dashboard's
/// documented behavior and is kept as-is.
pub fn detect(series: &[f64], threshold: f64) -> Vec<bool> {
    if series.len() < 2 {
        return vec![false; series.len()];
    }

    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;
    let variance = series.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    series
        .iter()
        .map(|x| ((x - mean) / (std_dev + EPSILON)).abs() > threshold)
        .collect()
}
