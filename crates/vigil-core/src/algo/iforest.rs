//! Single-feature isolation forest.
//!
//! Isolates anomalies by random recursive partitioning: points in sparse
//! regions are separated after few cuts, so their average path length
//! across the ensemble is short. The ensemble is rebuilt from scratch on
//! every call, making this the most expensive of the three variants; cost
//! grows with window size times tree count and is accepted for the demo
//! rather than optimized with incremental state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Trees per ensemble.
const NUM_TREES: usize = 100;

/// Per-tree subsample cap.
const MAX_SAMPLES: usize = 256;

/// Fixed seed so repeated evaluations of the same window agree exactly.
const SEED: u64 = 42;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

enum IsoNode {
    Split {
        value: f64,
        left: Box<IsoNode>,
        right: Box<IsoNode>,
    },
    Leaf {
        size: usize,
    },
}

/// Flag the expected-outlier fraction of a series.
///
/// Scores every element with a freshly fitted ensemble, then flags elements
/// whose score strictly exceeds the `(1 - contamination)` quantile of the
/// scores. The strict comparison means a fully degenerate series (all
/// scores tied) flags nothing. Any sample the forest cannot be fitted on,
/// such as a series with zero value range, falls back to all-false rather
/// than failing the tick.
pub fn detect(series: &[f64], contamination: f64) -> Vec<bool> {
    if series.len() < 2 {
        return vec![false; series.len()];
    }
    match fit_scores(series) {
        Some(scores) => flag_by_quantile(&scores, contamination),
        None => vec![false; series.len()],
    }
}

fn fit_scores(series: &[f64]) -> Option<Vec<f64>> {
    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(max > min) {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(SEED);
    let sample_size = series.len().min(MAX_SAMPLES);
    let height_limit = ((sample_size as f64).log2().ceil() as usize).max(1);
    let normalizer = average_path_length(sample_size);

    let trees: Vec<IsoNode> = (0..NUM_TREES)
        .map(|_| {
            let sample: Vec<f64> = if series.len() > MAX_SAMPLES {
                rand::seq::index::sample(&mut rng, series.len(), MAX_SAMPLES)
                    .into_iter()
                    .map(|i| series[i])
                    .collect()
            } else {
                series.to_vec()
            };
            build_tree(sample, 0, height_limit, &mut rng)
        })
        .collect();

    let scores = series
        .iter()
        .map(|&x| {
            let total: f64 = trees.iter().map(|tree| path_length(tree, x, 0.0)).sum();
            let avg = total / NUM_TREES as f64;
            2f64.powf(-avg / normalizer)
        })
        .collect();

    Some(scores)
}

fn build_tree(mut points: Vec<f64>, depth: usize, limit: usize, rng: &mut StdRng) -> IsoNode {
    if depth >= limit || points.len() <= 1 {
        return IsoNode::Leaf {
            size: points.len(),
        };
    }
    let min = points.iter().copied().fold(f64::INFINITY, f64::min);
    let max = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(max > min) {
        // All remaining points coincide; no cut can separate them.
        return IsoNode::Leaf {
            size: points.len(),
        };
    }

    let value = rng.random_range(min..max);
    let (left, right): (Vec<f64>, Vec<f64>) = points.drain(..).partition(|&p| p < value);
    IsoNode::Split {
        value,
        left: Box::new(build_tree(left, depth + 1, limit, rng)),
        right: Box::new(build_tree(right, depth + 1, limit, rng)),
    }
}

fn path_length(node: &IsoNode, x: f64, depth: f64) -> f64 {
    match node {
        IsoNode::Leaf { size } => depth + average_path_length(*size),
        IsoNode::Split { value, left, right } => {
            if x < *value {
                path_length(left, x, depth + 1.0)
            } else {
                path_length(right, x, depth + 1.0)
            }
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` points,
/// `c(n) = 2 * H(n - 1) - 2 * (n - 1) / n`. Grounds both the leaf-size
/// adjustment and the score normalizer.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

fn flag_by_quantile(scores: &[f64], contamination: f64) -> Vec<bool> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);
    let cut = ((1.0 - contamination) * scores.len() as f64).floor() as usize;
    let threshold = sorted[cut.min(scores.len() - 1)];
    scores.iter().map(|&s| s > threshold).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline_with_spike() -> Vec<f64> {
        // Tight ramp around 10 plus one far-away point.
        let mut series: Vec<f64> = (0..49).map(|i| 10.0 + i as f64 * 0.02).collect();
        series.push(100.0);
        series
    }

    #[test]
    fn short_series_is_all_false() {
        assert_eq!(detect(&[], 0.05), Vec::<bool>::new());
        assert_eq!(detect(&[1.0], 0.05), vec![false]);
    }

    #[test]
    fn constant_series_is_all_false() {
        let series = [42.0; 30];
        assert_eq!(detect(&series, 0.1), vec![false; 30]);
    }

    #[test]
    fn flags_injected_extreme_point() {
        let series = baseline_with_spike();
        let flags = detect(&series, 0.1);
        assert!(flags[49], "the distant point must be isolated");
        let flagged = flags.iter().filter(|&&f| f).count();
        assert!(flagged <= 5, "at most the contamination share fires: {}", flagged);
    }

    #[test]
    fn deterministic_across_calls() {
        let series = baseline_with_spike();
        assert_eq!(detect(&series, 0.1), detect(&series, 0.1));
    }

    #[test]
    fn spike_scores_highest() {
        let series = baseline_with_spike();
        let scores = fit_scores(&series).unwrap();
        let spike_score = scores[49];
        for (i, &score) in scores.iter().enumerate().take(49) {
            assert!(
                spike_score > score,
                "baseline point {} outscored the spike ({} >= {})",
                i,
                score,
                spike_score
            );
        }
    }

    #[test]
    fn path_length_normalizer_reference_values() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        // c(256) is roughly 10.24 for the standard normalizer.
        let c = average_path_length(256);
        assert!((c - 10.24).abs() < 0.1, "c(256) = {}", c);
    }
}
