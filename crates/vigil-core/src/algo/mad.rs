//! Median-absolute-deviation outlier detection.

use super::EPSILON;

/// Scale factor mapping MAD onto the standard deviation of a normal
/// distribution. Kept at the conventional constant so scores stay
/// numerically compatible with other implementations.
const MAD_SCALE: f64 = 0.6745;

/// Flag elements whose modified z-score exceeds `threshold`.
///
/// `modified_z = 0.6745 * (x - median) / (MAD + eps)`. The median-based
/// dispersion makes this variant far less sensitive to the outlier's own
/// magnitude than the plain z-score.
pub fn detect(series: &[f64], threshold: f64) -> Vec<bool> {
    if series.len() < 2 {
        return vec![false; series.len()];
    }

    let median = median_of(series);
    let deviations: Vec<f64> = series.iter().map(|x| (x - median).abs()).collect();
    let mad = median_of(&deviations);

    series
        .iter()
        .map(|x| (MAD_SCALE * (x - median) / (mad + EPSILON)).abs() > threshold)
        .collect()
}

fn median_of(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_series_is_all_false() {
        assert_eq!(detect(&[], 3.5), Vec::<bool>::new());
        assert_eq!(detect(&[5.0], 3.5), vec![false]);
    }

    #[test]
    fn constant_series_is_all_false() {
        let series = [3.0; 10];
        assert_eq!(detect(&series, 3.5), vec![false; 10]);
    }

    #[test]
    fn flags_spike_against_flat_baseline() {
        // MAD is zero here, so the epsilon denominator carries the spike's
        // modified z far past any reasonable threshold.
        let series = [10.0, 10.0, 10.0, 10.0, 100.0];
        assert_eq!(detect(&series, 3.5), vec![false, false, false, false, true]);
    }

    #[test]
    fn robust_to_the_outlier_it_flags() {
        let series = [10.0, 10.4, 9.6, 10.2, 9.9, 10.1, 9.7, 55.0];
        let flags = detect(&series, 3.5);
        assert_eq!(flags[..7], [false; 7]);
        assert!(flags[7]);
    }

    #[test]
    fn permutation_equivariant() {
        let series = [10.0, 10.4, 9.6, 10.2, 9.9, 55.0, 9.7, 10.1];
        let flags = detect(&series, 3.5);

        let mut permuted = series;
        permuted.swap(1, 5);
        permuted.swap(0, 7);
        let mut expected = flags.clone();
        expected.swap(1, 5);
        expected.swap(0, 7);

        assert_eq!(detect(&permuted, 3.5), expected);
    }

    #[test]
    fn median_of_odd_and_even() {
        assert_eq!(median_of(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median_of(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }
}
