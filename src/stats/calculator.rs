//! Statistics Calculator Module
//! Box-plot summaries and histogram binning over plain value slices.

use serde::Serialize;
use statrs::statistics::Statistics;

/// Whisker reach as a multiple of the interquartile range.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Five-number summary plus whiskers and outliers for one box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub mean: f64,
    pub outliers: Vec<f64>,
}

/// Handles the numeric side of distribution charts.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Summarise values for a box plot. Returns `None` when no finite values remain.
    pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR_FACTOR * iqr;
        let high_fence = q3 + WHISKER_IQR_FACTOR * iqr;

        // Whiskers stop at the farthest observation inside the fences.
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lower_whisker || v > upper_whisker)
            .collect();

        Some(BoxSummary {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            mean: sorted.iter().mean(),
            outliers,
        })
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Equal-width bin edges spanning `[min, max]` of the values.
    ///
    /// Yields `bins + 1` edges, or none when there are no finite values.
    /// A constant sample gets a single unit-wide bin centred on the value.
    pub fn bin_edges(values: &[f64], bins: usize) -> Vec<f64> {
        let bins = bins.max(1);
        let (min, max) = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min > max {
            return Vec::new();
        }
        if min == max {
            return vec![min - 0.5, max + 0.5];
        }

        let width = (max - min) / bins as f64;
        (0..=bins)
            .map(|i| if i == bins { max } else { min + width * i as f64 })
            .collect()
    }

    /// Index of the bin a value falls into. The last bin is closed on the right.
    pub fn bin_index(edges: &[f64], value: f64) -> Option<usize> {
        let bins = edges.len().checked_sub(1)?;
        if bins == 0 || !value.is_finite() || value < edges[0] || value > edges[bins] {
            return None;
        }
        let idx = edges.partition_point(|&edge| edge <= value);
        Some(idx.saturating_sub(1).min(bins - 1))
    }

    /// Count values per bin.
    pub fn bin_counts(edges: &[f64], values: &[f64]) -> Vec<u64> {
        let mut counts = vec![0u64; edges.len().saturating_sub(1)];
        for &value in values {
            if let Some(idx) = Self::bin_index(edges, value) {
                counts[idx] += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 2.5);
        assert_eq!(StatsCalculator::percentile(&sorted, 25.0), 1.75);
        assert_eq!(StatsCalculator::percentile(&[7.0], 90.0), 7.0);
    }

    #[test]
    fn box_summary_separates_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = StatsCalculator::box_summary(&values).unwrap();

        assert_eq!(summary.count, 6);
        assert!(summary.q1 <= summary.median && summary.median <= summary.q3);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 100.0);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 5.0);
        assert_eq!(summary.outliers, vec![100.0]);
        assert!((summary.mean - 115.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn box_summary_of_nothing_is_none() {
        assert!(StatsCalculator::box_summary(&[]).is_none());
        assert!(StatsCalculator::box_summary(&[f64::NAN]).is_none());
    }

    #[test]
    fn bin_counts_cover_every_value() {
        let values = [0.0, 1.0, 2.5, 5.0, 9.99, 10.0];
        let edges = StatsCalculator::bin_edges(&values, 4);
        assert_eq!(edges.len(), 5);
        assert_eq!(edges[0], 0.0);
        assert_eq!(edges[4], 10.0);

        let counts = StatsCalculator::bin_counts(&edges, &values);
        assert_eq!(counts, vec![2, 1, 1, 2]);
        assert_eq!(counts.iter().sum::<u64>(), values.len() as u64);
    }

    #[test]
    fn constant_sample_gets_one_bin() {
        let edges = StatsCalculator::bin_edges(&[3.0, 3.0], 30);
        assert_eq!(edges, vec![2.5, 3.5]);
        assert_eq!(StatsCalculator::bin_counts(&edges, &[3.0, 3.0]), vec![2]);
    }
}
