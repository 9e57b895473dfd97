//! Summary statistics over the effective-rate series of a run

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Most effective-rate values kept for the median
///
/// Up to this many trials the median is exact. Longer runs keep a uniform
/// sample of this size, so memory stays bounded at any sample size.
pub const MEDIAN_SAMPLE_CAPACITY: usize = 10_000_000;

/// Mean, median, min and max of the live effective rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl SummaryStatistics {
    /// Compute over `values`, sorting them in place
    ///
    /// The median of an even-length series is the mean of the two middle
    /// values. An empty series yields all zeros.
    pub fn from_values(values: &mut [f64]) -> Self {
        if values.is_empty() {
            return SummaryStatistics::default();
        }

        values.sort_unstable_by(f64::total_cmp);
        let len = values.len();
        let sum: f64 = values.iter().sum();

        SummaryStatistics {
            average: sum / len as f64,
            median: sorted_median(values),
            min: values[0],
            max: values[len - 1],
        }
    }
}

fn sorted_median(values: &[f64]) -> f64 {
    let len = values.len();
    if len % 2 == 0 {
        (values[len / 2 - 1] + values[len / 2]) / 2.0
    } else {
        values[len / 2]
    }
}

/// Streaming accumulator with bounded memory
///
/// Sum, min and max are exact over every pushed value. The median comes
/// from a reservoir of at most `capacity` values (Algorithm R), which holds
/// the whole series while it fits.
#[derive(Debug, Clone)]
pub struct SeriesAccumulator {
    capacity: usize,
    seen: u64,
    sum: f64,
    min: f64,
    max: f64,
    sample: Vec<f64>,
}

impl SeriesAccumulator {
    /// Accumulator sized for `expected` values
    pub fn new(expected: u64) -> Self {
        Self::with_capacity(expected, MEDIAN_SAMPLE_CAPACITY)
    }

    pub fn with_capacity(expected: u64, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let preallocated = expected.min(capacity as u64) as usize;
        SeriesAccumulator {
            capacity,
            seen: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sample: Vec::with_capacity(preallocated),
        }
    }

    pub fn push<R: Rng + ?Sized>(&mut self, value: f64, rng: &mut R) {
        self.seen += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);

        if self.sample.len() < self.capacity {
            self.sample.push(value);
        } else {
            let slot = rng.gen_range(0..self.seen);
            if slot < self.capacity as u64 {
                self.sample[slot as usize] = value;
            }
        }
    }

    pub fn len(&self) -> u64 {
        self.seen
    }

    pub fn is_empty(&self) -> bool {
        self.seen == 0
    }

    /// Values held for the median
    pub fn sample_len(&self) -> usize {
        self.sample.len()
    }

    /// True while every pushed value is still held
    pub fn is_exact(&self) -> bool {
        self.seen == self.sample.len() as u64
    }

    pub fn finish(mut self) -> SummaryStatistics {
        if self.seen == 0 {
            return SummaryStatistics::default();
        }

        self.sample.sort_unstable_by(f64::total_cmp);
        SummaryStatistics {
            average: self.sum / self.seen as f64,
            median: sorted_median(&self.sample),
            min: self.min,
            max: self.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_odd_series() {
        let mut values = vec![5.0, 1.0, 3.0];
        let stats = SummaryStatistics::from_values(&mut values);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert!((stats.average - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_even_series_median_is_midpoint() {
        let mut values = vec![4.0, 1.0, 2.0, 10.0];
        let stats = SummaryStatistics::from_values(&mut values);
        assert!((stats.median - 3.0).abs() < 1e-12);
        assert!((stats.average - 4.25).abs() < 1e-12);
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(SummaryStatistics::from_values(&mut []), SummaryStatistics::default());
        assert_eq!(SeriesAccumulator::new(0).finish(), SummaryStatistics::default());
    }

    #[test]
    fn test_accumulator_matches_full_sort_while_it_fits() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut values: Vec<f64> = (0..1_001).map(|_| rng.gen_range(0.0..10.0)).collect();

        let mut acc = SeriesAccumulator::with_capacity(values.len() as u64, 2_000);
        for &value in &values {
            acc.push(value, &mut rng);
        }
        assert!(acc.is_exact());

        let streamed = acc.finish();
        let sorted = SummaryStatistics::from_values(&mut values);
        assert_eq!(streamed.median, sorted.median);
        assert_eq!(streamed.min, sorted.min);
        assert_eq!(streamed.max, sorted.max);
        assert!((streamed.average - sorted.average).abs() < 1e-9);
    }

    #[test]
    fn test_accumulator_memory_is_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut acc = SeriesAccumulator::with_capacity(1_000_000, 1_000);
        for i in 0..100_000 {
            acc.push(i as f64, &mut rng);
        }

        assert_eq!(acc.len(), 100_000);
        assert_eq!(acc.sample_len(), 1_000);
        assert!(!acc.is_exact());

        let stats = acc.finish();
        // min, max and mean stay exact past the capacity
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 99_999.0);
        assert!((stats.average - 49_999.5).abs() < 1e-6);
        // uniform sample of a uniform series lands near the true midpoint
        assert!((stats.median - 50_000.0).abs() < 5_000.0, "median {}", stats.median);
    }
}
