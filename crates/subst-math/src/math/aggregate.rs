//! Rollups over score collections.
//!
//! Sums use Neumaier compensation so that rolling up many small
//! probabilities does not drift from the value a renderer would recompute.

use serde::Serialize;

/// Running count, compensated sum, and mean of a sequence of scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(into = "RollupSummary")]
pub struct Rollup {
    count: usize,
    sum: f64,
    compensation: f64,
}

/// Serialized form of a `Rollup`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollupSummary {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
}

impl From<Rollup> for RollupSummary {
    fn from(rollup: Rollup) -> Self {
        RollupSummary {
            count: rollup.count,
            sum: rollup.sum(),
            mean: rollup.mean(),
        }
    }
}

impl Rollup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one value.
    pub fn push(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Compensated sum; 0 for an empty rollup.
    pub fn sum(&self) -> f64 {
        self.sum + self.compensation
    }

    /// Arithmetic mean; 0 for an empty rollup.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum() / self.count as f64
        }
    }
}

impl FromIterator<f64> for Rollup {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut rollup = Rollup::new();
        for value in iter {
            rollup.push(value);
        }
        rollup
    }
}

impl Extend<f64> for Rollup {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

/// Arithmetic mean of `values`, or 0 when empty.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().copied().collect::<Rollup>().mean()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rollup_is_zero() {
        let r = Rollup::new();
        assert!(r.is_empty());
        assert_eq!(r.sum(), 0.0);
        assert_eq!(r.mean(), 0.0);
    }

    #[test]
    fn sum_and_mean() {
        let r: Rollup = [10.0, 20.0, 30.0, 0.0].into_iter().collect();
        assert_eq!(r.count(), 4);
        assert_eq!(r.sum(), 60.0);
        assert_eq!(r.mean(), 15.0);
    }

    #[test]
    fn compensation_keeps_small_terms() {
        let mut r = Rollup::new();
        r.push(1.0e16);
        r.push(1.0);
        r.push(-1.0e16);
        assert_eq!(r.sum(), 1.0);
    }

    #[test]
    fn extend_accumulates() {
        let mut r: Rollup = [1.0, 2.0].into_iter().collect();
        r.extend([3.0]);
        assert_eq!(r.count(), 3);
        assert_eq!(r.mean(), 2.0);
    }

    #[test]
    fn mean_helper() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[30.0, 20.0, 10.0, 0.0]), 15.0);
    }

    #[test]
    fn serializes_summary() {
        let r: Rollup = [1.5, 2.5].into_iter().collect();
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["sum"], 4.0);
        assert_eq!(json["mean"], 2.0);
        assert!(json.get("compensation").is_none());
    }
}
