//! Frequency table of hand values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Discrete value → count table produced by enumeration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDistribution {
    counts: BTreeMap<i64, u64>,
    total: u64,
}

/// One equal-width histogram bin, normalized so the bins integrate to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub density: f64,
}

impl ValueDistribution {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All mass on a single value.
    #[must_use]
    pub fn point_mass(value: i64) -> Self {
        let mut dist = Self::new();
        dist.record(value, 1);
        dist
    }

    /// Build from `(value, count)` pairs. Repeated values accumulate.
    pub fn from_counts(counts: impl IntoIterator<Item = (i64, u64)>) -> Self {
        let mut dist = Self::new();
        for (value, count) in counts {
            dist.record(value, count);
        }
        dist
    }

    /// Add `count` outcomes with the given value.
    pub fn record(&mut self, value: i64, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(value).or_insert(0) += count;
        self.total += count;
    }

    /// Number of enumerated outcomes.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn count(&self, value: i64) -> u64 {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn probability(&self, value: i64) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count(value) as f64 / self.total as f64
        }
    }

    #[must_use]
    pub fn min(&self) -> Option<i64> {
        self.counts.keys().next().copied()
    }

    #[must_use]
    pub fn max(&self) -> Option<i64> {
        self.counts.keys().next_back().copied()
    }

    /// Expected value of the distribution.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let weighted: f64 = self
            .counts
            .iter()
            .map(|(&v, &c)| v as f64 * c as f64)
            .sum();
        Some(weighted / self.total as f64)
    }

    /// `(value, count)` in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.counts.iter().map(|(&v, &c)| (v, c))
    }

    /// Number of distinct values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Split `[min, max]` into `bins` equal-width density bins.
    ///
    /// The last bin is closed on the right. A single-valued distribution gets
    /// one bin of width 1 centered on the value.
    #[must_use]
    pub fn density_bins(&self, bins: usize) -> Vec<HistogramBin> {
        let (Some(min), Some(max)) = (self.min(), self.max()) else {
            return Vec::new();
        };
        if bins == 0 {
            return Vec::new();
        }
        let total = self.total as f64;
        if min == max {
            return vec![HistogramBin {
                start: min as f64 - 0.5,
                end: min as f64 + 0.5,
                density: 1.0,
            }];
        }

        let start = min as f64;
        let width = (max - min) as f64 / bins as f64;
        let mut counts = vec![0u64; bins];
        for (value, count) in self.iter() {
            let idx = (((value - min) as f64 / width) as usize).min(bins - 1);
            counts[idx] += count;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, c)| HistogramBin {
                start: start + i as f64 * width,
                end: start + (i + 1) as f64 * width,
                density: c as f64 / (total * width),
            })
            .collect()
    }

    /// Render `density_bins(bins)` as text rows, one per bin.
    ///
    /// The densest bin gets a bar of `bar_width` characters.
    #[must_use]
    pub fn text_histogram(&self, bins: usize, bar_width: usize) -> Vec<String> {
        let bins = self.density_bins(bins);
        let peak = bins.iter().map(|b| b.density).fold(0.0, f64::max);
        bins.iter()
            .map(|bin| {
                let len = if peak > 0.0 {
                    (bin.density / peak * bar_width as f64).round() as usize
                } else {
                    0
                };
                let bar = "#".repeat(len);
                format!(
                    "{:>6.1} .. {:<6.1} | {bar:<bar_width$} {:.3}",
                    bin.start, bin.end, bin.density
                )
            })
            .collect()
    }
}
