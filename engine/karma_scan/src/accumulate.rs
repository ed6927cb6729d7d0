//! Running accumulators.
//!
//! Each starts empty and only ever grows; scans add to whatever the caller
//! hands in.

use std::cmp::Ordering;

use crate::{Result, ScanError};

/// Running minimum and maximum.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Extremes {
    pub min: f64,
    pub max: f64,
}

impl Default for Extremes {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Extremes {
    /// Nothing seen yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from explicit bounds, as when continuing an earlier scan.
    pub fn with_bounds(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether no value has been added.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    #[inline]
    pub fn add(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// Fixed-range histogram with its tallest bin tracked as values arrive.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    min: f64,
    max: f64,
    bins: Vec<u64>,
    peak: u64,
    mode: usize,
}

impl Histogram {
    /// `num_bins` equal bins over `min..=max`.
    pub fn new(min: f64, max: f64, num_bins: usize) -> Result<Self> {
        if num_bins == 0 || min.partial_cmp(&max) != Some(Ordering::Less) {
            return Err(ScanError::InvalidHistogram {
                min,
                max,
                bins: num_bins,
            });
        }
        Ok(Self {
            min,
            max,
            bins: vec![0; num_bins],
            peak: 0,
            mode: 0,
        })
    }

    #[inline]
    pub fn bins(&self) -> &[u64] {
        &self.bins
    }

    /// Count in the tallest bin.
    #[inline]
    pub fn peak(&self) -> u64 {
        self.peak
    }

    /// Index of the tallest bin; the lowest such index on ties.
    #[inline]
    pub fn mode(&self) -> usize {
        self.mode
    }

    /// Values counted so far.
    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// Count `value` if it lies within the range. The maximum falls in the
    /// last bin.
    pub fn add(&mut self, value: f64) {
        if value < self.min || value > self.max {
            return;
        }
        let last = self.bins.len() - 1;
        let scaled = (value - self.min) / (self.max - self.min) * self.bins.len() as f64;
        let bin = (scaled as usize).min(last);
        self.bins[bin] += 1;
        let count = self.bins[bin];
        if count > self.peak || (count == self.peak && bin < self.mode) {
            self.peak = count;
            self.mode = bin;
        }
    }
}

/// Running moments plus extremes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub sum_sq: f64,
    pub count: u64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
            sum_sq: 0.0,
            count: 0,
        }
    }
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.sum_sq += value * value;
        self.count += 1;
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Population standard deviation.
    pub fn stddev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let variance = self.sum_sq / self.count as f64 - mean * mean;
        Some(variance.max(0.0).sqrt())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
