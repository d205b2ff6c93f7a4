//! Concurrency/throughput/latency measurements tied together by Little's Law

use crate::error::{AppError, Result};
use crate::types::ColumnPair;
use serde::{Deserialize, Serialize};

/// A single observation of a system: concurrency N, throughput X, mean latency R.
///
/// Only two of the three quantities are ever supplied; the third is derived
/// so that `N = X * R` holds. Zero or non-finite inputs are not rejected and
/// yield IEEE-754 infinities or NaN in the derived field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Number of concurrent workers (N)
    pub concurrency: f64,

    /// Throughput in events per unit time (X)
    pub throughput: f64,

    /// Mean latency per event (R)
    pub latency: f64,
}

fn check_point(point: &[f64]) -> Result<(f64, f64)> {
    match point {
        [a, b] => Ok((*a, *b)),
        _ => Err(AppError::invalid_argument(format!(
            "point must have exactly 2 elements, got {}",
            point.len()
        ))),
    }
}

impl Measurement {
    /// Measurement of throughput at a given concurrency; latency is `N / X`.
    pub fn from_concurrency_and_throughput(concurrency: f64, throughput: f64) -> Self {
        Self {
            concurrency,
            throughput,
            latency: concurrency / throughput,
        }
    }

    /// Measurement of latency at a given concurrency; throughput is `N / R`.
    pub fn from_concurrency_and_latency(concurrency: f64, latency: f64) -> Self {
        Self {
            concurrency,
            throughput: concurrency / latency,
            latency,
        }
    }

    /// Measurement of latency at a given throughput; concurrency is `X * R`.
    pub fn from_throughput_and_latency(throughput: f64, latency: f64) -> Self {
        Self {
            concurrency: throughput * latency,
            throughput,
            latency,
        }
    }

    /// `[concurrency, throughput]` pair form of [`Self::from_concurrency_and_throughput`].
    pub fn from_concurrency_and_throughput_point(point: &[f64]) -> Result<Self> {
        let (n, x) = check_point(point)?;
        Ok(Self::from_concurrency_and_throughput(n, x))
    }

    /// `[concurrency, latency]` pair form of [`Self::from_concurrency_and_latency`].
    pub fn from_concurrency_and_latency_point(point: &[f64]) -> Result<Self> {
        let (n, r) = check_point(point)?;
        Ok(Self::from_concurrency_and_latency(n, r))
    }

    /// `[throughput, latency]` pair form of [`Self::from_throughput_and_latency`].
    pub fn from_throughput_and_latency_point(point: &[f64]) -> Result<Self> {
        let (x, r) = check_point(point)?;
        Ok(Self::from_throughput_and_latency(x, r))
    }

    /// Build from a pair whose meaning is given by `columns`
    pub fn from_point(point: &[f64], columns: ColumnPair) -> Result<Self> {
        match columns {
            ColumnPair::ConcurrencyThroughput => Self::from_concurrency_and_throughput_point(point),
            ColumnPair::ConcurrencyLatency => Self::from_concurrency_and_latency_point(point),
            ColumnPair::ThroughputLatency => Self::from_throughput_and_latency_point(point),
        }
    }
}

/// Unordered collection of measurements handed to the fitter.
///
/// Insertion order carries no meaning; the fitter sorts its own copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSet {
    measurements: Vec<Measurement>,
}

impl MeasurementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw pairs interpreted according to `columns`
    pub fn from_pairs(pairs: &[[f64; 2]], columns: ColumnPair) -> Self {
        pairs
            .iter()
            .map(|pair| match columns {
                ColumnPair::ConcurrencyThroughput => Measurement::from_concurrency_and_throughput(pair[0], pair[1]),
                ColumnPair::ConcurrencyLatency => Measurement::from_concurrency_and_latency(pair[0], pair[1]),
                ColumnPair::ThroughputLatency => Measurement::from_throughput_and_latency(pair[0], pair[1]),
            })
            .collect()
    }

    pub fn push(&mut self, measurement: Measurement) {
        self.measurements.push(measurement);
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.measurements.iter()
    }

    pub fn as_slice(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Copy of the measurements ordered by ascending concurrency
    pub fn sorted_by_concurrency(&self) -> Vec<Measurement> {
        let mut sorted = self.measurements.clone();
        sorted.sort_by(|a, b| a.concurrency.total_cmp(&b.concurrency));
        sorted
    }

    /// Number of distinct concurrency levels present
    pub fn distinct_concurrency_levels(&self) -> usize {
        let sorted = self.sorted_by_concurrency();
        let mut count = 0;
        let mut previous: Option<f64> = None;
        for m in &sorted {
            if previous != Some(m.concurrency) {
                count += 1;
                previous = Some(m.concurrency);
            }
        }
        count
    }

    /// Observed (min, max) concurrency, or `None` for an empty set
    pub fn concurrency_range(&self) -> Option<(f64, f64)> {
        let sorted = self.sorted_by_concurrency();
        match (sorted.first(), sorted.last()) {
            (Some(lo), Some(hi)) => Some((lo.concurrency, hi.concurrency)),
            _ => None,
        }
    }
}

impl From<Vec<Measurement>> for MeasurementSet {
    fn from(measurements: Vec<Measurement>) -> Self {
        Self { measurements }
    }
}

impl FromIterator<Measurement> for MeasurementSet {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        Self {
            measurements: iter.into_iter().collect(),
        }
    }
}

impl Extend<Measurement> for MeasurementSet {
    fn extend<I: IntoIterator<Item = Measurement>>(&mut self, iter: I) {
        self.measurements.extend(iter);
    }
}

impl IntoIterator for MeasurementSet {
    type Item = Measurement;
    type IntoIter = std::vec::IntoIter<Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.measurements.into_iter()
    }
}

impl<'a> IntoIterator for &'a MeasurementSet {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.measurements.iter()
    }
}
