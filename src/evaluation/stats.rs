//! Summary statistics over a batch of runs

use ordered_float::OrderedFloat;
use serde::Serialize;

/// z-score of a two-sided 95% normal interval
pub const Z_95: f64 = 1.96;

/// Distribution summary of one metric. `std` is the population deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// Normal-approximation 95% interval around the mean
    pub ci95: (f64, f64),
}

impl Summary {
    /// `None` for an empty sample
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        let mut sorted: Vec<OrderedFloat<f64>> = samples.iter().copied().map(OrderedFloat).collect();
        sorted.sort();
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1].0 + sorted[mid].0) / 2.0
        } else {
            sorted[mid].0
        };

        let margin = Z_95 * std / n.sqrt();
        Some(Self {
            mean,
            std,
            min: sorted[0].0,
            max: sorted[sorted.len() - 1].0,
            median,
            ci95: (mean - margin, mean + margin),
        })
    }
}

/// Share of `flags` that are set, as a percentage
pub fn rate(flags: impl Iterator<Item = bool>) -> f64 {
    let (hits, total) = flags.fold((0usize, 0usize), |(hits, total), flag| (hits + flag as usize, total + 1));
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64 * 100.0
    }
}
