//! Margin distribution aggregation and representative run retention.

use num_traits::cast::cast;
use serde::{Deserialize, Serialize};

use crate::trajectory::SamplePair;

/// The four retained full trajectories of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepresentativeRuns {
    /// Sample with the smallest margin.
    pub min: SamplePair,
    /// Sample with the largest margin.
    pub max: SamplePair,
    /// Sample nearest the estimated mean margin.
    pub mean: SamplePair,
    /// Sample nearest the estimated median margin.
    pub median: SamplePair,
}

/// Index of the first sample eligible for mean/median refinement.
///
/// Everything before it only contributes its scalar margin; the estimates are
/// computed over exactly those margins once the cutoff sample arrives.
#[must_use]
pub fn sample_cutoff(nsamples: usize) -> usize {
    let n = cast::<usize, f64>(nsamples).unwrap_or(0.0);
    let eighty_percent = cast::<f64, usize>((n * 0.8).floor()).unwrap_or(0);
    eighty_percent.max(nsamples.saturating_sub(200))
}

/// Streams accepted sample margins into sorted aggregate statistics and four
/// representative trajectory pairs without retaining every trajectory.
///
/// Min and max runs track exactly. The mean and median runs come from a
/// two-phase estimate-then-refine pass: scalars accumulate until the cutoff,
/// estimates are taken there, and the tail window keeps the sample nearest
/// each estimate. That bounds memory to the scalar vector plus four
/// trajectory pairs, at the cost of the representatives being the nearest
/// tail-window sample rather than the true mean/median sample.
#[derive(Debug, Clone)]
pub struct RunSelector {
    cutoff: usize,
    margins: Vec<f64>,
    min: f64,
    max: f64,
    min_run: Option<SamplePair>,
    max_run: Option<SamplePair>,
    estimates: Option<(f64, f64)>,
    best_mean_diff: f64,
    best_median_diff: f64,
    mean_run: Option<SamplePair>,
    median_run: Option<SamplePair>,
}

impl RunSelector {
    #[must_use]
    pub fn new(nsamples: usize) -> Self {
        Self {
            cutoff: sample_cutoff(nsamples),
            margins: Vec::with_capacity(nsamples),
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            min_run: None,
            max_run: None,
            estimates: None,
            best_mean_diff: f64::INFINITY,
            best_median_diff: f64::INFINITY,
            mean_run: None,
            median_run: None,
        }
    }

    /// Record one accepted sample's margin and trajectory data.
    pub fn record(&mut self, margin: f64, data: &SamplePair) {
        let index = self.margins.len();
        self.margins.push(margin);

        if margin < self.min {
            self.min = margin;
            self.min_run = Some(data.clone());
        }
        if margin > self.max {
            self.max = margin;
            self.max_run = Some(data.clone());
        }

        if index == self.cutoff {
            // For a single-sample run the cutoff is zero and the lone margin
            // serves as its own estimate.
            let basis = if index == 0 {
                &self.margins[..]
            } else {
                &self.margins[..index]
            };
            self.estimates = Some((mean_of(basis), median_of(basis)));
        }

        if index >= self.cutoff
            && let Some((est_mean, est_median)) = self.estimates
        {
            let mean_diff = (margin - est_mean).abs();
            if mean_diff < self.best_mean_diff {
                self.best_mean_diff = mean_diff;
                self.mean_run = Some(data.clone());
            }
            let median_diff = (margin - est_median).abs();
            if median_diff < self.best_median_diff {
                self.best_median_diff = median_diff;
                self.median_run = Some(data.clone());
            }
        }
    }

    /// Consume the selector, returning the ascending margin vector and the
    /// four representatives. `None` when no sample was ever recorded.
    #[must_use]
    pub fn finish(self) -> Option<(Vec<f64>, RepresentativeRuns)> {
        let runs = RepresentativeRuns {
            min: self.min_run?,
            max: self.max_run?,
            mean: self.mean_run?,
            median: self.median_run?,
        };
        let mut margins = self.margins;
        margins.sort_by(f64::total_cmp);
        Some((margins, runs))
    }

    #[cfg(test)]
    fn estimates(&self) -> Option<(f64, f64)> {
        self.estimates
    }
}

fn mean_of(values: &[f64]) -> f64 {
    let len = cast::<usize, f64>(values.len()).unwrap_or(1.0);
    values.iter().sum::<f64>() / len
}

/// Middle value of the sorted slice; even counts average the two middles.
fn median_of(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if mid > 0 && sorted.len() % 2 == 0 {
        f64::midpoint(sorted[mid - 1], sorted[mid])
    } else {
        sorted[mid]
    }
}
