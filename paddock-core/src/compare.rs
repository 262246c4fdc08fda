//! Comparison orchestrator: drives the sampling loop end to end.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{CompareOptions, CourseInfo, HorseConfig};
use crate::engine::{EngineError, Perspective, SkillMetaSource, StreamBuilder};
use crate::rng::WisdomRng;
use crate::stats::{RepresentativeRuns, RunSelector};
use crate::stepper::run_sample;
use crate::swap::{SampleVerdict, SwapController};
use crate::sync::synchronize;
use crate::tracker::IntervalTracker;

/// Failures a comparison run can surface to its caller.
#[derive(Debug, Error)]
pub enum CompareError {
    /// A comparison needs at least one sample.
    #[error("requested sample count must be at least 1")]
    EmptySampleCount,
    /// Engine failure, propagated unchanged; the comparison is abandoned.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Final output of one comparison: the ascending margin distribution plus
/// four representative trajectory pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Signed margins in lengths, sorted ascending, exactly one per
    /// requested sample. Positive means the second-listed competitor
    /// finished ahead.
    pub results: Vec<f64>,
    pub runs: RepresentativeRuns,
}

impl ComparisonResult {
    /// Headline statistics of the margin distribution.
    #[must_use]
    pub fn summary(&self) -> ResultSummary {
        let mid = self.results.len() / 2;
        let median = if mid > 0 && self.results.len() % 2 == 0 {
            f64::midpoint(self.results[mid - 1], self.results[mid])
        } else {
            self.results.get(mid).copied().unwrap_or_default()
        };
        let count = u32::try_from(self.results.len()).unwrap_or(u32::MAX);
        let mean = self.results.iter().sum::<f64>() / f64::from(count.max(1));
        ResultSummary {
            mean,
            median,
            min: self.results.first().copied().unwrap_or_default(),
            max: self.results.last().copied().unwrap_or_default(),
        }
    }
}

/// Display-ready digest of a margin distribution, in lengths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// Run a full comparison of two competitors over one course.
///
/// `base` is a stream builder already configured by the caller with sample
/// count, seed, course, and race definition; its fork provides the second
/// competitor's stream as a randomness continuation of the first. The loop
/// accepts exactly `nsamples` valid samples, transparently retrying any
/// attempt the swap controller flags as biased.
///
/// # Errors
///
/// `EmptySampleCount` when `nsamples` is zero; engine failures propagate
/// unchanged and abort the run.
pub fn run_comparison<B, M>(
    nsamples: usize,
    base: B,
    course: &CourseInfo,
    first: &HorseConfig,
    second: &HorseConfig,
    options: &CompareOptions,
    meta: &M,
) -> Result<ComparisonResult, CompareError>
where
    B: StreamBuilder,
    M: SkillMetaSource,
{
    if nsamples == 0 {
        return Err(CompareError::EmptySampleCount);
    }

    let mut standard = base;
    let mut compare = standard.fork();
    standard.set_horse(first);
    compare.set_horse(second);

    let mut wisdom_rng = WisdomRng::from_user_seed(options.seed);
    let sync = synchronize(meta, &first.skills, &second.skills, &mut wisdom_rng);
    for &id in &sync.first {
        standard.add_skill(id, Perspective::Own);
        compare.add_skill(id, Perspective::Rival);
    }
    for &id in &sync.second {
        compare.add_skill(id, Perspective::Own);
        standard.add_skill(id, Perspective::Rival);
    }

    if options.regional_rules {
        standard.enable_regional_mechanics();
        compare.enable_regional_mechanics();
    }
    if options.use_pos_keep {
        standard.enable_pacer();
        compare.enable_pacer();
    }
    if options.use_int_checks {
        standard.enable_wisdom_checks(&sync.wisdom_seeds);
        compare.enable_wisdom_checks(&sync.wisdom_seeds);
    }

    let mut streams = [standard.build()?, compare.build()?];
    let mut trackers = [
        IntervalTracker::new(course.distance),
        IntervalTracker::new(course.distance),
    ];
    let mut controller = SwapController::new();
    let mut selector = RunSelector::new(nsamples);

    let mut accepted = 0;
    let mut retry = false;
    while accepted < nsamples {
        let stepped = run_sample(
            &mut streams,
            &mut trackers,
            controller.roles(),
            retry,
            course.distance,
        )?;
        match controller.evaluate(stepped.leader_final, stepped.follower_at_alignment) {
            SampleVerdict::Accepted { margin } => {
                retry = false;
                selector.record(margin, &stepped.pair);
                accepted += 1;
            }
            SampleVerdict::Anomalous => {
                // Same sample index again, fresh draw under swapped roles.
                retry = true;
            }
        }
    }

    let (results, runs) = selector.finish().ok_or(CompareError::EmptySampleCount)?;
    Ok(ComparisonResult { results, runs })
}
