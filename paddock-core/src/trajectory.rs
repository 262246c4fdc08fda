//! Recorded per-sample trajectory data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::engine::SkillId;

/// Slot identity for recorded data: the first- or second-listed competitor.
///
/// Slots are fixed to the competitor, never to the current leader/follower
/// role, so downstream consumers can rely on slot 0 always meaning the
/// first-listed competitor even after an anomaly swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Competitor {
    A,
    B,
}

impl Competitor {
    /// The opposing competitor.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Slot index into per-sample arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

/// Closed skill activation interval in course position units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillInterval {
    pub start: f64,
    pub end: f64,
}

/// Activation intervals per skill, in activation order. Contains only skills
/// that actually activated during the sample.
pub type SkillIntervalMap = HashMap<SkillId, Vec<SkillInterval>>;

/// Full recorded trajectory for one competitor in one sample.
///
/// The four sequences are co-indexed, one entry per fixed simulation step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub time: Vec<f64>,
    pub position: Vec<f64>,
    pub speed: Vec<f64>,
    pub hp: Vec<f64>,
    /// Gate start delay in seconds.
    pub start_delay: f64,
    /// Accumulated downhill-boost duration in seconds.
    pub downhill_duration: f64,
    pub skill_intervals: SkillIntervalMap,
}

impl Trajectory {
    /// Number of recorded steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True when no steps were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub(crate) fn push_step(&mut self, time: f64, position: f64, speed: f64, hp: f64) {
        self.time.push(time);
        self.position.push(position);
        self.speed.push(speed);
        self.hp.push(hp);
    }
}

/// Both competitors' trajectories for one accepted sample, slot-fixed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplePair {
    runs: [Trajectory; 2],
}

impl SamplePair {
    #[must_use]
    pub fn new(first: Trajectory, second: Trajectory) -> Self {
        Self {
            runs: [first, second],
        }
    }

    /// Borrow one competitor's trajectory.
    #[must_use]
    pub fn run(&self, who: Competitor) -> &Trajectory {
        &self.runs[who.index()]
    }

    /// Mutably borrow one competitor's trajectory.
    pub fn run_mut(&mut self, who: Competitor) -> &mut Trajectory {
        &mut self.runs[who.index()]
    }
}
