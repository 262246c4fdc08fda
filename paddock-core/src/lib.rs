//! Paddock Comparison Core
//!
//! Engine-agnostic core for comparing two stochastic race simulations of the
//! same course. Runs N synchronized samples, normalizes the margin at the
//! leader's finish, corrects mid-sample measurement bias by swapping roles,
//! and reports the sorted margin distribution in lengths together with four
//! representative full trajectories. The per-horse physics engine itself is
//! a collaborator behind the traits in [`engine`].

pub mod compare;
pub mod config;
pub mod engine;
pub mod rng;
pub mod stats;
pub mod stepper;
pub mod swap;
pub mod sync;
pub mod tracker;
pub mod trajectory;

// Re-export commonly used types
pub use compare::{CompareError, ComparisonResult, ResultSummary, run_comparison};
pub use config::{
    CompareOptions, CourseInfo, Grade, Ground, HorseConfig, HorseStats, Mood, OrderConstraint,
    RaceDefinition, RunningStyle, Season, TimeOfDay, Weather,
};
pub use engine::{
    EngineError, EventBatch, EventKind, GroupId, PairRng, Perspective, RaceInstance,
    RegionalMechanic, SimulationStream, SkillCatalog, SkillEvent, SkillId, SkillMarker,
    SkillMetaSource, StreamBuilder, WisdomSeedMap,
};
pub use rng::WisdomRng;
pub use stats::{RepresentativeRuns, RunSelector, sample_cutoff};
pub use stepper::{STEP_SECONDS, SteppedSample, run_sample};
pub use swap::{LENGTH_UNITS, RoleAssignment, SampleVerdict, SwapController};
pub use sync::{SkillSync, WISDOM_RNG_BURN, synchronize};
pub use tracker::IntervalTracker;
pub use trajectory::{Competitor, SamplePair, SkillInterval, SkillIntervalMap, Trajectory};
