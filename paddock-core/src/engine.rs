//! Boundary traits and identifiers for the external race simulation engine.
//!
//! The core never simulates a horse itself. It drives an engine through these
//! traits: a builder configured per competitor, the stateful per-competitor
//! sample stream it yields, and the race instances pulled from that stream.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::HorseConfig;

/// Numeric skill identifier as used by the engine's skill tables.
///
/// Serializes as a decimal string so it can key JSON maps, and deserializes
/// from either the string or the bare integer form. Deserialization relies
/// on a self-describing format; JSON is the only wire format the crate
/// targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SkillId(pub u32);

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SkillId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(Self)
    }
}

// Skill ids key JSON maps downstream, so they serialize as decimal strings
// rather than integers.
impl Serialize for SkillId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct SkillIdVisitor;

impl Visitor<'_> for SkillIdVisitor {
    type Value = SkillId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a numeric skill id, as integer or decimal string")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<SkillId, E> {
        u32::try_from(value)
            .map(SkillId)
            .map_err(|_| E::custom("skill id out of range"))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<SkillId, E> {
        value.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for SkillId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SkillIdVisitor)
    }
}

/// Skill group identifier. Variants of one skill (base and upgraded) share a
/// group and are mutually exclusive on a single competitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

/// Whose perspective an engine event or skill registration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perspective {
    /// The competitor owning the stream.
    Own,
    /// The opposing competitor, simulated as part of the pack.
    Rival,
}

/// Region-specific mechanics enabled uniformly on both streams. These raise
/// activation events like skills do but are never recorded as intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionalMechanic {
    FinalStretchInstinct,
    StaminaDuel,
}

/// What an activation event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillMarker {
    /// An ordinary skill from a competitor's configuration.
    Skill(SkillId),
    /// Synthetic marker for the downhill-boost mode. Tracked as an
    /// accumulated duration, not as position intervals.
    DownhillMode,
    /// Internal regional mechanic, excluded from interval tracking.
    Regional(RegionalMechanic),
}

/// Activation edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Activate,
    Deactivate,
}

/// One skill activation edge raised by the engine while stepping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillEvent {
    pub marker: SkillMarker,
    pub kind: EventKind,
    pub perspective: Perspective,
}

/// Event batch raised by a single step. Almost always zero or one entries.
pub type EventBatch = SmallVec<[SkillEvent; 2]>;

/// One in-flight stochastic race for a single competitor.
///
/// Instances are stepped at a fixed increment and expose their state fields
/// directly; cleanup happens on drop.
pub trait RaceInstance {
    /// Advance the race by `dt` simulated seconds, returning any skill
    /// activation edges crossed during the step.
    fn step(&mut self, dt: f64) -> EventBatch;

    /// Simulated time elapsed since the gate, in seconds.
    fn elapsed_time(&self) -> f64;

    /// Distance covered, in course distance units.
    fn position(&self) -> f64;

    /// Instantaneous speed including acceleration and error correction terms.
    fn current_speed(&self) -> f64;

    /// Remaining hit points.
    fn hp(&self) -> f64;

    /// Gate start delay rolled for this race, in seconds.
    fn start_delay(&self) -> f64;
}

/// Stateful, single-consumer sequence of independent samples for one
/// competitor.
///
/// The generator state persists across pulls; samples must be consumed
/// strictly in order. A `retry` pull re-yields a fresh instance for the
/// current sample without advancing the per-sample randomness again.
pub trait SimulationStream {
    type Race: RaceInstance;

    /// Pull the next race instance.
    ///
    /// # Errors
    ///
    /// Propagates engine failures (exhaustion, misconfiguration) unchanged.
    fn pull(&mut self, retry: bool) -> Result<Self::Race, EngineError>;
}

/// Builder capability for one competitor's simulation stream.
///
/// The caller configures sample count, seed, course, and environmental race
/// definition before handing the builder to the core; the core applies skill
/// ordering (see [`crate::sync`]), option flags, and the competitor itself.
pub trait StreamBuilder: Sized {
    type Stream: SimulationStream;

    /// Duplicate this builder's configuration for the second competitor. The
    /// fork's randomness is a continuation of the original's, which is what
    /// makes sampling order a correctness invariant.
    fn fork(&self) -> Self;

    /// Assign the competitor configuration (stats and strategy; skills are
    /// registered separately in synchronized order).
    fn set_horse(&mut self, horse: &HorseConfig);

    /// Register one skill. `Own` registrations belong to this builder's
    /// competitor; `Rival` registrations mirror the opponent's skill so pack
    /// interactions stay symmetric.
    fn add_skill(&mut self, skill: SkillId, perspective: Perspective);

    /// Enable the default pacer (position-keep behavior).
    fn enable_pacer(&mut self);

    /// Enable stat-gated wisdom checks using the shared seed map.
    fn enable_wisdom_checks(&mut self, seeds: &WisdomSeedMap);

    /// Enable the two region-specific mechanics.
    fn enable_regional_mechanics(&mut self);

    /// Consume the builder and produce the stream.
    ///
    /// # Errors
    ///
    /// Returns the engine's own error for malformed course or competitor
    /// configuration.
    fn build(self) -> Result<Self::Stream, EngineError>;
}

/// Seeded generator primitive. The only operation the core needs is drawing
/// a pair of values.
pub trait PairRng {
    fn pair(&mut self) -> (u32, u32);
}

/// Skill id to RNG value pair, shared identically by both competitors for
/// any skill either one carries.
pub type WisdomSeedMap = HashMap<SkillId, (u32, u32)>;

/// Per-skill metadata the core consults: the mutual-exclusion group.
pub trait SkillMetaSource {
    /// Group id for a skill, or `None` when the skill belongs to no group.
    fn group_id(&self, skill: SkillId) -> Option<GroupId>;
}

/// Skill metadata table loaded from the engine's catalog JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillCatalog {
    groups: HashMap<SkillId, GroupId>,
}

impl SkillCatalog {
    /// Build a catalog from explicit entries.
    #[must_use]
    pub fn new(groups: HashMap<SkillId, GroupId>) -> Self {
        Self { groups }
    }

    /// Parse a catalog from its JSON form, a map of skill id to group id.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error when the document is malformed.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl SkillMetaSource for SkillCatalog {
    fn group_id(&self, skill: SkillId) -> Option<GroupId> {
        self.groups.get(&skill).copied()
    }
}

/// Failures originating in the external engine. The core propagates these
/// unchanged and aborts the in-progress comparison.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The stream yielded no further samples.
    #[error("simulation stream exhausted")]
    StreamExhausted,
    /// The engine rejected the course or competitor configuration.
    #[error("engine misconfiguration: {0}")]
    Misconfigured(String),
    /// Engine-specific failure the core does not interpret.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
