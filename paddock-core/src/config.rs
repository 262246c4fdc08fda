//! Competitor and race configuration consumed at the comparison boundary.
//!
//! Stats and strategy are opaque to the core; they pass straight through to
//! the engine. The core itself only reads skill lists, the course distance,
//! and the option flags.

use serde::{Deserialize, Serialize};

use crate::engine::SkillId;

/// Running strategy handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunningStyle {
    Front,
    #[default]
    Pace,
    Late,
    End,
}

/// Raw stat line for one competitor, consumed opaquely by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorseStats {
    pub speed: u32,
    pub stamina: u32,
    pub power: u32,
    pub guts: u32,
    pub wisdom: u32,
}

impl Default for HorseStats {
    fn default() -> Self {
        Self {
            speed: 1000,
            stamina: 1000,
            power: 1000,
            guts: 1000,
            wisdom: 1000,
        }
    }
}

/// Immutable competitor definition for one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HorseConfig {
    /// Skill identifiers, unique per competitor. Application order onto the
    /// stream is decided by [`crate::sync`], not by this list's order.
    pub skills: Vec<SkillId>,
    pub stats: HorseStats,
    pub style: RunningStyle,
}

/// Track surface condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Ground {
    #[default]
    Firm,
    Good,
    Soft,
    Heavy,
}

/// Race-day weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
}

/// Season the race is run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Autumn,
    Winter,
}

/// Time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    #[default]
    Midday,
    Evening,
    Night,
}

/// Pre-race mood, scales several engine-internal rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Terrible,
    Bad,
    #[default]
    Normal,
    Good,
    Great,
}

/// Race grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    #[default]
    G1,
    G2,
    G3,
    Open,
    Debut,
}

/// Finishing-order constraint used to bias simulated pack composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConstraint {
    /// Inclusive valid finishing-order range, 1-based.
    pub range: (u8, u8),
    /// Number of competitors in the simulated field.
    pub field_size: u8,
}

/// Environmental definition of the race both competitors run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RaceDefinition {
    pub course_id: u32,
    pub ground: Ground,
    pub weather: Weather,
    pub season: Season,
    pub time: TimeOfDay,
    pub mood: Mood,
    pub grade: Grade,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderConstraint>,
}

/// The slice of course data the core reads directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourseInfo {
    /// Course length in distance units. Terminates stepping and clamps skill
    /// interval ends.
    pub distance: f64,
}

/// Option flags for one comparison run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    /// User-visible seed for the whole comparison.
    pub seed: u64,
    /// Enable the default pacer (position keep) on both streams.
    pub use_pos_keep: bool,
    /// Enable wisdom-check synchronization via the shared seed map.
    pub use_int_checks: bool,
    /// Enable the two region-specific mechanics uniformly on both streams.
    pub regional_rules: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            use_pos_keep: false,
            use_int_checks: false,
            regional_rules: true,
        }
    }
}
