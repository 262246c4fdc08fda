//! Anomaly detection and leader/follower role management.
//!
//! A sample is measured by stepping the leader to the finish and reading the
//! follower's position at that moment. When the leader crosses the line
//! *behind* the follower's aligned position the margin would be measured past
//! the end of the course (a skill running past the finish, for example), so
//! the sample is biased: roles swap, the sign convention flips with them, and
//! the same sample index is retried with a fresh draw.

use serde::{Deserialize, Serialize};

use crate::trajectory::Competitor;

/// Distance units per reported "length".
pub const LENGTH_UNITS: f64 = 2.5;

/// Which competitor currently plays leader. Persists across samples until the
/// next anomaly forces another swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoleAssignment {
    ALeads,
    /// Initial assignment: the second-listed competitor leads.
    #[default]
    BLeads,
}

impl RoleAssignment {
    #[must_use]
    pub const fn leader(self) -> Competitor {
        match self {
            Self::ALeads => Competitor::A,
            Self::BLeads => Competitor::B,
        }
    }

    #[must_use]
    pub const fn follower(self) -> Competitor {
        self.leader().other()
    }

    #[must_use]
    pub const fn swapped(self) -> Self {
        match self {
            Self::ALeads => Self::BLeads,
            Self::BLeads => Self::ALeads,
        }
    }

    /// Sign convention: positive margins always mean the second-listed
    /// competitor finished ahead, whichever role it currently plays.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::ALeads => -1.0,
            Self::BLeads => 1.0,
        }
    }
}

/// Outcome of validating one sample attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleVerdict {
    /// Sample accepted with its signed margin in lengths.
    Accepted { margin: f64 },
    /// Measurement bias detected; roles were swapped and the same sample
    /// index must be retried.
    Anomalous,
}

/// Validates sample attempts and owns the current role assignment.
#[derive(Debug, Clone, Default)]
pub struct SwapController {
    roles: RoleAssignment,
}

impl SwapController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current role assignment, consulted fresh each attempt.
    #[must_use]
    pub const fn roles(&self) -> RoleAssignment {
        self.roles
    }

    /// Validate one attempt from the leader's final position and the
    /// follower's position at the alignment point.
    pub fn evaluate(&mut self, leader_final: f64, follower_at_alignment: f64) -> SampleVerdict {
        if follower_at_alignment.is_nan() || leader_final < follower_at_alignment {
            self.roles = self.roles.swapped();
            return SampleVerdict::Anomalous;
        }
        let margin = self.roles.sign() * (leader_final - follower_at_alignment) / LENGTH_UNITS;
        SampleVerdict::Accepted { margin }
    }
}
