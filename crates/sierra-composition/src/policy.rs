//! Conflict policy and composition errors
//!
//! Two criteria varied together may both edit the same `(path, attribute)`.
//! [`ConflictPolicy`] decides whether such a cell is kept or rejected.

use serde::{Deserialize, Serialize};
use sierra_changeset::Conflict;
use std::fmt::{self, Display, Formatter};

/// What to do when a composed cell assigns one attribute several values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Keep every triple; application order decides the winner
    #[default]
    Retain,

    /// Fail composition
    Reject,
}

impl ConflictPolicy {
    /// Check if conflicts abort composition
    #[inline]
    #[must_use]
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Reject)
    }
}

impl Display for ConflictPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retain => write!(f, "retain"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Composition error with diagnostics
#[derive(Debug, thiserror::Error)]
pub enum CompositionError {
    /// Cell assigns one attribute several values under [`ConflictPolicy::Reject`]
    #[error("conflicting changes: {diagnostic}")]
    ConflictingChanges {
        /// Detailed diagnostic
        diagnostic: ConflictDiagnostic,
    },

    /// One side of a grid is empty
    #[error("cannot compose an empty axis ({axis})")]
    EmptyAxis {
        /// `"rows"` or `"columns"`
        axis: &'static str,
    },
}

/// Detailed conflict diagnostic
#[derive(Debug, Clone)]
pub struct ConflictDiagnostic {
    /// Row index of the offending cell
    pub row: usize,

    /// Column index of the offending cell
    pub col: usize,

    /// Conflicting keys with their values
    pub conflicts: Vec<Conflict>,

    /// Suggested resolutions
    pub suggestions: Vec<ResolutionSuggestion>,
}

impl Display for ConflictDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.conflicts.iter().map(ToString::to_string).collect();
        write!(f, "cell ({}, {}): {}", self.row, self.col, keys.join("; "))
    }
}

/// Resolution suggestions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSuggestion {
    /// Accept both values and let application order decide
    UseRetainPolicy,

    /// Drop the shared modifier (e.g. a fixed swarm size) from one criterion
    RemoveSharedModifier {
        /// Attribute edited by both criteria
        attr: String,
    },
}
