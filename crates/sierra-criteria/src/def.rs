//! Experiment definitions produced by criterion generators

use serde::{Deserialize, Serialize};
use sierra_changeset::ChangeSet;

/// Display metadata for one experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpLabel {
    /// Filesystem-safe name used for descriptive directory naming
    pub slug: String,

    /// Axis value
    pub tick: f64,

    /// Axis label
    pub tick_label: String,
}

impl ExpLabel {
    /// Label for a numeric axis value; slug and label are the value itself
    #[must_use]
    pub fn numeric(value: impl std::fmt::Display, tick: f64) -> Self {
        let text = value.to_string();
        Self {
            slug: text.clone(),
            tick,
            tick_label: text,
        }
    }

    /// Label for the `index`-th entry of a categorical axis
    #[must_use]
    pub fn categorical(index: usize, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            slug: name.clone(),
            tick: index as f64,
            tick_label: name,
        }
    }
}

/// One experiment: its change set and how it is displayed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpDef {
    /// Template edits realising the experiment
    pub changes: ChangeSet,

    /// Display metadata
    pub label: ExpLabel,

    /// Robot count, when the criterion fixes it
    pub swarm_size: Option<usize>,
}

impl ExpDef {
    /// Create definition
    #[inline]
    #[must_use]
    pub fn new(changes: ChangeSet, label: ExpLabel, swarm_size: Option<usize>) -> Self {
        Self {
            changes,
            label,
            swarm_size,
        }
    }
}
