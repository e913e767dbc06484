//! Batch directory layout

use crate::config::PerfConfig;
use std::path::{Path, PathBuf};

/// Directories of one batch experiment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPaths {
    root: PathBuf,
}

impl BatchPaths {
    /// Layout rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Batch root
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Generated experiment inputs, one directory per experiment
    #[must_use]
    pub fn input_root(&self) -> PathBuf {
        self.root.join("exp-inputs")
    }

    /// Raw simulator outputs
    #[must_use]
    pub fn output_root(&self) -> PathBuf {
        self.root.join("exp-outputs")
    }

    /// Averaged per-experiment tables collated into one table per metric
    #[must_use]
    pub fn collated_root(&self) -> PathBuf {
        self.root.join("statistics").join("collated")
    }

    /// Derived performance-measure tables
    #[must_use]
    pub fn measures_root(&self, perf: &PerfConfig) -> PathBuf {
        self.collated_root().join(&perf.measures_dir)
    }
}
