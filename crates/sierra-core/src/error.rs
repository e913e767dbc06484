//! Error types for SIERRA pipeline stages
//!
//! Structural and configuration errors are fatal. Missing inputs at
//! measure time are skippable: the affected measure is dropped with a
//! warning and the remaining measures still run.

use sierra_changeset::{EditError, PersistError};
use sierra_criteria::CriteriaError;
use sierra_measures::MeasureError;
use std::path::PathBuf;

/// Main SIERRA error type
#[derive(Debug, thiserror::Error)]
pub enum SierraError {
    /// Configuration file could not be read or decoded
    #[error("configuration error in {path}: {message}")]
    Config {
        /// Configuration file
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// Criterion could not be built or queried
    #[error("criteria error: {0}")]
    Criteria(#[from] CriteriaError),

    /// Measure computation failed
    #[error("measure error: {0}")]
    Measure(#[from] MeasureError),

    /// Experiment definition could not be persisted or loaded
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),

    /// Change set could not be applied to a template
    #[error("template edit error: {0}")]
    Edit(#[from] EditError),

    /// Filesystem failure
    #[error("io error at {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding failure
    #[error("csv error at {path}: {source}")]
    Csv {
        /// Offending table
        path: PathBuf,
        /// Underlying error
        #[source]
        source: csv::Error,
    },

    /// Table contents are not usable
    #[error("malformed table {path}: {reason}")]
    MalformedTable {
        /// Offending table
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// Required input file does not exist
    #[error("missing input: {path}")]
    MissingInput {
        /// Expected location
        path: PathBuf,
    },

    /// Table lacks an experiment's column
    #[error("{path} has no column '{column}'")]
    MissingColumn {
        /// Table
        path: PathBuf,
        /// Experiment directory name
        column: String,
    },

    /// Measure does not apply to this batch
    #[error("not applicable: {0}")]
    NotApplicable(String),
}

impl SierraError {
    /// Check if the error should skip one measure rather than abort
    #[inline]
    #[must_use]
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::MissingInput { .. }
                | Self::MissingColumn { .. }
                | Self::NotApplicable(_)
                | Self::Measure(MeasureError::InsufficientData { .. })
        )
    }

    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create CSV error for path
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for pipeline operations
pub type SierraResult<T> = Result<T, SierraError>;
