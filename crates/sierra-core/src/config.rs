//! Main configuration
//!
//! Loaded once from YAML and passed by reference to every stage. Every
//! field has a default, so an empty file is a valid configuration.
//!
//! ```yaml
//! named_exp_dirs: false
//! scenario: SS.16x8
//! exp_length: 10000
//! n_datapoints: 100
//! conflict_policy: retain
//! perf:
//!   blocks_collected_csv: blocks-transported-cum.csv
//!   similarity: dtw
//! ```

use crate::error::{SierraError, SierraResult};
use serde::{Deserialize, Serialize};
use sierra_composition::ConflictPolicy;
use sierra_criteria::{CriteriaConfig, VarianceSchedule};
use sierra_measures::SimilarityMethod;
use std::path::Path;

/// SIERRA configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SierraConfig {
    /// Use descriptive experiment directory names
    pub named_exp_dirs: bool,
    /// Block distribution and starting arena, e.g. `SS.16x8`
    pub scenario: Option<String>,
    /// Experiment length in timesteps
    pub exp_length: u64,
    /// Samples per experiment
    pub n_datapoints: usize,
    /// Handling of bivariate cells assigning one attribute twice
    pub conflict_policy: ConflictPolicy,
    /// Waveform sweep for temporal-variance criteria
    pub temporal_variance: VarianceSchedule,
    /// Performance-measure inputs and outputs
    pub perf: PerfConfig,
}

impl Default for SierraConfig {
    fn default() -> Self {
        let criteria = CriteriaConfig::default();
        Self {
            named_exp_dirs: criteria.named_exp_dirs,
            scenario: criteria.scenario,
            exp_length: criteria.exp_length,
            n_datapoints: criteria.n_datapoints,
            conflict_policy: criteria.conflict_policy,
            temporal_variance: criteria.temporal_variance,
            perf: PerfConfig::default(),
        }
    }
}

impl SierraConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode YAML text
    ///
    /// # Errors
    /// Returns [`SierraError::Config`] if the text is not a valid configuration
    pub fn from_yaml_str(text: &str) -> SierraResult<Self> {
        Self::decode(text, Path::new("<inline>"))
    }

    /// Load YAML file
    ///
    /// # Errors
    /// Returns error if the file is missing, unreadable or invalid
    pub fn from_yaml_file(path: &Path) -> SierraResult<Self> {
        if !path.exists() {
            return Err(SierraError::MissingInput {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|e| SierraError::io(path, e))?;
        let cfg = Self::decode(&text, path)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(cfg)
    }

    fn decode(text: &str, path: &Path) -> SierraResult<Self> {
        // serde_yaml decodes an empty document as unit, not as an empty map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| SierraError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// View consumed by criterion expansion
    #[must_use]
    pub fn criteria(&self) -> CriteriaConfig {
        CriteriaConfig {
            named_exp_dirs: self.named_exp_dirs,
            scenario: self.scenario.clone(),
            exp_length: self.exp_length,
            n_datapoints: self.n_datapoints,
            similarity: self.perf.similarity,
            conflict_policy: self.conflict_policy,
            temporal_variance: self.temporal_variance.clone(),
        }
    }

    /// With descriptive directory names
    #[inline]
    #[must_use]
    pub fn with_named_exp_dirs(mut self, named: bool) -> Self {
        self.named_exp_dirs = named;
        self
    }

    /// With scenario
    #[inline]
    #[must_use]
    pub fn with_scenario(mut self, scenario: impl Into<String>) -> Self {
        self.scenario = Some(scenario.into());
        self
    }

    /// With conflict policy
    #[inline]
    #[must_use]
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// With performance-measure settings
    #[inline]
    #[must_use]
    pub fn with_perf(mut self, perf: PerfConfig) -> Self {
        self.perf = perf;
        self
    }
}

/// Performance-measure settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerfConfig {
    /// Collated cumulative blocks collected
    pub blocks_collected_csv: String,
    /// Collated cumulative time lost to interference
    pub interference_csv: String,
    /// Collated per-interval performance
    pub intra_perf_csv: String,
    /// Collated per-interval environmental variance
    pub variance_csv: String,
    /// Distance metric for reactivity and adaptability
    pub similarity: SimilarityMethod,
    /// Directory under the collated root for derived tables
    pub measures_dir: String,
}

impl Default for PerfConfig {
    fn default() -> Self {
        Self {
            blocks_collected_csv: "blocks-transported-cum.csv".to_string(),
            interference_csv: "interference-cum.csv".to_string(),
            intra_perf_csv: "blocks-transported-int.csv".to_string(),
            variance_csv: "tv-environment.csv".to_string(),
            similarity: SimilarityMethod::default(),
            measures_dir: "pm".to_string(),
        }
    }
}
