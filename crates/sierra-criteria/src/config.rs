//! Configuration consumed by criteria
//!
//! The subset of the main configuration that criterion expansion and axis
//! queries read. Built once and passed by reference.

use serde::{Deserialize, Serialize};
use sierra_composition::ConflictPolicy;
use sierra_measures::SimilarityMethod;

/// Criterion-facing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaConfig {
    /// Use descriptive experiment directory names instead of `exp<i>`
    pub named_exp_dirs: bool,

    /// Block distribution and arena, e.g. `SS.16x8`
    pub scenario: Option<String>,

    /// Experiment length in timesteps
    pub exp_length: u64,

    /// Samples per experiment for waveform comparison
    pub n_datapoints: usize,

    /// Distance metric for temporal-variance ticks
    pub similarity: SimilarityMethod,

    /// Handling of cells assigning one attribute twice
    pub conflict_policy: ConflictPolicy,

    /// Waveform parameters swept by temporal-variance criteria
    pub temporal_variance: VarianceSchedule,
}

impl Default for CriteriaConfig {
    fn default() -> Self {
        Self {
            named_exp_dirs: false,
            scenario: None,
            exp_length: 10_000,
            n_datapoints: 100,
            similarity: SimilarityMethod::default(),
            conflict_policy: ConflictPolicy::default(),
            temporal_variance: VarianceSchedule::default(),
        }
    }
}

impl CriteriaConfig {
    /// Set descriptive directory naming
    #[must_use]
    pub fn with_named_exp_dirs(mut self, named: bool) -> Self {
        self.named_exp_dirs = named;
        self
    }

    /// Set scenario
    #[must_use]
    pub fn with_scenario(mut self, scenario: impl Into<String>) -> Self {
        self.scenario = Some(scenario.into());
        self
    }

    /// Set conflict policy
    #[must_use]
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Set similarity metric
    #[must_use]
    pub fn with_similarity(mut self, method: SimilarityMethod) -> Self {
        self.similarity = method;
        self
    }
}

/// Frequencies, amplitudes and step times swept by temporal variance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarianceSchedule {
    /// Cycles per timestep for periodic waveforms
    pub frequencies: Vec<f64>,

    /// Peak deviations
    pub amplitudes: Vec<f64>,

    /// Switch times in timesteps for step waveforms
    pub step_times: Vec<f64>,
}

impl Default for VarianceSchedule {
    fn default() -> Self {
        Self {
            frequencies: vec![0.01, 0.002, 0.001],
            amplitudes: vec![0.1, 0.25, 0.5],
            step_times: vec![2_500.0, 5_000.0, 7_500.0],
        }
    }
}
