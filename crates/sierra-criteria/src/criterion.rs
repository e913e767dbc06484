//! Batch criterion: one or two varied parameters

use crate::bivariate::{Axis, BivarCriterion};
use crate::config::CriteriaConfig;
use crate::error::CriteriaResult;
use crate::univariate::UnivarCriterion;
use sierra_changeset::ChangeSet;
use std::path::{Path, PathBuf};

/// Univariate or bivariate batch criterion
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// One varied parameter
    Univar(UnivarCriterion),
    /// Two varied parameters
    Bivar(BivarCriterion),
}

impl Criterion {
    /// Tokens the criterion was built from
    #[must_use]
    pub fn cli_tokens(&self) -> Vec<&str> {
        match self {
            Self::Univar(c) => vec![c.cli_token()],
            Self::Bivar(c) => vec![c.criterion1().cli_token(), c.criterion2().cli_token()],
        }
    }

    /// Check if two parameters are varied
    #[inline]
    #[must_use]
    pub fn is_bivariate(&self) -> bool {
        matches!(self, Self::Bivar(_))
    }

    /// Univariate criterion, if this is one
    #[must_use]
    pub fn as_univar(&self) -> Option<&UnivarCriterion> {
        match self {
            Self::Univar(c) => Some(c),
            Self::Bivar(_) => None,
        }
    }

    /// Bivariate criterion, if this is one
    #[must_use]
    pub fn as_bivar(&self) -> Option<&BivarCriterion> {
        match self {
            Self::Bivar(c) => Some(c),
            Self::Univar(_) => None,
        }
    }

    /// Number of experiments
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Univar(c) => c.len(),
            Self::Bivar(c) => c.len(),
        }
    }

    /// Always false; criteria never generate empty batches
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Change set of every experiment, in batch order
    #[must_use]
    pub fn generate_change_sets(&self) -> Vec<ChangeSet> {
        match self {
            Self::Univar(c) => c.generate_change_sets(),
            Self::Bivar(c) => c.generate_change_sets(),
        }
    }

    /// One directory name per experiment
    #[must_use]
    pub fn gen_exp_dirnames(&self, cfg: &CriteriaConfig) -> Vec<String> {
        match self {
            Self::Univar(c) => c.gen_exp_dirnames(cfg),
            Self::Bivar(c) => c.gen_exp_dirnames(cfg, Axis::All),
        }
    }

    /// Input directory of every experiment
    #[must_use]
    pub fn exp_input_dirs(&self, cfg: &CriteriaConfig) -> Vec<PathBuf> {
        let root = self.batch_input_root();
        self.gen_exp_dirnames(cfg)
            .into_iter()
            .map(|d| root.join(d))
            .collect()
    }

    /// X-axis values (rows for a bivariate criterion)
    ///
    /// # Errors
    /// Returns error if a name in `dirs` is not an experiment of this batch
    pub fn graph_xticks(
        &self,
        cfg: &CriteriaConfig,
        dirs: Option<&[String]>,
    ) -> CriteriaResult<Vec<f64>> {
        match self {
            Self::Univar(c) => c.graph_xticks(cfg, dirs),
            Self::Bivar(c) => c.graph_xticks(cfg, dirs),
        }
    }

    /// X-axis labels
    ///
    /// # Errors
    /// See [`Self::graph_xticks`]
    pub fn graph_xticklabels(
        &self,
        cfg: &CriteriaConfig,
        dirs: Option<&[String]>,
    ) -> CriteriaResult<Vec<String>> {
        match self {
            Self::Univar(c) => c.graph_xticklabels(cfg, dirs),
            Self::Bivar(c) => c.graph_xticklabels(cfg, dirs),
        }
    }

    /// X-axis title
    #[must_use]
    pub fn graph_xlabel(&self, cfg: &CriteriaConfig) -> String {
        match self {
            Self::Univar(c) => c.graph_xlabel(cfg),
            Self::Bivar(c) => c.graph_xlabel(cfg),
        }
    }

    /// Check if a performance measure is meaningful for this batch
    #[must_use]
    pub fn pm_query(&self, name: &str) -> bool {
        match self {
            Self::Univar(c) => c.pm_query(name),
            Self::Bivar(c) => c.pm_query(name),
        }
    }

    /// Robot count per experiment, where known
    #[must_use]
    pub fn swarm_sizes(&self) -> Vec<Option<usize>> {
        match self {
            Self::Univar(c) => c.swarm_sizes(),
            Self::Bivar(c) => c.swarm_sizes(),
        }
    }

    /// Scenario name of experiment `i` when arena dimensions vary
    #[must_use]
    pub fn exp_scenario_name(&self, i: usize) -> Option<String> {
        match self {
            Self::Univar(c) => c.exp_scenario_name(i),
            Self::Bivar(c) => c.exp_scenario_name(i),
        }
    }

    /// Directory experiment inputs are generated under
    #[must_use]
    pub fn batch_input_root(&self) -> &Path {
        match self {
            Self::Univar(c) => c.batch_input_root(),
            Self::Bivar(c) => c.batch_input_root(),
        }
    }

    /// Point the criterion at another batch
    ///
    /// Takes `&mut self`: a criterion cannot be shared across batches while
    /// being rebound.
    pub fn rebind_batch_input_root(&mut self, root: impl Into<PathBuf>) {
        match self {
            Self::Univar(c) => c.rebind_batch_input_root(root),
            Self::Bivar(c) => c.rebind_batch_input_root(root),
        }
    }

    /// Verify change sets, directory names and ticks line up
    ///
    /// # Errors
    /// Returns [`crate::CriteriaError::Precondition`] on any length mismatch
    pub fn check_consistency(&self, cfg: &CriteriaConfig) -> CriteriaResult<()> {
        match self {
            Self::Univar(c) => c.check_consistency(cfg),
            Self::Bivar(c) => c.check_consistency(cfg),
        }
    }
}
