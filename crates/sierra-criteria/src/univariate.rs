//! Univariate batch criterion
//!
//! Owns the ordered experiment definitions of one criterion kind and answers
//! every naming and axis query from them.

use crate::bivariate::CELL_SEPARATOR;
use crate::config::CriteriaConfig;
use crate::def::ExpDef;
use crate::error::{CriteriaError, CriteriaResult};
use crate::kinds::UnivarKind;
use sierra_changeset::ChangeSet;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// One parameter varied across a batch
#[derive(Debug, Clone, PartialEq)]
pub struct UnivarCriterion {
    cli_token: String,
    kind: UnivarKind,
    defs: Vec<ExpDef>,
    batch_input_root: PathBuf,
}

impl UnivarCriterion {
    /// Parse `token` and generate its experiments
    ///
    /// # Errors
    /// Returns error if the token is malformed or its combination unsupported
    pub fn new(
        token: &str,
        cfg: &CriteriaConfig,
        batch_input_root: impl Into<PathBuf>,
    ) -> CriteriaResult<Self> {
        let kind = UnivarKind::parse(token, cfg)?;
        let defs = kind.expand(cfg)?;
        if defs.is_empty() {
            return Err(CriteriaError::precondition(format!(
                "criterion '{token}' generated no experiments"
            )));
        }
        tracing::debug!(token, experiments = defs.len(), "expanded univariate criterion");

        Ok(Self {
            cli_token: token.to_string(),
            kind,
            defs,
            batch_input_root: batch_input_root.into(),
        })
    }

    /// Token the criterion was built from
    #[inline]
    #[must_use]
    pub fn cli_token(&self) -> &str {
        &self.cli_token
    }

    /// Parsed attributes
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &UnivarKind {
        &self.kind
    }

    /// Experiment definitions in batch order
    #[inline]
    #[must_use]
    pub fn defs(&self) -> &[ExpDef] {
        &self.defs
    }

    /// Number of experiments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Always false; construction rejects empty batches
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Directory experiment inputs are generated under
    #[inline]
    #[must_use]
    pub fn batch_input_root(&self) -> &Path {
        &self.batch_input_root
    }

    /// Point the criterion at another batch
    pub fn rebind_batch_input_root(&mut self, root: impl Into<PathBuf>) {
        self.batch_input_root = root.into();
    }

    /// Change set of every experiment, in batch order
    #[must_use]
    pub fn generate_change_sets(&self) -> Vec<ChangeSet> {
        self.defs.iter().map(|d| d.changes.clone()).collect()
    }

    /// One directory name per experiment
    #[must_use]
    pub fn gen_exp_dirnames(&self, cfg: &CriteriaConfig) -> Vec<String> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, d)| {
                if cfg.named_exp_dirs {
                    d.label.slug.clone()
                } else {
                    format!("exp{i}")
                }
            })
            .collect()
    }

    /// Indices of `dirs` in batch order, or every index
    fn select(&self, cfg: &CriteriaConfig, dirs: Option<&[String]>) -> CriteriaResult<Vec<usize>> {
        let Some(dirs) = dirs else {
            return Ok((0..self.defs.len()).collect());
        };
        let names = self.gen_exp_dirnames(cfg);
        dirs.iter()
            .map(|dir| {
                names.iter().position(|n| n == dir).ok_or_else(|| {
                    CriteriaError::precondition(format!(
                        "'{dir}' is not an experiment of '{}'",
                        self.cli_token
                    ))
                })
            })
            .collect()
    }

    /// Axis values for every experiment, or for the named subset
    ///
    /// # Errors
    /// Returns error if a name in `dirs` is not an experiment of this batch
    pub fn graph_xticks(
        &self,
        cfg: &CriteriaConfig,
        dirs: Option<&[String]>,
    ) -> CriteriaResult<Vec<f64>> {
        let indices = self.select(cfg, dirs)?;
        let ticks = self.kind.ticks(cfg, &self.defs)?;
        Ok(indices.into_iter().map(|i| ticks[i]).collect())
    }

    /// Axis labels matching [`Self::graph_xticks`]
    ///
    /// # Errors
    /// See [`Self::graph_xticks`]
    pub fn graph_xticklabels(
        &self,
        cfg: &CriteriaConfig,
        dirs: Option<&[String]>,
    ) -> CriteriaResult<Vec<String>> {
        if self.kind.is_categorical() {
            let indices = self.select(cfg, dirs)?;
            return Ok(indices
                .into_iter()
                .map(|i| self.defs[i].label.tick_label.clone())
                .collect());
        }
        Ok(self
            .graph_xticks(cfg, dirs)?
            .into_iter()
            .map(|t| t.to_string())
            .collect())
    }

    /// Axis title
    #[must_use]
    pub fn graph_xlabel(&self, cfg: &CriteriaConfig) -> String {
        match self.kind {
            UnivarKind::TemporalVariance(_) => {
                format!("{} ({})", self.kind.xlabel(), cfg.similarity)
            }
            _ => self.kind.xlabel().to_string(),
        }
    }

    /// Check if a performance measure is meaningful for this criterion
    #[must_use]
    pub fn pm_query(&self, name: &str) -> bool {
        self.kind.measures().iter().any(|m| *m == name)
    }

    /// Robot count per experiment, where the criterion fixes it
    #[must_use]
    pub fn swarm_sizes(&self) -> Vec<Option<usize>> {
        self.defs.iter().map(|d| d.swarm_size).collect()
    }

    /// `<dist>.<x>x<y>` of experiment `i` for constant-density criteria
    #[must_use]
    pub fn exp_scenario_name(&self, i: usize) -> Option<String> {
        match &self.kind {
            UnivarKind::ConstantDensity(k) if i < self.defs.len() => Some(k.exp_scenario_name(i)),
            _ => None,
        }
    }

    /// Verify change sets, directory names and ticks line up
    ///
    /// Directory names must also be distinct and free of the bivariate cell
    /// separator, otherwise scaffolding would write two experiments into one
    /// directory or produce names that cannot be split back into their axes.
    ///
    /// # Errors
    /// Returns [`CriteriaError::Precondition`] on a length mismatch, a
    /// repeated directory name or a name containing [`CELL_SEPARATOR`]
    pub fn check_consistency(&self, cfg: &CriteriaConfig) -> CriteriaResult<()> {
        let names = self.gen_exp_dirnames(cfg);
        let sets = self.defs.len();
        let dirs = names.len();
        let ticks = self.graph_xticks(cfg, None)?.len();
        if sets != dirs || dirs != ticks {
            return Err(CriteriaError::precondition(format!(
                "'{}': {sets} change sets, {dirs} directories, {ticks} ticks",
                self.cli_token
            )));
        }

        let mut seen = BTreeSet::new();
        for name in &names {
            if name.contains(CELL_SEPARATOR) {
                return Err(CriteriaError::precondition(format!(
                    "'{}': directory name '{name}' contains '{CELL_SEPARATOR}'",
                    self.cli_token
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(CriteriaError::precondition(format!(
                    "'{}': directory name '{name}' is used by more than one experiment",
                    self.cli_token
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pm;
    use pretty_assertions::assert_eq;

    fn crit(token: &str) -> UnivarCriterion {
        let cfg = CriteriaConfig::default().with_scenario("SS.16x8");
        UnivarCriterion::new(token, &cfg, "/tmp/batch/exp-inputs").unwrap()
    }

    #[test]
    fn swarm_size_log8_end_to_end() {
        let cfg = CriteriaConfig::default();
        let c = crit("swarm_size.Log8");

        assert_eq!(c.generate_change_sets().len(), 4);
        assert_eq!(c.gen_exp_dirnames(&cfg), vec!["exp0", "exp1", "exp2", "exp3"]);
        assert_eq!(c.graph_xticks(&cfg, None).unwrap(), vec![1.0, 2.0, 4.0, 8.0]);
        assert_eq!(c.graph_xticklabels(&cfg, None).unwrap(), vec!["1", "2", "4", "8"]);
        assert_eq!(c.graph_xlabel(&cfg), "Swarm Size");
        assert_eq!(c.swarm_sizes(), vec![Some(1), Some(2), Some(4), Some(8)]);
    }

    #[test]
    fn named_exp_dirs_use_slugs() {
        let cfg = CriteriaConfig::default().with_named_exp_dirs(true);
        let c = crit("ta_policy_set.All");
        assert_eq!(c.gen_exp_dirnames(&cfg)[4], "UCB1");
    }

    #[test]
    fn ticks_for_subset() {
        let cfg = CriteriaConfig::default();
        let c = crit("swarm_size.Log8");
        let dirs = vec!["exp3".to_string(), "exp1".to_string()];
        assert_eq!(c.graph_xticks(&cfg, Some(&dirs)).unwrap(), vec![8.0, 2.0]);

        let unknown = vec!["exp9".to_string()];
        assert!(matches!(
            c.graph_xticks(&cfg, Some(&unknown)),
            Err(CriteriaError::Precondition(_))
        ));
    }

    #[test]
    fn categorical_labels() {
        let cfg = CriteriaConfig::default();
        let c = crit("oracle.entities");
        assert_eq!(c.graph_xticks(&cfg, None).unwrap(), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(c.graph_xticklabels(&cfg, None).unwrap()[3], "caches+blocks");
    }

    #[test]
    fn temporal_variance_xlabel_names_metric() {
        let cfg = CriteriaConfig::default();
        let c = crit("temporal_variance.BCSine");
        assert_eq!(
            c.graph_xlabel(&cfg),
            "Block Carry Throttle Distance From Ideal (dtw)"
        );
        assert!(c.pm_query(pm::REACTIVITY));
        assert!(!c.pm_query(pm::SCALABILITY));
    }

    #[test]
    fn scenario_names_only_for_density() {
        assert_eq!(
            crit("swarm_density.CD1p0.I16").exp_scenario_name(1).as_deref(),
            Some("SS.32x16")
        );
        assert_eq!(crit("swarm_size.Log8").exp_scenario_name(1), None);
    }

    #[test]
    fn every_kind_is_consistent() {
        let cfg = CriteriaConfig::default().with_scenario("SS.16x8");
        for token in [
            "swarm_size.Linear100",
            "block_quantity.RLog16.Z4",
            "swarm_density.CD2p0.I8.C4",
            "temporal_variance.MStepD",
            "oracle.all",
            "ta_policy_set.random",
            "block_motion_dynamics.C3.F1p0.RW0p1",
        ] {
            crit(token).check_consistency(&cfg).unwrap();
        }
    }

    #[test]
    fn named_dirs_are_consistent_for_every_kind() {
        let cfg = CriteriaConfig::default()
            .with_scenario("SS.16x8")
            .with_named_exp_dirs(true);
        for token in [
            "swarm_size.Log64",
            "block_quantity.CLinear50",
            "swarm_density.CD1p0.I1.C4",
            "temporal_variance.BMSine",
            "oracle.all",
            "ta_policy_set.All",
            "block_motion_dynamics.C5.F1p0.RW0p05",
        ] {
            crit(token).check_consistency(&cfg).unwrap();
        }
    }

    #[test]
    fn repeated_directory_names_are_rejected() {
        let cfg = CriteriaConfig::default().with_named_exp_dirs(true);
        let mut c = crit("ta_policy_set.All");
        c.defs[2].label.slug = c.defs[1].label.slug.clone();
        let err = c.check_consistency(&cfg).unwrap_err();
        assert!(err.to_string().contains("more than one experiment"), "{err}");

        // indexed names stay distinct whatever the slugs are
        c.check_consistency(&CriteriaConfig::default()).unwrap();
    }

    #[test]
    fn separator_in_directory_name_is_rejected() {
        let cfg = CriteriaConfig::default().with_named_exp_dirs(true);
        let mut c = crit("ta_policy_set.All");
        c.defs[0].label.slug = "a+b".to_string();
        assert!(matches!(
            c.check_consistency(&cfg),
            Err(CriteriaError::Precondition(_))
        ));
    }

    #[test]
    fn rebinding_changes_only_the_root() {
        let mut c = crit("swarm_size.Log8");
        let sets = c.generate_change_sets();
        c.rebind_batch_input_root("/tmp/other");
        assert_eq!(c.batch_input_root(), Path::new("/tmp/other"));
        assert_eq!(c.generate_change_sets(), sets);
    }
}
