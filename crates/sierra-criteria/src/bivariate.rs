//! Bivariate batch criterion
//!
//! Cartesian product of two univariate criteria. Cell `(row, col)` holds
//! `criterion1[row] ∪ criterion2[col]` and sits at index `row * N2 + col`.
//! Axis queries delegate to the child owning that axis.

use crate::config::CriteriaConfig;
use crate::error::{CriteriaError, CriteriaResult};
use crate::kinds::{applied_quantity, UnivarKind};
use crate::univariate::UnivarCriterion;
use sierra_changeset::ChangeSet;
use sierra_composition::{Cell, ConflictPolicy, UnionComposer};
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

/// Which names or values an axis query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Every cell
    #[default]
    All,
    /// First criterion (rows)
    X,
    /// Second criterion (columns)
    Y,
}

impl Display for Axis {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

const ROW_PREFIX: &str = "c1-";
const COL_PREFIX: &str = "c2-";

/// Joins the row and column parts of a bivariate directory name
pub const CELL_SEPARATOR: char = '+';

/// Two parameters varied together
#[derive(Debug, Clone, PartialEq)]
pub struct BivarCriterion {
    criterion1: UnivarCriterion,
    criterion2: UnivarCriterion,
    cells: Vec<Cell>,
}

impl BivarCriterion {
    /// Compose two univariate criteria
    ///
    /// # Errors
    /// Returns error if a cell conflicts under [`ConflictPolicy::Reject`]
    pub fn new(
        criterion1: UnivarCriterion,
        criterion2: UnivarCriterion,
        policy: ConflictPolicy,
    ) -> CriteriaResult<Self> {
        let cells = UnionComposer::new(policy).compose_grid(
            &criterion1.generate_change_sets(),
            &criterion2.generate_change_sets(),
        )?;
        tracing::debug!(
            rows = criterion1.len(),
            cols = criterion2.len(),
            %policy,
            "composed bivariate criterion"
        );

        Ok(Self {
            criterion1,
            criterion2,
            cells,
        })
    }

    /// Row criterion
    #[inline]
    #[must_use]
    pub fn criterion1(&self) -> &UnivarCriterion {
        &self.criterion1
    }

    /// Column criterion
    #[inline]
    #[must_use]
    pub fn criterion2(&self) -> &UnivarCriterion {
        &self.criterion2
    }

    /// Composed cells, row-major
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// `(rows, cols)`
    #[inline]
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.criterion1.len(), self.criterion2.len())
    }

    /// Number of experiments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; both children are non-empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of cell `(row, col)`
    #[must_use]
    pub fn cell_index(&self, row: usize, col: usize) -> Option<usize> {
        let (rows, cols) = self.shape();
        (row < rows && col < cols).then_some(row * cols + col)
    }

    /// Cell `(row, col)`
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cell_index(row, col).map(|i| &self.cells[i])
    }

    /// Directory experiment inputs are generated under
    #[inline]
    #[must_use]
    pub fn batch_input_root(&self) -> &Path {
        self.criterion1.batch_input_root()
    }

    /// Point both children at another batch
    pub fn rebind_batch_input_root(&mut self, root: impl Into<PathBuf>) {
        let root = root.into();
        self.criterion2.rebind_batch_input_root(root.clone());
        self.criterion1.rebind_batch_input_root(root);
    }

    /// Change set of every cell, row-major
    #[must_use]
    pub fn generate_change_sets(&self) -> Vec<ChangeSet> {
        self.cells.iter().map(|c| c.changes.clone()).collect()
    }

    /// Directory names: `c1-<A>+c2-<B>` per cell, or one axis' prefixed names
    #[must_use]
    pub fn gen_exp_dirnames(&self, cfg: &CriteriaConfig, axis: Axis) -> Vec<String> {
        let rows: Vec<String> = self
            .criterion1
            .gen_exp_dirnames(cfg)
            .into_iter()
            .map(|d| format!("{ROW_PREFIX}{d}"))
            .collect();
        let cols: Vec<String> = self
            .criterion2
            .gen_exp_dirnames(cfg)
            .into_iter()
            .map(|d| format!("{COL_PREFIX}{d}"))
            .collect();

        match axis {
            Axis::X => rows,
            Axis::Y => cols,
            Axis::All => self
                .cells
                .iter()
                .map(|c| format!("{}{CELL_SEPARATOR}{}", rows[c.row], cols[c.col]))
                .collect(),
        }
    }

    /// Strip the axis prefix from each of `dirs`
    fn child_dirs(dirs: Option<&[String]>, prefix: &str) -> CriteriaResult<Option<Vec<String>>> {
        dirs.map(|dirs| {
            dirs.iter()
                .map(|d| {
                    d.strip_prefix(prefix).map(str::to_string).ok_or_else(|| {
                        CriteriaError::precondition(format!(
                            "'{d}' is not a '{prefix}' directory name"
                        ))
                    })
                })
                .collect::<CriteriaResult<Vec<String>>>()
        })
        .transpose()
    }

    /// Row-axis values (delegates to the first criterion)
    ///
    /// # Errors
    /// Returns error if a name in `dirs` is not a `c1-` experiment name
    pub fn graph_xticks(
        &self,
        cfg: &CriteriaConfig,
        dirs: Option<&[String]>,
    ) -> CriteriaResult<Vec<f64>> {
        let dirs = Self::child_dirs(dirs, ROW_PREFIX)?;
        self.criterion1.graph_xticks(cfg, dirs.as_deref())
    }

    /// Column-axis values (delegates to the second criterion)
    ///
    /// # Errors
    /// Returns error if a name in `dirs` is not a `c2-` experiment name
    pub fn graph_yticks(
        &self,
        cfg: &CriteriaConfig,
        dirs: Option<&[String]>,
    ) -> CriteriaResult<Vec<f64>> {
        let dirs = Self::child_dirs(dirs, COL_PREFIX)?;
        self.criterion2.graph_xticks(cfg, dirs.as_deref())
    }

    /// Row-axis labels
    ///
    /// # Errors
    /// See [`Self::graph_xticks`]
    pub fn graph_xticklabels(
        &self,
        cfg: &CriteriaConfig,
        dirs: Option<&[String]>,
    ) -> CriteriaResult<Vec<String>> {
        let dirs = Self::child_dirs(dirs, ROW_PREFIX)?;
        self.criterion1.graph_xticklabels(cfg, dirs.as_deref())
    }

    /// Column-axis labels
    ///
    /// # Errors
    /// See [`Self::graph_yticks`]
    pub fn graph_yticklabels(
        &self,
        cfg: &CriteriaConfig,
        dirs: Option<&[String]>,
    ) -> CriteriaResult<Vec<String>> {
        let dirs = Self::child_dirs(dirs, COL_PREFIX)?;
        self.criterion2.graph_xticklabels(cfg, dirs.as_deref())
    }

    /// Row-axis title
    #[must_use]
    pub fn graph_xlabel(&self, cfg: &CriteriaConfig) -> String {
        self.criterion1.graph_xlabel(cfg)
    }

    /// Column-axis title
    #[must_use]
    pub fn graph_ylabel(&self, cfg: &CriteriaConfig) -> String {
        self.criterion2.graph_xlabel(cfg)
    }

    /// Check if either axis makes a performance measure meaningful
    #[must_use]
    pub fn pm_query(&self, name: &str) -> bool {
        self.criterion1.pm_query(name) || self.criterion2.pm_query(name)
    }

    /// Axis whose criterion varies swarm size, if any
    #[must_use]
    pub fn swarm_size_axis(&self) -> Option<Axis> {
        if self.criterion1.kind().varies_swarm_size() {
            Some(Axis::X)
        } else if self.criterion2.kind().varies_swarm_size() {
            Some(Axis::Y)
        } else {
            None
        }
    }

    /// Robot count per cell, as applied to the template
    ///
    /// When both axes fix a robot count the cell holds two quantity changes
    /// and the one applied last is reported, with a warning if it is not the
    /// count of the swarm-size axis.
    #[must_use]
    pub fn swarm_sizes(&self) -> Vec<Option<usize>> {
        let rows = self.criterion1.swarm_sizes();
        let cols = self.criterion2.swarm_sizes();
        let col_first = self.swarm_size_axis() == Some(Axis::Y);
        self.cells
            .iter()
            .map(|c| {
                let declared = if col_first {
                    cols[c.col].or(rows[c.row])
                } else {
                    rows[c.row].or(cols[c.col])
                };
                match (declared, applied_quantity(&c.changes)) {
                    (Some(declared), Some(applied)) if declared != applied => {
                        tracing::warn!(
                            row = c.row,
                            col = c.col,
                            declared,
                            applied,
                            "cell applies a different swarm size than its axis"
                        );
                        Some(applied)
                    }
                    (declared, applied) => applied.or(declared),
                }
            })
            .collect()
    }

    /// Scenario name of cell `index` when one axis is constant density
    #[must_use]
    pub fn exp_scenario_name(&self, index: usize) -> Option<String> {
        let cell = self.cells.get(index)?;
        if matches!(self.criterion1.kind(), UnivarKind::ConstantDensity(_)) {
            self.criterion1.exp_scenario_name(cell.row)
        } else if matches!(self.criterion2.kind(), UnivarKind::ConstantDensity(_)) {
            self.criterion2.exp_scenario_name(cell.col)
        } else {
            None
        }
    }

    /// Verify cells, directory names and axis ticks line up
    ///
    /// # Errors
    /// Returns [`CriteriaError::Precondition`] on any length mismatch
    pub fn check_consistency(&self, cfg: &CriteriaConfig) -> CriteriaResult<()> {
        self.criterion1.check_consistency(cfg)?;
        self.criterion2.check_consistency(cfg)?;

        let (rows, cols) = self.shape();
        let dirs = self.gen_exp_dirnames(cfg, Axis::All).len();
        let xticks = self.graph_xticks(cfg, None)?.len();
        let yticks = self.graph_yticks(cfg, None)?.len();
        if self.cells.len() == rows * cols && dirs == self.cells.len() && xticks * yticks == dirs
        {
            Ok(())
        } else {
            Err(CriteriaError::precondition(format!(
                "bivariate batch: {} cells, {dirs} directories, {xticks}x{yticks} ticks",
                self.cells.len()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pm;
    use pretty_assertions::assert_eq;
    use sierra_changeset::{apply_changes, Element, ElementPath, ElementTree, TemplateEditor};

    fn univar(token: &str) -> UnivarCriterion {
        let cfg = CriteriaConfig::default().with_scenario("SS.16x8");
        UnivarCriterion::new(token, &cfg, "/tmp/batch").unwrap()
    }

    fn bivar(t1: &str, t2: &str) -> BivarCriterion {
        BivarCriterion::new(univar(t1), univar(t2), ConflictPolicy::Retain).unwrap()
    }

    #[test]
    fn swarm_size_by_block_quantity() {
        let cfg = CriteriaConfig::default();
        let b = bivar("swarm_size.Log4", "block_quantity.CLog64");

        assert_eq!(b.shape(), (3, 7));
        assert_eq!(b.generate_change_sets().len(), 21);
        assert_eq!(b.gen_exp_dirnames(&cfg, Axis::X).len(), 3);
        assert_eq!(b.gen_exp_dirnames(&cfg, Axis::Y).len(), 7);
        assert_eq!(b.gen_exp_dirnames(&cfg, Axis::All)[8], "c1-exp1+c2-exp1");
        b.check_consistency(&cfg).unwrap();
    }

    #[test]
    fn cells_are_unions_of_children() {
        let b = bivar("swarm_size.Log4", "block_quantity.RLinear10");
        let rows = b.criterion1().generate_change_sets();
        let cols = b.criterion2().generate_change_sets();
        let sets = b.generate_change_sets();
        for i in 0..rows.len() {
            for j in 0..cols.len() {
                assert_eq!(sets[i * cols.len() + j], rows[i].union(&cols[j]));
                assert_eq!(b.cell(i, j).map(|c| (c.row, c.col)), Some((i, j)));
            }
        }
        assert_eq!(b.cell_index(3, 0), None);
    }

    #[test]
    fn axis_queries_delegate() {
        let cfg = CriteriaConfig::default();
        let b = bivar("block_quantity.CLog8", "swarm_size.Log4");

        assert_eq!(b.graph_xticks(&cfg, None).unwrap(), vec![1.0, 2.0, 4.0, 8.0]);
        assert_eq!(b.graph_yticks(&cfg, None).unwrap(), vec![1.0, 2.0, 4.0]);
        let dirs = vec!["c2-exp2".to_string()];
        assert_eq!(b.graph_yticks(&cfg, Some(&dirs)).unwrap(), vec![4.0]);
        assert!(b.graph_xticks(&cfg, Some(&dirs)).is_err());

        assert_eq!(b.graph_xlabel(&cfg), "Cube Block Quantity");
        assert_eq!(b.graph_ylabel(&cfg), "Swarm Size");
        assert!(b.pm_query(pm::SCALABILITY));
        assert!(!b.pm_query(pm::REACTIVITY));
    }

    #[test]
    fn swarm_size_owner_is_recovered() {
        let b = bivar("block_quantity.CLog8", "swarm_size.Log4");
        assert_eq!(b.swarm_size_axis(), Some(Axis::Y));
        let sizes = b.swarm_sizes();
        assert_eq!(&sizes[..3], &[Some(1), Some(2), Some(4)]);

        let none = bivar("oracle.tasks", "ta_policy_set.All");
        assert_eq!(none.swarm_size_axis(), None);
        assert!(none.swarm_sizes().iter().all(Option::is_none));
    }

    #[test]
    fn reported_swarm_size_is_the_applied_one() {
        let b = bivar("block_quantity.CLog8.Z32", "swarm_size.Log4");
        let entity = ElementPath::descendant(&["arena", "distribute", "entity"]);
        let template = ElementTree::new(
            Element::new("argos-configuration").with_child(
                Element::new("arena").with_child(
                    Element::new("distribute")
                        .with_child(Element::new("entity").with_attr("quantity", "0")),
                ),
            ),
        );

        for (cell, size) in b.cells().iter().zip(b.swarm_sizes()) {
            let mut tree = template.clone();
            apply_changes(&mut tree, &cell.changes).unwrap();
            let applied = tree.attr_get(&entity, "quantity").unwrap();
            assert_eq!(size, Some(applied.parse().unwrap()), "cell {cell:?}");
        }
        // "32" sorts after "1" and "2" but before "4"
        assert_eq!(&b.swarm_sizes()[..3], &[Some(32), Some(32), Some(4)]);
    }

    #[test]
    fn named_cells_split_back_into_axes() {
        let cfg = CriteriaConfig::default().with_named_exp_dirs(true);
        let b = bivar("oracle.entities", "swarm_size.Log4");
        b.check_consistency(&cfg).unwrap();

        let rows = b.gen_exp_dirnames(&cfg, Axis::X);
        let cols = b.gen_exp_dirnames(&cfg, Axis::Y);
        assert_eq!(rows[3], "c1-caches-blocks");
        for (cell, name) in b.cells().iter().zip(b.gen_exp_dirnames(&cfg, Axis::All)) {
            let parts: Vec<&str> = name.split(CELL_SEPARATOR).collect();
            assert_eq!(parts, vec![rows[cell.row].as_str(), cols[cell.col].as_str()]);
        }
    }

    #[test]
    fn scenario_names_follow_density_axis() {
        let b = bivar("ta_policy_set.All", "swarm_density.CD1p0.I16.C3");
        // cell 4 = row 1, col 1
        assert_eq!(b.exp_scenario_name(4).as_deref(), Some("SS.32x16"));
        assert_eq!(b.exp_scenario_name(99), None);
        assert_eq!(bivar("swarm_size.Log4", "oracle.tasks").exp_scenario_name(0), None);
    }

    #[test]
    fn conflicting_cells_rejected_when_strict() {
        let result = BivarCriterion::new(
            univar("block_quantity.CLog8.Z32"),
            univar("swarm_size.Log4"),
            ConflictPolicy::Reject,
        );
        assert!(matches!(result, Err(CriteriaError::Composition(_))));
    }

    #[test]
    fn rebinding_updates_both_children() {
        let mut b = bivar("swarm_size.Log4", "oracle.tasks");
        b.rebind_batch_input_root("/tmp/elsewhere");
        assert_eq!(b.criterion1().batch_input_root(), Path::new("/tmp/elsewhere"));
        assert_eq!(b.criterion2().batch_input_root(), Path::new("/tmp/elsewhere"));
    }
}
