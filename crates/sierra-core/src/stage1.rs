//! Stage 1: batch scaffolding
//!
//! Creates one input directory per experiment and persists the change set
//! that experiment applies to the template. A bivariate experiment stores
//! one record per criterion; readers recover the cell by union.

use crate::config::SierraConfig;
use crate::error::{SierraError, SierraResult};
use sierra_changeset::persist::{self, EXP_DEF_FILENAME};
use sierra_changeset::{apply_changes, ChangeSet, TemplateEditor};
use sierra_criteria::Criterion;
use std::path::{Path, PathBuf};

/// Records persisted for each experiment of `criterion`, in batch order
#[must_use]
pub fn exp_records(criterion: &Criterion) -> Vec<Vec<ChangeSet>> {
    match criterion {
        Criterion::Univar(c) => c
            .defs()
            .iter()
            .map(|d| vec![d.changes.clone()])
            .collect(),
        Criterion::Bivar(c) => {
            let rows = c.criterion1().defs();
            let cols = c.criterion2().defs();
            c.cells()
                .iter()
                .map(|cell| vec![rows[cell.row].changes.clone(), cols[cell.col].changes.clone()])
                .collect()
        }
    }
}

/// Create experiment directories under the criterion's input root
///
/// Idempotent: existing directories are reused and their definitions
/// overwritten. The criterion is checked against `cfg` first, so two
/// experiments can never share a directory.
///
/// # Errors
/// Returns error if the criterion is inconsistent under `cfg`, or if a
/// directory or definition cannot be written
pub fn scaffold_batch(criterion: &Criterion, cfg: &SierraConfig) -> SierraResult<Vec<PathBuf>> {
    let ccfg = cfg.criteria();
    criterion.check_consistency(&ccfg)?;
    let dirs = criterion.exp_input_dirs(&ccfg);
    let records = exp_records(criterion);

    for (dir, recs) in dirs.iter().zip(&records) {
        std::fs::create_dir_all(dir).map_err(|e| SierraError::io(dir, e))?;
        persist::write_records(&dir.join(EXP_DEF_FILENAME), recs)?;
        tracing::debug!(dir = %dir.display(), records = recs.len(), "scaffolded experiment");
    }

    tracing::info!(
        root = %criterion.batch_input_root().display(),
        experiments = dirs.len(),
        "scaffolded batch"
    );
    Ok(dirs)
}

/// Effective change set of a scaffolded experiment
///
/// # Errors
/// Returns error if the definition is absent or corrupt
pub fn load_exp_def(exp_dir: &Path) -> SierraResult<ChangeSet> {
    let path = exp_dir.join(EXP_DEF_FILENAME);
    if !path.exists() {
        return Err(SierraError::MissingInput { path });
    }
    Ok(persist::read_union(&path)?)
}

/// Apply a scaffolded experiment's definition to a template
///
/// Returns the number of edits made.
///
/// # Errors
/// Returns error if the definition cannot be loaded or a change targets an
/// element the template lacks
pub fn apply_exp_def<E: TemplateEditor + ?Sized>(
    exp_dir: &Path,
    editor: &mut E,
) -> SierraResult<usize> {
    let changes = load_exp_def(exp_dir)?;
    let applied = apply_changes(editor, &changes)?;
    tracing::debug!(dir = %exp_dir.display(), applied, "applied experiment definition");
    Ok(applied)
}
