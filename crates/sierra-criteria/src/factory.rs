//! Criterion factory
//!
//! One token builds a univariate criterion, two build a bivariate one.

use crate::bivariate::BivarCriterion;
use crate::config::CriteriaConfig;
use crate::criterion::Criterion;
use crate::error::{CriteriaError, CriteriaResult};
use crate::univariate::UnivarCriterion;
use std::path::Path;

/// Build a criterion from command-line tokens
///
/// # Errors
/// Returns error if there are not one or two tokens, the two tokens are
/// identical, any token fails to parse, or the result is inconsistent
pub fn build<S: AsRef<str>>(
    tokens: &[S],
    cfg: &CriteriaConfig,
    batch_input_root: &Path,
) -> CriteriaResult<Criterion> {
    let criterion = match tokens {
        [token] => Criterion::Univar(UnivarCriterion::new(
            token.as_ref(),
            cfg,
            batch_input_root,
        )?),
        [t1, t2] => {
            let (t1, t2) = (t1.as_ref(), t2.as_ref());
            if t1 == t2 {
                return Err(CriteriaError::precondition(format!(
                    "bivariate criteria need two different tokens, got '{t1}' twice"
                )));
            }
            let c1 = UnivarCriterion::new(t1, cfg, batch_input_root)?;
            let c2 = UnivarCriterion::new(t2, cfg, batch_input_root)?;
            Criterion::Bivar(BivarCriterion::new(c1, c2, cfg.conflict_policy)?)
        }
        _ => {
            return Err(CriteriaError::precondition(format!(
                "expected one or two batch criteria, got {}",
                tokens.len()
            )))
        }
    };

    criterion.check_consistency(cfg)?;
    tracing::info!(
        tokens = ?criterion.cli_tokens(),
        experiments = criterion.len(),
        root = %batch_input_root.display(),
        "built batch criterion"
    );
    Ok(criterion)
}
