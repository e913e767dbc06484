//! Reactivity and adaptability under temporal variance
//!
//! Both measures compare an observed performance curve against an ideal
//! curve derived from how much the environment deviated from the baseline
//! experiment. The ratio `r(t) = (1 + v0(t)) / (1 + vi(t))` is above `1`
//! when experiment `i` saw a more favourable environment than the baseline.

use crate::curve::{from_series, SimilarityMethod};
use crate::error::{check_len, check_min, MeasureError};
use serde::{Deserialize, Serialize};

/// Which ideal response the observed curve is scored against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdealCurveKind {
    /// Exploit favourable conditions proportionally
    Reactivity,

    /// Resist unfavourable conditions by holding baseline performance
    Adaptability,
}

impl IdealCurveKind {
    /// Measure name, as used for output files and `pm_query`
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Reactivity => "reactivity",
            Self::Adaptability => "adaptability",
        }
    }
}

/// Ideal performance curve for experiment `i`
///
/// # Errors
/// Returns error if the four series differ in length
pub fn ideal_curve(
    kind: IdealCurveKind,
    perf_exp: &[f64],
    perf_base: &[f64],
    var_exp: &[f64],
    var_base: &[f64],
) -> Result<Vec<f64>, MeasureError> {
    let n = perf_exp.len();
    check_len("baseline performance", n, perf_base.len())?;
    check_len("experiment variance", n, var_exp.len())?;
    check_len("baseline variance", n, var_base.len())?;

    Ok((0..n)
        .map(|t| {
            let ratio = (1.0 + var_base[t]) / (1.0 + var_exp[t]);
            let favourable = ratio > 1.0;
            match (kind, favourable) {
                (IdealCurveKind::Reactivity, true) => perf_exp[t] * ratio,
                (IdealCurveKind::Reactivity, false) | (IdealCurveKind::Adaptability, true) => {
                    perf_exp[t]
                }
                (IdealCurveKind::Adaptability, false) => perf_exp[t].max(perf_base[t]),
            }
        })
        .collect())
}

/// Distance between the ideal and observed curves of experiment `i`
///
/// Lower is better; an experiment that tracks its ideal exactly scores `0`.
///
/// # Errors
/// Returns error if the series differ in length or are empty
pub fn curve_similarity(
    kind: IdealCurveKind,
    method: SimilarityMethod,
    perf_exp: &[f64],
    perf_base: &[f64],
    var_exp: &[f64],
    var_base: &[f64],
) -> Result<f64, MeasureError> {
    check_min(kind.name(), 1, perf_exp.len())?;
    let ideal = ideal_curve(kind, perf_exp, perf_base, var_exp, var_base)?;
    method.distance(&from_series(&ideal), &from_series(perf_exp))
}
