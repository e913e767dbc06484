//! Scalability and self-organization measures
//!
//! All functions take per-experiment series in batch order. `sizes` holds the
//! swarm size of each experiment; the first experiment is the baseline `N0`.
//!
//! | Measure | Defined for | Degenerate cases |
//! |---|---|---|
//! | projective performance | `i >= 1` | expected `0` → `1.0` if observed is `0`, else `+inf` |
//! | fractional losses | all `i`, `fl[0] = 0` | `perf(N) = 0` → `1.0` |
//! | Karp-Flatt | `i >= 1` | speedup `0` → `+inf`; `N_i <= N_0` → `NaN` |
//! | self-organization | all `i`, `so[0] = 0` | none |

use crate::error::{check_len, check_min, MeasureError};
use serde::{Deserialize, Serialize};

/// Direction of a projective-performance comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Expect performance to grow with the axis value
    Positive,

    /// Expect performance to shrink with the axis value
    Negative,
}

impl Projection {
    /// Ratio of adjacent axis values used to project the previous observation
    #[inline]
    #[must_use]
    pub fn similarity(self, prev_tick: f64, tick: f64) -> f64 {
        match self {
            Self::Positive => tick / prev_tick,
            Self::Negative => prev_tick / tick,
        }
    }
}

/// Observed over projected performance for each experiment after the first
///
/// Entry `k` belongs to experiment `k + 1`:
/// `perf[i] / (perf[i-1] * similarity(x[i-1], x[i]))`.
///
/// # Errors
/// Returns error if the series differ in length or hold fewer than two experiments
pub fn projective_performance(
    perf: &[f64],
    ticks: &[f64],
    projection: Projection,
) -> Result<Vec<f64>, MeasureError> {
    check_len("projective performance ticks", perf.len(), ticks.len())?;
    check_min("projective performance", 2, perf.len())?;

    Ok((1..perf.len())
        .map(|i| {
            let expected = perf[i - 1] * projection.similarity(ticks[i - 1], ticks[i]);
            if expected == 0.0 {
                if perf[i] == 0.0 {
                    1.0
                } else {
                    f64::INFINITY
                }
            } else {
                perf[i] / expected
            }
        })
        .collect())
}

/// Performance lost to inter-robot interference, per experiment
///
/// `plost(N0) = perf(N0) * tlost(N0)` and, for larger swarms,
/// `plost(N) = perf(N) * (tlost(N) - (N / N0) * tlost(N0)) / N`.
/// With zero baseline performance every non-baseline loss is `+inf`.
///
/// # Errors
/// Returns error on length mismatch, empty input or a zero swarm size
pub fn performance_losses(
    perf: &[f64],
    tlost: &[f64],
    sizes: &[usize],
) -> Result<Vec<f64>, MeasureError> {
    check_len("interference", perf.len(), tlost.len())?;
    check_len("swarm sizes", perf.len(), sizes.len())?;
    check_min("performance losses", 1, perf.len())?;
    if sizes.contains(&0) {
        return Err(MeasureError::InvalidInput("swarm size of 0".to_string()));
    }

    let n0 = sizes[0] as f64;
    let baseline = perf[0] * tlost[0];

    Ok((0..perf.len())
        .map(|i| {
            if i == 0 {
                baseline
            } else if perf[0] == 0.0 {
                f64::INFINITY
            } else {
                let n = sizes[i] as f64;
                perf[i] * (tlost[i] - (n / n0) * tlost[0]) / n
            }
        })
        .collect())
}

/// Fraction of performance lost to interference
///
/// `fl[0] = 0` by definition; `fl(N) = plost(N) / perf(N)`, clamped to `1.0`
/// when `perf(N) == 0`.
///
/// # Errors
/// See [`performance_losses`]
pub fn fractional_losses(
    perf: &[f64],
    tlost: &[f64],
    sizes: &[usize],
) -> Result<Vec<f64>, MeasureError> {
    let plost = performance_losses(perf, tlost, sizes)?;

    Ok(plost
        .iter()
        .zip(perf)
        .enumerate()
        .map(|(i, (&lost, &p))| {
            if i == 0 {
                0.0
            } else if p == 0.0 {
                1.0
            } else {
                lost / p
            }
        })
        .collect())
}

/// Karp-Flatt serial fraction for each experiment after the first
///
/// Speedup `X = perf[i] / perf[0]`, relative size `n = N_i / N_0`,
/// `Y = (1/X - 1/n) / (1 - 1/n)`. Entry `k` belongs to experiment `k + 1`.
/// The fraction is undefined unless the swarm grew, so an experiment with
/// `N_i <= N_0` gets `NaN`.
///
/// # Errors
/// Returns error on length mismatch or fewer than two experiments
pub fn karp_flatt(perf: &[f64], sizes: &[usize]) -> Result<Vec<f64>, MeasureError> {
    check_len("swarm sizes", perf.len(), sizes.len())?;
    check_min("karp-flatt", 2, perf.len())?;

    let n0 = sizes[0] as f64;
    Ok((1..perf.len())
        .map(|i| {
            let n = sizes[i] as f64 / n0;
            if n <= 1.0 || !n.is_finite() {
                return f64::NAN;
            }
            let speedup = if perf[0] == 0.0 {
                0.0
            } else {
                perf[i] / perf[0]
            };
            if speedup == 0.0 {
                return f64::INFINITY;
            }
            (1.0 / speedup - 1.0 / n) / (1.0 - 1.0 / n)
        })
        .collect())
}

/// Emergent self-organization from fractional losses
///
/// `theta_i = fl[i] - (N_i / N_{i-1}) * fl[i-1]`, `so_i = 1 - exp(-theta_i)`,
/// and `so_0 = 0` (a single swarm size has nothing to compare against).
///
/// # Errors
/// Returns error on length mismatch, empty input or a zero swarm size
pub fn self_organization(fl: &[f64], sizes: &[usize]) -> Result<Vec<f64>, MeasureError> {
    check_len("swarm sizes", fl.len(), sizes.len())?;
    check_min("self-organization", 1, fl.len())?;
    if sizes.contains(&0) {
        return Err(MeasureError::InvalidInput("swarm size of 0".to_string()));
    }

    Ok((0..fl.len())
        .map(|i| {
            if i == 0 {
                0.0
            } else {
                let ratio = sizes[i] as f64 / sizes[i - 1] as f64;
                let theta = fl[i] - ratio * fl[i - 1];
                1.0 - (-theta).exp()
            }
        })
        .collect())
}
