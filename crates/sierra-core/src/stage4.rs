//! Stage 4: performance measures
//!
//! Reads collated tables, evaluates every measure the criterion supports
//! and writes one derived table per output under the measures directory.
//!
//! A univariate batch is a single line of experiments. A bivariate batch
//! is cut into lines along the axis a measure is defined over: the swarm
//! size axis for scalability and self-organization, the temporal-variance
//! axis for reactivity and adaptability. Results are written as a grid with
//! rows from the first criterion and columns from the second.

use crate::config::SierraConfig;
use crate::error::{SierraError, SierraResult};
use crate::paths::BatchPaths;
use crate::table::{stddev_path, CollatedTable, SummaryGrid};
use sierra_criteria::{pm, Axis, BivarCriterion, Criterion, CriteriaConfig, UnivarKind};
use sierra_measures::{
    curve_similarity, fractional_losses, karp_flatt, projective_performance, self_organization,
    IdealCurveKind, Projection,
};
use std::path::PathBuf;

/// One derived table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    BlocksCollected,
    Projective(Projection),
    FractionalLosses,
    KarpFlatt,
    SelfOrg,
    Similarity(IdealCurveKind),
}

impl Output {
    const ALL: [(&'static str, Self); 8] = [
        (pm::BLOCKS_COLLECTED, Self::BlocksCollected),
        (pm::SCALABILITY, Self::Projective(Projection::Positive)),
        (pm::SCALABILITY, Self::Projective(Projection::Negative)),
        (pm::SCALABILITY, Self::FractionalLosses),
        (pm::SCALABILITY, Self::KarpFlatt),
        (pm::SELF_ORG, Self::SelfOrg),
        (pm::REACTIVITY, Self::Similarity(IdealCurveKind::Reactivity)),
        (pm::ADAPTABILITY, Self::Similarity(IdealCurveKind::Adaptability)),
    ];

    fn stem(self) -> &'static str {
        match self {
            Self::BlocksCollected => "pm-blocks-collected",
            Self::Projective(Projection::Positive) => "pm-projective-positive",
            Self::Projective(Projection::Negative) => "pm-projective-negative",
            Self::FractionalLosses => "pm-fractional-losses",
            Self::KarpFlatt => "pm-karp-flatt",
            Self::SelfOrg => "pm-self-org",
            Self::Similarity(IdealCurveKind::Reactivity) => "pm-reactivity",
            Self::Similarity(IdealCurveKind::Adaptability) => "pm-adaptability",
        }
    }
}

/// Outcome of a Stage 4 run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasureReport {
    /// Tables written
    pub written: Vec<PathBuf>,
    /// Outputs skipped, with the reason
    pub skipped: Vec<(String, String)>,
}

/// Experiments along one axis, at a fixed position on the other
#[derive(Debug, Clone)]
struct Line {
    /// Batch indices in axis order
    indices: Vec<usize>,
    names: Vec<String>,
    ticks: Vec<f64>,
    sizes: Vec<Option<usize>>,
}

impl Line {
    fn swarm_sizes(&self) -> SierraResult<Vec<usize>> {
        self.sizes
            .iter()
            .zip(&self.names)
            .map(|(size, name)| {
                size.ok_or_else(|| {
                    SierraError::NotApplicable(format!("swarm size of '{name}' is not known"))
                })
            })
            .collect()
    }
}

/// Collated inputs shared by several outputs, read on first use
struct Inputs<'a> {
    cfg: &'a SierraConfig,
    paths: &'a BatchPaths,
    blocks: Option<CollatedTable>,
}

impl<'a> Inputs<'a> {
    fn new(cfg: &'a SierraConfig, paths: &'a BatchPaths) -> Self {
        Self {
            cfg,
            paths,
            blocks: None,
        }
    }

    fn collated(&self, file: &str) -> SierraResult<CollatedTable> {
        CollatedTable::read(&self.paths.collated_root().join(file))
    }

    fn blocks(&mut self) -> SierraResult<&CollatedTable> {
        if self.blocks.is_none() {
            self.blocks = Some(self.collated(&self.cfg.perf.blocks_collected_csv)?);
        }
        self.blocks
            .as_ref()
            .ok_or_else(|| SierraError::NotApplicable("blocks collected".to_string()))
    }
}

/// Compute and write every applicable performance measure
///
/// Outputs whose inputs are missing or which do not apply to the batch are
/// skipped with a warning. Any other failure aborts the stage.
///
/// # Errors
/// Returns the first non-skippable error
pub fn run_measures(
    criterion: &Criterion,
    cfg: &SierraConfig,
    paths: &BatchPaths,
) -> SierraResult<MeasureReport> {
    let ccfg = cfg.criteria();
    let out_root = paths.measures_root(&cfg.perf);
    let mut inputs = Inputs::new(cfg, paths);
    let mut report = MeasureReport::default();

    for (name, output) in Output::ALL {
        if !criterion.pm_query(name) {
            tracing::debug!(measure = name, "measure does not apply to criterion");
            continue;
        }

        let path = out_root.join(format!("{}.csv", output.stem()));
        match run_output(output, criterion, &ccfg, &mut inputs, &path) {
            Ok(written) => {
                tracing::info!(output = output.stem(), path = %path.display(), "wrote measure");
                report.written.extend(written);
            }
            Err(e) if e.is_skippable() => {
                tracing::warn!(output = output.stem(), error = %e, "skipping measure");
                report.skipped.push((output.stem().to_string(), e.to_string()));
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "performance measures complete"
    );
    Ok(report)
}

fn run_output(
    output: Output,
    criterion: &Criterion,
    ccfg: &CriteriaConfig,
    inputs: &mut Inputs<'_>,
    path: &std::path::Path,
) -> SierraResult<Vec<PathBuf>> {
    let names = criterion.gen_exp_dirnames(ccfg);

    if output == Output::BlocksCollected {
        let values: Vec<Option<f64>> = inputs
            .blocks()?
            .final_values(&names)?
            .into_iter()
            .map(Some)
            .collect();
        write_values(criterion, ccfg, &values, path)?;
        let mut written = vec![path.to_path_buf()];

        let collated = inputs
            .paths
            .collated_root()
            .join(&inputs.cfg.perf.blocks_collected_csv);
        if let Some(stddev) = CollatedTable::read_optional(&stddev_path(&collated))? {
            let values: Vec<Option<f64>> =
                stddev.final_values(&names)?.into_iter().map(Some).collect();
            let spath = stddev_path(path);
            write_values(criterion, ccfg, &values, &spath)?;
            written.push(spath);
        }
        return Ok(written);
    }

    let lines = lines_for(output, criterion, ccfg)?;
    let mut values = vec![None; names.len()];
    for line in &lines {
        let line_values = evaluate(output, line, inputs)?;
        for (&idx, v) in line.indices.iter().zip(line_values) {
            values[idx] = v;
        }
    }
    write_values(criterion, ccfg, &values, path)?;
    Ok(vec![path.to_path_buf()])
}

/// Values of one output along one line, `None` where undefined
fn evaluate(
    output: Output,
    line: &Line,
    inputs: &mut Inputs<'_>,
) -> SierraResult<Vec<Option<f64>>> {
    let n = line.indices.len();
    let shifted = |v: Vec<f64>| -> Vec<Option<f64>> {
        std::iter::once(None).chain(v.into_iter().map(Some)).collect()
    };

    match output {
        Output::BlocksCollected => Ok(inputs
            .blocks()?
            .final_values(&line.names)?
            .into_iter()
            .map(Some)
            .collect()),
        Output::Projective(projection) => {
            let perf = inputs.blocks()?.final_values(&line.names)?;
            Ok(shifted(projective_performance(&perf, &line.ticks, projection)?))
        }
        Output::FractionalLosses | Output::SelfOrg => {
            let sizes = line.swarm_sizes()?;
            let perf = inputs.blocks()?.final_values(&line.names)?;
            let tlost = inputs
                .collated(&inputs.cfg.perf.interference_csv)?
                .final_values(&line.names)?;
            let fl = fractional_losses(&perf, &tlost, &sizes)?;
            let values = if output == Output::SelfOrg {
                self_organization(&fl, &sizes)?
            } else {
                fl
            };
            Ok(values.into_iter().map(Some).collect())
        }
        Output::KarpFlatt => {
            let sizes = line.swarm_sizes()?;
            let perf = inputs.blocks()?.final_values(&line.names)?;
            Ok(shifted(karp_flatt(&perf, &sizes)?))
        }
        Output::Similarity(kind) => {
            let perf = inputs.collated(&inputs.cfg.perf.intra_perf_csv)?;
            let variance = inputs.collated(&inputs.cfg.perf.variance_csv)?;
            let Some(base) = line.names.first() else {
                return Ok(vec![None; n]);
            };
            let perf_base = perf.column(base)?;
            let var_base = variance.column(base)?;

            line.names
                .iter()
                .map(|name| -> SierraResult<Option<f64>> {
                    let score = curve_similarity(
                        kind,
                        inputs.cfg.perf.similarity,
                        &perf.column(name)?,
                        &perf_base,
                        &variance.column(name)?,
                        &var_base,
                    )?;
                    Ok(Some(score))
                })
                .collect()
        }
    }
}

/// Split the batch into the lines an output is evaluated over
fn lines_for(
    output: Output,
    criterion: &Criterion,
    ccfg: &CriteriaConfig,
) -> SierraResult<Vec<Line>> {
    let names = criterion.gen_exp_dirnames(ccfg);
    let sizes = criterion.swarm_sizes();

    match criterion {
        Criterion::Univar(c) => Ok(vec![Line {
            indices: (0..c.len()).collect(),
            names,
            ticks: c.graph_xticks(ccfg, None)?,
            sizes,
        }]),
        Criterion::Bivar(c) => {
            let axis = match output {
                Output::Similarity(_) => variance_axis(c),
                _ => c.swarm_size_axis(),
            }
            .ok_or_else(|| {
                SierraError::NotApplicable(format!(
                    "no axis of {:?} carries '{}'",
                    criterion.cli_tokens(),
                    output.stem()
                ))
            })?;
            bivariate_lines(c, ccfg, axis, &names, &sizes)
        }
    }
}

fn variance_axis(c: &BivarCriterion) -> Option<Axis> {
    if matches!(c.criterion1().kind(), UnivarKind::TemporalVariance(_)) {
        Some(Axis::X)
    } else if matches!(c.criterion2().kind(), UnivarKind::TemporalVariance(_)) {
        Some(Axis::Y)
    } else {
        None
    }
}

fn bivariate_lines(
    c: &BivarCriterion,
    ccfg: &CriteriaConfig,
    axis: Axis,
    names: &[String],
    sizes: &[Option<usize>],
) -> SierraResult<Vec<Line>> {
    let (rows, cols) = c.shape();
    let (ticks, fixed, along) = match axis {
        Axis::Y => (c.graph_yticks(ccfg, None)?, rows, cols),
        _ => (c.graph_xticks(ccfg, None)?, cols, rows),
    };

    let lines = (0..fixed)
        .map(|k| {
            let indices: Vec<usize> = (0..along)
                .filter_map(|a| match axis {
                    Axis::Y => c.cell_index(k, a),
                    _ => c.cell_index(a, k),
                })
                .collect();
            Line {
                names: indices.iter().map(|&i| names[i].clone()).collect(),
                sizes: indices.iter().map(|&i| sizes[i]).collect(),
                ticks: ticks.clone(),
                indices,
            }
        })
        .collect();
    Ok(lines)
}

/// Write per-experiment values as a single-row table or a bivariate grid
fn write_values(
    criterion: &Criterion,
    ccfg: &CriteriaConfig,
    values: &[Option<f64>],
    path: &std::path::Path,
) -> SierraResult<()> {
    match criterion {
        Criterion::Univar(c) => {
            let (columns, row): (Vec<String>, Vec<f64>) = c
                .gen_exp_dirnames(ccfg)
                .into_iter()
                .zip(values)
                .filter_map(|(name, v)| v.map(|v| (name, v)))
                .unzip();
            CollatedTable::new(columns, vec![row])?.write(path)
        }
        Criterion::Bivar(c) => summary_grid(c, ccfg, values).write(path),
    }
}

/// Grid of `values`, dropping rows and columns with no defined value
fn summary_grid(c: &BivarCriterion, ccfg: &CriteriaConfig, values: &[Option<f64>]) -> SummaryGrid {
    let (rows, cols) = c.shape();
    let at = |i: usize, j: usize| c.cell_index(i, j).and_then(|idx| values[idx]);

    let keep_rows: Vec<usize> = (0..rows)
        .filter(|&i| (0..cols).any(|j| at(i, j).is_some()))
        .collect();
    let keep_cols: Vec<usize> = (0..cols)
        .filter(|&j| (0..rows).any(|i| at(i, j).is_some()))
        .collect();

    let row_names = c.gen_exp_dirnames(ccfg, Axis::X);
    let col_names = c.gen_exp_dirnames(ccfg, Axis::Y);
    SummaryGrid {
        row_names: keep_rows.iter().map(|&i| row_names[i].clone()).collect(),
        col_names: keep_cols.iter().map(|&j| col_names[j].clone()).collect(),
        values: keep_rows
            .iter()
            .map(|&i| {
                keep_cols
                    .iter()
                    .map(|&j| at(i, j).unwrap_or(f64::NAN))
                    .collect()
            })
            .collect(),
    }
}
