//! Subcommand bodies; each returns the text to print

use anyhow::Context;
use serde_json::json;
use sierra_changeset::persist;
use sierra_core::{stage1, stage4, BatchPaths, SierraConfig};
use sierra_criteria::{factory, pm, Criterion};
use std::fmt::Write as _;
use std::path::Path;

fn build(tokens: &[String], cfg: &SierraConfig, paths: &BatchPaths) -> anyhow::Result<Criterion> {
    factory::build(tokens, &cfg.criteria(), &paths.input_root())
        .with_context(|| format!("building criterion from {tokens:?}"))
}

pub(crate) fn describe(
    tokens: &[String],
    cfg: &SierraConfig,
    batch_root: &Path,
    as_json: bool,
) -> anyhow::Result<String> {
    let paths = BatchPaths::new(batch_root);
    let criterion = build(tokens, cfg, &paths)?;
    let ccfg = cfg.criteria();

    let dirs = criterion.gen_exp_dirnames(&ccfg);
    let sets = criterion.generate_change_sets();
    let measures: Vec<&str> = pm::ALL
        .into_iter()
        .filter(|m| criterion.pm_query(m))
        .collect();
    let labels = match &criterion {
        Criterion::Univar(c) => c.graph_xticklabels(&ccfg, None)?,
        Criterion::Bivar(c) => {
            let rows = c.graph_xticklabels(&ccfg, None)?;
            let cols = c.graph_yticklabels(&ccfg, None)?;
            c.cells()
                .iter()
                .map(|cell| format!("{}, {}", rows[cell.row], cols[cell.col]))
                .collect()
        }
    };

    if as_json {
        let experiments: Vec<_> = dirs
            .iter()
            .zip(&sets)
            .zip(&labels)
            .map(|((dir, set), label)| {
                json!({
                    "dir": dir,
                    "label": label,
                    "changes": set.iter().map(ToString::to_string).collect::<Vec<_>>(),
                })
            })
            .collect();
        let doc = json!({
            "criteria": criterion.cli_tokens(),
            "xlabel": criterion.graph_xlabel(&ccfg),
            "measures": measures,
            "experiments": experiments,
        });
        return Ok(serde_json::to_string_pretty(&doc)?);
    }

    let mut out = String::new();
    writeln!(out, "criteria: {}", criterion.cli_tokens().join(" x "))?;
    writeln!(out, "x-axis: {}", criterion.graph_xlabel(&ccfg))?;
    if let Criterion::Bivar(c) = &criterion {
        writeln!(out, "y-axis: {}", c.graph_ylabel(&ccfg))?;
    }
    writeln!(out, "measures: {}", measures.join(", "))?;
    writeln!(out, "experiments: {}", criterion.len())?;
    for ((dir, set), label) in dirs.iter().zip(&sets).zip(&labels) {
        writeln!(out, "  {dir} [{label}]")?;
        for change in set.iter() {
            writeln!(out, "    {change}")?;
        }
    }
    Ok(out.trim_end().to_string())
}

pub(crate) fn scaffold(
    tokens: &[String],
    cfg: &SierraConfig,
    batch_root: &Path,
) -> anyhow::Result<String> {
    let paths = BatchPaths::new(batch_root);
    let criterion = build(tokens, cfg, &paths)?;
    let dirs = stage1::scaffold_batch(&criterion, cfg)?;
    Ok(format!(
        "scaffolded {} experiments under {}",
        dirs.len(),
        paths.input_root().display()
    ))
}

pub(crate) fn measures(
    tokens: &[String],
    cfg: &SierraConfig,
    batch_root: &Path,
) -> anyhow::Result<String> {
    let paths = BatchPaths::new(batch_root);
    let criterion = build(tokens, cfg, &paths)?;
    let report = stage4::run_measures(&criterion, cfg, &paths)?;

    let mut out = String::new();
    for path in &report.written {
        writeln!(out, "wrote {}", path.display())?;
    }
    for (output, reason) in &report.skipped {
        writeln!(out, "skipped {output}: {reason}")?;
    }
    Ok(out.trim_end().to_string())
}

pub(crate) fn inspect(exp_def: &Path, as_json: bool) -> anyhow::Result<String> {
    let records = persist::read_records(exp_def)
        .with_context(|| format!("reading {}", exp_def.display()))?;
    let union = persist::read_union(exp_def)?;

    if as_json {
        let doc = json!({
            "records": records.len(),
            "changes": union.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "conflicts": union.conflicts().iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        return Ok(serde_json::to_string_pretty(&doc)?);
    }

    let mut out = String::new();
    writeln!(out, "{}: {} record(s)", exp_def.display(), records.len())?;
    for change in union.iter() {
        writeln!(out, "  {change}")?;
    }
    for conflict in union.conflicts() {
        writeln!(out, "  conflict: {conflict}")?;
    }
    Ok(out.trim_end().to_string())
}
