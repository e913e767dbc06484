//! Testing utilities for SIERRA workspace
//!
//! Shared fixtures: configurations, criteria, change sets and collated
//! tables laid out the way the averaging stage writes them.

#![allow(missing_docs)]

use sierra_changeset::{ChangeSet, ChangeSetBuilder, ElementPath};
use sierra_criteria::{factory, CriteriaConfig, Criterion};
use std::path::Path;

pub const TEST_SCENARIO: &str = "SS.16x8";

pub fn test_config() -> CriteriaConfig {
    CriteriaConfig::default().with_scenario(TEST_SCENARIO)
}

pub fn build_criterion(tokens: &[&str], batch_input_root: &Path) -> Criterion {
    factory::build(tokens, &test_config(), batch_input_root).unwrap()
}

pub fn sample_change_set() -> ChangeSet {
    ChangeSetBuilder::new()
        .set(&ElementPath::descendant(&["arena", "distribute", "entity"]), "quantity", 4)
        .set(&ElementPath::descendant(&["task_alloc"]), "policy", "random")
        .build()
}

/// Directory names `exp0..exp{n-1}`
pub fn exp_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("exp{i}")).collect()
}

/// Write a `;`-delimited collated table
pub fn write_collated(path: &Path, columns: &[String], rows: &[Vec<f64>]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .unwrap();
    writer.write_record(columns).unwrap();
    for row in rows {
        writer.write_record(row.iter().map(f64::to_string)).unwrap();
    }
    writer.flush().unwrap();
}

/// Cumulative series rising linearly from 0 to each final value
pub fn ramp_rows(finals: &[f64], n_rows: usize) -> Vec<Vec<f64>> {
    (1..=n_rows)
        .map(|r| {
            let frac = r as f64 / n_rows as f64;
            finals.iter().map(|f| f * frac).collect()
        })
        .collect()
}

/// Same value in every column of every row
pub fn flat_rows(value: f64, n_cols: usize, n_rows: usize) -> Vec<Vec<f64>> {
    vec![vec![value; n_cols]; n_rows]
}
