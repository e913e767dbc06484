//! `block_motion_dynamics.C<cardinality>.F<factor>.RW<base>[.Z<n>]`
//!
//! Experiment 0 disables block motion; experiment `k` makes blocks random
//! walk with probability `k * factor * base`.

use crate::def::{ExpDef, ExpLabel};
use crate::error::ParseError;
use crate::grammar::{optional_swarm_size, prefixed_decimal, prefixed_usize};
use crate::kinds::swarm_size;
use sierra_changeset::{ChangeSetBuilder, ElementPath};

pub(crate) const CATEGORY: &str = "block_motion_dynamics";

const EXPECTED: &str = "block_motion_dynamics.C<cardinality>.F<factor>.RW<base>[.Z<n>]";

/// Escalating random-walk block motion
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMotionDynamics {
    /// Number of experiments, including the static baseline
    pub cardinality: usize,
    /// Growth factor per experiment
    pub factor: f64,
    /// Random-walk probability unit
    pub base: f64,
    /// Fixed robot count for every experiment
    pub swarm_size: Option<usize>,
}

impl BlockMotionDynamics {
    pub(crate) fn parse(fields: &[&str]) -> Result<Self, ParseError> {
        let [card, factor, base, rest @ ..] = fields else {
            return Err(ParseError::grammar(fields.join("."), EXPECTED));
        };
        let cardinality = prefixed_usize(card, "C", "C<cardinality >= 1>")?;
        if cardinality == 0 {
            return Err(ParseError::grammar(*card, "C<cardinality >= 1>"));
        }
        let factor_value = prefixed_decimal(factor, "F", "F<factor > 0>")?;
        if factor_value == 0.0 {
            return Err(ParseError::grammar(*factor, "F<factor > 0>"));
        }
        let base_value = prefixed_decimal(base, "RW", "RW<probability > 0>")?;
        if base_value == 0.0 {
            return Err(ParseError::grammar(*base, "RW<probability > 0>"));
        }
        Ok(Self {
            cardinality,
            factor: factor_value,
            base: base_value,
            swarm_size: optional_swarm_size(rest)?,
        })
    }

    /// Random-walk probability of experiment `k`
    #[inline]
    #[must_use]
    pub fn probability(&self, k: usize) -> f64 {
        k as f64 * self.factor * self.base
    }

    pub(crate) fn expand(&self) -> Vec<ExpDef> {
        let path = ElementPath::descendant(&["env_dynamics", "blocks", "motion"]);
        (0..self.cardinality)
            .map(|k| {
                let prob = self.probability(k);
                let policy = if k == 0 { "Null" } else { "random_walk" };
                let mut builder = ChangeSetBuilder::new()
                    .set(&path, "policy", policy)
                    .set(&path, "random_walk_prob", prob);
                if let Some(n) = self.swarm_size {
                    builder = builder.merge(&swarm_size::quantity_changes(n));
                }
                let label = ExpLabel {
                    slug: format!("RW{prob}"),
                    tick: prob,
                    tick_label: prob.to_string(),
                };
                ExpDef::new(builder.build(), label, self.swarm_size)
            })
            .collect()
    }
}
