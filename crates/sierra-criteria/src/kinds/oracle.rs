//! `oracle.<entities|tasks|all>[.Z<n>]`
//!
//! Enumerates every on/off combination of a family of oracle flags.

use crate::def::{ExpDef, ExpLabel};
use crate::error::ParseError;
use crate::grammar::optional_swarm_size;
use crate::kinds::swarm_size;
use sierra_changeset::{ChangeSetBuilder, ElementPath};

pub(crate) const CATEGORY: &str = "oracle";

const EXPECTED: &str = "oracle.<entities|tasks|all>[.Z<n>]";

const ENTITY_FLAGS: [(&str, &str); 2] = [
    ("entities_oracle", "caches"),
    ("entities_oracle", "blocks"),
];
const TASK_FLAGS: [(&str, &str); 2] = [
    ("tasking_oracle", "exec_est"),
    ("tasking_oracle", "interface_est"),
];

/// Joins enabled flags in directory names; `+` is reserved for bivariate cells
const SLUG_JOINER: &str = "-";

/// Group of oracle flags varied together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleFamily {
    /// Perfect knowledge of caches and blocks
    Entities,
    /// Perfect task execution and interface estimates
    Tasks,
    /// Both of the above
    All,
}

impl OracleFamily {
    /// `(oracle element, flag attribute)` pairs in bit order
    #[must_use]
    pub fn flags(self) -> Vec<(&'static str, &'static str)> {
        match self {
            Self::Entities => ENTITY_FLAGS.to_vec(),
            Self::Tasks => TASK_FLAGS.to_vec(),
            Self::All => ENTITY_FLAGS.iter().chain(&TASK_FLAGS).copied().collect(),
        }
    }
}

/// Power set of oracle flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Oracle {
    /// Flags being combined
    pub family: OracleFamily,
    /// Fixed robot count for every experiment
    pub swarm_size: Option<usize>,
}

impl Oracle {
    pub(crate) fn parse(fields: &[&str]) -> Result<Self, ParseError> {
        let (definition, rest) = fields
            .split_first()
            .ok_or_else(|| ParseError::grammar(CATEGORY, EXPECTED))?;
        let family = match *definition {
            "entities" => OracleFamily::Entities,
            "tasks" => OracleFamily::Tasks,
            "all" => OracleFamily::All,
            other => return Err(ParseError::grammar(other, EXPECTED)),
        };
        Ok(Self {
            family,
            swarm_size: optional_swarm_size(rest)?,
        })
    }

    pub(crate) fn expand(&self) -> Vec<ExpDef> {
        let flags = self.family.flags();
        (0..1usize << flags.len())
            .map(|mask| {
                let mut builder = ChangeSetBuilder::new();
                let mut enabled = Vec::new();
                for (bit, (element, attr)) in flags.iter().enumerate() {
                    let on = mask & (1 << bit) != 0;
                    let path = ElementPath::descendant(&["oracle_manager", *element]);
                    builder = builder.set(&path, attr, on);
                    if on {
                        enabled.push(*attr);
                    }
                }
                if let Some(n) = self.swarm_size {
                    builder = builder.merge(&swarm_size::quantity_changes(n));
                }

                let (slug, tick_label) = if enabled.is_empty() {
                    ("none".to_string(), "none".to_string())
                } else {
                    (enabled.join(SLUG_JOINER), enabled.join("+"))
                };
                let label = ExpLabel {
                    slug,
                    tick: mask as f64,
                    tick_label,
                };
                ExpDef::new(builder.build(), label, self.swarm_size)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_power_set() {
        let defs = Oracle::parse(&["entities", "Z16"]).unwrap().expand();
        let names: Vec<&str> = defs.iter().map(|d| d.label.tick_label.as_str()).collect();
        assert_eq!(names, vec!["none", "caches", "blocks", "caches+blocks"]);
        assert_eq!(defs[3].label.slug, "caches-blocks");

        let path = ElementPath::descendant(&["oracle_manager", "entities_oracle"]);
        assert_eq!(defs[1].changes.value_of(&path, "caches"), Some("true"));
        assert_eq!(defs[1].changes.value_of(&path, "blocks"), Some("false"));
        assert_eq!(defs[0].swarm_size, Some(16));
    }

    #[test]
    fn all_family_has_sixteen_combinations() {
        let defs = Oracle::parse(&["all"]).unwrap().expand();
        assert_eq!(defs.len(), 16);
        assert!(defs.iter().all(|d| d.changes.len() == 4));
        assert_eq!(defs[15].label.tick, 15.0);
    }

    #[test]
    fn rejects_unknown_family() {
        assert!(Oracle::parse(&["caches"]).is_err());
    }
}
