//! `swarm_size.{Log,Linear}<max>`

use crate::def::{ExpDef, ExpLabel};
use crate::error::ParseError;
use crate::grammar::RangeSpec;
use sierra_changeset::{ChangeSet, ChangeSetBuilder, ElementPath};

pub(crate) const CATEGORY: &str = "swarm_size";

/// Robot distribution element
pub(crate) fn entity_path() -> ElementPath {
    ElementPath::descendant(&["arena", "distribute", "entity"])
}

/// Change set fixing the robot count
pub(crate) fn quantity_changes(n: usize) -> ChangeSet {
    ChangeSetBuilder::new()
        .set(&entity_path(), "quantity", n)
        .build()
}

/// Robot count `changes` leaves in the template, if it sets one
pub(crate) fn applied_quantity(changes: &ChangeSet) -> Option<usize> {
    changes
        .applied_value(&entity_path(), "quantity")
        .and_then(|v| v.parse().ok())
}

/// Swarm sizes along a log or linear progression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwarmSize {
    /// Progression of robot counts
    pub range: RangeSpec,
}

impl SwarmSize {
    pub(crate) fn parse(fields: &[&str]) -> Result<Self, ParseError> {
        match fields {
            [range] => Ok(Self {
                range: RangeSpec::parse(range)?,
            }),
            _ => Err(ParseError::grammar(
                fields.join("."),
                "swarm_size.{Log,Linear}<max>",
            )),
        }
    }

    pub(crate) fn expand(&self) -> Vec<ExpDef> {
        self.range
            .values()
            .into_iter()
            .map(|n| ExpDef::new(quantity_changes(n), ExpLabel::numeric(n, n as f64), Some(n)))
            .collect()
    }
}
