//! `block_quantity.<C|R><Log|Linear><max>[.Z<n>]`

use crate::def::{ExpDef, ExpLabel};
use crate::error::ParseError;
use crate::grammar::{optional_swarm_size, RangeSpec};
use crate::kinds::swarm_size;
use sierra_changeset::{ChangeSetBuilder, ElementPath};

pub(crate) const CATEGORY: &str = "block_quantity";

const EXPECTED: &str = "block_quantity.<C|R><Log|Linear><max>[.Z<n>]";

/// Block family whose count is varied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    /// Cube blocks
    Cube,
    /// Ramp blocks
    Ramp,
}

impl BlockType {
    /// Manifest attribute holding the count
    #[must_use]
    pub fn manifest_attr(self) -> &'static str {
        match self {
            Self::Cube => "n_cube",
            Self::Ramp => "n_ramp",
        }
    }
}

/// Block counts along a log or linear progression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockQuantity {
    /// Which block family
    pub block_type: BlockType,
    /// Progression of block counts
    pub range: RangeSpec,
    /// Fixed robot count for every experiment
    pub swarm_size: Option<usize>,
}

fn manifest_path() -> ElementPath {
    ElementPath::descendant(&["arena_map", "blocks", "distribution", "manifest"])
}

impl BlockQuantity {
    pub(crate) fn parse(fields: &[&str]) -> Result<Self, ParseError> {
        let (definition, rest) = fields
            .split_first()
            .ok_or_else(|| ParseError::grammar(CATEGORY, EXPECTED))?;

        let (block_type, range) = if let Some(range) = definition.strip_prefix('C') {
            (BlockType::Cube, range)
        } else if let Some(range) = definition.strip_prefix('R') {
            (BlockType::Ramp, range)
        } else {
            return Err(ParseError::grammar(*definition, EXPECTED));
        };

        Ok(Self {
            block_type,
            range: RangeSpec::parse(range)?,
            swarm_size: optional_swarm_size(rest)?,
        })
    }

    pub(crate) fn expand(&self) -> Vec<ExpDef> {
        let manifest = manifest_path();
        self.range
            .values()
            .into_iter()
            .map(|n| {
                let mut builder =
                    ChangeSetBuilder::new().set(&manifest, self.block_type.manifest_attr(), n);
                if let Some(size) = self.swarm_size {
                    builder = builder.merge(&swarm_size::quantity_changes(size));
                }
                ExpDef::new(builder.build(), ExpLabel::numeric(n, n as f64), self.swarm_size)
            })
            .collect()
    }
}
