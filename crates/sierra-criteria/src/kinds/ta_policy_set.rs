//! `ta_policy_set.<All|policy>[.Z<n>]`

use crate::def::{ExpDef, ExpLabel};
use crate::error::ParseError;
use crate::grammar::optional_swarm_size;
use crate::kinds::swarm_size;
use sierra_changeset::{ChangeSetBuilder, ElementPath};

pub(crate) const CATEGORY: &str = "ta_policy_set";

const EXPECTED: &str =
    "ta_policy_set.<All|random|stoch_nbhd1|strict_greedy|epsilon_greedy|UCB1>[.Z<n>]";

/// Task allocation policies, in batch order
pub const POLICIES: [&str; 5] = [
    "random",
    "stoch_nbhd1",
    "strict_greedy",
    "epsilon_greedy",
    "UCB1",
];

/// Fixed list of task allocation policies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaPolicySet {
    /// Policies compared, one per experiment
    pub policies: Vec<&'static str>,
    /// Fixed robot count for every experiment
    pub swarm_size: Option<usize>,
}

impl TaPolicySet {
    pub(crate) fn parse(fields: &[&str]) -> Result<Self, ParseError> {
        let (definition, rest) = fields
            .split_first()
            .ok_or_else(|| ParseError::grammar(CATEGORY, EXPECTED))?;
        let policies = if *definition == "All" {
            POLICIES.to_vec()
        } else {
            let policy = POLICIES
                .iter()
                .find(|p| *p == definition)
                .ok_or_else(|| ParseError::grammar(*definition, EXPECTED))?;
            vec![*policy]
        };
        Ok(Self {
            policies,
            swarm_size: optional_swarm_size(rest)?,
        })
    }

    pub(crate) fn expand(&self) -> Vec<ExpDef> {
        let path = ElementPath::descendant(&["task_alloc"]);
        self.policies
            .iter()
            .enumerate()
            .map(|(i, policy)| {
                let mut builder = ChangeSetBuilder::new().set(&path, "policy", policy);
                if let Some(n) = self.swarm_size {
                    builder = builder.merge(&swarm_size::quantity_changes(n));
                }
                ExpDef::new(builder.build(), ExpLabel::categorical(i, *policy), self.swarm_size)
            })
            .collect()
    }
}
