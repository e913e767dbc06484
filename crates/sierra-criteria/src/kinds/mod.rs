//! Univariate criterion kinds
//!
//! One parser and generator per kind, dispatched through [`UnivarKind`].

use crate::config::CriteriaConfig;
use crate::def::ExpDef;
use crate::error::{CriteriaResult, ParseError};
use crate::grammar::Token;
use crate::pm;

mod block_motion_dynamics;
mod block_quantity;
mod density;
mod oracle;
mod swarm_size;
mod ta_policy_set;
mod temporal_variance;

pub use block_motion_dynamics::BlockMotionDynamics;
pub use block_quantity::{BlockQuantity, BlockType};
pub use density::{BlockDistribution, ConstantDensity, Scenario, DEFAULT_CARDINALITY};
pub use oracle::{Oracle, OracleFamily};
pub use swarm_size::SwarmSize;
pub(crate) use swarm_size::applied_quantity;
pub use ta_policy_set::{TaPolicySet, POLICIES};
pub use temporal_variance::{TemporalVariance, VarianceType};

/// Parsed attributes of a univariate criterion
#[derive(Debug, Clone, PartialEq)]
pub enum UnivarKind {
    /// Robot count
    SwarmSize(SwarmSize),
    /// Block count
    BlockQuantity(BlockQuantity),
    /// Arena and robot count at fixed density
    ConstantDensity(ConstantDensity),
    /// Environmental waveform
    TemporalVariance(TemporalVariance),
    /// Oracle flag combinations
    Oracle(Oracle),
    /// Task allocation policy
    TaPolicySet(TaPolicySet),
    /// Block random-walk probability
    BlockMotionDynamics(BlockMotionDynamics),
}

impl UnivarKind {
    /// Every recognised category, in dispatch order
    pub const CATEGORIES: [&'static str; 7] = [
        swarm_size::CATEGORY,
        block_quantity::CATEGORY,
        density::CATEGORY,
        temporal_variance::CATEGORY,
        oracle::CATEGORY,
        ta_policy_set::CATEGORY,
        block_motion_dynamics::CATEGORY,
    ];

    /// Parse a criterion token
    ///
    /// # Errors
    /// Returns error if the category is unknown, the token is malformed, or a
    /// constant-density token meets a missing or unsupported scenario
    pub fn parse(token: &str, cfg: &CriteriaConfig) -> CriteriaResult<Self> {
        let Token { category, fields } = Token::split(token)?;
        let kind = match category {
            swarm_size::CATEGORY => Self::SwarmSize(SwarmSize::parse(&fields)?),
            block_quantity::CATEGORY => Self::BlockQuantity(BlockQuantity::parse(&fields)?),
            density::CATEGORY => Self::ConstantDensity(ConstantDensity::parse(
                &fields,
                cfg.scenario.as_deref(),
            )?),
            temporal_variance::CATEGORY => {
                Self::TemporalVariance(TemporalVariance::parse(&fields)?)
            }
            oracle::CATEGORY => Self::Oracle(Oracle::parse(&fields)?),
            ta_policy_set::CATEGORY => Self::TaPolicySet(TaPolicySet::parse(&fields)?),
            block_motion_dynamics::CATEGORY => {
                Self::BlockMotionDynamics(BlockMotionDynamics::parse(&fields)?)
            }
            other => return Err(ParseError::UnknownCategory(other.to_string()).into()),
        };
        Ok(kind)
    }

    /// Category name
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::SwarmSize(_) => swarm_size::CATEGORY,
            Self::BlockQuantity(_) => block_quantity::CATEGORY,
            Self::ConstantDensity(_) => density::CATEGORY,
            Self::TemporalVariance(_) => temporal_variance::CATEGORY,
            Self::Oracle(_) => oracle::CATEGORY,
            Self::TaPolicySet(_) => ta_policy_set::CATEGORY,
            Self::BlockMotionDynamics(_) => block_motion_dynamics::CATEGORY,
        }
    }

    /// Generate every experiment definition, in batch order
    pub(crate) fn expand(&self, cfg: &CriteriaConfig) -> CriteriaResult<Vec<ExpDef>> {
        Ok(match self {
            Self::SwarmSize(k) => k.expand(),
            Self::BlockQuantity(k) => k.expand(),
            Self::ConstantDensity(k) => k.expand(),
            Self::TemporalVariance(k) => k.expand(cfg)?,
            Self::Oracle(k) => k.expand(),
            Self::TaPolicySet(k) => k.expand(),
            Self::BlockMotionDynamics(k) => k.expand(),
        })
    }

    /// Axis title
    #[must_use]
    pub fn xlabel(&self) -> &'static str {
        match self {
            Self::SwarmSize(_) | Self::ConstantDensity(_) => "Swarm Size",
            Self::BlockQuantity(k) => match k.block_type {
                BlockType::Cube => "Cube Block Quantity",
                BlockType::Ramp => "Ramp Block Quantity",
            },
            Self::TemporalVariance(k) => k.variance_type.xlabel(),
            Self::Oracle(_) => "Oracle Information",
            Self::TaPolicySet(_) => "Task Allocation Policy",
            Self::BlockMotionDynamics(_) => "Block Random Walk Probability",
        }
    }

    /// Performance measures meaningful for this kind
    #[must_use]
    pub fn measures(&self) -> &'static [&'static str] {
        match self {
            Self::SwarmSize(_) | Self::ConstantDensity(_) => pm::SIZE_VARYING,
            Self::TemporalVariance(_) => pm::VARIANCE,
            Self::BlockQuantity(_)
            | Self::Oracle(_)
            | Self::TaPolicySet(_)
            | Self::BlockMotionDynamics(_) => pm::BASIC,
        }
    }

    /// Check if tick labels are names rather than numbers
    #[must_use]
    pub fn is_categorical(&self) -> bool {
        matches!(
            self,
            Self::TemporalVariance(_) | Self::Oracle(_) | Self::TaPolicySet(_)
        )
    }

    /// Check if the swarm size varies across the batch
    #[must_use]
    pub fn varies_swarm_size(&self) -> bool {
        matches!(self, Self::SwarmSize(_) | Self::ConstantDensity(_))
    }

    /// Ticks for the whole batch under `cfg`
    ///
    /// Temporal-variance ticks depend on the sampling settings and are
    /// recomputed; every other kind reuses its generated labels.
    pub(crate) fn ticks(&self, cfg: &CriteriaConfig, defs: &[ExpDef]) -> CriteriaResult<Vec<f64>> {
        match self {
            Self::TemporalVariance(k) => k.ticks(cfg),
            _ => Ok(defs.iter().map(|d| d.label.tick).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CriteriaError;

    #[test]
    fn dispatches_every_category() {
        let cfg = CriteriaConfig::default().with_scenario("SS.16x8");
        let tokens = [
            "swarm_size.Log1024",
            "block_quantity.CLog64",
            "swarm_density.CD1p0.I16",
            "temporal_variance.BCSine.Z16",
            "oracle.entities.Z16",
            "ta_policy_set.All.Z8",
            "block_motion_dynamics.C4.F2p0.RW0p001",
        ];
        for (token, category) in tokens.iter().zip(UnivarKind::CATEGORIES) {
            let kind = UnivarKind::parse(token, &cfg).unwrap();
            assert_eq!(kind.category(), category);
        }
    }

    #[test]
    fn unknown_category() {
        let err = UnivarKind::parse("swarm_mass.Log8", &CriteriaConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CriteriaError::Parse(ParseError::UnknownCategory(c)) if c == "swarm_mass"
        ));
    }

    #[test]
    fn measure_allow_lists() {
        let cfg = CriteriaConfig::default();
        let size = UnivarKind::parse("swarm_size.Log8", &cfg).unwrap();
        assert!(size.measures().contains(&pm::SCALABILITY));
        assert!(!size.measures().contains(&pm::REACTIVITY));

        let tv = UnivarKind::parse("temporal_variance.MSine", &cfg).unwrap();
        assert!(tv.measures().contains(&pm::ADAPTABILITY));
        assert!(!tv.measures().contains(&pm::SELF_ORG));

        let oracle = UnivarKind::parse("oracle.tasks", &cfg).unwrap();
        assert_eq!(oracle.measures(), &[pm::BLOCKS_COLLECTED]);
    }
}
