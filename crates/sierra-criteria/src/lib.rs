//! SIERRA Criteria
//!
//! Expands a compact batch-criterion token into one change set per
//! experiment, plus the directory names and axis metadata later stages use.
//!
//! # Core Concepts
//!
//! - [`UnivarKind`]: parsed attributes of one criterion kind
//! - [`UnivarCriterion`]: one parameter varied across a batch
//! - [`BivarCriterion`]: Cartesian product of two univariate criteria
//! - [`Criterion`]: either of the above, built by [`factory::build`]
//! - [`CriteriaConfig`]: configuration read during expansion
//!
//! # Token grammar
//!
//! `<category>.<definition>[.<modifier>]*`, with `p` as the decimal point:
//!
//! ```text
//! swarm_size.Log1024
//! block_quantity.CLog64.Z16
//! swarm_density.CD1p0.I16.C5
//! temporal_variance.BCSine.Z16
//! oracle.entities.Z16
//! ta_policy_set.All.Z8
//! block_motion_dynamics.C4.F2p0.RW0p001
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sierra_criteria::{factory, CriteriaConfig};
//!
//! let cfg = CriteriaConfig::default();
//! let criterion = factory::build(&["swarm_size.Log8"], &cfg, &batch_root)?;
//! assert_eq!(criterion.gen_exp_dirnames(&cfg), ["exp0", "exp1", "exp2", "exp3"]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod bivariate;
mod config;
mod criterion;
mod def;
mod error;
pub mod factory;
mod grammar;
pub mod kinds;
pub mod pm;
mod univariate;

pub use bivariate::{Axis, BivarCriterion, CELL_SEPARATOR};
pub use config::{CriteriaConfig, VarianceSchedule};
pub use criterion::Criterion;
pub use def::{ExpDef, ExpLabel};
pub use error::{CriteriaError, CriteriaResult, ParseError};
pub use grammar::{Increment, RangeSpec};
pub use kinds::UnivarKind;
pub use univariate::UnivarCriterion;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
