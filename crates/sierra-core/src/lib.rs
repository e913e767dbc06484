//! SIERRA Core
//!
//! Pipeline stages around the batch criterion: configuration, batch
//! layout, experiment scaffolding and performance measures.
//!
//! # Core Concepts
//!
//! - [`SierraConfig`]: YAML configuration shared by every stage
//! - [`BatchPaths`]: directory layout of one batch
//! - [`stage1::scaffold_batch`]: one input directory and persisted change
//!   set per experiment
//! - [`stage4::run_measures`]: derived performance tables from collated
//!   simulator output
//!
//! # Example
//!
//! ```rust,ignore
//! use sierra_core::{stage1, stage4, BatchPaths, SierraConfig};
//! use sierra_criteria::factory;
//!
//! let cfg = SierraConfig::from_yaml_file(Path::new("sierra.yaml"))?;
//! let paths = BatchPaths::new("/data/batch");
//! let criterion = factory::build(&["swarm_size.Log64"], &cfg.criteria(), &paths.input_root())?;
//!
//! stage1::scaffold_batch(&criterion, &cfg)?;
//! // ... run and average experiments ...
//! let report = stage4::run_measures(&criterion, &cfg, &paths)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod error;
mod paths;
pub mod stage1;
pub mod stage4;
pub mod table;

pub use config::{PerfConfig, SierraConfig};
pub use error::{SierraError, SierraResult};
pub use paths::BatchPaths;
pub use stage4::MeasureReport;

/// Version of the SIERRA core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
