//! SIERRA Measures
//!
//! Pure calculators for swarm performance measures. Every function works on
//! per-experiment series in batch order; reading and writing the collated
//! tables they come from is the caller's concern.
//!
//! # Core Concepts
//!
//! - [`projective_performance`], [`karp_flatt`]: scalability against swarm size
//! - [`fractional_losses`], [`self_organization`]: interference-derived measures
//! - [`curve_similarity`]: reactivity and adaptability under temporal variance
//! - [`Waveform`]: parameterized environmental variance
//! - [`SimilarityMethod`]: distance metrics between curves
//!
//! # Example
//!
//! ```rust,ignore
//! use sierra_measures::{fractional_losses, self_organization};
//!
//! let fl = fractional_losses(&perf, &interference, &sizes)?;
//! let so = self_organization(&fl, &sizes)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod curve;
mod error;
mod scalability;
mod similarity;
mod waveform;

pub use curve::{arc_length, from_series, Point, SimilarityMethod};
pub use error::MeasureError;
pub use scalability::{
    fractional_losses, karp_flatt, performance_losses, projective_performance,
    self_organization, Projection,
};
pub use similarity::{curve_similarity, ideal_curve, IdealCurveKind};
pub use waveform::{Waveform, WaveformKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
