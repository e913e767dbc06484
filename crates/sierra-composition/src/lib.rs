//! SIERRA Composition
//!
//! Combines the change sets of two independently varied criteria into the
//! cells of a bivariate batch.
//!
//! # Core Concepts
//!
//! - [`UnionComposer`]: set-union composition, row-major over two sequences
//! - [`ConflictPolicy`]: keep or reject cells that assign one attribute twice
//! - [`Cell`]: one composed experiment with its row/column bookkeeping
//!
//! # Example
//!
//! ```rust,ignore
//! use sierra_composition::{ConflictPolicy, UnionComposer};
//!
//! let composer = UnionComposer::new(ConflictPolicy::Retain);
//! let cells = composer.compose_grid(&swarm_sizes, &block_counts)?;
//! assert_eq!(cells.len(), swarm_sizes.len() * block_counts.len());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod grid;
mod policy;

pub use grid::{Cell, UnionComposer};
pub use policy::{CompositionError, ConflictDiagnostic, ConflictPolicy, ResolutionSuggestion};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use proptest::prelude::*;
    use sierra_changeset::{ChangeSet, ChangeSetBuilder, ElementPath};

    fn column(attr: &'static str, values: Vec<u16>) -> Vec<ChangeSet> {
        let path = ElementPath::descendant(&["arena"]);
        values
            .into_iter()
            .map(|v| ChangeSetBuilder::new().set(&path, attr, v).build())
            .collect()
    }

    proptest! {
        #[test]
        fn prop_cells_are_unions(
            rows in proptest::collection::vec(0u16..100, 1..6),
            cols in proptest::collection::vec(0u16..100, 1..6),
        ) {
            let rows = column("rows", rows);
            let cols = column("cols", cols);
            let cells = UnionComposer::new(ConflictPolicy::Reject)
                .compose_grid(&rows, &cols)
                .unwrap();

            prop_assert_eq!(cells.len(), rows.len() * cols.len());
            for i in 0..rows.len() {
                for j in 0..cols.len() {
                    let cell = &cells[i * cols.len() + j];
                    prop_assert_eq!(&cell.changes, &rows[i].union(&cols[j]));
                }
            }
        }
    }
}
