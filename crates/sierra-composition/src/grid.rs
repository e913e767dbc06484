//! Cartesian composition of two change-set sequences
//!
//! Set-union composition: order-independent within a cell, row-major across
//! cells.

use crate::policy::{
    CompositionError, ConflictDiagnostic, ConflictPolicy, ResolutionSuggestion,
};
use sierra_changeset::ChangeSet;

/// One cell of a composed grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Index into the first (row) sequence
    pub row: usize,

    /// Index into the second (column) sequence
    pub col: usize,

    /// Union of the row and column change sets
    pub changes: ChangeSet,
}

/// Union composer for change sets
///
/// # Characteristics
/// - Order-independent (set union is commutative)
/// - Duplicate triples collapse
/// - Conflicts are reported per [`ConflictPolicy`]
#[derive(Debug, Clone, Copy, Default)]
pub struct UnionComposer {
    policy: ConflictPolicy,
}

impl UnionComposer {
    /// Create composer with the given policy
    #[inline]
    #[must_use]
    pub fn new(policy: ConflictPolicy) -> Self {
        Self { policy }
    }

    /// Active policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Compose one cell
    ///
    /// # Errors
    /// Returns error if the union conflicts and the policy is strict
    pub fn compose_cell(
        &self,
        row: usize,
        col: usize,
        a: &ChangeSet,
        b: &ChangeSet,
    ) -> Result<Cell, CompositionError> {
        let changes = a.union(b);
        let conflicts = changes.conflicts();

        if !conflicts.is_empty() {
            if self.policy.is_strict() {
                let suggestions = conflicts
                    .iter()
                    .map(|c| ResolutionSuggestion::RemoveSharedModifier {
                        attr: c.attr.clone(),
                    })
                    .chain(std::iter::once(ResolutionSuggestion::UseRetainPolicy))
                    .collect();
                return Err(CompositionError::ConflictingChanges {
                    diagnostic: ConflictDiagnostic {
                        row,
                        col,
                        conflicts,
                        suggestions,
                    },
                });
            }
            for conflict in &conflicts {
                tracing::warn!(
                    row,
                    col,
                    %conflict,
                    "composed cell assigns one attribute several values"
                );
            }
        }

        Ok(Cell { row, col, changes })
    }

    /// Row-major Cartesian composition: `cells[i * cols.len() + j] = rows[i] ∪ cols[j]`
    ///
    /// # Errors
    /// Returns error if either side is empty or a cell conflicts under a strict policy
    pub fn compose_grid(
        &self,
        rows: &[ChangeSet],
        cols: &[ChangeSet],
    ) -> Result<Vec<Cell>, CompositionError> {
        if rows.is_empty() {
            return Err(CompositionError::EmptyAxis { axis: "rows" });
        }
        if cols.is_empty() {
            return Err(CompositionError::EmptyAxis { axis: "columns" });
        }

        let mut cells = Vec::with_capacity(rows.len() * cols.len());
        for (i, a) in rows.iter().enumerate() {
            for (j, b) in cols.iter().enumerate() {
                cells.push(self.compose_cell(i, j, a, b)?);
            }
        }
        Ok(cells)
    }
}
