//! Error types for measure computation

/// Errors raised by measure calculators
#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    /// Two inputs that must align have different lengths
    #[error("{context} length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// Which input pair
        context: &'static str,
        /// Reference length
        expected: usize,
        /// Offending length
        got: usize,
    },

    /// Not enough experiments or samples for the measure
    #[error("{context} needs at least {needed} values, got {got}")]
    InsufficientData {
        /// Which measure
        context: &'static str,
        /// Minimum count
        needed: usize,
        /// Actual count
        got: usize,
    },

    /// Input value outside the measure's domain
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub(crate) fn check_len(
    context: &'static str,
    expected: usize,
    got: usize,
) -> Result<(), MeasureError> {
    if expected == got {
        Ok(())
    } else {
        Err(MeasureError::LengthMismatch {
            context,
            expected,
            got,
        })
    }
}

pub(crate) fn check_min(
    context: &'static str,
    needed: usize,
    got: usize,
) -> Result<(), MeasureError> {
    if got >= needed {
        Ok(())
    } else {
        Err(MeasureError::InsufficientData {
            context,
            needed,
            got,
        })
    }
}
