//! Error types for criterion parsing and expansion
//!
//! Every error here is fatal: a malformed token or an unsupported
//! combination aborts the batch before any experiment is generated.

use sierra_composition::CompositionError;
use sierra_measures::MeasureError;

/// Malformed criterion token
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A token fragment does not match its grammar
    #[error("malformed criterion fragment '{fragment}': expected {expected}")]
    Grammar {
        /// Offending substring
        fragment: String,
        /// Expected grammar fragment
        expected: &'static str,
    },

    /// Category before the first `.` is not a known criterion kind
    #[error("unknown batch criterion category '{0}'")]
    UnknownCategory(String),
}

impl ParseError {
    /// Create grammar error for fragment
    pub fn grammar(fragment: impl Into<String>, expected: &'static str) -> Self {
        Self::Grammar {
            fragment: fragment.into(),
            expected,
        }
    }
}

/// Errors raised while building or querying a criterion
#[derive(Debug, thiserror::Error)]
pub enum CriteriaError {
    /// Token did not parse
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Caller broke a structural precondition
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Combination has no generation rule
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Cell composition failed under a strict conflict policy
    #[error("composition failed: {0}")]
    Composition(#[from] CompositionError),

    /// Tick computation failed
    #[error("measure error: {0}")]
    Measure(#[from] MeasureError),
}

impl CriteriaError {
    /// Create precondition error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }
}

/// Result type alias for criterion operations
pub type CriteriaResult<T> = Result<T, CriteriaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_error_names_fragment_and_grammar() {
        let err = ParseError::grammar("Lug8", "Log<max> or Linear<max>");
        assert_eq!(
            err.to_string(),
            "malformed criterion fragment 'Lug8': expected Log<max> or Linear<max>"
        );
    }

    #[test]
    fn error_conversions() {
        let err: CriteriaError = ParseError::UnknownCategory("foo".to_string()).into();
        assert!(matches!(err, CriteriaError::Parse(ParseError::UnknownCategory(_))));
    }
}
