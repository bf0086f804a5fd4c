//! # error.rs
//!
//! Error type shared by every stage of the engine.
//!
//! Each component returns an [`EvalError`] to its caller instead of a sentinel
//! value. Only the graph sampler swallows errors, and only per sample.

/// Failure produced while parsing, evaluating, solving or differentiating.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// Malformed expression text.
    #[error("syntax error: {0}")]
    SyntaxError(String),

    /// A free identifier that is neither bound nor a constant.
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    #[error("division by zero")]
    DivisionByZero,

    /// Value outside the supported domain, including non-finite results.
    #[error("domain error: {0}")]
    DomainError(String),

    /// An equation without a single `=` separator.
    #[error("malformed equation: {0}")]
    MalformedEquation(String),

    /// The linear solver found a zero slope.
    #[error("degenerate equation: no unique solution")]
    DegenerateEquation,

    /// The grammar accepted the input but the engine has no rule for it.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(EvalError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            EvalError::UnknownIdentifier("y".into()).to_string(),
            "unknown identifier: y"
        );
        assert_eq!(
            EvalError::SyntaxError("missing ) at 0..1".into()).to_string(),
            "syntax error: missing ) at 0..1"
        );
    }
}
