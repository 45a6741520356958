//! Error types for the expression engine.

use thiserror::Error;

/// What was wrong with a marking string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),

    #[error("unterminated quoted term")]
    UnterminatedQuote,

    /// Only `\"` and `\\` are legal inside a quoted term.
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    #[error("empty quoted term")]
    EmptyTerm,

    #[error("unbalanced parenthesis")]
    UnbalancedParenthesis,

    #[error("empty atom")]
    EmptyAtom,

    #[error("two operators in a row")]
    DoubleOperator,

    #[error("missing operator between atoms")]
    MissingOperator,

    /// `&` and `|` at the same nesting level without parentheses.
    #[error("ambiguous mixed operators; parenthesize one side")]
    MixedOperators,

    #[error("parentheses nested deeper than {limit}")]
    NestingTooDeep { limit: usize },
}

/// A term was built from the empty string.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("term must not be empty")]
pub struct EmptyTermError;

/// Which normalization bound was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityBound {
    /// `limits.max_clauses`
    Clauses,
    /// `limits.max_terms`, counted across all clauses.
    Terms,
}

impl std::fmt::Display for ComplexityBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplexityBound::Clauses => f.write_str("clauses"),
            ComplexityBound::Terms => f.write_str("terms"),
        }
    }
}

/// Errors from parsing and normalizing markings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// Malformed marking text. Never repaired.
    #[error("syntax error at byte {position}: {kind}")]
    Syntax {
        position: usize,
        kind: SyntaxErrorKind,
    },

    /// Normalization would exceed a configured bound.
    #[error("expression too complex: normal form exceeds {limit} {bound}")]
    TooComplex { bound: ComplexityBound, limit: usize },
}

impl ExpressionError {
    pub(crate) fn syntax(position: usize, kind: SyntaxErrorKind) -> Self {
        ExpressionError::Syntax { position, kind }
    }

    pub(crate) fn too_many_clauses(limit: usize) -> Self {
        ExpressionError::TooComplex {
            bound: ComplexityBound::Clauses,
            limit,
        }
    }

    pub(crate) fn too_many_terms(limit: usize) -> Self {
        ExpressionError::TooComplex {
            bound: ComplexityBound::Terms,
            limit,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ExpressionError::Syntax { .. })
    }

    pub fn is_too_complex(&self) -> bool {
        matches!(self, ExpressionError::TooComplex { .. })
    }

    /// The syntax error kind, if this is a syntax error.
    pub fn syntax_kind(&self) -> Option<&SyntaxErrorKind> {
        match self {
            ExpressionError::Syntax { kind, .. } => Some(kind),
            ExpressionError::TooComplex { .. } => None,
        }
    }
}
