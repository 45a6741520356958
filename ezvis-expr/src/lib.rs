//! # ezvis expression engine
//!
//! Parser, evaluator and normalizer for Accumulo-style visibility markings
//! such as `A&(B|C)`.
//!
//! This crate provides:
//! - `Expression`, a tagged tree over `Term`/`And`/`Or`, produced by a
//!   recursive-descent parser that rejects unparenthesized operator mixing
//! - grant/deny evaluation against any `HeldTerms` set
//! - disjunctive normal form (`NormalForm`) with configurable clause and term bounds,
//!   suitable for building downstream redaction predicates
//!
//! ```rust
//! use std::collections::HashSet;
//! use ezvis_expr::ExpressionEngine;
//!
//! let engine = ExpressionEngine::default();
//! let expr = engine.parse("A&B&(AUS|CAN|USA)").expect("valid marking");
//!
//! let held: HashSet<String> = ["A", "B", "CAN"].into_iter().map(String::from).collect();
//! assert!(engine.evaluate(expr.as_ref(), &held));
//!
//! let form = engine.normalize(expr.as_ref()).expect("bounded");
//! assert_eq!(form.len(), 3);
//! ```

pub mod config;
pub mod engine;
pub mod error;
mod normalize;
mod parse;
pub mod types;

pub use config::{
    ConfigError, EngineConfig, LimitsConfig, DEFAULT_MAX_CLAUSES, DEFAULT_MAX_DEPTH,
    DEFAULT_MAX_TERMS,
};
pub use engine::ExpressionEngine;
pub use error::{ComplexityBound, EmptyTermError, ExpressionError, SyntaxErrorKind};
pub use types::{Clause, Expression, HeldTerms, NormalForm, Term};
