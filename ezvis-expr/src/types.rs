//! Core types for the expression engine.
//!
//! Provides the security `Term`, the `Expression` tree produced by the parser,
//! the `Clause`/`NormalForm` pair produced by normalization, and the
//! `HeldTerms` trait that evaluation is generic over.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};

use crate::error::EmptyTermError;

/// An opaque security tag.
///
/// Never empty. Terms are compared by exact byte equality: no case folding,
/// no trimming. Bare terms are drawn from `[A-Za-z0-9_-]+`; anything else must
/// be quoted in marking text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Term(String);

impl Term {
    /// Build a term, rejecting the empty string.
    pub fn new(term: impl Into<String>) -> Result<Self, EmptyTermError> {
        let term = term.into();
        if term.is_empty() {
            return Err(EmptyTermError);
        }
        Ok(Self(term))
    }

    /// Callers guarantee `term` is non-empty.
    pub(crate) fn from_lexed(term: String) -> Self {
        debug_assert!(!term.is_empty());
        Self(term)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether this term can be written without quotes.
    pub fn is_bare(&self) -> bool {
        self.0.bytes().all(is_bare_byte)
    }
}

pub(crate) fn is_bare_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_bare() {
            return f.write_str(&self.0);
        }
        f.write_str("\"")?;
        for c in self.0.chars() {
            if c == '"' || c == '\\' {
                f.write_str("\\")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str("\"")
    }
}

impl Borrow<str> for Term {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Term {
    type Error = EmptyTermError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Term::new(s)
    }
}

impl TryFrom<String> for Term {
    type Error = EmptyTermError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Term::new(s)
    }
}

/// A parsed visibility marking.
///
/// `And` and `Or` always carry at least two children; the parser collapses
/// parenthesized singletons into their inner node. An `Or` may hold an `And`
/// child (and vice versa) only when the source text parenthesized it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    Term(Term),
    And(Vec<Expression>),
    Or(Vec<Expression>),
}

impl Expression {
    /// Evaluate this expression against the terms a requester holds.
    pub fn evaluate<H: HeldTerms + ?Sized>(&self, held: &H) -> bool {
        match self {
            Expression::Term(term) => held.holds(term.as_str()),
            Expression::And(children) => children.iter().all(|c| c.evaluate(held)),
            Expression::Or(children) => children.iter().any(|c| c.evaluate(held)),
        }
    }

    /// Distinct terms in first-occurrence order.
    pub fn terms(&self) -> Vec<&Term> {
        let mut out = Vec::new();
        self.collect_terms(&mut HashSet::new(), &mut out);
        out
    }

    fn collect_terms<'a>(&'a self, seen: &mut HashSet<&'a Term>, out: &mut Vec<&'a Term>) {
        match self {
            Expression::Term(term) => {
                if seen.insert(term) {
                    out.push(term);
                }
            }
            Expression::And(children) | Expression::Or(children) => {
                for child in children {
                    child.collect_terms(seen, out);
                }
            }
        }
    }

    /// Nesting depth; a lone term has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Expression::Term(_) => 1,
            Expression::And(children) | Expression::Or(children) => {
                1 + children.iter().map(Expression::depth).max().unwrap_or(0)
            }
        }
    }

    fn fmt_child(child: &Expression, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match child {
            Expression::Term(term) => write!(f, "{term}"),
            _ => write!(f, "({child})"),
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (children, op) = match self {
            Expression::Term(term) => return write!(f, "{term}"),
            Expression::And(children) => (children, "&"),
            Expression::Or(children) => (children, "|"),
        };
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(op)?;
            }
            Expression::fmt_child(child, f)?;
        }
        Ok(())
    }
}

/// A conjunction of terms inside a `NormalForm`.
///
/// Never empty. Term order is parse order with duplicates removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Term>")]
pub struct Clause(Vec<Term>);

impl Clause {
    /// Build a clause, dropping repeated terms. Returns `None` for an empty input.
    pub fn new(terms: impl IntoIterator<Item = Term>) -> Option<Self> {
        let mut seen = HashSet::new();
        let out: Vec<Term> = terms
            .into_iter()
            .filter(|term| seen.insert(term.clone()))
            .collect();
        if out.is_empty() {
            None
        } else {
            Some(Self(out))
        }
    }

    pub(crate) fn from_deduped(terms: Vec<Term>) -> Self {
        Self(terms)
    }

    pub fn terms(&self) -> &[Term] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True iff every term in the clause is held.
    pub fn evaluate<H: HeldTerms + ?Sized>(&self, held: &H) -> bool {
        self.0.iter().all(|t| held.holds(t.as_str()))
    }

    fn to_expression(&self) -> Expression {
        if self.0.len() == 1 {
            Expression::Term(self.0[0].clone())
        } else {
            Expression::And(self.0.iter().cloned().map(Expression::Term).collect())
        }
    }
}

impl TryFrom<Vec<Term>> for Clause {
    type Error = String;

    fn try_from(terms: Vec<Term>) -> Result<Self, Self::Error> {
        Clause::new(terms).ok_or_else(|| "clause must contain at least one term".to_string())
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, term) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

/// Disjunctive normal form: an OR of AND-clauses.
///
/// An empty `NormalForm` is only produced for an absent marking and means
/// "unconditionally visible", never "never visible".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalForm(Vec<Clause>);

impl NormalForm {
    pub(crate) fn from_clauses(clauses: Vec<Clause>) -> Self {
        Self(clauses)
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this form came from an absent marking (no clauses at all).
    pub fn is_unconditional(&self) -> bool {
        self.0.is_empty()
    }

    /// OR over clauses of AND over terms. An unconditional form is always satisfied.
    pub fn evaluate<H: HeldTerms + ?Sized>(&self, held: &H) -> bool {
        self.is_unconditional() || self.0.iter().any(|c| c.evaluate(held))
    }

    /// Rebuild an OR-of-ANDs expression tree from the clauses.
    pub fn to_expression(&self) -> Option<Expression> {
        match self.0.as_slice() {
            [] => None,
            [only] => Some(only.to_expression()),
            clauses => Some(Expression::Or(
                clauses.iter().map(Clause::to_expression).collect(),
            )),
        }
    }

    /// Nested string lists for building a downstream redaction predicate.
    ///
    /// A single-term marking still yields one wrapped clause (`[["U"]]`);
    /// an absent marking yields an empty list.
    pub fn into_redaction_list(self) -> Vec<Vec<String>> {
        self.0
            .into_iter()
            .map(|clause| clause.0.into_iter().map(Term::into_string).collect())
            .collect()
    }
}

impl std::fmt::Display for NormalForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, clause) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            if clause.len() > 1 && self.0.len() > 1 {
                write!(f, "({clause})")?;
            } else {
                write!(f, "{clause}")?;
            }
        }
        Ok(())
    }
}

/// The set of terms a requester holds, as seen by evaluation.
///
/// Implemented for the set types adapters typically decode authorizations into.
pub trait HeldTerms {
    /// Whether the requester holds `term`.
    fn holds(&self, term: &str) -> bool;
}

impl<S: BuildHasher> HeldTerms for HashSet<Term, S> {
    fn holds(&self, term: &str) -> bool {
        self.contains(term)
    }
}

impl<S: BuildHasher> HeldTerms for HashSet<String, S> {
    fn holds(&self, term: &str) -> bool {
        self.contains(term)
    }
}

impl HeldTerms for BTreeSet<Term> {
    fn holds(&self, term: &str) -> bool {
        self.contains(term)
    }
}

impl HeldTerms for BTreeSet<String> {
    fn holds(&self, term: &str) -> bool {
        self.contains(term)
    }
}

impl HeldTerms for [Term] {
    fn holds(&self, term: &str) -> bool {
        self.iter().any(|t| t.as_str() == term)
    }
}
