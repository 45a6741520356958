//! Disjunctive normal form expansion.
//!
//! AND distributes over OR: `A&(B|C)` becomes `(A&B)|(A&C)`. Nested nodes of
//! the same kind flatten. Clause order and term order follow the source
//! text. The expansion is exponential in the worst case, so the running
//! clause count is checked before allocating and the running term count is
//! checked as terms are added.
//!
//! Clauses borrow their terms from the tree while expanding; owned terms
//! are cloned once, when the final form is built.

use std::collections::HashSet;

use crate::config::LimitsConfig;
use crate::error::ExpressionError;
use crate::types::{Clause, Expression, NormalForm, Term};

pub(crate) fn normalize(
    expr: &Expression,
    limits: &LimitsConfig,
) -> Result<NormalForm, ExpressionError> {
    let expansion = Expander { limits }.expand(expr)?;
    Ok(NormalForm::from_clauses(
        expansion
            .clauses
            .into_iter()
            .map(|conjunct| Clause::from_deduped(conjunct.terms.into_iter().cloned().collect()))
            .collect(),
    ))
}

/// A clause under construction. `seen` mirrors `terms` for O(1) dedupe.
#[derive(Clone, Default)]
struct Conjunct<'a> {
    terms: Vec<&'a Term>,
    seen: HashSet<&'a Term>,
}

impl<'a> Conjunct<'a> {
    /// Returns whether the term was new to this clause.
    fn push(&mut self, term: &'a Term) -> bool {
        let added = self.seen.insert(term);
        if added {
            self.terms.push(term);
        }
        added
    }
}

struct Expansion<'a> {
    clauses: Vec<Conjunct<'a>>,
    /// Sum of `terms.len()` over `clauses`.
    terms: usize,
}

struct Expander<'l> {
    limits: &'l LimitsConfig,
}

impl Expander<'_> {
    fn expand<'a>(&self, expr: &'a Expression) -> Result<Expansion<'a>, ExpressionError> {
        match expr {
            Expression::Term(term) => {
                self.check_clauses(1)?;
                self.check_terms(1)?;
                let mut conjunct = Conjunct::default();
                conjunct.push(term);
                Ok(Expansion {
                    clauses: vec![conjunct],
                    terms: 1,
                })
            }
            Expression::Or(children) => {
                let mut out = Expansion {
                    clauses: Vec::new(),
                    terms: 0,
                };
                for child in children {
                    let expansion = self.expand(child)?;
                    self.check_clauses(out.clauses.len().saturating_add(expansion.clauses.len()))?;
                    self.check_terms(out.terms.saturating_add(expansion.terms))?;
                    out.terms += expansion.terms;
                    out.clauses.extend(expansion.clauses);
                }
                Ok(out)
            }
            Expression::And(children) => {
                self.check_clauses(1)?;
                let mut acc = Expansion {
                    clauses: vec![Conjunct::default()],
                    terms: 0,
                };
                for child in children {
                    match child {
                        Expression::Term(term) => self.conjoin_term(&mut acc, term)?,
                        _ => {
                            let right = self.expand(child)?;
                            match right.clauses.as_slice() {
                                [single] => self.conjoin_clause(&mut acc, single)?,
                                _ => acc = self.distribute(&acc, &right)?,
                            }
                        }
                    }
                }
                Ok(acc)
            }
        }
    }

    /// Add one term to every accumulated clause in place.
    fn conjoin_term<'a>(
        &self,
        acc: &mut Expansion<'a>,
        term: &'a Term,
    ) -> Result<(), ExpressionError> {
        for conjunct in &mut acc.clauses {
            if conjunct.push(term) {
                acc.terms += 1;
                self.check_terms(acc.terms)?;
            }
        }
        Ok(())
    }

    /// Extend every accumulated clause in place with a single right-hand clause.
    fn conjoin_clause<'a>(
        &self,
        acc: &mut Expansion<'a>,
        right: &Conjunct<'a>,
    ) -> Result<(), ExpressionError> {
        for &term in &right.terms {
            self.conjoin_term(acc, term)?;
        }
        Ok(())
    }

    /// Cross product of two clause lists, left-major.
    fn distribute<'a>(
        &self,
        left: &Expansion<'a>,
        right: &Expansion<'a>,
    ) -> Result<Expansion<'a>, ExpressionError> {
        let count = left
            .clauses
            .len()
            .checked_mul(right.clauses.len())
            .ok_or_else(|| ExpressionError::too_many_clauses(self.limits.max_clauses))?;
        self.check_clauses(count)?;

        let mut out = Expansion {
            clauses: Vec::with_capacity(count),
            terms: 0,
        };
        for l in &left.clauses {
            for r in &right.clauses {
                let mut conjunct = l.clone();
                for &term in &r.terms {
                    conjunct.push(term);
                }
                out.terms = out.terms.saturating_add(conjunct.terms.len());
                self.check_terms(out.terms)?;
                out.clauses.push(conjunct);
            }
        }
        Ok(out)
    }

    fn check_clauses(&self, count: usize) -> Result<(), ExpressionError> {
        if count > self.limits.max_clauses {
            return Err(ExpressionError::too_many_clauses(self.limits.max_clauses));
        }
        Ok(())
    }

    fn check_terms(&self, count: usize) -> Result<(), ExpressionError> {
        if count > self.limits.max_terms {
            return Err(ExpressionError::too_many_terms(self.limits.max_terms));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComplexityBound;
    use crate::parse::parse;

    fn limits(max_clauses: usize, max_terms: usize) -> LimitsConfig {
        LimitsConfig {
            max_clauses,
            max_terms,
            ..LimitsConfig::default()
        }
    }

    fn parsed(text: &str) -> Expression {
        parse(text, 64)
            .expect("should parse")
            .expect("should not be empty")
    }

    fn nf(text: &str) -> Vec<Vec<String>> {
        normalize(&parsed(text), &LimitsConfig::default())
            .expect("should normalize")
            .into_redaction_list()
    }

    fn clauses(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|c| c.iter().map(|t| t.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_single_term_is_wrapped() {
        assert_eq!(nf("U"), clauses(&[&["U"]]));
    }

    #[test]
    fn test_and_of_or_distributes() {
        assert_eq!(
            nf("A&B&(AUS|CAN|USA)"),
            clauses(&[&["A", "B", "AUS"], &["A", "B", "CAN"], &["A", "B", "USA"]])
        );
    }

    #[test]
    fn test_or_of_and_is_flat() {
        assert_eq!(nf("(A&B)|C"), clauses(&[&["A", "B"], &["C"]]));
    }

    #[test]
    fn test_nested_same_operator_flattens() {
        assert_eq!(nf("(A&B)&C"), clauses(&[&["A", "B", "C"]]));
        assert_eq!(nf("(A|B)|C"), clauses(&[&["A"], &["B"], &["C"]]));
    }

    #[test]
    fn test_product_of_ors() {
        assert_eq!(
            nf("(A|B)&(C|D)"),
            clauses(&[&["A", "C"], &["A", "D"], &["B", "C"], &["B", "D"]])
        );
    }

    #[test]
    fn test_repeated_terms_collapse_within_clause() {
        assert_eq!(nf("A&(A|B)"), clauses(&[&["A"], &["A", "B"]]));
    }

    #[test]
    fn test_clause_bound() {
        // 2^4 = 16 clauses
        let expr = parsed("(A|B)&(C|D)&(E|F)&(G|H)");
        assert_eq!(
            normalize(&expr, &limits(16, 1_000)).expect("at the bound").len(),
            16
        );
        assert_eq!(
            normalize(&expr, &limits(15, 1_000)),
            Err(ExpressionError::TooComplex {
                bound: ComplexityBound::Clauses,
                limit: 15
            })
        );
    }

    #[test]
    fn test_or_bound() {
        assert_eq!(
            normalize(&parsed("A|B|C"), &limits(2, 1_000)),
            Err(ExpressionError::too_many_clauses(2))
        );
    }

    #[test]
    fn test_single_term_respects_bounds() {
        let expr = parsed("U");
        assert_eq!(
            normalize(&expr, &limits(0, 1_000)),
            Err(ExpressionError::too_many_clauses(0))
        );
        assert_eq!(
            normalize(&expr, &limits(1, 0)),
            Err(ExpressionError::too_many_terms(0))
        );
        assert_eq!(normalize(&expr, &limits(1, 1)).expect("at the bound").len(), 1);
    }

    #[test]
    fn test_term_bound() {
        // 4 clauses of 4 terms each
        let expr = parsed("(A|B)&(C|D)&E&F");
        assert_eq!(
            normalize(&expr, &limits(4, 16)).expect("at the bound").len(),
            4
        );
        assert_eq!(
            normalize(&expr, &limits(4, 15)),
            Err(ExpressionError::too_many_terms(15))
        );
    }

    #[test]
    fn test_term_bound_counts_after_dedupe() {
        assert_eq!(nf("A&A&A&(B|C)"), clauses(&[&["A", "B"], &["A", "C"]]));
        assert!(normalize(&parsed("A&A&A&(B|C)"), &limits(2, 4)).is_ok());
    }

    #[test]
    fn test_single_clause_right_side_extends_in_place() {
        assert_eq!(
            nf("(A|B)&(C&D)&C"),
            clauses(&[&["A", "C", "D"], &["B", "C", "D"]])
        );
    }
}
