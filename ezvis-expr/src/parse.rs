//! Recursive-descent parser for visibility markings.
//!
//! Grammar:
//!
//! ```text
//! expr   := atom (op atom)*      where every op at one level is the same
//! atom   := term | '(' expr ')'
//! ```
//!
//! Mixing `&` and `|` at one nesting level is rejected rather than resolved
//! by precedence, so `A&B|C` fails while `(A&B)|C` and `A&(B|C)` parse.

mod lexer;

use std::iter::Peekable;
use std::vec::IntoIter;

use lexer::{Token, TokenKind};

use crate::error::{ExpressionError, SyntaxErrorKind};
use crate::types::Expression;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    And,
    Or,
}

/// Parse marking text. Empty input yields `Ok(None)`.
pub(crate) fn parse(text: &str, max_depth: usize) -> Result<Option<Expression>, ExpressionError> {
    if text.is_empty() {
        return Ok(None);
    }

    let tokens = lexer::tokenize(text)?;
    let mut parser = Parser {
        tokens: tokens.into_iter().peekable(),
        end: text.len(),
        max_depth,
    };

    let expr = parser.expression(0)?;
    if let Some(token) = parser.tokens.peek() {
        // Only a stray ')' can stop the top level early.
        return Err(ExpressionError::syntax(
            token.position,
            SyntaxErrorKind::UnbalancedParenthesis,
        ));
    }

    Ok(Some(expr))
}

struct Parser {
    tokens: Peekable<IntoIter<Token>>,
    end: usize,
    max_depth: usize,
}

impl Parser {
    fn expression(&mut self, depth: usize) -> Result<Expression, ExpressionError> {
        let mut children = vec![self.atom(depth, false)?];
        let mut operator: Option<Operator> = None;

        while let Some(token) = self.tokens.peek() {
            let position = token.position;
            let next = match token.kind {
                TokenKind::And => Operator::And,
                TokenKind::Or => Operator::Or,
                TokenKind::Close => break,
                TokenKind::Open | TokenKind::Term(_) => {
                    return Err(ExpressionError::syntax(
                        position,
                        SyntaxErrorKind::MissingOperator,
                    ))
                }
            };

            match operator {
                Some(current) if current != next => {
                    return Err(ExpressionError::syntax(
                        position,
                        SyntaxErrorKind::MixedOperators,
                    ))
                }
                _ => operator = Some(next),
            }

            self.tokens.next();
            children.push(self.atom(depth, true)?);
        }

        Ok(match operator {
            None => children.remove(0),
            Some(Operator::And) => Expression::And(children),
            Some(Operator::Or) => Expression::Or(children),
        })
    }

    fn atom(&mut self, depth: usize, after_operator: bool) -> Result<Expression, ExpressionError> {
        let Some(token) = self.tokens.next() else {
            let kind = if after_operator || depth == 0 {
                SyntaxErrorKind::EmptyAtom
            } else {
                SyntaxErrorKind::UnbalancedParenthesis
            };
            return Err(ExpressionError::syntax(self.end, kind));
        };

        match token.kind {
            TokenKind::Term(term) => Ok(Expression::Term(term)),
            TokenKind::Open => {
                if depth >= self.max_depth {
                    return Err(ExpressionError::syntax(
                        token.position,
                        SyntaxErrorKind::NestingTooDeep {
                            limit: self.max_depth,
                        },
                    ));
                }
                if matches!(self.tokens.peek(), Some(t) if t.kind == TokenKind::Close) {
                    return Err(ExpressionError::syntax(
                        token.position,
                        SyntaxErrorKind::EmptyAtom,
                    ));
                }

                let inner = self.expression(depth + 1)?;
                match self.tokens.next() {
                    Some(Token {
                        kind: TokenKind::Close,
                        ..
                    }) => Ok(inner),
                    _ => Err(ExpressionError::syntax(
                        token.position,
                        SyntaxErrorKind::UnbalancedParenthesis,
                    )),
                }
            }
            TokenKind::And | TokenKind::Or => {
                let kind = if after_operator {
                    SyntaxErrorKind::DoubleOperator
                } else {
                    SyntaxErrorKind::EmptyAtom
                };
                Err(ExpressionError::syntax(token.position, kind))
            }
            TokenKind::Close => {
                let kind = if depth == 0 {
                    SyntaxErrorKind::UnbalancedParenthesis
                } else {
                    SyntaxErrorKind::EmptyAtom
                };
                Err(ExpressionError::syntax(token.position, kind))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Term;

    const DEPTH: usize = 16;

    fn parse_ok(text: &str) -> Expression {
        parse(text, DEPTH)
            .expect("should parse")
            .expect("should not be empty")
    }

    fn parse_err(text: &str) -> (usize, SyntaxErrorKind) {
        match parse(text, DEPTH) {
            Err(ExpressionError::Syntax { position, kind }) => (position, kind),
            other => panic!("expected syntax error for {text:?}, got {other:?}"),
        }
    }

    fn t(s: &str) -> Expression {
        Expression::Term(Term::new(s).expect("non-empty term"))
    }

    #[test]
    fn test_empty_input_is_absent() {
        assert_eq!(parse("", DEPTH).expect("should parse"), None);
    }

    #[test]
    fn test_single_term() {
        assert_eq!(parse_ok("U"), t("U"));
    }

    #[test]
    fn test_flat_and_or() {
        assert_eq!(parse_ok("A&B&C"), Expression::And(vec![t("A"), t("B"), t("C")]));
        assert_eq!(parse_ok("A|B"), Expression::Or(vec![t("A"), t("B")]));
    }

    #[test]
    fn test_parenthesized_mixing() {
        assert_eq!(
            parse_ok("(A&B)|C"),
            Expression::Or(vec![Expression::And(vec![t("A"), t("B")]), t("C")])
        );
        assert_eq!(
            parse_ok("A&(B|C)"),
            Expression::And(vec![t("A"), Expression::Or(vec![t("B"), t("C")])])
        );
    }

    #[test]
    fn test_singleton_parentheses_collapse() {
        assert_eq!(parse_ok("((A))"), t("A"));
        assert_eq!(parse_ok("(A)&B"), Expression::And(vec![t("A"), t("B")]));
    }

    #[test]
    fn test_same_operator_nesting_is_kept() {
        assert_eq!(
            parse_ok("(A&B)&C"),
            Expression::And(vec![Expression::And(vec![t("A"), t("B")]), t("C")])
        );
    }

    #[test]
    fn test_mixed_operators_rejected() {
        assert_eq!(parse_err("A&B|C"), (3, SyntaxErrorKind::MixedOperators));
        assert_eq!(parse_err("A|B&C"), (3, SyntaxErrorKind::MixedOperators));
        assert_eq!(parse_err("(A&B|C)"), (4, SyntaxErrorKind::MixedOperators));
    }

    #[test]
    fn test_parenthesis_errors() {
        assert_eq!(parse_err("(A"), (0, SyntaxErrorKind::UnbalancedParenthesis));
        assert_eq!(parse_err("A)"), (1, SyntaxErrorKind::UnbalancedParenthesis));
        assert_eq!(parse_err("("), (1, SyntaxErrorKind::UnbalancedParenthesis));
        assert_eq!(parse_err(")"), (0, SyntaxErrorKind::UnbalancedParenthesis));
        assert_eq!(parse_err("()"), (0, SyntaxErrorKind::EmptyAtom));
        assert_eq!(parse_err("(A|)"), (3, SyntaxErrorKind::EmptyAtom));
    }

    #[test]
    fn test_operator_errors() {
        assert_eq!(parse_err("A&&B"), (2, SyntaxErrorKind::DoubleOperator));
        assert_eq!(parse_err("A|&B"), (2, SyntaxErrorKind::DoubleOperator));
        assert_eq!(parse_err("&A"), (0, SyntaxErrorKind::EmptyAtom));
        assert_eq!(parse_err("A&"), (2, SyntaxErrorKind::EmptyAtom));
        assert_eq!(parse_err("|"), (0, SyntaxErrorKind::EmptyAtom));
    }

    #[test]
    fn test_missing_operator() {
        assert_eq!(parse_err("A(B)"), (1, SyntaxErrorKind::MissingOperator));
        assert_eq!(parse_err("(A)B"), (3, SyntaxErrorKind::MissingOperator));
        assert_eq!(parse_err("A\"B\""), (1, SyntaxErrorKind::MissingOperator));
    }

    #[test]
    fn test_nesting_bound() {
        let ok = format!("{}A{}", "(".repeat(DEPTH), ")".repeat(DEPTH));
        assert_eq!(parse_ok(&ok), t("A"));

        let too_deep = format!("{}A{}", "(".repeat(DEPTH + 1), ")".repeat(DEPTH + 1));
        assert_eq!(
            parse_err(&too_deep),
            (DEPTH, SyntaxErrorKind::NestingTooDeep { limit: DEPTH })
        );
    }

    #[test]
    fn test_quoted_terms_in_expression() {
        assert_eq!(
            parse_ok("\"five eyes\"&USA"),
            Expression::And(vec![t("five eyes"), t("USA")])
        );
    }
}
