//! Tokenizer for marking text.
//!
//! Whitespace is not skipped: any byte outside a quoted term that is not an
//! operator, a parenthesis or a bare-term character is rejected.

use crate::error::{ExpressionError, SyntaxErrorKind};
use crate::types::{is_bare_byte, Term};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum TokenKind {
    And,
    Or,
    Open,
    Close,
    Term(Term),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token's first character.
    pub position: usize,
}

pub(super) fn tokenize(input: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        let kind = match c {
            '&' => TokenKind::And,
            '|' => TokenKind::Or,
            '(' => TokenKind::Open,
            ')' => TokenKind::Close,
            '"' => TokenKind::Term(quoted(position, &mut chars)?),
            c if c.is_ascii() && is_bare_byte(c as u8) => {
                let mut end = position + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if !(next.is_ascii() && is_bare_byte(next as u8)) {
                        break;
                    }
                    end = i + next.len_utf8();
                    chars.next();
                }
                TokenKind::Term(Term::from_lexed(input[position..end].to_string()))
            }
            other => {
                return Err(ExpressionError::syntax(
                    position,
                    SyntaxErrorKind::UnexpectedCharacter(other),
                ))
            }
        };
        tokens.push(Token { kind, position });
    }

    Ok(tokens)
}

fn quoted(
    start: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<Term, ExpressionError> {
    let mut value = String::new();
    loop {
        match chars.next() {
            None => {
                return Err(ExpressionError::syntax(
                    start,
                    SyntaxErrorKind::UnterminatedQuote,
                ))
            }
            Some((_, '"')) => break,
            Some((i, '\\')) => match chars.next() {
                Some((_, escaped @ ('"' | '\\'))) => value.push(escaped),
                Some((_, other)) => {
                    return Err(ExpressionError::syntax(
                        i,
                        SyntaxErrorKind::InvalidEscape(other),
                    ))
                }
                None => {
                    return Err(ExpressionError::syntax(
                        start,
                        SyntaxErrorKind::UnterminatedQuote,
                    ))
                }
            },
            Some((_, c)) => value.push(c),
        }
    }

    if value.is_empty() {
        return Err(ExpressionError::syntax(start, SyntaxErrorKind::EmptyTerm));
    }
    Ok(Term::from_lexed(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> Term {
        Term::new(s).expect("non-empty term")
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .expect("should tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn error_kind(input: &str) -> SyntaxErrorKind {
        tokenize(input)
            .expect_err("should fail")
            .syntax_kind()
            .cloned()
            .expect("syntax error")
    }

    #[test]
    fn test_operators_and_bare_terms() {
        assert_eq!(
            kinds("AB&(c_1|d-2)"),
            vec![
                TokenKind::Term(term("AB")),
                TokenKind::And,
                TokenKind::Open,
                TokenKind::Term(term("c_1")),
                TokenKind::Or,
                TokenKind::Term(term("d-2")),
                TokenKind::Close,
            ]
        );
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let tokens = tokenize("\"é\"&B").expect("should tokenize");
        assert_eq!(tokens[1].position, 4);
        assert_eq!(tokens[2].position, 5);
    }

    #[test]
    fn test_quoted_term_with_escapes() {
        assert_eq!(
            kinds(r#""a \"b\" \\ c""#),
            vec![TokenKind::Term(term(r#"a "b" \ c"#))]
        );
    }

    #[test]
    fn test_whitespace_rejected() {
        assert_eq!(error_kind("A & B"), SyntaxErrorKind::UnexpectedCharacter(' '));
        assert_eq!(error_kind(" A"), SyntaxErrorKind::UnexpectedCharacter(' '));
    }

    #[test]
    fn test_quote_errors() {
        assert_eq!(error_kind("\"abc"), SyntaxErrorKind::UnterminatedQuote);
        assert_eq!(error_kind("\"abc\\"), SyntaxErrorKind::UnterminatedQuote);
        assert_eq!(error_kind(r#""a\nb""#), SyntaxErrorKind::InvalidEscape('n'));
        assert_eq!(error_kind("\"\""), SyntaxErrorKind::EmptyTerm);
    }

    #[test]
    fn test_non_ascii_outside_quotes_rejected() {
        assert_eq!(error_kind("café"), SyntaxErrorKind::UnexpectedCharacter('é'));
    }
}
