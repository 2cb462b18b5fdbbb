//! Operator and punctuation lexing.
//!
//! Two-character operators disambiguate by a single byte of lookahead.

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    pub(crate) fn lex_operator(&mut self) -> Token {
        let line = self.reader.current_line();
        let first = self.reader.advance();

        let (kind, lexeme): (TokenKind, &'static str) = match first {
            b'+' => (TokenKind::Plus, "+"),
            b'-' => (TokenKind::Minus, "-"),
            b'*' => (TokenKind::Star, "*"),
            b'/' => (TokenKind::Slash, "/"),
            b'^' => (TokenKind::Caret, "^"),
            b'(' => (TokenKind::LParen, "("),
            b')' => (TokenKind::RParen, ")"),
            b'{' => (TokenKind::LBrace, "{"),
            b'}' => (TokenKind::RBrace, "}"),
            b'[' => (TokenKind::LBracket, "["),
            b']' => (TokenKind::RBracket, "]"),
            b';' => (TokenKind::Semicolon, ";"),
            b',' => (TokenKind::Comma, ","),
            b'=' => {
                if self.reader.peek() == b'=' {
                    self.reader.advance();
                    (TokenKind::EqEq, "==")
                } else {
                    (TokenKind::Assign, "=")
                }
            }
            b'<' => {
                if self.reader.peek() == b'=' {
                    self.reader.advance();
                    (TokenKind::LtEq, "<=")
                } else if self.reader.peek() == b'>' {
                    self.reader.advance();
                    (TokenKind::NotEq, "<>")
                } else {
                    (TokenKind::Lt, "<")
                }
            }
            b'>' => {
                if self.reader.peek() == b'=' {
                    self.reader.advance();
                    (TokenKind::GtEq, ">=")
                } else {
                    (TokenKind::Gt, ">")
                }
            }
            _ => unreachable!("lex_operator dispatched on a non-operator byte"),
        };

        Token::new(kind, lexeme, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tupi_util::DiagnosticBag;

    fn lex_all(source: &str) -> Vec<Token> {
        let mut bag = DiagnosticBag::new();
        let lexer = Lexer::new(source, &mut bag);
        lexer.collect()
    }

    #[test]
    fn disambiguates_by_one_byte_lookahead() {
        let kinds: Vec<_> = lex_all("= == < <= <> > >=").into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Assign,
                TokenKind::EqEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::NotEq,
                TokenKind::Gt,
                TokenKind::GtEq,
            ]
        );
    }

    #[test]
    fn lone_slash_is_division() {
        let tokens = lex_all("/");
        assert_eq!(tokens[0].kind, TokenKind::Slash);
    }
}
