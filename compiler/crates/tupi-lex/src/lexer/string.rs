//! String literal lexing.
//!
//! Bytes are accumulated raw rather than char-by-char so that extended
//! (non-ASCII) bytes inside the literal survive unmodified instead of being
//! reinterpreted one byte at a time.

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

const MAX_STRING_LEXEME: usize = 512;

impl<'a> Lexer<'a> {
    pub(crate) fn lex_string(&mut self) -> Token {
        let line = self.reader.current_line();
        self.reader.advance();

        let mut raw = Vec::new();
        loop {
            if self.reader.is_at_end() {
                self.report_fatal(line, "string sem terminação");
                return Token::eof(line);
            }

            let c = self.reader.peek();
            if c == b'"' {
                self.reader.advance();
                break;
            }

            if c == b'\\' {
                raw.push(self.reader.advance());
                if self.reader.is_at_end() {
                    self.report_fatal(line, "string sem terminação");
                    return Token::eof(line);
                }
                raw.push(self.reader.advance());
            } else {
                raw.push(self.reader.advance());
            }

            if raw.len() >= MAX_STRING_LEXEME {
                self.report_fatal(line, "string muito longa");
                return Token::eof(line);
            }
        }

        let lexeme = String::from_utf8(raw.clone())
            .unwrap_or_else(|_| String::from_utf8_lossy(&raw).into_owned());
        Token::new(TokenKind::StringLiteral, lexeme, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tupi_util::{DiagnosticBag, Stage};

    fn lex_one(source: &str) -> (Token, DiagnosticBag) {
        let mut bag = DiagnosticBag::new();
        let token = {
            let mut lexer = Lexer::new(source, &mut bag);
            lexer.next_token()
        };
        (token, bag)
    }

    #[test]
    fn plain_string() {
        let (token, bag) = lex_one("\"ola\"");
        assert!(bag.is_empty());
        assert_eq!(token, Token::new(TokenKind::StringLiteral, "ola", 1));
    }

    #[test]
    fn escape_keeps_both_bytes() {
        let (token, bag) = lex_one("\"a\\nb\"");
        assert!(bag.is_empty());
        assert_eq!(token.lexeme, "a\\nb");
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let (_, bag) = lex_one("\"sem fim");
        assert!(bag.has_fatal_in(Stage::Lexical));
    }

    #[test]
    fn oversized_lexeme_is_fatal() {
        let long = "a".repeat(600);
        let source = format!("\"{}\"", long);
        let (_, bag) = lex_one(&source);
        assert!(bag.has_fatal_in(Stage::Lexical));
    }
}
