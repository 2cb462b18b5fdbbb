//! Integer and decimal literal lexing.
//!
//! No hex, binary, octal or exponent forms: digits, optionally followed by
//! `.` and one-or-more digits.

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    pub(crate) fn lex_number(&mut self) -> Token {
        let line = self.reader.current_line();
        let mut lexeme = String::new();

        while self.reader.peek().is_ascii_digit() {
            lexeme.push(self.reader.advance() as char);
        }

        if self.reader.peek() != b'.' {
            return Token::new(TokenKind::IntLiteral, lexeme, line);
        }

        lexeme.push(self.reader.advance() as char);
        if !self.reader.peek().is_ascii_digit() {
            self.report_fatal(line, "número decimal inválido: faltando dígitos após o ponto '.'");
            return Token::eof(line);
        }
        while self.reader.peek().is_ascii_digit() {
            lexeme.push(self.reader.advance() as char);
        }
        Token::new(TokenKind::DecimalLiteral, lexeme, line)
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
    fn plain_integer() {
        let (token, bag) = lex_one("42");
        assert!(bag.is_empty());
        assert_eq!(token, Token::new(TokenKind::IntLiteral, "42", 1));
    }

    #[test]
    fn decimal_with_fraction() {
        let (token, bag) = lex_one("1.25");
        assert!(bag.is_empty());
        assert_eq!(token, Token::new(TokenKind::DecimalLiteral, "1.25", 1));
    }

    #[test]
    fn trailing_dot_with_no_digits_is_fatal() {
        let (_, bag) = lex_one("3.");
        assert!(bag.has_fatal_in(Stage::Lexical));
    }
}
