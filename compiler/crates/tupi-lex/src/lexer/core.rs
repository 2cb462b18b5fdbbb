//! Core lexer: the `Lexer` struct and its dispatch loop.

use tupi_util::{Diagnostic, DiagnosticBag, Stage};

use crate::reader::SourceReader;
use crate::token::{Token, TokenKind};

/// Scans a source string into a lazy stream of [`Token`]s.
///
/// The lexer never prints or aborts the process itself: a fatal lexical
/// error is appended to the shared diagnostic bag and the lexer halts,
/// producing [`TokenKind::Eof`] for every subsequent call. The driver is
/// the one place that turns a fatal diagnostic into a process exit.
pub struct Lexer<'a> {
    pub reader: SourceReader<'a>,
    pub diagnostics: &'a mut DiagnosticBag,
    pub halted: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, diagnostics: &'a mut DiagnosticBag) -> Self {
        Self { reader: SourceReader::new(source), diagnostics, halted: false }
    }

    /// Consumes leading whitespace and comments, then lexes one token.
    pub fn next_token(&mut self) -> Token {
        if self.halted {
            return Token::eof(self.reader.current_line());
        }

        self.skip_whitespace_and_comments();
        if self.halted {
            return Token::eof(self.reader.current_line());
        }

        let line = self.reader.current_line();
        if self.reader.is_at_end() {
            return Token::eof(line);
        }

        match self.reader.peek() {
            b'!' => self.lex_variable(),
            b'_' => self.lex_function_name(),
            c if c.is_ascii_alphabetic() => self.lex_word(),
            c if c.is_ascii_digit() => self.lex_number(),
            b'"' => self.lex_string(),
            b'+' | b'-' | b'*' | b'/' | b'^' | b'=' | b'<' | b'>' | b'(' | b')' | b'{' | b'}'
            | b'[' | b']' | b';' | b',' => self.lex_operator(),
            c => {
                self.report_fatal(line, format!("caractere inesperado: '{}'", c as char));
                Token::eof(line)
            }
        }
    }

    /// Records a fatal lexical diagnostic and halts further scanning.
    pub(crate) fn report_fatal(&mut self, line: u32, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::fatal(Stage::Lexical, line, message));
        self.halted = true;
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> (Vec<Token>, DiagnosticBag) {
        let mut bag = DiagnosticBag::new();
        let tokens = {
            let lexer = Lexer::new(source, &mut bag);
            lexer.collect()
        };
        (tokens, bag)
    }

    #[test]
    fn empty_input_is_eof() {
        let (tokens, bag) = lex_all("");
        assert!(tokens.is_empty());
        assert!(bag.is_empty());
    }

    #[test]
    fn punctuation_and_keywords_lex_in_order() {
        let (tokens, bag) = lex_all("principal ( ) { }");
        assert!(bag.is_empty());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::KwPrincipal,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn unexpected_byte_halts_the_stream() {
        let (tokens, bag) = lex_all("inteiro @ !x");
        assert_eq!(tokens, vec![Token::new(TokenKind::KwInteiro, "inteiro", 1)]);
        assert!(bag.has_fatal_in(Stage::Lexical));
    }
}
