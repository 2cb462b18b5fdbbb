//! Variable, function and keyword identifier lexing.
//!
//! This language has no bare identifiers: a word with no sigil must be one
//! of the reserved keywords, or lexing fails.

use crate::lexer::Lexer;
use crate::token::{lookup_keyword, Token, TokenKind};

impl<'a> Lexer<'a> {
    /// `![a-z][a-zA-Z0-9]*`
    pub(crate) fn lex_variable(&mut self) -> Token {
        let line = self.reader.current_line();
        self.reader.advance();

        let first = self.reader.peek();
        if !(b'a'..=b'z').contains(&first) {
            self.report_fatal(
                line,
                format!(
                    "nome inválido para variável: esperado [a-z] após '!', recebido '{}'",
                    first as char
                ),
            );
            return Token::eof(line);
        }

        let mut lexeme = String::from("!");
        lexeme.push(self.reader.advance() as char);
        while self.reader.peek().is_ascii_alphanumeric() {
            lexeme.push(self.reader.advance() as char);
        }
        Token::new(TokenKind::Identifier, lexeme, line)
    }

    /// `__[a-zA-Z0-9][a-zA-Z0-9]*`
    pub(crate) fn lex_function_name(&mut self) -> Token {
        let line = self.reader.current_line();
        self.reader.advance();

        if self.reader.peek() != b'_' {
            self.report_fatal(
                line,
                "nome de função inválido: deve começar com '__' seguido de letra ou dígito",
            );
            return Token::eof(line);
        }
        self.reader.advance();

        if !self.reader.peek().is_ascii_alphanumeric() {
            self.report_fatal(
                line,
                "nome de função inválido: deve vir letra ou dígito após '__'",
            );
            return Token::eof(line);
        }

        let mut lexeme = String::from("__");
        while self.reader.peek().is_ascii_alphanumeric() {
            lexeme.push(self.reader.advance() as char);
        }
        Token::new(TokenKind::Identifier, lexeme, line)
    }

    /// `[a-zA-Z][a-zA-Z0-9_]*`, valid only when it names a keyword.
    pub(crate) fn lex_word(&mut self) -> Token {
        let line = self.reader.current_line();
        let mut word = String::new();
        while self.reader.peek().is_ascii_alphanumeric() || self.reader.peek() == b'_' {
            word.push(self.reader.advance() as char);
        }
        match lookup_keyword(&word) {
            Some(kind) => Token::new(kind, word, line),
            None => {
                self.report_fatal(line, format!("identificador desconhecido: '{}'", word));
                Token::eof(line)
            }
        }
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
    fn variable_lexes_with_sigil_kept() {
        let (token, bag) = lex_one("!contador2");
        assert!(bag.is_empty());
        assert_eq!(token, Token::new(TokenKind::Identifier, "!contador2", 1));
    }

    #[test]
    fn uppercase_after_bang_is_fatal() {
        let (_, bag) = lex_one("!A");
        assert!(bag.has_fatal_in(Stage::Lexical));
    }

    #[test]
    fn bare_bang_is_fatal() {
        let (_, bag) = lex_one("!");
        assert!(bag.has_fatal_in(Stage::Lexical));
    }

    #[test]
    fn function_name_lexes_with_double_underscore_kept() {
        let (token, bag) = lex_one("__soma");
        assert!(bag.is_empty());
        assert_eq!(token, Token::new(TokenKind::Identifier, "__soma", 1));
    }

    #[test]
    fn single_underscore_is_fatal() {
        let (_, bag) = lex_one("_x");
        assert!(bag.has_fatal_in(Stage::Lexical));
    }

    #[test]
    fn bare_word_must_be_keyword() {
        let (_, bag) = lex_one("variavel");
        assert!(bag.has_fatal_in(Stage::Lexical));
    }

    #[test]
    fn keyword_lexes_to_its_kind() {
        let (token, bag) = lex_one("enquanto");
        assert!(bag.is_empty());
        assert_eq!(token.kind, TokenKind::KwEnquanto);
    }

    proptest::proptest! {
        #[test]
        fn any_bang_variable_matching_the_grammar_lexes_cleanly(
            tail in "[a-z][a-zA-Z0-9]{0,31}",
        ) {
            let source = format!("!{tail}");
            let (token, bag) = lex_one(&source);
            proptest::prop_assert!(bag.is_empty());
            proptest::prop_assert_eq!(token, Token::new(TokenKind::Identifier, source.as_str(), 1));
        }

        #[test]
        fn any_double_underscore_function_name_matching_the_grammar_lexes_cleanly(
            tail in "[a-zA-Z0-9][a-zA-Z0-9]{0,31}",
        ) {
            let source = format!("__{tail}");
            let (token, bag) = lex_one(&source);
            proptest::prop_assert!(bag.is_empty());
            proptest::prop_assert_eq!(token, Token::new(TokenKind::Identifier, source.as_str(), 1));
        }
    }
}
