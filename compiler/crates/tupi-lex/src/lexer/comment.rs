//! Whitespace and comment skipping.

use crate::lexer::Lexer;

impl<'a> Lexer<'a> {
    fn skip_line_comment(&mut self) {
        while !self.reader.is_at_end() && self.reader.peek() != b'\n' {
            self.reader.advance();
        }
    }

    fn skip_block_comment(&mut self, start_line: u32) {
        loop {
            if self.reader.is_at_end() {
                self.report_fatal(start_line, "comentário não terminado");
                return;
            }
            let d = self.reader.advance();
            if d == b'*' && self.reader.peek() == b'/' {
                self.reader.advance();
                return;
            }
        }
    }

    pub(crate) fn skip_whitespace_and_comments(&mut self) {
        loop {
            if self.reader.is_at_end() {
                return;
            }
            match self.reader.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.reader.advance();
                }
                b'/' if self.reader.peek_at(1) == b'/' => {
                    self.reader.advance();
                    self.reader.advance();
                    self.skip_line_comment();
                }
                b'/' if self.reader.peek_at(1) == b'*' => {
                    let line = self.reader.current_line();
                    self.reader.advance();
                    self.reader.advance();
                    self.skip_block_comment(line);
                    if self.halted {
                        return;
                    }
                }
                _ => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;
    use tupi_util::{DiagnosticBag, Stage};

    fn lex_all(source: &str) -> (Vec<crate::token::Token>, DiagnosticBag) {
        let mut bag = DiagnosticBag::new();
        let tokens = {
            let lexer = Lexer::new(source, &mut bag);
            lexer.collect()
        };
        (tokens, bag)
    }

    #[test]
    fn line_comment_is_skipped() {
        let (tokens, bag) = lex_all("inteiro // declara\n!x ;");
        assert!(bag.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::KwInteiro);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn block_comment_is_skipped() {
        let (tokens, bag) = lex_all("inteiro /* tipo */ !x ;");
        assert!(bag.is_empty());
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn unterminated_block_comment_is_fatal() {
        let (tokens, bag) = lex_all("inteiro /* sem fim");
        assert_eq!(tokens, vec![crate::token::Token::new(TokenKind::KwInteiro, "inteiro", 1)]);
        assert!(bag.has_fatal_in(Stage::Lexical));
    }
}
