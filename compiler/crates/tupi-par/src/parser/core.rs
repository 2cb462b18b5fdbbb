//! Parser state, token cursor and panic-mode recovery.

use tupi_lex::{Lexer, Token, TokenKind};
use tupi_util::{Diagnostic, DiagnosticBag, Stage};

use crate::ast::{Arena, AstKind, NodeId};

/// Pulls tokens one ahead from a [`Lexer`] and assembles them into an
/// [`Arena`]-backed tree. Diagnostics flow into the same bag the lexer
/// writes to, tagged [`Stage::Syntactic`] instead of [`Stage::Lexical`].
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    pub(crate) arena: Arena,
    pub(crate) current: Token,
    pub(crate) previous: Token,
    pub(crate) had_error: bool,
    pub(crate) panic_mode: bool,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, diagnostics: &'a mut DiagnosticBag) -> Self {
        let mut lexer = Lexer::new(source, diagnostics);
        let current = lexer.next_token();
        Self {
            lexer,
            arena: Arena::new(),
            current,
            previous: Token::eof(0),
            had_error: false,
            panic_mode: false,
        }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn into_arena(self) -> Arena {
        self.arena
    }

    pub(crate) fn alloc(&mut self, kind: AstKind, token: Token) -> NodeId {
        self.arena.alloc(kind, token)
    }

    pub(crate) fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.arena.add_child(parent, child)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub(crate) fn advance(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.lexer.next_token());
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes `kind` if present; otherwise reports `message` and leaves
    /// the cursor where it was, the way the original parser's
    /// `match_token`-then-`parser_error` pairs do.
    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> bool {
        if self.match_token(kind) {
            true
        } else {
            self.error(message);
            false
        }
    }

    /// Appends a syntactic diagnostic unless already in panic mode — the
    /// first error in a run is the useful one, the rest are noise from the
    /// same derailment.
    pub(crate) fn error(&mut self, message: impl Into<String>) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.had_error = true;
        self.lexer.diagnostics.push(Diagnostic::fatal(Stage::Syntactic, self.current.line, message));
    }

    /// Skips tokens until one that plausibly starts a new statement, or the
    /// token just consumed was a `;`.
    pub(crate) fn synchronize(&mut self) {
        self.panic_mode = false;

        while !self.check(TokenKind::Eof) {
            if self.previous.kind == TokenKind::Semicolon {
                return;
            }
            if self.current.kind.begins_statement() {
                return;
            }
            self.advance();
        }
    }

    pub fn parse_program(&mut self) -> NodeId {
        let program = self.alloc(AstKind::Program, self.current.clone());

        if self.check(TokenKind::KwPrincipal) {
            self.advance();
            if !self.expect(TokenKind::LParen, "esperado '(' após 'principal'") {
                return program;
            }
            if !self.expect(TokenKind::RParen, "esperado ')' após '('") {
                return program;
            }
            if !self.expect(TokenKind::LBrace, "esperado '{' após 'principal()'") {
                return program;
            }

            while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
                let stmt = self.parse_statement();
                self.add_child(program, stmt);
                if self.panic_mode {
                    self.synchronize();
                }
            }
            self.expect(TokenKind::RBrace, "esperado '}' para fechar programa principal");
        } else {
            while !self.check(TokenKind::Eof) {
                let node = if self.check(TokenKind::KwFuncao) {
                    self.parse_function_definition()
                } else {
                    self.parse_statement()
                };
                self.add_child(program, node);
                if self.panic_mode {
                    self.synchronize();
                }
            }
        }

        program
    }
}
