//! Variable declarations and function definitions.
//!
//! A function's parameters reuse [`Parser::parse_declaration`] — the same
//! grammar rule as a local `inteiro x;`, just living inside a parameter
//! list instead of a statement sequence.

use tupi_lex::TokenKind;

use crate::ast::{AstKind, NodeId};
use crate::parser::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_declaration(&mut self) -> NodeId {
        let type_token = self.current.clone();
        if !type_token.kind.is_type_keyword() {
            self.error("esperado tipo de variável (inteiro, decimal, texto)");
            return self.alloc(AstKind::Declaration, type_token);
        }
        self.advance();

        let decl = self.alloc(AstKind::Declaration, type_token);
        self.parse_declared_variable(decl);

        while self.match_token(TokenKind::Comma) {
            self.parse_declared_variable(decl);
        }

        decl
    }

    fn parse_declared_variable(&mut self, decl: NodeId) {
        if !self.check(TokenKind::Identifier) {
            self.error("esperado nome de variável");
            return;
        }
        let var = self.alloc(AstKind::Identifier, self.current.clone());
        self.add_child(decl, var);
        self.advance();

        if self.match_token(TokenKind::Assign) {
            let init = self.parse_expression();
            self.add_child(decl, init);
        } else if self.match_token(TokenKind::LBracket) {
            let size = self.parse_expression();
            self.add_child(decl, size);
            self.expect(TokenKind::RBracket, "esperado ']' após tamanho do array");
        }
    }

    pub(crate) fn parse_function_definition(&mut self) -> NodeId {
        let func = self.alloc(AstKind::FunctionDef, self.current.clone());
        self.advance(); // consume 'funcao'

        if self.current.kind.is_type_keyword() {
            self.arena.node_mut(func).aux = Some(self.current.lexeme.clone());
            self.advance();
        }

        if !self.check(TokenKind::Identifier) {
            self.error("esperado nome da função");
            return func;
        }
        let name = self.alloc(AstKind::Identifier, self.current.clone());
        self.add_child(func, name);
        self.advance();

        if !self.expect(TokenKind::LParen, "esperado '(' após nome da função") {
            return func;
        }

        if !self.check(TokenKind::RParen) {
            loop {
                let param = self.parse_declaration();
                self.add_child(func, param);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        if !self.expect(TokenKind::RParen, "esperado ')' após parâmetros") {
            return func;
        }

        let body = self.parse_block();
        self.add_child(func, body);
        func
    }
}
