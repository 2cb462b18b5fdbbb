//! Expression grammar: `or` → `and` → equality → comparison → term →
//! factor → unary → primary, each rung left-associative.
//!
//! `&&`/`||` and `%` have a rung here and a [`crate::types::Type`] rule in
//! the analyzer even though the lexer never produces their tokens — the
//! table is specified independently of what source text can reach it.

use tupi_lex::TokenKind;

use crate::ast::{AstKind, NodeId};
use crate::parser::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_expression(&mut self) -> NodeId {
        self.parse_or()
    }

    fn parse_or(&mut self) -> NodeId {
        let mut left = self.parse_and();
        while self.match_token(TokenKind::OrOr) {
            let op = self.previous.clone();
            let right = self.parse_and();
            left = self.binary(op, left, right);
        }
        left
    }

    fn parse_and(&mut self) -> NodeId {
        let mut left = self.parse_equality();
        while self.match_token(TokenKind::AndAnd) {
            let op = self.previous.clone();
            let right = self.parse_equality();
            left = self.binary(op, left, right);
        }
        left
    }

    fn parse_equality(&mut self) -> NodeId {
        let mut left = self.parse_comparison();
        while self.match_token(TokenKind::EqEq) || self.match_token(TokenKind::NotEq) {
            let op = self.previous.clone();
            let right = self.parse_comparison();
            left = self.binary(op, left, right);
        }
        left
    }

    fn parse_comparison(&mut self) -> NodeId {
        let mut left = self.parse_term();
        loop {
            let matched = self.match_token(TokenKind::Gt)
                || self.match_token(TokenKind::GtEq)
                || self.match_token(TokenKind::Lt)
                || self.match_token(TokenKind::LtEq);
            if !matched {
                break;
            }
            let op = self.previous.clone();
            let right = self.parse_term();
            left = self.binary(op, left, right);
        }
        left
    }

    fn parse_term(&mut self) -> NodeId {
        let mut left = self.parse_factor();
        while self.match_token(TokenKind::Minus) || self.match_token(TokenKind::Plus) {
            let op = self.previous.clone();
            let right = self.parse_factor();
            left = self.binary(op, left, right);
        }
        left
    }

    fn parse_factor(&mut self) -> NodeId {
        let mut left = self.parse_unary();
        loop {
            let matched = self.match_token(TokenKind::Slash)
                || self.match_token(TokenKind::Star)
                || self.match_token(TokenKind::Percent)
                || self.match_token(TokenKind::Caret);
            if !matched {
                break;
            }
            let op = self.previous.clone();
            let right = self.parse_unary();
            left = self.binary(op, left, right);
        }
        left
    }

    fn parse_unary(&mut self) -> NodeId {
        if self.match_token(TokenKind::Minus) || self.match_token(TokenKind::Plus) {
            let op = self.previous.clone();
            let operand = self.parse_unary();
            let unary = self.alloc(AstKind::UnaryOp, op);
            self.add_child(unary, operand);
            return unary;
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> NodeId {
        if self.check(TokenKind::IntLiteral)
            || self.check(TokenKind::DecimalLiteral)
            || self.check(TokenKind::StringLiteral)
        {
            let token = self.current.clone();
            self.advance();
            return self.alloc(AstKind::Literal, token);
        }

        if self.check(TokenKind::Identifier) {
            let token = self.current.clone();
            self.advance();
            let id = self.alloc(AstKind::Identifier, token);

            if self.match_token(TokenKind::LParen) {
                let call = self.alloc(AstKind::FunctionCall, self.previous.clone());
                self.add_child(call, id);

                if !self.check(TokenKind::RParen) {
                    loop {
                        let arg = self.parse_expression();
                        self.add_child(call, arg);
                        if !self.match_token(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RParen, "esperado ')' após argumentos da função");
                return call;
            }
            return id;
        }

        if self.match_token(TokenKind::LParen) {
            let inner = self.parse_expression();
            self.expect(TokenKind::RParen, "esperado ')' após expressão");
            return inner;
        }

        self.error("esperado expressão");
        let placeholder = self.alloc(AstKind::Expression, self.current.clone());
        self.advance();
        placeholder
    }

    fn binary(&mut self, op: tupi_lex::Token, left: NodeId, right: NodeId) -> NodeId {
        let node = self.alloc(AstKind::BinaryOp, op);
        self.add_child(node, left);
        self.add_child(node, right);
        node
    }
}
