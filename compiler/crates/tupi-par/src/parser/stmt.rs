//! Statements: declarations, assignment, control flow, blocks.

use tupi_lex::TokenKind;

use crate::ast::{AstKind, NodeId};
use crate::parser::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self) -> NodeId {
        match self.current.kind {
            TokenKind::KwInteiro | TokenKind::KwDecimal | TokenKind::KwTexto => {
                let decl = self.parse_declaration();
                self.expect(TokenKind::Semicolon, "esperado ';' após declaração");
                decl
            }
            TokenKind::Identifier => {
                let assign = self.parse_assignment();
                self.expect(TokenKind::Semicolon, "esperado ';' após atribuição");
                assign
            }
            TokenKind::KwSe => self.parse_if_statement(),
            TokenKind::KwEnquanto => self.parse_while_statement(),
            TokenKind::KwPara => self.parse_for_statement(),
            TokenKind::KwLeia => self.parse_read_statement(),
            TokenKind::KwEscreva => self.parse_write_statement(),
            TokenKind::KwRetorne | TokenKind::KwRetorno => {
                let ret = self.alloc(AstKind::ReturnStmt, self.current.clone());
                self.advance();
                if !self.check(TokenKind::Semicolon) {
                    let expr = self.parse_expression();
                    self.add_child(ret, expr);
                }
                self.expect(TokenKind::Semicolon, "esperado ';' após retorno");
                ret
            }
            TokenKind::LBrace => self.parse_block(),
            _ => {
                self.error("comando não reconhecido");
                let placeholder = self.alloc(AstKind::Expression, self.current.clone());
                self.advance();
                placeholder
            }
        }
    }

    pub(crate) fn parse_assignment(&mut self) -> NodeId {
        let assign = self.alloc(AstKind::Assignment, self.current.clone());

        let var = self.alloc(AstKind::Identifier, self.current.clone());
        self.add_child(assign, var);
        self.advance();

        if !self.expect(TokenKind::Assign, "esperado '=' em atribuição") {
            return assign;
        }

        let expr = self.parse_expression();
        self.add_child(assign, expr);
        assign
    }

    pub(crate) fn parse_if_statement(&mut self) -> NodeId {
        let if_stmt = self.alloc(AstKind::IfStmt, self.current.clone());
        self.advance(); // consume 'se'

        if !self.expect(TokenKind::LParen, "esperado '(' após 'se'") {
            return if_stmt;
        }
        let cond = self.parse_expression();
        self.add_child(if_stmt, cond);
        if !self.expect(TokenKind::RParen, "esperado ')' após condição do 'se'") {
            return if_stmt;
        }

        let then_branch = self.parse_statement();
        self.add_child(if_stmt, then_branch);

        if self.match_token(TokenKind::KwSenao) {
            let else_branch = self.parse_statement();
            self.add_child(if_stmt, else_branch);
        }

        if_stmt
    }

    pub(crate) fn parse_while_statement(&mut self) -> NodeId {
        let while_stmt = self.alloc(AstKind::WhileStmt, self.current.clone());
        self.advance(); // consume 'enquanto'

        if !self.expect(TokenKind::LParen, "esperado '(' após 'enquanto'") {
            return while_stmt;
        }
        let cond = self.parse_expression();
        self.add_child(while_stmt, cond);
        if !self.expect(TokenKind::RParen, "esperado ')' após condição do 'enquanto'") {
            return while_stmt;
        }

        let body = self.parse_statement();
        self.add_child(while_stmt, body);
        while_stmt
    }

    pub(crate) fn parse_for_statement(&mut self) -> NodeId {
        let for_stmt = self.alloc(AstKind::ForStmt, self.current.clone());
        self.advance(); // consume 'para'

        if !self.expect(TokenKind::LParen, "esperado '(' após 'para'") {
            return for_stmt;
        }

        let init = self.parse_assignment();
        self.add_child(for_stmt, init);
        if !self.expect(TokenKind::Semicolon, "esperado ';' após inicialização do 'para'") {
            return for_stmt;
        }

        let cond = self.parse_expression();
        self.add_child(for_stmt, cond);
        if !self.expect(TokenKind::Semicolon, "esperado ';' após condição do 'para'") {
            return for_stmt;
        }

        let step = self.parse_assignment();
        self.add_child(for_stmt, step);
        if !self.expect(TokenKind::RParen, "esperado ')' após incremento do 'para'") {
            return for_stmt;
        }

        let body = self.parse_statement();
        self.add_child(for_stmt, body);
        for_stmt
    }

    pub(crate) fn parse_read_statement(&mut self) -> NodeId {
        let read_stmt = self.alloc(AstKind::ReadStmt, self.current.clone());
        self.advance(); // consume 'leia'

        if !self.expect(TokenKind::LParen, "esperado '(' após 'leia'") {
            return read_stmt;
        }
        if !self.check(TokenKind::Identifier) {
            self.error("esperado variável em 'leia'");
            return read_stmt;
        }
        let var = self.alloc(AstKind::Identifier, self.current.clone());
        self.add_child(read_stmt, var);
        self.advance();

        if !self.expect(TokenKind::RParen, "esperado ')' após variável em 'leia'") {
            return read_stmt;
        }
        self.expect(TokenKind::Semicolon, "esperado ';' após 'leia'");
        read_stmt
    }

    pub(crate) fn parse_write_statement(&mut self) -> NodeId {
        let write_stmt = self.alloc(AstKind::WriteStmt, self.current.clone());
        self.advance(); // consume 'escreva'

        if !self.expect(TokenKind::LParen, "esperado '(' após 'escreva'") {
            return write_stmt;
        }
        if !self.check(TokenKind::RParen) {
            loop {
                let arg = self.parse_expression();
                self.add_child(write_stmt, arg);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        if !self.expect(TokenKind::RParen, "esperado ')' após argumentos de 'escreva'") {
            return write_stmt;
        }
        self.expect(TokenKind::Semicolon, "esperado ';' após 'escreva'");
        write_stmt
    }

    pub(crate) fn parse_block(&mut self) -> NodeId {
        let block = self.alloc(AstKind::Block, self.current.clone());
        self.advance(); // consume '{'

        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            let stmt = self.parse_statement();
            self.add_child(block, stmt);
            if self.panic_mode {
                self.synchronize();
            }
        }
        self.expect(TokenKind::RBrace, "esperado '}' para fechar bloco");
        block
    }
}
