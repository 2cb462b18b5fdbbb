//! tupi-par - recursive-descent parser and AST arena.
//!
//! [`parser::Parser`] pulls tokens one ahead from a `tupi_lex::Lexer` and
//! builds an [`ast::Arena`] of [`ast::AstNode`]s addressed by [`ast::NodeId`].
//! Parsing never aborts on a syntax error: the parser enters panic mode,
//! appends a diagnostic, and resynchronizes at the next likely statement
//! boundary, the same shared-sink discipline `tupi-lex` uses for lexical
//! errors.

pub mod ast;
pub mod parser;
pub mod types;

pub use ast::{Arena, AstKind, AstNode, NodeId};
pub use parser::{validate_declaration_sequence, validate_spacing_rules, validate_variable_usage, Parser};
pub use types::Type;

use tupi_util::DiagnosticBag;

/// Parses `source` to completion and returns the arena together with the
/// program's root node. Syntax errors are appended to `diagnostics`
/// rather than raised; check [`Parser::had_error`] via the returned parser
/// state if the caller needs to know whether to keep going.
pub fn parse(source: &str, diagnostics: &mut DiagnosticBag) -> (Arena, NodeId, bool) {
    let mut parser = Parser::new(source, diagnostics);
    let root = parser.parse_program();
    let had_error = parser.had_error();
    (parser.into_arena(), root, had_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tupi_util::Stage;

    #[test]
    fn parses_a_minimal_main_program() {
        let mut bag = DiagnosticBag::new();
        let (arena, root, had_error) = parse("principal() { escreva(\"ola\"); }", &mut bag);
        assert!(!had_error);
        assert!(bag.is_empty());
        let program = arena.node(root);
        assert_eq!(program.kind, AstKind::Program);
        assert_eq!(program.children.len(), 1);
        assert_eq!(arena.node(program.children[0]).kind, AstKind::WriteStmt);
    }

    #[test]
    fn declares_then_assigns_then_reads_back() {
        let mut bag = DiagnosticBag::new();
        let source = "principal() { inteiro !x = 1; !x = !x + 2; escreva(!x); }";
        let (arena, root, had_error) = parse(source, &mut bag);
        assert!(!had_error);
        let kinds: Vec<_> = arena.node(root).children.iter().map(|&id| arena.node(id).kind).collect();
        assert_eq!(kinds, vec![AstKind::Declaration, AstKind::Assignment, AstKind::WriteStmt]);
    }

    #[test]
    fn missing_semicolon_recovers_at_next_statement() {
        let mut bag = DiagnosticBag::new();
        let source = "principal() { inteiro !x = 1 escreva(!x); }";
        let (_, _, had_error) = parse(source, &mut bag);
        assert!(had_error);
        assert!(bag.has_fatal_in(Stage::Syntactic));
    }

    #[test]
    fn function_definition_with_parameters_parses() {
        let mut bag = DiagnosticBag::new();
        let source = "funcao inteiro __soma(inteiro !a, inteiro !b) { retorne !a + !b; }";
        let (arena, root, had_error) = parse(source, &mut bag);
        assert!(!had_error);
        let func = arena.node(arena.node(root).children[0]);
        assert_eq!(func.kind, AstKind::FunctionDef);
        assert_eq!(func.aux.as_deref(), Some("inteiro"));
    }
}
