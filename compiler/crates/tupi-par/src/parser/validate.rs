//! Post-parse syntactic validators, run once a tree exists.
//!
//! Three checks are named at this stage: only the declaration-ordering one
//! has a real rule behind it. The other two are kept as literal
//! always-succeeding stubs — nothing downstream inspects raw source
//! spacing, and variable-usage validation is the scoped symbol table's job
//! in the analyzer, not the parser's.

use tupi_util::{Diagnostic, DiagnosticBag, Stage};

use crate::ast::{Arena, AstKind, NodeId};

/// A declaration block can only precede every other statement: once a
/// non-declaration statement is seen at the top level, a later declaration
/// is out of order.
pub fn validate_declaration_sequence(arena: &Arena, program: NodeId, diagnostics: &mut DiagnosticBag) -> bool {
    let mut seen_non_declaration = false;
    let mut ok = true;

    for &child in &arena.node(program).children {
        let child_node = arena.node(child);
        if child_node.kind == AstKind::Declaration {
            if seen_non_declaration {
                diagnostics.push(Diagnostic::fatal(
                    Stage::Structural,
                    child_node.token.line,
                    "declaração após comando não-declarativo",
                ));
                ok = false;
            }
        } else {
            seen_non_declaration = true;
        }
    }

    ok
}

pub fn validate_spacing_rules(_arena: &Arena, _program: NodeId) -> bool {
    true
}

pub fn validate_variable_usage(_arena: &Arena, _program: NodeId) -> bool {
    true
}
