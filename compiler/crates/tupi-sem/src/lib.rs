//! tupi-sem - scoped symbol table and two-phase semantic analysis.
//!
//! [`scope::SymbolTable`] is the djb2-hashed scope stack; [`analysis::Analyzer`]
//! walks the parser's arena, registering declarations into it and
//! inferring every expression's type in place.

pub mod analysis;
pub mod scope;

pub use analysis::Analyzer;
pub use scope::{InsertError, Scope, ScopeId, SymClass, Symbol, SymbolTable};
