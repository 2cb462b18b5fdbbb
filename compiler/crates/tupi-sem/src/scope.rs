//! Scoped symbol table: a djb2-hashed bucket array per scope, scopes
//! chained to their parent, global scope fixed at id 0.
//!
//! Deliberately not a generic `HashMap`-backed table — the hash algorithm
//! and the 64-bucket width are load-bearing for anyone relying on
//! deterministic symbol-table dump ordering, not an implementation detail
//! to hide behind a standard collection.

use std::fmt::Write;

use tupi_par::Type;
use tupi_util::{define_idx, AllocId, IndexVec, MemoryAccountant, MemoryError};

define_idx!(ScopeId);

const BUCKET_COUNT: usize = 64;

/// What a name in scope refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymClass {
    Var,
    Param,
    Func,
}

impl SymClass {
    fn as_str(self) -> &'static str {
        match self {
            SymClass::Var => "var",
            SymClass::Param => "param",
            SymClass::Func => "func",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub class: SymClass,
    pub ty: Type,
    pub scope_id: ScopeId,
    pub line_decl: u32,
    alloc_id: AllocId,
}

/// djb2: `hash = hash * 33 + byte`, seeded at 5381.
fn djb2_hash(name: &str) -> u64 {
    let mut hash: u64 = 5381;
    for byte in name.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(byte as u64);
    }
    hash
}

#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    buckets: Vec<Vec<Symbol>>,
}

impl Scope {
    fn new(id: ScopeId, parent: Option<ScopeId>) -> Self {
        Self { id, parent, buckets: (0..BUCKET_COUNT).map(|_| Vec::new()).collect() }
    }

    fn bucket(&self, name: &str) -> usize {
        (djb2_hash(name) % BUCKET_COUNT as u64) as usize
    }

    fn find(&self, name: &str) -> Option<&Symbol> {
        self.buckets[self.bucket(name)].iter().find(|s| s.name == name)
    }

    fn symbols_in_order(&self) -> impl Iterator<Item = &Symbol> {
        self.buckets.iter().flatten()
    }
}

/// Why a declaration couldn't be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// A symbol with this name already exists in the *current* scope —
    /// shadowing an outer scope's name is fine, redeclaring in the same
    /// one is not.
    AlreadyDeclared,
    /// The accountant refused the symbol's storage; the caller should treat
    /// this the same way the lexer treats a fatal lexical error — stop.
    MemoryExhausted(MemoryError),
}

/// A stack of scopes rooted at a permanent global scope (id 0). Scopes are
/// never individually freed once left — like the AST arena, the whole
/// table drops at once when the analyzer finishes, and nothing reads a
/// left scope's buckets again except the final dump.
pub struct SymbolTable {
    scopes: IndexVec<ScopeId, Scope>,
    current: ScopeId,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut scopes = IndexVec::new();
        let global = scopes.push(Scope::new(ScopeId(0), None));
        Self { scopes, current: global }
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    pub fn enter_scope(&mut self) -> ScopeId {
        let next = ScopeId(self.scopes.len() as u32);
        let id = self.scopes.push(Scope::new(next, Some(self.current)));
        self.current = id;
        id
    }

    /// Leaves the current scope, freeing every symbol it holds from
    /// `accountant` before rewinding to the parent — scopes are destroyed
    /// in LIFO order and their symbols are freed with them, the same as
    /// the original analyzer's own (unused) scope-exit routine was meant
    /// to do.
    pub fn leave_scope(&mut self, accountant: &mut MemoryAccountant) {
        let scope = &self.scopes[self.current];
        if let Some(parent) = scope.parent {
            for sym in scope.symbols_in_order() {
                let _ = accountant.free(sym.alloc_id);
            }
            self.current = parent;
        }
    }

    /// Inserts a new symbol into the current scope, charging its storage
    /// (a nominal struct size plus the name's bytes) against `accountant` —
    /// the same place the original scanner's own insert routine ran its
    /// usage guard. Returns the 90%-watermark warning, if this charge
    /// crossed it, for the caller to turn into a diagnostic.
    pub fn insert(
        &mut self,
        name: &str,
        class: SymClass,
        ty: Type,
        line_decl: u32,
        accountant: &mut MemoryAccountant,
    ) -> Result<Option<String>, InsertError> {
        let scope = &mut self.scopes[self.current];
        if scope.find(name).is_some() {
            return Err(InsertError::AlreadyDeclared);
        }

        let charge = std::mem::size_of::<Symbol>() + name.len();
        let outcome = accountant.alloc(charge).map_err(InsertError::MemoryExhausted)?;

        let symbol =
            Symbol { name: name.to_string(), class, ty, scope_id: self.current, line_decl, alloc_id: outcome.id };
        let bucket = scope.bucket(name);
        scope.buckets[bucket].push(symbol);
        Ok(outcome.warning)
    }

    /// Walks from the current scope up through parents, like the original
    /// scanner chaining through `Scope::parent`.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let mut scope_id = Some(self.current);
        while let Some(id) = scope_id {
            let scope = &self.scopes[id];
            if let Some(sym) = scope.find(name) {
                return Some(sym);
            }
            scope_id = scope.parent;
        }
        None
    }

    /// Renders every scope still reachable from the current one, root
    /// first, in the symbol-table banner's format.
    pub fn dump(&self, out: &mut impl Write) -> std::fmt::Result {
        let mut chain = Vec::new();
        let mut scope_id = Some(self.current);
        while let Some(id) = scope_id {
            chain.push(id);
            scope_id = self.scopes[id].parent;
        }
        chain.reverse();

        for id in chain {
            let scope = &self.scopes[id];
            writeln!(out, "Escopo {}:", scope.id.0)?;
            for sym in scope.symbols_in_order() {
                writeln!(out, "  {} ({}, {}, linha {})", sym.name, sym.class.as_str(), sym.ty, sym.line_decl)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
