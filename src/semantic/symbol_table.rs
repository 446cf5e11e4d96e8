//! Flat symbol table for declaration/initialization checks.
//!
//! This is an intentional simplification of the language's real (nested)
//! scoping: a single flat scope per analysis, not a scope stack. Preserve
//! that rather than "fixing" it into lexical scoping — it is a documented
//! limitation, not an oversight.

use rustc_hash::FxHashMap;

use crate::semantic::types::TypeTag;

/// A declared identifier's type and initialization state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolEntry {
    pub declared_type: TypeTag,
    pub initialized: bool,
}

/// The flat, single-scope symbol table consulted and mutated by the
/// parser during one `analyze` call. Constructed fresh per call; never
/// shared across calls.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: FxHashMap<String, SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a declaration. Declaring the same name twice overwrites
    /// the previous entry; duplicate-declaration diagnostics, if any, are
    /// the parser's concern, not the table's.
    pub fn declare(&mut self, name: &str, declared_type: TypeTag, initialized: bool) {
        self.entries.insert(
            name.to_string(),
            SymbolEntry {
                declared_type,
                initialized,
            },
        );
    }

    /// Marks an already-declared identifier as initialized (assignment or
    /// definite initialization). No-op if the identifier was never
    /// declared — the parser reports that separately as a reference error.
    pub fn mark_initialized(&mut self, name: &str) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.initialized = true;
        }
    }

    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.get(name)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_initialized(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|e| e.initialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_then_use_is_declared_but_uninitialized() {
        let mut table = SymbolTable::new();
        table.declare("x", TypeTag::Number, false);
        assert!(table.is_declared("x"));
        assert!(!table.is_initialized("x"));
    }

    #[test]
    fn mark_initialized_flips_flag() {
        let mut table = SymbolTable::new();
        table.declare("x", TypeTag::Number, false);
        table.mark_initialized("x");
        assert!(table.is_initialized("x"));
    }

    #[test]
    fn undeclared_identifier_is_neither() {
        let table = SymbolTable::new();
        assert!(!table.is_declared("missing"));
        assert!(!table.is_initialized("missing"));
    }

    #[test]
    fn mark_initialized_on_undeclared_name_is_a_no_op() {
        let mut table = SymbolTable::new();
        table.mark_initialized("ghost");
        assert!(!table.is_declared("ghost"));
    }
}
