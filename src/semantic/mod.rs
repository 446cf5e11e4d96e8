//! Semantic support used by the parser: the type lattice and the flat
//! symbol table. Neither module holds process-wide state; both are
//! constructed fresh per `analyze` call.

pub mod symbol_table;
pub mod types;

pub use symbol_table::{SymbolEntry, SymbolTable};
pub use types::TypeTag;
