/// Operations, their kinds and the reserved precedence contract.
///
/// Declares the [`Operation`] record the engine dispatches on, the closed
/// [`OperationKind`] sum type, and the reserved precedence constants shared
/// between the engine and any symbol table.
pub mod operation;
/// The symbol table collaborator.
///
/// Declares the [`SymbolTable`] trait the engine reads from (and writes
/// forward references into), plus [`SymbolMap`], a hash-map backed table that
/// can be pre-loaded with the standard operator set.
///
/// # Responsibilities
/// - Look up a name as either an operation or a plain value.
/// - Accept placeholder and derived operations registered by the engine.
/// - Provide the built-in delimiters, operators and functions.
pub mod table;

pub use operation::{
    ATOMIC_PRECEDENCE, CLOSE_PRECEDENCE, CONTINUE_PRECEDENCE, Delimiter, FUNCTION_PRECEDENCE,
    NamedSymbol, Notation, OPEN_PRECEDENCE, Operation, OperationKind, Precedence,
    ROOT_PRECEDENCE, STATEMENT_FLOOR, STORAGE_PRECEDENCE,
};
pub use table::{IMPLICIT_PRODUCT, NEGATE, OPEN_PAREN, SUBTRACTION, SymbolMap, SymbolTable};
