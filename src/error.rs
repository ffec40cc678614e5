/// Lexing errors.
///
/// Defines the errors raised by the bundled tokenizer when the source text
/// contains characters that do not start any known token.
pub mod lex_error;
/// Reduction errors.
///
/// Contains every error that can abort a reduction pass: malformed ranges,
/// unbalanced delimiters, operators that violate the precedence contract,
/// missing operands and symbols the output target cannot represent.
pub mod reduce_error;

pub use lex_error::LexError;
pub use reduce_error::{RangeBound, ReduceError, ReduceResult};
