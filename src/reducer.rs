/// Token types and the cursor the engine walks.
///
/// Declares [`token::Token`], the ten [`token::TokenKind`]s a lexer may
/// produce, and [`token::TokenSequence`], a single-pass cursor with one-token
/// lookahead and a mark used to slice out sub-ranges for nested parses.
pub mod token;
/// Tokenizes source text.
///
/// A logos-generated lexer that turns raw text into the engine's token
/// stream. The engine itself never sees raw text; this module is the bundled
/// front-end used by the library entry points and the command line.
///
/// # Responsibilities
/// - Recognises numbers of every literal kind, identifiers, quoted text and
///   operator images.
/// - Reports characters that do not start any token.
/// - Drops comments and whitespace unless asked to keep them.
pub mod lexer;
/// Resolves names against the symbol table.
///
/// Classifies a name as an operation or a plain value and registers
/// placeholders for forward references. This is the only place the engine
/// writes to its symbol table.
pub mod resolver;
/// Context-sensitive token classification.
///
/// Turns identifiers into operators when they are registered operations or
/// are being invoked, and turns a subtraction sign into negation when nothing
/// atomic precedes it.
pub mod classifier;
/// The bracketed range mini-grammar.
///
/// Parses `lo <= id <= hi [<> step]` from a marked token slice, reducing each
/// bound through a nested pass of the engine.
pub mod range;
/// Per-kind combination rules.
///
/// Folds an operator and its operands into a new leaf by calling the output
/// target, bracketing operands whose precedence is too low.
pub mod rules;
/// The stack machine.
///
/// Drives the reduction: keeps the leaf and pending-operator registers, the
/// paired frame stack and the parameter accumulators, and dispatches every
/// token by kind.
///
/// # Responsibilities
/// - Pushes leaves and operators, reducing by precedence.
/// - Tracks groups, parameter lists and statement boundaries.
/// - Attaches parsed ranges to range reductions.
/// - Drains the stack at the end of input and checks it is balanced.
pub mod core;

pub use self::core::{Leaf, OperatorFrame, Pending, ReductionFrame, Reducer};
pub use range::RangeDescriptor;
pub use token::{Token, TokenKind, TokenSequence};
