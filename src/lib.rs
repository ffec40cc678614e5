//! # opreduce
//!
//! opreduce is an operator-precedence reduction engine written in Rust.
//! It turns a token stream into a structured result by consulting a table of
//! polymorphic operators, and renders that result as text, MathML or a syntax
//! tree.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::error::Error;

use crate::{
    reducer::Reducer,
    symbols::{SymbolMap, SymbolTable},
    target::{MarkupTarget, TextTarget, TreeTarget},
};

/// Defines the syntax trees built by the tree target.
///
/// This module declares the `Expr` enum and the typed `LiteralValue` that a
/// reduction produces when it is rendered as a tree rather than as text.
///
/// # Responsibilities
/// - Defines one node per structural shape the engine emits.
/// - Keeps literals typed (`i64`, ordered `f64`, radix values).
/// - Prints trees as S-expressions.
pub mod ast;
/// Provides the error types for lexing and reduction.
///
/// This module defines every error that can abort a reduction pass. Each error
/// carries the offending token image or position so that a caller can render a
/// diagnostic.
///
/// # Responsibilities
/// - Defines `LexError` for the bundled lexer and `ReduceError` for the engine.
/// - Labels failures inside range bounds with the bound that failed.
/// - Supports integration with standard error handling traits.
pub mod error;
/// The reduction engine.
///
/// This module ties together the token cursor, the symbol resolver, the
/// context classifier, the range grammar, the per-kind rules and the stack
/// machine that drives them.
///
/// # Responsibilities
/// - Tokenizes source text with the bundled lexer.
/// - Reduces a token stream by operator precedence.
/// - Hands every structural decision to an output target.
pub mod reducer;
/// Operations and the symbol table collaborator.
pub mod symbols;
/// Output targets.
///
/// This module declares the `OutputTarget` trait the engine builds through and
/// its text, MathML and tree implementations.
pub mod target;

pub use reducer::lexer::lex;

/// What [`render`] and [`render_with`] produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Canonical linear text.
    #[default]
    Text,
    /// Presentation MathML.
    Markup,
    /// An S-expression of the syntax tree.
    Tree,
}

/// Renders `source` with the standard symbol table.
///
/// # Errors
/// Returns an error if the source cannot be tokenized or reduced.
///
/// # Examples
/// ```
/// use opreduce::{OutputFormat, render};
///
/// assert_eq!(render("2 + 3 * 4", OutputFormat::Tree).unwrap(), "(+ 2 (* 3 4))");
/// assert_eq!(render("-(a + b)", OutputFormat::Text).unwrap(), "-(a + b)");
///
/// // An unclosed group is reported rather than closed silently.
/// assert!(render("(a + b", OutputFormat::Text).is_err());
/// ```
pub fn render(source: &str, format: OutputFormat) -> Result<String, Box<dyn Error>> {
    let mut symbols = SymbolMap::standard();
    render_with(source, &mut symbols, format, false)
}

/// Renders `source` against `symbols`, which keeps any forward references the
/// reduction registers.
///
/// `pretty` indents markup and prints trees in their structured debug form.
///
/// # Errors
/// Returns an error if the source cannot be tokenized or reduced.
pub fn render_with<S: SymbolTable>(source: &str,
                                   symbols: &mut S,
                                   format: OutputFormat,
                                   pretty: bool)
                                   -> Result<String, Box<dyn Error>> {
    let tokens = lex(source)?;

    let rendered = match format {
        OutputFormat::Text => {
            let mut target = TextTarget::new();
            Reducer::new(symbols, &mut target).reduce(&tokens)?
        },
        OutputFormat::Markup => {
            let mut target = MarkupTarget::new();
            let math = Reducer::new(symbols, &mut target).reduce(&tokens)?;
            if pretty {
                math.pretty().trim_end().to_string()
            } else {
                math.to_string()
            }
        },
        OutputFormat::Tree => {
            let mut target = TreeTarget::new();
            let tree = Reducer::new(symbols, &mut target).reduce(&tokens)?;
            if pretty { format!("{tree:#?}") } else { tree.to_string() }
        },
    };

    Ok(rendered)
}
