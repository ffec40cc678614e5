use crate::{
    error::ReduceResult,
    reducer::{RangeDescriptor, Token},
    symbols::Operation,
};

/// Plain linear text.
///
/// Renders a reduction as canonical infix text that reduces back to the same
/// text. Used by the command line default and by most tests.
pub mod text;
/// Presentation MathML.
///
/// Builds a [`markup::MathNode`] element tree and serializes it compactly or
/// with indentation.
///
/// # Responsibilities
/// - Maps every structural shape onto the matching MathML element.
/// - Renders `sqrt` and `abs` calls with their dedicated notation.
/// - Escapes text content.
pub mod markup;
/// Syntax trees.
///
/// Builds [`crate::ast::Expr`] nodes, parsing numeric literals into typed
/// values on the way.
pub mod tree;

pub use markup::{MarkupTarget, MathNode};
pub use text::TextTarget;
pub use tree::TreeTarget;

/// Outcome of [`OutputTarget::enhanced_call`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enhanced<N> {
    /// The target rendered the call itself.
    Handled(N),
    /// The target declined; the argument is handed back unchanged.
    Declined(N),
}

/// Turns the structural decisions of the reduction engine into output.
///
/// The engine never builds output itself. Swapping the target changes what a
/// reduction produces (text, markup, a tree) without touching the engine.
pub trait OutputTarget {
    /// What the target builds.
    type Node;

    /// A name used as a value.
    fn identifier(&mut self, name: &str) -> Self::Node;

    /// A numeric literal of any numeric token kind.
    ///
    /// # Errors
    /// `InvalidLiteral` when the target cannot represent the literal.
    fn number(&mut self, token: &Token) -> ReduceResult<Self::Node>;

    /// Quoted text.
    fn quoted(&mut self, text: &str) -> Self::Node;

    /// Wraps `inner` in a pair of delimiters.
    fn bracket(&mut self, open: &str, close: &str, inner: Self::Node) -> Self::Node;

    /// Joins the parameters accumulated in one group.
    fn group(&mut self, items: Vec<Self::Node>) -> Self::Node;

    /// `left op right`.
    fn binary(&mut self, op: &Operation, left: Self::Node, right: Self::Node) -> Self::Node;

    /// `base` raised by `exponent`.
    fn superscript(&mut self, op: &Operation, base: Self::Node, exponent: Self::Node)
                   -> Self::Node;

    /// `base` indexed by `index`.
    fn subscript(&mut self, op: &Operation, base: Self::Node, index: Self::Node) -> Self::Node;

    /// `numerator` over `denominator`.
    fn fraction(&mut self,
                op: &Operation,
                numerator: Self::Node,
                denominator: Self::Node)
                -> Self::Node;

    /// `op operand`.
    fn prefix(&mut self, op: &Operation, operand: Self::Node) -> Self::Node;

    /// `operand op`.
    fn postfix(&mut self, op: &Operation, operand: Self::Node) -> Self::Node;

    /// Gives the target a chance to render a call with dedicated notation
    /// before the argument is bracketed.
    fn enhanced_call(&mut self, _op: &Operation, argument: Self::Node) -> Enhanced<Self::Node> {
        Enhanced::Declined(argument)
    }

    /// A call of `op` with an already bracketed argument list.
    fn call(&mut self, op: &Operation, arguments: Self::Node) -> Self::Node;

    /// A range reduction such as a summation.
    fn ranged(&mut self,
              op: &Operation,
              range: RangeDescriptor<Self::Node>,
              operand: Self::Node)
              -> Self::Node;

    /// `destination := source`.
    fn assignment(&mut self,
                  op: &Operation,
                  destination: Self::Node,
                  source: Self::Node)
                  -> Self::Node;

    /// Statements joined by a storage delimiter. `rest` is absent after a
    /// trailing separator.
    fn sequence(&mut self,
                separator: &Operation,
                first: Self::Node,
                rest: Option<Self::Node>)
                -> Self::Node;

    /// Wraps the finished result.
    fn root(&mut self, node: Self::Node) -> Self::Node;
}
