use std::fmt::{self, Write as _};

use crate::{
    error::ReduceResult,
    reducer::{RangeDescriptor, Token, TokenKind},
    symbols::Operation,
    target::{Enhanced, OutputTarget},
};

const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";
/// U+2061 FUNCTION APPLICATION.
const APPLY_FUNCTION: &str = "\u{2061}";

/// A presentation MathML node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathNode {
    /// A token element holding text, such as `<mi>x</mi>`.
    Token {
        tag:  &'static str,
        text: String,
    },
    /// A layout element holding other nodes, such as `<mrow>`.
    Element {
        tag:        &'static str,
        attributes: Vec<(&'static str, String)>,
        children:   Vec<MathNode>,
    },
}

impl MathNode {
    pub fn token(tag: &'static str, text: impl Into<String>) -> Self {
        Self::Token { tag,
                      text: text.into() }
    }

    #[must_use]
    pub const fn element(tag: &'static str, children: Vec<Self>) -> Self {
        Self::Element { tag,
                        attributes: Vec::new(),
                        children }
    }

    fn operator(text: impl Into<String>) -> Self {
        Self::token("mo", text)
    }

    fn row(children: Vec<Self>) -> Self {
        Self::element("mrow", children)
    }

    /// Adds an attribute. Token nodes carry none and are returned unchanged.
    #[must_use]
    pub fn with_attribute(mut self, name: &'static str, value: impl Into<String>) -> Self {
        if let Self::Element { attributes, .. } = &mut self {
            attributes.push((name, value.into()));
        }
        self
    }

    /// Serializes with one element per line, indented by two spaces per level.
    /// Token elements stay on one line.
    #[must_use]
    pub fn pretty(&self) -> String {
        let mut output = String::new();
        self.write_pretty(&mut output, 0);
        output
    }

    fn write_pretty(&self, output: &mut String, level: usize) {
        let indent = "  ".repeat(level);
        match self {
            Self::Token { .. } => {
                let _ = writeln!(output, "{indent}{self}");
            },
            Self::Element { tag,
                            attributes,
                            children, } => {
                let _ = writeln!(output, "{indent}<{tag}{}>", Attributes(attributes));
                for child in children {
                    child.write_pretty(output, level + 1);
                }
                let _ = writeln!(output, "{indent}</{tag}>");
            },
        }
    }
}

struct Attributes<'a>(&'a [(&'static str, String)]);

impl fmt::Display for Attributes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.0 {
            write!(f, " {name}=\"{}\"", escape_xml(value))?;
        }
        Ok(())
    }
}

impl fmt::Display for MathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { tag, text } => write!(f, "<{tag}>{}</{tag}>", escape_xml(text)),
            Self::Element { tag,
                            attributes,
                            children, } => {
                write!(f, "<{tag}{}>", Attributes(attributes))?;
                for child in children {
                    write!(f, "{child}")?;
                }
                write!(f, "</{tag}>")
            },
        }
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Names carry the typographic prime in place of the modifier image.
fn display_name(name: &str) -> String {
    name.replace('\'', "\u{2032}")
}

/// Splits a radix literal into its digits and base.
fn radix_parts(image: &str) -> Option<(&str, &str)> {
    let digits = image.get(2..)?;
    let base = match image.get(..2)? {
        "0x" | "0X" => "16",
        "0b" | "0B" => "2",
        "0o" | "0O" => "8",
        _ => return None,
    };
    Some((digits, base))
}

/// Renders reductions as presentation MathML.
///
/// # Example
/// ```
/// use opreduce::{
///     reducer::{Reducer, lexer::lex},
///     symbols::SymbolMap,
///     target::MarkupTarget,
/// };
///
/// let mut symbols = SymbolMap::standard();
/// let mut target = MarkupTarget::new();
/// let tokens = lex("x^2").unwrap();
/// let math = Reducer::new(&mut symbols, &mut target).reduce(&tokens).unwrap();
/// assert_eq!(math.to_string(),
///            "<math xmlns=\"http://www.w3.org/1998/Math/MathML\">\
///             <msup><mi>x</mi><mn>2</mn></msup></math>");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupTarget;

impl MarkupTarget {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl OutputTarget for MarkupTarget {
    type Node = MathNode;

    fn identifier(&mut self, name: &str) -> MathNode {
        MathNode::token("mi", name)
    }

    fn number(&mut self, token: &Token) -> ReduceResult<MathNode> {
        if token.kind == TokenKind::RadixLiteral
           && let Some((digits, base)) = radix_parts(&token.image)
        {
            return Ok(MathNode::element("msub",
                                        vec![MathNode::token("mn", digits),
                                             MathNode::token("mn", base)]));
        }
        Ok(MathNode::token("mn", token.image.as_str()))
    }

    fn quoted(&mut self, text: &str) -> MathNode {
        MathNode::token("ms", text)
    }

    fn bracket(&mut self, open: &str, close: &str, inner: MathNode) -> MathNode {
        MathNode::row(vec![MathNode::operator(open), inner, MathNode::operator(close)])
    }

    fn group(&mut self, mut items: Vec<MathNode>) -> MathNode {
        if items.len() == 1
           && let Some(item) = items.pop()
        {
            return item;
        }
        let mut children = Vec::with_capacity(items.len() * 2);
        for (index, item) in items.into_iter().enumerate() {
            if index > 0 {
                children.push(MathNode::operator(","));
            }
            children.push(item);
        }
        MathNode::row(children)
    }

    fn binary(&mut self, op: &Operation, left: MathNode, right: MathNode) -> MathNode {
        MathNode::row(vec![left, MathNode::operator(op.glyph()), right])
    }

    fn superscript(&mut self, _op: &Operation, base: MathNode, exponent: MathNode) -> MathNode {
        MathNode::element("msup", vec![base, exponent])
    }

    fn subscript(&mut self, _op: &Operation, base: MathNode, index: MathNode) -> MathNode {
        MathNode::element("msub", vec![base, index])
    }

    fn fraction(&mut self, _op: &Operation, numerator: MathNode, denominator: MathNode) -> MathNode {
        MathNode::element("mfrac", vec![numerator, denominator])
    }

    fn prefix(&mut self, op: &Operation, operand: MathNode) -> MathNode {
        MathNode::row(vec![MathNode::operator(op.glyph()), operand])
    }

    fn postfix(&mut self, op: &Operation, operand: MathNode) -> MathNode {
        MathNode::row(vec![operand, MathNode::operator(op.glyph())])
    }

    fn enhanced_call(&mut self, op: &Operation, argument: MathNode) -> Enhanced<MathNode> {
        match op.name.as_str() {
            "sqrt" => Enhanced::Handled(MathNode::element("msqrt", vec![argument])),
            "abs" => Enhanced::Handled(MathNode::row(vec![MathNode::operator("|"),
                                                          argument,
                                                          MathNode::operator("|")])),
            _ => Enhanced::Declined(argument),
        }
    }

    fn call(&mut self, op: &Operation, arguments: MathNode) -> MathNode {
        MathNode::row(vec![MathNode::token("mi", display_name(&op.name)),
                           MathNode::operator(APPLY_FUNCTION),
                           arguments])
    }

    fn ranged(&mut self, op: &Operation, range: RangeDescriptor<MathNode>, operand: MathNode) -> MathNode {
        let RangeDescriptor { lo_bound,
                              hi_bound,
                              identifier,
                              increment, } = range;
        let mut under = vec![MathNode::token("mi", identifier),
                             MathNode::operator("="),
                             lo_bound];
        if let Some(step) = increment {
            under.push(MathNode::operator(";"));
            under.push(step);
        }
        let glyph = op.glyph.clone().unwrap_or_else(|| display_name(&op.name));
        let operator = MathNode::element("munderover",
                                         vec![MathNode::operator(glyph),
                                              MathNode::row(under),
                                              hi_bound]);
        MathNode::row(vec![operator, operand])
    }

    fn assignment(&mut self, op: &Operation, destination: MathNode, source: MathNode) -> MathNode {
        MathNode::row(vec![destination, MathNode::operator(op.glyph()), source])
    }

    fn sequence(&mut self, separator: &Operation, first: MathNode, rest: Option<MathNode>) -> MathNode {
        let mut children = vec![first, MathNode::operator(separator.glyph())];
        children.extend(rest);
        MathNode::row(children)
    }

    fn root(&mut self, node: MathNode) -> MathNode {
        MathNode::element("math", vec![node]).with_attribute("xmlns", MATHML_NAMESPACE)
    }
}
