use std::fmt;

use ordered_float::OrderedFloat;

/// Represents a numeric literal.
///
/// Literals keep the form they were written in: whole numbers, numbers with a
/// fractional part or exponent, and numbers written with a base prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A 64-bit floating-point literal. Ordered so that trees compare and hash.
    Real(OrderedFloat<f64>),
    /// A literal written with a base prefix such as `0x`.
    Radix {
        /// The value of the digits.
        value: u64,
        /// 2, 8 or 16.
        base:  u32,
    },
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Real(OrderedFloat(value))
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
            Self::Radix { value, base: 2 } => write!(f, "0b{value:b}"),
            Self::Radix { value, base: 8 } => write!(f, "0o{value:o}"),
            Self::Radix { value, base: 16 } => write!(f, "0x{value:x}"),
            Self::Radix { value, base } => write!(f, "{value}_{base}"),
        }
    }
}

/// A syntax tree node produced by [`crate::target::TreeTarget`].
///
/// Operators are kept by name, so a table with custom operators yields trees
/// with those names. Adjacent operands are recorded as `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A name used as a value.
    Identifier {
        /// The name.
        name: String,
    },
    /// A numeric literal.
    Literal {
        /// The parsed value.
        value: LiteralValue,
    },
    /// Quoted text.
    Text {
        /// The text without quotes.
        text: String,
    },
    /// A bracketed expression, either written or inserted to keep precedence.
    Group {
        /// The opening delimiter.
        open:  String,
        /// The closing delimiter.
        close: String,
        /// The bracketed expression.
        inner: Box<Self>,
    },
    /// Several parameters joined by a separator. May be empty.
    List {
        /// The parameters in order.
        items: Vec<Self>,
    },
    /// An operator with two operands.
    Binary {
        /// The operator name.
        op:    String,
        /// Left operand.
        left:  Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// An operator applied to the operand on its right.
    Prefix {
        /// The operator name.
        op:      String,
        /// The operand.
        operand: Box<Self>,
    },
    /// An operator applied to the operand on its left.
    Postfix {
        /// The operator name.
        op:      String,
        /// The operand.
        operand: Box<Self>,
    },
    /// Function call expression (e.g. `sin(x)`).
    Call {
        /// Name of the function being called.
        name:      String,
        /// Arguments to the function.
        arguments: Vec<Self>,
    },
    /// A range reduction such as `sum[1 <= i <= n] i`.
    Ranged {
        /// The reduction name.
        op:         String,
        /// The iteration variable.
        identifier: String,
        /// Lower bound.
        lo:         Box<Self>,
        /// Upper bound.
        hi:         Box<Self>,
        /// Increment, if given.
        step:       Option<Box<Self>>,
        /// The reduced expression.
        body:       Box<Self>,
    },
    /// A variable assignment binding a destination to an expression.
    Assign {
        /// The assignment operator name.
        op:          String,
        /// What is assigned to.
        destination: Box<Self>,
        /// The value which is being assigned.
        value:       Box<Self>,
    },
    /// Two statements, or one with a trailing separator.
    Sequence {
        /// The separator name.
        separator: String,
        /// The first statement.
        first:     Box<Self>,
        /// What follows the separator.
        rest:      Option<Box<Self>>,
    },
}

impl Expr {
    /// Whether this node holds no operator.
    /// ## Example
    /// ```
    /// use opreduce::ast::Expr;
    ///
    /// let expr = Expr::Identifier { name: "x".to_string() };
    /// assert!(expr.is_leaf());
    /// ```
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self,
                 Self::Identifier { .. } | Self::Literal { .. } | Self::Text { .. })
    }
}

/// Writes `items` separated by single spaces, each preceded by one.
fn spaced(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for item in items {
        write!(f, " {item}")?;
    }
    Ok(())
}

/// S-expression form, e.g. `(+ 2 (* 3 4))`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier { name } => write!(f, "{name}"),
            Self::Literal { value } => write!(f, "{value}"),
            Self::Text { text } => write!(f, "{text:?}"),
            Self::Group { open, close, inner } if open == "(" && close == ")" => {
                write!(f, "(group {inner})")
            },
            Self::Group { open, close, inner } => write!(f, "(group{open}{close} {inner})"),
            Self::List { items } => {
                write!(f, "(list")?;
                spaced(f, items)?;
                write!(f, ")")
            },
            Self::Binary { op, left, right } => write!(f, "({op} {left} {right})"),
            Self::Prefix { op, operand } => write!(f, "({op} {operand})"),
            Self::Postfix { op, operand } => write!(f, "(postfix {op} {operand})"),
            Self::Call { name, arguments } => {
                write!(f, "(call {name}")?;
                spaced(f, arguments)?;
                write!(f, ")")
            },
            Self::Ranged { op,
                           identifier,
                           lo,
                           hi,
                           step,
                           body, } => {
                write!(f, "({op} ({identifier} {lo} {hi}")?;
                if let Some(step) = step {
                    write!(f, " {step}")?;
                }
                write!(f, ") {body})")
            },
            Self::Assign { op,
                           destination,
                           value, } => write!(f, "({op} {destination} {value})"),
            Self::Sequence { separator,
                             first,
                             rest, } => match rest {
                Some(rest) => write!(f, "({separator} {first} {rest})"),
                None => write!(f, "({separator} {first})"),
            },
        }
    }
}
