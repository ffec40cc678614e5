/// Binding strength of an operation. Larger binds tighter.
pub type Precedence = u32;

/// Tags a fully reduced leaf. Never used as an operator precedence.
pub const ATOMIC_PRECEDENCE: Precedence = Precedence::MAX;
/// Precedence of the empty pending-operator register.
pub const ROOT_PRECEDENCE: Precedence = 0;
/// Reserved precedence of opening delimiters.
pub const OPEN_PRECEDENCE: Precedence = 1;
/// Reserved precedence of closing delimiters.
pub const CLOSE_PRECEDENCE: Precedence = 2;
/// Reserved precedence of argument separators. Also tags joined parameter
/// lists.
pub const CONTINUE_PRECEDENCE: Precedence = 3;
/// Reserved precedence of statement separators.
pub const STORAGE_PRECEDENCE: Precedence = 4;
/// Operators at or below this precedence are never reduced by an incoming
/// operator, only by delimiters or the end of input.
pub const STATEMENT_FLOOR: Precedence = 10;
/// Precedence given to functions, including forward references.
pub const FUNCTION_PRECEDENCE: Precedence = 70;

/// The role of a delimiter operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// Opens a group, e.g. `(`.
    Open,
    /// Closes a group, e.g. `)`.
    Close,
    /// Separates parameters inside a group, e.g. `,`.
    Continue,
    /// Separates statements and keeps the boundary, e.g. `;`.
    Storage,
}

impl Delimiter {
    /// The precedence reserved for this delimiter role.
    #[must_use]
    pub const fn precedence(self) -> Precedence {
        match self {
            Self::Open => OPEN_PRECEDENCE,
            Self::Close => CLOSE_PRECEDENCE,
            Self::Continue => CONTINUE_PRECEDENCE,
            Self::Storage => STORAGE_PRECEDENCE,
        }
    }
}

/// How a binary operator lays out its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    /// `left op right`
    Infix,
    /// `left` raised by `right`.
    Superscript,
    /// `left` indexed by `right`.
    Subscript,
    /// `left` over `right`.
    Fraction,
}

/// Every kind of operation the engine knows how to combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Combines a left and a right operand.
    BinaryOperator(Notation),
    /// Applies to the operand on its right, e.g. negation.
    UnaryPrefix,
    /// Applies to the operand on its left, e.g. `!`.
    UnaryPostfix,
    /// A named function applied to an argument list.
    ParameterizedFunction,
    /// An operator such as `sum` that iterates over a range.
    VectorRangeReduction,
    /// `destination := source`.
    Assignment,
    /// Grouping and separating punctuation.
    Delimiter(Delimiter),
    /// Rewrites the name of the pending operator, e.g. `'`.
    CalculusModifier,
}

impl OperationKind {
    /// Whether an operator of this kind starts a new operand rather than
    /// consuming the one already held.
    #[must_use]
    pub const fn starts_operand(self) -> bool {
        matches!(self,
                 Self::UnaryPrefix
                 | Self::ParameterizedFunction
                 | Self::VectorRangeReduction
                 | Self::Delimiter(Delimiter::Open))
    }
}

/// An operation registered in a symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// The name or image the operation is looked up by.
    pub name:        String,
    /// How the operation combines.
    pub kind:        OperationKind,
    /// Binding strength.
    pub precedence:  Precedence,
    /// Display form for targets that prefer a typographic symbol.
    pub glyph:       Option<String>,
    /// Set on forward references the engine registered on its own.
    pub placeholder: bool,
}

impl Operation {
    /// Creates an operation with no glyph.
    pub fn new(name: impl Into<String>, kind: OperationKind, precedence: Precedence) -> Self {
        debug_assert!(precedence != ATOMIC_PRECEDENCE);
        Self { name: name.into(),
               kind,
               precedence,
               glyph: None,
               placeholder: false }
    }

    /// Creates a delimiter with the precedence reserved for its role.
    pub fn delimiter(name: impl Into<String>, role: Delimiter) -> Self {
        Self::new(name, OperationKind::Delimiter(role), role.precedence())
    }

    /// Creates a function.
    pub fn function(name: impl Into<String>) -> Self {
        Self::new(name,
                  OperationKind::ParameterizedFunction,
                  FUNCTION_PRECEDENCE)
    }

    /// Creates the placeholder registered for an unknown name used as an
    /// operator.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self { placeholder: true,
               ..Self::function(name) }
    }

    /// Attaches a display glyph.
    #[must_use]
    pub fn with_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.glyph = Some(glyph.into());
        self
    }

    /// Copies this operation under a new name. The glyph is dropped because it
    /// belonged to the old name.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self { name:        name.into(),
               kind:        self.kind,
               precedence:  self.precedence,
               glyph:       None,
               placeholder: self.placeholder, }
    }

    /// The glyph if one is set, otherwise the name.
    #[must_use]
    pub fn glyph(&self) -> &str {
        self.glyph.as_deref().unwrap_or(&self.name)
    }

    /// Whether this operation opens a group.
    #[must_use]
    pub const fn opens_group(&self) -> bool {
        matches!(self.kind, OperationKind::Delimiter(Delimiter::Open))
    }
}

/// What a name resolves to in a symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedSymbol {
    /// An operator, function or delimiter.
    Operation(Operation),
    /// A stored value such as a variable or constant.
    PlainValue {
        /// The value's name.
        name: String,
    },
}

impl NamedSymbol {
    /// The name the symbol is registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Operation(operation) => &operation.name,
            Self::PlainValue { name } => name,
        }
    }

    /// The operation, if this symbol is one.
    #[must_use]
    pub const fn as_operation(&self) -> Option<&Operation> {
        match self {
            Self::Operation(operation) => Some(operation),
            Self::PlainValue { .. } => None,
        }
    }
}

impl From<Operation> for NamedSymbol {
    fn from(operation: Operation) -> Self {
        Self::Operation(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiters_take_reserved_precedence() {
        assert_eq!(Operation::delimiter("(", Delimiter::Open).precedence,
                   OPEN_PRECEDENCE);
        assert_eq!(Operation::delimiter(";", Delimiter::Storage).precedence,
                   STORAGE_PRECEDENCE);
    }

    #[test]
    fn renamed_keeps_kind_and_drops_glyph() {
        let sum = Operation::new("sum", OperationKind::VectorRangeReduction, 40).with_glyph("∑");
        let derived = sum.renamed("sum'");
        assert_eq!(derived.kind, OperationKind::VectorRangeReduction);
        assert_eq!(derived.precedence, 40);
        assert_eq!(derived.glyph(), "sum'");
        assert_eq!(sum.glyph(), "∑");
    }

    #[test]
    fn placeholders_are_functions() {
        let f = Operation::placeholder("f");
        assert!(f.placeholder);
        assert_eq!(f.kind, OperationKind::ParameterizedFunction);
        assert_eq!(f.precedence, FUNCTION_PRECEDENCE);
    }
}
