use std::collections::HashMap;

use crate::symbols::operation::{
    Delimiter, NamedSymbol, Notation, Operation, OperationKind, STATEMENT_FLOOR,
};

/// Image of the binary subtraction operator.
pub const SUBTRACTION: &str = "-";
/// Reserved name of unary negation. Cannot be produced by the lexer.
pub const NEGATE: &str = "u-";
/// Reserved name of the implicit product inserted between adjacent operands
/// (U+2062 INVISIBLE TIMES).
pub const IMPLICIT_PRODUCT: &str = "\u{2062}";
/// Image of the parenthesis that turns an identifier into a call.
pub const OPEN_PAREN: &str = "(";

/// The symbol table collaborator consulted by the engine.
///
/// The engine reads kinds and precedences through [`SymbolTable::lookup`] and
/// writes only when registering forward references or names derived by a
/// calculus modifier.
pub trait SymbolTable {
    /// Looks up a name.
    fn lookup(&self, name: &str) -> Option<&NamedSymbol>;
    /// Registers a symbol, replacing any previous one with the same name.
    fn insert(&mut self, symbol: NamedSymbol);
}

/// A hash-map backed [`SymbolTable`].
///
/// # Example
/// ```
/// use opreduce::symbols::{NamedSymbol, OperationKind, SymbolMap, SymbolTable};
///
/// let symbols = SymbolMap::standard();
/// let plus = symbols.lookup("+").and_then(NamedSymbol::as_operation).unwrap();
/// assert!(matches!(plus.kind, OperationKind::BinaryOperator(_)));
/// assert!(symbols.lookup("x").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SymbolMap {
    symbols: HashMap<String, NamedSymbol>,
}

impl SymbolMap {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding the standard delimiters, operators and
    /// functions.
    #[must_use]
    pub fn standard() -> Self {
        let mut map = Self::new();
        for operation in standard_operations() {
            map.define_operation(operation);
        }
        map
    }

    /// Registers an operation.
    pub fn define_operation(&mut self, operation: Operation) {
        self.insert(NamedSymbol::Operation(operation));
    }

    /// Registers a plain value such as a variable.
    pub fn define_value(&mut self, name: impl Into<String>) {
        self.insert(NamedSymbol::PlainValue { name: name.into() });
    }

    /// Placeholder operations registered for names that were used before
    /// being defined, sorted by name.
    #[must_use]
    pub fn forward_references(&self) -> Vec<&Operation> {
        let mut placeholders: Vec<&Operation> =
            self.symbols
                .values()
                .filter_map(NamedSymbol::as_operation)
                .filter(|operation| operation.placeholder)
                .collect();
        placeholders.sort_by(|a, b| a.name.cmp(&b.name));
        placeholders
    }

    /// Number of registered symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether no symbol is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SymbolTable for SymbolMap {
    fn lookup(&self, name: &str) -> Option<&NamedSymbol> {
        self.symbols.get(name)
    }

    fn insert(&mut self, symbol: NamedSymbol) {
        self.symbols.insert(symbol.name().to_string(), symbol);
    }
}

/// The built-in operation set.
fn standard_operations() -> Vec<Operation> {
    use OperationKind::{
        Assignment, BinaryOperator, CalculusModifier, UnaryPostfix, UnaryPrefix,
        VectorRangeReduction,
    };

    let mut operations = vec![Operation::delimiter("(", Delimiter::Open),
                              Operation::delimiter(")", Delimiter::Close),
                              Operation::delimiter("{", Delimiter::Open),
                              Operation::delimiter("}", Delimiter::Close),
                              Operation::delimiter("]", Delimiter::Close),
                              Operation::delimiter(",", Delimiter::Continue),
                              Operation::delimiter(";", Delimiter::Storage),
                              Operation::new(":=", Assignment, STATEMENT_FLOOR).with_glyph("≔"),
                              Operation::new("=", BinaryOperator(Notation::Infix), 20),
                              Operation::new("<", BinaryOperator(Notation::Infix), 20),
                              Operation::new(">", BinaryOperator(Notation::Infix), 20),
                              Operation::new("<=", BinaryOperator(Notation::Infix), 20).with_glyph("≤"),
                              Operation::new(">=", BinaryOperator(Notation::Infix), 20).with_glyph("≥"),
                              Operation::new("!=", BinaryOperator(Notation::Infix), 20).with_glyph("≠"),
                              Operation::new("+", BinaryOperator(Notation::Infix), 30),
                              Operation::new(SUBTRACTION, BinaryOperator(Notation::Infix), 30).with_glyph("−"),
                              Operation::new("*", BinaryOperator(Notation::Infix), 40).with_glyph("×"),
                              Operation::new("/", BinaryOperator(Notation::Fraction), 40),
                              Operation::new(IMPLICIT_PRODUCT, BinaryOperator(Notation::Infix), 40),
                              Operation::new("sum", VectorRangeReduction, 35).with_glyph("∑"),
                              Operation::new("prod", VectorRangeReduction, 35).with_glyph("∏"),
                              Operation::new(NEGATE, UnaryPrefix, 50).with_glyph("−"),
                              Operation::new("^", BinaryOperator(Notation::Superscript), 60),
                              Operation::new("_", BinaryOperator(Notation::Subscript), 65),
                              Operation::new("!", UnaryPostfix, 80),
                              Operation::new("'", CalculusModifier, 90).with_glyph("′"),];

    operations.extend(["sin", "cos", "tan", "ln", "log", "exp", "sqrt", "abs"].into_iter()
                                                                              .map(Operation::function));
    operations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::operation::{CONTINUE_PRECEDENCE, FUNCTION_PRECEDENCE};

    fn operation<'a>(symbols: &'a SymbolMap, name: &str) -> &'a Operation {
        symbols.lookup(name)
               .and_then(NamedSymbol::as_operation)
               .unwrap_or_else(|| panic!("{name} is not a standard operation"))
    }

    #[test]
    fn standard_table_orders_arithmetic() {
        let symbols = SymbolMap::standard();
        assert!(operation(&symbols, "*").precedence > operation(&symbols, "+").precedence);
        assert!(operation(&symbols, "^").precedence > operation(&symbols, NEGATE).precedence);
        assert!(operation(&symbols, NEGATE).precedence > operation(&symbols, "*").precedence);
        assert_eq!(operation(&symbols, "sin").precedence, FUNCTION_PRECEDENCE);
        assert_eq!(operation(&symbols, ",").precedence, CONTINUE_PRECEDENCE);
    }

    #[test]
    fn plain_values_shadow_nothing_else() {
        let mut symbols = SymbolMap::standard();
        symbols.define_value("x");
        assert_eq!(symbols.lookup("x"),
                   Some(&NamedSymbol::PlainValue { name: "x".to_string() }));
        assert!(symbols.lookup("+").and_then(NamedSymbol::as_operation).is_some());
    }

    #[test]
    fn forward_references_are_listed_in_name_order() {
        let mut symbols = SymbolMap::new();
        symbols.define_operation(Operation::placeholder("g"));
        symbols.define_operation(Operation::function("sin"));
        symbols.define_operation(Operation::placeholder("f"));
        let names: Vec<&str> = symbols.forward_references()
                                      .iter()
                                      .map(|operation| operation.name.as_str())
                                      .collect();
        assert_eq!(names, ["f", "g"]);
    }
}
