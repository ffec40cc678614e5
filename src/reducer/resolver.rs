use log::debug;

use crate::{
    error::{ReduceError, ReduceResult},
    symbols::{NamedSymbol, Operation, OperationKind, Precedence, SymbolTable},
};

/// Wraps the symbol table collaborator for one reduction pass.
pub struct SymbolResolver<'a, S: SymbolTable> {
    symbols: &'a mut S,
}

impl<'a, S: SymbolTable> SymbolResolver<'a, S> {
    /// Wraps `symbols`.
    pub const fn new(symbols: &'a mut S) -> Self {
        Self { symbols }
    }

    /// Write access to the wrapped table, used to hand it to a nested pass.
    pub const fn symbols_mut(&mut self) -> &mut S {
        self.symbols
    }

    /// Resolves `name`, registering a placeholder function when it is
    /// unknown so that it can be defined later by the table's owner.
    pub fn classify(&mut self, name: &str) -> NamedSymbol {
        if let Some(symbol) = self.symbols.lookup(name) {
            return symbol.clone();
        }
        debug!("registering forward reference '{name}'");
        let placeholder = NamedSymbol::Operation(Operation::placeholder(name));
        self.symbols.insert(placeholder.clone());
        placeholder
    }

    /// Resolves `name` as an operation.
    ///
    /// # Errors
    /// `UnrepresentableSymbol` when `name` is registered as a plain value.
    pub fn operation(&mut self, name: &str, position: usize) -> ReduceResult<Operation> {
        match self.classify(name) {
            NamedSymbol::Operation(operation) => Ok(operation),
            NamedSymbol::PlainValue { name } => {
                Err(ReduceError::UnrepresentableSymbol { name, position })
            },
        }
    }

    /// Resolves an operator image that must already be registered. Only
    /// invoked names become forward references; punctuation never does.
    ///
    /// # Errors
    /// - `UnknownOperator` when `image` is not registered.
    /// - `UnrepresentableSymbol` when `image` is registered as a plain value.
    pub fn registered(&self, image: &str, position: usize) -> ReduceResult<Operation> {
        match self.symbols.lookup(image) {
            Some(NamedSymbol::Operation(operation)) => Ok(operation.clone()),
            Some(NamedSymbol::PlainValue { name }) => {
                Err(ReduceError::UnrepresentableSymbol { name: name.clone(),
                                                         position })
            },
            None => Err(ReduceError::UnknownOperator { image: image.to_string(),
                                                       position }),
        }
    }

    /// Whether `name` is already registered as an operation. Never registers
    /// anything.
    pub fn is_operation(&self, name: &str) -> bool {
        self.symbols
            .lookup(name)
            .and_then(NamedSymbol::as_operation)
            .is_some()
    }

    /// Whether `name` is registered as a calculus modifier.
    pub fn is_modifier(&self, name: &str) -> bool {
        self.symbols
            .lookup(name)
            .and_then(NamedSymbol::as_operation)
            .is_some_and(|operation| operation.kind == OperationKind::CalculusModifier)
    }

    /// Resolves the operation named `name` derived from `base` by a calculus
    /// modifier, registering a copy of `base` under that name when unseen.
    ///
    /// # Errors
    /// `UnrepresentableSymbol` when `name` is registered as a plain value.
    pub fn derive(&mut self,
                  base: &Operation,
                  name: &str,
                  position: usize)
                  -> ReduceResult<Operation> {
        if self.symbols.lookup(name).is_none() {
            debug!("registering derived operation '{name}'");
            self.symbols.insert(NamedSymbol::Operation(base.renamed(name)));
        }
        self.operation(name, position)
    }

    /// The declared precedence of `operation`.
    pub const fn precedence_of(operation: &Operation) -> Precedence {
        operation.precedence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{FUNCTION_PRECEDENCE, SymbolMap};

    #[test]
    fn unknown_names_become_placeholders() {
        let mut symbols = SymbolMap::standard();
        let mut resolver = SymbolResolver::new(&mut symbols);
        let f = resolver.operation("f", 0).unwrap();
        assert!(f.placeholder);
        assert_eq!(SymbolResolver::<SymbolMap>::precedence_of(&f), FUNCTION_PRECEDENCE);
        assert!(resolver.is_operation("f"));
        assert_eq!(symbols.forward_references().len(), 1);
    }

    #[test]
    fn plain_values_cannot_be_operators() {
        let mut symbols = SymbolMap::standard();
        symbols.define_value("x");
        let mut resolver = SymbolResolver::new(&mut symbols);
        assert_eq!(resolver.operation("x", 3),
                   Err(ReduceError::UnrepresentableSymbol { name:     "x".to_string(),
                                                            position: 3, }));
    }

    #[test]
    fn derived_names_copy_their_base() {
        let mut symbols = SymbolMap::standard();
        let mut resolver = SymbolResolver::new(&mut symbols);
        let sin = resolver.operation("sin", 0).unwrap();
        let derived = resolver.derive(&sin, "sin'", 1).unwrap();
        assert_eq!(derived.name, "sin'");
        assert_eq!(derived.kind, OperationKind::ParameterizedFunction);
        assert!(!derived.placeholder);
        assert!(resolver.is_modifier("'"));
        assert!(!resolver.is_operation("x"));
    }

    #[test]
    fn operator_images_are_never_placeholders() {
        let mut symbols = SymbolMap::standard();
        let resolver = SymbolResolver::new(&mut symbols);
        assert_eq!(resolver.registered("+", 0).unwrap().name, "+");
        assert_eq!(resolver.registered("<>", 2),
                   Err(ReduceError::UnknownOperator { image:    "<>".to_string(),
                                                      position: 2, }));
        assert!(symbols.forward_references().is_empty());
    }
}
