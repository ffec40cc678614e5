use crate::{
    reducer::{resolver::SymbolResolver, token::{Token, TokenKind}},
    symbols::{NEGATE, OPEN_PAREN, SUBTRACTION, SymbolTable},
};

/// What the engine processed immediately before the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Previous {
    /// Nothing yet.
    Start,
    /// An identifier or literal.
    Operand,
    /// An operator that leaves an operand expected.
    Operator,
    /// A close delimiter or postfix operator, which leave an atomic operand.
    Closing,
}

impl Previous {
    /// Whether an operand immediately precedes the current token.
    #[must_use]
    pub const fn ends_operand(self) -> bool {
        matches!(self, Self::Operand | Self::Closing)
    }
}

/// A token's kind and name after context has been taken into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified<'t> {
    /// The effective kind.
    pub kind: TokenKind,
    /// The name to resolve: the image, or a rewritten operator name.
    pub name: &'t str,
}

/// Computes the effective kind of `token`.
///
/// An identifier becomes an operator when it is a registered operation, or
/// when the next token is an open parenthesis or a calculus modifier. A
/// subtraction sign becomes negation unless an operand precedes it.
pub fn effective_kind<'t, S: SymbolTable>(token: &'t Token,
                                          lookahead: Option<&Token>,
                                          previous: Previous,
                                          resolver: &SymbolResolver<'_, S>)
                                          -> Classified<'t> {
    match token.kind {
        TokenKind::Identifier if resolver.is_operation(&token.image) || invokes(lookahead, resolver) => {
            Classified { kind: TokenKind::Operator,
                         name: &token.image }
        },
        TokenKind::Operator if token.image == SUBTRACTION && !previous.ends_operand() => {
            Classified { kind: TokenKind::Operator,
                         name: NEGATE }
        },
        kind => Classified { kind,
                             name: &token.image },
    }
}

fn invokes<S: SymbolTable>(lookahead: Option<&Token>, resolver: &SymbolResolver<'_, S>) -> bool {
    lookahead.is_some_and(|next| {
                 next.is_operator(OPEN_PAREN)
                 || (next.kind == TokenKind::Operator && resolver.is_modifier(&next.image))
             })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolMap;

    fn classify(token: &Token, lookahead: Option<&Token>, previous: Previous) -> (TokenKind, String) {
        let mut symbols = SymbolMap::standard();
        let resolver = SymbolResolver::new(&mut symbols);
        let classified = effective_kind(token, lookahead, previous, &resolver);
        (classified.kind, classified.name.to_string())
    }

    #[test]
    fn minus_at_start_or_after_operator_negates() {
        let minus = Token::new("-", TokenKind::Operator);
        for previous in [Previous::Start, Previous::Operator] {
            assert_eq!(classify(&minus, None, previous),
                       (TokenKind::Operator, NEGATE.to_string()));
        }
    }

    #[test]
    fn minus_after_operand_subtracts() {
        let minus = Token::new("-", TokenKind::Operator);
        for previous in [Previous::Operand, Previous::Closing] {
            assert_eq!(classify(&minus, None, previous),
                       (TokenKind::Operator, "-".to_string()));
        }
    }

    #[test]
    fn identifiers_become_operators_when_invoked() {
        let f = Token::new("f", TokenKind::Identifier);
        let open = Token::new("(", TokenKind::Operator);
        let prime = Token::new("'", TokenKind::Operator);
        let plus = Token::new("+", TokenKind::Operator);
        assert_eq!(classify(&f, Some(&open), Previous::Start).0, TokenKind::Operator);
        assert_eq!(classify(&f, Some(&prime), Previous::Start).0, TokenKind::Operator);
        assert_eq!(classify(&f, Some(&plus), Previous::Start).0, TokenKind::Identifier);
        assert_eq!(classify(&f, None, Previous::Start).0, TokenKind::Identifier);
    }

    #[test]
    fn registered_operations_are_operators_anywhere() {
        let sum = Token::new("sum", TokenKind::Identifier);
        assert_eq!(classify(&sum, None, Previous::Operand).0, TokenKind::Operator);
    }

    #[test]
    fn literals_keep_their_kind() {
        let number = Token::new("3", TokenKind::Integer);
        assert_eq!(classify(&number, None, Previous::Start),
                   (TokenKind::Integer, "3".to_string()));
    }
}
