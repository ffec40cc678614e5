use crate::{
    ast::{Expr, LiteralValue},
    error::{ReduceError, ReduceResult},
    reducer::{RangeDescriptor, Token, TokenKind},
    symbols::{IMPLICIT_PRODUCT, Operation},
    target::OutputTarget,
};

/// Builds [`Expr`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeTarget;

impl TreeTarget {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn invalid(token: &Token) -> ReduceError {
    ReduceError::InvalidLiteral { image: token.image.clone() }
}

fn radix(token: &Token) -> ReduceResult<LiteralValue> {
    let image = token.image.as_str();
    let base = match image.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0b" | "0B") => 2,
        Some("0o" | "0O") => 8,
        _ => return Err(invalid(token)),
    };
    let digits = image.get(2..).ok_or_else(|| invalid(token))?;
    let value = u64::from_str_radix(digits, base).map_err(|_| invalid(token))?;
    Ok(LiteralValue::Radix { value, base })
}

fn parse_literal(token: &Token) -> ReduceResult<LiteralValue> {
    match token.kind {
        TokenKind::Integer => token.image.parse::<i64>().map(LiteralValue::from).map_err(|_| invalid(token)),
        TokenKind::Decimal | TokenKind::Float | TokenKind::Number => {
            token.image.parse::<f64>().map(LiteralValue::from).map_err(|_| invalid(token))
        },
        TokenKind::RadixLiteral => radix(token),
        _ => Err(invalid(token)),
    }
}

/// A call's argument list arrives bracketed. Unwraps it into one argument per
/// parameter.
fn arguments(bracketed: Expr) -> Vec<Expr> {
    match bracketed {
        Expr::Group { inner, .. } => match *inner {
            Expr::List { items } => items,
            single => vec![single],
        },
        other => vec![other],
    }
}

impl OutputTarget for TreeTarget {
    type Node = Expr;

    fn identifier(&mut self, name: &str) -> Expr {
        Expr::Identifier { name: name.to_string() }
    }

    fn number(&mut self, token: &Token) -> ReduceResult<Expr> {
        Ok(Expr::Literal { value: parse_literal(token)? })
    }

    fn quoted(&mut self, text: &str) -> Expr {
        Expr::Text { text: text.to_string() }
    }

    fn bracket(&mut self, open: &str, close: &str, inner: Expr) -> Expr {
        Expr::Group { open:  open.to_string(),
                      close: close.to_string(),
                      inner: Box::new(inner), }
    }

    fn group(&mut self, mut items: Vec<Expr>) -> Expr {
        if items.len() == 1
           && let Some(item) = items.pop()
        {
            return item;
        }
        Expr::List { items }
    }

    fn binary(&mut self, op: &Operation, left: Expr, right: Expr) -> Expr {
        let op = if op.name == IMPLICIT_PRODUCT { "*".to_string() } else { op.name.clone() };
        Expr::Binary { op,
                       left: Box::new(left),
                       right: Box::new(right) }
    }

    fn superscript(&mut self, op: &Operation, base: Expr, exponent: Expr) -> Expr {
        self.binary(op, base, exponent)
    }

    fn subscript(&mut self, op: &Operation, base: Expr, index: Expr) -> Expr {
        self.binary(op, base, index)
    }

    fn fraction(&mut self, op: &Operation, numerator: Expr, denominator: Expr) -> Expr {
        self.binary(op, numerator, denominator)
    }

    fn prefix(&mut self, op: &Operation, operand: Expr) -> Expr {
        Expr::Prefix { op:      op.name.clone(),
                       operand: Box::new(operand), }
    }

    fn postfix(&mut self, op: &Operation, operand: Expr) -> Expr {
        Expr::Postfix { op:      op.name.clone(),
                        operand: Box::new(operand), }
    }

    fn call(&mut self, op: &Operation, arguments_list: Expr) -> Expr {
        Expr::Call { name:      op.name.clone(),
                     arguments: arguments(arguments_list), }
    }

    fn ranged(&mut self, op: &Operation, range: RangeDescriptor<Expr>, operand: Expr) -> Expr {
        Expr::Ranged { op:         op.name.clone(),
                       identifier: range.identifier,
                       lo:         Box::new(range.lo_bound),
                       hi:         Box::new(range.hi_bound),
                       step:       range.increment.map(Box::new),
                       body:       Box::new(operand), }
    }

    fn assignment(&mut self, op: &Operation, destination: Expr, source: Expr) -> Expr {
        Expr::Assign { op:          op.name.clone(),
                       destination: Box::new(destination),
                       value:       Box::new(source), }
    }

    fn sequence(&mut self, separator: &Operation, first: Expr, rest: Option<Expr>) -> Expr {
        Expr::Sequence { separator: separator.name.clone(),
                         first:     Box::new(first),
                         rest:      rest.map(Box::new), }
    }

    fn root(&mut self, node: Expr) -> Expr {
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        reducer::{Reducer, lexer::lex},
        symbols::SymbolMap,
    };

    fn tree(source: &str) -> ReduceResult<Expr> {
        let mut symbols = SymbolMap::standard();
        let mut target = TreeTarget::new();
        let tokens = lex(source).unwrap();
        Reducer::new(&mut symbols, &mut target).reduce(&tokens)
    }

    fn sexpr(source: &str) -> String {
        tree(source).unwrap().to_string()
    }

    #[test]
    fn literals_are_typed() {
        assert_eq!(tree("42").unwrap(),
                   Expr::Literal { value: LiteralValue::Integer(42) });
        assert_eq!(tree("2.5e1").unwrap(),
                   Expr::Literal { value: LiteralValue::from(25.0) });
        assert_eq!(tree("0b101").unwrap(),
                   Expr::Literal { value: LiteralValue::Radix { value: 5,
                                                                base:  2, }, });
    }

    #[test]
    fn oversized_integers_are_rejected() {
        assert_eq!(tree("99999999999999999999"),
                   Err(ReduceError::InvalidLiteral { image: "99999999999999999999".to_string() }));
    }

    #[test]
    fn structure() {
        assert_eq!(sexpr("2 + 3 * 4"), "(+ 2 (* 3 4))");
        assert_eq!(sexpr("(2 + 3) * 4"), "(* (group (+ 2 3)) 4)");
        assert_eq!(sexpr("-3"), "(u- 3)");
        assert_eq!(sexpr("n!"), "(postfix ! n)");
        assert_eq!(sexpr("2 x"), "(* 2 x)");
        assert_eq!(sexpr("x := 3; y"), "(; (:= x 3) y)");
        assert_eq!(sexpr("a, b"), "(list a b)");
    }

    #[test]
    fn calls_unwrap_their_argument_list() {
        assert_eq!(sexpr("f(x, y)"), "(call f x y)");
        assert_eq!(sexpr("sin(x)"), "(call sin x)");
        assert_eq!(sexpr("f()"), "(call f)");
        assert_eq!(sexpr("f((a, b))"), "(call f (group (list a b)))");
    }

    #[test]
    fn ranges() {
        assert_eq!(sexpr("sum[0 <= i <= n] i^2"), "(sum (i 0 n) (^ i 2))");
        assert_eq!(sexpr("prod[1 <= k <= 9 <> 2] k"), "(prod (k 1 9 2) k)");
    }
}
