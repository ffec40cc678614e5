use crate::{
    error::ReduceResult,
    reducer::{RangeDescriptor, Token},
    symbols::{IMPLICIT_PRODUCT, NEGATE, Operation, SUBTRACTION},
    target::OutputTarget,
};

/// Renders reductions as canonical infix text.
///
/// Operators are written by name, with the reserved names mapped back to what
/// a user types. The output reduces back to itself under the standard table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTarget;

impl TextTarget {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn spelling(op: &Operation) -> &str {
    if op.name == NEGATE { SUBTRACTION } else { &op.name }
}

impl OutputTarget for TextTarget {
    type Node = String;

    fn identifier(&mut self, name: &str) -> String {
        name.to_string()
    }

    fn number(&mut self, token: &Token) -> ReduceResult<String> {
        Ok(token.image.clone())
    }

    fn quoted(&mut self, text: &str) -> String {
        format!("\"{text}\"")
    }

    fn bracket(&mut self, open: &str, close: &str, inner: String) -> String {
        format!("{open}{inner}{close}")
    }

    fn group(&mut self, items: Vec<String>) -> String {
        items.join(", ")
    }

    fn binary(&mut self, op: &Operation, left: String, right: String) -> String {
        if op.name == IMPLICIT_PRODUCT {
            format!("{left} {right}")
        } else {
            format!("{left} {} {right}", op.name)
        }
    }

    fn superscript(&mut self, _op: &Operation, base: String, exponent: String) -> String {
        format!("{base}^{exponent}")
    }

    fn subscript(&mut self, _op: &Operation, base: String, index: String) -> String {
        format!("{base}_{index}")
    }

    fn fraction(&mut self, _op: &Operation, numerator: String, denominator: String) -> String {
        format!("{numerator} / {denominator}")
    }

    fn prefix(&mut self, op: &Operation, operand: String) -> String {
        let name = spelling(op);
        if name.ends_with(|c: char| c.is_alphanumeric()) {
            format!("{name} {operand}")
        } else {
            format!("{name}{operand}")
        }
    }

    fn postfix(&mut self, op: &Operation, operand: String) -> String {
        format!("{operand}{}", op.name)
    }

    fn call(&mut self, op: &Operation, arguments: String) -> String {
        format!("{}{arguments}", op.name)
    }

    fn ranged(&mut self, op: &Operation, range: RangeDescriptor<String>, operand: String) -> String {
        let RangeDescriptor { lo_bound,
                              hi_bound,
                              identifier,
                              increment, } = range;
        let step = increment.map(|step| format!(" <> {step}")).unwrap_or_default();
        format!("{}[{lo_bound} <= {identifier} <= {hi_bound}{step}] {operand}",
                op.name)
    }

    fn assignment(&mut self, op: &Operation, destination: String, source: String) -> String {
        format!("{destination} {} {source}", op.name)
    }

    fn sequence(&mut self, separator: &Operation, first: String, rest: Option<String>) -> String {
        match rest {
            Some(rest) => format!("{first}{} {rest}", separator.name),
            None => format!("{first}{}", separator.name),
        }
    }

    fn root(&mut self, node: String) -> String {
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::OperationKind;

    #[test]
    fn negation_is_written_as_minus() {
        let negate = Operation::new(NEGATE, OperationKind::UnaryPrefix, 50);
        assert_eq!(TextTarget::new().prefix(&negate, "x".to_string()), "-x");
    }

    #[test]
    fn named_prefixes_are_spaced() {
        let not = Operation::new("not", OperationKind::UnaryPrefix, 15);
        assert_eq!(TextTarget::new().prefix(&not, "p".to_string()), "not p");
    }

    #[test]
    fn trailing_separator_is_kept() {
        let semicolon = Operation::delimiter(";", crate::symbols::Delimiter::Storage);
        let mut target = TextTarget::new();
        assert_eq!(target.sequence(&semicolon, "a".to_string(), None), "a;");
        assert_eq!(target.sequence(&semicolon, "a".to_string(), Some("b".to_string())),
                   "a; b");
    }
}
