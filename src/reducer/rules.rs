use log::trace;

use crate::{
    error::{ReduceError, ReduceResult},
    reducer::core::{Leaf, OperatorFrame, ReductionFrame},
    symbols::{Delimiter, Notation, Operation, OperationKind, Precedence},
    target::{Enhanced, OutputTarget},
};

/// Brackets `operand` when it binds more loosely than `precedence`.
///
/// A bracketed operand becomes atomic, so an enclosing combination never
/// brackets it a second time.
pub fn fence<T: OutputTarget>(target: &mut T,
                              operand: ReductionFrame<T::Node>,
                              precedence: Precedence)
                              -> ReductionFrame<T::Node> {
    if operand.precedence < precedence {
        ReductionFrame::atomic(target.bracket("(", ")", operand.value))
    } else {
        operand
    }
}

/// Folds the operator in `frame` with the leaf popped alongside it (`left`)
/// and the current leaf (`right`).
///
/// # Errors
/// - `MissingOperand` when a required operand is empty.
/// - `MissingRangeDescriptor` for a range reduction without a range.
/// - `UnclosedDelimiter` when the frame is an open group.
/// - `UnexpectedOperatorKind` for kinds that are never stacked.
pub fn apply<T: OutputTarget>(target: &mut T,
                              frame: OperatorFrame<T::Node>,
                              left: Leaf<T::Node>,
                              right: Leaf<T::Node>)
                              -> ReduceResult<ReductionFrame<T::Node>> {
    let OperatorFrame { operation,
                        range,
                        position, } = frame;
    trace!("combining '{}' from token {position}", operation.name);

    match operation.kind {
        OperationKind::BinaryOperator(notation) => {
            let left = required(left, &operation, position)?;
            let right = required(right, &operation, position)?;
            Ok(binary(target, &operation, notation, left, right))
        },
        OperationKind::UnaryPrefix => {
            starts_operand(&left)?;
            let operand = fence(target,
                                required(right, &operation, position)?,
                                operation.precedence);
            Ok(ReductionFrame::atomic(target.prefix(&operation, operand.value)))
        },
        OperationKind::ParameterizedFunction => {
            starts_operand(&left)?;
            let argument = required(right, &operation, position)?;
            Ok(call(target, &operation, argument))
        },
        OperationKind::VectorRangeReduction => {
            starts_operand(&left)?;
            let range =
                range.ok_or_else(|| ReduceError::MissingRangeDescriptor { operator: operation.name
                                                                                      .clone(),
                                                                          position })?;
            let operand = fence(target,
                                required(right, &operation, position)?,
                                operation.precedence);
            Ok(ReductionFrame { value:      target.ranged(&operation, range, operand.value),
                                precedence: operation.precedence, })
        },
        OperationKind::Assignment => {
            let destination = required(left, &operation, position)?;
            let source = required(right, &operation, position)?;
            Ok(ReductionFrame { value:      target.assignment(&operation,
                                                              destination.value,
                                                              source.value),
                                precedence: operation.precedence, })
        },
        OperationKind::Delimiter(Delimiter::Storage) => {
            let first = required(left, &operation, position)?;
            let rest = match right {
                Leaf::Value(frame) => Some(frame.value),
                Leaf::Empty => None,
            };
            Ok(ReductionFrame { value:      target.sequence(&operation, first.value, rest),
                                precedence: operation.precedence, })
        },
        OperationKind::Delimiter(Delimiter::Open) => {
            Err(ReduceError::UnclosedDelimiter { image: operation.name,
                                                 position })
        },
        OperationKind::Delimiter(Delimiter::Close | Delimiter::Continue)
        | OperationKind::UnaryPostfix
        | OperationKind::CalculusModifier => {
            Err(ReduceError::UnexpectedOperatorKind { name:       operation.name,
                                                      precedence: operation.precedence, })
        },
    }
}

/// Applies a postfix operator to `operand`, bracketing it unless it already
/// binds tighter than the operator.
pub fn postfix<T: OutputTarget>(target: &mut T,
                                op: &Operation,
                                operand: ReductionFrame<T::Node>)
                                -> ReductionFrame<T::Node> {
    let operand = if operand.precedence > op.precedence {
        operand
    } else {
        ReductionFrame::atomic(target.bracket("(", ")", operand.value))
    };
    ReductionFrame::atomic(target.postfix(op, operand.value))
}

fn binary<T: OutputTarget>(target: &mut T,
                           op: &Operation,
                           notation: Notation,
                           left: ReductionFrame<T::Node>,
                           right: ReductionFrame<T::Node>)
                           -> ReductionFrame<T::Node> {
    let left = fence(target, left, op.precedence);
    let right = fence(target, right, op.precedence);
    let precedence = op.precedence.min(left.precedence.min(right.precedence));

    let value = match notation {
        Notation::Infix => target.binary(op, left.value, right.value),
        Notation::Superscript => target.superscript(op, left.value, right.value),
        Notation::Subscript => target.subscript(op, left.value, right.value),
        Notation::Fraction => target.fraction(op, left.value, right.value),
    };

    ReductionFrame { value, precedence }
}

fn call<T: OutputTarget>(target: &mut T,
                         op: &Operation,
                         argument: ReductionFrame<T::Node>)
                         -> ReductionFrame<T::Node> {
    let value = match target.enhanced_call(op, argument.value) {
        Enhanced::Handled(node) => node,
        Enhanced::Declined(argument) => {
            let arguments = target.bracket("(", ")", argument);
            target.call(op, arguments)
        },
    };
    ReductionFrame::atomic(value)
}

fn required<N>(leaf: Leaf<N>, op: &Operation, position: usize) -> ReduceResult<ReductionFrame<N>> {
    match leaf {
        Leaf::Value(frame) => Ok(frame),
        Leaf::Empty => Err(ReduceError::MissingOperand { operator: op.name.clone(),
                                                         position }),
    }
}

// Operand-starting operators are pushed with an empty leaf; the machine
// inserts an implicit product before them otherwise.
const fn starts_operand<N>(left: &Leaf<N>) -> ReduceResult<()> {
    match left {
        Leaf::Empty => Ok(()),
        Leaf::Value(_) => Err(ReduceError::UnbalancedStack { depth: 1 }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        symbols::{ATOMIC_PRECEDENCE, CONTINUE_PRECEDENCE},
        target::TextTarget,
    };

    fn leaf(text: &str, precedence: Precedence) -> Leaf<String> {
        Leaf::Value(ReductionFrame { value: text.to_string(),
                                     precedence })
    }

    fn frame(operation: Operation) -> OperatorFrame<String> {
        OperatorFrame { operation,
                        range: None,
                        position: 0 }
    }

    fn times() -> Operation {
        Operation::new("*", OperationKind::BinaryOperator(Notation::Infix), 40)
    }

    #[test]
    fn lower_precedence_operands_are_fenced_independently() {
        let mut target = TextTarget::new();
        let result = apply(&mut target,
                           frame(times()),
                           leaf("a + b", 30),
                           leaf("c", ATOMIC_PRECEDENCE)).unwrap();
        assert_eq!(result.value, "(a + b) * c");
        assert_eq!(result.precedence, 40);

        let result = apply(&mut target,
                           frame(times()),
                           leaf("c", ATOMIC_PRECEDENCE),
                           leaf("a + b", 30)).unwrap();
        assert_eq!(result.value, "c * (a + b)");
    }

    #[test]
    fn fenced_operands_are_not_fenced_again() {
        let mut target = TextTarget::new();
        let once = fence(&mut target,
                         ReductionFrame { value:      "a + b".to_string(),
                                          precedence: 30, },
                         40);
        assert_eq!(once.precedence, ATOMIC_PRECEDENCE);
        let twice = fence(&mut target, once, 60);
        assert_eq!(twice.value, "(a + b)");
    }

    #[test]
    fn functions_always_bracket_their_argument() {
        let mut target = TextTarget::new();
        let result = apply(&mut target,
                           frame(Operation::function("f")),
                           Leaf::Empty,
                           leaf("x, y", CONTINUE_PRECEDENCE)).unwrap();
        assert_eq!(result.value, "f(x, y)");
        assert_eq!(result.precedence, ATOMIC_PRECEDENCE);
    }

    #[test]
    fn postfix_brackets_unless_operand_binds_tighter() {
        let mut target = TextTarget::new();
        let bang = Operation::new("!", OperationKind::UnaryPostfix, 80);
        let atomic = postfix(&mut target,
                             &bang,
                             ReductionFrame::atomic("n".to_string()));
        assert_eq!(atomic.value, "n!");
        let loose = postfix(&mut target,
                            &bang,
                            ReductionFrame { value:      "x^2".to_string(),
                                             precedence: 60, });
        assert_eq!(loose.value, "(x^2)!");
    }

    #[test]
    fn range_reduction_without_range_fails() {
        let mut target = TextTarget::new();
        let sum = Operation::new("sum", OperationKind::VectorRangeReduction, 35);
        assert_eq!(apply(&mut target, frame(sum), Leaf::Empty, leaf("i", ATOMIC_PRECEDENCE)),
                   Err(ReduceError::MissingRangeDescriptor { operator: "sum".to_string(),
                                                             position: 0, }));
    }

    #[test]
    fn assignment_never_fences() {
        let mut target = TextTarget::new();
        let assign = Operation::new(":=", OperationKind::Assignment, 10);
        let result = apply(&mut target, frame(assign), leaf("x", ATOMIC_PRECEDENCE), leaf("a; b", 4)).unwrap();
        assert_eq!(result.value, "x := a; b");
    }

    #[test]
    fn binary_operators_need_both_operands() {
        let mut target = TextTarget::new();
        assert_eq!(apply(&mut target, frame(times()), leaf("a", ATOMIC_PRECEDENCE), Leaf::Empty),
                   Err(ReduceError::MissingOperand { operator: "*".to_string(),
                                                     position: 0, }));
    }
}
