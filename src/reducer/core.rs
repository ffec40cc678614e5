use std::mem;

use log::{debug, trace};

use crate::{
    error::{ReduceError, ReduceResult},
    reducer::{
        classifier::{self, Previous},
        range::{self, RANGE_CLOSE, RANGE_OPEN, RangeDescriptor},
        resolver::SymbolResolver,
        rules,
        token::{Token, TokenKind, TokenSequence},
    },
    symbols::{
        ATOMIC_PRECEDENCE, CONTINUE_PRECEDENCE, Delimiter, IMPLICIT_PRODUCT, OPEN_PAREN,
        Operation, OperationKind, Precedence, ROOT_PRECEDENCE, STATEMENT_FLOOR,
        STORAGE_PRECEDENCE, SymbolTable,
    },
    target::OutputTarget,
};

/// Delimiter pairs that must close with their own partner. Open delimiters
/// registered under other images close with any close delimiter.
const PAIRS: [(&str, &str); 2] = [("(", ")"), ("{", "}")];

/// A reduced value and the precedence it was produced at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReductionFrame<N> {
    pub value:      N,
    pub precedence: Precedence,
}

impl<N> ReductionFrame<N> {
    /// A frame that never needs bracketing.
    pub const fn atomic(value: N) -> Self {
        Self { value,
               precedence: ATOMIC_PRECEDENCE }
    }
}

/// The leaf register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf<N> {
    Empty,
    Value(ReductionFrame<N>),
}

impl<N> Leaf<N> {
    /// Moves the value out, leaving the register empty.
    pub const fn take(&mut self) -> Self {
        mem::replace(self, Self::Empty)
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A pushed operator together with the range attached to it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorFrame<N> {
    pub operation: Operation,
    pub range:     Option<RangeDescriptor<N>>,
    /// Index of the token the operator came from.
    pub position:  usize,
}

/// The pending-operator register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending<N> {
    /// Nothing pending. Binds looser than any operator.
    Root,
    Operator(OperatorFrame<N>),
}

impl<N> Pending<N> {
    /// Precedence an incoming operator is compared against.
    pub const fn precedence(&self) -> Precedence {
        match self {
            Self::Root => ROOT_PRECEDENCE,
            Self::Operator(frame) => frame.operation.precedence,
        }
    }

    const fn operation(&self) -> Option<&Operation> {
        match self {
            Self::Root => None,
            Self::Operator(frame) => Some(&frame.operation),
        }
    }
}

/// The operator-precedence stack machine.
///
/// A reducer borrows a symbol table and an output target for its lifetime. It
/// keeps two registers (the current leaf and the pending operator), a stack of
/// `(leaf, pending)` pairs saved whenever an operator is pushed, and one
/// parameter accumulator per open group plus one for the top level.
///
/// # Example
/// ```
/// use opreduce::{
///     reducer::{Reducer, lexer::lex},
///     symbols::SymbolMap,
///     target::TextTarget,
/// };
///
/// let mut symbols = SymbolMap::standard();
/// let mut target = TextTarget::new();
/// let tokens = lex("(a + b) * c").unwrap();
/// let text = Reducer::new(&mut symbols, &mut target).reduce(&tokens).unwrap();
/// assert_eq!(text, "(a + b) * c");
/// ```
pub struct Reducer<'a, S: SymbolTable, T: OutputTarget> {
    resolver:   SymbolResolver<'a, S>,
    target:     &'a mut T,
    leaf:       Leaf<T::Node>,
    pending:    Pending<T::Node>,
    frames:     Vec<(Leaf<T::Node>, Pending<T::Node>)>,
    parameters: Vec<Vec<T::Node>>,
    range:      Option<RangeDescriptor<T::Node>>,
    previous:   Previous,
}

impl<'a, S: SymbolTable, T: OutputTarget> Reducer<'a, S, T> {
    /// Creates a reducer in its initial state.
    pub fn new(symbols: &'a mut S, target: &'a mut T) -> Self {
        Self { resolver: SymbolResolver::new(symbols),
               target,
               leaf: Leaf::Empty,
               pending: Pending::Root,
               frames: Vec::new(),
               parameters: vec![Vec::new()],
               range: None,
               previous: Previous::Start }
    }

    /// Clears every register, the frame stack and the accumulators.
    pub fn reset(&mut self) {
        self.leaf = Leaf::Empty;
        self.pending = Pending::Root;
        self.frames.clear();
        self.parameters.clear();
        self.parameters.push(Vec::new());
        self.range = None;
        self.previous = Previous::Start;
    }

    /// Number of saved frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Reduces `tokens` and wraps the result with the target's root.
    ///
    /// # Errors
    /// Any [`ReduceError`] raised while reducing. The reducer is reset on the
    /// next call, so it stays usable after a failure.
    pub fn reduce(&mut self, tokens: &[Token]) -> ReduceResult<T::Node> {
        debug!("reducing {} token(s)", tokens.len());
        let frame = self.reduce_expression(tokens)?;
        debug!("reduced to precedence {}", frame.precedence);
        Ok(self.target.root(frame.value))
    }

    /// Reduces `tokens` to a single frame without wrapping it.
    ///
    /// # Errors
    /// See [`Reducer::reduce`].
    pub fn reduce_expression(&mut self, tokens: &[Token]) -> ReduceResult<ReductionFrame<T::Node>> {
        self.reset();
        let mut sequence = TokenSequence::new(tokens);

        while !sequence.at_end() {
            let position = sequence.position();
            let token = sequence.next()?;
            if token.is_operator(RANGE_OPEN) {
                self.scan_range(&mut sequence, position)?;
                continue;
            }

            let classified =
                classifier::effective_kind(token, sequence.peek_next(), self.previous, &self.resolver);
            match classified.kind {
                // Invoked identifiers may be forward references.
                TokenKind::Operator if token.kind == TokenKind::Identifier => {
                    let operation = self.resolver.operation(classified.name, position)?;
                    self.dispatch(operation, position)?;
                },
                TokenKind::Operator => {
                    let operation = self.resolver.registered(classified.name, position)?;
                    self.dispatch(operation, position)?;
                },
                TokenKind::Identifier => {
                    let value = self.target.identifier(&token.image);
                    self.push_leaf(value, position)?;
                },
                TokenKind::Quoted => {
                    let value = self.target.quoted(&token.image);
                    self.push_leaf(value, position)?;
                },
                kind if kind.is_numeric() => {
                    let value = self.target.number(token)?;
                    self.push_leaf(value, position)?;
                },
                _ => {},
            }
        }

        self.drain()?;
        self.finish(tokens.len())
    }

    fn push_leaf(&mut self, value: T::Node, position: usize) -> ReduceResult<()> {
        if !self.leaf.is_empty() {
            self.implicit_product(position)?;
        }
        trace!("leaf at token {position}");
        self.leaf = Leaf::Value(ReductionFrame::atomic(value));
        self.previous = Previous::Operand;
        Ok(())
    }

    fn implicit_product(&mut self, position: usize) -> ReduceResult<()> {
        let product = self.resolver.registered(IMPLICIT_PRODUCT, position)?;
        self.combine(product, position)
    }

    fn dispatch(&mut self, operation: Operation, position: usize) -> ReduceResult<()> {
        validate(&operation)?;
        trace!("dispatching '{}' ({:?})", operation.name, operation.kind);

        if operation.kind.starts_operand() && !self.leaf.is_empty() {
            self.implicit_product(position)?;
        }

        match operation.kind {
            OperationKind::Delimiter(Delimiter::Open) => {
                self.open_group(operation, position);
                Ok(())
            },
            OperationKind::Delimiter(Delimiter::Continue) => self.next_parameter(operation, position),
            OperationKind::Delimiter(Delimiter::Close) => self.close_group(operation, position),
            OperationKind::Delimiter(Delimiter::Storage) => self.store(operation, position),
            OperationKind::CalculusModifier => self.modify_pending(&operation, position),
            OperationKind::UnaryPostfix => self.apply_postfix(&operation, position),
            OperationKind::UnaryPrefix
            | OperationKind::ParameterizedFunction
            | OperationKind::VectorRangeReduction => {
                self.begin_operand(operation, position);
                Ok(())
            },
            OperationKind::BinaryOperator(_) | OperationKind::Assignment => {
                self.combine(operation, position)
            },
        }
    }

    /// Pushes a binary operator or assignment after reducing everything that
    /// binds at least as tightly. Pending operators at or below the statement
    /// floor are left for delimiters and the end of input.
    fn combine(&mut self, operation: Operation, position: usize) -> ReduceResult<()> {
        if self.leaf.is_empty() {
            return Err(ReduceError::MissingOperand { operator: operation.name,
                                                     position });
        }
        while operation.precedence <= self.pending.precedence()
              && self.pending.precedence() > STATEMENT_FLOOR
        {
            self.reduce_top()?;
        }
        self.push_pending(operation, position);
        self.previous = Previous::Operator;
        Ok(())
    }

    fn begin_operand(&mut self, operation: Operation, position: usize) {
        self.push_pending(operation, position);
        self.previous = Previous::Operator;
    }

    fn open_group(&mut self, operation: Operation, position: usize) {
        self.parameters.push(Vec::new());
        self.push_pending(operation, position);
        self.previous = Previous::Operator;
    }

    fn next_parameter(&mut self, operation: Operation, position: usize) -> ReduceResult<()> {
        self.reduce_group()?;
        let Leaf::Value(frame) = self.leaf.take() else {
            return Err(ReduceError::MissingOperand { operator: operation.name,
                                                     position });
        };
        self.parameters
            .last_mut()
            .ok_or(ReduceError::UnbalancedStack { depth: self.frames.len() })?
            .push(frame.value);
        self.previous = Previous::Operator;
        Ok(())
    }

    /// Closes the innermost group. A parenthesised group that belongs to a
    /// pending function becomes its argument list and the call is reduced at
    /// once. Any other group is an ordinary bracketed operand.
    fn close_group(&mut self, operation: Operation, position: usize) -> ReduceResult<()> {
        self.reduce_group()?;

        let open = match self.pending.operation() {
            Some(pending) if pending.opens_group() => pending.name.clone(),
            _ => {
                return Err(ReduceError::UnmatchedDelimiter { image: operation.name,
                                                             position });
            },
        };
        let paired = PAIRS.iter()
                          .find(|(left, _)| *left == open)
                          .is_none_or(|(_, right)| *right == operation.name);
        if !paired {
            return Err(ReduceError::MismatchedDelimiter { open,
                                                          close: operation.name,
                                                          position });
        }

        let mut items = self.parameters
                            .pop()
                            .ok_or(ReduceError::UnbalancedStack { depth: self.frames.len() })?;
        match self.leaf.take() {
            Leaf::Value(frame) => items.push(frame.value),
            Leaf::Empty if !items.is_empty() => {
                return Err(ReduceError::MissingOperand { operator: operation.name,
                                                         position });
            },
            Leaf::Empty => {},
        }

        let (_, below) = self.frames
                             .pop()
                             .ok_or(ReduceError::UnbalancedStack { depth: 0 })?;
        self.pending = below;
        trace!("closed '{open}{}' with {} item(s)", operation.name, items.len());

        let calls = open == OPEN_PAREN
                    && self.pending
                           .operation()
                           .is_some_and(|pending| pending.kind == OperationKind::ParameterizedFunction);
        let joined = self.target.group(items);
        if calls {
            self.leaf = Leaf::Value(ReductionFrame { value:      joined,
                                                     precedence: CONTINUE_PRECEDENCE, });
            self.reduce_top()?;
        } else {
            let bracketed = self.target.bracket(&open, &operation.name, joined);
            self.leaf = Leaf::Value(ReductionFrame::atomic(bracketed));
        }
        self.previous = Previous::Closing;
        Ok(())
    }

    fn store(&mut self, operation: Operation, position: usize) -> ReduceResult<()> {
        self.reduce_group()?;
        if self.leaf.is_empty() {
            return Err(ReduceError::MissingOperand { operator: operation.name,
                                                     position });
        }
        self.push_pending(operation, position);
        self.previous = Previous::Operator;
        Ok(())
    }

    /// Renames the pending function or range reduction, e.g. `f` followed by
    /// `'` becomes `f'`.
    fn modify_pending(&mut self, modifier: &Operation, position: usize) -> ReduceResult<()> {
        let misplaced = || ReduceError::MisplacedModifier { image: modifier.name.clone(),
                                                            position };
        if !self.leaf.is_empty() {
            return Err(misplaced());
        }
        let Pending::Operator(frame) = &mut self.pending else {
            return Err(misplaced());
        };
        if !matches!(frame.operation.kind,
                     OperationKind::ParameterizedFunction | OperationKind::VectorRangeReduction)
        {
            return Err(misplaced());
        }

        let name = format!("{}{}", frame.operation.name, modifier.name);
        let derived = self.resolver.derive(&frame.operation, &name, position)?;
        validate(&derived)?;
        debug!("'{}' modified to '{name}'", frame.operation.name);
        frame.operation = derived;
        self.previous = Previous::Operator;
        Ok(())
    }

    fn apply_postfix(&mut self, operation: &Operation, position: usize) -> ReduceResult<()> {
        let missing = || ReduceError::MissingOperand { operator: operation.name.clone(),
                                                       position };
        if self.leaf.is_empty() {
            return Err(missing());
        }
        while operation.precedence <= self.pending.precedence()
              && self.pending.precedence() > STATEMENT_FLOOR
        {
            self.reduce_top()?;
        }
        let Leaf::Value(operand) = self.leaf.take() else {
            return Err(missing());
        };
        self.leaf = Leaf::Value(rules::postfix(&mut *self.target, operation, operand));
        self.previous = Previous::Closing;
        Ok(())
    }

    /// Reads a range header up to the matching `]` and attaches it to the
    /// range reduction it belongs to.
    ///
    /// Headers do not nest: the first `]` ends the header.
    fn scan_range(&mut self, sequence: &mut TokenSequence<'_>, position: usize) -> ReduceResult<()> {
        if self.range.is_some() {
            return Err(ReduceError::RangeAlreadyPending { position });
        }

        sequence.mark();
        loop {
            if sequence.at_end() {
                return Err(ReduceError::UnterminatedRange { position });
            }
            if sequence.next()?.is_operator(RANGE_CLOSE) {
                break;
            }
        }

        let header = sequence.slice_from_mark();
        let range = range::parse_range(header, |bound| self.reduce_nested(bound))?;

        match &mut self.pending {
            Pending::Operator(frame)
                if frame.operation.kind == OperationKind::VectorRangeReduction
                   && frame.range.is_none()
                   && self.leaf.is_empty() =>
            {
                trace!("range attached to '{}'", frame.operation.name);
                frame.range = Some(range);
            },
            _ => self.range = Some(range),
        }
        Ok(())
    }

    /// Reduces a range bound with a fresh machine sharing this one's symbol
    /// table and target.
    fn reduce_nested(&mut self, tokens: &[Token]) -> ReduceResult<T::Node> {
        let mut nested = Reducer::new(self.resolver.symbols_mut(), &mut *self.target);
        Ok(nested.reduce_expression(tokens)?.value)
    }

    fn push_pending(&mut self, operation: Operation, position: usize) {
        let range = if operation.kind == OperationKind::VectorRangeReduction {
            self.range.take()
        } else {
            None
        };
        let leaf = self.leaf.take();
        let below = mem::replace(&mut self.pending,
                                 Pending::Operator(OperatorFrame { operation,
                                                                   range,
                                                                   position }));
        self.frames.push((leaf, below));
        trace!("push: depth {}", self.frames.len());
    }

    fn reduce_top(&mut self) -> ReduceResult<()> {
        let (left, below) = self.frames
                                .pop()
                                .ok_or(ReduceError::UnbalancedStack { depth: 0 })?;
        let Pending::Operator(frame) = mem::replace(&mut self.pending, below) else {
            return Err(ReduceError::UnbalancedStack { depth: self.frames.len() + 1 });
        };
        let right = self.leaf.take();
        let reduced = rules::apply(&mut *self.target, frame, left, right)?;
        trace!("reduce: depth {}, precedence {}", self.frames.len(), reduced.precedence);
        self.leaf = Leaf::Value(reduced);
        Ok(())
    }

    /// Reduces everything down to the innermost open group, statements
    /// included.
    fn reduce_group(&mut self) -> ReduceResult<()> {
        while let Some(pending) = self.pending.operation() {
            if pending.opens_group() {
                break;
            }
            self.reduce_top()?;
        }
        Ok(())
    }

    fn drain(&mut self) -> ReduceResult<()> {
        while let Pending::Operator(frame) = &self.pending {
            if frame.operation.opens_group() {
                return Err(ReduceError::UnclosedDelimiter { image:    frame.operation.name.clone(),
                                                            position: frame.position, });
            }
            self.reduce_top()?;
        }
        Ok(())
    }

    fn finish(&mut self, end: usize) -> ReduceResult<ReductionFrame<T::Node>> {
        if self.range.take().is_some() {
            return Err(ReduceError::DanglingRange);
        }
        let mut items = self.parameters.pop().unwrap_or_default();
        if !self.frames.is_empty() || !self.parameters.is_empty() {
            return Err(ReduceError::UnbalancedStack { depth: self.frames.len()
                                                             + self.parameters.len() });
        }

        match self.leaf.take() {
            Leaf::Value(frame) if items.is_empty() => Ok(frame),
            Leaf::Value(frame) => {
                items.push(frame.value);
                Ok(ReductionFrame { value:      self.target.group(items),
                                    precedence: CONTINUE_PRECEDENCE, })
            },
            Leaf::Empty if items.is_empty() => Err(ReduceError::EmptyExpression),
            Leaf::Empty => Err(ReduceError::MissingOperand { operator: ",".to_string(),
                                                             position: end, }),
        }
    }
}

/// Checks an operation against the reserved precedence contract: delimiters
/// carry exactly their role's precedence, everything else sits strictly
/// between the storage delimiter and atomic.
fn validate(operation: &Operation) -> ReduceResult<()> {
    let valid = match operation.kind {
        OperationKind::Delimiter(role) => operation.precedence == role.precedence(),
        _ => operation.precedence > STORAGE_PRECEDENCE && operation.precedence < ATOMIC_PRECEDENCE,
    };
    if valid {
        Ok(())
    } else {
        Err(ReduceError::UnexpectedOperatorKind { name:       operation.name.clone(),
                                                  precedence: operation.precedence, })
    }
}
