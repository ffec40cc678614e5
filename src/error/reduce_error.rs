use crate::symbols::Precedence;

/// Result type used throughout the reduction engine.
pub type ReduceResult<T> = Result<T, ReduceError>;

/// Identifies which part of a range header failed to reduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    /// The expression before the first comparison marker.
    Lo,
    /// The expression after the second comparison marker.
    Hi,
    /// The expression after the step marker.
    Increment,
}

impl std::fmt::Display for RangeBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lo => write!(f, "lo"),
            Self::Hi => write!(f, "hi"),
            Self::Increment => write!(f, "increment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can abort a reduction pass.
///
/// Positions are token indices into the sequence being reduced. Errors raised
/// while reducing a range bound are wrapped in [`ReduceError::RangeBound`], so
/// their positions are relative to that bound.
pub enum ReduceError {
    /// The token cursor was advanced past the last token.
    SequenceExhausted {
        /// The cursor position at the time of the call.
        position: usize,
    },
    /// A `[` range was opened but never closed.
    UnterminatedRange {
        /// Position of the opening bracket.
        position: usize,
    },
    /// The range header does not follow `lo <= id <= hi [<> step]`.
    MalformedRange {
        /// What part of the header is wrong.
        details: String,
    },
    /// The slot between the two comparison markers is not an identifier.
    IdentifierExpected {
        /// The token found in the identifier slot.
        found: String,
    },
    /// An operation violates the precedence contract of its kind.
    UnexpectedOperatorKind {
        /// The operation name.
        name:       String,
        /// The offending precedence.
        precedence: Precedence,
    },
    /// A range reduction was combined without an attached range.
    MissingRangeDescriptor {
        /// The range reduction operator.
        operator: String,
        /// Position of the operator.
        position: usize,
    },
    /// A name used as an operator resolves to a plain value.
    UnrepresentableSymbol {
        /// The symbol name.
        name:     String,
        /// Position of the token.
        position: usize,
    },
    /// An operator image that the symbol table does not define.
    UnknownOperator {
        /// The operator image.
        image:    String,
        /// Position of the token.
        position: usize,
    },
    /// A range bound failed to reduce.
    RangeBound {
        /// Which bound failed.
        bound:  RangeBound,
        /// The underlying failure.
        source: Box<ReduceError>,
    },
    /// A second range was opened while another one is still unattached.
    RangeAlreadyPending {
        /// Position of the second opening bracket.
        position: usize,
    },
    /// A range was parsed but no range reduction consumed it.
    DanglingRange,
    /// An operator is missing one of its operands.
    MissingOperand {
        /// The operator image.
        operator: String,
        /// Position of the operator.
        position: usize,
    },
    /// An opening delimiter was never closed.
    UnclosedDelimiter {
        /// The opening delimiter.
        image:    String,
        /// Position of the opening delimiter.
        position: usize,
    },
    /// A closing delimiter appeared outside any group.
    UnmatchedDelimiter {
        /// The delimiter image.
        image:    String,
        /// Position of the delimiter.
        position: usize,
    },
    /// A closing delimiter does not match the innermost open group.
    MismatchedDelimiter {
        /// The open delimiter of the innermost group.
        open:     String,
        /// The closing delimiter found.
        close:    String,
        /// Position of the closing delimiter.
        position: usize,
    },
    /// A calculus modifier does not directly follow an operator.
    MisplacedModifier {
        /// The modifier image.
        image:    String,
        /// Position of the modifier.
        position: usize,
    },
    /// A numeric literal cannot be represented by the output target.
    InvalidLiteral {
        /// The literal text.
        image: String,
    },
    /// The token sequence contained nothing to reduce.
    EmptyExpression,
    /// Frames were left on the stack after reduction finished.
    UnbalancedStack {
        /// The number of orphaned frames.
        depth: usize,
    },
}

impl std::fmt::Display for ReduceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SequenceExhausted { position } => {
                write!(f, "Error at token {position}: Sequence exhausted.")
            },

            Self::UnterminatedRange { position } => write!(f,
                                                           "Error at token {position}: Range opened with '[' is never closed."),

            Self::MalformedRange { details } => write!(f, "Malformed range: {details}."),

            Self::IdentifierExpected { found } => write!(f,
                                                         "Malformed range: identifier expected between the comparisons, found '{found}'."),

            Self::UnexpectedOperatorKind { name, precedence } => write!(f,
                                                                        "Operator '{name}' has unexpected delimiter/precedence {precedence}."),

            Self::MissingRangeDescriptor { operator, position } => write!(f,
                                                                          "Error at token {position}: '{operator}' needs a range such as [0 <= i <= n]."),

            Self::UnrepresentableSymbol { name, position } => write!(f,
                                                                     "Error at token {position}: '{name}' is a value and cannot be used as an operator."),

            Self::UnknownOperator { image, position } => {
                write!(f, "Error at token {position}: Unknown operator '{image}'.")
            },

            Self::RangeBound { bound, source } => write!(f, "Error in {bound} bound: {source}"),

            Self::RangeAlreadyPending { position } => write!(f,
                                                             "Error at token {position}: A range is already waiting for its operator."),

            Self::DanglingRange => write!(f, "A range was given but no operator uses it."),

            Self::MissingOperand { operator, position } => {
                write!(f, "Error at token {position}: '{operator}' is missing an operand.")
            },

            Self::UnclosedDelimiter { image, position } => {
                write!(f, "Error at token {position}: '{image}' is never closed.")
            },

            Self::UnmatchedDelimiter { image, position } => {
                write!(f, "Error at token {position}: '{image}' has no matching opener.")
            },

            Self::MismatchedDelimiter { open,
                                        close,
                                        position, } => write!(f,
                                                              "Error at token {position}: '{close}' cannot close '{open}'."),

            Self::MisplacedModifier { image, position } => write!(f,
                                                                  "Error at token {position}: '{image}' must directly follow a function name."),

            Self::InvalidLiteral { image } => write!(f, "Literal '{image}' cannot be represented."),

            Self::EmptyExpression => write!(f, "Nothing to reduce."),

            Self::UnbalancedStack { depth } => {
                write!(f, "Reduction finished with {depth} orphaned frame(s).")
            },
        }
    }
}

impl std::error::Error for ReduceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RangeBound { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl ReduceError {
    /// Wraps this error with the range bound it occurred in.
    #[must_use]
    pub fn in_bound(self, bound: RangeBound) -> Self {
        Self::RangeBound { bound,
                           source: Box::new(self) }
    }
}
