#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while tokenizing source text.
pub enum LexError {
    /// A character sequence that does not begin any token.
    UnexpectedCharacter {
        /// The offending text.
        text:     String,
        /// Byte offset of the offending text in the source.
        position: usize,
    },
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedCharacter { text, position } => {
                write!(f, "Error at offset {position}: Unexpected character(s) '{text}'.")
            },
        }
    }
}

impl std::error::Error for LexError {}
