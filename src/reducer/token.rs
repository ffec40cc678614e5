use crate::error::{ReduceError, ReduceResult};

/// The lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A name such as `x` or `sin`.
    Identifier,
    /// Punctuation or an operator symbol such as `+` or `(`.
    Operator,
    /// Quoted text. The image excludes the quotes.
    Quoted,
    /// A number written with a leading dot, such as `.5`.
    Number,
    /// A number with a base prefix, such as `0x1F`.
    RadixLiteral,
    /// A whole number such as `42`.
    Integer,
    /// A number with a fractional part such as `3.14`.
    Decimal,
    /// A number with an exponent such as `6.02e23`.
    Float,
    /// A `#` comment.
    Comment,
    /// Spaces, tabs and line breaks.
    Whitespace,
}

impl TokenKind {
    /// Comments and whitespace.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Comment | Self::Whitespace)
    }

    /// Every numeric literal kind.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self,
                 Self::Number | Self::RadixLiteral | Self::Integer | Self::Decimal | Self::Float)
    }
}

/// A lexed token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// The text of the token.
    pub image: String,
    /// Its category.
    pub kind:  TokenKind,
}

impl Token {
    /// Creates a token.
    pub fn new(image: impl Into<String>, kind: TokenKind) -> Self {
        Self { image: image.into(),
               kind }
    }

    /// Whether this is the operator token `image`.
    #[must_use]
    pub fn is_operator(&self, image: &str) -> bool {
        self.kind == TokenKind::Operator && self.image == image
    }
}

/// A single-pass cursor over a borrowed token slice.
///
/// `mark` records the cursor and `slice_from_mark` returns the tokens from the
/// mark up to, but excluding, the token most recently returned by `next`.
///
/// # Example
/// ```
/// use opreduce::reducer::{Token, TokenKind, TokenSequence};
///
/// let tokens = [Token::new("[", TokenKind::Operator),
///               Token::new("i", TokenKind::Identifier),
///               Token::new("]", TokenKind::Operator)];
/// let mut sequence = TokenSequence::new(&tokens);
/// sequence.next().unwrap();
/// sequence.mark();
/// while !sequence.next().unwrap().is_operator("]") {}
/// assert_eq!(sequence.slice_from_mark(), &tokens[1..2]);
/// ```
#[derive(Debug, Clone)]
pub struct TokenSequence<'t> {
    tokens: &'t [Token],
    cursor: usize,
    mark:   usize,
}

impl<'t> TokenSequence<'t> {
    /// Creates a cursor positioned before the first token.
    #[must_use]
    pub const fn new(tokens: &'t [Token]) -> Self {
        Self { tokens,
               cursor: 0,
               mark: 0 }
    }

    /// Returns the current token and advances past it.
    ///
    /// # Errors
    /// `SequenceExhausted` when no token remains.
    pub fn next(&mut self) -> ReduceResult<&'t Token> {
        let token = self.tokens
                        .get(self.cursor)
                        .ok_or(ReduceError::SequenceExhausted { position: self.cursor })?;
        self.cursor += 1;
        Ok(token)
    }

    /// The next significant token, without consuming anything.
    #[must_use]
    pub fn peek_next(&self) -> Option<&'t Token> {
        self.tokens[self.cursor.min(self.tokens.len())..].iter()
                                                          .find(|token| !token.kind.is_trivia())
    }

    /// Whether every token has been consumed.
    #[must_use]
    pub const fn at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Index of the token the next call to `next` returns.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor
    }

    /// Records the current cursor.
    pub const fn mark(&mut self) {
        self.mark = self.cursor;
    }

    /// Tokens from the mark to just before the most recently returned token.
    #[must_use]
    pub fn slice_from_mark(&self) -> &'t [Token] {
        let end = self.cursor.saturating_sub(1).max(self.mark);
        &self.tokens[self.mark..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<Token> {
        vec![Token::new("a", TokenKind::Identifier),
             Token::new(" ", TokenKind::Whitespace),
             Token::new("+", TokenKind::Operator),
             Token::new("1", TokenKind::Integer)]
    }

    #[test]
    fn next_walks_every_token_then_fails() {
        let tokens = tokens();
        let mut sequence = TokenSequence::new(&tokens);
        let mut images = Vec::new();
        while !sequence.at_end() {
            images.push(sequence.next().unwrap().image.as_str());
        }
        assert_eq!(images, ["a", " ", "+", "1"]);
        assert_eq!(sequence.next(),
                   Err(ReduceError::SequenceExhausted { position: 4 }));
    }

    #[test]
    fn peek_skips_trivia_without_consuming() {
        let tokens = tokens();
        let mut sequence = TokenSequence::new(&tokens);
        sequence.next().unwrap();
        assert_eq!(sequence.peek_next().map(|t| t.image.as_str()), Some("+"));
        assert_eq!(sequence.position(), 1);
        while !sequence.at_end() {
            sequence.next().unwrap();
        }
        assert_eq!(sequence.peek_next(), None);
    }

    #[test]
    fn slice_from_mark_excludes_the_last_token() {
        let tokens = tokens();
        let mut sequence = TokenSequence::new(&tokens);
        sequence.mark();
        sequence.next().unwrap();
        assert!(sequence.slice_from_mark().is_empty());
        sequence.next().unwrap();
        sequence.next().unwrap();
        assert_eq!(sequence.slice_from_mark(), &tokens[..2]);
    }

    #[test]
    fn numeric_kinds() {
        assert!(TokenKind::RadixLiteral.is_numeric());
        assert!(TokenKind::Float.is_numeric());
        assert!(!TokenKind::Quoted.is_numeric());
        assert!(TokenKind::Comment.is_trivia());
    }
}
