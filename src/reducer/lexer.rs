use logos::Logos;

use crate::{
    error::LexError,
    reducer::token::{Token, TokenKind},
};

/// The raw lexical classes recognised by the tokenizer.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
enum Lexeme {
    /// `0x1F`, `0b101`, `0o17`
    #[regex(r"0[xX][0-9a-fA-F]+")]
    #[regex(r"0[bB][01]+")]
    #[regex(r"0[oO][0-7]+")]
    Radix,
    /// `2.5e-3`, `6e23`
    #[regex(r"[0-9]+\.[0-9]+[eE][+-]?[0-9]+")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,
    /// `3.14`
    #[regex(r"[0-9]+\.[0-9]+")]
    Decimal,
    /// `.5`
    #[regex(r"\.[0-9]+")]
    Number,
    /// `42`
    #[regex(r"[0-9]+")]
    Integer,
    /// `x`, `sin`, `alpha2`
    #[regex(r"[a-zA-Z][a-zA-Z0-9]*")]
    Identifier,
    /// `"text"`
    #[regex(r#""[^"]*""#)]
    Quoted,
    /// `# comment`
    #[regex(r"#[^\n\r]*", allow_greedy = true)]
    Comment,
    /// Spaces, tabs and line breaks.
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,
    /// Operator and delimiter images.
    #[token(":=")]
    #[token("<=")]
    #[token(">=")]
    #[token("<>")]
    #[token("!=")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("^")]
    #[token("_")]
    #[token("!")]
    #[token("'")]
    #[token("=")]
    #[token("<")]
    #[token(">")]
    #[token("(")]
    #[token(")")]
    #[token("{")]
    #[token("}")]
    #[token("[")]
    #[token("]")]
    #[token(",")]
    #[token(";")]
    Operator,
}

impl From<Lexeme> for TokenKind {
    fn from(lexeme: Lexeme) -> Self {
        match lexeme {
            Lexeme::Radix => Self::RadixLiteral,
            Lexeme::Float => Self::Float,
            Lexeme::Decimal => Self::Decimal,
            Lexeme::Number => Self::Number,
            Lexeme::Integer => Self::Integer,
            Lexeme::Identifier => Self::Identifier,
            Lexeme::Quoted => Self::Quoted,
            Lexeme::Comment => Self::Comment,
            Lexeme::Whitespace => Self::Whitespace,
            Lexeme::Operator => Self::Operator,
        }
    }
}

/// Tokenizes `source`, dropping comments and whitespace.
///
/// # Errors
/// `UnexpectedCharacter` for text that does not start any token.
///
/// # Example
/// ```
/// use opreduce::reducer::{TokenKind, lexer::lex};
///
/// let tokens = lex("f(x) := 0x1F # note").unwrap();
/// let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(kinds,
///            [TokenKind::Identifier,
///             TokenKind::Operator,
///             TokenKind::Identifier,
///             TokenKind::Operator,
///             TokenKind::Operator,
///             TokenKind::RadixLiteral]);
/// ```
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = lex_with_trivia(source)?;
    tokens.retain(|token| !token.kind.is_trivia());
    Ok(tokens)
}

/// Tokenizes `source`, keeping comments and whitespace.
///
/// # Errors
/// `UnexpectedCharacter` for text that does not start any token.
pub fn lex_with_trivia(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = Lexeme::lexer(source);

    while let Some(lexeme) = lexer.next() {
        let Ok(lexeme) = lexeme else {
            return Err(LexError::UnexpectedCharacter { text:     lexer.slice().to_string(),
                                                       position: lexer.span().start, });
        };
        let slice = lexer.slice();
        let image = if lexeme == Lexeme::Quoted {
            &slice[1..slice.len() - 1]
        } else {
            slice
        };
        tokens.push(Token::new(image, lexeme.into()));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(String, TokenKind)> {
        lex(source).unwrap()
                   .into_iter()
                   .map(|token| (token.image, token.kind))
                   .collect()
    }

    #[test]
    fn numbers_of_every_kind() {
        assert_eq!(kinds("42 3.14 .5 6e23 2.5e-3 0b101"),
                   [("42".to_string(), TokenKind::Integer),
                    ("3.14".to_string(), TokenKind::Decimal),
                    (".5".to_string(), TokenKind::Number),
                    ("6e23".to_string(), TokenKind::Float),
                    ("2.5e-3".to_string(), TokenKind::Float),
                    ("0b101".to_string(), TokenKind::RadixLiteral)]);
    }

    #[test]
    fn longest_operator_wins() {
        let images: Vec<String> = lex("a<=b<>c:=d!=e<f").unwrap()
                                                        .into_iter()
                                                        .filter(|t| t.kind == TokenKind::Operator)
                                                        .map(|t| t.image)
                                                        .collect();
        assert_eq!(images, ["<=", "<>", ":=", "!=", "<"]);
    }

    #[test]
    fn underscore_is_an_operator() {
        assert_eq!(kinds("x_1"),
                   [("x".to_string(), TokenKind::Identifier),
                    ("_".to_string(), TokenKind::Operator),
                    ("1".to_string(), TokenKind::Integer)]);
    }

    #[test]
    fn quoted_image_drops_the_quotes() {
        assert_eq!(kinds("\"hello world\""),
                   [("hello world".to_string(), TokenKind::Quoted)]);
    }

    #[test]
    fn trivia_is_kept_on_request() {
        let tokens = lex_with_trivia("a # b\n").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds,
                   [TokenKind::Identifier,
                    TokenKind::Whitespace,
                    TokenKind::Comment,
                    TokenKind::Whitespace]);
    }

    #[test]
    fn unknown_character_is_reported() {
        assert_eq!(lex("a $ b"),
                   Err(LexError::UnexpectedCharacter { text:     "$".to_string(),
                                                       position: 2, }));
    }
}
