use log::debug;

use crate::{
    error::{RangeBound, ReduceError, ReduceResult},
    reducer::token::{Token, TokenKind},
};

/// Opens a range header.
pub const RANGE_OPEN: &str = "[";
/// Closes a range header.
pub const RANGE_CLOSE: &str = "]";
/// Separates the upper bound from the increment.
pub const RANGE_STEP: &str = "<>";

/// A parsed `lo <= id <= hi [<> step]` header.
///
/// Built once from a marked token slice and consumed by exactly one range
/// reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeDescriptor<N> {
    /// The reduced lower bound.
    pub lo_bound:   N,
    /// The reduced upper bound.
    pub hi_bound:   N,
    /// The iteration variable.
    pub identifier: String,
    /// The reduced step, if one was given.
    pub increment:  Option<N>,
}

fn is_comparison(token: &Token) -> bool {
    token.is_operator("<") || token.is_operator("<=")
}

fn malformed(details: &str) -> ReduceError {
    ReduceError::MalformedRange { details: details.to_string() }
}

/// Parses the tokens between `[` and `]`.
///
/// Comments and whitespace in the header are ignored. Each bound is handed to
/// `reduce`, which runs a fresh reduction pass over it; failures are labelled
/// with the bound they occurred in.
///
/// # Errors
/// - `MalformedRange` when the comparison markers are missing, not two tokens
///   apart, or a bound is empty.
/// - `IdentifierExpected` when the token between the markers is not an
///   identifier.
/// - `RangeBound` wrapping any failure from `reduce`.
///
/// # Example
/// ```
/// use opreduce::reducer::{lexer::lex, range::parse_range};
///
/// let tokens = lex("0 <= i <= 5 <> 1").unwrap();
/// let range = parse_range(&tokens, |slice| Ok(slice.len())).unwrap();
/// assert_eq!(range.identifier, "i");
/// assert_eq!((range.lo_bound, range.hi_bound, range.increment), (1, 1, Some(1)));
/// ```
pub fn parse_range<N, F>(header: &[Token], mut reduce: F) -> ReduceResult<RangeDescriptor<N>>
    where F: FnMut(&[Token]) -> ReduceResult<N>
{
    let tokens: Vec<Token> = header.iter()
                                   .filter(|token| !token.kind.is_trivia())
                                   .cloned()
                                   .collect();

    let first = tokens.iter()
                      .position(is_comparison)
                      .ok_or_else(|| malformed("expected 'lo <= identifier <= hi'"))?;
    if first == 0 {
        return Err(malformed("missing lower bound"));
    }

    let second = first + 2;
    if !tokens.get(second).is_some_and(is_comparison) {
        return Err(malformed("expected a second comparison two tokens after the first"));
    }

    let identifier = &tokens[first + 1];
    if identifier.kind != TokenKind::Identifier {
        return Err(ReduceError::IdentifierExpected { found: identifier.image.clone() });
    }

    let rest = &tokens[second + 1..];
    let (hi, step) = match rest.iter().position(|token| token.is_operator(RANGE_STEP)) {
        Some(at) => (&rest[..at], Some(&rest[at + 1..])),
        None => (rest, None),
    };
    if hi.is_empty() {
        return Err(malformed("missing upper bound"));
    }
    if step.is_some_and(<[Token]>::is_empty) {
        return Err(malformed("missing increment after '<>'"));
    }

    let lo_bound = reduce(&tokens[..first]).map_err(|e| e.in_bound(RangeBound::Lo))?;
    let hi_bound = reduce(hi).map_err(|e| e.in_bound(RangeBound::Hi))?;
    let increment = step.map(|slice| reduce(slice).map_err(|e| e.in_bound(RangeBound::Increment)))
                        .transpose()?;

    debug!("parsed range over '{}'", identifier.image);

    Ok(RangeDescriptor { lo_bound,
                         hi_bound,
                         identifier: identifier.image.clone(),
                         increment })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::lexer::{lex, lex_with_trivia};

    fn images(slice: &[Token]) -> ReduceResult<String> {
        Ok(slice.iter()
                .map(|token| token.image.as_str())
                .collect::<Vec<_>>()
                .join(" "))
    }

    fn parse(source: &str) -> ReduceResult<RangeDescriptor<String>> {
        parse_range(&lex(source).unwrap(), images)
    }

    #[test]
    fn full_header_with_step() {
        assert_eq!(parse("0 <= i <= 5 <> 1"),
                   Ok(RangeDescriptor { lo_bound:   "0".to_string(),
                                        hi_bound:   "5".to_string(),
                                        identifier: "i".to_string(),
                                        increment:  Some("1".to_string()), }));
    }

    #[test]
    fn step_is_optional() {
        let range = parse("1 < k <= n - 1").unwrap();
        assert_eq!(range.hi_bound, "n - 1");
        assert_eq!(range.increment, None);
    }

    #[test]
    fn bounds_may_be_expressions() {
        let range = parse("a + 1 <= j <= 2 * n <> h / 2").unwrap();
        assert_eq!(range.lo_bound, "a + 1");
        assert_eq!(range.hi_bound, "2 * n");
        assert_eq!(range.increment.as_deref(), Some("h / 2"));
    }

    #[test]
    fn trivia_inside_the_header_is_ignored() {
        let tokens = lex_with_trivia("0 <=  i # index\n <= n <> 2").unwrap();
        assert_eq!(parse_range(&tokens, images), parse("0 <= i <= n <> 2"));
    }

    #[test]
    fn malformed_headers() {
        for source in ["", "0 i 5", "<= i <= 5", "0 <= i 5", "0 <= i <= ", "0 <= i <= 5 <>"] {
            assert!(matches!(parse(source), Err(ReduceError::MalformedRange { .. })),
                    "{source:?} should be malformed");
        }
    }

    #[test]
    fn identifier_slot_must_hold_an_identifier() {
        assert_eq!(parse("0 <= 3 <= 5"),
                   Err(ReduceError::IdentifierExpected { found: "3".to_string() }));
    }

    #[test]
    fn bound_failures_are_labelled() {
        let tokens = lex("0 <= i <= bad").unwrap();
        let result: ReduceResult<RangeDescriptor<()>> = parse_range(&tokens, |slice| {
            if slice[0].image == "bad" {
                Err(ReduceError::EmptyExpression)
            } else {
                Ok(())
            }
        });
        assert_eq!(result,
                   Err(ReduceError::RangeBound { bound:  RangeBound::Hi,
                                                 source: Box::new(ReduceError::EmptyExpression), }));
    }
}
