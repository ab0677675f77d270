mod error;
mod grammar;

pub use error::ParseError;

use crate::Expr;

/// Parse a cleaned filter expression into an [`Expr`].
///
/// The input must already be preprocessed: comments and `Open*Count()`
/// comparisons are not part of this grammar.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a valid expression.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    use winnow::Parser;
    grammar::filter
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))
}
