//! Rule source preprocessing.
//!
//! Rule files are written in the evaluator's expression language plus two
//! pseudo-functions the evaluator does not understand:
//!
//! ```text
//! OpenPrefixCount() <op> <int>
//! OpenSuffixCount() <op> <int>
//! ```
//!
//! [`extract`] strips comments, folds the file into one expression, replaces
//! each pseudo-function comparison with `true` and returns the merged
//! [`Constraints`] so they can be checked against the item separately.

mod comments;
mod normalize;
mod scan;

pub use comments::strip_comments;
pub use normalize::normalize;

use crate::Constraints;

/// Output of [`extract`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Normalized expression with every pseudo-function comparison replaced by `true`.
    pub expression: String,
    pub constraints: Constraints,
}

impl Extracted {
    /// Whether any `Open*Count()` comparison was found.
    #[must_use]
    pub fn has_constraints(&self) -> bool {
        !self.constraints.is_empty()
    }
}

/// Preprocess rule source into a cleaned expression and its open-affix
/// constraints. Pure; never fails.
///
/// # Example
///
/// ```
/// use invfilter::preprocess::extract;
///
/// let out = extract("Rarity == Rare && OpenSuffixCount() >= 2\nOpenPrefixCount() == 1");
/// assert_eq!(out.expression, "Rarity == Rare && true || true");
/// assert_eq!(out.constraints.suffix.min, Some(2));
/// assert_eq!(out.constraints.prefix.max, Some(1));
/// ```
#[must_use]
pub fn extract(source: &str) -> Extracted {
    let normalized = normalize(&strip_comments(source));
    let mut constraints = Constraints::default();
    let expression = scan::replace_calls(&normalized, |call| {
        constraints = constraints.merge(call.kind, call.op, call.value);
    });
    Extracted {
        expression,
        constraints,
    }
}
