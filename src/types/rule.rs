use serde::{Deserialize, Serialize};

use super::bounds::Constraints;
use super::color::Color;
use super::item::ItemSnapshot;
use crate::evaluate::ExpressionEvaluator;

/// A rule file as listed in the settings.
///
/// `location` is relative to the rule directory. List order is precedence
/// order: the first enabled rule that matches an item wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub color: Color,
}

impl RuleEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, location: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            enabled,
            color: Color::default(),
        }
    }
}

/// A preprocessed, compiled filter expression.
///
/// `expression` is the cleaned text handed to the evaluator, with every
/// `Open*Count()` constraint replaced by `true`; the constraints are checked
/// separately against the item's open slot counts.
#[derive(Debug, Clone)]
pub struct CompiledFilter<P> {
    pub expression: String,
    pub constraints: Constraints,
    pub(crate) program: P,
}

impl<P> CompiledFilter<P> {
    /// `constraints satisfied && expression matches`.
    #[must_use]
    pub fn matches<E>(&self, item: &ItemSnapshot, evaluator: &E) -> bool
    where
        E: ExpressionEvaluator<Program = P>,
    {
        crate::evaluate::evaluate(self, item, evaluator)
    }
}

/// A rule entry paired with its compiled filter.
#[derive(Debug, Clone)]
pub struct CompiledRule<P> {
    pub entry: RuleEntry,
    pub filter: CompiledFilter<P>,
}

impl<P> CompiledRule<P> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Disabled rules never match.
    #[must_use]
    pub fn matches<E>(&self, item: &ItemSnapshot, evaluator: &E) -> bool
    where
        E: ExpressionEvaluator<Program = P>,
    {
        self.entry.enabled && self.filter.matches(item, evaluator)
    }
}
