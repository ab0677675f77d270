use std::fmt;

use super::color::Color;
use super::item::ItemSnapshot;
use super::rule::CompiledRule;
use crate::evaluate::ExpressionEvaluator;

/// Ordered list of compiled rules. Earlier rules take precedence.
///
/// Built in full on every reload and swapped in as a whole; never mutated
/// in place.
#[derive(Debug, Clone)]
pub struct RuleSet<P> {
    rules: Vec<CompiledRule<P>>,
}

impl<P> Default for RuleSet<P> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<P> RuleSet<P> {
    #[must_use]
    pub fn new(rules: Vec<CompiledRule<P>>) -> Self {
        Self { rules }
    }

    /// The first enabled rule matching `item`.
    #[must_use]
    pub fn first_match<E>(&self, item: &ItemSnapshot, evaluator: &E) -> Option<&CompiledRule<P>>
    where
        E: ExpressionEvaluator<Program = P>,
    {
        self.rules.iter().find(|rule| rule.matches(item, evaluator))
    }

    /// Frame color of the first enabled matching rule.
    #[must_use]
    pub fn color_for<E>(&self, item: &ItemSnapshot, evaluator: &E) -> Option<Color>
    where
        E: ExpressionEvaluator<Program = P>,
    {
        self.first_match(item, evaluator).map(|rule| rule.entry.color)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule<P>> {
        self.rules.iter()
    }

    /// Rule names in precedence order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(CompiledRule::name).collect()
    }
}

impl<P> fmt::Display for RuleSet<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let enabled = self.rules.iter().filter(|r| r.entry.enabled).count();
        write!(f, "RuleSet({} rules, {} enabled)", self.rules.len(), enabled)
    }
}
