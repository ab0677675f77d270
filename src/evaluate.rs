use crate::parse::ParseError;
use crate::slots::{open_prefix_count, open_suffix_count};
use crate::{CompiledFilter, Constraints, Expr, ItemSnapshot, Properties};

/// The boolean expression engine rules are compiled against.
///
/// Expressions are compiled once per reload and matched many times per
/// frame. The expressions handed to [`compile`](Self::compile) are already
/// preprocessed: comments are gone and `Open*Count()` comparisons are `true`.
pub trait ExpressionEvaluator {
    type Program;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Compile a cleaned expression.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when the expression is malformed.
    fn compile(&self, expression: &str) -> Result<Self::Program, Self::Error>;

    /// Match a compiled expression against an item.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when the item cannot be evaluated; callers
    /// treat that as no match.
    fn matches(&self, program: &Self::Program, item: &ItemSnapshot) -> Result<bool, Self::Error>;
}

/// Evaluator for the expression subset parsed by [`crate::parse::parse`],
/// reading values from [`ItemSnapshot::properties`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEvaluator;

impl ExpressionEvaluator for BuiltinEvaluator {
    type Program = Expr;
    type Error = ParseError;

    fn compile(&self, expression: &str) -> Result<Expr, ParseError> {
        crate::parse::parse(expression)
    }

    fn matches(&self, program: &Expr, item: &ItemSnapshot) -> Result<bool, ParseError> {
        Ok(eval_expr(program, &item.properties))
    }
}

pub(crate) fn eval_expr(expr: &Expr, props: &Properties) -> bool {
    match expr {
        Expr::Literal(b) => *b,
        Expr::Flag(path) => props.get(path).is_some_and(crate::Value::is_true),
        Expr::Compare { path, op, value } => props
            .get(path)
            .and_then(|prop| prop.compare(*op, value))
            .unwrap_or(false),
        Expr::Method { path, method, arg } => {
            props.get(path).is_some_and(|prop| prop.call(*method, arg))
        }
        Expr::And(a, b) => eval_expr(a, props) && eval_expr(b, props),
        Expr::Or(a, b) => eval_expr(a, props) || eval_expr(b, props),
        Expr::Not(inner) => !eval_expr(inner, props),
    }
}

/// Check open-affix constraints against the item's open slot counts.
/// Slots are only counted for bounded sides.
#[must_use]
pub fn constraints_satisfied(item: &ItemSnapshot, constraints: &Constraints) -> bool {
    (constraints.prefix.is_unbounded() || constraints.prefix.contains(open_prefix_count(item)))
        && (constraints.suffix.is_unbounded()
            || constraints.suffix.contains(open_suffix_count(item)))
}

pub(crate) fn evaluate<E: ExpressionEvaluator>(
    filter: &CompiledFilter<E::Program>,
    item: &ItemSnapshot,
    evaluator: &E,
) -> bool {
    if !constraints_satisfied(item, &filter.constraints) {
        return false;
    }
    match evaluator.matches(&filter.program, item) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::debug!(
                expression = %filter.expression,
                error = %e,
                "filter evaluation failed; treating as no match"
            );
            false
        }
    }
}
