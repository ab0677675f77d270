use crate::evaluate::ExpressionEvaluator;
use crate::preprocess::extract;
use crate::{CompileError, CompiledFilter, CompiledRule, RuleEntry};

/// Preprocess rule source and compile the cleaned expression.
///
/// # Errors
///
/// Returns [`CompileError::Expression`] when the evaluator rejects the
/// cleaned expression. The rule name in the error is empty; use
/// [`compile_rule`] to attach one.
pub fn compile_filter<E: ExpressionEvaluator>(
    source: &str,
    evaluator: &E,
) -> Result<CompiledFilter<E::Program>, CompileError> {
    compile_named("", source, evaluator)
}

/// Compile one rule file's source for `entry`.
///
/// Contradictory open-affix bounds are kept as written; they make the rule
/// unmatchable, so a warning is logged.
///
/// # Errors
///
/// Returns [`CompileError::Expression`] when the evaluator rejects the
/// cleaned expression.
pub fn compile_rule<E: ExpressionEvaluator>(
    entry: RuleEntry,
    source: &str,
    evaluator: &E,
) -> Result<CompiledRule<E::Program>, CompileError> {
    let filter = compile_named(&entry.name, source, evaluator)?;
    Ok(CompiledRule { entry, filter })
}

fn compile_named<E: ExpressionEvaluator>(
    rule: &str,
    source: &str,
    evaluator: &E,
) -> Result<CompiledFilter<E::Program>, CompileError> {
    let extracted = extract(source);
    if extracted.constraints.is_contradictory() {
        tracing::warn!(
            rule,
            constraints = %extracted.constraints,
            "open affix constraints can never be satisfied"
        );
    }
    let program =
        evaluator
            .compile(&extracted.expression)
            .map_err(|e| CompileError::Expression {
                rule: rule.to_owned(),
                message: e.to_string(),
            })?;
    Ok(CompiledFilter {
        expression: extracted.expression,
        constraints: extracted.constraints,
        program,
    })
}
