use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read rule '{rule}'")]
    Read {
        rule: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid expression in rule '{rule}': {message}")]
    Expression { rule: String, message: String },
}

impl CompileError {
    /// Name of the rule that failed to compile.
    #[must_use]
    pub fn rule(&self) -> &str {
        match self {
            CompileError::Read { rule, .. } | CompileError::Expression { rule, .. } => rule,
        }
    }
}
