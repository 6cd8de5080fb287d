//! Rule compilation errors.

use thiserror::Error;

/// Errors raised while tokenizing or compiling a rule expression.
///
/// Every error is local to one frontend's expression. Nothing here is
/// retryable: the same expression fails the same way until it is fixed.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The expression was empty or whitespace only.
    #[error("empty rule expression")]
    EmptyExpression,

    /// A clause had no `:` separator or no function name.
    #[error("malformed clause '{0}': expected 'Function:arg1,arg2'")]
    MalformedClause(String),

    /// A clause had no non-empty argument after splitting on `,`.
    #[error("no arguments in clause '{0}'")]
    NoArguments(String),

    /// The function name is not part of the registry.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// Headers/HeadersRegexp received an odd number of arguments.
    #[error("{function} expects name,value pairs, got {count} arguments")]
    HeaderArity { function: &'static str, count: usize },

    /// A regular expression or template failed to compile.
    #[error("invalid regular expression '{pattern}': {source}")]
    InvalidRegexp {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A host or path template had a `{` or `}` without its partner.
    #[error("unbalanced braces in template '{0}'")]
    UnbalancedTemplate(String),

    /// Path clauses expanded the expression into too many routes.
    #[error("expression expands to more than {limit} routes")]
    TooManyRoutes { limit: usize },

    /// Two different transform kinds in one expression under the reject policy.
    #[error("conflicting path transforms: {next} would replace {previous}")]
    TransformConflict {
        previous: &'static str,
        next: &'static str,
    },

    /// Wraps a builder failure with the clause that caused it.
    #[error("invalid rule '{clause}': {source}")]
    InvalidRule {
        clause: String,
        #[source]
        source: Box<RuleError>,
    },
}

impl RuleError {
    pub(crate) fn in_clause(self, clause: &str) -> Self {
        RuleError::InvalidRule {
            clause: clause.to_string(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping `InvalidRule` wrappers.
    pub fn root_cause(&self) -> &RuleError {
        match self {
            RuleError::InvalidRule { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
