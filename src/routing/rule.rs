//! Rule expression tokenizer.
//!
//! # Syntax
//! ```text
//! expression := clause (';' clause)*
//! clause     := FunctionName ':' arg (',' arg)*
//! ```
//!
//! # Design Decisions
//! - Split on the first `:` only; later colons belong to the arguments
//! - Arguments are trimmed, empty ones dropped
//! - Function names are trimmed but never case-folded

use crate::routing::error::RuleError;
use crate::routing::registry::Function;

/// One `Function:args` segment of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause<'a> {
    /// Clause text as written, used for error reporting.
    pub text: &'a str,
    pub function: Function,
    pub args: Vec<&'a str>,
}

/// Split an expression into clauses, resolving each function name.
pub fn tokenize(expression: &str) -> Result<Vec<Clause<'_>>, RuleError> {
    if expression.trim().is_empty() {
        return Err(RuleError::EmptyExpression);
    }

    expression.split(';').map(parse_clause).collect()
}

fn parse_clause(text: &str) -> Result<Clause<'_>, RuleError> {
    let (name, blob) = text
        .split_once(':')
        .ok_or_else(|| RuleError::MalformedClause(text.trim().to_string()))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(RuleError::MalformedClause(text.trim().to_string()));
    }

    let function =
        Function::lookup(name).ok_or_else(|| RuleError::UnknownFunction(name.to_string()))?;

    let args: Vec<&str> = blob
        .split(',')
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .collect();

    if args.is_empty() {
        return Err(RuleError::NoArguments(text.trim().to_string()));
    }

    Ok(Clause {
        text: text.trim(),
        function,
        args,
    })
}
