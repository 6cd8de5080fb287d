//! Domain extraction for certificate bookkeeping.

use crate::routing::error::RuleError;
use crate::routing::registry::Function;
use crate::routing::request::canonical_domain;
use crate::routing::rule::tokenize;

/// Canonical domains named by the `Host` clauses of an expression.
///
/// Deduplicated on canonical form, first-seen order. Other clauses are
/// ignored, so only tokenizer errors can fail this.
pub fn extract_domains(expression: &str) -> Result<Vec<String>, RuleError> {
    let mut domains: Vec<String> = Vec::new();
    for clause in tokenize(expression)? {
        if clause.function != Function::Host {
            continue;
        }
        for host in clause.args {
            push_unique(&mut domains, canonical_domain(host));
        }
    }
    Ok(domains)
}

pub(crate) fn push_unique(domains: &mut Vec<String>, domain: String) {
    if !domains.contains(&domain) {
        domains.push(domain);
    }
}
