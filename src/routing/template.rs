//! Host and path templates.
//!
//! Templates are literal text with `{name}` or `{name:regex}` variables, the
//! convention host routers use for `HostRegexp` and the regex strip
//! functions:
//!
//! ```text
//! {subdomain:[a-z]+}.example.com   ->  ^(?:[a-z]+)\.example\.com$
//! /api/{version}/users             ->  ^/api/[^/]+/users
//! ```
//!
//! A bare `{name}` matches one host label or one path segment. Variable
//! regexes may contain braces of their own (`{id:[0-9]{3}}`).

use regex::Regex;

use crate::routing::error::RuleError;

const HOST_VARIABLE: &str = "[^.]+";
const PATH_VARIABLE: &str = "[^/]+";

/// Compile a raw regular expression, mapping failures to [`RuleError`].
pub(crate) fn compile_regex(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidRegexp {
        pattern: pattern.to_string(),
        source,
    })
}

/// Compile a host template into a case-insensitive, fully anchored regex.
pub(crate) fn host_regex(template: &str) -> Result<Regex, RuleError> {
    let body = translate(template, HOST_VARIABLE)?;
    compile_template(template, &format!("(?i)^{body}$"))
}

/// A compiled path template, usable both as a predicate and for stripping.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    template: String,
    full: Regex,
    prefix: Regex,
}

impl PathTemplate {
    pub fn new(template: &str) -> Result<Self, RuleError> {
        let body = translate(template, PATH_VARIABLE)?;
        Ok(Self {
            template: template.to_string(),
            full: compile_template(template, &format!("^{body}$"))?,
            prefix: compile_template(template, &format!("^{body}"))?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// True if the whole path matches.
    pub fn matches_path(&self, path: &str) -> bool {
        self.full.is_match(path)
    }

    /// True if the start of the path matches.
    pub fn matches_prefix(&self, path: &str) -> bool {
        self.prefix.is_match(path)
    }

    /// Length of the prefix of `path` matched by this template.
    pub fn prefix_len(&self, path: &str) -> Option<usize> {
        self.prefix.find(path).map(|m| m.end())
    }
}

fn compile_template(template: &str, pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidRegexp {
        pattern: template.to_string(),
        source,
    })
}

fn translate(template: &str, variable: &str) -> Result<String, RuleError> {
    let unbalanced = || RuleError::UnbalancedTemplate(template.to_string());

    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        if rest[..open].contains('}') {
            return Err(unbalanced());
        }
        out.push_str(&regex::escape(&rest[..open]));

        let close = open + closing_brace(&rest[open..]).ok_or_else(unbalanced)?;
        match rest[open + 1..close].split_once(':') {
            Some((_, pattern)) => {
                out.push_str("(?:");
                out.push_str(pattern);
                out.push(')');
            }
            None => out.push_str(variable),
        }
        rest = &rest[close + 1..];
    }

    if rest.contains('}') {
        return Err(unbalanced());
    }
    out.push_str(&regex::escape(rest));
    Ok(out)
}

/// Index of the brace closing the one at the start of `s`.
fn closing_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}
