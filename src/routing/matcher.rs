//! Request predicates.
//!
//! # Responsibilities
//! - One matcher per predicate function (Host, HostRegexp, Path, PathPrefix,
//!   Method, Headers, HeadersRegexp)
//! - OR across the values of one clause
//! - AND across clauses via [`AndMatcher`]
//!
//! # Design Decisions
//! - Host matching is case-insensitive, on the canonical domain
//! - Path matching is case-sensitive
//! - Regexes are compiled when the rule is compiled, never per request
//! - A request missing what a matcher needs does not match

use regex::Regex;
use std::sync::Arc;

use crate::routing::error::RuleError;
use crate::routing::request::{canonical_domain, RouteRequest};
use crate::routing::template::{compile_regex, host_regex, PathTemplate};

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &RouteRequest<'_>) -> bool;
}

/// Matches the request host against a list of domains.
#[derive(Debug, Clone)]
pub struct HostMatcher {
    hosts: Vec<String>,
}

impl HostMatcher {
    pub fn new(hosts: &[&str]) -> Self {
        Self {
            hosts: hosts.iter().map(|h| canonical_domain(h)).collect(),
        }
    }
}

impl Matcher for HostMatcher {
    fn matches(&self, req: &RouteRequest<'_>) -> bool {
        let Some(host) = req.host else {
            return false;
        };
        let host = host.trim();
        self.hosts.iter().any(|h| host.eq_ignore_ascii_case(h))
    }
}

/// Matches the request host against host templates.
#[derive(Debug, Clone)]
pub struct HostRegexpMatcher {
    patterns: Vec<Regex>,
}

impl HostRegexpMatcher {
    pub fn new(templates: &[&str]) -> Result<Self, RuleError> {
        let patterns = templates
            .iter()
            .map(|t| host_regex(t))
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }
}

impl Matcher for HostRegexpMatcher {
    fn matches(&self, req: &RouteRequest<'_>) -> bool {
        req.host
            .map(|host| self.patterns.iter().any(|p| p.is_match(host.trim())))
            .unwrap_or(false)
    }
}

/// Matches the exact request path.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    path: String,
}

impl PathMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Matcher for PathMatcher {
    fn matches(&self, req: &RouteRequest<'_>) -> bool {
        req.path == self.path
    }
}

/// Matches the request path prefix, byte-wise.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, req: &RouteRequest<'_>) -> bool {
        req.path.starts_with(&self.prefix)
    }
}

/// Matches the request path against a path template.
#[derive(Debug, Clone)]
pub struct PathTemplateMatcher {
    template: PathTemplate,
    prefix: bool,
}

impl PathTemplateMatcher {
    /// The whole path must match.
    pub fn exact(template: PathTemplate) -> Self {
        Self {
            template,
            prefix: false,
        }
    }

    /// The start of the path must match.
    pub fn prefix(template: PathTemplate) -> Self {
        Self {
            template,
            prefix: true,
        }
    }
}

impl Matcher for PathTemplateMatcher {
    fn matches(&self, req: &RouteRequest<'_>) -> bool {
        if self.prefix {
            self.template.matches_prefix(req.path)
        } else {
            self.template.matches_path(req.path)
        }
    }
}

/// Matches the request method, case as supplied.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    methods: Vec<String>,
}

impl MethodMatcher {
    pub fn new(methods: &[&str]) -> Self {
        Self {
            methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, req: &RouteRequest<'_>) -> bool {
        self.methods.iter().any(|m| m == req.method.as_str())
    }
}

/// Matches `name,value` header pairs by equality.
#[derive(Debug, Clone)]
pub struct HeadersMatcher {
    pairs: Vec<(String, String)>,
}

impl HeadersMatcher {
    pub fn new(args: &[&str]) -> Result<Self, RuleError> {
        let pairs = header_pairs("Headers", args)?
            .map(|(name, value)| (name, value.to_string()))
            .collect();
        Ok(Self { pairs })
    }
}

impl Matcher for HeadersMatcher {
    fn matches(&self, req: &RouteRequest<'_>) -> bool {
        self.pairs.iter().any(|(name, expected)| {
            req.headers
                .get_all(name.as_str())
                .iter()
                .any(|v| v.to_str().map(|v| v == expected).unwrap_or(false))
        })
    }
}

/// Matches `name,pattern` header pairs; patterns are unanchored.
#[derive(Debug, Clone)]
pub struct HeadersRegexpMatcher {
    pairs: Vec<(String, Regex)>,
}

impl HeadersRegexpMatcher {
    pub fn new(args: &[&str]) -> Result<Self, RuleError> {
        let pairs = header_pairs("HeadersRegexp", args)?
            .map(|(name, pattern)| compile_regex(pattern).map(|re| (name, re)))
            .collect::<Result<_, _>>()?;
        Ok(Self { pairs })
    }
}

impl Matcher for HeadersRegexpMatcher {
    fn matches(&self, req: &RouteRequest<'_>) -> bool {
        self.pairs.iter().any(|(name, pattern)| {
            req.headers
                .get_all(name.as_str())
                .iter()
                .any(|v| v.to_str().map(|v| pattern.is_match(v)).unwrap_or(false))
        })
    }
}

fn header_pairs<'a>(
    function: &'static str,
    args: &'a [&'a str],
) -> Result<impl Iterator<Item = (String, &'a str)>, RuleError> {
    if args.len() % 2 != 0 {
        return Err(RuleError::HeaderArity {
            function,
            count: args.len(),
        });
    }
    Ok(args
        .chunks_exact(2)
        .map(|pair| (pair[0].to_ascii_lowercase(), pair[1])))
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug, Clone, Default)]
pub struct AndMatcher {
    matchers: Vec<Arc<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Arc<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, req: &RouteRequest<'_>) -> bool {
        // All matchers must pass (AND)
        self.matchers.iter().all(|m| m.matches(req))
    }
}
