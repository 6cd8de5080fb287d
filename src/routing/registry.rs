//! Rule function registry.
//!
//! A closed set of functions, each with a static handler that folds one
//! clause into the candidate set. Names are matched exactly.

use std::fmt;

use crate::routing::compiler::CandidateSet;
use crate::routing::error::RuleError;
use crate::routing::matcher::{
    HeadersMatcher, HeadersRegexpMatcher, HostMatcher, HostRegexpMatcher, MethodMatcher,
    PathMatcher, PathPrefixMatcher, PathTemplateMatcher,
};
use crate::routing::template::PathTemplate;
use crate::routing::transform::{longest_first, PathTransform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Host,
    HostRegexp,
    Path,
    PathPrefix,
    Method,
    Headers,
    HeadersRegexp,
    PathStrip,
    PathStripRegex,
    PathPrefixStrip,
    PathPrefixStripRegex,
    AddPrefix,
    ReplacePath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Adds a request predicate.
    Predicate,
    /// Sets the forwarding-time path transform.
    Transform,
}

/// Folds one clause's arguments into the candidate set.
pub(crate) type Handler = fn(&mut CandidateSet, &[&str]) -> Result<(), RuleError>;

/// Registry entry.
pub struct FunctionSpec {
    pub name: &'static str,
    pub function: Function,
    pub kind: FunctionKind,
    pub(crate) handler: Handler,
}

static REGISTRY: [FunctionSpec; 13] = [
    FunctionSpec {
        name: "Host",
        function: Function::Host,
        kind: FunctionKind::Predicate,
        handler: host,
    },
    FunctionSpec {
        name: "HostRegexp",
        function: Function::HostRegexp,
        kind: FunctionKind::Predicate,
        handler: host_regexp,
    },
    FunctionSpec {
        name: "Path",
        function: Function::Path,
        kind: FunctionKind::Predicate,
        handler: path,
    },
    FunctionSpec {
        name: "PathPrefix",
        function: Function::PathPrefix,
        kind: FunctionKind::Predicate,
        handler: path_prefix,
    },
    FunctionSpec {
        name: "Method",
        function: Function::Method,
        kind: FunctionKind::Predicate,
        handler: method,
    },
    FunctionSpec {
        name: "Headers",
        function: Function::Headers,
        kind: FunctionKind::Predicate,
        handler: headers,
    },
    FunctionSpec {
        name: "HeadersRegexp",
        function: Function::HeadersRegexp,
        kind: FunctionKind::Predicate,
        handler: headers_regexp,
    },
    FunctionSpec {
        name: "PathStrip",
        function: Function::PathStrip,
        kind: FunctionKind::Transform,
        handler: path_strip,
    },
    FunctionSpec {
        name: "PathStripRegex",
        function: Function::PathStripRegex,
        kind: FunctionKind::Transform,
        handler: path_strip_regex,
    },
    FunctionSpec {
        name: "PathPrefixStrip",
        function: Function::PathPrefixStrip,
        kind: FunctionKind::Transform,
        handler: path_prefix_strip,
    },
    FunctionSpec {
        name: "PathPrefixStripRegex",
        function: Function::PathPrefixStripRegex,
        kind: FunctionKind::Transform,
        handler: path_prefix_strip_regex,
    },
    FunctionSpec {
        name: "AddPrefix",
        function: Function::AddPrefix,
        kind: FunctionKind::Transform,
        handler: add_prefix,
    },
    FunctionSpec {
        name: "ReplacePath",
        function: Function::ReplacePath,
        kind: FunctionKind::Transform,
        handler: replace_path,
    },
];

impl Function {
    /// Exact, case-sensitive lookup.
    pub fn lookup(name: &str) -> Option<Function> {
        REGISTRY.iter().find(|s| s.name == name).map(|s| s.function)
    }

    pub fn spec(self) -> &'static FunctionSpec {
        // REGISTRY is declared in variant order.
        &REGISTRY[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn kind(self) -> FunctionKind {
        self.spec().kind
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn host(set: &mut CandidateSet, args: &[&str]) -> Result<(), RuleError> {
    set.attach(HostMatcher::new(args));
    Ok(())
}

fn host_regexp(set: &mut CandidateSet, args: &[&str]) -> Result<(), RuleError> {
    set.attach(HostRegexpMatcher::new(args)?);
    Ok(())
}

fn method(set: &mut CandidateSet, args: &[&str]) -> Result<(), RuleError> {
    set.attach(MethodMatcher::new(args));
    Ok(())
}

fn headers(set: &mut CandidateSet, args: &[&str]) -> Result<(), RuleError> {
    set.attach(HeadersMatcher::new(args)?);
    Ok(())
}

fn headers_regexp(set: &mut CandidateSet, args: &[&str]) -> Result<(), RuleError> {
    set.attach(HeadersRegexpMatcher::new(args)?);
    Ok(())
}

fn path(set: &mut CandidateSet, args: &[&str]) -> Result<(), RuleError> {
    set.fork(args.iter().map(|p| (PathMatcher::new(*p), p.len())))
}

fn path_prefix(set: &mut CandidateSet, args: &[&str]) -> Result<(), RuleError> {
    set.fork(args.iter().map(|p| (PathPrefixMatcher::new(*p), p.len())))
}

fn path_strip(set: &mut CandidateSet, args: &[&str]) -> Result<(), RuleError> {
    let paths = sorted_paths(args);
    set.set_transform(PathTransform::Strip(paths.clone()))?;
    set.fork(paths.into_iter().map(|p| {
        let len = p.len();
        (PathMatcher::new(p), len)
    }))
}

fn path_prefix_strip(set: &mut CandidateSet, args: &[&str]) -> Result<(), RuleError> {
    let paths = sorted_paths(args);
    set.set_transform(PathTransform::PrefixStrip(paths.clone()))?;
    set.fork(paths.into_iter().map(|p| {
        let len = p.len();
        (PathPrefixMatcher::new(p), len)
    }))
}

fn path_strip_regex(set: &mut CandidateSet, args: &[&str]) -> Result<(), RuleError> {
    let templates = sorted_templates(args)?;
    set.set_transform(PathTransform::StripRegex(templates.clone()))?;
    set.fork(templates.into_iter().map(|t| {
        let len = t.as_str().len();
        (PathTemplateMatcher::exact(t), len)
    }))
}

fn path_prefix_strip_regex(set: &mut CandidateSet, args: &[&str]) -> Result<(), RuleError> {
    let templates = sorted_templates(args)?;
    set.set_transform(PathTransform::PrefixStripRegex(templates.clone()))?;
    set.fork(templates.into_iter().map(|t| {
        let len = t.as_str().len();
        (PathTemplateMatcher::prefix(t), len)
    }))
}

fn add_prefix(set: &mut CandidateSet, args: &[&str]) -> Result<(), RuleError> {
    // tokenizer guarantees at least one argument
    let prefix = args.last().copied().unwrap_or_default();
    set.set_transform(PathTransform::AddPrefix(prefix.to_string()))
}

fn replace_path(set: &mut CandidateSet, args: &[&str]) -> Result<(), RuleError> {
    let replacement = args.last().copied().unwrap_or_default();
    set.set_transform(PathTransform::ReplacePath(replacement.to_string()))
}

fn sorted_paths(args: &[&str]) -> Vec<String> {
    let mut paths: Vec<String> = args.iter().map(|p| p.to_string()).collect();
    longest_first(&mut paths, String::len);
    paths
}

fn sorted_templates(args: &[&str]) -> Result<Vec<PathTemplate>, RuleError> {
    let mut templates = args
        .iter()
        .map(|t| PathTemplate::new(t))
        .collect::<Result<Vec<_>, _>>()?;
    longest_first(&mut templates, |t| t.as_str().len());
    Ok(templates)
}
