//! Expression compiler.
//!
//! # Data Flow
//! ```text
//! "Host:a.com;PathPrefix:/api,/v2"
//!     → rule.rs (clauses)
//!     → fold each clause over the CandidateSet via its registry handler
//!     → one CompiledRoute per surviving candidate
//! ```
//!
//! # Design Decisions
//! - Path clauses fork the candidate set, one candidate per path value, so
//!   each value gets its own specificity; other predicates are shared
//! - Compilation is atomic: any failing clause yields no routes at all
//! - Forking is capped at [`MAX_ROUTES`] per expression
//! - Output order is stable: candidate order × value order

use std::sync::Arc;

use crate::routing::error::RuleError;
use crate::routing::matcher::{AndMatcher, Matcher};
use crate::routing::request::RouteRequest;
use crate::routing::rule::tokenize;
use crate::routing::transform::{PathTransform, Rewrite, TransformKind, TransformPolicy};

/// Upper bound on the routes one expression may expand into.
pub const MAX_ROUTES: usize = 256;

/// Options applied while compiling one expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    pub transform_policy: TransformPolicy,
}

/// A frozen, matchable route.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    matcher: AndMatcher,
    transform: PathTransform,
    specificity: i64,
}

impl CompiledRoute {
    pub fn matches(&self, req: &RouteRequest<'_>) -> bool {
        self.matcher.matches(req)
    }

    pub fn transform(&self) -> &PathTransform {
        &self.transform
    }

    /// Rewrite a matched request path for forwarding.
    pub fn rewrite(&self, path: &str) -> Rewrite {
        self.transform.apply(path)
    }

    /// Summed length of the path constraints on this route.
    pub fn specificity(&self) -> i64 {
        self.specificity
    }
}

/// Compile an expression with default options.
pub fn compile(expression: &str) -> Result<Vec<CompiledRoute>, RuleError> {
    compile_with(expression, CompileOptions::default())
}

pub fn compile_with(
    expression: &str,
    options: CompileOptions,
) -> Result<Vec<CompiledRoute>, RuleError> {
    let clauses = tokenize(expression)?;

    let mut set = CandidateSet::new(options.transform_policy);
    for clause in &clauses {
        let handler = clause.function.spec().handler;
        handler(&mut set, &clause.args).map_err(|e| e.in_clause(clause.text))?;
    }

    Ok(set.finish())
}

#[derive(Debug, Clone, Default)]
struct RouteCandidate {
    matchers: Vec<Arc<dyn Matcher>>,
    specificity: i64,
}

/// In-progress routes for one expression.
#[derive(Debug)]
pub(crate) struct CandidateSet {
    candidates: Vec<RouteCandidate>,
    transform: PathTransform,
    policy: TransformPolicy,
}

impl CandidateSet {
    fn new(policy: TransformPolicy) -> Self {
        Self {
            candidates: vec![RouteCandidate::default()],
            transform: PathTransform::None,
            policy,
        }
    }

    /// Add one predicate to every candidate.
    pub(crate) fn attach(&mut self, matcher: impl Matcher + 'static) {
        let matcher: Arc<dyn Matcher> = Arc::new(matcher);
        for candidate in &mut self.candidates {
            candidate.matchers.push(matcher.clone());
        }
    }

    /// Replace every candidate with one copy per value, each copy gaining
    /// that value's predicate and specificity weight.
    ///
    /// Fails without touching the set if the result would exceed
    /// [`MAX_ROUTES`].
    pub(crate) fn fork<M, I>(&mut self, values: I) -> Result<(), RuleError>
    where
        M: Matcher + 'static,
        I: IntoIterator<Item = (M, usize)>,
    {
        let values: Vec<(Arc<dyn Matcher>, i64)> = values
            .into_iter()
            .map(|(m, weight)| (Arc::new(m) as Arc<dyn Matcher>, weight as i64))
            .collect();

        let total = self
            .candidates
            .len()
            .checked_mul(values.len())
            .filter(|total| *total <= MAX_ROUTES)
            .ok_or(RuleError::TooManyRoutes { limit: MAX_ROUTES })?;

        let mut forked = Vec::with_capacity(total);
        for candidate in &self.candidates {
            for (matcher, weight) in &values {
                let mut next = candidate.clone();
                next.matchers.push(matcher.clone());
                next.specificity += weight;
                forked.push(next);
            }
        }
        self.candidates = forked;
        Ok(())
    }

    pub(crate) fn set_transform(&mut self, next: PathTransform) -> Result<(), RuleError> {
        let previous = self.transform.kind();
        if previous != TransformKind::None && previous != next.kind() {
            match self.policy {
                TransformPolicy::Reject => {
                    return Err(RuleError::TransformConflict {
                        previous: previous.as_str(),
                        next: next.kind().as_str(),
                    });
                }
                TransformPolicy::Overwrite => {
                    tracing::warn!(
                        previous = previous.as_str(),
                        next = next.kind().as_str(),
                        "Path transform overwritten by a later clause"
                    );
                }
            }
        }
        self.transform = next;
        Ok(())
    }

    fn finish(self) -> Vec<CompiledRoute> {
        let transform = self.transform;
        self.candidates
            .into_iter()
            .map(|c| CompiledRoute {
                matcher: AndMatcher::new(c.matchers),
                transform: transform.clone(),
                specificity: c.specificity,
            })
            .collect()
    }
}
