//! Route priority resolution.
//!
//! # Design Decisions
//! - Default priority is a named heuristic (specificity), or zero under the
//!   insertion strategy
//! - An explicit frontend priority replaces the default outright
//! - Higher priority first, ties by insertion order, so sorting is total
//! - Sorting happens when the table is built, never per request

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::routing::compiler::CompiledRoute;

/// How routes without an explicit priority are ranked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityStrategy {
    /// Longer path constraints rank first.
    #[default]
    Specificity,
    /// All default priorities are equal; first registered wins.
    Insertion,
}

impl PriorityStrategy {
    /// Priority of a route given the frontend's optional override.
    pub fn resolve(self, route: &CompiledRoute, explicit: Option<i64>) -> i64 {
        match (explicit, self) {
            (Some(priority), _) => priority,
            (None, PriorityStrategy::Specificity) => route.specificity(),
            (None, PriorityStrategy::Insertion) => 0,
        }
    }
}

/// Anything the resolver can order.
pub trait Ranked {
    fn priority(&self) -> i64;
    /// Registration order, lower registered first.
    fn order(&self) -> usize;
}

pub fn compare<T: Ranked>(a: &T, b: &T) -> Ordering {
    b.priority()
        .cmp(&a.priority())
        .then_with(|| a.order().cmp(&b.order()))
}

pub fn sort_routes<T: Ranked>(routes: &mut [T]) {
    routes.sort_by(compare);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::compiler::compile;

    #[derive(Debug)]
    struct Entry(&'static str, i64, usize);

    impl Ranked for Entry {
        fn priority(&self) -> i64 {
            self.1
        }
        fn order(&self) -> usize {
            self.2
        }
    }

    #[test]
    fn test_higher_priority_first_then_insertion_order() {
        let mut entries = vec![
            Entry("c", 1, 2),
            Entry("a", 5, 1),
            Entry("d", 1, 0),
            Entry("b", 5, 3),
        ];
        sort_routes(&mut entries);
        let names: Vec<_> = entries.iter().map(|e| e.0).collect();
        assert_eq!(names, vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn test_resolve() {
        let route = &compile("PathPrefix:/foobar").unwrap()[0];

        assert_eq!(PriorityStrategy::Specificity.resolve(route, None), 7);
        assert_eq!(PriorityStrategy::Insertion.resolve(route, None), 0);
        assert_eq!(PriorityStrategy::Specificity.resolve(route, Some(1)), 1);
        assert_eq!(PriorityStrategy::Insertion.resolve(route, Some(-3)), -3);
    }
}
