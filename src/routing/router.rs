//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Build an ordered route table from provider frontend records
//! - Look up the matching route for a request
//! - Return the rewrite for the matched route or explicit no-match
//!
//! # Design Decisions
//! - Tables are immutable; updates build a new one and swap it atomically
//! - Readers never lock; writers serialize on the provider map
//! - A frontend whose rule fails to compile is skipped, the rest install
//! - O(n) scan in priority order, first match wins

use arc_swap::ArcSwap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::config::schema::{FrontendConfig, RouterConfig};
use crate::routing::compiler::{compile_with, CompileOptions, CompiledRoute};
use crate::routing::domains::{extract_domains, push_unique};
use crate::routing::error::RuleError;
use crate::routing::priority::{sort_routes, Ranked};
use crate::routing::request::RouteRequest;

/// A compiled route bound to its frontend.
#[derive(Debug)]
pub struct RouteEntry {
    pub frontend: String,
    pub backend: String,
    pub priority: i64,
    order: usize,
    route: CompiledRoute,
}

impl RouteEntry {
    pub fn route(&self) -> &CompiledRoute {
        &self.route
    }
}

impl Ranked for RouteEntry {
    fn priority(&self) -> i64 {
        self.priority
    }

    fn order(&self) -> usize {
        self.order
    }
}

/// Routing decision handed to the request-serving layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    pub frontend: String,
    pub backend: String,
    /// Path to forward, after the route's transform.
    pub path: String,
    /// Headers to add to the forwarded request.
    pub headers: Vec<(&'static str, String)>,
}

/// A frontend that could not be installed.
#[derive(Debug)]
pub struct FrontendError {
    pub provider: String,
    pub frontend: String,
    pub error: RuleError,
}

/// Immutable, priority-ordered snapshot of all routes.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    domains: Vec<String>,
}

impl RouteTable {
    /// Compile frontends from all providers, in the given order, into a table.
    pub fn build<'a, I>(frontends: I, config: &RouterConfig) -> (Self, Vec<FrontendError>)
    where
        I: IntoIterator<Item = (&'a str, &'a FrontendConfig)>,
    {
        let options = CompileOptions {
            transform_policy: config.on_transform_conflict,
        };

        let mut entries = Vec::new();
        let mut domains = Vec::new();
        let mut errors = Vec::new();

        for (provider, frontend) in frontends {
            let routes = match compile_with(&frontend.rule, options) {
                Ok(routes) => routes,
                Err(error) => {
                    tracing::error!(
                        provider = %provider,
                        frontend = %frontend.id,
                        rule = %frontend.rule,
                        error = %error,
                        "Failed to compile frontend rule, frontend skipped"
                    );
                    errors.push(FrontendError {
                        provider: provider.to_string(),
                        frontend: frontend.id.clone(),
                        error,
                    });
                    continue;
                }
            };

            // the rule compiled, so tokenizing it again cannot fail
            for domain in extract_domains(&frontend.rule).unwrap_or_default() {
                push_unique(&mut domains, domain);
            }

            for route in routes {
                entries.push(RouteEntry {
                    frontend: frontend.id.clone(),
                    backend: frontend.backend.clone(),
                    priority: config.priority_strategy.resolve(&route, frontend.priority),
                    order: entries.len(),
                    route,
                });
            }
        }

        sort_routes(&mut entries);
        (Self { entries, domains }, errors)
    }

    /// First route, in priority order, whose predicates all hold.
    pub fn match_request(&self, req: &RouteRequest<'_>) -> Option<RouteMatch> {
        let entry = self.entries.iter().find(|e| e.route.matches(req))?;
        let rewrite = entry.route.rewrite(req.path);
        Some(RouteMatch {
            frontend: entry.frontend.clone(),
            backend: entry.backend.clone(),
            path: rewrite.path,
            headers: rewrite.headers,
        })
    }

    /// Entries in match order.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Canonical domains of every installed frontend.
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of a provider update.
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// False when the update was identical to the stored one.
    pub changed: bool,
    /// Routes in the table after the update.
    pub routes: usize,
    pub errors: Vec<FrontendError>,
}

/// The global router: per-provider frontend sets and the current table.
pub struct Router {
    table: ArcSwap<RouteTable>,
    providers: Mutex<BTreeMap<String, Vec<FrontendConfig>>>,
    config: RouterConfig,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            table: ArcSwap::from_pointee(RouteTable::default()),
            providers: Mutex::new(BTreeMap::new()),
            config,
        }
    }

    /// Replace one provider's frontends and rebuild the table.
    pub fn update(&self, provider: &str, frontends: Vec<FrontendConfig>) -> UpdateReport {
        let mut providers = self.providers.lock().expect("router provider map poisoned");

        if providers.get(provider) == Some(&frontends) {
            tracing::debug!(provider = %provider, "Skipping identical configuration");
            return UpdateReport {
                changed: false,
                routes: self.table.load().len(),
                errors: Vec::new(),
            };
        }

        providers.insert(provider.to_string(), frontends);
        self.rebuild(&providers)
    }

    /// Drop a provider's frontends and rebuild the table.
    pub fn remove_provider(&self, provider: &str) -> UpdateReport {
        let mut providers = self.providers.lock().expect("router provider map poisoned");
        if providers.remove(provider).is_none() {
            return UpdateReport {
                changed: false,
                routes: self.table.load().len(),
                errors: Vec::new(),
            };
        }
        self.rebuild(&providers)
    }

    fn rebuild(&self, providers: &BTreeMap<String, Vec<FrontendConfig>>) -> UpdateReport {
        let frontends = providers
            .iter()
            .flat_map(|(name, list)| list.iter().map(move |f| (name.as_str(), f)));
        let (table, errors) = RouteTable::build(frontends, &self.config);
        let routes = table.len();

        self.table.store(Arc::new(table));
        tracing::info!(
            providers = providers.len(),
            routes,
            failed_frontends = errors.len(),
            "Route table updated"
        );

        UpdateReport {
            changed: true,
            routes,
            errors,
        }
    }

    /// Current table snapshot.
    pub fn table(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }

    pub fn match_request(&self, req: &RouteRequest<'_>) -> Option<RouteMatch> {
        self.table.load().match_request(req)
    }

    pub fn domains(&self) -> Vec<String> {
        self.table.load().domains().to_vec()
    }
}
