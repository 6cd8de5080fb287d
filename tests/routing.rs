//! End-to-end routing behavior through the public router API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use frontend_router::config::RouterConfig;
use frontend_router::routing::{extract_domains, PriorityStrategy, RuleError, Router};

mod common;
use common::{frontend, frontend_for, resolve};

#[test]
fn test_host_rule_with_and_without_port() {
    let router = Router::new(RouterConfig::default());
    router.update("file", vec![frontend("foo", "Host:foo.bar", None)]);

    assert_eq!(frontend_for(&router, "http://foo.bar").as_deref(), Some("foo"));
    assert!(resolve(&router, "GET", "/", &[("Host", "foo.bar:8080")]).is_some());
    assert_eq!(frontend_for(&router, "http://bar.foo"), None);
}

#[test]
fn test_host_and_path_rule() {
    let router = Router::new(RouterConfig::default());
    router.update("file", vec![frontend("foo", "Host: Foo.Bar ; Path:/FOObar", None)]);

    assert_eq!(frontend_for(&router, "http://foo.bar/foobar"), None);
    assert_eq!(frontend_for(&router, "http://foo.bar/FOObar").as_deref(), Some("foo"));
}

#[test]
fn test_priorities() {
    let config = RouterConfig {
        priority_strategy: PriorityStrategy::Insertion,
        ..RouterConfig::default()
    };
    let router = Router::new(config);
    router.update("file", vec![frontend("foo", "PathPrefix:/foo", None)]);

    assert_eq!(frontend_for(&router, "http://x/foo").as_deref(), Some("foo"));
    assert_eq!(frontend_for(&router, "http://x/fo"), None);

    router.update(
        "file",
        vec![
            frontend("foo", "PathPrefix:/foo", None),
            frontend("foobar", "PathPrefix:/foobar", None),
        ],
    );
    assert_eq!(frontend_for(&router, "http://x/foo").as_deref(), Some("foo"));
    assert_eq!(frontend_for(&router, "http://x/foobar").as_deref(), Some("foo"));

    router.update(
        "file",
        vec![
            frontend("foo", "PathPrefix:/foo", Some(1)),
            frontend("foobar", "PathPrefix:/foobar", Some(10)),
        ],
    );
    let matched = resolve(&router, "GET", "http://x/foobar", &[]).unwrap();
    assert_eq!(matched.frontend, "foobar");
    assert_eq!(matched.backend, "foobar-pool");
}

#[test]
fn test_specificity_default_prefers_longer_paths() {
    let router = Router::new(RouterConfig::default());
    router.update(
        "file",
        vec![
            frontend("root", "PathPrefix:/", None),
            frontend("api", "PathPrefix:/api", None),
            frontend("users", "PathPrefix:/api/users", None),
        ],
    );

    assert_eq!(frontend_for(&router, "http://x/api/users/1").as_deref(), Some("users"));
    assert_eq!(frontend_for(&router, "http://x/api/orders").as_deref(), Some("api"));
    assert_eq!(frontend_for(&router, "http://x/index.html").as_deref(), Some("root"));
}

#[test]
fn test_explicit_priority_beats_specificity() {
    let router = Router::new(RouterConfig::default());
    router.update(
        "file",
        vec![
            frontend("catch-all", "PathPrefix:/", Some(100)),
            frontend("api", "PathPrefix:/api", None),
        ],
    );

    assert_eq!(frontend_for(&router, "http://x/api").as_deref(), Some("catch-all"));
}

#[test]
fn test_multi_value_clauses_are_ored() {
    let router = Router::new(RouterConfig::default());
    router.update(
        "file",
        vec![frontend(
            "multi",
            "Host:a.com,b.com;Method:GET,HEAD;Headers:X-Env,prod,X-Env,canary",
            None,
        )],
    );

    assert!(resolve(&router, "HEAD", "http://b.com/", &[("X-Env", "canary")]).is_some());
    assert!(resolve(&router, "GET", "http://a.com/", &[("X-Env", "prod")]).is_some());
    assert!(resolve(&router, "POST", "http://a.com/", &[("X-Env", "prod")]).is_none());
    assert!(resolve(&router, "GET", "http://c.com/", &[("X-Env", "prod")]).is_none());
    assert!(resolve(&router, "GET", "http://a.com/", &[("X-Env", "dev")]).is_none());
}

#[test]
fn test_rewrites() {
    let router = Router::new(RouterConfig::default());
    router.update(
        "file",
        vec![
            frontend("strip", "Host:s.com;PathPrefixStrip:/api,/api/v2", None),
            frontend("add", "Host:a.com;AddPrefix:/internal", None),
            frontend("replace", "Host:r.com;ReplacePath:/health", None),
            frontend("regex", "Host:x.com;PathPrefixStripRegex:/t/{tenant:[a-z]+}", None),
        ],
    );

    let m = resolve(&router, "GET", "http://s.com/api/v2/items", &[]).unwrap();
    assert_eq!(m.path, "/items");
    assert_eq!(m.headers, vec![("x-forwarded-prefix", "/api/v2".to_string())]);

    let m = resolve(&router, "GET", "http://a.com/users", &[]).unwrap();
    assert_eq!(m.path, "/internal/users");
    assert!(m.headers.is_empty());

    let m = resolve(&router, "GET", "http://r.com/status", &[]).unwrap();
    assert_eq!(m.path, "/health");
    assert_eq!(m.headers, vec![("x-replaced-path", "/status".to_string())]);

    let m = resolve(&router, "GET", "http://x.com/t/acme/reports", &[]).unwrap();
    assert_eq!(m.path, "/reports");
    assert!(resolve(&router, "GET", "http://x.com/t/123/reports", &[]).is_none());
}

#[test]
fn test_bad_frontends_are_reported_not_installed() {
    let router = Router::new(RouterConfig::default());
    let report = router.update(
        "file",
        vec![
            frontend("empty", "", None),
            frontend("unknown", "Bogus:1", None),
            frontend("arity", "Headers:X-A", None),
            frontend("regex", "HeadersRegexp:X-A,(", None),
            frontend("ok", "Host:ok.com", None),
        ],
    );

    let failed: Vec<&str> = report.errors.iter().map(|e| e.frontend.as_str()).collect();
    assert_eq!(failed, vec!["empty", "unknown", "arity", "regex"]);
    assert!(matches!(report.errors[0].error, RuleError::EmptyExpression));
    assert!(matches!(report.errors[2].error.root_cause(), RuleError::HeaderArity { .. }));
    assert!(matches!(report.errors[3].error.root_cause(), RuleError::InvalidRegexp { .. }));

    assert_eq!(report.routes, 1);
    assert_eq!(router.domains(), vec!["ok.com".to_string()]);
}

#[test]
fn test_extract_domains() {
    assert_eq!(extract_domains("Host:foo.bar,test.bar").unwrap(), vec!["foo.bar", "test.bar"]);
    assert!(extract_domains("Path:/test").unwrap().is_empty());
    assert_eq!(extract_domains("Host:foo.bar;Path:/test").unwrap(), vec!["foo.bar"]);
    assert_eq!(extract_domains("Host: Foo.Bar ;Path:/test").unwrap(), vec!["foo.bar"]);
}

#[test]
fn test_identical_update_keeps_behavior() {
    let router = Router::new(RouterConfig::default());
    let frontends = vec![
        frontend("a", "Host:a.com;PathPrefix:/x,/yy", None),
        frontend("b", "PathPrefix:/", None),
    ];
    let probes = ["http://a.com/x", "http://a.com/yy/z", "http://a.com/q", "http://b.com/x"];

    router.update("file", frontends.clone());
    let before: Vec<_> = probes.iter().map(|p| frontend_for(&router, p)).collect();

    let report = router.update("file", frontends);
    assert!(!report.changed);
    let after: Vec<_> = probes.iter().map(|p| frontend_for(&router, p)).collect();
    assert_eq!(before, after);
}

#[test]
fn test_readers_see_whole_tables_during_updates() {
    let router = Arc::new(Router::new(RouterConfig::default()));
    let table_a = vec![frontend("a1", "Host:x.com", None), frontend("a2", "Host:y.com", None)];
    let table_b = vec![frontend("b1", "Host:x.com", None), frontend("b2", "Host:y.com", None)];
    router.update("file", table_a.clone());

    let done = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let router = router.clone();
            let done = done.clone();
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    let table = router.table();
                    let names: Vec<&str> =
                        table.entries().iter().map(|e| e.frontend.as_str()).collect();
                    // a snapshot is never a mix of two tables
                    assert!(names == ["a1", "a2"] || names == ["b1", "b2"], "{names:?}");
                }
            })
        })
        .collect();

    for i in 0..200 {
        let next = if i % 2 == 0 { table_b.clone() } else { table_a.clone() };
        router.update("file", next);
    }
    done.store(true, Ordering::Relaxed);

    for reader in readers {
        reader.join().unwrap();
    }
}
