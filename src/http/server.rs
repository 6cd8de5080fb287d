//! HTTP server setup.
//!
//! # Responsibilities
//! - Create Axum Router with the routing handler
//! - Wire up middleware (tracing)
//! - Resolve every request through the route table
//! - Answer with the routing decision, or 404 when nothing matches
//!
//! Forwarding to backends is left to the load-balancing layer; this server
//! reports what would be forwarded where.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::routing::{RouteRequest, Router as RouteRouter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<RouteRouter>,
}

/// HTTP front end of the route table.
pub struct HttpServer {
    app: Router,
}

impl HttpServer {
    pub fn new(router: Arc<RouteRouter>) -> Self {
        let app = Self::build_router(AppState { router });
        Self { app }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(route_handler))
            .route("/", any(route_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The Axum router, for serving or driving directly in tests.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn route_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let view = RouteRequest::from_request(&request);

    match state.router.match_request(&view) {
        Some(matched) => {
            tracing::debug!(
                method = %request.method(),
                path = %view.path,
                frontend = %matched.frontend,
                backend = %matched.backend,
                forward_path = %matched.path,
                "Route matched"
            );
            Json(matched).into_response()
        }
        None => {
            tracing::warn!(
                method = %request.method(),
                host = ?view.host,
                path = %view.path,
                "No route matched"
            );
            (StatusCode::NOT_FOUND, "No matching route found").into_response()
        }
    }
}
