//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Create the axum app with a single fallback dispatch handler
//! - Wire up middleware (tracing, request ID)
//! - Resolve every request against the current route table
//! - Turn synthesized OPTIONS / 405 routes into responses
//! - Swap in a rebuilt route table on config updates

use std::future::Future;
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{BuildError, RouterConfig};
use crate::routing::path::decode_path;
use crate::routing::{Router as RouteTable, Target};
use crate::trie::Params;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<ArcSwap<RouteTable<String>>>,
}

impl AppState {
    pub fn new(table: RouteTable<String>) -> Self {
        Self {
            table: Arc::new(ArcSwap::from_pointee(table)),
        }
    }

    /// Build a router from `config` and publish it. On failure the current
    /// table stays in place.
    pub fn reload(&self, config: &RouterConfig) -> Result<(), BuildError> {
        let table = config.build_router()?;
        let routes = table.routes().len();
        let compressed = table.options().compress;
        self.table.store(Arc::new(table));
        tracing::info!(routes, compressed, "Route table reloaded");
        Ok(())
    }
}

/// HTTP front end for a route table.
pub struct RouteServer {
    app: Router,
    state: AppState,
}

/// Body returned for a registered destination.
#[derive(Debug, Serialize)]
struct Dispatched<'a> {
    route: &'a str,
    pattern: &'a str,
    params: &'a Params,
}

impl RouteServer {
    /// Build the route table from `config` and the axum app around it.
    pub fn new(config: &RouterConfig) -> Result<Self, BuildError> {
        let state = AppState::new(config.build_router()?);
        let app = Self::build_app(state.clone());
        Ok(Self { app, state })
    }

    /// Build the axum app with all middleware layers.
    fn build_app(state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The axum app, for embedding or in-process testing.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until `shutdown` completes, applying config updates as they arrive.
    pub async fn run<F>(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        shutdown: F,
    ) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = state.reload(&config) {
                    tracing::error!(error = %e, "Rejected route table update, keeping the current one");
                }
            }
        });

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve the request and answer with the winning route.
async fn dispatch(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let table = state.table.load();
    let path = decode_path(uri.path());

    let found = match table.resolve(&path, Some(&method)) {
        Ok(Some(found)) => found,
        Ok(None) => {
            tracing::debug!(method = %method, path = %path, "No route matched");
            return (StatusCode::NOT_FOUND, "No matching route found").into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Route table unavailable");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Route table unavailable").into_response();
        }
    };

    tracing::debug!(
        method = %method,
        path = %path,
        pattern = %found.route.pattern(),
        index = found.route.index(),
        "Route matched"
    );

    match found.route.target() {
        Target::Dest(name) => Json(Dispatched {
            route: name,
            pattern: found.route.pattern(),
            params: &found.params,
        })
        .into_response(),
        Target::Options(allowed) => {
            (StatusCode::NO_CONTENT, [(header::ALLOW, allowed.to_string())]).into_response()
        }
        Target::MethodNotAllowed(allowed) => (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, allowed.to_string())],
            "Method not allowed",
        )
            .into_response(),
    }
}
