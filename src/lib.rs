//! tunelink library — smart link redirector for music releases
//!
//! A user submits a music URL and a custom path; the service resolves the
//! URL to cross-platform streaming links via the Odesli lookup API, stores
//! the result under the chosen path, and serves a landing page listing all
//! platform links for that path.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::service::SmartLinkService;

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod service;
pub mod services;
pub mod store;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SmartLinkService>,
    /// Host for shareable URLs; falls back to the request Host header
    pub public_host: Option<String>,
}

impl AppState {
    pub fn new(service: Arc<SmartLinkService>, public_host: Option<String>) -> Self {
        Self {
            service,
            public_host,
        }
    }
}

/// Build application router
///
/// The catch-all `/:custom_path` route comes last; axum gives the static
/// routes precedence.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::index))
        .route("/create", post(api::create_link))
        .route("/list", get(api::list_links))
        .merge(api::health_routes())
        .route("/:custom_path", get(api::landing_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
