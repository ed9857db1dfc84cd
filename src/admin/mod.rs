//! Admin API: out-of-band mutation of the routing table.
//!
//! # Endpoints
//! ```text
//! POST /dynamic-router/add     {"host": "...", "upstream": "..."}  → 200
//! POST /dynamic-router/delete  {"host": "..."}                     → 200
//! malformed payload → 400, wrong method → 405, unknown path → 404
//! ```

pub mod auth;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::post,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::AdminConfig;
use crate::routing::RoutingTable;
use self::auth::admin_auth_middleware;
use self::handlers::{handle_endpoint, not_found, reject_method};

pub use self::error::AdminError;

/// Path prefix of the admin namespace.
pub const ADMIN_PREFIX: &str = "/dynamic-router/";

/// State shared by admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub table: Arc<RoutingTable>,
    pub api_key: Option<Arc<str>>,
}

pub fn setup_admin_router(table: Arc<RoutingTable>, config: &AdminConfig) -> Router {
    let state = AdminState {
        table,
        api_key: config.api_key.as_deref().map(Arc::from),
    };

    Router::new()
        .route(
            &format!("{}{{*endpoint}}", ADMIN_PREFIX),
            post(handle_endpoint).fallback(reject_method),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
