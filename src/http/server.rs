//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the proxy Router (lookup middleware + forwarding handler)
//! - Create the admin Router on its own listener
//! - Wire up middleware (tracing, timeout, request ID)
//! - Forward resolved requests to their upstream
//! - Graceful shutdown of both listeners

use std::future::IntoFuture;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{self, HeaderMap, HeaderName},
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri, Version,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::RouterConfig;
use crate::http::lookup::{upstream_lookup_middleware, ResolvedUpstream, NO_UPSTREAM_MESSAGE};
use crate::observability::metrics;
use crate::routing::RoutingTable;

/// Application state injected into the forwarding handler.
#[derive(Clone)]
pub struct AppState {
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the dynamic router: proxy listener plus admin listener.
pub struct HttpServer {
    proxy: Router,
    admin: Option<Router>,
}

impl HttpServer {
    /// Create a new HTTP server backed by `table`.
    pub fn new(config: RouterConfig, table: Arc<RoutingTable>) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = AppState { client };
        let proxy = Self::build_proxy_router(&config, table.clone(), state);
        let admin = config
            .admin
            .enabled
            .then(|| setup_admin_router(table, &config.admin));

        Self { proxy, admin }
    }

    /// Build the proxy router with all middleware layers.
    #[allow(deprecated)]
    fn build_proxy_router(config: &RouterConfig, table: Arc<RoutingTable>, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(middleware::from_fn_with_state(table, upstream_lookup_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The proxy router, for serving on a custom transport or testing.
    pub fn proxy_router(&self) -> Router {
        self.proxy.clone()
    }

    /// Run the server until `shutdown` fires.
    ///
    /// `admin_listener` is ignored when the admin API is disabled.
    pub async fn run(
        self,
        listener: TcpListener,
        admin_listener: Option<TcpListener>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %listener.local_addr()?, "Proxy listener starting");

        let proxy = axum::serve(listener, self.proxy)
            .with_graceful_shutdown(wait_for_shutdown(shutdown.resubscribe()));

        match (self.admin, admin_listener) {
            (Some(admin), Some(admin_listener)) => {
                tracing::info!(address = %admin_listener.local_addr()?, "Admin API starting");
                let admin = axum::serve(admin_listener, admin)
                    .with_graceful_shutdown(wait_for_shutdown(shutdown));
                tokio::try_join!(proxy.into_future(), admin.into_future())?;
            }
            (Some(_), None) => {
                tracing::warn!("Admin API enabled but no admin listener supplied");
                proxy.await?;
            }
            (None, _) => proxy.await?,
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Forwarding stage: sends the request to the upstream resolved by the
/// lookup middleware.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let Some(upstream) = request
        .extensions()
        .get::<ResolvedUpstream>()
        .map(|u| u.as_str().to_string())
    else {
        metrics::record_request(method.as_str(), 404, start_time);
        return (StatusCode::NOT_FOUND, NO_UPSTREAM_MESSAGE).into_response();
    };

    let Some(uri) = upstream_uri(&upstream, request.uri()) else {
        tracing::warn!(request_id = %request_id, upstream = %upstream, "Upstream is not a valid address");
        metrics::record_request(method.as_str(), 502, start_time);
        return (StatusCode::BAD_GATEWAY, "invalid upstream").into_response();
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Proxying request"
    );

    let (mut parts, body) = request.into_parts();
    parts.uri = uri;
    parts.version = Version::HTTP_11;
    strip_hop_by_hop(&mut parts.headers);
    let req = Request::from_parts(parts, body);

    match state.client.request(req).await {
        Ok(response) => {
            metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
            let (mut parts, body) = response.into_parts();
            strip_hop_by_hop(&mut parts.headers);
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, upstream = %upstream, error = %e, "Upstream error");
            metrics::record_request(method.as_str(), 502, start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Build the outbound URI for `upstream`, keeping the original path and query.
///
/// `host:port` is taken as an `http` authority; `scheme://authority[/...]`
/// keeps its scheme (any path on the upstream is ignored).
pub fn upstream_uri(upstream: &str, original: &Uri) -> Option<Uri> {
    let (scheme, authority) = if upstream.contains("://") {
        let parsed = Uri::from_str(upstream).ok()?;
        (parsed.scheme()?.clone(), parsed.authority()?.clone())
    } else {
        (Scheme::HTTP, Authority::from_str(upstream).ok()?)
    };

    let path_and_query = original
        .path_and_query()
        .cloned()
        .unwrap_or_else(|| PathAndQuery::from_static("/"));

    Uri::builder()
        .scheme(scheme)
        .authority(authority)
        .path_and_query(path_and_query)
        .build()
        .ok()
}

const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Remove hop-by-hop headers, including any named by `Connection`.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_str(name.trim()).ok())
        .collect();

    for name in named.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}

async fn wait_for_shutdown(mut shutdown: broadcast::Receiver<()>) {
    let _ = shutdown.recv().await;
    tracing::info!("Shutdown signal received");
}
