//! Per-request routing table lookup.
//!
//! # Responsibilities
//! - Extract the routing key (addressed host) from the request
//! - Resolve it against the routing table
//! - Publish a hit as a request extension for downstream stages
//!
//! # Design Decisions
//! - The key is used verbatim, port included, exactly as the client sent it
//! - A miss emits `404 no upstream found` but the next stage still runs;
//!   downstream output is discarded in that case

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::HOST, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::routing::RoutingTable;

/// Well-known name of the resolved upstream in request-scoped context.
pub const UPSTREAM_CONTEXT_KEY: &str = "dynamic.upstream";

/// Body of the not-found signal emitted on a miss.
pub const NO_UPSTREAM_MESSAGE: &str = "no upstream found";

/// Upstream resolved for the current request. Present in the request
/// extensions only on a hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUpstream(pub String);

impl ResolvedUpstream {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Routing key of a request: the `Host` header, or the URI authority for
/// requests that carry none (HTTP/2).
pub fn routing_key<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| req.uri().authority().map(|a| a.as_str()))
}

pub async fn upstream_lookup_middleware(
    State(table): State<Arc<RoutingTable>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let upstream = routing_key(&req).and_then(|host| table.lookup(host));

    match upstream {
        Some(upstream) => {
            tracing::trace!(context_key = UPSTREAM_CONTEXT_KEY, upstream = %upstream, "Upstream resolved");
            req.extensions_mut().insert(ResolvedUpstream(upstream));
            next.run(req).await
        }
        None => {
            tracing::debug!(
                host = routing_key(&req).unwrap_or_default(),
                "No upstream found"
            );
            let _ = next.run(req).await;
            (StatusCode::NOT_FOUND, NO_UPSTREAM_MESSAGE).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::any, Extension, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn app(table: Arc<RoutingTable>, calls: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/",
                any(move |upstream: Option<Extension<ResolvedUpstream>>| {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        match upstream {
                            Some(Extension(u)) => u.as_str().to_string(),
                            None => "downstream without upstream".to_string(),
                        }
                    }
                }),
            )
            .layer(middleware::from_fn_with_state(table, upstream_lookup_middleware))
    }

    fn request(host: &str) -> Request<Body> {
        Request::builder()
            .uri("/")
            .header("host", host)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_string(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_hit_publishes_upstream() {
        let table = Arc::new(RoutingTable::new());
        table.add("a.example.com", "10.0.0.1:8080");
        let calls = Arc::new(AtomicUsize::new(0));

        let res = app(table, calls.clone())
            .oneshot(request("a.example.com"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_string(res).await, "10.0.0.1:8080");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_miss_signals_not_found_and_continues() {
        let table = Arc::new(RoutingTable::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let res = app(table, calls.clone())
            .oneshot(request("missing.example.com"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(res).await, NO_UPSTREAM_MESSAGE);
        assert_eq!(calls.load(Ordering::SeqCst), 1, "next stage must still run");
    }

    #[tokio::test]
    async fn test_host_with_port_is_distinct_key() {
        let table = Arc::new(RoutingTable::new());
        table.add("a.example.com", "u1");
        let calls = Arc::new(AtomicUsize::new(0));

        let res = app(table, calls)
            .oneshot(request("a.example.com:8080"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_host_is_a_miss() {
        let table = Arc::new(RoutingTable::new());
        table.add("", "u1");
        let calls = Arc::new(AtomicUsize::new(0));

        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let res = app(table, calls.clone()).oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_routing_key_falls_back_to_authority() {
        let req = Request::builder()
            .uri("http://b.example.com:9000/path")
            .body(())
            .unwrap();
        assert_eq!(routing_key(&req), Some("b.example.com:9000"));

        let req = Request::builder()
            .uri("http://ignored.example.com/")
            .header("host", "a.example.com")
            .body(())
            .unwrap();
        assert_eq!(routing_key(&req), Some("a.example.com"));
    }
}
