//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_lookups_total` (counter): routing table lookups by result (hit, miss)
//! - `router_mutations_total` (counter): admin mutations by op (add, delete)
//! - `router_routes` (gauge): routes currently held
//! - `router_requests_total` (counter): proxy requests by method, status (misses included)
//! - `router_request_duration_seconds` (histogram): proxied request latency
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!("router_lookups_total", "result" => result).increment(1);
}

/// `replaced` is true when `add` overwrote an existing route.
pub fn record_add(replaced: bool) {
    metrics::counter!("router_mutations_total", "op" => "add").increment(1);
    if !replaced {
        metrics::gauge!("router_routes").increment(1.0);
    }
}

pub fn record_delete(removed: bool) {
    metrics::counter!("router_mutations_total", "op" => "delete").increment(1);
    if removed {
        metrics::gauge!("router_routes").decrement(1.0);
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "router_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("router_request_duration_seconds").record(start.elapsed().as_secs_f64());
}
