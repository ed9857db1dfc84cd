//! Host → upstream routing table.
//!
//! # Responsibilities
//! - Store host → upstream associations
//! - Answer per-request lookups without readers contending on each other
//! - Apply administrative adds and deletes atomically
//!
//! # Design Decisions
//! - Keys are compared verbatim (no case folding, no port stripping)
//! - Upstreams are opaque; nothing here parses or validates them
//! - Backed by a sharded `DashMap`: lookups take a shard read lock, mutations
//!   a shard write lock, each held for exactly one map operation
//! - No iteration or snapshot is exposed; only a count for metrics

use dashmap::DashMap;

use crate::observability::metrics;

/// Thread-safe mapping from routing key (request host) to upstream.
///
/// Created empty and shared via `Arc` with every component that needs it.
#[derive(Debug, Default)]
pub struct RoutingTable {
    routes: DashMap<String, String>,
}

impl RoutingTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self {
            routes: DashMap::new(),
        }
    }

    /// Look up the upstream for `host`.
    ///
    /// `None` is a normal outcome (a miss), not an error.
    pub fn lookup(&self, host: &str) -> Option<String> {
        // Clone out before the shard guard drops.
        let upstream = self.routes.get(host).map(|r| r.value().clone());
        metrics::record_lookup(upstream.is_some());
        upstream
    }

    /// Insert or fully replace the upstream for `host`.
    pub fn add(&self, host: impl Into<String>, upstream: impl Into<String>) {
        let host = host.into();
        let upstream = upstream.into();
        tracing::debug!(host = %host, upstream = %upstream, "Route added");
        let replaced = self.routes.insert(host, upstream).is_some();
        metrics::record_add(replaced);
    }

    /// Remove the route for `host`. Absent keys are a no-op.
    pub fn delete(&self, host: &str) {
        let removed = self.routes.remove(host).is_some();
        if removed {
            tracing::debug!(host = %host, "Route deleted");
        } else {
            tracing::trace!(host = %host, "Delete of unknown host ignored");
        }
        metrics::record_delete(removed);
    }

    /// Number of routes currently held.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
