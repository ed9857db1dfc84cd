//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Routing table, admin API, proxy handler produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through proxy logs and forwarded requests
//! - Metrics are cheap (atomic increments) and safe on the lookup hot path

pub mod logging;
pub mod metrics;
