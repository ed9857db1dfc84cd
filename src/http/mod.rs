//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, tracing)
//!     → lookup.rs (Host → RoutingTable::lookup → ResolvedUpstream)
//!     → server.rs proxy_handler (forward to upstream)
//!     → Send to client
//! ```

pub mod lookup;
pub mod server;

pub use lookup::{ResolvedUpstream, UPSTREAM_CONTEXT_KEY};
pub use server::HttpServer;
