//! Dynamic host-based router.
//!
//! Keeps a live host → upstream routing table, consulted on every proxied
//! request and mutated through a small admin API.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use http::{HttpServer, ResolvedUpstream};
pub use lifecycle::{RouterApp, Shutdown};
pub use routing::RoutingTable;
