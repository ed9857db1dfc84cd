//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (Host header / URI authority)
//!     → http::lookup (extract routing key)
//!     → table.rs (RoutingTable::lookup)
//!     → Return: upstream or miss
//!
//! Admin API:
//!     POST /dynamic-router/add | /dynamic-router/delete
//!     → admin::handlers
//!     → table.rs (RoutingTable::add / RoutingTable::delete)
//! ```
//!
//! # Design Decisions
//! - Routes live only in memory and start empty on every boot
//! - Exact key match only (no wildcards, no normalization)
//! - One table per router instance, passed by `Arc` handle

pub mod table;

pub use table::RoutingTable;
