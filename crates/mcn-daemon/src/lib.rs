//! mcn-daemon library target.
//!
//! Exposes the router, state and boot wiring for integration tests.
//! The binary `main.rs` depends on this library target.

pub mod api_types;
pub mod boot;
pub mod error;
pub mod routes;
pub mod signals;
pub mod state;
