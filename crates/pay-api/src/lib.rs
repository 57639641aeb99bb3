//! # pay-api
//!
//! HTTP API layer for the payment charge service.
//!
//! This crate provides:
//! - Axum router with the charge and health endpoints
//! - Common Log Format access logging
//! - HTTP/1 serve loop with read, header and write timeouts
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/rest/v1/charge` | Charge an invoice |
//! | GET | `/rest/ready` | Readiness check |
//! | GET | `/rest/alive` | Liveness check |

pub mod access_log;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use routes::create_router;
pub use server::{run, serve};
pub use state::{AppConfig, AppState, LogFormat};
