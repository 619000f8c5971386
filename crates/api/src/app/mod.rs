//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: store/bus wiring shared by handlers and consumers
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: the flat note resource and its string-encoded fields
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    // Note routes require a tenant; health does not.
    let tenanted = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn(middleware::tenant_middleware));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(tenanted)
}
