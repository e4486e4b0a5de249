//! HTTP API for the student portal.
//!
//! Thin Axum shell over [`student_portal_runtime`]: handlers parse the
//! request, call the registration service or catalog, and map
//! [`student_portal_core::RegistrationError`] onto JSON error responses.
//!
//! # Request Flow
//!
//! 1. **Request ID** assigned by [`middleware::request_id_layer`]
//! 2. **Extract** path, query and JSON body
//! 3. **Call** `RegistrationService::register` or a `Catalog` query
//! 4. **Map** the result to a response (`201`, `409`, `422`, ...)
//!
//! # Example
//!
//! ```ignore
//! use student_portal_web::{AppState, build_router};
//!
//! let state = AppState::new(store, clock, config.registration.service_config());
//! let app = build_router(state);
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export key types for convenience
pub use config::{Config, ConfigError};
pub use error::AppError;
pub use extractors::RequestId;
pub use middleware::{REQUEST_ID_HEADER, request_id_layer};
pub use routes::{build_router, metrics_router};
pub use state::AppState;
