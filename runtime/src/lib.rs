//! # Student Portal Runtime
//!
//! Registration workflow and read-side queries for the student portal.
//!
//! ## Core Components
//!
//! - **`RegistrationService`**: validates, pre-checks and atomically commits
//!   registrations, retrying transient store failures once
//! - **`Catalog`**: listings with derived availability, detail views and totals
//! - **Retry**: bounded exponential backoff
//! - **Metrics**: Prometheus recorder and registration outcome counters
//!
//! ## Example
//!
//! ```ignore
//! use student_portal_runtime::{Catalog, RegistrationService};
//!
//! let service = RegistrationService::new(store.clone(), clock.clone());
//! let catalog = Catalog::new(store, clock);
//!
//! let registration = service.register(offering_id, request).await?;
//! let view = catalog.get(offering_id).await?;
//! ```

/// Retry logic with exponential backoff
pub mod retry;

/// Prometheus metrics for observability
pub mod metrics;

/// Registration workflow
pub mod service;

/// Listings and totals
pub mod catalog;

pub use catalog::{Catalog, CatalogSummary, OfferingView};
pub use retry::RetryPolicy;
pub use service::{RegistrationConfig, RegistrationService};
