//! Application state for Axum handlers.

use std::sync::Arc;
use student_portal_core::OfferingStore;
use student_portal_core::environment::Clock;
use student_portal_runtime::{Catalog, RegistrationConfig, RegistrationService};

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Write side: the registration workflow.
    pub registrations: Arc<RegistrationService>,
    /// Read side: listings and totals.
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Build both services over one store and clock.
    #[must_use]
    pub fn new(
        store: Arc<dyn OfferingStore>,
        clock: Arc<dyn Clock>,
        config: RegistrationConfig,
    ) -> Self {
        Self {
            registrations: Arc::new(
                RegistrationService::new(Arc::clone(&store), Arc::clone(&clock))
                    .with_config(config),
            ),
            catalog: Arc::new(Catalog::new(store, clock)),
        }
    }
}
