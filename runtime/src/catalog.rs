//! Read side: listings, detail views and totals.

use serde::Serialize;
use std::sync::Arc;
use student_portal_core::environment::Clock;
use student_portal_core::{
    Availability, Offering, OfferingFilter, OfferingId, OfferingKind, OfferingStore, Registration,
    RegistrationEntry, RegistrationError, Result,
};

/// An offering as shown on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferingView {
    /// The stored row.
    #[serde(flatten)]
    pub offering: Offering,
    /// Derived availability label.
    pub availability: Availability,
    /// Places left, `None` when unbounded.
    pub remaining_places: Option<u32>,
}

impl OfferingView {
    /// Derive the view of `offering` at `now`.
    #[must_use]
    pub fn at(offering: Offering, now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            availability: offering.availability(now),
            remaining_places: offering.remaining_places(),
            offering,
        }
    }
}

/// Totals over a set of offerings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    /// Offerings matching the filter.
    pub total_offerings: usize,
    /// Of those, how many accept registrations right now.
    pub open_offerings: usize,
    /// Of those, how many are at capacity.
    pub full_offerings: usize,
    /// Sum of `current_participants`.
    pub total_participants: u64,
}

/// Read-only queries over the offering store.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn OfferingStore>,
    clock: Arc<dyn Clock>,
}

impl Catalog {
    /// Create a catalog over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn OfferingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Offerings matching `filter`, soonest first, with availability.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    #[tracing::instrument(skip(self), name = "list_offerings")]
    pub async fn list(&self, filter: OfferingFilter) -> Result<Vec<OfferingView>> {
        let now = self.clock.now();
        let offerings = self.store.list_offerings(filter).await?;
        tracing::debug!(count = offerings.len(), "Listed offerings");
        Ok(offerings
            .into_iter()
            .map(|offering| OfferingView::at(offering, now))
            .collect())
    }

    /// One offering with availability.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::NotFound`] for unknown ids.
    pub async fn get(&self, id: OfferingId) -> Result<OfferingView> {
        let offering = self
            .store
            .fetch_offering(id)
            .await?
            .ok_or(RegistrationError::NotFound)?;
        Ok(OfferingView::at(offering, self.clock.now()))
    }

    /// Registrations for one offering, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::NotFound`] for unknown ids.
    pub async fn registrations(&self, id: OfferingId) -> Result<Vec<Registration>> {
        if self.store.fetch_offering(id).await?.is_none() {
            return Err(RegistrationError::NotFound);
        }
        self.store.list_registrations(id).await
    }

    /// Registrations across every offering, or only offerings of `kind`,
    /// each with its offering's title. Newest first.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub async fn all_registrations(
        &self,
        kind: Option<OfferingKind>,
    ) -> Result<Vec<RegistrationEntry>> {
        self.store.list_all_registrations(kind).await
    }

    /// Totals over the offerings matching `filter`.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub async fn summary(&self, filter: OfferingFilter) -> Result<CatalogSummary> {
        let views = self.list(filter).await?;
        Ok(views.iter().fold(CatalogSummary::default(), |mut acc, view| {
            acc.total_offerings += 1;
            acc.total_participants += u64::from(view.offering.current_participants);
            match view.availability {
                Availability::Open => acc.open_offerings += 1,
                Availability::Full => acc.full_offerings += 1,
                _ => {}
            }
            acc
        }))
    }

    /// Whether the store answers.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::TransientStoreError`] when unreachable.
    pub async fn ready(&self) -> Result<()> {
        self.store.ping().await
    }
}
