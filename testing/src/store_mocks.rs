//! In-memory offering store for fast, deterministic tests.
//!
//! All rows sit behind one mutex, so [`OfferingStore::commit_registration`]
//! is trivially atomic. Fault injection lets tests exercise the retry path:
//!
//! - [`InMemoryOfferingStore::fail_next_commits`]: commit fails before
//!   applying anything
//! - [`InMemoryOfferingStore::lose_next_commit_acks`]: commit applies, then
//!   reports a transient failure (acknowledgement lost)
//! - [`InMemoryOfferingStore::set_read_delay`]: every fresh read returns
//!   late with what it saw when called, so concurrent requests all pass
//!   their pre-checks on stale rows

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use student_portal_core::{
    IdentityKey, Offering, OfferingFilter, OfferingId, OfferingKind, OfferingStore, Registration,
    RegistrationEntry, RegistrationError, StoreFuture,
};

#[derive(Debug, Default)]
struct Tables {
    offerings: HashMap<OfferingId, Offering>,
    registrations: Vec<Registration>,
}

#[derive(Debug, Default)]
struct Faults {
    fail_next_commits: usize,
    lose_next_commit_acks: usize,
    read_delay: Option<Duration>,
}

/// In-memory [`OfferingStore`].
///
/// # Example
///
/// ```
/// use student_portal_testing::{fixtures::OfferingBuilder, test_clock, InMemoryOfferingStore};
/// use student_portal_core::environment::Clock;
///
/// let offering = OfferingBuilder::tryout(test_clock().now()).capacity(10).build();
/// let store = InMemoryOfferingStore::new();
/// store.insert_offering(offering.clone());
/// assert_eq!(store.registration_count(offering.id), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryOfferingStore {
    tables: Arc<Mutex<Tables>>,
    faults: Arc<Mutex<Faults>>,
    commit_attempts: Arc<AtomicUsize>,
}

impl InMemoryOfferingStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `offerings`
    #[must_use]
    pub fn with_offerings(offerings: impl IntoIterator<Item = Offering>) -> Self {
        let store = Self::new();
        for offering in offerings {
            store.insert_offering(offering);
        }
        store
    }

    /// Insert or replace an offering, as the admin process would
    pub fn insert_offering(&self, offering: Offering) {
        self.tables
            .lock()
            .unwrap()
            .offerings
            .insert(offering.id, offering);
    }

    /// Snapshot of an offering row
    #[must_use]
    pub fn offering(&self, id: OfferingId) -> Option<Offering> {
        self.tables.lock().unwrap().offerings.get(&id).cloned()
    }

    /// Number of registrations recorded for an offering
    #[must_use]
    pub fn registration_count(&self, id: OfferingId) -> usize {
        self.tables
            .lock()
            .unwrap()
            .registrations
            .iter()
            .filter(|r| r.offering_id == id)
            .count()
    }

    /// How many times `commit_registration` has been called
    #[must_use]
    pub fn commit_attempts(&self) -> usize {
        self.commit_attempts.load(Ordering::SeqCst)
    }

    /// Make the next `n` commits fail with a transient error before
    /// applying anything
    pub fn fail_next_commits(&self, n: usize) {
        self.faults.lock().unwrap().fail_next_commits = n;
    }

    /// Make the next `n` commits apply and then report a transient error
    pub fn lose_next_commit_acks(&self, n: usize) {
        self.faults.lock().unwrap().lose_next_commit_acks = n;
    }

    /// Delay every `fetch_offering` and `find_registration` result by
    /// `delay`. The row is read before the delay, so the caller sees it as
    /// it was when the call began
    pub fn set_read_delay(&self, delay: Duration) {
        self.faults.lock().unwrap().read_delay = Some(delay);
    }

    async fn read_delay(&self) {
        let delay = self.faults.lock().unwrap().read_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn take_fault(&self, pick: impl FnOnce(&mut Faults) -> &mut usize) -> bool {
        let mut faults = self.faults.lock().unwrap();
        let counter = pick(&mut faults);
        if *counter > 0 {
            *counter -= 1;
            true
        } else {
            false
        }
    }

    fn apply_commit(
        &self,
        registration: Registration,
        now: DateTime<Utc>,
    ) -> Result<Offering, RegistrationError> {
        let mut tables = self.tables.lock().unwrap();

        let mut offering = tables
            .offerings
            .get(&registration.offering_id)
            .cloned()
            .ok_or(RegistrationError::NotFound)?;
        offering.check_admission(now)?;

        let identity = registration.identity_key();
        if tables
            .registrations
            .iter()
            .any(|r| r.offering_id == registration.offering_id && r.identity_key() == identity)
        {
            return Err(RegistrationError::AlreadyRegistered);
        }

        offering.admit_one(now)?;
        tables.offerings.insert(offering.id, offering.clone());
        tables.registrations.push(registration);
        Ok(offering)
    }
}

impl OfferingStore for InMemoryOfferingStore {
    fn fetch_offering(&self, id: OfferingId) -> StoreFuture<'_, Option<Offering>> {
        Box::pin(async move {
            // Read first, deliver late: the caller acts on a stale row.
            let snapshot = self.offering(id);
            self.read_delay().await;
            Ok(snapshot)
        })
    }

    fn find_registration(
        &self,
        offering_id: OfferingId,
        identity: IdentityKey,
    ) -> StoreFuture<'_, Option<Registration>> {
        Box::pin(async move {
            let snapshot = self
                .tables
                .lock()
                .unwrap()
                .registrations
                .iter()
                .find(|r| r.offering_id == offering_id && r.identity_key() == identity)
                .cloned();
            self.read_delay().await;
            Ok(snapshot)
        })
    }

    fn list_offerings(&self, filter: OfferingFilter) -> StoreFuture<'_, Vec<Offering>> {
        Box::pin(async move {
            let mut offerings: Vec<Offering> = self
                .tables
                .lock()
                .unwrap()
                .offerings
                .values()
                .filter(|o| filter.matches(o))
                .cloned()
                .collect();
            offerings.sort_by(|a, b| {
                a.start_date
                    .cmp(&b.start_date)
                    .then_with(|| a.title.cmp(&b.title))
            });
            Ok(offerings)
        })
    }

    fn list_registrations(&self, offering_id: OfferingId) -> StoreFuture<'_, Vec<Registration>> {
        Box::pin(async move {
            let mut registrations: Vec<Registration> = self
                .tables
                .lock()
                .unwrap()
                .registrations
                .iter()
                .filter(|r| r.offering_id == offering_id)
                .cloned()
                .collect();
            registrations.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
            Ok(registrations)
        })
    }

    fn list_all_registrations(
        &self,
        kind: Option<OfferingKind>,
    ) -> StoreFuture<'_, Vec<RegistrationEntry>> {
        Box::pin(async move {
            let tables = self.tables.lock().unwrap();
            let mut entries: Vec<RegistrationEntry> = tables
                .registrations
                .iter()
                .filter_map(|r| {
                    let offering = tables.offerings.get(&r.offering_id)?;
                    if kind.is_some_and(|k| offering.kind != k) {
                        return None;
                    }
                    Some(RegistrationEntry {
                        registration: r.clone(),
                        offering_title: offering.title.clone(),
                        offering_kind: offering.kind,
                    })
                })
                .collect();
            drop(tables);
            entries.sort_by(|a, b| {
                b.registration
                    .registered_at
                    .cmp(&a.registration.registered_at)
            });
            Ok(entries)
        })
    }

    fn commit_registration(
        &self,
        registration: Registration,
        now: DateTime<Utc>,
    ) -> StoreFuture<'_, Offering> {
        Box::pin(async move {
            self.commit_attempts.fetch_add(1, Ordering::SeqCst);

            if self.take_fault(|f| &mut f.fail_next_commits) {
                return Err(RegistrationError::TransientStoreError(
                    "injected failure before commit".to_string(),
                ));
            }

            let committed = self.apply_commit(registration, now)?;

            if self.take_fault(|f| &mut f.lose_next_commit_acks) {
                return Err(RegistrationError::TransientStoreError(
                    "injected failure after commit".to_string(),
                ));
            }

            Ok(committed)
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }
}
