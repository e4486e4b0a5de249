//! Offering store abstraction.
//!
//! The store is the only shared mutable resource in the system. Reads are
//! plain lookups; the single write, [`OfferingStore::commit_registration`],
//! must be atomic per offering row.
//!
//! # Implementations
//!
//! - `PostgresOfferingStore` (in `student-portal-postgres`): row lock plus
//!   conditional update inside one transaction
//! - `InMemoryOfferingStore` (in `student-portal-testing`): one mutex around
//!   all rows, with fault injection for retry tests

use crate::error::Result;
use crate::offering::{Offering, OfferingFilter, OfferingId, OfferingKind};
use crate::registration::{IdentityKey, Registration, RegistrationEntry};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Data-store operations the registration workflow needs.
///
/// # Dyn Compatibility
///
/// Methods return boxed futures so the service can hold an
/// `Arc<dyn OfferingStore>` and swap implementations at startup.
pub trait OfferingStore: Send + Sync {
    /// Fetches one offering by key, bypassing any cache.
    ///
    /// Returns `Ok(None)` when the offering does not exist.
    ///
    /// # Errors
    ///
    /// - `TransientStoreError`: connection or timeout failure
    /// - `ConstraintViolation`: the row could not be decoded
    fn fetch_offering(&self, id: OfferingId) -> StoreFuture<'_, Option<Offering>>;

    /// Looks up the registration held by `identity` for `offering_id`.
    ///
    /// # Errors
    ///
    /// - `TransientStoreError`: connection or timeout failure
    fn find_registration(
        &self,
        offering_id: OfferingId,
        identity: IdentityKey,
    ) -> StoreFuture<'_, Option<Registration>>;

    /// Lists offerings matching `filter`, soonest start first.
    ///
    /// # Errors
    ///
    /// - `TransientStoreError`: connection or timeout failure
    fn list_offerings(&self, filter: OfferingFilter) -> StoreFuture<'_, Vec<Offering>>;

    /// Lists the registrations of one offering, newest first.
    ///
    /// # Errors
    ///
    /// - `TransientStoreError`: connection or timeout failure
    fn list_registrations(&self, offering_id: OfferingId) -> StoreFuture<'_, Vec<Registration>>;

    /// Lists registrations across all offerings (of `kind`, when given)
    /// together with their offering's title, newest first.
    ///
    /// # Errors
    ///
    /// - `TransientStoreError`: connection or timeout failure
    fn list_all_registrations(
        &self,
        kind: Option<OfferingKind>,
    ) -> StoreFuture<'_, Vec<RegistrationEntry>>;

    /// Atomically records `registration` and counts it against its offering.
    ///
    /// In one indivisible unit the implementation must:
    ///
    /// 1. lock (or conditionally update) the offering row,
    /// 2. re-run [`Offering::check_admission`] against `now` on the locked row,
    /// 3. insert the registration, failing with `AlreadyRegistered` if the
    ///    identity is taken,
    /// 4. increment `current_participants` by one and recompute `status`.
    ///
    /// Either every step takes effect or none does. Returns the offering as
    /// committed.
    ///
    /// # Errors
    ///
    /// - `NotFound`, `OfferingUnavailable`, `OutsideRegistrationWindow`,
    ///   `CapacityExceeded`: the locked row no longer admits the registration
    /// - `AlreadyRegistered`: identity constraint fired
    /// - `TransientStoreError`: connection, timeout or serialization failure
    /// - `ConstraintViolation`: any other store-level rejection
    fn commit_registration(
        &self,
        registration: Registration,
        now: DateTime<Utc>,
    ) -> StoreFuture<'_, Offering>;

    /// Cheap round-trip used by readiness checks.
    ///
    /// # Errors
    ///
    /// - `TransientStoreError`: the store is unreachable
    fn ping(&self) -> StoreFuture<'_, ()>;
}
