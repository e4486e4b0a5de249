//! The registration workflow.
//!
//! [`RegistrationService::register`] validates the request, checks the
//! offering against a fresh read, then commits through
//! [`OfferingStore::commit_registration`], which repeats the row checks under
//! a lock. The pre-checks give precise errors cheaply; the commit is what
//! guarantees the capacity invariant.

use crate::metrics::RegistrationMetrics;
use crate::retry::{RetryPolicy, retry_with_predicate};
use std::sync::Arc;
use std::time::{Duration, Instant};
use student_portal_core::environment::Clock;
use student_portal_core::{
    IdentityKey, NewRegistration, OfferingId, OfferingStore, Registration, RegistrationError,
    RegistrationId, Result, StoreFuture,
};

/// Tuning knobs for [`RegistrationService`].
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationConfig {
    /// Retry policy for transient store errors. `max_retries` is clamped to 1.
    pub retry: RetryPolicy,
    /// Upper bound on every store call. `None` waits indefinitely.
    pub store_timeout: Option<Duration>,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            store_timeout: Some(Duration::from_secs(5)),
        }
    }
}

/// Registers students for offerings without ever exceeding capacity.
///
/// Stateless apart from its injected store and clock; clone the `Arc`s to
/// share one service between request handlers.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use student_portal_runtime::RegistrationService;
/// use student_portal_testing::{fixtures::{OfferingBuilder, registrant}, test_clock, InMemoryOfferingStore};
/// use student_portal_core::environment::Clock;
///
/// # tokio_test::block_on(async {
/// let clock = test_clock();
/// let offering = OfferingBuilder::seminar(clock.now()).capacity(1).build();
/// let store = InMemoryOfferingStore::with_offerings([offering.clone()]);
/// let service = RegistrationService::new(Arc::new(store.clone()), Arc::new(clock));
///
/// let registration = service.register(offering.id, registrant("ani")).await.unwrap();
/// assert_eq!(registration.offering_id, offering.id);
/// assert_eq!(store.registration_count(offering.id), 1);
/// # });
/// ```
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn OfferingStore>,
    clock: Arc<dyn Clock>,
    config: RegistrationConfig,
}

impl RegistrationService {
    /// Create a service with the default configuration.
    #[must_use]
    pub fn new(store: Arc<dyn OfferingStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            config: RegistrationConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, mut config: RegistrationConfig) -> Self {
        config.retry.max_retries = config.retry.max_retries.min(1);
        self.config = config;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    /// Registers `request` for `offering_id`.
    ///
    /// Checks, in order: the request fields, that the offering exists, its
    /// administrative status, the registration window, remaining capacity,
    /// and that the email is not already registered. On success exactly one
    /// registration is recorded and the offering's count grows by one, with
    /// its status flipping to `full` in the same commit if that was the last
    /// place.
    ///
    /// A transient store failure is retried once with the same registration
    /// id. If the first commit had in fact gone through, even if it lands
    /// while the retry is running, the retry returns that registration
    /// instead of reporting a duplicate or a full offering.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::InvalidRegistrant`]: a field failed validation
    /// - [`RegistrationError::NotFound`]: no such offering
    /// - [`RegistrationError::OfferingUnavailable`]: cancelled, completed or inactive
    /// - [`RegistrationError::OutsideRegistrationWindow`]: too early or too late
    /// - [`RegistrationError::CapacityExceeded`]: no places left
    /// - [`RegistrationError::AlreadyRegistered`]: the email already holds a place
    /// - [`RegistrationError::TransientStoreError`]: the store failed twice
    /// - [`RegistrationError::ConstraintViolation`]: unexpected store rejection
    #[tracing::instrument(skip(self, request), fields(offering_id = %offering_id), name = "register")]
    pub async fn register(
        &self,
        offering_id: OfferingId,
        request: NewRegistration,
    ) -> Result<Registration> {
        RegistrationMetrics::record_attempt();
        let started = Instant::now();

        let result = self.register_with_retry(offering_id, &request).await;

        RegistrationMetrics::record_outcome(&result, started.elapsed());
        match &result {
            Ok(registration) => tracing::info!(
                registration_id = %registration.id,
                "Registration committed"
            ),
            Err(err) if err.is_rejection() => tracing::debug!(
                code = err.code(),
                error = %err,
                "Registration rejected"
            ),
            Err(err) => tracing::error!(
                code = err.code(),
                error = %err,
                "Registration failed"
            ),
        }

        result
    }

    async fn register_with_retry(
        &self,
        offering_id: OfferingId,
        request: &NewRegistration,
    ) -> Result<Registration> {
        request.validate()?;

        let registration_id = RegistrationId::new();
        let identity = request.registrant.identity_key();
        let mut attempt = 0usize;

        retry_with_predicate(
            self.config.retry.clone(),
            || {
                let resumed = attempt > 0;
                attempt += 1;
                self.attempt(offering_id, registration_id, &identity, request, resumed)
            },
            RegistrationError::is_retryable,
        )
        .await
    }

    async fn attempt(
        &self,
        offering_id: OfferingId,
        registration_id: RegistrationId,
        identity: &IdentityKey,
        request: &NewRegistration,
        resumed: bool,
    ) -> Result<Registration> {
        if !resumed {
            return self
                .try_register(offering_id, registration_id, identity, request)
                .await;
        }

        // A retry first asks whether the previous attempt actually landed.
        if let Some(existing) = self
            .own_registration(offering_id, registration_id, identity)
            .await?
        {
            tracing::info!("Previous attempt had committed; acknowledgement was lost");
            return Ok(existing);
        }

        // The previous commit may still land while this attempt runs, and
        // then shows up here as a full offering or a taken identity.
        match self
            .try_register(offering_id, registration_id, identity, request)
            .await
        {
            Ok(registration) => Ok(registration),
            Err(err) => match self
                .own_registration(offering_id, registration_id, identity)
                .await
            {
                Ok(Some(existing)) => {
                    tracing::info!(
                        error = %err,
                        "Previous attempt committed late; acknowledgement was lost"
                    );
                    Ok(existing)
                }
                _ => Err(err),
            },
        }
    }

    async fn try_register(
        &self,
        offering_id: OfferingId,
        registration_id: RegistrationId,
        identity: &IdentityKey,
        request: &NewRegistration,
    ) -> Result<Registration> {
        let offering = self
            .bounded(self.store.fetch_offering(offering_id))
            .await?
            .ok_or(RegistrationError::NotFound)?;

        let now = self.clock.now();
        offering.check_admission(now)?;

        if self
            .bounded(self.store.find_registration(offering_id, identity.clone()))
            .await?
            .is_some()
        {
            return Err(RegistrationError::AlreadyRegistered);
        }

        let registration = Registration::pending(registration_id, offering_id, request, now);
        let committed = self
            .bounded(self.store.commit_registration(registration.clone(), now))
            .await?;

        tracing::debug!(
            current_participants = committed.current_participants,
            max_participants = ?committed.max_participants,
            status = committed.status.as_str(),
            "Offering updated"
        );
        Ok(registration)
    }

    async fn own_registration(
        &self,
        offering_id: OfferingId,
        registration_id: RegistrationId,
        identity: &IdentityKey,
    ) -> Result<Option<Registration>> {
        let existing = self
            .bounded(self.store.find_registration(offering_id, identity.clone()))
            .await?;
        Ok(existing.filter(|r| r.id == registration_id))
    }

    async fn bounded<T>(&self, call: StoreFuture<'_, T>) -> Result<T> {
        match self.config.store_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                RegistrationError::TransientStoreError(format!(
                    "store call timed out after {}ms",
                    limit.as_millis()
                ))
            })?,
            None => call.await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use student_portal_core::{OfferingStatus, UnavailableReason, WindowViolation};
    use student_portal_testing::fixtures::{OfferingBuilder, registrant};
    use student_portal_testing::{InMemoryOfferingStore, test_clock};

    fn fast_retry() -> RegistrationConfig {
        RegistrationConfig {
            retry: RetryPolicy::builder()
                .initial_delay(Duration::from_millis(1))
                .build(),
            store_timeout: Some(Duration::from_secs(1)),
        }
    }

    fn service(store: &InMemoryOfferingStore) -> RegistrationService {
        RegistrationService::new(Arc::new(store.clone()), Arc::new(test_clock()))
            .with_config(fast_retry())
    }

    #[tokio::test]
    async fn happy_path_records_registration_and_counts_it() {
        let now = test_clock().now();
        let offering = OfferingBuilder::internship(now).capacity(10).current(3).build();
        let store = InMemoryOfferingStore::with_offerings([offering.clone()]);

        let registration = service(&store)
            .register(offering.id, registrant("budi"))
            .await
            .unwrap();

        assert_eq!(registration.registrant.email, "budi@example.com");
        assert_eq!(registration.registered_at, now);
        let stored = store.offering(offering.id).unwrap();
        assert_eq!(stored.current_participants, 4);
        assert_eq!(stored.status, OfferingStatus::Available);
    }

    #[tokio::test]
    async fn last_place_flips_status_to_full() {
        let now = test_clock().now();
        let offering = OfferingBuilder::seminar(now).capacity(2).current(1).build();
        let store = InMemoryOfferingStore::with_offerings([offering.clone()]);

        service(&store)
            .register(offering.id, registrant("citra"))
            .await
            .unwrap();

        let stored = store.offering(offering.id).unwrap();
        assert_eq!(stored.current_participants, 2);
        assert_eq!(stored.status, OfferingStatus::Full);
    }

    #[tokio::test]
    async fn invalid_request_is_rejected_before_any_store_access() {
        let store = InMemoryOfferingStore::new();
        let mut request = registrant("dewi");
        request.registrant.email = "not-an-email".to_string();

        let result = service(&store).register(OfferingId::new(), request).await;

        assert!(matches!(
            result,
            Err(RegistrationError::InvalidRegistrant { field: "email", .. })
        ));
        assert_eq!(store.commit_attempts(), 0);
    }

    #[tokio::test]
    async fn unknown_offering_is_not_found() {
        let store = InMemoryOfferingStore::new();

        let result = service(&store)
            .register(OfferingId::new(), registrant("eko"))
            .await;

        assert_eq!(result, Err(RegistrationError::NotFound));
    }

    #[tokio::test]
    async fn administrative_status_blocks_registration() {
        let now = test_clock().now();
        for (status, reason) in [
            (OfferingStatus::Cancelled, UnavailableReason::Cancelled),
            (OfferingStatus::Completed, UnavailableReason::Completed),
            (OfferingStatus::Inactive, UnavailableReason::Inactive),
        ] {
            let offering = OfferingBuilder::tryout(now).status(status).build();
            let store = InMemoryOfferingStore::with_offerings([offering.clone()]);

            let result = service(&store).register(offering.id, registrant("fajar")).await;

            assert_eq!(result, Err(RegistrationError::OfferingUnavailable(reason)));
            assert_eq!(store.registration_count(offering.id), 0);
        }
    }

    #[tokio::test]
    async fn window_is_enforced_on_both_sides() {
        let now = test_clock().now();
        let upcoming = OfferingBuilder::seminar(now)
            .window(now + ChronoDuration::hours(1), now + ChronoDuration::days(2))
            .build();
        let ended = OfferingBuilder::seminar(now)
            .window(now - ChronoDuration::days(2), now - ChronoDuration::seconds(1))
            .build();
        let past_deadline = OfferingBuilder::seminar(now)
            .deadline(now - ChronoDuration::minutes(5))
            .build();
        let store = InMemoryOfferingStore::with_offerings([
            upcoming.clone(),
            ended.clone(),
            past_deadline.clone(),
        ]);
        let service = service(&store);

        assert_eq!(
            service.register(upcoming.id, registrant("gita")).await,
            Err(RegistrationError::OutsideRegistrationWindow(
                WindowViolation::NotYetOpen
            ))
        );
        assert_eq!(
            service.register(ended.id, registrant("gita")).await,
            Err(RegistrationError::OutsideRegistrationWindow(
                WindowViolation::Closed
            ))
        );
        assert_eq!(
            service.register(past_deadline.id, registrant("gita")).await,
            Err(RegistrationError::OutsideRegistrationWindow(
                WindowViolation::Closed
            ))
        );
        assert_eq!(store.commit_attempts(), 0);
    }

    #[tokio::test]
    async fn window_bounds_are_inclusive() {
        let now = test_clock().now();
        let opens_now = OfferingBuilder::seminar(now)
            .window(now, now + ChronoDuration::days(1))
            .build();
        let closes_now = OfferingBuilder::seminar(now)
            .window(now - ChronoDuration::days(1), now)
            .build();
        let store = InMemoryOfferingStore::with_offerings([opens_now.clone(), closes_now.clone()]);
        let service = service(&store);

        assert!(service.register(opens_now.id, registrant("hadi")).await.is_ok());
        assert!(service.register(closes_now.id, registrant("hadi")).await.is_ok());
    }

    #[tokio::test]
    async fn full_offering_is_rejected() {
        let now = test_clock().now();
        let offering = OfferingBuilder::tryout(now).capacity(3).current(3).build();
        let store = InMemoryOfferingStore::with_offerings([offering.clone()]);

        let result = service(&store).register(offering.id, registrant("indra")).await;

        assert_eq!(result, Err(RegistrationError::CapacityExceeded));
        assert_eq!(store.offering(offering.id).unwrap().current_participants, 3);
    }

    #[tokio::test]
    async fn unbounded_offering_never_fills() {
        let now = test_clock().now();
        let offering = OfferingBuilder::seminar(now).unbounded().current(500).build();
        let store = InMemoryOfferingStore::with_offerings([offering.clone()]);

        service(&store)
            .register(offering.id, registrant("joko"))
            .await
            .unwrap();

        let stored = store.offering(offering.id).unwrap();
        assert_eq!(stored.current_participants, 501);
        assert_eq!(stored.status, OfferingStatus::Available);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_regardless_of_case() {
        let now = test_clock().now();
        let offering = OfferingBuilder::internship(now).capacity(10).build();
        let store = InMemoryOfferingStore::with_offerings([offering.clone()]);
        let service = service(&store);

        service.register(offering.id, registrant("kiki")).await.unwrap();

        let mut again = registrant("kiki");
        again.registrant.email = "  KIKI@Example.com ".to_string();
        again.registrant.name = "Someone Else".to_string();
        let result = service.register(offering.id, again).await;

        assert_eq!(result, Err(RegistrationError::AlreadyRegistered));
        assert_eq!(store.offering(offering.id).unwrap().current_participants, 1);
        assert_eq!(store.registration_count(offering.id), 1);
    }

    #[tokio::test]
    async fn race_for_last_place_admits_exactly_one() {
        let now = test_clock().now();
        let offering = OfferingBuilder::seminar(now).capacity(1).build();
        let store = InMemoryOfferingStore::with_offerings([offering.clone()]);
        // Both requests read the offering before either commits.
        store.set_read_delay(Duration::from_millis(20));
        let service = service(&store);

        let (a, b) = tokio::join!(
            service.register(offering.id, registrant("lina")),
            service.register(offering.id, registrant("maya")),
        );

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .any(|r| *r == Err(RegistrationError::CapacityExceeded))
        );
        let stored = store.offering(offering.id).unwrap();
        assert_eq!(stored.current_participants, 1);
        assert_eq!(stored.status, OfferingStatus::Full);
        assert_eq!(store.commit_attempts(), 2);
    }

    #[tokio::test]
    async fn concurrent_duplicates_admit_one() {
        let now = test_clock().now();
        let offering = OfferingBuilder::seminar(now).capacity(10).build();
        let store = InMemoryOfferingStore::with_offerings([offering.clone()]);
        store.set_read_delay(Duration::from_millis(20));
        let service = service(&store);

        let (a, b) = tokio::join!(
            service.register(offering.id, registrant("nina")),
            service.register(offering.id, registrant("nina")),
        );

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .any(|r| *r == Err(RegistrationError::AlreadyRegistered))
        );
        assert_eq!(store.offering(offering.id).unwrap().current_participants, 1);
    }

    #[tokio::test]
    async fn transient_failure_is_retried_once() {
        let now = test_clock().now();
        let offering = OfferingBuilder::seminar(now).build();
        let store = InMemoryOfferingStore::with_offerings([offering.clone()]);
        store.fail_next_commits(1);

        let result = service(&store).register(offering.id, registrant("oka")).await;

        assert!(result.is_ok());
        assert_eq!(store.commit_attempts(), 2);
        assert_eq!(store.registration_count(offering.id), 1);
    }

    #[tokio::test]
    async fn second_transient_failure_is_surfaced() {
        let now = test_clock().now();
        let offering = OfferingBuilder::seminar(now).build();
        let store = InMemoryOfferingStore::with_offerings([offering.clone()]);
        store.fail_next_commits(2);

        let result = service(&store).register(offering.id, registrant("putri")).await;

        assert!(matches!(result, Err(RegistrationError::TransientStoreError(_))));
        assert_eq!(store.commit_attempts(), 2);
        assert_eq!(store.registration_count(offering.id), 0);
    }

    #[tokio::test]
    async fn lost_acknowledgement_resolves_to_success() {
        let now = test_clock().now();
        let offering = OfferingBuilder::seminar(now).capacity(1).build();
        let store = InMemoryOfferingStore::with_offerings([offering.clone()]);
        store.lose_next_commit_acks(1);

        let registration = service(&store)
            .register(offering.id, registrant("rina"))
            .await
            .unwrap();

        assert_eq!(store.commit_attempts(), 1);
        assert_eq!(store.registration_count(offering.id), 1);
        let stored = store.offering(offering.id).unwrap();
        assert_eq!(stored.current_participants, 1);
        assert_eq!(stored.status, OfferingStatus::Full);
        assert_eq!(registration.registrant.email, "rina@example.com");
    }

    /// Reports the first commit as a transient failure and applies it only
    /// after the next identity lookup, as when an acknowledgement is lost
    /// while the commit is still in flight.
    struct LateCommitStore {
        inner: InMemoryOfferingStore,
        in_flight: std::sync::Mutex<Option<(Registration, chrono::DateTime<chrono::Utc>)>>,
        delayed: std::sync::atomic::AtomicBool,
    }

    impl LateCommitStore {
        fn new(inner: InMemoryOfferingStore) -> Self {
            Self {
                inner,
                in_flight: std::sync::Mutex::new(None),
                delayed: std::sync::atomic::AtomicBool::new(false),
            }
        }
    }

    impl OfferingStore for LateCommitStore {
        fn fetch_offering(
            &self,
            id: OfferingId,
        ) -> StoreFuture<'_, Option<student_portal_core::Offering>> {
            self.inner.fetch_offering(id)
        }

        fn find_registration(
            &self,
            offering_id: OfferingId,
            identity: IdentityKey,
        ) -> StoreFuture<'_, Option<Registration>> {
            Box::pin(async move {
                let found = self.inner.find_registration(offering_id, identity).await?;
                let landing = self.in_flight.lock().unwrap().take();
                if let Some((registration, now)) = landing {
                    self.inner.commit_registration(registration, now).await?;
                }
                Ok(found)
            })
        }

        fn list_offerings(
            &self,
            filter: student_portal_core::OfferingFilter,
        ) -> StoreFuture<'_, Vec<student_portal_core::Offering>> {
            self.inner.list_offerings(filter)
        }

        fn list_registrations(&self, offering_id: OfferingId) -> StoreFuture<'_, Vec<Registration>> {
            self.inner.list_registrations(offering_id)
        }

        fn list_all_registrations(
            &self,
            kind: Option<student_portal_core::OfferingKind>,
        ) -> StoreFuture<'_, Vec<student_portal_core::RegistrationEntry>> {
            self.inner.list_all_registrations(kind)
        }

        fn commit_registration(
            &self,
            registration: Registration,
            now: chrono::DateTime<chrono::Utc>,
        ) -> StoreFuture<'_, student_portal_core::Offering> {
            if self.delayed.swap(true, std::sync::atomic::Ordering::SeqCst) {
                return self.inner.commit_registration(registration, now);
            }
            *self.in_flight.lock().unwrap() = Some((registration, now));
            Box::pin(async {
                Err(RegistrationError::TransientStoreError(
                    "connection reset during commit".to_string(),
                ))
            })
        }

        fn ping(&self) -> StoreFuture<'_, ()> {
            self.inner.ping()
        }
    }

    #[tokio::test]
    async fn commit_landing_after_the_retry_lookup_resolves_to_success() {
        let now = test_clock().now();
        let offering = OfferingBuilder::seminar(now).capacity(1).build();
        let inner = InMemoryOfferingStore::with_offerings([offering.clone()]);
        let service = RegistrationService::new(
            Arc::new(LateCommitStore::new(inner.clone())),
            Arc::new(test_clock()),
        )
        .with_config(fast_retry());

        let registration = service
            .register(offering.id, registrant("wulan"))
            .await
            .expect("late commit is the caller's own registration");

        assert_eq!(registration.registrant.email, "wulan@example.com");
        assert_eq!(inner.registration_count(offering.id), 1);
        assert_eq!(inner.commit_attempts(), 1);
        let stored = inner.offering(offering.id).unwrap();
        assert_eq!(stored.current_participants, 1);
        assert_eq!(stored.status, OfferingStatus::Full);
    }

    #[tokio::test]
    async fn late_commit_does_not_mask_a_real_rejection_on_retry() {
        let now = test_clock().now();
        let offering = OfferingBuilder::seminar(now).capacity(1).build();
        let store = InMemoryOfferingStore::with_offerings([offering.clone()]);
        store.fail_next_commits(1);
        let service = service(&store);

        // The other request takes the last place while the first one waits
        // to retry; the retry's rejection stands.
        let (first, second) = tokio::join!(
            service.register(offering.id, registrant("xena")),
            service.register(offering.id, registrant("yusuf")),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .any(|r| *r == Err(RegistrationError::CapacityExceeded))
        );
        assert_eq!(store.registration_count(offering.id), 1);
    }

    #[tokio::test]
    async fn rejections_are_not_retried() {
        let now = test_clock().now();
        let offering = OfferingBuilder::seminar(now).capacity(1).build();
        let store = InMemoryOfferingStore::with_offerings([offering.clone()]);
        store.set_read_delay(Duration::from_millis(20));
        let service = service(&store);

        let (_first, _second) = tokio::join!(
            service.register(offering.id, registrant("sari")),
            service.register(offering.id, registrant("tono")),
        );

        // One commit each; the loser's CapacityExceeded was final.
        assert_eq!(store.commit_attempts(), 2);
    }

    #[tokio::test]
    async fn slow_store_times_out_as_transient() {
        let now = test_clock().now();
        let offering = OfferingBuilder::seminar(now).build();
        let store = InMemoryOfferingStore::with_offerings([offering.clone()]);
        store.set_read_delay(Duration::from_millis(200));
        let service = RegistrationService::new(Arc::new(store.clone()), Arc::new(test_clock()))
            .with_config(RegistrationConfig {
                retry: RetryPolicy::none(),
                store_timeout: Some(Duration::from_millis(10)),
            });

        let result = service.register(offering.id, registrant("umar")).await;

        assert!(matches!(result, Err(RegistrationError::TransientStoreError(_))));
        assert_eq!(store.commit_attempts(), 0);
    }

    #[test]
    fn retries_are_clamped_to_one() {
        let store = InMemoryOfferingStore::new();
        let service = RegistrationService::new(Arc::new(store), Arc::new(test_clock()))
            .with_config(RegistrationConfig {
                retry: RetryPolicy::builder().max_retries(5).build(),
                store_timeout: None,
            });

        assert_eq!(service.config().retry.max_retries, 1);
    }
}
