//! Builders for offerings and registration requests.

use chrono::{DateTime, Duration, Utc};
use student_portal_core::{
    NewRegistration, Offering, OfferingId, OfferingKind, OfferingStatus, Registrant,
};

/// Fluent builder for [`Offering`] rows.
///
/// Defaults: capacity 10, nobody registered, status `available`, window
/// `[now - 1 day, now + 1 day]`, no separate deadline.
#[derive(Debug, Clone)]
pub struct OfferingBuilder {
    offering: Offering,
}

impl OfferingBuilder {
    /// Start from an offering of `kind` relative to `now`.
    #[must_use]
    pub fn new(kind: OfferingKind, now: DateTime<Utc>) -> Self {
        Self {
            offering: Offering {
                id: OfferingId::new(),
                kind,
                title: format!("{} offering", kind.as_str()),
                description: String::new(),
                category: None,
                max_participants: Some(10),
                current_participants: 0,
                start_date: Some(now - Duration::days(1)),
                end_date: Some(now + Duration::days(1)),
                registration_deadline: None,
                status: OfferingStatus::Available,
                created_at: now - Duration::days(7),
                updated_at: now - Duration::days(7),
            },
        }
    }

    /// Internship defaults.
    #[must_use]
    pub fn internship(now: DateTime<Utc>) -> Self {
        Self::new(OfferingKind::Internship, now)
    }

    /// Seminar defaults.
    #[must_use]
    pub fn seminar(now: DateTime<Utc>) -> Self {
        Self::new(OfferingKind::Seminar, now)
    }

    /// Try-out defaults.
    #[must_use]
    pub fn tryout(now: DateTime<Utc>) -> Self {
        Self::new(OfferingKind::Tryout, now)
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.offering.title = title.into();
        self
    }

    /// Set the category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.offering.category = Some(category.into());
        self
    }

    /// Bound capacity at `max`.
    #[must_use]
    pub fn capacity(mut self, max: u32) -> Self {
        self.offering.max_participants = Some(max);
        self
    }

    /// Remove the capacity bound.
    #[must_use]
    pub fn unbounded(mut self) -> Self {
        self.offering.max_participants = None;
        self
    }

    /// Pretend `current` people already registered.
    ///
    /// Also recomputes the stored status, as a committed row would carry.
    #[must_use]
    pub fn current(mut self, current: u32) -> Self {
        self.offering.current_participants = current;
        self.offering.status = self.offering.derived_status();
        self
    }

    /// Set the registration window.
    #[must_use]
    pub fn window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.offering.start_date = Some(start);
        self.offering.end_date = Some(end);
        self
    }

    /// Remove the window entirely.
    #[must_use]
    pub fn no_window(mut self) -> Self {
        self.offering.start_date = None;
        self.offering.end_date = None;
        self
    }

    /// Set a registration deadline independent of the end date.
    #[must_use]
    pub fn deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.offering.registration_deadline = Some(deadline);
        self
    }

    /// Set the stored status.
    #[must_use]
    pub fn status(mut self, status: OfferingStatus) -> Self {
        self.offering.status = status;
        self
    }

    /// Finish.
    #[must_use]
    pub fn build(self) -> Offering {
        self.offering
    }
}

/// A valid registration request whose identity is `{tag}@example.com`.
#[must_use]
pub fn registrant(tag: &str) -> NewRegistration {
    NewRegistration {
        registrant: Registrant {
            name: format!("Student {tag}"),
            email: format!("{tag}@example.com"),
            phone: "081234567890".to_string(),
            class_name: "XII IPA 1".to_string(),
        },
        motivation: None,
    }
}
