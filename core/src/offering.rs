//! Offerings: capacity- and time-bounded activities a student can join.
//!
//! An [`Offering`] generalizes the portal's internships, seminars and try-outs.
//! All admission rules that depend only on the offering row (administrative
//! status, time window, capacity) live here so that every store checks them
//! the same way, both on the fresh read and again under the row lock.

use crate::error::{RegistrationError, UnavailableReason, WindowViolation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for an offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferingId(Uuid);

impl OfferingId {
    /// Creates a new random offering ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OfferingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OfferingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What sort of activity an offering is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferingKind {
    /// Company internship placement.
    Internship,
    /// Talk or workshop with a speaker.
    Seminar,
    /// Practice exam.
    Tryout,
}

impl OfferingKind {
    /// Database string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Internship => "internship",
            Self::Seminar => "seminar",
            Self::Tryout => "tryout",
        }
    }
}

impl FromStr for OfferingKind {
    type Err = RegistrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "internship" => Ok(Self::Internship),
            "seminar" => Ok(Self::Seminar),
            "tryout" => Ok(Self::Tryout),
            other => Err(RegistrationError::ConstraintViolation(format!(
                "unknown offering kind: {other}"
            ))),
        }
    }
}

/// Stored status of an offering.
///
/// `Available` and `Full` are maintained by the registration commit;
/// the remaining states are set by the administrative process and are
/// terminal as far as registration is concerned.
///
/// ```text
/// available ──(capacity reached)──▶ full
///     │                               │
///     ├──(admin)──▶ cancelled         │
///     └──(window elapsed)──▶ completed ◀┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferingStatus {
    /// Open for registration.
    Available,
    /// Capacity reached.
    Full,
    /// Called off by an administrator.
    Cancelled,
    /// Already took place.
    Completed,
    /// Explicitly deactivated.
    Inactive,
}

impl OfferingStatus {
    /// Database string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Full => "full",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Inactive => "inactive",
        }
    }

    /// Returns the reason registration is refused, if this status refuses it
    /// regardless of counts.
    #[must_use]
    pub const fn unavailable_reason(&self) -> Option<UnavailableReason> {
        match self {
            Self::Cancelled => Some(UnavailableReason::Cancelled),
            Self::Completed => Some(UnavailableReason::Completed),
            Self::Inactive => Some(UnavailableReason::Inactive),
            Self::Available | Self::Full => None,
        }
    }
}

impl FromStr for OfferingStatus {
    type Err = RegistrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "full" => Ok(Self::Full),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            "inactive" => Ok(Self::Inactive),
            other => Err(RegistrationError::ConstraintViolation(format!(
                "unknown offering status: {other}"
            ))),
        }
    }
}

/// Display-oriented availability derived from status, window and counts.
///
/// Unlike [`OfferingStatus`], this is never stored. It is what a listing page
/// shows next to each offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Accepting registrations right now.
    Open,
    /// Registration window has not started.
    Upcoming,
    /// Registration window is over.
    Ended,
    /// No places left.
    Full,
    /// Called off.
    Cancelled,
    /// Already took place.
    Completed,
    /// Deactivated.
    Inactive,
}

/// A capacity- and time-bounded activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    /// Identifier.
    pub id: OfferingId,
    /// Internship, seminar or try-out.
    pub kind: OfferingKind,
    /// Title shown to students.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Optional grouping used by listing filters.
    pub category: Option<String>,
    /// Capacity; `None` means unbounded.
    pub max_participants: Option<u32>,
    /// Number of registrations recorded so far.
    pub current_participants: u32,
    /// Registration opens at this instant, when set.
    pub start_date: Option<DateTime<Utc>>,
    /// Registration closes after this instant, when set.
    pub end_date: Option<DateTime<Utc>>,
    /// Separate cut-off for sign-ups, independent of `end_date`.
    pub registration_deadline: Option<DateTime<Utc>>,
    /// Stored status.
    pub status: OfferingStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Offering {
    /// Whether the capacity limit has been reached.
    ///
    /// Always `false` for unbounded offerings.
    #[must_use]
    pub fn is_at_capacity(&self) -> bool {
        self.max_participants
            .is_some_and(|max| self.current_participants >= max)
    }

    /// Places left, or `None` when unbounded.
    #[must_use]
    pub fn remaining_places(&self) -> Option<u32> {
        self.max_participants
            .map(|max| max.saturating_sub(self.current_participants))
    }

    /// Checks the time window against `now`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::OutsideRegistrationWindow`] before
    /// `start_date`, after `end_date`, or after `registration_deadline`.
    pub fn check_window(&self, now: DateTime<Utc>) -> Result<(), RegistrationError> {
        if self.start_date.is_some_and(|start| now < start) {
            return Err(RegistrationError::OutsideRegistrationWindow(
                WindowViolation::NotYetOpen,
            ));
        }

        let closed = self.end_date.is_some_and(|end| now > end)
            || self.registration_deadline.is_some_and(|deadline| now > deadline);
        if closed {
            return Err(RegistrationError::OutsideRegistrationWindow(
                WindowViolation::Closed,
            ));
        }

        Ok(())
    }

    /// Runs admission checks 2–4 in order: administrative status, time
    /// window, capacity.
    ///
    /// Existence (check 1) and identity uniqueness (check 5) need the store
    /// and are not covered here.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::OfferingUnavailable`] for cancelled, completed
    ///   or inactive offerings
    /// - [`RegistrationError::OutsideRegistrationWindow`] outside the window
    /// - [`RegistrationError::CapacityExceeded`] when no places remain
    pub fn check_admission(&self, now: DateTime<Utc>) -> Result<(), RegistrationError> {
        if let Some(reason) = self.status.unavailable_reason() {
            return Err(RegistrationError::OfferingUnavailable(reason));
        }

        self.check_window(now)?;

        // Counters decide fullness, not the stored status.
        if self.is_at_capacity() {
            return Err(RegistrationError::CapacityExceeded);
        }

        Ok(())
    }

    /// Status the offering should carry given its counters.
    ///
    /// Administrative states are preserved; otherwise `full` iff capacity
    /// is reached.
    #[must_use]
    pub fn derived_status(&self) -> OfferingStatus {
        if self.status.unavailable_reason().is_some() {
            return self.status;
        }
        if self.is_at_capacity() {
            OfferingStatus::Full
        } else {
            OfferingStatus::Available
        }
    }

    /// Records one admitted registration: bumps the counter and recomputes
    /// the status in the same step.
    ///
    /// Callers must have run [`Offering::check_admission`] under the same
    /// lock; this only guards against counter overflow.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::CapacityExceeded`] if the counter is
    /// already at the limit.
    pub fn admit_one(&mut self, now: DateTime<Utc>) -> Result<(), RegistrationError> {
        if self.is_at_capacity() {
            return Err(RegistrationError::CapacityExceeded);
        }
        self.current_participants = self
            .current_participants
            .checked_add(1)
            .ok_or(RegistrationError::CapacityExceeded)?;
        self.status = self.derived_status();
        self.updated_at = now;
        Ok(())
    }

    /// Availability label for listings.
    #[must_use]
    pub fn availability(&self, now: DateTime<Utc>) -> Availability {
        match self.status {
            OfferingStatus::Inactive => return Availability::Inactive,
            OfferingStatus::Cancelled => return Availability::Cancelled,
            OfferingStatus::Completed => return Availability::Completed,
            OfferingStatus::Available | OfferingStatus::Full => {}
        }

        match self.check_window(now) {
            Err(RegistrationError::OutsideRegistrationWindow(WindowViolation::NotYetOpen)) => {
                Availability::Upcoming
            }
            Err(_) => Availability::Ended,
            Ok(()) if self.is_at_capacity() => Availability::Full,
            Ok(()) => Availability::Open,
        }
    }
}

/// Filter for listing offerings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferingFilter {
    /// Restrict to one kind.
    pub kind: Option<OfferingKind>,
    /// Restrict to one category (exact match).
    pub category: Option<String>,
    /// Include inactive offerings. Off by default, like the public listings.
    #[serde(default)]
    pub include_inactive: bool,
}

impl OfferingFilter {
    /// Whether `offering` passes this filter.
    #[must_use]
    pub fn matches(&self, offering: &Offering) -> bool {
        if self.kind.is_some_and(|kind| kind != offering.kind) {
            return false;
        }
        if let Some(category) = &self.category {
            if offering.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        self.include_inactive || offering.status != OfferingStatus::Inactive
    }
}
