//! Registrations and registrant input.
//!
//! A [`Registration`] is one registrant's enrollment in one offering. The
//! registrant's identity for duplicate detection is their normalized email
//! address ([`IdentityKey`]); phone numbers are collected but not used as
//! identity.

use crate::error::RegistrationError;
use crate::offering::{OfferingId, OfferingKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Longest accepted motivation text, in characters.
pub const MAX_MOTIVATION_CHARS: usize = 1000;

/// Longest accepted name, email or class name, in characters.
pub const MAX_FIELD_CHARS: usize = 255;

/// Unique identifier for a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(Uuid);

impl RegistrationId {
    /// Creates a new random registration ID.
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

impl Default for RegistrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized email used as the per-offering uniqueness key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Derives the key from a raw email: trimmed and lower-cased.
    #[must_use]
    pub fn from_email(email: &str) -> Self {
        Self(email.trim().to_lowercase())
    }

    /// The normalized email.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contact details a student submits with the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registrant {
    /// Full name.
    pub name: String,
    /// Email address; also the identity key.
    pub email: String,
    /// Phone / WhatsApp number.
    pub phone: String,
    /// School class, e.g. "XII IPA 2".
    pub class_name: String,
}

impl Registrant {
    /// Identity key for duplicate detection.
    #[must_use]
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::from_email(&self.email)
    }

    /// Validates the form fields.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::InvalidRegistrant`] naming the first
    /// offending field.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("phone", &self.phone)?;
        require("class_name", &self.class_name)?;

        if !is_plausible_email(self.email.trim()) {
            return Err(RegistrationError::InvalidRegistrant {
                field: "email",
                reason: "must be a valid email address",
            });
        }
        if !is_plausible_phone(self.phone.trim()) {
            return Err(RegistrationError::InvalidRegistrant {
                field: "phone",
                reason: "must contain 8 to 15 digits",
            });
        }
        Ok(())
    }

    /// Copy with surrounding whitespace removed and the email normalized.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.identity_key().0,
            phone: self.phone.trim().to_string(),
            class_name: self.class_name.trim().to_string(),
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), RegistrationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RegistrationError::InvalidRegistrant {
            field,
            reason: "is required",
        });
    }
    if value.chars().count() > MAX_FIELD_CHARS {
        return Err(RegistrationError::InvalidRegistrant {
            field,
            reason: "is too long",
        });
    }
    Ok(())
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .rsplit_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2)
}

fn is_plausible_phone(phone: &str) -> bool {
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    if !rest
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return false;
    }
    let digits = rest.chars().filter(char::is_ascii_digit).count();
    (8..=15).contains(&digits)
}

/// A registration request as submitted: who, plus optional motivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRegistration {
    /// Who is registering.
    #[serde(flatten)]
    pub registrant: Registrant,
    /// Free-text reason for joining or note to the organizer.
    #[serde(default)]
    pub motivation: Option<String>,
}

impl NewRegistration {
    /// Validates registrant fields and motivation length.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::InvalidRegistrant`].
    pub fn validate(&self) -> Result<(), RegistrationError> {
        self.registrant.validate()?;
        if self
            .motivation
            .as_deref()
            .is_some_and(|m| m.chars().count() > MAX_MOTIVATION_CHARS)
        {
            return Err(RegistrationError::InvalidRegistrant {
                field: "motivation",
                reason: "is too long",
            });
        }
        Ok(())
    }
}

/// Moderation state of a registration. Always `Pending` when created here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Awaiting review.
    Pending,
    /// Accepted by the organizer.
    Approved,
    /// Declined by the organizer.
    Rejected,
    /// Participation finished.
    Completed,
}

impl RegistrationStatus {
    /// Database string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for RegistrationStatus {
    type Err = RegistrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "completed" => Ok(Self::Completed),
            other => Err(RegistrationError::ConstraintViolation(format!(
                "unknown registration status: {other}"
            ))),
        }
    }
}

/// A recorded enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Identifier.
    pub id: RegistrationId,
    /// The offering joined.
    pub offering_id: OfferingId,
    /// Contact details, normalized.
    pub registrant: Registrant,
    /// Optional free-text motivation.
    pub motivation: Option<String>,
    /// Moderation state.
    pub status: RegistrationStatus,
    /// When the registration was committed.
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    /// Builds the record to insert for `request`, normalizing contact fields
    /// and trimming an empty motivation away.
    #[must_use]
    pub fn pending(
        id: RegistrationId,
        offering_id: OfferingId,
        request: &NewRegistration,
        registered_at: DateTime<Utc>,
    ) -> Self {
        let motivation = request
            .motivation
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(ToString::to_string);

        Self {
            id,
            offering_id,
            registrant: request.registrant.normalized(),
            motivation,
            status: RegistrationStatus::Pending,
            registered_at,
        }
    }

    /// Identity key of the registrant.
    #[must_use]
    pub fn identity_key(&self) -> IdentityKey {
        self.registrant.identity_key()
    }
}

/// A registration listed across offerings, with the offering it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationEntry {
    /// The registration itself.
    #[serde(flatten)]
    pub registration: Registration,
    /// Title of the offering joined.
    pub offering_title: String,
    /// Kind of the offering joined.
    pub offering_kind: OfferingKind,
}
