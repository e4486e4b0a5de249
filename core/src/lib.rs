//! # Student Portal Core
//!
//! Domain types for capacity-bounded registration: offerings (internships,
//! seminars, try-outs), registrations, the error taxonomy, and the store
//! trait that the registration service writes through.
//!
//! ## Core Concepts
//!
//! - **Offering**: an activity with an optional capacity and time window
//! - **Registration**: one registrant's enrollment in one offering, unique
//!   per normalized email
//! - **`OfferingStore`**: data-store seam whose single write is atomic
//! - **Clock**: injected time source
//!
//! ## Example
//!
//! ```
//! use student_portal_core::offering::{Offering, OfferingId, OfferingKind, OfferingStatus};
//! use student_portal_core::RegistrationError;
//! use chrono::Utc;
//!
//! let now = Utc::now();
//! let offering = Offering {
//!     id: OfferingId::new(),
//!     kind: OfferingKind::Seminar,
//!     title: "Study abroad".to_string(),
//!     description: String::new(),
//!     category: None,
//!     max_participants: Some(1),
//!     current_participants: 1,
//!     start_date: None,
//!     end_date: None,
//!     registration_deadline: None,
//!     status: OfferingStatus::Full,
//!     created_at: now,
//!     updated_at: now,
//! };
//!
//! assert_eq!(offering.check_admission(now), Err(RegistrationError::CapacityExceeded));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod environment;
pub mod error;
pub mod offering;
pub mod registration;
pub mod store;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use error::{RegistrationError, Result, UnavailableReason, WindowViolation};
pub use offering::{Availability, Offering, OfferingFilter, OfferingId, OfferingKind, OfferingStatus};
pub use registration::{
    IdentityKey, NewRegistration, Registrant, Registration, RegistrationEntry, RegistrationId,
    RegistrationStatus,
};
pub use store::{OfferingStore, StoreFuture};
