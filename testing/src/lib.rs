//! # Student Portal Testing
//!
//! Testing utilities for the student portal workspace.
//!
//! This crate provides:
//! - [`InMemoryOfferingStore`]: mutex-guarded store with fault injection
//! - [`FixedClock`]: deterministic time
//! - [`fixtures`]: offering builder and registrant helpers
//! - [`properties`]: proptest strategies for registrants
//!
//! ## Example
//!
//! ```
//! use student_portal_testing::{fixtures::{OfferingBuilder, registrant}, test_clock, InMemoryOfferingStore};
//! use student_portal_core::environment::Clock;
//!
//! let clock = test_clock();
//! let offering = OfferingBuilder::seminar(clock.now()).capacity(2).build();
//! let store = InMemoryOfferingStore::with_offerings([offering.clone()]);
//!
//! assert_eq!(store.offering(offering.id).map(|o| o.current_participants), Some(0));
//! let _request = registrant("siti");
//! ```

pub mod fixtures;
pub mod store_mocks;

use chrono::{DateTime, Utc};
use student_portal_core::environment::Clock;

/// Mock implementations of injected dependencies.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use student_portal_testing::mocks::FixedClock;
    /// use student_portal_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }

        /// A clock shifted by `delta` from this one.
        #[must_use]
        pub fn shifted(&self, delta: chrono::Duration) -> Self {
            Self::new(self.time + delta)
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;
    use student_portal_core::{NewRegistration, Registrant};

    /// Valid registration requests with distinct-looking emails.
    pub fn arb_new_registration() -> impl Strategy<Value = NewRegistration> {
        (
            "[A-Z][a-z]{2,10} [A-Z][a-z]{2,10}",
            "[a-z]{3,12}",
            "08[0-9]{9,11}",
            "(X|XI|XII) (IPA|IPS) [1-4]",
            proptest::option::of("[a-zA-Z ]{0,80}"),
        )
            .prop_map(|(name, local, phone, class_name, motivation)| NewRegistration {
                registrant: Registrant {
                    name,
                    email: format!("{local}@example.com"),
                    phone,
                    class_name,
                },
                motivation,
            })
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use store_mocks::InMemoryOfferingStore;
