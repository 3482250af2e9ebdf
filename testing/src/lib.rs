//! # Flight Booking Testing
//!
//! Testing utilities and helpers for the flight booking workspace.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A repository with error injection for failure-path tests
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```
//! use flight_booking_core::environment::{Clock, IdGenerator};
//! use flight_booking_testing::{SequentialIdGenerator, test_clock};
//!
//! let clock = test_clock();
//! let ids = SequentialIdGenerator::new("BK");
//!
//! assert_eq!(clock.now(), clock.now());
//! assert_eq!(ids.next_id(), "BK-0001");
//! assert_eq!(ids.next_id(), "BK-0002");
//! ```

use chrono::{DateTime, Utc};
use flight_booking_core::environment::{Clock, IdGenerator};

pub mod repository_mocks;

/// Deterministic implementations of Environment traits.
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Returns the same time until explicitly advanced, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use flight_booking_testing::mocks::FixedClock;
    /// use flight_booking_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug)]
    pub struct FixedClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock forward by `duration`.
        pub fn advance(&self, duration: chrono::Duration) {
            if let Ok(mut time) = self.time.lock() {
                *time += duration;
            }
        }

        /// Set the clock to an absolute time.
        pub fn set(&self, new_time: DateTime<Utc>) {
            if let Ok(mut time) = self.time.lock() {
                *time = new_time;
            }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
                .lock()
                .map_or_else(|poisoned| *poisoned.into_inner(), |time| *time)
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

    /// Predictable identifiers: `PREFIX-0001`, `PREFIX-0002`, ...
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator starting at 1
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }

        /// Create a generator that hands out the same identifier every time.
        ///
        /// Useful for forcing duplicate-key failures in repository tests.
        #[must_use]
        pub fn repeating(prefix: impl Into<String>) -> RepeatingIdGenerator {
            RepeatingIdGenerator {
                id: format!("{}-0001", prefix.into()),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::Relaxed);
            format!("{}-{n:04}", self.prefix)
        }
    }

    /// Generator that always returns the same identifier.
    #[derive(Debug, Clone)]
    pub struct RepeatingIdGenerator {
        id: String,
    }

    impl IdGenerator for RepeatingIdGenerator {
        fn next_id(&self) -> String {
            self.id.clone()
        }
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;
    use proptest::sample::subsequence;

    /// Column letters of a six-abreast cabin.
    pub const CABIN_COLUMNS: &str = "ABCDEF";

    /// Every seat label of a cabin with `rows` rows and six columns, in row order.
    #[must_use]
    pub fn cabin_labels(rows: u32) -> Vec<String> {
        (1..=rows)
            .flat_map(|row| CABIN_COLUMNS.chars().map(move |col| format!("{row}{col}")))
            .collect()
    }

    /// Strategy producing a non-empty, duplicate-free seat pool drawn from a
    /// cabin of up to `max_rows` rows, preserving cabin order.
    pub fn seat_pool(max_rows: u32) -> impl Strategy<Value = Vec<String>> {
        (1..=max_rows.max(1)).prop_flat_map(|rows| {
            let labels = cabin_labels(rows);
            let len = labels.len();
            subsequence(labels, 1..=len)
        })
    }

    /// Strategy producing a seat pool together with a request size that may
    /// exceed it.
    pub fn seat_pool_and_request(max_rows: u32) -> impl Strategy<Value = (Vec<String>, usize)> {
        seat_pool(max_rows).prop_flat_map(|pool| {
            let len = pool.len();
            (Just(pool), 0..=len + 2)
        })
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, RepeatingIdGenerator, SequentialIdGenerator, test_clock};
pub use repository_mocks::FailingRepository;
