//! # Flight Booking Core
//!
//! Core traits and types shared by every crate in the flight booking workspace.
//!
//! This crate provides the abstractions that higher-level services depend on,
//! so that concrete implementations can be swapped without touching business
//! logic:
//!
//! - **Environment**: injected dependencies (`Clock`, `IdGenerator`)
//! - **Repository**: generic keyed storage for entities
//!
//! ## Architecture Principles
//!
//! - Dependency Injection via traits
//! - Explicit errors (no panics in library code)
//! - No global state
//!
//! ## Example
//!
//! ```
//! use flight_booking_core::environment::{IdGenerator, PrefixedIdGenerator};
//! use flight_booking_core::repository::{InMemoryRepository, Repository};
//!
//! # fn example() -> Result<(), flight_booking_core::repository::RepositoryError> {
//! let ids = PrefixedIdGenerator::new("BK");
//! let repo: InMemoryRepository<String, u32> = InMemoryRepository::new();
//!
//! let id = ids.next_id();
//! repo.add(id.clone(), 42)?;
//! assert_eq!(repo.get(&id)?, Some(42));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod repository;

/// Environment module - Dependency injection traits
///
/// All external dependencies that make code non-deterministic (time, identifier
/// generation) are abstracted behind traits and injected into services.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use flight_booking_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Generates unique identifiers for newly created entities.
    pub trait IdGenerator: Send + Sync {
        /// Produce the next identifier. Every call returns a fresh value.
        fn next_id(&self) -> String;
    }

    /// Random identifiers of the form `PREFIX-1A2B3C4D`.
    ///
    /// The suffix is the first eight hex digits of a v4 UUID, upper-cased.
    #[derive(Debug, Clone)]
    pub struct PrefixedIdGenerator {
        prefix: String,
    }

    impl PrefixedIdGenerator {
        /// Creates a generator that prepends `prefix` to every identifier
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
            }
        }

        /// Returns the configured prefix
        #[must_use]
        pub fn prefix(&self) -> &str {
            &self.prefix
        }
    }

    impl IdGenerator for PrefixedIdGenerator {
        fn next_id(&self) -> String {
            let uuid = uuid::Uuid::new_v4().simple().to_string();
            format!("{}-{}", self.prefix, uuid[..8].to_uppercase())
        }
    }
}
