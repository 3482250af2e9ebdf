//! Repository test doubles.
//!
//! [`FailingRepository`] behaves like an [`InMemoryRepository`] until told to
//! fail, which lets service tests check that storage errors propagate
//! unchanged and that nothing is half-written.

use flight_booking_core::repository::{InMemoryRepository, Repository, RepositoryError, Result};
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory repository with switchable failure injection.
///
/// # Example
///
/// ```
/// use flight_booking_core::repository::{Repository, RepositoryError};
/// use flight_booking_testing::FailingRepository;
///
/// let repo: FailingRepository<String, u32> = FailingRepository::new();
/// repo.add("a".to_string(), 1).unwrap();
///
/// repo.fail_updates(true);
/// assert!(matches!(repo.update(&"a".to_string(), 2), Err(RepositoryError::Storage(_))));
/// assert_eq!(repo.get(&"a".to_string()).unwrap(), Some(1));
/// ```
#[derive(Debug)]
pub struct FailingRepository<K, V> {
    inner: InMemoryRepository<K, V>,
    fail_adds: AtomicBool,
    fail_updates: AtomicBool,
}

impl<K, V> FailingRepository<K, V>
where
    K: Ord,
{
    /// Create a repository that initially succeeds on every call
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: InMemoryRepository::new(),
            fail_adds: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
        }
    }

    /// Make subsequent `add` calls fail with a storage error
    pub fn fail_adds(&self, fail: bool) {
        self.fail_adds.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `update` calls fail with a storage error
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

impl<K, V> Default for FailingRepository<K, V>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Repository<K, V> for FailingRepository<K, V>
where
    K: Ord + Clone + Display + Send + Sync,
    V: Clone + Send + Sync,
{
    fn add(&self, id: K, entity: V) -> Result<()> {
        if self.fail_adds.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage(format!("injected add failure for '{id}'")));
        }
        self.inner.add(id, entity)
    }

    fn get(&self, id: &K) -> Result<Option<V>> {
        self.inner.get(id)
    }

    fn get_all(&self) -> Result<Vec<V>> {
        self.inner.get_all()
    }

    fn update(&self, id: &K, entity: V) -> Result<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage(format!("injected update failure for '{id}'")));
        }
        self.inner.update(id, entity)
    }

    fn delete(&self, id: &K) -> Result<()> {
        self.inner.delete(id)
    }

    fn exists(&self, id: &K) -> Result<bool> {
        self.inner.exists(id)
    }

    fn count(&self) -> Result<usize> {
        self.inner.count()
    }
}
