//! Repository trait and related types for keyed entity storage.
//!
//! This module defines the storage abstraction that orchestration services
//! depend on. Entities are opaque values to a repository: it never inspects
//! them, it only stores, replaces and hands out copies keyed by an identifier.
//!
//! # Design
//!
//! The `Repository` trait is deliberately minimal:
//!
//! - `add` inserts a new entity and rejects duplicate keys
//! - `get` / `get_all` return owned copies (the repository keeps the authoritative value)
//! - `update` / `delete` require the key to exist
//!
//! Because `get` returns a copy, callers must `update` after mutating an
//! entity for the change to become visible to anyone else.
//!
//! # Implementations
//!
//! - [`InMemoryRepository`]: `BTreeMap` guarded by an `RwLock`, iterated in key order
//! - `FailingRepository` (in `flight-booking-testing` crate): error injection for tests

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::RwLock;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// An entity with the same key is already stored.
    #[error("Entity with ID '{0}' already exists")]
    AlreadyExists(String),

    /// No entity is stored under the given key.
    #[error("Entity with ID '{0}' not found")]
    NotFound(String),

    /// The underlying storage failed (e.g. a poisoned lock).
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Generic keyed store for entities.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single repository can be shared
/// between services through `Arc<dyn Repository<K, V>>`.
///
/// # Dyn Compatibility
///
/// All methods take `&self` and concrete argument types, so the trait can be
/// used as a trait object.
pub trait Repository<K, V>: Send + Sync {
    /// Store a new entity under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::AlreadyExists`] if `id` is already stored.
    fn add(&self, id: K, entity: V) -> Result<()>;

    /// Return a copy of the entity stored under `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the backing store is unavailable.
    fn get(&self, id: &K) -> Result<Option<V>>;

    /// Return copies of every stored entity.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the backing store is unavailable.
    fn get_all(&self) -> Result<Vec<V>>;

    /// Replace the entity stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if `id` is not stored.
    fn update(&self, id: &K, entity: V) -> Result<()>;

    /// Remove the entity stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if `id` is not stored.
    fn delete(&self, id: &K) -> Result<()>;

    /// Check whether an entity is stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the backing store is unavailable.
    fn exists(&self, id: &K) -> Result<bool>;

    /// Number of stored entities.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the backing store is unavailable.
    fn count(&self) -> Result<usize>;
}

/// In-memory repository backed by a `BTreeMap`.
///
/// `get_all` yields entities ordered by key, which keeps listings and
/// searches deterministic.
///
/// # Example
///
/// ```
/// use flight_booking_core::repository::{InMemoryRepository, Repository, RepositoryError};
///
/// let repo = InMemoryRepository::new();
/// repo.add("FL100".to_string(), "New York -> Boston").unwrap();
///
/// assert!(repo.exists(&"FL100".to_string()).unwrap());
/// assert_eq!(
///     repo.add("FL100".to_string(), "duplicate"),
///     Err(RepositoryError::AlreadyExists("FL100".to_string()))
/// );
/// ```
#[derive(Debug)]
pub struct InMemoryRepository<K, V> {
    storage: RwLock<BTreeMap<K, V>>,
}

impl<K, V> InMemoryRepository<K, V>
where
    K: Ord,
{
    /// Create a new empty repository
    #[must_use]
    pub const fn new() -> Self {
        Self {
            storage: RwLock::new(BTreeMap::new()),
        }
    }

    /// Remove every entity (for test isolation).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the lock is poisoned.
    pub fn clear(&self) -> Result<()> {
        self.storage.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

impl<K, V> Default for InMemoryRepository<K, V>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Storage(format!("repository lock poisoned: {err}"))
}

impl<K, V> Repository<K, V> for InMemoryRepository<K, V>
where
    K: Ord + Clone + Display + Send + Sync,
    V: Clone + Send + Sync,
{
    fn add(&self, id: K, entity: V) -> Result<()> {
        let mut storage = self.storage.write().map_err(poisoned)?;
        if storage.contains_key(&id) {
            return Err(RepositoryError::AlreadyExists(id.to_string()));
        }
        storage.insert(id, entity);
        Ok(())
    }

    fn get(&self, id: &K) -> Result<Option<V>> {
        Ok(self.storage.read().map_err(poisoned)?.get(id).cloned())
    }

    fn get_all(&self) -> Result<Vec<V>> {
        Ok(self.storage.read().map_err(poisoned)?.values().cloned().collect())
    }

    fn update(&self, id: &K, entity: V) -> Result<()> {
        let mut storage = self.storage.write().map_err(poisoned)?;
        match storage.get_mut(id) {
            Some(slot) => {
                *slot = entity;
                Ok(())
            },
            None => Err(RepositoryError::NotFound(id.to_string())),
        }
    }

    fn delete(&self, id: &K) -> Result<()> {
        self.storage
            .write()
            .map_err(poisoned)?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    fn exists(&self, id: &K) -> Result<bool> {
        Ok(self.storage.read().map_err(poisoned)?.contains_key(id))
    }

    fn count(&self) -> Result<usize> {
        Ok(self.storage.read().map_err(poisoned)?.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn repo() -> InMemoryRepository<String, u32> {
        InMemoryRepository::new()
    }

    #[test]
    fn test_add_and_get() {
        let repo = repo();
        repo.add("a".to_string(), 1).unwrap();

        assert_eq!(repo.get(&"a".to_string()).unwrap(), Some(1));
        assert_eq!(repo.get(&"missing".to_string()).unwrap(), None);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_add_is_rejected() {
        let repo = repo();
        repo.add("a".to_string(), 1).unwrap();

        let result = repo.add("a".to_string(), 2);

        assert_eq!(result, Err(RepositoryError::AlreadyExists("a".to_string())));
        assert_eq!(repo.get(&"a".to_string()).unwrap(), Some(1));
    }

    #[test]
    fn test_update_requires_existing_key() {
        let repo = repo();
        assert_eq!(
            repo.update(&"a".to_string(), 5),
            Err(RepositoryError::NotFound("a".to_string()))
        );

        repo.add("a".to_string(), 1).unwrap();
        repo.update(&"a".to_string(), 5).unwrap();
        assert_eq!(repo.get(&"a".to_string()).unwrap(), Some(5));
    }

    #[test]
    fn test_delete_requires_existing_key() {
        let repo = repo();
        assert!(matches!(
            repo.delete(&"a".to_string()),
            Err(RepositoryError::NotFound(_))
        ));

        repo.add("a".to_string(), 1).unwrap();
        repo.delete(&"a".to_string()).unwrap();
        assert!(!repo.exists(&"a".to_string()).unwrap());
    }

    #[test]
    fn test_get_returns_copies() {
        let repo: InMemoryRepository<String, Vec<u32>> = InMemoryRepository::new();
        repo.add("a".to_string(), vec![1]).unwrap();

        let mut copy = repo.get(&"a".to_string()).unwrap().unwrap();
        copy.push(2);

        assert_eq!(repo.get(&"a".to_string()).unwrap(), Some(vec![1]));
    }

    #[test]
    fn test_get_all_is_ordered_by_key() {
        let repo = repo();
        repo.add("c".to_string(), 3).unwrap();
        repo.add("a".to_string(), 1).unwrap();
        repo.add("b".to_string(), 2).unwrap();

        assert_eq!(repo.get_all().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_clear() {
        let repo = repo();
        repo.add("a".to_string(), 1).unwrap();
        repo.clear().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_usable_as_trait_object() {
        let repo: Arc<dyn Repository<String, u32>> = Arc::new(repo());
        repo.add("a".to_string(), 1).unwrap();
        assert!(repo.exists(&"a".to_string()).unwrap());
    }

    proptest! {
        #[test]
        fn prop_count_matches_distinct_keys(keys in proptest::collection::vec("[a-z]{1,4}", 0..40)) {
            let repo = repo();
            let mut distinct = std::collections::BTreeSet::new();
            for (value, key) in keys.into_iter().enumerate() {
                let inserted = repo.add(key.clone(), u32::try_from(value).unwrap()).is_ok();
                prop_assert_eq!(inserted, distinct.insert(key));
            }
            prop_assert_eq!(repo.count().unwrap(), distinct.len());
        }
    }
}
