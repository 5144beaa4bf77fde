//! Shared map-backed store with snapshot transactions
//!
//! Entities are kept in a `BTreeMap` keyed by their id string, so iteration
//! follows primary-key order. A transaction is a snapshot of the map taken at
//! `begin`; rolling back restores it. Savepoints are further snapshots.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use marquee_domain::pagination::{PaginationError, Paginator};
use marquee_domain::search::{PageRequest, SortOrder};
use marquee_domain::transaction::{TransactionError, TransactionManager};
use std::cmp::Ordering;
use tracing::debug;

/// The store lock was poisoned by a panicking writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoisonedStore;

impl std::fmt::Display for PoisonedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("in-memory store lock poisoned")
    }
}

struct State<T> {
    items: BTreeMap<String, T>,
    snapshot: Option<BTreeMap<String, T>>,
    savepoints: Vec<(String, BTreeMap<String, T>)>,
}

/// Cloneable handle on a shared map of entities
///
/// Clones share the same map and the same transaction state.
pub struct InMemoryStore<T> {
    state: Arc<Mutex<State<T>>>,
}

impl<T> Clone for InMemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                items: BTreeMap::new(),
                snapshot: None,
                savepoints: Vec::new(),
            })),
        }
    }
}

impl<T> InMemoryStore<T>
where
    T: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access to the map
    ///
    /// Check-then-write sequences inside one call are atomic.
    pub fn with_items<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, T>) -> R,
    ) -> Result<R, PoisonedStore> {
        let mut state = self.state.lock().map_err(|_| PoisonedStore)?;
        Ok(f(&mut state.items))
    }

    /// Every stored entity, in key order
    pub fn values(&self) -> Result<Vec<T>, PoisonedStore> {
        self.with_items(|items| items.values().cloned().collect())
    }

    fn with_transaction<R>(
        &self,
        f: impl FnOnce(&mut State<T>) -> Result<R, TransactionError>,
    ) -> Result<R, TransactionError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| TransactionError::backend(PoisonedStore.to_string()))?;
        f(&mut state)
    }

    fn begin_sync(&self) -> Result<(), TransactionError> {
        self.with_transaction(|state| {
            if state.snapshot.is_some() {
                return Err(TransactionError::AlreadyActive);
            }
            state.snapshot = Some(state.items.clone());
            debug!(items = state.items.len(), "Snapshot transaction opened");
            Ok(())
        })
    }

    fn commit_sync(&self) -> Result<(), TransactionError> {
        self.with_transaction(|state| {
            state.snapshot.take().ok_or(TransactionError::NotActive)?;
            state.savepoints.clear();
            debug!("Snapshot transaction committed");
            Ok(())
        })
    }

    fn rollback_sync(&self) -> Result<(), TransactionError> {
        self.with_transaction(|state| {
            state.items = state.snapshot.take().ok_or(TransactionError::NotActive)?;
            state.savepoints.clear();
            debug!("Snapshot transaction rolled back");
            Ok(())
        })
    }

    fn create_savepoint_sync(&self, name: &str) -> Result<(), TransactionError> {
        self.with_transaction(|state| {
            if state.snapshot.is_none() {
                return Err(TransactionError::NotActive);
            }
            state.savepoints.retain(|(existing, _)| existing != name);
            state.savepoints.push((name.to_string(), state.items.clone()));
            Ok(())
        })
    }

    fn release_savepoint_sync(&self, name: &str) -> Result<(), TransactionError> {
        self.with_transaction(|state| {
            if state.snapshot.is_none() {
                return Err(TransactionError::NotActive);
            }
            if let Some(position) = state.savepoints.iter().position(|(n, _)| n == name) {
                state.savepoints.truncate(position);
            }
            Ok(())
        })
    }

    fn rollback_to_savepoint_sync(&self, name: &str) -> Result<(), TransactionError> {
        self.with_transaction(|state| {
            if state.snapshot.is_none() {
                return Err(TransactionError::NotActive);
            }
            if let Some(position) = state.savepoints.iter().position(|(n, _)| n == name) {
                let (_, items) = state.savepoints.swap_remove(position);
                state.savepoints.truncate(position);
                state.items = items;
            }
            Ok(())
        })
    }

    fn is_active_sync(&self) -> bool {
        self.state
            .lock()
            .map(|state| state.snapshot.is_some())
            .unwrap_or(false)
    }
}

impl<T> TransactionManager for InMemoryStore<T>
where
    T: Clone + Send + 'static,
{
    async fn begin(&self) -> Result<(), TransactionError> {
        self.begin_sync()
    }

    async fn commit(&self) -> Result<(), TransactionError> {
        self.commit_sync()
    }

    async fn rollback(&self) -> Result<(), TransactionError> {
        self.rollback_sync()
    }

    async fn create_savepoint(&self, name: &str) -> Result<(), TransactionError> {
        self.create_savepoint_sync(name)
    }

    async fn release_savepoint(&self, name: &str) -> Result<(), TransactionError> {
        self.release_savepoint_sync(name)
    }

    async fn rollback_to_savepoint(&self, name: &str) -> Result<(), TransactionError> {
        self.rollback_to_savepoint_sync(name)
    }

    async fn is_active(&self) -> bool {
        self.is_active_sync()
    }
}

/// Sort entities by a field comparator, breaking ties by key order
///
/// `items` must already be in key order; the sort is stable so equal
/// field values keep it. Without a comparator the key order is kept and
/// only the direction applies.
pub fn sort_items<T>(
    items: &mut [T],
    compare: Option<impl Fn(&T, &T) -> Ordering>,
    order: SortOrder,
) {
    match compare {
        Some(compare) => items.sort_by(|a, b| match order {
            SortOrder::Asc => compare(a, b),
            SortOrder::Desc => compare(b, a),
        }),
        None if order == SortOrder::Desc => items.reverse(),
        None => {}
    }
}

/// Cut one page out of a fully sorted result set
pub fn page_of<T: Clone>(items: &[T], page: PageRequest) -> Result<Vec<T>, PaginationError> {
    let paginator = Paginator::new(
        items,
        items.len() as i64,
        page.page() as i64,
        page.per_page() as i64,
    )?;
    Ok(paginator.iter().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(values: &[&str]) -> InMemoryStore<String> {
        let store = InMemoryStore::new();
        store
            .with_items(|items| {
                for value in values {
                    items.insert(value.to_string(), value.to_string());
                }
            })
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_rollback_restores_snapshot() {
        let store = store_with(&["a"]);

        store.begin().await.unwrap();
        store
            .with_items(|items| items.insert("b".into(), "b".into()))
            .unwrap();
        store.rollback().await.unwrap();

        assert_eq!(store.values().unwrap(), vec!["a".to_string()]);
        assert!(!store.is_active().await);
    }

    #[tokio::test]
    async fn test_rollback_to_savepoint_keeps_earlier_work() {
        let store = store_with(&[]);

        store.begin().await.unwrap();
        store.with_items(|items| items.insert("a".into(), "a".into())).unwrap();
        store.create_savepoint("after_a").await.unwrap();
        store.with_items(|items| items.insert("b".into(), "b".into())).unwrap();
        store.rollback_to_savepoint("after_a").await.unwrap();
        store.commit().await.unwrap();

        assert_eq!(store.values().unwrap(), vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_savepoint_is_ignored() {
        let store = store_with(&["a"]);

        store.begin().await.unwrap();
        store.release_savepoint("nope").await.unwrap();
        store.rollback_to_savepoint("nope").await.unwrap();
        assert!(store.is_active().await);
    }

    #[tokio::test]
    async fn test_savepoints_require_a_transaction() {
        let store = store_with(&[]);

        assert_eq!(
            store.create_savepoint("sp").await,
            Err(TransactionError::NotActive)
        );
        assert_eq!(store.commit().await, Err(TransactionError::NotActive));
    }

    #[tokio::test]
    async fn test_begin_twice_fails() {
        let store = store_with(&[]);

        store.begin().await.unwrap();
        assert_eq!(store.begin().await, Err(TransactionError::AlreadyActive));
    }

    #[test]
    fn test_sort_and_page() {
        let mut items = vec![3, 1, 2, 5, 4];
        sort_items(&mut items, Some(|a: &i32, b: &i32| a.cmp(b)), SortOrder::Desc);
        assert_eq!(items, vec![5, 4, 3, 2, 1]);

        let page = PageRequest::new(2, 2).unwrap();
        assert_eq!(page_of(&items, page).unwrap(), vec![3, 2]);

        let past_end = PageRequest::new(4, 2).unwrap();
        assert!(page_of(&items, past_end).unwrap().is_empty());
    }
}
