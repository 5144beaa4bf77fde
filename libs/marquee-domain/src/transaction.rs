//! Transaction boundary port
//!
//! Use cases that must be all-or-nothing (deleting an aggregate) drive the
//! transaction explicitly through this port. Implementations keep the
//! `Idle -> TransactionOpen -> {Committed | RolledBack}` state for the
//! lifetime of one request and are not meant to be shared between requests.

use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by a transaction manager
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// Commit, rollback or savepoint requested while no transaction is open
    #[error("No transaction is currently open")]
    NotActive,

    /// `begin` called twice without commit or rollback in between
    #[error("A transaction is already open")]
    AlreadyActive,

    /// The storage backend refused the operation
    #[error("Transaction backend error: {0}")]
    Backend(String),
}

impl TransactionError {
    /// Create a backend error with a message
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Port for explicit transaction control
///
/// Savepoints are addressed by a caller-chosen name. Implementations map that
/// name to their own generated identifier. Releasing or rolling back to a
/// savepoint removes it from the active set; unknown names are ignored.
pub trait TransactionManager: Send + Sync {
    /// Open a transaction
    fn begin(&self) -> impl Future<Output = Result<(), TransactionError>> + Send;

    /// Make every statement since `begin` durable
    fn commit(&self) -> impl Future<Output = Result<(), TransactionError>> + Send;

    /// Discard every statement since `begin`
    fn rollback(&self) -> impl Future<Output = Result<(), TransactionError>> + Send;

    /// Set a named checkpoint inside the open transaction
    fn create_savepoint(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<(), TransactionError>> + Send;

    /// Forget a checkpoint, keeping its effects
    fn release_savepoint(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<(), TransactionError>> + Send;

    /// Undo everything done after a checkpoint without closing the transaction
    fn rollback_to_savepoint(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<(), TransactionError>> + Send;

    /// Whether a transaction is currently open
    fn is_active(&self) -> impl Future<Output = bool> + Send;
}

impl<T: TransactionManager> TransactionManager for Arc<T> {
    fn begin(&self) -> impl Future<Output = Result<(), TransactionError>> + Send {
        (**self).begin()
    }

    fn commit(&self) -> impl Future<Output = Result<(), TransactionError>> + Send {
        (**self).commit()
    }

    fn rollback(&self) -> impl Future<Output = Result<(), TransactionError>> + Send {
        (**self).rollback()
    }

    fn create_savepoint(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<(), TransactionError>> + Send {
        (**self).create_savepoint(name)
    }

    fn release_savepoint(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<(), TransactionError>> + Send {
        (**self).release_savepoint(name)
    }

    fn rollback_to_savepoint(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<(), TransactionError>> + Send {
        (**self).rollback_to_savepoint(name)
    }

    fn is_active(&self) -> impl Future<Output = bool> + Send {
        (**self).is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FlagManager {
        active: Mutex<bool>,
    }

    impl TransactionManager for FlagManager {
        async fn begin(&self) -> Result<(), TransactionError> {
            let mut active = self.active.lock().unwrap();
            if *active {
                return Err(TransactionError::AlreadyActive);
            }
            *active = true;
            Ok(())
        }

        async fn commit(&self) -> Result<(), TransactionError> {
            let mut active = self.active.lock().unwrap();
            if !*active {
                return Err(TransactionError::NotActive);
            }
            *active = false;
            Ok(())
        }

        async fn rollback(&self) -> Result<(), TransactionError> {
            self.commit().await
        }

        async fn create_savepoint(&self, _name: &str) -> Result<(), TransactionError> {
            Ok(())
        }

        async fn release_savepoint(&self, _name: &str) -> Result<(), TransactionError> {
            Ok(())
        }

        async fn rollback_to_savepoint(&self, _name: &str) -> Result<(), TransactionError> {
            Ok(())
        }

        async fn is_active(&self) -> bool {
            *self.active.lock().unwrap()
        }
    }

    #[tokio::test]
    async fn test_shared_manager_sees_one_transaction() {
        let manager = Arc::new(FlagManager::default());
        let other = manager.clone();

        manager.begin().await.unwrap();
        assert!(other.is_active().await);
        assert_eq!(other.begin().await, Err(TransactionError::AlreadyActive));

        other.commit().await.unwrap();
        assert!(!manager.is_active().await);
        assert_eq!(manager.commit().await, Err(TransactionError::NotActive));
    }
}
