//! Request-scoped database session
//!
//! Holds the pool and, while a transaction is open, the connection that
//! transaction runs on. Repositories route every statement through
//! [`SqlSession::lock`] so they land on the open transaction when there is one
//! and on a pooled connection otherwise.

use marquee_domain::transaction::{TransactionError, TransactionManager};
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

use crate::error::{Result, SqlError};

pub(crate) struct SessionState {
    transaction: Option<Transaction<'static, Sqlite>>,
    savepoint_counter: u64,
    /// `(name, identifier)` in creation order
    savepoints: Vec<(String, String)>,
}

impl SessionState {
    /// Connection of the open transaction, if any
    pub(crate) fn transaction_mut(&mut self) -> Option<&mut SqliteConnection> {
        self.transaction.as_mut().map(|tx| &mut **tx)
    }

    /// Forget `name` and every savepoint created after it
    ///
    /// SQLite discards the later savepoints on both RELEASE and ROLLBACK TO.
    fn take_savepoint(&mut self, name: &str) -> Option<String> {
        let position = self.savepoints.iter().position(|(n, _)| n == name)?;
        let (_, identifier) = self.savepoints.swap_remove(position);
        self.savepoints.truncate(position);
        Some(identifier)
    }
}

/// One request's view of the database
///
/// `Idle -> TransactionOpen -> {Committed | RolledBack}`; after commit or
/// rollback the session is idle again and may open another transaction.
/// A session is not meant to be shared between requests.
pub struct SqlSession {
    pool: SqlitePool,
    state: Mutex<SessionState>,
}

impl SqlSession {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            state: Mutex::new(SessionState {
                transaction: None,
                savepoint_counter: 0,
                savepoints: Vec::new(),
            }),
        }
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }

    pub(crate) async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        Ok(self.pool.acquire().await?)
    }

    pub(crate) async fn begin_local(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    fn open_transaction<'a>(
        state: &'a mut SessionState,
    ) -> std::result::Result<&'a mut Transaction<'static, Sqlite>, TransactionError> {
        state.transaction.as_mut().ok_or(TransactionError::NotActive)
    }
}

/// Run `$body` with `$conn` bound to the session's connection
///
/// Uses the open transaction when there is one, a pooled connection
/// otherwise. The session lock is held for the whole body.
macro_rules! on_connection {
    ($session:expr, |$conn:ident| $body:expr) => {{
        let mut state = $session.lock().await;
        match state.transaction_mut() {
            Some($conn) => $body,
            None => {
                let mut pooled = $session.acquire().await?;
                let $conn: &mut sqlx::SqliteConnection = &mut *pooled;
                $body
            }
        }
    }};
}

/// Run a multi-statement write atomically
///
/// Joins the open transaction when there is one. Otherwise opens a local
/// transaction that is committed when `$body` succeeds and rolled back when
/// it fails.
macro_rules! in_transaction {
    ($session:expr, |$conn:ident| $body:expr) => {{
        let mut state = $session.lock().await;
        match state.transaction_mut() {
            Some($conn) => $body,
            None => {
                let mut local = $session.begin_local().await?;
                let $conn: &mut sqlx::SqliteConnection = &mut *local;
                let result = $body;
                $crate::infrastructure::session::finish_local(local, result).await
            }
        }
    }};
}

pub(crate) use in_transaction;
pub(crate) use on_connection;

/// Commit a local transaction on success, roll it back on failure
pub(crate) async fn finish_local<T, E>(
    local: Transaction<'static, Sqlite>,
    result: std::result::Result<T, E>,
) -> std::result::Result<T, E>
where
    E: From<SqlError> + std::fmt::Display,
{
    match result {
        Ok(value) => {
            local.commit().await.map_err(SqlError::from)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = local.rollback().await {
                warn!(error = %rollback_err, "Local rollback failed");
            }
            debug!(error = %err, "Local transaction rolled back");
            Err(err)
        }
    }
}

impl TransactionManager for SqlSession {
    #[instrument(skip(self))]
    async fn begin(&self) -> std::result::Result<(), TransactionError> {
        let mut state = self.lock().await;
        if state.transaction.is_some() {
            return Err(TransactionError::AlreadyActive);
        }

        let transaction = self.begin_local().await?;
        state.transaction = Some(transaction);
        state.savepoints.clear();
        debug!("Transaction opened");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn commit(&self) -> std::result::Result<(), TransactionError> {
        let mut state = self.lock().await;
        let transaction = state.transaction.take().ok_or(TransactionError::NotActive)?;
        state.savepoints.clear();

        transaction.commit().await.map_err(SqlError::from)?;
        debug!("Transaction committed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn rollback(&self) -> std::result::Result<(), TransactionError> {
        let mut state = self.lock().await;
        let transaction = state.transaction.take().ok_or(TransactionError::NotActive)?;
        state.savepoints.clear();

        transaction.rollback().await.map_err(SqlError::from)?;
        debug!("Transaction rolled back");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn create_savepoint(&self, name: &str) -> std::result::Result<(), TransactionError> {
        let mut state = self.lock().await;
        Self::open_transaction(&mut state)?;

        state.savepoint_counter += 1;
        let identifier = format!("savepoint_{}", state.savepoint_counter);
        let transaction = Self::open_transaction(&mut state)?;
        sqlx::query(&format!("SAVEPOINT {}", identifier))
            .execute(&mut **transaction)
            .await
            .map_err(SqlError::from)?;

        debug!(savepoint = %identifier, "Savepoint created");
        state.savepoints.retain(|(existing, _)| existing != name);
        state.savepoints.push((name.to_string(), identifier));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn release_savepoint(&self, name: &str) -> std::result::Result<(), TransactionError> {
        let mut state = self.lock().await;
        Self::open_transaction(&mut state)?;

        let Some(identifier) = state.take_savepoint(name) else {
            return Ok(());
        };
        let transaction = Self::open_transaction(&mut state)?;
        sqlx::query(&format!("RELEASE SAVEPOINT {}", identifier))
            .execute(&mut **transaction)
            .await
            .map_err(SqlError::from)?;

        debug!(savepoint = %identifier, "Savepoint released");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn rollback_to_savepoint(
        &self,
        name: &str,
    ) -> std::result::Result<(), TransactionError> {
        let mut state = self.lock().await;
        Self::open_transaction(&mut state)?;

        let Some(identifier) = state.take_savepoint(name) else {
            return Ok(());
        };
        let transaction = Self::open_transaction(&mut state)?;
        sqlx::query(&format!("ROLLBACK TO SAVEPOINT {}", identifier))
            .execute(&mut **transaction)
            .await
            .map_err(SqlError::from)?;

        debug!(savepoint = %identifier, "Rolled back to savepoint");
        Ok(())
    }

    async fn is_active(&self) -> bool {
        self.lock().await.transaction.is_some()
    }
}
