//! DuckDB metric storage
//!
//! Embedded file database holding samples and both catalogs.
//! All schema definitions and migrations are managed here.

pub mod error;
mod migrations;
pub mod repositories;
mod repository_impl;
pub mod schema;

pub use error::DuckdbError;
pub use repository_impl::{DuckdbDataTypeCatalog, DuckdbMetricStore, DuckdbTagCatalog};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use duckdb::Connection;
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::constants::{
    DUCKDB_CHECKPOINT_INTERVAL_SECS, DUCKDB_DB_FILENAME, DUCKDB_QUERY_TIMEOUT_SECS,
};
use crate::core::storage::{AppStorage, DataSubdir};

/// DuckDB storage service
///
/// Uses a single shared connection protected by a mutex.
pub struct DuckdbService {
    conn: Mutex<Option<Connection>>,
}

impl Drop for DuckdbService {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.get_mut().take()
            && let Err((_, e)) = conn.close()
        {
            tracing::warn!(error = %e, "DuckDB connection close failed during drop");
        }
    }
}

impl DuckdbService {
    /// Open (or create) the database file under the data directory
    pub async fn init(storage: &AppStorage) -> Result<Self, DuckdbError> {
        let db_path = storage.subdir(DataSubdir::Duckdb).join(DUCKDB_DB_FILENAME);
        let service = Self::open(&db_path).await?;
        tracing::debug!(path = %db_path.display(), "DuckdbService initialized");
        Ok(service)
    }

    /// Open a database at an explicit path and bring its schema up to date
    pub async fn open(db_path: &Path) -> Result<Self, DuckdbError> {
        let db_path = db_path.to_path_buf();
        let conn = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            conn.execute_batch(
                "SET autoinstall_known_extensions = false;
                 SET autoload_known_extensions = false;
                 PRAGMA enable_checkpoint_on_shutdown;",
            )?;
            migrations::run_migrations(&conn)?;
            Ok::<_, DuckdbError>(conn)
        })
        .await
        .map_err(|e| DuckdbError::Io(std::io::Error::other(e)))??;

        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Get exclusive access to the connection, or `Closed` after `close()`
    pub fn conn(&self) -> Result<MappedMutexGuard<'_, Connection>, DuckdbError> {
        MutexGuard::try_map(self.conn.lock(), |opt| opt.as_mut()).map_err(|_| DuckdbError::Closed)
    }

    pub fn is_open(&self) -> bool {
        self.conn.lock().is_some()
    }

    /// Run a blocking DuckDB query with timeout
    pub async fn run_query<T, F>(f: F) -> Result<T, DuckdbError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, DuckdbError> + Send + 'static,
    {
        let timeout = Duration::from_secs(DUCKDB_QUERY_TIMEOUT_SECS);
        tokio::time::timeout(timeout, tokio::task::spawn_blocking(f))
            .await
            .map_err(|_| {
                tracing::warn!(
                    timeout_secs = DUCKDB_QUERY_TIMEOUT_SECS,
                    "DuckDB query timed out"
                );
                DuckdbError::Timeout {
                    timeout_secs: DUCKDB_QUERY_TIMEOUT_SECS,
                }
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "DuckDB query task failed");
                DuckdbError::Io(std::io::Error::other(format!(
                    "Query execution failed: {}",
                    e
                )))
            })?
    }

    /// Run a checkpoint to flush WAL to the main database file.
    ///
    /// Returns `Ok(())` if the connection is already closed (no-op).
    pub async fn checkpoint(self: &Arc<Self>) -> Result<(), DuckdbError> {
        let db = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            let conn_guard = db.conn.lock();
            if let Some(ref conn) = *conn_guard {
                conn.execute("CHECKPOINT", [])?;
                tracing::debug!("DuckDB checkpoint completed");
            }
            Ok(())
        })
        .await
        .map_err(|e| DuckdbError::Io(std::io::Error::other(e)))?
    }

    /// Checkpoint and close the connection
    pub async fn close(self: Arc<Self>) -> Result<(), DuckdbError> {
        tokio::task::spawn_blocking(move || {
            let mut conn_guard = self.conn.lock();
            if let Some(conn) = conn_guard.take() {
                if let Err(e) = conn.execute("CHECKPOINT", []) {
                    tracing::warn!(error = %e, "CHECKPOINT failed during close");
                }
                conn.close().map_err(|(_, e)| DuckdbError::Database(e))?;
                tracing::debug!("DuckDB connection closed");
            }
            Ok(())
        })
        .await
        .map_err(|e| DuckdbError::Io(std::io::Error::other(e)))?
    }

    pub fn start_checkpoint_task(
        self: &Arc<Self>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let db = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(DUCKDB_CHECKPOINT_INTERVAL_SECS));
            // First tick completes immediately; nothing to flush yet
            interval.tick().await;
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("DuckDB checkpoint task shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if let Err(e) = db.checkpoint().await {
                            tracing::warn!(error = %e, "DuckDB checkpoint failed");
                        }
                    }
                }
            }
        })
    }
}

/// Execute a function within a transaction, automatically rolling back on error.
pub(crate) fn in_transaction<F, T>(conn: &Connection, f: F) -> Result<T, DuckdbError>
where
    F: FnOnce(&Connection) -> Result<T, DuckdbError>,
{
    conn.execute_batch("BEGIN TRANSACTION")?;
    match f(conn) {
        Ok(val) => {
            conn.execute_batch("COMMIT")?;
            Ok(val)
        }
        Err(e) => {
            if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                tracing::warn!(error = %rollback_err, "ROLLBACK failed after transaction error");
            }
            Err(e)
        }
    }
}
