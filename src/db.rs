// ==========================================
// Brand backfill - SQLite connection setup
// ==========================================
// Goals:
// - every Connection gets the same PRAGMAs (foreign keys, busy_timeout)
// - the target database must already exist; nothing here creates schema
// - per-row commit scopes built on SAVEPOINT
// ==========================================

use crate::config::ConnectionSettings;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, warn};

/// Default busy_timeout (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

const ROW_SAVEPOINT: &str = "backfill_row";

/// Shared handle used by the repositories and the engine
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Apply the uniform PRAGMAs
///
/// foreign_keys and busy_timeout are per-connection settings in SQLite.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open an existing SQLite database read-write (never creates the file)
pub fn open_existing_sqlite(db_path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Open the target store described by the connection settings
pub fn connect(settings: &ConnectionSettings) -> rusqlite::Result<SharedConnection> {
    let path = settings.database_path();
    debug!(path = %path.display(), "opening target database");
    let conn = open_existing_sqlite(&path)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Quote an identifier for interpolation into SQL text
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Lock the shared connection
pub fn lock(conn: &SharedConnection) -> RepositoryResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| RepositoryError::LockError(e.to_string()))
}

// ==========================================
// RowScope - one row's unit of work
// ==========================================
// SAVEPOINT outside a transaction opens one and RELEASE commits it.
// Inside a RunScope (dry run) the same statements only nest.
pub struct RowScope {
    conn: SharedConnection,
    open: bool,
}

impl RowScope {
    pub fn begin(conn: &SharedConnection) -> RepositoryResult<Self> {
        lock(conn)?.execute_batch(&format!("SAVEPOINT {}", ROW_SAVEPOINT))?;
        Ok(Self {
            conn: Arc::clone(conn),
            open: true,
        })
    }

    /// On failure the scope stays open and is rolled back on drop
    pub fn commit(mut self) -> RepositoryResult<()> {
        lock(&self.conn)?.execute_batch(&format!("RELEASE {}", ROW_SAVEPOINT))?;
        self.open = false;
        Ok(())
    }

    pub fn rollback(mut self) -> RepositoryResult<()> {
        self.open = false;
        Self::rollback_on(&self.conn)
    }

    fn rollback_on(conn: &SharedConnection) -> RepositoryResult<()> {
        lock(conn)?.execute_batch(&format!(
            "ROLLBACK TO {sp}; RELEASE {sp}",
            sp = ROW_SAVEPOINT
        ))?;
        Ok(())
    }
}

impl Drop for RowScope {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = Self::rollback_on(&self.conn) {
                warn!(error = %e, "row savepoint rollback failed");
            }
        }
    }
}

// ==========================================
// RunScope - whole-run transaction (dry run only)
// ==========================================
pub struct RunScope {
    conn: SharedConnection,
    open: bool,
}

impl RunScope {
    pub fn begin(conn: &SharedConnection) -> RepositoryResult<Self> {
        lock(conn)?.execute_batch("BEGIN")?;
        Ok(Self {
            conn: Arc::clone(conn),
            open: true,
        })
    }

    /// Discard everything written during the run
    pub fn discard(mut self) -> RepositoryResult<()> {
        self.open = false;
        lock(&self.conn)?.execute_batch("ROLLBACK")?;
        Ok(())
    }
}

impl Drop for RunScope {
    fn drop(&mut self) {
        if self.open {
            let result = lock(&self.conn)
                .and_then(|c| c.execute_batch("ROLLBACK").map_err(RepositoryError::from));
            if let Err(e) = result {
                warn!(error = %e, "run transaction rollback failed");
            }
        }
    }
}
