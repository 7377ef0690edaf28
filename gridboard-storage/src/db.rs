//! Shared SQLite connection handle.

use rusqlite::Connection;
use std::cell::{Cell, RefCell};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::context::CallContext;
use crate::error::{StorageError, StorageResult};
use crate::schema;

/// Number of SQLite VM steps between cancellation checks.
const PROGRESS_STEPS: i32 = 1_000;

/// Sleep between retries while another connection holds the write lock.
const LOCK_POLL: Duration = Duration::from_millis(5);

/// The call currently holding this thread's connection, as seen by
/// [`wait_for_lock`].
struct LockWait {
    ctx: CallContext,
    busy_timeout: Duration,
    started: Cell<Instant>,
}

thread_local! {
    static LOCK_WAIT: RefCell<Option<LockWait>> = const { RefCell::new(None) };
}

/// SQLite busy handler. Retries until the lock frees, the running call's
/// context is done, or the configured busy timeout runs out.
fn wait_for_lock(attempt: i32) -> bool {
    LOCK_WAIT.with_borrow(|wait| {
        let Some(wait) = wait else {
            return false;
        };
        let now = Instant::now();
        if attempt == 0 {
            wait.started.set(now);
        }
        if wait.ctx.is_done() || now.duration_since(wait.started.get()) >= wait.busy_timeout {
            return false;
        }
        thread::sleep(LOCK_POLL);
        true
    })
}

/// Publishes a call to [`wait_for_lock`] until dropped.
struct LockWaitScope;

impl LockWaitScope {
    fn enter(ctx: &CallContext, busy_timeout: Duration) -> Self {
        LOCK_WAIT.set(Some(LockWait {
            ctx: ctx.clone(),
            busy_timeout,
            started: Cell::new(Instant::now()),
        }));
        Self
    }
}

impl Drop for LockWaitScope {
    fn drop(&mut self) {
        LOCK_WAIT.set(None);
    }
}

/// A process-wide database handle. Cheap to clone; clones share the
/// connection, so in-process calls are serialized by its mutex.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    busy_timeout: Duration,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("busy_timeout", &self.busy_timeout)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Opens (or creates) the database described by `config` and ensures the
    /// tables exist.
    pub fn open(config: &StorageConfig) -> StorageResult<Self> {
        let conn = match &config.path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                let conn = Connection::open(path)?;
                conn.busy_timeout(config.busy_timeout)?;
                conn.execute_batch("PRAGMA journal_mode = WAL;")?;
                info!(path = %path.display(), "Opened database");
                conn
            }
            None => {
                debug!("Opened in-memory database");
                Connection::open_in_memory()?
            }
        };
        schema::migrate(&conn)?;
        // From here on lock waits are driven by the calling context.
        conn.busy_handler(Some(wait_for_lock))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            busy_timeout: config.busy_timeout,
        })
    }

    /// Opens a private in-memory database (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::open(&StorageConfig::in_memory())
    }

    /// Returns the recorded schema version.
    pub fn schema_version(&self, ctx: &CallContext) -> StorageResult<i64> {
        self.with_conn(ctx, |conn| schema::schema_version(conn))
    }

    /// Returns true when `table` exists.
    pub fn has_table(&self, ctx: &CallContext, table: &str) -> StorageResult<bool> {
        self.with_conn(ctx, |conn| schema::has_table(conn, table))
    }

    /// Runs `f` with exclusive access to the connection while `ctx` can
    /// interrupt it, both mid-statement and while waiting on another
    /// connection's lock.
    pub(crate) fn with_conn<T>(
        &self,
        ctx: &CallContext,
        f: impl FnOnce(&mut Connection) -> StorageResult<T>,
    ) -> StorageResult<T> {
        if ctx.is_done() {
            return Err(StorageError::Cancelled);
        }
        let mut conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        // The deadline may have passed while waiting for the lock.
        if ctx.is_done() {
            return Err(StorageError::Cancelled);
        }

        let _lock_wait = LockWaitScope::enter(ctx, self.busy_timeout);
        conn.progress_handler(PROGRESS_STEPS, Some(ctx.interrupt_check()));
        let result = f(&mut conn);
        conn.progress_handler(0, None::<fn() -> bool>);

        result.map_err(|err| err.for_call(ctx))
    }
}
