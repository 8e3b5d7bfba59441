pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

pub use queries::is_constraint_violation;

pub const DEFAULT_POOL_SIZE: usize = 10;

/// How long a connection waits on SQLite's write lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A small fixed pool of SQLite connections handed out round-robin.
/// Each call borrows one connection for the duration of its closure.
pub struct Database {
    conns: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl Database {
    pub fn open(path: &Path, pool_size: usize) -> Result<Self> {
        let pool_size = pool_size.max(1);

        let first = Connection::open(path)?;
        // WAL so readers never block the writer
        first.pragma_update(None, "journal_mode", "WAL")?;
        configure(&first)?;
        migrations::run(&first)?;

        let mut conns = Vec::with_capacity(pool_size);
        conns.push(Mutex::new(first));
        for _ in 1..pool_size {
            let conn = Connection::open(path)?;
            configure(&conn)?;
            conns.push(Mutex::new(conn));
        }

        info!(
            "Database opened at {} ({} connections)",
            path.display(),
            pool_size
        );
        Ok(Self {
            conns,
            next: AtomicUsize::new(0),
        })
    }

    /// Single-connection in-memory database; every extra connection would
    /// see its own empty database, so there is no pool here.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        configure(&conn)?;
        migrations::run(&conn)?;

        Ok(Self {
            conns: vec![Mutex::new(conn)],
            next: AtomicUsize::new(0),
        })
    }

    pub fn pool_size(&self) -> usize {
        self.conns.len()
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.conns.len();
        let conn = self.conns[idx]
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Round-trips a trivial query to prove the backend answers.
    pub fn ping(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
    }
}

fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}
