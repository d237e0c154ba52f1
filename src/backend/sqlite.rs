//! SQLite command channel
//!
//! Runs each forwarded command as a single SQL statement against a database
//! file. Connections are kept in a small pool; a call checks one out and hands
//! it back when the statement finishes, on success or failure.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rusqlite::Connection;
use rusqlite::types::ValueRef;

use crate::backend::channel::{CommandChannel, CommandError, TabularResult};

/// How long a statement waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pooled SQLite connections behind the [`CommandChannel`] interface.
pub struct SqliteChannel {
    path: PathBuf,
    idle: Mutex<Vec<Connection>>,
    pool_size: usize,
}

impl SqliteChannel {
    /// Opens the database at `path`, keeping up to `pool_size` idle connections.
    ///
    /// One connection is opened immediately so a bad path fails at startup.
    pub fn open(path: impl AsRef<Path>, pool_size: usize) -> rusqlite::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let first = open_connection(&path)?;

        tracing::info!(path = %path.display(), pool_size, "Database opened");

        Ok(Self {
            path,
            idle: Mutex::new(vec![first]),
            pool_size: pool_size.max(1),
        })
    }

    /// Number of connections currently idle in the pool.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Runs `f` on a pooled connection, returning the connection to the pool
    /// whatever `f` returns, including when it panics.
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        let pooled = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();

        let conn = match pooled {
            Some(conn) => conn,
            None => open_connection(&self.path).map_err(execution_error)?,
        };

        let mut checkout = Checkout {
            channel: self,
            conn: None,
        };
        let conn = &*checkout.conn.insert(conn);
        f(conn)
    }

    fn release(&self, conn: Connection) {
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < self.pool_size {
            idle.push(conn);
        }
    }
}

/// A checked-out connection, handed back to the pool on drop.
struct Checkout<'a> {
    channel: &'a SqliteChannel,
    conn: Option<Connection>,
}

impl Drop for Checkout<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.channel.release(conn);
        }
    }
}

impl CommandChannel for SqliteChannel {
    fn execute(&self, command: &str) -> Result<TabularResult, CommandError> {
        if command.trim().is_empty() {
            return Err(CommandError::Rejected("empty command".to_string()));
        }

        self.with_connection(|conn| run_statement(conn, command))
    }
}

fn run_statement(conn: &Connection, command: &str) -> Result<TabularResult, CommandError> {
    let mut stmt = conn.prepare(command).map_err(execution_error)?;

    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    if columns.is_empty() {
        let affected = stmt.execute([]).map_err(execution_error)?;
        return Err(CommandError::NoResultSet { affected });
    }

    let width = columns.len();
    let mut rows = Vec::new();
    let mut cursor = stmt.query([]).map_err(execution_error)?;

    while let Some(row) = cursor.next().map_err(execution_error)? {
        let mut cells = Vec::with_capacity(width);
        for index in 0..width {
            cells.push(render_cell(row.get_ref(index).map_err(execution_error)?));
        }
        rows.push(cells);
    }

    TabularResult::new(columns, rows)
}

fn open_connection(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

fn execution_error(err: rusqlite::Error) -> CommandError {
    CommandError::Execution(err.to_string())
}

/// Renders a REAL so it stays distinguishable from an INTEGER: `2.0`, not `2`,
/// and large magnitudes in exponent form (`1e300`).
fn render_real(v: f64) -> String {
    if v.is_infinite() {
        return if v > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }
    format!("{:?}", v)
}

fn render_cell(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(v) => Some(v.to_string()),
        ValueRef::Real(v) => Some(render_real(v)),
        ValueRef::Text(v) | ValueRef::Blob(v) => Some(String::from_utf8_lossy(v).into_owned()),
    }
}
