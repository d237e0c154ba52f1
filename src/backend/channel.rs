//! Command channel interface
//!
//! POST bodies are handed to a [`CommandChannel`] verbatim. The channel
//! returns a [`TabularResult`] or a [`CommandError`] whose message is shown
//! to the client.

use thiserror::Error;

/// Failure reported by a command channel.
///
/// The `Display` text is sent to the client as the 400 response body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The channel refused to run the command
    #[error("{0}")]
    Rejected(String),

    /// The command ran and failed
    #[error("{0}")]
    Execution(String),

    /// The command succeeded but produced nothing to return
    #[error("statement produced no result set ({affected} rows affected)")]
    NoResultSet { affected: usize },
}

/// Ordered columns plus rows of nullable cells.
///
/// Every row has exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularResult {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl TabularResult {
    /// Builds a result, rejecting rows whose width differs from the column count.
    pub fn new(
        columns: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Result<Self, CommandError> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(CommandError::Execution(format!(
                "row {} has {} cells, expected {}",
                index,
                row.len(),
                columns.len()
            )));
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }
}

/// Executes forwarded commands.
///
/// Implementations are shared by every connection task and may be called
/// from several blocking threads at once; each call must get its own
/// session. Calls block, so the server runs them on the blocking pool.
pub trait CommandChannel: Send + Sync + 'static {
    fn execute(&self, command: &str) -> Result<TabularResult, CommandError>;
}
