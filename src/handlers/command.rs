use std::io::{self, Write};
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::backend::channel::{CommandChannel, TabularResult};
use crate::http::response::Response;

/// Text used for a cell with no value.
pub const NULL_CELL: &str = "NULL";

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("result exceeds the {limit} byte response limit")]
    TooLarge { limit: usize },

    #[error("failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ResultDocument<'a> {
    columns: &'a [String],
    rows: Vec<Vec<&'a str>>,
}

/// Serializes a result as `{"columns":[...],"rows":[[...],...]}`.
///
/// Output is capped at `limit` bytes; serialization stops as soon as the
/// cap is crossed.
pub fn serialize_result(result: &TabularResult, limit: usize) -> Result<Vec<u8>, SerializeError> {
    let document = ResultDocument {
        columns: result.columns(),
        rows: result
            .rows()
            .iter()
            .map(|row| row.iter().map(|cell| cell.as_deref().unwrap_or(NULL_CELL)).collect())
            .collect(),
    };

    let mut out = CappedBuffer {
        buf: Vec::new(),
        limit,
    };

    match serde_json::to_writer(&mut out, &document) {
        Ok(()) => Ok(out.buf),
        Err(e) if e.is_io() => Err(SerializeError::TooLarge { limit }),
        Err(e) => Err(e.into()),
    }
}

/// Answers a POST whose body is `payload`.
pub async fn respond<C>(channel: Arc<C>, payload: Bytes, max_response_bytes: usize) -> Response
where
    C: CommandChannel,
{
    let command = match String::from_utf8(payload.to_vec()) {
        Ok(command) => command,
        Err(_) => return Response::bad_request("command is not valid UTF-8"),
    };

    let outcome = tokio::task::spawn_blocking(move || channel.execute(&command)).await;

    match outcome {
        Ok(Ok(result)) => match serialize_result(&result, max_response_bytes) {
            Ok(json) => Response::json(json),
            Err(e) => {
                debug!(error = %e, "Result not sent");
                Response::bad_request(e.to_string())
            }
        },
        Ok(Err(e)) => {
            debug!(error = %e, "Command failed");
            Response::bad_request(e.to_string())
        }
        Err(e) => {
            error!(error = %e, "Command task did not complete");
            Response::bad_request("command execution aborted")
        }
    }
}

struct CappedBuffer {
    buf: Vec<u8>,
    limit: usize,
}

impl Write for CappedBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.buf.len() + data.len() > self.limit {
            return Err(io::Error::new(io::ErrorKind::OutOfMemory, "response limit reached"));
        }
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
