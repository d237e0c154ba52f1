//! Line reader for the request head.
//!
//! Reads one protocol line at a time from a buffered byte stream. A line ends
//! at a line-feed, at end of stream, or when the caller's buffer size is
//! exhausted. Carriage returns are handled with a one-byte look-ahead:
//!
//! - `CR LF` collapses to a plain line end (the CR is never stored)
//! - a bare `CR` followed by anything else is kept as data
//!
//! The returned line never contains the terminating line-feed.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Default line buffer size, including room for the terminator slot.
pub const DEFAULT_LINE_SIZE: usize = 1024;

/// Reads a single line of at most `size - 1` bytes.
///
/// An empty result means either a blank line or a stream that yielded no
/// bytes at all. For `size <= 1` nothing is read and an empty line is
/// returned immediately.
pub async fn read_line<R>(reader: &mut R, size: usize) -> io::Result<Vec<u8>>
where
    R: AsyncBufRead + Unpin + ?Sized,
{
    let mut line = Vec::new();
    if size <= 1 {
        return Ok(line);
    }

    while line.len() < size - 1 {
        let Some(byte) = next_byte(reader).await? else {
            break;
        };

        match byte {
            b'\n' => break,
            b'\r' => {
                // Leave the LF in the stream; the next iteration ends the line.
                if peek_byte(reader).await? != Some(b'\n') {
                    line.push(b'\r');
                }
            }
            other => line.push(other),
        }
    }

    Ok(line)
}

/// Looks at the next byte without consuming it.
async fn peek_byte<R>(reader: &mut R) -> io::Result<Option<u8>>
where
    R: AsyncBufRead + Unpin + ?Sized,
{
    loop {
        match reader.fill_buf().await {
            Ok(buf) => return Ok(buf.first().copied()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

async fn next_byte<R>(reader: &mut R) -> io::Result<Option<u8>>
where
    R: AsyncBufRead + Unpin + ?Sized,
{
    let byte = peek_byte(reader).await?;
    if byte.is_some() {
        reader.consume(1);
    }
    Ok(byte)
}
