use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.0";
pub const SERVER_HEADER: &str = "Server: sqlhttpd/0.1.0";

/// Chunk size used when streaming a resource body.
pub const CHUNK_SIZE: usize = 1024;

/// Serializes the status line and header block, blank line included.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    format!(
        "{} {} {}\r\n{}\r\nContent-Type: {}\r\n\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase(),
        SERVER_HEADER,
        resp.content_type,
    )
    .into_bytes()
}

/// Frames one response onto a stream: the head first, then the body.
pub struct ResponseWriter {
    head: Vec<u8>,
    body: Body,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        Self {
            head: serialize_head(&response),
            body: response.body,
        }
    }

    /// Writes the response.
    ///
    /// Failing to send the head or an in-memory body is an error. A streamed
    /// body that hits a write error is abandoned and logged; the call still
    /// succeeds so the caller closes the connection normally.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        write_all_retrying(stream, &self.head).await?;

        match &mut self.body {
            Body::Bytes(bytes) => write_all_retrying(stream, &bytes[..]).await?,
            Body::Stream(reader) => {
                copy_chunked(reader, stream).await;
            }
        }

        stream.flush().await?;
        Ok(())
    }
}

/// Copies `reader` to `stream` in [`CHUNK_SIZE`] pieces, returning the
/// number of bytes sent before the copy ended.
async fn copy_chunked<R, W>(reader: &mut R, stream: &mut W) -> usize
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut copied = 0;

    loop {
        let n = match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(error = %e, copied, "read failed while streaming body");
                break;
            }
        };

        if let Err(e) = write_all_retrying(stream, &chunk[..n]).await {
            warn!(error = %e, copied, "send failed");
            break;
        }
        copied += n;
    }

    copied
}

async fn write_all_retrying<W>(stream: &mut W, buf: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut written = 0;

    while written < buf.len() {
        match stream.write(&buf[written..]).await {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "connection closed while writing",
                ));
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
