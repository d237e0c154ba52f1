use std::io;

use bytes::{Bytes, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncRead, AsyncReadExt};

use crate::http::line::read_line;
use crate::http::request::{Method, RequestLine, RequestStart};

/// Longest accepted method token, in bytes.
pub const MAX_METHOD_LEN: usize = 254;
/// Longest accepted request target, in bytes.
pub const MAX_TARGET_LEN: usize = 254;

/// The only header the server interprets. Matched case-sensitively.
const CONTENT_LENGTH_PREFIX: &[u8] = b"Content-Length:";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("request line too long")]
    RequestLineTooLong,

    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    #[error("request body of {declared} bytes exceeds the {limit} byte limit")]
    BodyTooLarge { declared: usize, limit: usize },

    #[error("connection closed after {received} of {expected} body bytes")]
    BodyTruncated { expected: usize, received: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Tokenizes a request line into a method and target.
///
/// The method is the leading run of non-whitespace bytes; the target is the
/// next run after skipping whitespace. Unsupported methods stop tokenizing
/// before the target is looked at.
pub fn parse_request_line(line: &[u8]) -> Result<RequestStart, ParseError> {
    let (token, rest) = split_token(line);
    if token.len() > MAX_METHOD_LEN {
        return Err(ParseError::RequestLineTooLong);
    }

    let token = String::from_utf8_lossy(token);
    let Some(method) = Method::from_token(&token) else {
        return Ok(RequestStart::Unsupported(token.into_owned()));
    };

    let rest = skip_whitespace(rest);
    let (target, _) = split_token(rest);
    if target.len() > MAX_TARGET_LEN {
        return Err(ParseError::RequestLineTooLong);
    }

    Ok(RequestStart::Supported(RequestLine {
        method,
        target: String::from_utf8_lossy(target).into_owned(),
    }))
}

/// Reads and discards header lines up to the blank line or end of stream.
pub async fn drain_headers<R>(reader: &mut R, line_size: usize) -> Result<(), ParseError>
where
    R: AsyncBufRead + Unpin + ?Sized,
{
    loop {
        let line = read_line(reader, line_size).await?;
        if line.is_empty() {
            return Ok(());
        }
    }
}

/// Reads header lines up to the blank line, returning the declared body length.
///
/// Only lines starting with `Content-Length:` are looked at. The last one
/// wins; a request without one declares an empty body.
pub async fn read_content_length<R>(reader: &mut R, line_size: usize) -> Result<usize, ParseError>
where
    R: AsyncBufRead + Unpin + ?Sized,
{
    let mut content_length = 0;

    loop {
        let line = read_line(reader, line_size).await?;
        if line.is_empty() {
            return Ok(content_length);
        }

        if let Some(value) = line.strip_prefix(CONTENT_LENGTH_PREFIX) {
            content_length = parse_length(value)?;
        }
    }
}

/// Reads exactly `len` body bytes.
///
/// A stream that ends first yields [`ParseError::BodyTruncated`] rather than
/// a short body.
pub async fn read_body<R>(reader: &mut R, len: usize) -> Result<Bytes, ParseError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut body = BytesMut::with_capacity(len);

    while body.len() < len {
        let remaining = (len - body.len()) as u64;
        let n = match (&mut *reader).take(remaining).read_buf(&mut body).await {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        if n == 0 {
            return Err(ParseError::BodyTruncated {
                expected: len,
                received: body.len(),
            });
        }
    }

    Ok(body.freeze())
}

fn parse_length(value: &[u8]) -> Result<usize, ParseError> {
    let text = String::from_utf8_lossy(value);
    let text = text.trim();
    text.parse::<usize>()
        .map_err(|_| ParseError::InvalidContentLength(text.to_string()))
}

/// C `isspace`: ASCII whitespace plus vertical tab.
fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0x0B
}

fn split_token(buf: &[u8]) -> (&[u8], &[u8]) {
    let end = buf
        .iter()
        .position(|&b| is_space(b))
        .unwrap_or(buf.len());
    buf.split_at(end)
}

fn skip_whitespace(buf: &[u8]) -> &[u8] {
    let start = buf
        .iter()
        .position(|&b| !is_space(b))
        .unwrap_or(buf.len());
    &buf[start..]
}
