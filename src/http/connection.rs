use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::backend::channel::CommandChannel;
use crate::backend::resolver::ResourceResolver;
use crate::handlers::Handlers;
use crate::http::line::read_line;
use crate::http::parser::{
    ParseError, drain_headers, parse_request_line, read_body, read_content_length,
};
use crate::http::request::{Method, RequestLine, RequestStart};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// One accepted client connection, handling exactly one request.
pub struct Connection<S, R, C> {
    stream: BufReader<S>,
    handlers: Arc<Handlers<R, C>>,
    state: ConnectionState,
}

pub enum ConnectionState {
    ReadingRequestLine,
    Routing(RequestStart),
    ServingGet(String),
    ServingPost,
    Rejecting(String),
    Writing(ResponseWriter),
    Closed,
}

impl<S, R, C> Connection<S, R, C>
where
    S: AsyncRead + AsyncWrite + Unpin,
    R: ResourceResolver,
    C: CommandChannel,
{
    pub fn new(stream: S, handlers: Arc<Handlers<R, C>>) -> Self {
        Self {
            stream: BufReader::new(stream),
            handlers,
            state: ConnectionState::ReadingRequestLine,
        }
    }

    /// Returns the underlying stream, dropping any buffered unread bytes.
    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }

    /// Drives the connection to `Closed`, then shuts the stream down.
    ///
    /// The shutdown happens on every path, including errors.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        if let Err(e) = self.stream.shutdown().await {
            debug!(error = %e, "Shutdown failed");
        }

        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        let line_size = self.handlers.limits().max_line_bytes;

        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::ReadingRequestLine => {
                    let line = read_line(&mut self.stream, line_size).await?;

                    if line.is_empty() {
                        debug!("Empty request line, closing");
                        ConnectionState::Closed
                    } else {
                        match parse_request_line(&line) {
                            Ok(start) => ConnectionState::Routing(start),
                            Err(e) => Self::malformed(e)?,
                        }
                    }
                }

                ConnectionState::Routing(RequestStart::Supported(RequestLine { method, target })) => {
                    debug!(method = method.as_str(), path = %target, "Request");
                    match method {
                        Method::Get => ConnectionState::ServingGet(target),
                        Method::Post => ConnectionState::ServingPost,
                    }
                }

                ConnectionState::Routing(RequestStart::Unsupported(token)) => {
                    ConnectionState::Rejecting(token)
                }

                ConnectionState::ServingGet(target) => {
                    drain_headers(&mut self.stream, line_size).await?;
                    let response = self.handlers.get(&target).await;
                    ConnectionState::Writing(ResponseWriter::new(response))
                }

                ConnectionState::ServingPost => match self.read_command().await {
                    Ok(payload) => {
                        let response = self.handlers.post(payload).await;
                        ConnectionState::Writing(ResponseWriter::new(response))
                    }
                    Err(e) => Self::malformed(e)?,
                },

                ConnectionState::Rejecting(token) => {
                    info!(method = %token, "Method not implemented");
                    ConnectionState::Writing(ResponseWriter::new(Response::not_implemented()))
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    async fn read_command(&mut self) -> Result<Bytes, ParseError> {
        let limits = *self.handlers.limits();
        let declared = read_content_length(&mut self.stream, limits.max_line_bytes).await?;

        if declared > limits.max_body_bytes {
            return Err(ParseError::BodyTooLarge {
                declared,
                limit: limits.max_body_bytes,
            });
        }

        read_body(&mut self.stream, declared).await
    }

    /// Turns a request the client got wrong into a 400; I/O failures end
    /// the connection instead.
    fn malformed(err: ParseError) -> anyhow::Result<ConnectionState> {
        match err {
            ParseError::Io(e) => Err(e.into()),
            e => {
                info!(error = %e, "Malformed request");
                let response = Response::bad_request(e.to_string());
                Ok(ConnectionState::Writing(ResponseWriter::new(response)))
            }
        }
    }
}
