//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use sqlhttpd::backend::channel::{CommandChannel, CommandError, TabularResult};
use sqlhttpd::backend::resolver::{Resource, ResourceResolver};
use sqlhttpd::config::LimitsConfig;
use sqlhttpd::handlers::Handlers;
use sqlhttpd::http::connection::Connection;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

pub const INDEX_HTML: &[u8] = b"<html><body>hello</body></html>\n";

/// Resolver backed by an in-memory map.
#[derive(Default)]
pub struct MemoryResolver {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryResolver {
    pub fn with(mut self, name: &str, body: &[u8]) -> Self {
        self.files.insert(name.to_string(), body.to_vec());
        self
    }
}

impl ResourceResolver for MemoryResolver {
    async fn resolve(&self, name: &str) -> io::Result<Option<Resource>> {
        Ok(self.files.get(name).map(|body| Resource {
            name: name.to_string(),
            body: Box::new(io::Cursor::new(body.clone())),
        }))
    }
}

type Reply = dyn Fn(&str) -> Result<TabularResult, CommandError> + Send + Sync;

/// Channel that records every command and answers with a fixed function.
pub struct StubChannel {
    commands: Arc<Mutex<Vec<String>>>,
    reply: Box<Reply>,
}

impl StubChannel {
    pub fn new(
        reply: impl Fn(&str) -> Result<TabularResult, CommandError> + Send + Sync + 'static,
    ) -> (Self, Arc<Mutex<Vec<String>>>) {
        let commands = Arc::new(Mutex::new(Vec::new()));
        let channel = Self {
            commands: Arc::clone(&commands),
            reply: Box::new(reply),
        };
        (channel, commands)
    }

    pub fn rejecting(message: &'static str) -> (Self, Arc<Mutex<Vec<String>>>) {
        Self::new(move |_| Err(CommandError::Rejected(message.to_string())))
    }
}

impl CommandChannel for StubChannel {
    fn execute(&self, command: &str) -> Result<TabularResult, CommandError> {
        self.commands.lock().unwrap().push(command.to_string());
        (self.reply)(command)
    }
}

pub fn sample_result() -> TabularResult {
    TabularResult::new(
        vec!["a".to_string(), "b".to_string()],
        vec![
            vec![Some("1".to_string()), Some("2".to_string())],
            vec![None, Some("4".to_string())],
        ],
    )
    .unwrap()
}

pub fn handlers<R, C>(resolver: R, channel: C) -> Arc<Handlers<R, C>>
where
    R: ResourceResolver,
    C: CommandChannel,
{
    Arc::new(Handlers::new(resolver, channel, "index.html", LimitsConfig::default()))
}

pub fn default_handlers() -> Arc<Handlers<MemoryResolver, StubChannel>> {
    let resolver = MemoryResolver::default().with("index.html", INDEX_HTML);
    let (channel, _) = StubChannel::rejecting("unused");
    handlers(resolver, channel)
}

/// In-memory stream that hands out its input one byte per read, so the
/// number of bytes consumed is exact.
pub struct ScriptedStream {
    input: Vec<u8>,
    pos: usize,
    pub output: Vec<u8>,
}

impl ScriptedStream {
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.to_vec(),
            pos: 0,
            output: Vec::new(),
        }
    }

    pub fn bytes_read(&self) -> usize {
        self.pos
    }
}

impl AsyncRead for ScriptedStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.pos < self.input.len() && buf.remaining() > 0 {
            let byte = self.input[self.pos];
            buf.put_slice(&[byte]);
            self.pos += 1;
        }
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for ScriptedStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        data: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.output.extend_from_slice(data);
        Poll::Ready(Ok(data.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Runs one connection over `request` and returns the stream afterwards.
pub async fn exchange<R, C>(handlers: Arc<Handlers<R, C>>, request: &[u8]) -> ScriptedStream
where
    R: ResourceResolver,
    C: CommandChannel,
{
    let mut conn = Connection::new(ScriptedStream::new(request), handlers);
    conn.run().await.unwrap();
    conn.into_inner()
}

/// Splits raw response bytes into the head (without the blank line) and body.
pub fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a blank line after the headers");
    let head = String::from_utf8(raw[..end].to_vec()).unwrap();
    (head, raw[end + 4..].to_vec())
}
