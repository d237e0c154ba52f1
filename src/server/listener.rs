use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::backend::channel::CommandChannel;
use crate::backend::resolver::ResourceResolver;
use crate::config::Config;
use crate::handlers::Handlers;
use crate::http::connection::Connection;

/// Pending-connection queue length passed to `listen`.
pub const LISTEN_BACKLOG: i32 = 10;

/// Accept loop spawning one task per connection.
pub struct Server<R, C> {
    listener: TcpListener,
    handlers: Arc<Handlers<R, C>>,
}

impl<R, C> Server<R, C>
where
    R: ResourceResolver,
    C: CommandChannel,
{
    /// Binds the configured address with `SO_REUSEADDR` set.
    pub async fn bind(cfg: &Config, resolver: R, channel: C) -> anyhow::Result<Self> {
        let addr: SocketAddr = cfg
            .server
            .listen_addr
            .parse()
            .with_context(|| format!("invalid listen address {:?}", cfg.server.listen_addr))?;

        let std_listener =
            bind_socket(addr).with_context(|| format!("failed to bind {}", addr))?;
        let listener = TcpListener::from_std(std_listener)?;

        let handlers = Handlers::new(resolver, channel, cfg.static_files.index.clone(), cfg.limits);

        Ok(Self {
            listener,
            handlers: Arc::new(handlers),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until accepting fails.
    ///
    /// An accept error ends the loop and is returned; errors inside a
    /// connection are logged and stay with that connection.
    pub async fn run(self) -> anyhow::Result<()> {
        let local = self.local_addr()?;
        info!("httpd running on port {}", local.port());

        loop {
            let (socket, peer) = self.listener.accept().await.context("accept failed")?;
            debug!("Accepted connection from {}", peer);

            let handlers = Arc::clone(&self.handlers);
            tokio::spawn(async move {
                let mut conn = Connection::new(socket, handlers);
                if let Err(e) = conn.run().await {
                    warn!("Connection error from {}: {}", peer, e);
                }
            });
        }
    }
}

fn bind_socket(addr: SocketAddr) -> std::io::Result<std::net::TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;

    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;
    socket.set_nonblocking(true)?;

    Ok(socket.into())
}
