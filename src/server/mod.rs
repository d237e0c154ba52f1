//! Listener and process-level wiring.

pub mod listener;

pub use listener::Server;

use anyhow::Context;

use crate::backend::resolver::StaticDir;
use crate::backend::sqlite::SqliteChannel;
use crate::config::Config;

/// Serves static files and SQLite commands as configured.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let resolver = StaticDir::new(&cfg.static_files.root);
    let channel = SqliteChannel::open(&cfg.database.path, cfg.database.pool_size)
        .with_context(|| format!("failed to open database {}", cfg.database.path.display()))?;

    let server = Server::bind(cfg, resolver, channel).await?;
    server.run().await
}
