//! Request handlers.
//!
//! - **`resource`**: GET, serves the index resource or 404
//! - **`command`**: POST, runs the body through the command channel and
//!   returns the result as JSON

pub mod command;
pub mod resource;

use std::sync::Arc;

use bytes::Bytes;

use crate::backend::channel::CommandChannel;
use crate::backend::resolver::ResourceResolver;
use crate::config::LimitsConfig;
use crate::http::response::Response;

/// Collaborators and limits shared by every connection.
pub struct Handlers<R, C> {
    resolver: R,
    channel: Arc<C>,
    index: String,
    limits: LimitsConfig,
}

impl<R, C> Handlers<R, C>
where
    R: ResourceResolver,
    C: CommandChannel,
{
    pub fn new(resolver: R, channel: C, index: impl Into<String>, limits: LimitsConfig) -> Self {
        Self {
            resolver,
            channel: Arc::new(channel),
            index: index.into(),
            limits,
        }
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    pub async fn get(&self, target: &str) -> Response {
        resource::respond(&self.resolver, target, &self.index).await
    }

    pub async fn post(&self, payload: Bytes) -> Response {
        command::respond(
            Arc::clone(&self.channel),
            payload,
            self.limits.max_response_bytes,
        )
        .await
    }
}
