//! Static resource resolution
//!
//! Maps a resource name to a readable byte stream, or to nothing when the
//! resource does not exist.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use tokio::io::AsyncRead;

/// A resolved resource ready to stream.
pub struct Resource {
    /// Name the resource was resolved from; its extension picks the content type
    pub name: String,
    pub body: Box<dyn AsyncRead + Send + Unpin>,
}

/// Looks up static resources by name.
pub trait ResourceResolver: Send + Sync + 'static {
    /// Returns `Ok(None)` when no resource has this name.
    fn resolve(&self, name: &str) -> impl Future<Output = io::Result<Option<Resource>>> + Send;
}

/// Serves files from a directory on disk.
#[derive(Debug, Clone)]
pub struct StaticDir {
    root: PathBuf,
}

impl StaticDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceResolver for StaticDir {
    async fn resolve(&self, name: &str) -> io::Result<Option<Resource>> {
        let path = self.root.join(name);

        match tokio::fs::File::open(&path).await {
            Ok(file) => Ok(Some(Resource {
                name: name.to_string(),
                body: Box::new(file),
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
