//! Collaborators behind the HTTP layer
//!
//! The server only talks to two things: a resolver for static resources and
//! a channel that executes forwarded commands. Both are traits so the
//! connection handling can be exercised without a disk or a database.

pub mod channel;
pub mod resolver;
pub mod sqlite;

pub use channel::{CommandChannel, CommandError, TabularResult};
pub use resolver::{Resource, ResourceResolver, StaticDir};
pub use sqlite::SqliteChannel;
