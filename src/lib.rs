//! sqlhttpd - minimal HTTP/1.0 server
//!
//! GET serves the index page from a static directory. POST forwards the
//! request body to a command channel (SQLite by default) and answers with
//! the result set as JSON.

pub mod backend;
pub mod config;
pub mod handlers;
pub mod http;
pub mod server;
