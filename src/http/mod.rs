//! HTTP/1.0 protocol implementation.
//!
//! Each connection carries exactly one request. The request head is read a
//! line at a time straight off the byte stream, and the response body ends
//! when the connection closes (no `Content-Length` is sent).
//!
//! # Architecture
//!
//! - **`line`**: Reads one LF/CRLF-terminated line into a bounded buffer
//! - **`parser`**: Tokenizes the request line, drains or inspects headers, reads the body
//! - **`request`**: Method and request line types
//! - **`response`**: Status codes and response bodies
//! - **`writer`**: Frames a response onto the stream
//! - **`mime`**: Content type lookup by file extension
//! - **`connection`**: The per-connection state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────────┐
//!        │  ReadingRequestLine  │ ── empty line ──┐
//!        └──────────┬───────────┘                 │
//!                   ▼                             │
//!        ┌──────────────────────┐                 │
//!        │       Routing        │                 │
//!        └──────────┬───────────┘                 │
//!       ┌───────────┼─────────────┐               │
//!       ▼           ▼             ▼               │
//!  ServingGet   ServingPost   Rejecting (501)     │
//!       └───────────┼─────────────┘               │
//!                   ▼                             │
//!        ┌──────────────────────┐                 │
//!        │       Writing        │                 │
//!        └──────────┬───────────┘                 │
//!                   ▼                             │
//!                Closed ◄─────────────────────────┘
//! ```

pub mod connection;
pub mod line;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
