use std::fmt;

use bytes::Bytes;
use tokio::io::AsyncRead;

/// HTTP status codes issued by the server.
///
/// - `Ok` (200): Resource served or command result returned
/// - `BadRequest` (400): Command rejected, or a malformed request
/// - `NotFound` (404): Resource not found
/// - `NotImplemented` (501): Method other than GET or POST
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 BAD REQUEST
    BadRequest,
    /// 404 NOT FOUND
    NotFound,
    /// 501 Method Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use sqlhttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the reason phrase written on the status line.
    ///
    /// # Example
    ///
    /// ```
    /// # use sqlhttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "NOT FOUND");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "BAD REQUEST",
            StatusCode::NotFound => "NOT FOUND",
            StatusCode::NotImplemented => "Method Not Implemented",
        }
    }
}

pub const NOT_FOUND_BODY: &str = "<HTML><TITLE>Not Found</TITLE><BODY><P>The server could not fulfill \
your request because the resource specified is unavailable or nonexistent.</P></BODY></HTML>\r\n";

pub const NOT_IMPLEMENTED_BODY: &str = "<HTML><HEAD><TITLE>Method Not Implemented</TITLE></HEAD>\
<BODY><P>HTTP request method not supported.</P></BODY></HTML>\r\n";

/// Response payload: either bytes already in memory or a reader to stream.
pub enum Body {
    Bytes(Bytes),
    Stream(Box<dyn AsyncRead + Send + Unpin>),
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Body::Stream(_) => f.write_str("Stream"),
        }
    }
}

/// A complete response ready to be framed onto a connection.
///
/// Carries no length: the body ends when the connection closes.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Body,
}

/// Builder for constructing responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("application/json")
///     .body(b"{}".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    content_type: String,
    body: Body,
}

impl ResponseBuilder {
    /// Creates a builder with an empty `text/html` body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: "text/html".to_string(),
            body: Body::Bytes(Bytes::new()),
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Body::Bytes(body.into());
        self
    }

    pub fn stream(mut self, reader: Box<dyn AsyncRead + Send + Unpin>) -> Self {
        self.body = Body::Stream(reader);
        self
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            content_type: self.content_type,
            body: self.body,
        }
    }
}

impl Response {
    /// 200 OK with a JSON document.
    pub fn json(body: impl Into<Bytes>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .content_type("application/json")
            .body(body)
            .build()
    }

    /// 200 OK streaming a resource of the given type.
    pub fn stream(content_type: &str, reader: Box<dyn AsyncRead + Send + Unpin>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .content_type(content_type)
            .stream(reader)
            .build()
    }

    /// 400 with `message` as a plain-text body.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .content_type("text/plain")
            .body(message.into())
            .build()
    }

    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .body(NOT_FOUND_BODY)
            .build()
    }

    pub fn not_implemented() -> Self {
        ResponseBuilder::new(StatusCode::NotImplemented)
            .body(NOT_IMPLEMENTED_BODY)
            .build()
    }
}
