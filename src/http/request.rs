/// HTTP request methods understood by the server.
///
/// Only GET and POST are served. Every other token is carried as
/// [`RequestStart::Unsupported`] and answered with 501.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a static resource
    Get,
    /// POST - Forward the body to the command channel
    Post,
}

impl Method {
    /// Parses a method token, ignoring ASCII case.
    ///
    /// # Example
    ///
    /// ```
    /// # use sqlhttpd::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Some(Method::Get));
    /// assert_eq!(Method::from_token("post"), Some(Method::Post));
    /// assert_eq!(Method::from_token("DELETE"), None);
    /// ```
    pub fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("GET") {
            Some(Method::Get)
        } else if token.eq_ignore_ascii_case("POST") {
            Some(Method::Post)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// The method and target extracted from a request line.
///
/// The HTTP version token and anything after it are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    /// The request target as sent (e.g. "/index.html")
    pub target: String,
}

/// Outcome of tokenizing a request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStart {
    /// GET or POST, with the target parsed.
    Supported(RequestLine),
    /// Any other method token. The target is never parsed.
    Unsupported(String),
}
