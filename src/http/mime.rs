//! Content type lookup by file extension.

const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Returns the content type for `name`, judged only by the text after its
/// last dot, compared case-insensitively.
///
/// ```
/// # use sqlhttpd::http::mime::content_type_for;
/// assert_eq!(content_type_for("index.HTML"), "text/html");
/// assert_eq!(content_type_for("README"), "text/plain");
/// ```
pub fn content_type_for(name: &str) -> &'static str {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return DEFAULT_CONTENT_TYPE;
    };

    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "png" => "image/png",
        "css" => "text/css",
        "js" => "application/javascript",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
