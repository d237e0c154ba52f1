mod common;

use common::{
    INDEX_HTML, MemoryResolver, StubChannel, default_handlers, exchange, handlers,
    sample_result, split_response,
};
use sqlhttpd::http::response::{NOT_FOUND_BODY, NOT_IMPLEMENTED_BODY};

#[tokio::test]
async fn test_get_index() {
    let stream = exchange(default_handlers(), b"GET / HTTP/1.0\r\nHost: x\r\n\r\n").await;
    let (head, body) = split_response(&stream.output);

    assert_eq!(
        head,
        "HTTP/1.0 200 OK\r\nServer: sqlhttpd/0.1.0\r\nContent-Type: text/html"
    );
    assert_eq!(body, INDEX_HTML);
}

#[tokio::test]
async fn test_root_and_index_are_identical() {
    let root = exchange(default_handlers(), b"GET / HTTP/1.0\r\n\r\n").await;
    let index = exchange(default_handlers(), b"GET /index.html HTTP/1.0\r\n\r\n").await;

    assert_eq!(root.output, index.output);
}

#[tokio::test]
async fn test_lf_only_request() {
    let stream = exchange(default_handlers(), b"get /INDEX.html HTTP/1.0\nAccept: */*\n\n").await;
    let (head, body) = split_response(&stream.output);

    assert!(head.starts_with("HTTP/1.0 200 OK\r\n"));
    assert_eq!(body, INDEX_HTML);
}

#[tokio::test]
async fn test_get_missing_resource() {
    let stream = exchange(default_handlers(), b"GET /missing.html HTTP/1.0\r\n\r\n").await;
    let (head, body) = split_response(&stream.output);

    assert_eq!(
        head,
        "HTTP/1.0 404 NOT FOUND\r\nServer: sqlhttpd/0.1.0\r\nContent-Type: text/html"
    );
    assert_eq!(body, NOT_FOUND_BODY.as_bytes());
}

#[tokio::test]
async fn test_unsupported_method_stops_reading() {
    let request_line = b"DELETE /x HTTP/1.0\r\n";
    let request = [&request_line[..], b"Host: x\r\n\r\n"].concat();

    let stream = exchange(default_handlers(), &request).await;
    let (head, body) = split_response(&stream.output);

    assert_eq!(
        head,
        "HTTP/1.0 501 Method Not Implemented\r\nServer: sqlhttpd/0.1.0\r\nContent-Type: text/html"
    );
    assert_eq!(body, NOT_IMPLEMENTED_BODY.as_bytes());
    assert_eq!(stream.bytes_read(), request_line.len());
}

#[tokio::test]
async fn test_empty_connection_gets_no_response() {
    let stream = exchange(default_handlers(), b"").await;
    assert!(stream.output.is_empty());
}

#[tokio::test]
async fn test_blank_first_line_gets_no_response() {
    let stream = exchange(default_handlers(), b"\r\nGET / HTTP/1.0\r\n\r\n").await;
    assert!(stream.output.is_empty());
}

#[tokio::test]
async fn test_post_forwards_body() {
    let (channel, commands) = StubChannel::new(|_| Ok(sample_result()));
    let handlers = handlers(MemoryResolver::default(), channel);

    let stream = exchange(
        handlers,
        b"POST /query HTTP/1.0\r\nContent-Type: text/plain\r\nContent-Length: 18\r\n\r\nSELECT a, b FROM t",
    )
    .await;
    let (head, body) = split_response(&stream.output);

    assert_eq!(
        head,
        "HTTP/1.0 200 OK\r\nServer: sqlhttpd/0.1.0\r\nContent-Type: application/json"
    );
    assert_eq!(
        body,
        br#"{"columns":["a","b"],"rows":[["1","2"],["NULL","4"]]}"#
    );
    assert_eq!(*commands.lock().unwrap(), vec!["SELECT a, b FROM t".to_string()]);
}

#[tokio::test]
async fn test_post_zero_length_forwards_empty_command() {
    let (channel, commands) = StubChannel::rejecting("empty command");
    let handlers = handlers(MemoryResolver::default(), channel);

    let stream = exchange(handlers, b"POST / HTTP/1.0\r\nContent-Length: 0\r\n\r\n").await;
    let (head, body) = split_response(&stream.output);

    assert_eq!(
        head,
        "HTTP/1.0 400 BAD REQUEST\r\nServer: sqlhttpd/0.1.0\r\nContent-Type: text/plain"
    );
    assert_eq!(body, b"empty command");
    assert_eq!(*commands.lock().unwrap(), vec![String::new()]);
}

#[tokio::test]
async fn test_post_without_content_length() {
    let (channel, commands) = StubChannel::rejecting("empty command");
    let handlers = handlers(MemoryResolver::default(), channel);

    exchange(handlers, b"POST / HTTP/1.0\r\n\r\nignored").await;

    assert_eq!(*commands.lock().unwrap(), vec![String::new()]);
}

#[tokio::test]
async fn test_post_truncated_body() {
    let (channel, commands) = StubChannel::new(|_| Ok(sample_result()));
    let handlers = handlers(MemoryResolver::default(), channel);

    let stream = exchange(handlers, b"POST / HTTP/1.0\r\nContent-Length: 20\r\n\r\nSELECT").await;
    let (head, body) = split_response(&stream.output);

    assert!(head.starts_with("HTTP/1.0 400 BAD REQUEST\r\n"));
    assert_eq!(body, b"connection closed after 6 of 20 body bytes");
    assert!(commands.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_post_body_too_large() {
    let (channel, commands) = StubChannel::new(|_| Ok(sample_result()));
    let handlers = handlers(MemoryResolver::default(), channel);
    let request = b"POST / HTTP/1.0\r\nContent-Length: 99999999\r\n\r\nSELECT 1";

    let stream = exchange(handlers, request).await;
    let (head, _) = split_response(&stream.output);

    assert!(head.starts_with("HTTP/1.0 400 BAD REQUEST\r\n"));
    assert!(commands.lock().unwrap().is_empty());
    assert_eq!(stream.bytes_read(), request.len() - b"SELECT 1".len());
}

#[tokio::test]
async fn test_post_invalid_content_length() {
    let (channel, _) = StubChannel::new(|_| Ok(sample_result()));
    let handlers = handlers(MemoryResolver::default(), channel);

    let stream = exchange(handlers, b"POST / HTTP/1.0\r\nContent-Length: lots\r\n\r\n").await;
    let (head, body) = split_response(&stream.output);

    assert!(head.starts_with("HTTP/1.0 400 BAD REQUEST\r\n"));
    assert_eq!(body, b"invalid Content-Length: \"lots\"");
}

#[tokio::test]
async fn test_request_line_too_long() {
    let request = format!("GET /{} HTTP/1.0\r\n\r\n", "a".repeat(300));

    let stream = exchange(default_handlers(), request.as_bytes()).await;
    let (head, body) = split_response(&stream.output);

    assert!(head.starts_with("HTTP/1.0 400 BAD REQUEST\r\n"));
    assert_eq!(body, b"request line too long");
}
