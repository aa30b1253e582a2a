use harbor::http::parser::{ParseError, find_terminator, parse_request, read_request};
use harbor::http::request::Method;

#[test]
fn test_parse_simple_get_request() {
    let parsed = parse_request(b"GET /index.html HTTP/1.1\n\n").unwrap();

    assert_eq!(parsed.method(), Method::GET);
    assert_eq!(parsed.path(), "/index.html");
}

#[test]
fn test_parse_head_request_with_headers() {
    let req = b"HEAD /style.css HTTP/1.1\r\nHost: example.com\r\nAccept: */*\r\n\r\n";
    let parsed = parse_request(req).unwrap();

    assert_eq!(parsed.method(), Method::HEAD);
    assert_eq!(parsed.path(), "/style.css");
}

#[test]
fn test_parse_strips_query_string() {
    let parsed = parse_request(b"GET /search.html?q=rust&page=2 HTTP/1.1\n\n").unwrap();

    assert_eq!(parsed.path(), "/search.html");
}

#[test]
fn test_parse_percent_decodes_path() {
    let parsed = parse_request(b"GET /my%20file.html HTTP/1.1\n\n").unwrap();

    assert_eq!(parsed.path(), "/my file.html");
}

#[test]
fn test_parse_decodes_before_stripping_query() {
    // An encoded '?' still ends the path once decoded.
    let parsed = parse_request(b"GET /a%3Fb.html HTTP/1.1\n\n").unwrap();

    assert_eq!(parsed.path(), "/a");
}

#[test]
fn test_parse_invalid_percent_sequence_is_lossy() {
    let parsed = parse_request(b"GET /%FF.html HTTP/1.1\n\n").unwrap();

    assert_eq!(parsed.path(), "/\u{FFFD}.html");
}

#[test]
fn test_parse_rejects_other_methods() {
    for method in ["POST", "PUT", "DELETE", "OPTIONS", "PATCH", "get", "Head"] {
        let req = format!("{} / HTTP/1.1\n\n", method);
        let result = parse_request(req.as_bytes());

        assert!(
            matches!(result, Err(ParseError::Method)),
            "{method} should be rejected"
        );
    }
}

#[test]
fn test_parse_too_few_tokens() {
    assert!(matches!(
        parse_request(b"GET /\n\n"),
        Err(ParseError::Malformed)
    ));
    assert!(matches!(parse_request(b"\n\n"), Err(ParseError::Malformed)));
}

#[test]
fn test_parse_invalid_utf8() {
    let result = parse_request(b"GET /\xff\xfe HTTP/1.1\n\n");

    assert!(matches!(result, Err(ParseError::Encoding)));
}

#[test]
fn test_parse_error_messages() {
    assert_eq!(ParseError::Method.to_string(), "invalid request: method error");
    assert_eq!(ParseError::Malformed.to_string(), "invalid request: parsing error");
}

#[test]
fn test_find_terminator_variants() {
    assert_eq!(find_terminator(b"GET / HTTP/1.1\n\n", 0), Some(16));
    assert_eq!(find_terminator(b"GET / HTTP/1.1\r\n\r\n", 0), Some(18));
    assert_eq!(find_terminator(b"GET / HTTP/1.1\r\n", 0), None);
}

#[tokio::test]
async fn test_read_request_from_stream() {
    let mut stream: &[u8] = b"GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n";
    let parsed = read_request(&mut stream, 8192).await.unwrap();

    assert_eq!(parsed.method(), Method::GET);
    assert_eq!(parsed.path(), "/index.html");
}

#[tokio::test]
async fn test_read_request_terminator_split_across_reads() {
    let mut raw = b"GET /page.html HTTP/1.1\r\nX-Pad: ".to_vec();
    raw.resize(1023, b'a');
    raw.push(b'\n');
    raw.push(b'\n');
    assert_eq!(raw.len(), 1025);

    let mut stream: &[u8] = &raw;
    let parsed = read_request(&mut stream, 8192).await.unwrap();

    assert_eq!(parsed.path(), "/page.html");
}

#[tokio::test]
async fn test_read_request_too_large() {
    let mut raw = b"GET / HTTP/1.1\r\nX-Pad: ".to_vec();
    raw.resize(10_000, b'a');

    let mut stream: &[u8] = &raw;
    let result = read_request(&mut stream, 4096).await;

    assert!(matches!(result, Err(ParseError::TooLarge(4096))));
}

#[tokio::test]
async fn test_read_request_closed_before_terminator() {
    let mut stream: &[u8] = b"GET / HTTP/1.1\r\nHost: localhost\r\n";
    let result = read_request(&mut stream, 8192).await;

    assert!(matches!(result, Err(ParseError::Closed)));
}
