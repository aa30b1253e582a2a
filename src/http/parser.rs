use crate::http::request::{Method, ParsedRequest};
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Size of each read off the connection.
pub const READ_CHUNK: usize = 1024;

/// Byte patterns that end the request head.
const TERMINATORS: [&[u8]; 2] = [b"\n\n", b"\n\r\n"];

/// Bytes of the previous scan window kept so a terminator split across two
/// reads is still found. One less than the longest terminator.
const SCAN_OVERLAP: usize = 2;

/// Every way a request can fail to parse. All of them are answered with 400.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid request: decoding error")]
    Encoding,
    #[error("invalid request: parsing error")]
    Malformed,
    #[error("invalid request: method error")]
    Method,
    #[error("invalid request: header exceeds {0} bytes")]
    TooLarge(usize),
    #[error("invalid request: connection closed before end of header")]
    Closed,
    #[error("invalid request: {0}")]
    Io(#[from] std::io::Error),
}

/// Decodes a complete request head into a [`ParsedRequest`].
///
/// Only the request line is looked at: method, URL and version are the first
/// three space-separated tokens, and everything after the version is ignored.
pub fn parse_request(buf: &[u8]) -> Result<ParsedRequest, ParseError> {
    let text = std::str::from_utf8(buf).map_err(|_| ParseError::Encoding)?;

    let mut parts = text.splitn(4, ' ');
    let method_str = parts.next().ok_or(ParseError::Malformed)?;
    let url = parts.next().ok_or(ParseError::Malformed)?;
    let _version = parts.next().ok_or(ParseError::Malformed)?;

    let method = Method::from_str(method_str).ok_or(ParseError::Method)?;

    let decoded = urlencoding::decode_binary(url.as_bytes());
    let decoded = String::from_utf8_lossy(&decoded);
    let path = decoded.split('?').next().unwrap_or_default();

    Ok(ParsedRequest::new(method, path))
}

/// Looks for a head terminator in `buf`, starting at `from`.
///
/// Returns the offset just past the first terminator found.
pub fn find_terminator(buf: &[u8], from: usize) -> Option<usize> {
    let window = buf.get(from..)?;
    (0..window.len()).find_map(|i| {
        TERMINATORS
            .iter()
            .find(|t| window[i..].starts_with(t))
            .map(|t| from + i + t.len())
    })
}

/// Reads from `stream` until the request head is complete and parses it.
///
/// The buffer never grows past `max_size` bytes; a head that does not fit is
/// rejected rather than read further.
pub async fn read_request<R>(stream: &mut R, max_size: usize) -> Result<ParsedRequest, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = BytesMut::with_capacity(READ_CHUNK);
    let mut scanned: usize = 0;

    loop {
        let want = READ_CHUNK.min(max_size - buffer.len());
        if want == 0 {
            return Err(ParseError::TooLarge(max_size));
        }

        let mut temp = [0u8; READ_CHUNK];
        let n = stream.read(&mut temp[..want]).await?;
        if n == 0 {
            return Err(ParseError::Closed);
        }
        buffer.extend_from_slice(&temp[..n]);

        if find_terminator(&buffer, scanned.saturating_sub(SCAN_OVERLAP)).is_some() {
            break;
        }
        scanned = buffer.len();
    }

    tracing::debug!(raw = ?String::from_utf8_lossy(&buffer), "Request received");
    parse_request(&buffer)
}
