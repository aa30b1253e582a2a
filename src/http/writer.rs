use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::mime::ContentTypes;
use crate::http::response::StatusCode;

const HTTP_VERSION: &str = "HTTP/1.1";

/// strftime layout of the `Date` header.
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("header not sent")]
    HeaderNotSent,
    #[error("header already sent")]
    HeaderAlreadySent,
    #[error("response already finished")]
    Finished,
    #[error("content type error: {0:?} is not registered")]
    ContentType(String),
    #[error("content length error: {attempted} more bytes with {remaining} left of {declared}")]
    ContentLength {
        declared: u64,
        remaining: u64,
        attempted: u64,
    },
    #[error("body ended after {written} of {expected} bytes")]
    Truncated { expected: u64, written: u64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Where a response is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Fresh,
    HeaderSent,
    BodyInProgress,
    Done,
}

/// Writes one response onto a connection.
///
/// The header goes out first and exactly once. Body bytes are counted
/// against the `Content-Length` declared in the header, and a write that
/// would go past it is refused before anything reaches the stream.
pub struct ResponseWriter<'a, W> {
    stream: &'a mut W,
    content_types: &'a ContentTypes,
    server_name: &'a str,
    state: WriterState,
    status: Option<StatusCode>,
    content_length: u64,
    remaining: u64,
}

fn serialize_header(
    status: StatusCode,
    server_name: &str,
    entity: Option<(u64, &str)>,
) -> Vec<u8> {
    let date = chrono::Utc::now().format(HTTP_DATE_FORMAT);

    let mut head = format!(
        "{} {} {}\r\nServer: {}\r\nDate: {}\r\nConnection: Close\r\n",
        HTTP_VERSION,
        status.as_u16(),
        status.reason_phrase(),
        server_name,
        date,
    );

    if let Some((content_length, content_type)) = entity {
        head.push_str(&format!(
            "Content-Length: {}\r\nContent-Type: {}\r\n",
            content_length, content_type
        ));
    }

    // Header/body separator
    head.push_str("\r\n");
    head.into_bytes()
}

impl<'a, W> ResponseWriter<'a, W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(stream: &'a mut W, content_types: &'a ContentTypes, server_name: &'a str) -> Self {
        Self {
            stream,
            content_types,
            server_name,
            state: WriterState::Fresh,
            status: None,
            content_length: 0,
            remaining: 0,
        }
    }

    /// Sends the status line and headers.
    ///
    /// 2xx responses carry `Content-Length` and `Content-Type`, and the
    /// content type must be registered. Other statuses get the reduced header
    /// set and the length and type are not emitted.
    pub async fn write_header(
        &mut self,
        status: StatusCode,
        content_length: u64,
        content_type: &str,
    ) -> Result<(), WriteError> {
        if self.state != WriterState::Fresh {
            return Err(WriteError::HeaderAlreadySent);
        }

        let entity = if status.is_success() {
            if !self.content_types.is_registered(content_type) {
                return Err(WriteError::ContentType(content_type.to_string()));
            }
            Some((content_length, content_type))
        } else {
            None
        };

        let head = serialize_header(status, self.server_name, entity);
        self.stream.write_all(&head).await?;

        self.status = Some(status);
        self.content_length = content_length;
        self.remaining = content_length;
        self.state = WriterState::HeaderSent;
        Ok(())
    }

    /// Writes part of the body.
    pub async fn write(&mut self, data: &[u8]) -> Result<(), WriteError> {
        self.check_body_allowed()?;

        let attempted = data.len() as u64;
        if attempted > self.remaining {
            return Err(WriteError::ContentLength {
                declared: self.content_length,
                remaining: self.remaining,
                attempted,
            });
        }

        self.stream.write_all(data).await?;
        self.remaining -= attempted;
        self.state = WriterState::BodyInProgress;
        Ok(())
    }

    /// Streams the rest of the body from `file`.
    ///
    /// Copies at most the bytes still owed under the declared length, so a
    /// file that grew after its size was taken cannot overrun the header. A
    /// file that ends early is reported as truncated.
    pub async fn write_file<R>(&mut self, file: R) -> Result<u64, WriteError>
    where
        R: AsyncRead + Unpin,
    {
        self.check_body_allowed()?;

        let expected = self.remaining;
        let mut limited = file.take(expected);
        let written = tokio::io::copy(&mut limited, &mut *self.stream).await?;

        self.remaining -= written;
        self.state = WriterState::BodyInProgress;

        if written < expected {
            return Err(WriteError::Truncated { expected, written });
        }
        Ok(written)
    }

    /// Flushes the stream. No further writes are accepted.
    pub async fn finish(&mut self) -> Result<(), WriteError> {
        self.stream.flush().await?;
        self.state = WriterState::Done;
        Ok(())
    }

    /// Status from the last `write_header`, if one was sent.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn header_sent(&self) -> bool {
        self.state != WriterState::Fresh
    }

    /// Body bytes still owed under the declared content length.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    fn check_body_allowed(&self) -> Result<(), WriteError> {
        match self.state {
            WriterState::Fresh => Err(WriteError::HeaderNotSent),
            WriterState::Done => Err(WriteError::Finished),
            WriterState::HeaderSent | WriterState::BodyInProgress => Ok(()),
        }
    }
}
