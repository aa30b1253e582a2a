//! HTTP protocol implementation.
//!
//! This module implements the HTTP/1.1 subset a static file server needs:
//! one request per connection, `GET` and `HEAD` only, no request bodies.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: Serves one accepted connection from request to close
//! - **`parser`**: Reads the request head off the wire and decodes the request line
//! - **`request`**: The parsed request (method and decoded path)
//! - **`response`**: Status codes and reason phrases
//! - **`writer`**: Frames the response and enforces the declared content length
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Response Writer State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │    Fresh    │ ← Nothing written yet
//!        └──────┬──────┘
//!               │ write_header
//!               ▼
//!        ┌──────────────────┐
//!        │   HeaderSent     │ ← Status line and headers on the wire
//!        └──────┬───────────┘
//!               │ write / write_file
//!               ▼
//!        ┌──────────────────┐
//!        │ BodyInProgress   │ ← Body bytes counted against Content-Length
//!        └──────┬───────────┘
//!               │ finish
//!               ▼
//!        ┌──────────────────┐
//!        │      Done        │ ← Connection is closed
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use harbor::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! let listener = TcpListener::bind("127.0.0.1:8080").await?;
//! loop {
//!     let (socket, _addr) = listener.accept().await?;
//!     Connection::new(socket, config.clone(), handler.clone()).run().await?;
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
