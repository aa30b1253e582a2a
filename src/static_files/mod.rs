//! Static file serving
//!
//! This module resolves request paths under the document root and writes
//! the matching file, or the right error status, back to the client.

pub mod handler;
pub mod resolve;

pub use handler::StaticFileHandler;
pub use resolve::{Resolution, resolve};
