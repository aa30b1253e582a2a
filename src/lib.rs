//! Harbor - Static File Server
//!
//! Core library for request parsing, response framing and file serving.

pub mod config;
pub mod http;
pub mod server;
pub mod static_files;
