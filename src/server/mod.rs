//! Listening socket and worker pool
//!
//! The server binds one listening socket and hands it to a fixed number of
//! workers, each running its own accept loop against it.

pub mod listener;
pub mod worker;

pub use listener::{Server, ServerError};
pub use worker::Worker;
