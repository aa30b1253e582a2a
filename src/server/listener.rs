use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::server::worker::Worker;
use crate::static_files::StaticFileHandler;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("document root {path} is not usable: {source}")]
    Root {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("server not started")]
    NotStarted,
    #[error("server already started")]
    AlreadyStarted,
}

/// Owns the listening socket and the worker pool sharing it.
pub struct Server {
    config: Arc<Config>,
    workers: Vec<Worker>,
    local_addr: Option<SocketAddr>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            workers: Vec::new(),
            local_addr: None,
        }
    }

    /// Binds the listening socket and starts the workers.
    ///
    /// Returns the bound address. The server keeps no reference to the
    /// socket afterwards; it stays open for as long as a worker holds it.
    pub async fn spawn(&mut self) -> Result<SocketAddr, ServerError> {
        if !self.workers.is_empty() {
            return Err(ServerError::AlreadyStarted);
        }

        let static_cfg = &self.config.static_files;
        let handler = StaticFileHandler::from_config(static_cfg).map_err(|source| {
            ServerError::Root {
                path: static_cfg.root.clone(),
                source,
            }
        })?;
        let handler = Arc::new(handler);

        let addr = &self.config.server.listen_addr;
        let bind_err = |source| ServerError::Bind {
            addr: addr.clone(),
            source,
        };
        let listener = TcpListener::bind(addr).await.map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;
        info!(
            root = %handler.root().display(),
            workers = self.config.server.workers,
            "Listening on {}",
            local_addr
        );

        let listener = Arc::new(listener);
        self.workers = (0..self.config.server.workers)
            .map(|id| {
                Worker::start(
                    id,
                    listener.clone(),
                    self.config.clone(),
                    handler.clone(),
                )
            })
            .collect();
        self.local_addr = Some(local_addr);

        Ok(local_addr)
    }

    /// Waits until every worker has exited.
    pub async fn join(&mut self) -> Result<(), ServerError> {
        if self.workers.is_empty() {
            return Err(ServerError::NotStarted);
        }
        for worker in &mut self.workers {
            worker.join().await;
        }
        Ok(())
    }

    /// Binds, starts the workers and blocks until all of them exit.
    pub async fn start(&mut self) -> Result<(), ServerError> {
        self.spawn().await?;
        self.join().await
    }

    /// Terminates every worker and waits for each to exit.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        if self.workers.is_empty() {
            return Err(ServerError::NotStarted);
        }
        for worker in &self.workers {
            worker.terminate();
        }
        self.join().await
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }
}
