//! Accept loop run by each worker.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{error, info};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::static_files::StaticFileHandler;

/// A task running its own accept loop over the shared listener.
///
/// Connections accepted by one worker are served one at a time. Each is run
/// in a task of its own so a panic while serving it is contained to that
/// connection.
pub struct Worker {
    id: usize,
    handle: Option<JoinHandle<()>>,
    abort: AbortHandle,
}

/// Aborts the wrapped task when dropped, so a terminated worker does not
/// leave its in-flight connection behind.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl Worker {
    pub fn start(
        id: usize,
        listener: Arc<TcpListener>,
        config: Arc<Config>,
        handler: Arc<StaticFileHandler>,
    ) -> Self {
        let handle = tokio::spawn(accept_loop(id, listener, config, handler));
        let abort = handle.abort_handle();

        Self {
            id,
            handle: Some(handle),
            abort,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Stops the worker wherever it is, including mid-request.
    pub fn terminate(&self) {
        self.abort.abort();
    }

    /// Waits for the worker to exit.
    pub async fn join(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };

        let result = handle.await;
        self.handle = None;

        match result {
            Ok(()) => info!(worker = self.id, "Worker exited"),
            Err(e) if e.is_cancelled() => info!(worker = self.id, "Worker terminated"),
            Err(e) => error!(worker = self.id, error = %e, "Worker panicked"),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

async fn accept_loop(
    id: usize,
    listener: Arc<TcpListener>,
    config: Arc<Config>,
    handler: Arc<StaticFileHandler>,
) {
    info!(worker = id, "Worker started");

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(worker = id, error = %e, "Accept failed, worker exiting");
                return;
            }
        };

        let conn = Connection::new(socket, config.clone(), handler.clone());
        serve(id, peer, conn).await;
    }
}

async fn serve(id: usize, peer: SocketAddr, conn: Connection) {
    let task = tokio::spawn(conn.run());
    let _guard = AbortOnDrop(task.abort_handle());

    match task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(worker = id, %peer, error = %e, "Connection error"),
        Err(e) if e.is_panic() => error!(worker = id, %peer, "Connection task panicked"),
        Err(e) => error!(worker = id, %peer, error = %e, "Connection task failed"),
    }
}
