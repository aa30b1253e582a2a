use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::Config;
use crate::http::parser::read_request;
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;
use crate::static_files::StaticFileHandler;

/// One accepted connection, served for exactly one request.
///
/// The connection is consumed by [`Connection::run`], so the stream is
/// closed when `run` returns, whatever the outcome.
pub struct Connection<S = TcpStream> {
    stream: S,
    config: Arc<Config>,
    handler: Arc<StaticFileHandler>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<Config>, handler: Arc<StaticFileHandler>) -> Self {
        Self {
            stream,
            config,
            handler,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let request = read_request(&mut self.stream, self.config.static_files.max_header_size).await;

        let mut response = ResponseWriter::new(
            &mut self.stream,
            self.handler.content_types(),
            &self.config.server.server_name,
        );

        match request {
            Err(e) => {
                tracing::error!(status = 400, error = %e, "Rejected request");
                response.write_header(StatusCode::BadRequest, 0, "").await?;
            }
            Ok(req) => {
                if let Err(e) = self.handler.handle(&req, &mut response).await {
                    tracing::error!(path = %req.path(), error = %e, "Failed to serve request");
                    if !response.header_sent() {
                        response
                            .write_header(StatusCode::InternalServerError, 0, "")
                            .await?;
                    }
                }

                let status = response.status().map(|s| s.as_u16()).unwrap_or_default();
                tracing::info!(
                    status,
                    method = req.method().as_str(),
                    path = %req.path(),
                    "Request served"
                );
            }
        }

        response.finish().await?;
        self.stream.shutdown().await?;
        Ok(())
    }
}
