use harbor::config::Config;
use harbor::server::{Server, ServerError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let mut server = Server::new(cfg);

    let interrupted = tokio::select! {
        res = server.start() => {
            if let Err(e) = res {
                tracing::error!(error = %e, "Server failed");
                return Err(e.into());
            }
            false
        }

        _ = tokio::signal::ctrl_c() => true,
    };

    if interrupted {
        tracing::info!("Shutdown signal received");
        match server.stop().await {
            Ok(()) | Err(ServerError::NotStarted) => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
