use anyhow::Result;
use tokio::sync::oneshot;
use tracing::info;
use tracing::warn;

use crate::api::ApiServer;
use crate::config::ServeArgs;

/// Run the HTTP API until Ctrl-C.
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            // Dropping the sender would stop the server.
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl-C, shutting down");
        let _ = shutdown_tx.send(());
    });

    ApiServer::new(args.listen)
        .run(shutdown_rx)
        .await
        .map_err(|e| anyhow::anyhow!("API server failed: {e:?}"))
}
