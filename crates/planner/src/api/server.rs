use error_stack::Report;
use poem::get;
use poem::listener::TcpListener;
use poem::middleware::Tracing;
use poem::post;
use poem::Endpoint;
use poem::EndpointExt;
use poem::Route;
use poem::Server;
use tokio::sync::oneshot;
use tracing::error;
use tracing::info;

use super::errors::ApiError;
use super::handlers;

/// Routes served by [`ApiServer`], without binding a listener.
pub fn routes() -> impl Endpoint {
    Route::new()
        .at("/v1/estimate", post(handlers::estimate))
        .at("/v1/manifest", post(handlers::manifest))
        .at("/v1/plan", post(handlers::plan))
        .at("/v1/catalog", get(handlers::catalog))
        .at("/healthz", get(handlers::healthz))
        .with(Tracing)
}

/// HTTP API server for the planner
pub struct ApiServer {
    listen_addr: String,
}

impl ApiServer {
    pub fn new(listen_addr: String) -> Self {
        Self { listen_addr }
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    /// Serve until the server fails or `shutdown_rx` fires.
    ///
    /// # Errors
    ///
    /// - [`ApiError::BindFailed`] if the listen address cannot be bound
    /// - [`ApiError::ServerError`] if the server stops with an error
    pub async fn run(self, mut shutdown_rx: oneshot::Receiver<()>) -> Result<(), Report<ApiError>> {
        info!("Starting HTTP API server on {}", self.listen_addr);

        let listener = TcpListener::bind(self.listen_addr.clone());
        let server = Server::new(listener);

        tokio::select! {
            result = server.run(routes()) => {
                match result {
                    Ok(()) => {
                        info!("API server stopped normally");
                        Ok(())
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::AddrInUse
                        || e.kind() == std::io::ErrorKind::AddrNotAvailable
                        || e.kind() == std::io::ErrorKind::PermissionDenied =>
                    {
                        error!("API server failed to bind: {e}");
                        Err(Report::new(e).change_context(ApiError::BindFailed {
                            listen_addr: self.listen_addr,
                        }))
                    }
                    Err(e) => {
                        error!("API server failed: {e}");
                        Err(Report::new(ApiError::ServerError {
                            message: format!("Server failed: {e}"),
                        }))
                    }
                }
            }
            _ = &mut shutdown_rx => {
                info!("API server shutdown requested");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn api_server_keeps_listen_address() {
        for addr in ["0.0.0.0:8080", "127.0.0.1:3000", "[::1]:8080"] {
            let server = ApiServer::new(addr.to_string());
            assert_eq!(server.listen_addr(), addr);
        }
    }

    #[tokio::test]
    async fn api_server_stops_on_shutdown() {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        shutdown_tx.send(()).unwrap();

        let result = ApiServer::new("127.0.0.1:0".to_string())
            .run(shutdown_rx)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn api_server_reports_bind_failure() {
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = occupied.local_addr().unwrap().to_string();
        let (_shutdown_tx, shutdown_rx) = oneshot::channel();

        let err = ApiServer::new(addr.clone())
            .run(shutdown_rx)
            .await
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            ApiError::BindFailed { listen_addr } if *listen_addr == addr
        ));
    }
}
