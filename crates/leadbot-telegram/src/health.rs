//! Liveness listener for hosting platforms that require a bound port.

use axum::Router;
use tracing::info;

use crate::error::Result;

/// Body returned by every request.
pub const ALIVE_BODY: &str = "OK";

async fn alive() -> &'static str {
    ALIVE_BODY
}

/// Router answering `200 OK` on any path.
pub fn create_router() -> Router {
    Router::new().fallback(alive)
}

/// Serve the liveness endpoint until the process exits.
pub async fn serve(addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Health probe listening on {}", addr);
    axum::serve(listener, create_router()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_root_is_alive() {
        let server = TestServer::new(create_router()).unwrap();

        let response = server.get("/").await;

        response.assert_status_ok();
        response.assert_text(ALIVE_BODY);
    }

    #[tokio::test]
    async fn test_any_path_is_alive() {
        let server = TestServer::new(create_router()).unwrap();

        let response = server.get("/healthz/deep").await;

        response.assert_status_ok();
        response.assert_text(ALIVE_BODY);
    }

    #[tokio::test]
    async fn test_port_in_use_is_io_error() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap().to_string();

        let err = serve(&addr).await.unwrap_err();
        assert!(matches!(err, BotError::Io(_)));
    }
}
