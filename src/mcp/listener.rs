//! Streamable HTTP listener runtime.
//!
//! Hosts the MCP Streamable HTTP transport at [`MCP_PATH`], one rmcp session
//! per `Mcp-Session-Id`, all sharing the same [`SchoolDiggerServer`]. Used when
//! the process is started with `--http` instead of speaking MCP over stdio.

use std::net::SocketAddr;

use anyhow::Result;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::mcp::SchoolDiggerServer;

/// Route the MCP endpoint is mounted on.
pub const MCP_PATH: &str = "/mcp";

/// A running listener. Dropping the handle also stops the server.
pub struct ListenerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<()>>,
}

impl ListenerHandle {
    /// The bound address, useful when binding to port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Full URL of the MCP endpoint.
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, MCP_PATH)
    }

    /// Resolves when the server stops on its own, which only happens on a
    /// fatal error.
    pub async fn stopped(&mut self) -> Result<()> {
        (&mut self.task).await?
    }

    /// Close every open session and stop the server.
    pub async fn shutdown(mut self) -> Result<()> {
        tracing::info!("Stopping MCP HTTP listener (addr={})", self.addr);
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task.await?
    }
}

/// Bind `addr` and start serving MCP over Streamable HTTP in the background.
///
/// `addr` may be anything tokio can resolve, so `("localhost", 8080)` works
/// as well as a literal socket address.
pub async fn start_listener(
    addr: impl ToSocketAddrs,
    server: SchoolDiggerServer,
) -> Result<ListenerHandle> {
    let listener = TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Binding MCP HTTP listener at {}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(run_listener(listener, server, shutdown_rx, addr));

    Ok(ListenerHandle {
        addr,
        shutdown: Some(shutdown_tx),
        task,
    })
}

async fn run_listener(
    listener: TcpListener,
    server: SchoolDiggerServer,
    shutdown: oneshot::Receiver<()>,
    addr: SocketAddr,
) -> Result<()> {
    let sessions = CancellationToken::new();
    let config = StreamableHttpServerConfig {
        cancellation_token: sessions.child_token(),
        ..Default::default()
    };
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        config,
    );
    let router = axum::Router::new().nest_service(MCP_PATH, service);

    tracing::info!("MCP HTTP listener running (url=http://{}{})", addr, MCP_PATH);

    // axum retries transient accept errors itself; only a fatal error
    // ends `serve` early.
    let result = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            // A dropped sender counts as a shutdown request.
            let _ = shutdown.await;
            tracing::info!("MCP HTTP listener shutting down");
            sessions.cancel();
        })
        .await;

    if let Err(err) = &result {
        tracing::error!("MCP HTTP listener error: {err}");
    }
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientConfig, Credentials, SchoolDiggerClient};

    fn server() -> SchoolDiggerServer {
        let client = SchoolDiggerClient::new(
            Credentials::new("id", "key").unwrap(),
            ClientConfig::default(),
        )
        .unwrap();
        SchoolDiggerServer::new(client)
    }

    #[tokio::test]
    async fn binds_host_names_not_just_socket_addresses() {
        let handle = start_listener(("localhost", 0), server()).await.unwrap();
        assert!(handle.local_addr().ip().is_loopback());
        assert_ne!(handle.local_addr().port(), 0);
        assert!(handle.url().ends_with("/mcp"));
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn bind_failure_is_reported_at_start() {
        let first = start_listener(("127.0.0.1", 0), server()).await.unwrap();
        let taken = first.local_addr();
        assert!(start_listener(taken, server()).await.is_err());
        first.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn dropping_the_handle_stops_the_server() {
        let handle = start_listener(("127.0.0.1", 0), server()).await.unwrap();
        let addr = handle.local_addr();
        let ListenerHandle { shutdown, task, .. } = handle;
        drop(shutdown);
        task.await.unwrap().unwrap();
        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }
}
