//! Shared utilities for server integration tests.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use url_router::config::parse_config;
use url_router::{RouteServer, RouterConfig};

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub updates: mpsc::UnboundedSender<RouterConfig>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    /// Start a server for the TOML route table in `config`.
    pub async fn start(config: &str) -> Self {
        let config = parse_config(config).expect("test config must be valid");
        let server = RouteServer::new(&config).expect("test routes must build");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (updates, rx) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(server.run(listener, rx, async {
            let _ = shutdown_rx.await;
        }));

        Self {
            addr,
            updates,
            shutdown: Some(shutdown),
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger graceful shutdown and wait for the server task.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}
