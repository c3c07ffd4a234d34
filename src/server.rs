use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{error, info};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::core_network::network;

/// The FTP server: owns the control listener and the per-connection
/// registry. Sessions are fully isolated; the registry exists only for
/// bookkeeping and its lock is scoped strictly to insert and remove.
pub struct FtpServer {
    config: Arc<Config>,
    listener: TcpListener,
    sessions: Arc<Mutex<HashMap<SocketAddr, DateTime<Utc>>>>,
}

impl FtpServer {
    /// Validates the configured root directory and binds the control
    /// listener. The root is canonicalized so every virtual path
    /// resolves under one absolute base.
    pub async fn bind(mut config: Config) -> Result<Self> {
        let root = PathBuf::from(&config.server.root_dir)
            .canonicalize()
            .with_context(|| format!("cannot access root directory: {}", config.server.root_dir))?;
        anyhow::ensure!(
            root.is_dir(),
            "root path is not a directory: {}",
            root.display()
        );
        config.server.root_dir = root.to_string_lossy().into_owned();

        let listener = TcpListener::bind(("0.0.0.0", config.server.listen_port))
            .await
            .with_context(|| format!("failed to listen on port {}", config.server.listen_port))?;
        info!(
            "FTP server listening on port {}, serving directory: {}",
            listener.local_addr()?.port(),
            config.server.root_dir
        );

        Ok(Self {
            config: Arc::new(config),
            listener,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// The address the control listener is bound to. Useful when the
    /// configured port was 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts control connections forever, one task per session.
    /// A failing session never affects the others.
    pub async fn serve(self) -> Result<()> {
        loop {
            let (socket, addr) = self.listener.accept().await?;
            info!("New connection from {}", addr);

            self.sessions.lock().await.insert(addr, Utc::now());

            let config = Arc::clone(&self.config);
            let sessions = Arc::clone(&self.sessions);
            tokio::spawn(async move {
                if let Err(e) = network::handle_connection(socket, config).await {
                    error!("Connection error for {}: {:?}", addr, e);
                }
                sessions.lock().await.remove(&addr);
                info!("Connection from {} closed", addr);
            });
        }
    }
}

/// Binds and serves with the given configuration.
pub async fn run(config: Config) -> Result<()> {
    FtpServer::bind(config).await?.serve().await
}
