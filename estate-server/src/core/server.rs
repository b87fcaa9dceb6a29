//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::api::build_app;
use crate::core::{Config, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Bind `0.0.0.0:{http_port}` and serve until Ctrl-C.
    pub async fn run(&self) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("🏢 Estate Server listening on {}", addr);
        self.serve(listener).await
    }

    /// Serve on an already bound listener (tests bind port 0).
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        let app = build_app(self.state.clone());

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
