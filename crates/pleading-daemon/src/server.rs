//! Server lifecycle management

use crate::api::rest::{create_router, AppState};
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use crate::render::MiniJinjaRenderer;
use crate::storage::{SessionStore, SessionSweeper};
use crate::workflow::StepDispatcher;
use pleading_adapters::{LocalDriveAdapter, StaticTemplateCatalog};
use pleading_core::DocumentStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Main server
pub struct Server {
    config: Arc<DaemonConfig>,
    sessions: Arc<SessionStore>,
    state: AppState,
}

impl Server {
    /// Wire the default collaborators from configuration
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let config = Arc::new(config);
        let sessions = Arc::new(SessionStore::new(config.sessions.ttl()));

        let drive = Arc::new(LocalDriveAdapter::new(config.drive.root.clone()));
        let catalog = Arc::new(StaticTemplateCatalog::default());
        let dispatcher = Arc::new(StepDispatcher::new(sessions.clone(), drive, catalog));

        let renderer = MiniJinjaRenderer::new()
            .map_err(|e| DaemonError::Config(format!("Invalid page template: {}", e)))?;

        let documents = DocumentStore::new(config.documents.save_dir.clone())
            .with_legacy_stamps(config.documents.legacy_stamps.clone())
            .with_defaults(
                config.documents.default_client.clone(),
                config.documents.default_document_type.clone(),
            );

        let state = AppState::new(
            dispatcher,
            Arc::new(renderer),
            Arc::new(documents),
            config.clone(),
        );

        Ok(Self {
            config,
            sessions,
            state,
        })
    }

    /// Run the server until a shutdown signal arrives
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sweeper =
            SessionSweeper::new(self.sessions.clone(), self.config.sessions.sweep_interval())
                .spawn(shutdown_rx);

        // Create router
        let app = create_router(self.state);

        // Create listener
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Pleading daemon listening on {}", addr);
        tracing::info!(
            drive_root = %self.config.drive.root.display(),
            save_dir = %self.config.documents.save_dir.display(),
            "Serving case files"
        );

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Pleading daemon shutting down");

        // Stop sweeper
        let _ = shutdown_tx.send(true);
        if let Err(e) = sweeper.await {
            tracing::warn!(error = %e, "Session sweeper did not stop cleanly");
        }

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
