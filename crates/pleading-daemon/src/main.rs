//! pleadingd - complaint assembly workflow service
//!
//! Serves the four-step HTMX workflow that walks a user from a drive case
//! folder to a reviewed, editable complaint.

use clap::Parser;
use pleading_daemon::error::{DaemonError, DaemonResult};
use pleading_daemon::{DaemonConfig, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pleading daemon CLI
#[derive(Parser)]
#[command(name = "pleadingd")]
#[command(about = "Complaint assembly workflow service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PLEADING_CONFIG")]
    config: Option<String>,

    /// Listen address, overrides the configuration file
    #[arg(short, long, env = "PLEADING_LISTEN_ADDR")]
    listen: Option<String>,

    /// Directory served as the drive root
    #[arg(long, env = "PLEADING_DRIVE_ROOT")]
    drive_root: Option<String>,

    /// Directory for saved documents
    #[arg(long, env = "PLEADING_SAVE_DIR")]
    save_dir: Option<String>,

    /// Log level
    #[arg(long, env = "PLEADING_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "PLEADING_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(root) = cli.drive_root {
        config.drive.root = root.into();
    }
    if let Some(dir) = cli.save_dir {
        config.documents.save_dir = dir.into();
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.logging.json |= cli.json;

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Print startup banner
    println!(
        r#"
  pleadingd - complaint workflow
  Version:   {}
  Listening: {}
  Drive:     {}
  Documents: {}
"#,
        env!("CARGO_PKG_VERSION"),
        config.server.listen_addr,
        config.drive.root.display(),
        config.documents.save_dir.display()
    );

    // Create and run server
    Server::new(config)?.run().await
}
