use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tinkerdb_core::config::ConfigError;
use tinkerdb_core::logging::{init_logging_with_config, LogConfig};
use tinkerdb_core::metrics::install_prometheus_exporter;
use tinkerdb_core::shutdown::{install_signal_handlers, ShutdownCoordinator};
use tinkerdb_core::{Config, TenantRegistry};
use tracing::info;

/// TinkerDB multi-tenant key-value server
#[derive(Parser, Debug)]
#[command(name = "tinkerdb-server", version, about)]
struct Args {
    /// TOML configuration file; TINKERDB_* variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the configuration
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Port to listen on, keeping the configured host
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Enable JSON structured logging
    #[arg(long)]
    json_logs: bool,
}

/// Layer defaults, the config file, `TINKERDB_*` variables and flags, in
/// that order, and validate the result once.
fn resolve_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = Config::load(args.config.as_deref())?;

    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.server.bind_address.set_port(port);
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.to_lowercase();
    }
    if args.json_logs {
        config.logging.json_format = true;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = resolve_config(&args)?;

    init_logging_with_config(LogConfig::try_from(&config.logging)?)?;

    if config.metrics.enabled {
        install_prometheus_exporter(config.metrics.bind_address)?;
        info!("Prometheus metrics on http://{}/metrics", config.metrics.bind_address);
    }

    info!("TinkerDB server starting on {}", config.server.bind_address);

    let store = Arc::new(TenantRegistry::new());
    let shutdown = Arc::new(ShutdownCoordinator::new());
    install_signal_handlers(shutdown.clone());

    tinkerdb_api::serve(&config.server, store, shutdown).await?;

    Ok(())
}
