//! `openerpd` — the OpenERP server binary.
//!
//! Usage:
//!   openerpd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/openerp/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use openerp_core::Module;
use tracing::info;

use config::ServerConfig;

/// OpenERP server.
#[derive(Parser, Debug)]
#[command(name = "openerpd", about = "OpenERP server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides default 0.0.0.0:8080).
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    bootstrap::verify_config(&server_config)?;

    // Shared SQL store for all modules.
    let core_config = server_config.service_config(&cli.listen);
    let sql = bootstrap::open_store(&core_config)?;

    let sale_store = sale::store::SaleLineStore::new(Arc::clone(&sql), server_config.sale.clone())?;
    let sale_module = sale::SaleModule::new(sale_store);
    info!("Sale module initialized");

    let timesheet_store = timesheet::store::TimesheetStore::new(Arc::clone(&sql))?;
    let timesheet_module = timesheet::TimesheetModule::new(timesheet_store);
    info!("Timesheet module initialized");

    let module_routes = vec![
        (sale_module.name(), sale_module.routes()),
        (timesheet_module.name(), timesheet_module.routes()),
    ];
    let app = routes::build_router(module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("OpenERP server listening on {}", core_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
