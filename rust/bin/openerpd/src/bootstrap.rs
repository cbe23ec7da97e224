//! Bootstrap — first-start checks and storage setup.

use std::sync::Arc;

use openerp_sql::{SQLStore, SqliteStore};
use tracing::info;

use crate::config::ServerConfig;

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    config
        .sale
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid [sale] section: {}", e))?;
    Ok(())
}

/// Create the data directory and open the shared SQL store.
pub fn open_store(config: &openerp_core::ServiceConfig) -> anyhow::Result<Arc<dyn SQLStore>> {
    if let Some(dir) = &config.data_dir {
        std::fs::create_dir_all(dir)?;
    }
    let path = config.resolve_sqlite_path();
    let store = SqliteStore::open(&path)
        .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?;
    info!("SQL store opened at {}", path.display());
    Ok(Arc::new(store))
}
