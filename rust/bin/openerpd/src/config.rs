//! Server-side configuration file.
//!
//! ```toml
//! [storage]
//! data_dir = "/var/lib/openerp"
//!
//! [sale]
//! price_digits = 2
//! ```

use std::path::{Path, PathBuf};

use sale::SaleConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,

    #[serde(default)]
    pub sale: SaleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `data.sqlite`.
    pub data_dir: String,

    /// Explicit database file, overriding `{data_dir}/data.sqlite`.
    #[serde(default)]
    pub sqlite_path: Option<String>,
}

impl ServerConfig {
    /// A bare name resolves to `/etc/openerp/<name>.toml`; anything that
    /// looks like a path is used as is.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/openerp/{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Storage settings in the shape the stores are opened from.
    pub fn service_config(&self, listen: &str) -> openerp_core::ServiceConfig {
        openerp_core::ServiceConfig {
            data_dir: Some(PathBuf::from(&self.storage.data_dir)),
            sqlite_path: self.storage.sqlite_path.as_ref().map(PathBuf::from),
            listen: listen.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/openerp/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./dev.toml"),
            PathBuf::from("./dev.toml")
        );
    }

    #[test]
    fn test_parse_defaults_sale_section() {
        let config = ServerConfig::parse("[storage]\ndata_dir = \"/data\"\n").unwrap();
        assert_eq!(config.sale, SaleConfig::default());
        assert_eq!(
            config.service_config("127.0.0.1:1").resolve_sqlite_path(),
            PathBuf::from("/data/data.sqlite")
        );
    }

    #[test]
    fn test_parse_overrides() {
        let config = ServerConfig::parse(
            r#"
            [storage]
            data_dir = "/data"
            sqlite_path = "/db/erp.sqlite"

            [sale]
            price_digits = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.sale.price_digits, 4);
        assert_eq!(
            config.service_config("0.0.0.0:8080").resolve_sqlite_path(),
            PathBuf::from("/db/erp.sqlite")
        );
    }

    #[test]
    fn test_missing_storage_is_error() {
        assert!(ServerConfig::parse("[sale]\nprice_digits = 2\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("erp.toml");
        std::fs::write(&path, "[storage]\ndata_dir = \"/srv/erp\"\n").unwrap();
        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.storage.data_dir, "/srv/erp");
    }
}
