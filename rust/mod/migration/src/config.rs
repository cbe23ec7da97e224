//! Repair-sequence settings.
//!
//! Every field has a default matching the 15/16 → 17 upgrade, so an empty
//! file (or no file at all) runs the stock repairs:
//!
//! ```toml
//! [cron]
//! name_pattern = "%FatturaPA%"
//!
//! [edi]
//! module = "l10n_it_edi"
//! record_name = "edi_fatturaPA"
//! format_model = "account.edi.format"
//!
//! [removed_model]
//! model = "project.delete.wizard"
//!
//! [views]
//! model = "res.config.settings"
//! arch_patterns = ["%hasclass('settings')%"]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::MigrationError;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct MigrationConfig {
    pub cron: CronConfig,
    pub edi: EdiConfig,
    pub removed_model: RemovedModelConfig,
    pub views: ViewsConfig,
}

/// Scheduled jobs whose target method no longer exists.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CronConfig {
    /// `LIKE`-style pattern (`%`, `_`) matched case-sensitively against
    /// `ir_cron.cron_name`.
    pub name_pattern: String,
}

impl Default for CronConfig {
    fn default() -> Self {
        Self {
            name_pattern: "%FatturaPA%".to_string(),
        }
    }
}

/// Document formats that must survive the module reload.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EdiConfig {
    /// Module of the one format record always pinned.
    pub module: String,
    /// XML id name of that record.
    pub record_name: String,
    /// `ir_model_data.model` of format records.
    pub format_model: String,
}

impl Default for EdiConfig {
    fn default() -> Self {
        Self {
            module: "l10n_it_edi".to_string(),
            record_name: "edi_fatturaPA".to_string(),
            format_model: "account.edi.format".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemovedModelConfig {
    /// Dotted model name dropped by the target version.
    pub model: String,
}

impl Default for RemovedModelConfig {
    fn default() -> Self {
        Self {
            model: "project.delete.wizard".to_string(),
        }
    }
}

impl RemovedModelConfig {
    /// The model name as it appears inside XML ids (`a.b.c` → `a_b_c`).
    pub fn xml_id_fragment(&self) -> String {
        self.model.replace('.', "_")
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewsConfig {
    /// Only inheriting views of this model are candidates.
    pub model: String,
    /// `LIKE`-style patterns matched case-sensitively against
    /// `ir_ui_view.arch_db`.
    pub arch_patterns: Vec<String>,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            model: "res.config.settings".to_string(),
            arch_patterns: vec![
                "%hasclass('settings')%".to_string(),
                "%hasclass(''settings'')%".to_string(),
                "%@id='account_vendor_bills'%".to_string(),
                "%@id=''account_vendor_bills''%".to_string(),
            ],
        }
    }
}

impl MigrationConfig {
    pub fn from_toml(content: &str) -> Result<Self, MigrationError> {
        toml::from_str(content).map_err(|e| MigrationError::Config(e.to_string()))
    }

    /// Load from `path`, or return the defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, MigrationError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| MigrationError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = MigrationConfig::from_toml("").unwrap();
        assert_eq!(config, MigrationConfig::default());
        assert_eq!(config.views.arch_patterns.len(), 4);
    }

    #[test]
    fn partial_override() {
        let config = MigrationConfig::from_toml(
            r#"
            [cron]
            name_pattern = "%Legacy%"

            [views]
            arch_patterns = ["%old%"]
            "#,
        )
        .unwrap();
        assert_eq!(config.cron.name_pattern, "%Legacy%");
        assert_eq!(config.views.model, "res.config.settings");
        assert_eq!(config.views.arch_patterns, vec!["%old%".to_string()]);
        assert_eq!(config.edi, EdiConfig::default());
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = MigrationConfig::from_toml("[cron\n").unwrap_err();
        assert!(matches!(err, MigrationError::Config(_)));
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MigrationConfig::load(&dir.path().join("none.toml")).unwrap();
        assert_eq!(config, MigrationConfig::default());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"[removed_model]\nmodel = \"x.y.wizard\"\n").unwrap();
        let config = MigrationConfig::load(file.path()).unwrap();
        assert_eq!(config.removed_model.xml_id_fragment(), "x_y_wizard");
    }
}
