use openerp_sql::{SQLStore, Value, in_transaction};
use serde::Serialize;
use tracing::info;

use crate::config::MigrationConfig;
use crate::error::MigrationError;
use crate::steps::STEPS;

/// Version of the `base` module these repairs prepare the database for.
pub const TARGET_VERSION: &str = "17.0.1.3";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StepReport {
    pub name: &'static str,
    pub skipped: bool,
    pub affected: u64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MigrationReport {
    pub steps: Vec<StepReport>,
}

impl MigrationReport {
    pub fn total_affected(&self) -> u64 {
        self.steps.iter().map(|s| s.affected).sum()
    }
}

/// Installed version of the `base` module, read from `ir_module_module`.
/// `None` on a database without that table or without `base` installed.
pub fn detect_installed_version(db: &dyn SQLStore) -> Result<Option<String>, MigrationError> {
    if !db.table_exists("ir_module_module")? {
        return Ok(None);
    }
    let rows = db.query(
        "SELECT latest_version FROM ir_module_module WHERE name = ?1 AND state = 'installed'",
        &[Value::Text("base".to_string())],
    )?;
    Ok(rows
        .first()
        .and_then(|r| r.get_str("latest_version"))
        .filter(|v| !v.is_empty())
        .map(str::to_string))
}

/// Run every repair step in order on `db`, which must already be inside the
/// caller's transaction. Stops at the first failing step.
pub fn run_steps(
    db: &dyn SQLStore,
    config: &MigrationConfig,
) -> Result<MigrationReport, MigrationError> {
    let mut report = MigrationReport::default();
    for (name, step) in STEPS {
        let outcome = step(db, config).map_err(|source| MigrationError::Step {
            step: name,
            source,
        })?;
        report.steps.push(StepReport {
            name,
            skipped: outcome.skipped,
            affected: outcome.affected,
        });
    }
    Ok(report)
}

/// Pre-migration entry point.
///
/// `installed_version` is the version being upgraded from; `None` means a
/// fresh install and nothing is done. Otherwise all steps run inside one
/// transaction which is rolled back if any of them fails.
pub fn run_pre_migration(
    db: &dyn SQLStore,
    installed_version: Option<&str>,
    config: &MigrationConfig,
) -> Result<MigrationReport, MigrationError> {
    let Some(version) = installed_version else {
        info!("No installed version, skipping pre-migration fixes");
        return Ok(MigrationReport::default());
    };

    info!("{}", "=".repeat(60));
    info!("Running custom pre-migration fixes ({version} -> {TARGET_VERSION})...");
    info!("{}", "=".repeat(60));

    let report = in_transaction(db, |tx| run_steps(tx, config))?;

    info!("{}", "=".repeat(60));
    info!(
        "Custom pre-migration fixes completed! ({} rows affected)",
        report.total_affected()
    );
    info!("{}", "=".repeat(60));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EDI_DOCUMENT_SCHEMA, count, dump, insert_model_data, insert_view, ir_db};

    const SETTINGS: &str = "res.config.settings";

    fn seeded_db() -> openerp_sql::SqliteStore {
        let db = ir_db();
        db.exec_batch(EDI_DOCUMENT_SCHEMA).unwrap();
        db.exec_batch(
            "INSERT INTO ir_cron (id, cron_name, active) VALUES
                (1, 'FatturaPA: receive', 1), (2, 'Mail: fetch', 1);
             INSERT INTO ir_model (id, model) VALUES (1, 'project.delete.wizard');
             INSERT INTO ir_model_access (id, name, model_id) VALUES (1, 'access_wizard', 1);
             INSERT INTO account_edi_document (id, edi_format_id) VALUES (1, 20);",
        )
        .unwrap();
        insert_model_data(&db, 1, "l10n_it_edi", "edi_fatturaPA", "account.edi.format", 20, false);
        insert_model_data(&db, 2, "project", "model_project_delete_wizard", "ir.model", 1, false);
        insert_view(&db, 1, "settings", SETTINGS, None, "<form/>");
        insert_view(&db, 2, "old", SETTINGS, Some(1), "//div[hasclass('settings')]");
        insert_view(&db, 3, "old child", SETTINGS, Some(2), "<xpath/>");
        insert_model_data(&db, 3, "l10n_it_edi", "old_view", "ir.ui.view", 2, false);
        db
    }

    #[test]
    fn fresh_install_does_nothing() {
        let db = seeded_db();
        let before = dump(&db);
        let report = run_pre_migration(&db, None, &MigrationConfig::default()).unwrap();
        assert!(report.steps.is_empty());
        assert_eq!(dump(&db), before);
    }

    #[test]
    fn runs_all_steps_in_order() {
        let db = seeded_db();
        let report = run_pre_migration(&db, Some("16.0.1.3"), &MigrationConfig::default()).unwrap();

        let summary: Vec<(&str, bool, u64)> = report
            .steps
            .iter()
            .map(|s| (s.name, s.skipped, s.affected))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("deactivate_obsolete_crons", false, 1),
                ("pin_linked_edi_formats", false, 1),
                ("purge_removed_model", false, 2),
                ("delete_incompatible_views", false, 2),
            ]
        );
        assert_eq!(report.total_affected(), 6);
        assert_eq!(count(&db, "ir_ui_view"), 1);
    }

    #[test]
    fn second_run_leaves_state_unchanged() {
        let db = seeded_db();
        let config = MigrationConfig::default();

        run_pre_migration(&db, Some("16.0"), &config).unwrap();
        let after_first = dump(&db);

        let report = run_pre_migration(&db, Some("16.0"), &config).unwrap();
        assert_eq!(dump(&db), after_first);
        assert_eq!(report.total_affected(), 0);
    }

    #[test]
    fn missing_tables_skip_steps() {
        let db = openerp_sql::SqliteStore::open_in_memory().unwrap();
        let report = run_pre_migration(&db, Some("15.0"), &MigrationConfig::default()).unwrap();
        assert_eq!(report.steps.len(), 4);
        assert!(report.steps.iter().all(|s| s.skipped));
    }

    #[test]
    fn failing_step_rolls_back_earlier_steps() {
        let db = seeded_db();
        // Break the view step: candidates are found but ir_ui_view rows can
        // no longer be deleted.
        db.exec_batch(
            "CREATE TRIGGER no_view_delete BEFORE DELETE ON ir_ui_view
             BEGIN SELECT RAISE(ABORT, 'view deletion blocked'); END;",
        )
        .unwrap();
        let before = dump(&db);

        let err = run_pre_migration(&db, Some("16.0"), &MigrationConfig::default()).unwrap_err();
        assert!(matches!(err, MigrationError::Step { step: "delete_incompatible_views", .. }));
        assert_eq!(dump(&db), before);
    }

    #[test]
    fn detects_base_version() {
        let db = ir_db();
        assert_eq!(detect_installed_version(&db).unwrap(), None);

        db.exec_batch(
            "CREATE TABLE ir_module_module (id INTEGER PRIMARY KEY, name TEXT, state TEXT, latest_version TEXT);
             INSERT INTO ir_module_module (id, name, state, latest_version) VALUES
                (1, 'base', 'installed', '16.0.1.3'),
                (2, 'sale', 'installed', '16.0.1.2');",
        )
        .unwrap();
        assert_eq!(
            detect_installed_version(&db).unwrap().as_deref(),
            Some("16.0.1.3")
        );
    }
}
