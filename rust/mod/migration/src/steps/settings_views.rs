use openerp_sql::{SQLError, SQLStore, Value};
use tracing::info;

use super::{StepOutcome, like_to_glob};
use crate::config::MigrationConfig;
use crate::views::delete_view_cascade;

/// Delete inheriting views whose arch targets markup the new version no
/// longer has. The module reload recreates compatible versions of them.
pub fn delete_incompatible_views(
    db: &dyn SQLStore,
    config: &MigrationConfig,
) -> Result<StepOutcome, SQLError> {
    info!("Fixing incompatible settings views...");

    if !db.table_exists("ir_ui_view")? || !db.table_exists("ir_model_data")? {
        info!("  View tables do not exist, skipping");
        return Ok(StepOutcome::skipped());
    }

    let mut total = 0;
    for pattern in &config.views.arch_patterns {
        let candidates = db.query(
            "SELECT v.id, v.name, d.module \
             FROM ir_ui_view v \
             LEFT JOIN ir_model_data d ON d.res_id = v.id AND d.model = 'ir.ui.view' \
             WHERE v.model = ?1 \
               AND v.inherit_id IS NOT NULL \
               AND v.arch_db GLOB ?2 \
             ORDER BY v.id",
            &[
                Value::Text(config.views.model.clone()),
                Value::Text(like_to_glob(pattern)),
            ],
        )?;

        for row in &candidates {
            let Some(id) = row.get_i64("id") else { continue };
            total += delete_view_cascade(db, id, row.get_str("module"))?;
        }
    }

    if total == 0 {
        info!("  No incompatible settings views found");
    } else {
        info!("  Total: {total} incompatible views removed");
    }
    Ok(StepOutcome::affected(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{count, insert_model_data, insert_view, ir_db};

    const SETTINGS: &str = "res.config.settings";

    #[test]
    fn deletes_matching_inheriting_views_with_children() {
        let db = ir_db();
        insert_view(&db, 1, "base settings", SETTINGS, None, "<div class='settings'/>");
        insert_view(&db, 2, "it edi settings", SETTINGS, Some(1),
            "<xpath expr=\"//div[hasclass('settings')]\" position=\"inside\"/>");
        insert_view(&db, 3, "it edi settings ext", SETTINGS, Some(2), "<xpath expr=\"//field\"/>");
        insert_view(&db, 4, "vendor bills", SETTINGS, Some(1),
            "<xpath expr=\"//div[@id='account_vendor_bills']\"/>");
        insert_view(&db, 5, "partner form", "res.partner", Some(1),
            "<xpath expr=\"//div[hasclass('settings')]\"/>");
        insert_view(&db, 6, "modern settings", SETTINGS, Some(1), "<app name='x'/>");
        insert_model_data(&db, 1, "l10n_it_edi", "res_config_settings_view", "ir.ui.view", 2, false);

        let outcome = delete_incompatible_views(&db, &MigrationConfig::default()).unwrap();
        assert_eq!(outcome, StepOutcome::affected(3));

        let left: Vec<i64> = db
            .query("SELECT id FROM ir_ui_view ORDER BY id", &[])
            .unwrap()
            .iter()
            .filter_map(|r| r.get_i64("id"))
            .collect();
        assert_eq!(left, vec![1, 5, 6]);
        assert_eq!(count(&db, "ir_model_data"), 0);
    }

    #[test]
    fn arch_pattern_is_case_sensitive() {
        let db = ir_db();
        insert_view(&db, 1, "base settings", SETTINGS, None, "<form/>");
        insert_view(&db, 2, "custom settings", SETTINGS, Some(1),
            "<xpath expr=\"//div[hasclass('Settings')]\"/>");
        insert_view(&db, 3, "custom settings ext", SETTINGS, Some(2), "<xpath/>");

        let outcome = delete_incompatible_views(&db, &MigrationConfig::default()).unwrap();
        assert_eq!(outcome, StepOutcome::affected(0));
        assert_eq!(count(&db, "ir_ui_view"), 3);
    }

    #[test]
    fn root_views_are_not_candidates() {
        let db = ir_db();
        insert_view(&db, 1, "root", SETTINGS, None, "//div[hasclass('settings')]");

        let outcome = delete_incompatible_views(&db, &MigrationConfig::default()).unwrap();
        assert_eq!(outcome, StepOutcome::affected(0));
        assert_eq!(count(&db, "ir_ui_view"), 1);
    }
}
