use openerp_sql::{SQLError, SQLStore, Value};
use tracing::info;

use super::{StepOutcome, glob_contains};
use crate::config::MigrationConfig;

/// Remove access rules and metadata left behind by a model the target
/// version no longer ships (`project.delete.wizard`, by default).
pub fn purge_removed_model(
    db: &dyn SQLStore,
    config: &MigrationConfig,
) -> Result<StepOutcome, SQLError> {
    let model = &config.removed_model.model;
    info!("Fixing {model} references...");

    if !db.table_exists("ir_model")? {
        info!("  Table ir_model does not exist, skipping");
        return Ok(StepOutcome::skipped());
    }
    let registered = db.query(
        "SELECT id FROM ir_model WHERE model = ?1",
        &[Value::Text(model.clone())],
    )?;
    if registered.is_empty() {
        info!("  No {model} model found");
        return Ok(StepOutcome::skipped());
    }

    let mut affected = 0;

    if db.table_exists("ir_model_access")? {
        let access = db.query(
            "DELETE FROM ir_model_access \
             WHERE model_id IN (SELECT id FROM ir_model WHERE model = ?1) \
             RETURNING id",
            &[Value::Text(model.clone())],
        )?;
        if !access.is_empty() {
            info!("  Removed {} access rules for {model}", access.len());
        }
        affected += access.len() as u64;
    }

    if db.table_exists("ir_model_data")? {
        let pattern = glob_contains(&config.removed_model.xml_id_fragment());
        let data = db.query(
            "DELETE FROM ir_model_data WHERE name GLOB ?1 RETURNING id, name",
            &[Value::Text(pattern)],
        )?;
        for row in &data {
            info!(
                "  Removed ir.model.data: {} (id={})",
                row.get_str("name").unwrap_or_default(),
                row.get_i64("id").unwrap_or_default(),
            );
        }
        affected += data.len() as u64;
    }

    Ok(StepOutcome::affected(affected))
}
