use openerp_sql::{SQLError, SQLStore, Value};
use tracing::info;

use super::{StepOutcome, like_to_glob};
use crate::config::MigrationConfig;

/// Deactivate scheduled jobs whose method was removed by the upgrade
/// (the FatturaPA receive job, by default).
pub fn deactivate_obsolete_crons(
    db: &dyn SQLStore,
    config: &MigrationConfig,
) -> Result<StepOutcome, SQLError> {
    info!("Fixing obsolete cron jobs...");

    if !db.table_exists("ir_cron")? {
        info!("  Table ir_cron does not exist, skipping");
        return Ok(StepOutcome::skipped());
    }

    let disabled = db.query(
        "UPDATE ir_cron SET active = 0 \
         WHERE cron_name GLOB ?1 AND active = 1 \
         RETURNING id, cron_name",
        &[Value::Text(like_to_glob(&config.cron.name_pattern))],
    )?;

    for row in &disabled {
        info!(
            "  Disabled cron job: {} (id={})",
            row.get_str("cron_name").unwrap_or_default(),
            row.get_i64("id").unwrap_or_default(),
        );
    }
    if disabled.is_empty() {
        info!("  No cron jobs matching {} to disable", config.cron.name_pattern);
    }

    Ok(StepOutcome::affected(disabled.len() as u64))
}
