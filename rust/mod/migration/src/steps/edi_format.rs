use openerp_sql::{SQLError, SQLStore, Value};
use tracing::info;

use super::StepOutcome;
use crate::config::MigrationConfig;

/// Set `noupdate` on document-format records that linked documents still
/// point to, so reloading their module does not try to delete them.
pub fn pin_linked_edi_formats(
    db: &dyn SQLStore,
    config: &MigrationConfig,
) -> Result<StepOutcome, SQLError> {
    info!("Fixing EDI format noupdate flags...");

    if !db.table_exists("account_edi_document")? {
        info!("  Table account_edi_document does not exist, skipping");
        return Ok(StepOutcome::skipped());
    }
    if !db.table_exists("ir_model_data")? {
        info!("  Table ir_model_data does not exist, skipping");
        return Ok(StepOutcome::skipped());
    }

    let edi = &config.edi;
    let pinned = db.query(
        "UPDATE ir_model_data SET noupdate = 1 \
         WHERE module = ?1 AND name = ?2 AND noupdate = 0 \
         RETURNING id",
        &[
            Value::Text(edi.module.clone()),
            Value::Text(edi.record_name.clone()),
        ],
    )?;
    if !pinned.is_empty() {
        info!("  Set noupdate=True for {}", edi.record_name);
    }

    let linked = db.query(
        "UPDATE ir_model_data SET noupdate = 1 \
         WHERE model = ?1 AND noupdate = 0 \
           AND res_id IN ( \
               SELECT DISTINCT edi_format_id FROM account_edi_document \
               WHERE edi_format_id IS NOT NULL \
           ) \
         RETURNING id, name",
        &[Value::Text(edi.format_model.clone())],
    )?;
    for row in &linked {
        info!(
            "  Set noupdate=True for EDI format: {} (id={})",
            row.get_str("name").unwrap_or_default(),
            row.get_i64("id").unwrap_or_default(),
        );
    }
    if linked.is_empty() {
        info!("  No additional EDI formats needed noupdate fix");
    }

    Ok(StepOutcome::affected((pinned.len() + linked.len()) as u64))
}
