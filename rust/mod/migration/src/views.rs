//! Cascading deletion of UI views along the `inherit_id` tree.

use std::collections::HashSet;

use openerp_sql::{SQLError, SQLStore, Value};
use tracing::{info, warn};

/// Delete a view, every view inheriting from it (transitively) and their
/// `ir_model_data` records. Returns the number of `ir_ui_view` rows deleted.
///
/// Descendants are deleted before their ancestors, so a restricting foreign
/// key on `inherit_id` is never violated. The traversal keeps a visited set:
/// an inheritance cycle is logged, its back edge is cleared, and every view
/// in it is deleted once.
pub fn delete_view_cascade(
    db: &dyn SQLStore,
    view_id: i64,
    module: Option<&str>,
) -> Result<u64, SQLError> {
    let order = collect_subtree(db, view_id)?;

    let mut deleted = 0;
    for &id in order.iter().rev() {
        db.exec(
            "DELETE FROM ir_model_data WHERE res_id = ?1 AND model = 'ir.ui.view'",
            &[Value::Integer(id)],
        )?;
        let rows = db.query(
            "DELETE FROM ir_ui_view WHERE id = ?1 RETURNING id, name",
            &[Value::Integer(id)],
        )?;
        if let Some(row) = rows.first() {
            info!(
                "  Removed incompatible view: {} (id={}, module={})",
                row.get_str("name").unwrap_or_default(),
                id,
                module.unwrap_or("-"),
            );
            deleted += 1;
        }
    }
    Ok(deleted)
}

/// Ids of `root` and all its descendants, each ancestor before its
/// descendants. Empty if `root` does not exist.
fn collect_subtree(db: &dyn SQLStore, root: i64) -> Result<Vec<i64>, SQLError> {
    let exists = db.query(
        "SELECT id FROM ir_ui_view WHERE id = ?1",
        &[Value::Integer(root)],
    )?;
    if exists.is_empty() {
        return Ok(Vec::new());
    }

    let mut visited = HashSet::new();
    let mut order = Vec::new();
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        order.push(id);

        let children = db.query(
            "SELECT id FROM ir_ui_view WHERE inherit_id = ?1 ORDER BY id",
            &[Value::Integer(id)],
        )?;
        for child in children.iter().filter_map(|r| r.get_i64("id")) {
            if visited.contains(&child) {
                warn!("view inheritance cycle: view {child} inherits from its descendant {id}");
                db.exec(
                    "UPDATE ir_ui_view SET inherit_id = NULL WHERE id = ?1",
                    &[Value::Integer(child)],
                )?;
                continue;
            }
            stack.push(child);
        }
    }
    Ok(order)
}
