use tracing::{debug, warn};

use crate::error::SQLError;
use crate::traits::SQLStore;

/// Run `f` inside a single transaction on `db`.
///
/// Commits when `f` returns `Ok`, rolls back and returns the original error
/// otherwise. Nested calls are not supported: SQLite rejects a second `BEGIN`.
pub fn in_transaction<T, E>(
    db: &dyn SQLStore,
    f: impl FnOnce(&dyn SQLStore) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<SQLError>,
{
    db.exec_batch("BEGIN")
        .map_err(|e| SQLError::Transaction(format!("begin: {e}")))?;
    debug!("transaction started");

    match f(db) {
        Ok(value) => match db.exec_batch("COMMIT") {
            Ok(()) => {
                debug!("transaction committed");
                Ok(value)
            }
            Err(e) => {
                rollback(db);
                Err(SQLError::Transaction(format!("commit: {e}")).into())
            }
        },
        Err(err) => {
            rollback(db);
            Err(err)
        }
    }
}

/// Best-effort ROLLBACK; a failure is only logged.
fn rollback(db: &dyn SQLStore) {
    if let Err(rb) = db.exec_batch("ROLLBACK") {
        warn!("rollback failed: {rb}");
    } else {
        debug!("transaction rolled back");
    }
}
