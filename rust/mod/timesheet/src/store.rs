use std::sync::Arc;

use openerp_core::{ServiceError, new_id, now_rfc3339};
use openerp_sql::{SQLStore, Value};

use crate::model::{NewTimesheetLine, ReportQuery, TimesheetLine};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS timesheet_line (
    id          TEXT PRIMARY KEY,
    data        TEXT NOT NULL,
    employee    TEXT NOT NULL,
    date        TEXT NOT NULL,
    create_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_ts_employee_date ON timesheet_line(employee, date);
";

/// Persistent storage for timesheet lines, backed by SQLStore (SQLite).
pub struct TimesheetStore {
    db: Arc<dyn SQLStore>,
}

impl TimesheetStore {
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        db.exec_batch(SCHEMA)
            .map_err(|e| ServiceError::Storage(format!("timesheet schema init: {e}")))?;
        Ok(Self { db })
    }

    pub fn create_line(&self, new: NewTimesheetLine) -> Result<TimesheetLine, ServiceError> {
        if new.employee.trim().is_empty() {
            return Err(ServiceError::Validation("employee is required".into()));
        }
        if new.end <= new.start {
            return Err(ServiceError::Validation(format!(
                "end time {} must be after start time {}",
                new.end, new.start
            )));
        }

        let line = TimesheetLine {
            id: new_id(),
            employee: new.employee,
            project: new.project,
            date: new.date,
            start: new.start,
            end: new.end,
            description: new.description,
            create_at: Some(now_rfc3339()),
        };
        let data =
            serde_json::to_string(&line).map_err(|e| ServiceError::Internal(e.to_string()))?;

        self.db
            .exec(
                "INSERT INTO timesheet_line (id, data, employee, date, create_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                &[
                    Value::Text(line.id.clone()),
                    Value::Text(data),
                    Value::Text(line.employee.clone()),
                    Value::Text(line.date.to_string()),
                    Value::opt_text(line.create_at.as_deref()),
                ],
            )
            .map_err(ServiceError::storage)?;
        Ok(line)
    }

    pub fn get_line(&self, id: &str) -> Result<TimesheetLine, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT data FROM timesheet_line WHERE id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(ServiceError::storage)?;
        let data = rows
            .first()
            .ok_or_else(|| ServiceError::NotFound(format!("timesheet line {id}")))?
            .get_str("data")
            .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
        serde_json::from_str(data).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    pub fn delete_line(&self, id: &str) -> Result<(), ServiceError> {
        let affected = self
            .db
            .exec(
                "DELETE FROM timesheet_line WHERE id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(ServiceError::storage)?;
        if affected == 0 {
            return Err(ServiceError::NotFound(format!("timesheet line {id}")));
        }
        Ok(())
    }

    /// Lines matching the query, ordered by employee, date and id.
    pub fn lines_between(&self, q: &ReportQuery) -> Result<Vec<TimesheetLine>, ServiceError> {
        if let (Some(from), Some(to)) = (q.date_from, q.date_to) {
            if from > to {
                return Err(ServiceError::Validation(format!(
                    "dateFrom {from} is after dateTo {to}"
                )));
            }
        }

        let mut conditions = Vec::new();
        let mut params = Vec::new();
        if let Some(employee) = &q.employee {
            params.push(Value::Text(employee.clone()));
            conditions.push(format!("employee = ?{}", params.len()));
        }
        if let Some(from) = q.date_from {
            params.push(Value::Text(from.to_string()));
            conditions.push(format!("date >= ?{}", params.len()));
        }
        if let Some(to) = q.date_to {
            params.push(Value::Text(to.to_string()));
            conditions.push(format!("date <= ?{}", params.len()));
        }

        let mut sql = "SELECT data FROM timesheet_line".to_string();
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY employee, date, id");

        let rows = self.db.query(&sql, &params).map_err(ServiceError::storage)?;
        rows.iter()
            .map(|row| {
                let data = row
                    .get_str("data")
                    .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
                serde_json::from_str(data).map_err(|e| ServiceError::Internal(e.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use openerp_sql::SqliteStore;

    fn test_store() -> TimesheetStore {
        let db = Arc::new(SqliteStore::open_in_memory().unwrap());
        TimesheetStore::new(db).unwrap()
    }

    fn new_line(employee: &str, day: u32, start: u32, end: u32) -> NewTimesheetLine {
        NewTimesheetLine {
            employee: employee.into(),
            project: Some("internal".into()),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            start: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
            description: None,
        }
    }

    #[test]
    fn create_and_get() {
        let store = test_store();
        let line = store.create_line(new_line("alice", 1, 9, 17)).unwrap();
        assert_eq!(store.get_line(&line.id).unwrap(), line);
    }

    #[test]
    fn end_before_start_rejected() {
        let store = test_store();
        let err = store.create_line(new_line("alice", 1, 17, 9)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = store.create_line(new_line("alice", 1, 9, 9)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn filter_by_employee_and_range() {
        let store = test_store();
        store.create_line(new_line("alice", 1, 9, 12)).unwrap();
        store.create_line(new_line("alice", 5, 9, 12)).unwrap();
        store.create_line(new_line("alice", 10, 9, 12)).unwrap();
        store.create_line(new_line("bob", 5, 9, 12)).unwrap();

        let all = store.lines_between(&ReportQuery::default()).unwrap();
        assert_eq!(all.len(), 4);

        let q = ReportQuery {
            employee: Some("alice".into()),
            date_from: NaiveDate::from_ymd_opt(2024, 3, 2),
            date_to: NaiveDate::from_ymd_opt(2024, 3, 10),
        };
        let lines = store.lines_between(&q).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.employee == "alice"));
    }

    #[test]
    fn inverted_range_rejected() {
        let store = test_store();
        let q = ReportQuery {
            employee: None,
            date_from: NaiveDate::from_ymd_opt(2024, 3, 10),
            date_to: NaiveDate::from_ymd_opt(2024, 3, 1),
        };
        assert!(matches!(store.lines_between(&q), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn delete_missing_is_not_found() {
        let store = test_store();
        assert!(matches!(store.delete_line("nope"), Err(ServiceError::NotFound(_))));
    }
}
