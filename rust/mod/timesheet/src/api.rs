use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use tracing::debug;

use openerp_core::ServiceError;

use crate::model::{NewTimesheetLine, ReportQuery, TimesheetLine};
use crate::report::{TimesheetReport, build_report};
use crate::store::TimesheetStore;

pub type AppState = Arc<TimesheetStore>;

/// Build the timesheet API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/lines", post(create_line))
        .route("/lines/{id}", get(get_line).delete(delete_line))
        .route("/report", get(report))
        .with_state(state)
}

async fn create_line(
    State(store): State<AppState>,
    Json(body): Json<NewTimesheetLine>,
) -> Result<Json<TimesheetLine>, ServiceError> {
    store.create_line(body).map(Json)
}

async fn get_line(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TimesheetLine>, ServiceError> {
    store.get_line(&id).map(Json)
}

async fn delete_line(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    store.delete_line(&id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

async fn report(
    State(store): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> Result<Json<TimesheetReport>, ServiceError> {
    let lines = store.lines_between(&q)?;
    debug!("timesheet report over {} lines", lines.len());
    Ok(Json(build_report(&lines)))
}
