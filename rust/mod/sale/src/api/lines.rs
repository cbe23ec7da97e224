use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;

use openerp_core::{ListResult, ServiceError};

use super::AppState;
use crate::model::{LineValues, SaleOrderLine};
use crate::store::ChangedField;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lines", post(create_line).get(list_lines))
        .route("/lines/onchange", post(onchange))
        .route("/lines/{id}", get(get_line).patch(write_line).delete(delete_line))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    order_id: String,
}

#[derive(Deserialize)]
struct OnchangeBody {
    field: ChangedField,
    #[serde(default)]
    values: LineValues,
}

async fn create_line(
    State(store): State<AppState>,
    Json(values): Json<LineValues>,
) -> Result<Json<SaleOrderLine>, ServiceError> {
    store.create_line(values).map(Json)
}

async fn list_lines(
    State(store): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ListResult<SaleOrderLine>>, ServiceError> {
    store.list_lines(&q.order_id).map(|items| Json(ListResult::new(items)))
}

async fn get_line(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SaleOrderLine>, ServiceError> {
    store.get_line(&id).map(Json)
}

async fn write_line(
    State(store): State<AppState>,
    Path(id): Path<String>,
    Json(values): Json<LineValues>,
) -> Result<Json<SaleOrderLine>, ServiceError> {
    store.write_line(&id, values).map(Json)
}

async fn delete_line(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    store.delete_line(&id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

async fn onchange(
    State(store): State<AppState>,
    Json(body): Json<OnchangeBody>,
) -> Result<Json<SaleOrderLine>, ServiceError> {
    store.onchange(&body.values, body.field).map(Json)
}
