use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;

use openerp_core::ServiceError;

use super::AppState;
use crate::model::Product;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/{id}", get(get_product))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProductBody {
    name: String,
    #[serde(default)]
    list_price: f64,
}

async fn create_product(
    State(store): State<AppState>,
    Json(body): Json<CreateProductBody>,
) -> Result<Json<Product>, ServiceError> {
    store.create_product(body.name, body.list_price).map(Json)
}

async fn get_product(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ServiceError> {
    store.get_product(&id).map(Json)
}
