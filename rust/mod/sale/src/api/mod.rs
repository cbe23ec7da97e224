mod lines;
mod products;

use std::sync::Arc;

use axum::Router;

use crate::store::SaleLineStore;

/// Shared application state.
pub type AppState = Arc<SaleLineStore>;

/// Build the sale API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(lines::routes())
        .merge(products::routes())
        .with_state(state)
}
