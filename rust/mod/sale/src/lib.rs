pub mod api;
pub mod calc;
pub mod model;
pub mod store;

use std::sync::Arc;

use axum::Router;
use openerp_core::{Module, ServiceError};
use serde::Deserialize;

use store::SaleLineStore;

/// Sale module settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct SaleConfig {
    /// Decimal places kept on unit prices.
    pub price_digits: u32,
}

impl Default for SaleConfig {
    fn default() -> Self {
        Self { price_digits: 2 }
    }
}

impl SaleConfig {
    /// Unit prices are stored as REAL; more digits than this are noise.
    pub const MAX_PRICE_DIGITS: u32 = 6;

    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.price_digits > Self::MAX_PRICE_DIGITS {
            return Err(ServiceError::Validation(format!(
                "price_digits must be at most {}, got {}",
                Self::MAX_PRICE_DIGITS,
                self.price_digits
            )));
        }
        Ok(())
    }
}

/// Sale module — order lines with a two-way price/subtotal computation.
pub struct SaleModule {
    store: Arc<SaleLineStore>,
}

impl SaleModule {
    pub fn new(store: SaleLineStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

impl Module for SaleModule {
    fn name(&self) -> &str {
        "sale"
    }

    fn routes(&self) -> Router {
        api::router(self.store.clone())
    }
}
