use std::sync::Arc;

use openerp_core::{ServiceError, new_id, now_rfc3339};
use openerp_sql::{Row, SQLStore, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::SaleConfig;
use crate::calc;
use crate::model::{LineValues, Product, SaleOrderLine};

/// SQL schema for products and sale order lines.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS product_product (
    id          TEXT PRIMARY KEY,
    data        TEXT NOT NULL,
    name        TEXT NOT NULL,
    create_at   TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS sale_order_line (
    id          TEXT PRIMARY KEY,
    data        TEXT NOT NULL,
    order_id    TEXT NOT NULL,
    product_id  TEXT,
    create_at   TEXT NOT NULL,
    update_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sol_order ON sale_order_line(order_id);
CREATE INDEX IF NOT EXISTS idx_sol_product ON sale_order_line(product_id);
";

/// Field whose edit triggers an on-change preview.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ChangedField {
    Product,
    Quantity,
    PriceUnit,
    PriceSubtotal,
}

/// Persistent storage for sale order lines, backed by SQLStore (SQLite).
///
/// Every create and write goes through [`calc`], so stored lines always
/// satisfy `price_subtotal = quantity * price_unit`.
pub struct SaleLineStore {
    db: Arc<dyn SQLStore>,
    config: SaleConfig,
}

impl SaleLineStore {
    /// Create a new SaleLineStore and initialise the schema.
    pub fn new(db: Arc<dyn SQLStore>, config: SaleConfig) -> Result<Self, ServiceError> {
        config.validate()?;
        db.exec_batch(SCHEMA)
            .map_err(|e| ServiceError::Storage(format!("sale schema init: {e}")))?;
        Ok(Self { db, config })
    }

    pub fn config(&self) -> &SaleConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Products
    // -----------------------------------------------------------------------

    pub fn create_product(&self, name: String, list_price: f64) -> Result<Product, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::Validation("product name is required".into()));
        }
        if !list_price.is_finite() {
            return Err(ServiceError::Validation(calc::AMOUNT_NOT_FINITE.into()));
        }
        let product = Product {
            id: new_id(),
            name,
            list_price,
            create_at: Some(now_rfc3339()),
        };
        let data = serde_json::to_string(&product)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        self.db
            .exec(
                "INSERT INTO product_product (id, data, name, create_at) VALUES (?1, ?2, ?3, ?4)",
                &[
                    Value::Text(product.id.clone()),
                    Value::Text(data),
                    Value::Text(product.name.clone()),
                    Value::opt_text(product.create_at.as_deref()),
                ],
            )
            .map_err(ServiceError::storage)?;

        Ok(product)
    }

    pub fn get_product(&self, id: &str) -> Result<Product, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT data FROM product_product WHERE id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(ServiceError::storage)?;
        let row = rows
            .first()
            .ok_or_else(|| ServiceError::NotFound(format!("product {id}")))?;
        decode(row)
    }

    // -----------------------------------------------------------------------
    // Lines
    // -----------------------------------------------------------------------

    /// Create a line. The unit price defaults to the product's list price.
    pub fn create_line(&self, values: LineValues) -> Result<SaleOrderLine, ServiceError> {
        let order_id = values
            .order_id
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServiceError::Validation("orderId is required".into()))?;

        let product = match values.product_id.as_deref() {
            Some(pid) => Some(self.get_product(pid)?),
            None => None,
        };
        let default_price = product.as_ref().map(|p| p.list_price).unwrap_or_default();
        let amounts = calc::prepare_create(&values, default_price, self.config.price_digits)?;

        let now = now_rfc3339();
        let mut line = SaleOrderLine {
            id: new_id(),
            order_id,
            product_id: values.product_id.clone(),
            name: values.name.clone().or_else(|| product.map(|p| p.name)),
            quantity: 0.0,
            price_unit: 0.0,
            price_subtotal: 0.0,
            create_at: Some(now.clone()),
            update_at: Some(now),
        };
        line.apply_amounts(amounts);

        let data =
            serde_json::to_string(&line).map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.db
            .exec(
                "INSERT INTO sale_order_line (id, data, order_id, product_id, create_at, update_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &[
                    Value::Text(line.id.clone()),
                    Value::Text(data),
                    Value::Text(line.order_id.clone()),
                    Value::opt_text(line.product_id.as_deref()),
                    Value::opt_text(line.create_at.as_deref()),
                    Value::opt_text(line.update_at.as_deref()),
                ],
            )
            .map_err(ServiceError::storage)?;

        debug!(
            "created sale line {} (qty={}, price={}, subtotal={})",
            line.id, line.quantity, line.price_unit, line.price_subtotal
        );
        Ok(line)
    }

    /// Get a line by ID.
    pub fn get_line(&self, id: &str) -> Result<SaleOrderLine, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT data FROM sale_order_line WHERE id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(ServiceError::storage)?;
        let row = rows
            .first()
            .ok_or_else(|| ServiceError::NotFound(format!("sale line {id}")))?;
        decode(row)
    }

    /// Lines of one order, oldest first.
    pub fn list_lines(&self, order_id: &str) -> Result<Vec<SaleOrderLine>, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT data FROM sale_order_line WHERE order_id = ?1 ORDER BY create_at, id",
                &[Value::Text(order_id.to_string())],
            )
            .map_err(ServiceError::storage)?;
        rows.iter().map(decode).collect()
    }

    /// Write `values` to a line. A rejected write leaves the stored line as is.
    pub fn write_line(&self, id: &str, values: LineValues) -> Result<SaleOrderLine, ServiceError> {
        let mut line = self.get_line(id)?;
        let amounts = calc::prepare_write(&line, &values, self.config.price_digits)?;

        if let Some(order_id) = values.order_id.filter(|s| !s.is_empty()) {
            line.order_id = order_id;
        }
        if values.product_id.is_some() {
            line.product_id = values.product_id;
        }
        if values.name.is_some() {
            line.name = values.name;
        }
        line.apply_amounts(amounts);
        line.update_at = Some(now_rfc3339());

        let data =
            serde_json::to_string(&line).map_err(|e| ServiceError::Internal(e.to_string()))?;
        let affected = self
            .db
            .exec(
                "UPDATE sale_order_line SET data = ?1, order_id = ?2, product_id = ?3, update_at = ?4 \
                 WHERE id = ?5",
                &[
                    Value::Text(data),
                    Value::Text(line.order_id.clone()),
                    Value::opt_text(line.product_id.as_deref()),
                    Value::opt_text(line.update_at.as_deref()),
                    Value::Text(line.id.clone()),
                ],
            )
            .map_err(ServiceError::storage)?;

        if affected == 0 {
            return Err(ServiceError::NotFound(format!("sale line {id}")));
        }
        Ok(line)
    }

    /// Delete a line by ID.
    pub fn delete_line(&self, id: &str) -> Result<(), ServiceError> {
        let affected = self
            .db
            .exec(
                "DELETE FROM sale_order_line WHERE id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(ServiceError::storage)?;

        if affected == 0 {
            return Err(ServiceError::NotFound(format!("sale line {id}")));
        }
        Ok(())
    }

    /// Run the on-change handler for `field` on an unsaved draft and return
    /// the updated draft. Nothing is persisted.
    pub fn onchange(
        &self,
        values: &LineValues,
        field: ChangedField,
    ) -> Result<SaleOrderLine, ServiceError> {
        let digits = self.config.price_digits;
        let mut draft = SaleOrderLine::draft(values);
        match field {
            ChangedField::Product => {
                let pid = values.product_id.as_deref().ok_or_else(|| {
                    ServiceError::Validation("productId is required".into())
                })?;
                let product = self.get_product(pid)?;
                draft.onchange_product(&product, digits);
            }
            ChangedField::Quantity | ChangedField::PriceUnit => draft.onchange_quantity_price(),
            ChangedField::PriceSubtotal => {
                if values.price_subtotal.is_none() {
                    return Err(ServiceError::Validation("priceSubtotal is required".into()));
                }
                draft.onchange_subtotal(digits)?;
            }
        }
        draft.check_amounts()?;
        Ok(draft)
    }
}

fn decode<T: serde::de::DeserializeOwned>(row: &Row) -> Result<T, ServiceError> {
    let data = row
        .get_str("data")
        .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
    serde_json::from_str(data).map_err(|e| ServiceError::Internal(e.to_string()))
}
