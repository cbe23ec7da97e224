//! Unit price / subtotal reconciliation for sale order lines.
//!
//! The invariant is `price_subtotal = quantity * price_unit`. Whichever of
//! the two amounts was edited last is authoritative:
//!
//! - quantity or unit price edited: the subtotal is recomputed forward.
//! - subtotal edited: the unit price is derived as `subtotal / quantity`,
//!   rounded to the price precision, and the subtotal is then recomputed from
//!   that rounded price so the invariant holds on what is stored.
//!
//! Deriving a price requires `quantity > 0`; otherwise the edit is rejected
//! with [`QUANTITY_NOT_POSITIVE`] and nothing is changed. Amounts that are
//! or become infinite or NaN are rejected with [`AMOUNT_NOT_FINITE`].

use openerp_core::ServiceError;

use crate::model::{DEFAULT_QUANTITY, LineValues, Product, SaleOrderLine};

/// Message of the validation error raised when a subtotal is entered on a
/// line whose quantity is zero or negative.
pub const QUANTITY_NOT_POSITIVE: &str = "quantity must be greater than zero";

/// Message of the validation error raised when an amount given or computed
/// is infinite or NaN.
pub const AMOUNT_NOT_FINITE: &str = "amounts must be finite numbers";

/// Round a unit price to `digits` decimal places.
pub fn round_price(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Forward computation: `quantity * price_unit`.
pub fn compute_subtotal(quantity: f64, price_unit: f64) -> f64 {
    quantity * price_unit
}

/// Inverse computation: the unit price that yields `subtotal` for `quantity`.
pub fn inverse_subtotal(quantity: f64, subtotal: f64, digits: u32) -> Result<f64, ServiceError> {
    // Also catches NaN.
    if !(quantity > 0.0) {
        return Err(ServiceError::Validation(QUANTITY_NOT_POSITIVE.to_string()));
    }
    Ok(round_price(subtotal / quantity, digits))
}

/// Resolved amounts for a line after a create or write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amounts {
    pub quantity: f64,
    pub price_unit: f64,
    pub price_subtotal: f64,
}

impl Amounts {
    fn forward(quantity: f64, price_unit: f64, digits: u32) -> Result<Self, ServiceError> {
        let price_unit = round_price(price_unit, digits);
        Self {
            quantity,
            price_unit,
            price_subtotal: compute_subtotal(quantity, price_unit),
        }
        .checked()
    }

    fn from_subtotal(quantity: f64, subtotal: f64, digits: u32) -> Result<Self, ServiceError> {
        ensure_finite(subtotal)?;
        let price_unit = inverse_subtotal(quantity, subtotal, digits)?;
        Self {
            quantity,
            price_unit,
            price_subtotal: compute_subtotal(quantity, price_unit),
        }
        .checked()
    }

    fn checked(self) -> Result<Self, ServiceError> {
        ensure_finite(self.quantity)?;
        ensure_finite(self.price_unit)?;
        ensure_finite(self.price_subtotal)?;
        Ok(self)
    }
}

fn ensure_finite(value: f64) -> Result<(), ServiceError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ServiceError::Validation(AMOUNT_NOT_FINITE.to_string()))
    }
}

/// Amounts of a line about to be created.
///
/// `default_price` is used when no unit price is given (the product's list
/// price, when a product is set).
pub fn prepare_create(
    values: &LineValues,
    default_price: f64,
    digits: u32,
) -> Result<Amounts, ServiceError> {
    let quantity = values.quantity.unwrap_or(DEFAULT_QUANTITY);
    match values.price_subtotal {
        Some(subtotal) => Amounts::from_subtotal(quantity, subtotal, digits),
        None => Amounts::forward(
            quantity,
            values.price_unit.unwrap_or(default_price),
            digits,
        ),
    }
}

/// Amounts of `current` after applying the write `values`.
///
/// A subtotal in `values` wins over a unit price in the same call and is
/// divided by the written quantity if present, else the stored one.
pub fn prepare_write(
    current: &SaleOrderLine,
    values: &LineValues,
    digits: u32,
) -> Result<Amounts, ServiceError> {
    let quantity = values.quantity.unwrap_or(current.quantity);
    if let Some(subtotal) = values.price_subtotal {
        return Amounts::from_subtotal(quantity, subtotal, digits);
    }
    if values.quantity.is_some() || values.price_unit.is_some() {
        return Amounts::forward(
            quantity,
            values.price_unit.unwrap_or(current.price_unit),
            digits,
        );
    }
    Ok(Amounts {
        quantity: current.quantity,
        price_unit: current.price_unit,
        price_subtotal: current.price_subtotal,
    })
}

impl SaleOrderLine {
    pub fn apply_amounts(&mut self, amounts: Amounts) {
        self.quantity = amounts.quantity;
        self.price_unit = amounts.price_unit;
        self.price_subtotal = amounts.price_subtotal;
    }

    /// Reject a line whose amounts are infinite or NaN.
    pub fn check_amounts(&self) -> Result<(), ServiceError> {
        ensure_finite(self.quantity)?;
        ensure_finite(self.price_unit)?;
        ensure_finite(self.price_subtotal)
    }

    /// Recompute the subtotal from quantity and unit price.
    pub fn recompute_subtotal(&mut self) {
        self.price_subtotal = compute_subtotal(self.quantity, self.price_unit);
    }

    /// Set the subtotal and derive the unit price from it.
    /// On error the line is left untouched.
    pub fn set_subtotal(&mut self, subtotal: f64, digits: u32) -> Result<(), ServiceError> {
        let amounts = Amounts::from_subtotal(self.quantity, subtotal, digits)?;
        self.apply_amounts(amounts);
        Ok(())
    }

    // ── On-change handlers ──

    /// Product changed: seed the unit price from its list price.
    pub fn onchange_product(&mut self, product: &Product, digits: u32) {
        self.product_id = Some(product.id.clone());
        if self.name.is_none() {
            self.name = Some(product.name.clone());
        }
        self.price_unit = round_price(product.list_price, digits);
        self.recompute_subtotal();
    }

    /// Quantity or unit price changed.
    pub fn onchange_quantity_price(&mut self) {
        self.recompute_subtotal();
    }

    /// Subtotal changed: the current `price_subtotal` is authoritative.
    pub fn onchange_subtotal(&mut self, digits: u32) -> Result<(), ServiceError> {
        self.set_subtotal(self.price_subtotal, digits)
    }
}
