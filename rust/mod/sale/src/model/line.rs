use serde::{Deserialize, Serialize};

/// Quantity of a new line when none is given.
pub const DEFAULT_QUANTITY: f64 = 1.0;

/// SaleOrderLine — one priced line of a sales order.
///
/// `price_subtotal` is kept equal to `quantity * price_unit`; see
/// [`crate::calc`] for which side wins on each kind of edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleOrderLine {
    pub id: String,

    /// Owning sales order.
    pub order_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    /// Description shown on the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub quantity: f64,

    pub price_unit: f64,

    pub price_subtotal: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_at: Option<String>,
}

impl SaleOrderLine {
    /// An unsaved line built from a value set, used by on-change previews.
    /// Amounts are taken as given; nothing is recomputed.
    pub fn draft(values: &LineValues) -> Self {
        let quantity = values.quantity.unwrap_or(DEFAULT_QUANTITY);
        let price_unit = values.price_unit.unwrap_or_default();
        Self {
            id: String::new(),
            order_id: values.order_id.clone().unwrap_or_default(),
            product_id: values.product_id.clone(),
            name: values.name.clone(),
            quantity,
            price_unit,
            price_subtotal: values.price_subtotal.unwrap_or(quantity * price_unit),
            create_at: None,
            update_at: None,
        }
    }
}

/// The values of a create or write call. Absent fields are untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_unit: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_subtotal: Option<f64>,
}

impl LineValues {
    /// Whether the values touch any of quantity, unit price or subtotal.
    pub fn touches_amounts(&self) -> bool {
        self.quantity.is_some() || self.price_unit.is_some() || self.price_subtotal.is_some()
    }
}
