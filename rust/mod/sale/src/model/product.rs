use serde::{Deserialize, Serialize};

/// Product — only the fields the sale line logic reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    pub name: String,

    /// Sales price seeded into new lines.
    pub list_price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,
}
