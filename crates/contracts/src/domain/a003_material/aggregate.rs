use crate::domain::common::{lenient_record_id, RecordId};
use crate::shared::number::lenient_f64;
use serde::{Deserialize, Serialize};

/// Brand written on materials created from free-typed line items
pub const PENDING_BRAND: &str = "Pendente";

/// Price written on such materials when the typed line has no price yet
pub const PENDING_PRICE_FLOOR: f64 = 0.01;

/// Material (part/inventory item) record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(deserialize_with = "lenient_record_id")]
    pub id: RecordId,

    #[serde(rename = "descricao", default)]
    pub description: String,

    #[serde(rename = "marca", default)]
    pub brand: Option<String>,

    #[serde(rename = "preco", default, deserialize_with = "lenient_f64")]
    pub price: f64,

    // Created from a service ticket and still lacks brand or price
    #[serde(rename = "incompleto", default)]
    pub incomplete: bool,
}

impl Material {
    pub fn display_label(&self) -> String {
        format!("{} - R$ {:.2}", self.description, self.price)
    }
}

/// Body of `POST/PUT /api/material`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPayload {
    #[serde(rename = "descricao")]
    pub description: String,

    #[serde(rename = "marca")]
    pub brand: String,

    #[serde(rename = "preco")]
    pub price: f64,

    #[serde(rename = "incompleto")]
    pub incomplete: bool,
}

impl MaterialPayload {
    /// Payload with the completeness marker derived from brand and price
    pub fn new(description: String, brand: String, price: f64) -> Self {
        let incomplete = !(!brand.trim().is_empty() && price > 0.0);
        Self {
            description,
            brand,
            price,
            incomplete,
        }
    }

    /// Placeholder record for a line item typed on a service ticket
    pub fn pending(description: String, provisional_price: f64) -> Self {
        let price = if provisional_price > 0.0 {
            provisional_price
        } else {
            PENDING_PRICE_FLOOR
        };
        Self {
            description,
            brand: PENDING_BRAND.to_string(),
            price,
            incomplete: true,
        }
    }
}
