//! [`Manufacturer`] and [`Product`], shared across documents and never
//! deleted by the ingestion pipeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A printer/copier manufacturer, identified uniquely by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    /// Stable identifier.
    pub id: Uuid,
    /// Canonical lowercase key, e.g. `"konica_minolta"`.
    pub name: String,
    /// Human-readable name, e.g. `"Konica Minolta"`.
    pub display_name: String,
    /// Country of origin, when known.
    pub country: Option<String>,
}

impl Manufacturer {
    /// Creates a manufacturer row as it is created on first sighting.
    #[must_use]
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            display_name: display_name.into(),
            country: None,
        }
    }
}

/// A product (printer/copier model), unique per `(model_number, manufacturer_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier.
    pub id: Uuid,
    /// Model number, e.g. `"C450i"`.
    pub model_number: String,
    /// Display name, defaults to the model number if none is known.
    pub display_name: String,
    /// Owning manufacturer.
    pub manufacturer_id: Uuid,
    /// Free-form product type label, e.g. `"mfp"`, `"printer"`.
    pub product_type: String,
}

impl Product {
    /// Creates a product row with `display_name` defaulted from `model_number`.
    #[must_use]
    pub fn new(model_number: impl Into<String>, manufacturer_id: Uuid) -> Self {
        let model_number = model_number.into();
        Self {
            id: Uuid::new_v4(),
            display_name: model_number.clone(),
            model_number,
            manufacturer_id,
            product_type: "unknown".to_string(),
        }
    }
}
