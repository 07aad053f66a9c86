use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use posboard_core::{EditableField, FieldValue, LineItem, NoId, NumericInput};

/// One row of a product's tiered price table.
///
/// Buying at least `quantity` units sells at `net_price` each. Tiers carry no
/// identity; the same quantity may appear twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_price: Decimal,
}

impl PriceTier {
    pub fn new(quantity: i64, net_price: Decimal) -> Self {
        Self {
            quantity,
            net_price,
        }
    }
}

impl Default for PriceTier {
    /// A freshly added tier: one unit at `0.00`.
    fn default() -> Self {
        Self {
            quantity: 1,
            net_price: Decimal::new(0, 2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTierField {
    Quantity,
    NetPrice,
}

impl EditableField for PriceTierField {
    fn name(&self) -> &'static str {
        match self {
            PriceTierField::Quantity => "quantity",
            PriceTierField::NetPrice => "net_price",
        }
    }

    fn input(&self) -> NumericInput {
        match self {
            PriceTierField::Quantity => NumericInput::quantity(),
            PriceTierField::NetPrice => NumericInput::net_price(),
        }
    }

    fn all() -> &'static [Self] {
        &[PriceTierField::Quantity, PriceTierField::NetPrice]
    }
}

impl LineItem for PriceTier {
    type Id = NoId;
    type Field = PriceTierField;

    fn id(&self) -> Option<NoId> {
        None
    }

    fn set_field(&mut self, field: PriceTierField, value: FieldValue) {
        match field {
            PriceTierField::Quantity => self.quantity = value.as_integer(),
            PriceTierField::NetPrice => self.net_price = value.as_decimal(),
        }
    }

    fn field_value(&self, field: PriceTierField) -> FieldValue {
        match field {
            PriceTierField::Quantity => FieldValue::Integer(self.quantity),
            PriceTierField::NetPrice => FieldValue::Decimal(self.net_price),
        }
    }
}

/// A saved tier as the server returns it (gross price computed server-side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPriceTier {
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_price: Decimal,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub gross_price: Option<Decimal>,
}

impl From<SavedPriceTier> for PriceTier {
    fn from(saved: SavedPriceTier) -> Self {
        let mut net_price = saved.net_price.round_dp(2);
        net_price.rescale(2);
        Self {
            quantity: saved.quantity,
            net_price,
        }
    }
}
