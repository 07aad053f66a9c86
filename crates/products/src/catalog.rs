//! Product records as the product list endpoint returns them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use posboard_core::{CategoryId, ProductId};

use crate::price_tier::SavedPriceTier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
}

/// Read model of one product.
///
/// Optional server fields default so older payloads still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub full_name: String,
    pub category: CategorySummary,
    #[serde(default = "default_true")]
    pub inventoried: bool,
    #[serde(default)]
    pub has_expiration_date: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(with = "rust_decimal::serde::float", default)]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float", default)]
    pub pvp: Decimal,
    #[serde(with = "rust_decimal::serde::float", default)]
    pub price_promotion: Decimal,
    #[serde(default)]
    pub price_list: Vec<SavedPriceTier>,
    #[serde(default)]
    pub stock: i64,
}

fn default_true() -> bool {
    true
}

/// Stock badge shown in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockBadge {
    /// Inventoried with units on hand.
    InStock(i64),
    /// Inventoried but depleted (or negative).
    Depleted(i64),
    /// Not tracked in inventory.
    NotTracked,
}

impl ProductSummary {
    /// Display name, falling back to `name (code)` when the server omitted it.
    pub fn display_name(&self) -> String {
        if self.full_name.is_empty() {
            format!("{} ({})", self.name, self.code)
        } else {
            self.full_name.clone()
        }
    }

    pub fn stock_badge(&self) -> StockBadge {
        match (self.inventoried, self.stock) {
            (false, _) => StockBadge::NotTracked,
            (true, s) if s > 0 => StockBadge::InStock(s),
            (true, s) => StockBadge::Depleted(s),
        }
    }

    /// Whether a promotion currently overrides the list price.
    pub fn on_promotion(&self) -> bool {
        self.price_promotion > Decimal::ZERO
    }
}
