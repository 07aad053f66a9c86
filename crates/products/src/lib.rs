//! Products module (client side).
//!
//! Price tiers edited on the product form, the product read model the listing
//! renders, and the form's field rules. Pure data and validation (no IO).

pub mod catalog;
pub mod form;
pub mod price_tier;

pub use catalog::{CategorySummary, ProductSummary, StockBadge};
pub use form::{FieldError, FormAction, ProductForm, UniquenessCheck, ValidProductForm};
pub use price_tier::{PriceTier, PriceTierField, SavedPriceTier};
