//! `posboard-core` — building blocks shared by every editor.
//!
//! This crate contains **pure** client primitives (no IO, no rendering).

pub mod date;
pub mod error;
pub mod id;
pub mod line_item;
pub mod numeric;

pub use error::{EditorError, EditorResult, ValidationError};
pub use id::{CategoryId, InventoryId, ProductId};
pub use line_item::{EditableField, LineItem, NoField, NoId};
pub use numeric::{FieldValue, KeystrokeFilter, NumericInput, NumericKind};
