//! Page controllers.
//!
//! A page owns its stores, grids, lookup and submission settings; nothing is
//! shared between pages.

pub mod price_list;
pub mod product_list;
pub mod stock_adjustment;

pub use price_list::{PriceListEditor, price_list_schema};
pub use product_list::ProductListPage;
pub use stock_adjustment::{StockAdjustmentWorkbench, adjustment_schema};

use posboard_core::EditorError;
use posboard_products::FieldError;

use crate::transport::TransportError;

/// Why a page could not submit.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{} field(s) failed validation", .0.len())]
    InvalidForm(Vec<FieldError>),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SubmitError {
    /// Message for the operator, if this failure should be shown.
    pub fn user_message(&self) -> Option<String> {
        match self {
            SubmitError::Editor(e) if e.is_user_visible() => Some(e.to_string()),
            SubmitError::Transport(e) if e.is_user_visible() => Some(e.to_string()),
            SubmitError::InvalidForm(errors) => Some(
                errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.error))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            _ => None,
        }
    }
}
