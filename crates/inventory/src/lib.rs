//! Inventory module (client side).
//!
//! Stock-adjustment lines and lookup candidates, plus the batch rows of the
//! product drill-down. Plain data shaped after the server JSON (no IO).

pub mod adjustment;
pub mod batch;

pub use adjustment::{CandidateProduct, StockAdjustmentField, StockAdjustmentLine, StockCandidate};
pub use batch::{InventoryBatch, sort_for_drilldown};
