//! Inventory batches shown in the product listing drill-down.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use posboard_core::InventoryId;

/// One received batch of a product, as `search_inventory` returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryBatch {
    pub id: InventoryId,
    #[serde(with = "posboard_core::date::lenient")]
    pub date_joined: NaiveDate,
    #[serde(with = "posboard_core::date::lenient_opt", default)]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub saldo: i64,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl InventoryBatch {
    /// Days until the batch expires; `0` for batches without an expiration date.
    pub fn days_to_expire(&self, today: NaiveDate) -> i64 {
        self.expiration_date
            .map(|d| (d - today).num_days())
            .unwrap_or(0)
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date.is_some_and(|d| d < today)
    }
}

/// Sort batches the way the drill-down lists them: soonest expiry first, then
/// oldest batch. Batches without an expiration date go last.
pub fn sort_for_drilldown(batches: &mut [InventoryBatch]) {
    batches.sort_by(|a, b| {
        let key = |x: &InventoryBatch| (x.expiration_date.is_none(), x.expiration_date, x.date_joined);
        key(a).cmp(&key(b))
    });
}
