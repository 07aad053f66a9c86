#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use posboard_client::submission::Payload;
use posboard_client::transport::{
    LookupTransport, SubmissionTransport, TransportError, TransportResult,
};
use posboard_core::{InventoryId, ProductId};
use posboard_inventory::{CandidateProduct, StockCandidate};

pub fn batch(id: i64, name: &str, saldo: i64) -> StockCandidate {
    StockCandidate {
        id: InventoryId::new(id),
        date_joined: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
        product: CandidateProduct {
            id: ProductId::new(100 + id),
            name: name.to_string(),
            code: format!("P{id}"),
            full_name: format!("{name} ({id})"),
            stock: saldo,
        },
        expiration_date: NaiveDate::from_ymd_opt(2025, 1, 31),
        quantity: saldo + 2,
        saldo: Decimal::from(saldo),
        value: None,
    }
}

/// POS server stand-in that records what reached it.
#[derive(Default)]
pub struct RecordingServer {
    pub batches: Vec<StockCandidate>,
    /// Per-term response time.
    pub latency: HashMap<String, Duration>,
    /// Terms that fail with a network error.
    pub broken_terms: Vec<String>,
    pub honors_exclusions: bool,
    pub searched: RefCell<Vec<String>>,
    pub posted: RefCell<Vec<Payload>>,
}

impl RecordingServer {
    pub fn new(batches: Vec<StockCandidate>) -> Self {
        Self {
            batches,
            honors_exclusions: true,
            ..Self::default()
        }
    }

    pub fn slow(mut self, term: &str, latency: Duration) -> Self {
        self.latency.insert(term.to_string(), latency);
        self
    }

    pub fn searched(&self) -> Vec<String> {
        self.searched.borrow().clone()
    }

    pub fn posted(&self) -> Vec<Payload> {
        self.posted.borrow().clone()
    }
}

#[async_trait(?Send)]
impl LookupTransport for RecordingServer {
    async fn search_product(
        &self,
        term: &str,
        exclude: &[InventoryId],
    ) -> TransportResult<Vec<StockCandidate>> {
        self.searched.borrow_mut().push(term.to_string());
        if let Some(latency) = self.latency.get(term) {
            tokio::time::sleep(*latency).await;
        }
        if self.broken_terms.iter().any(|t| t == term) {
            return Err(TransportError::Network("connection reset".into()));
        }
        let needle = term.to_lowercase();
        Ok(self
            .batches
            .iter()
            .filter(|b| b.product.name.to_lowercase().contains(&needle))
            .filter(|b| !self.honors_exclusions || !exclude.contains(&b.id))
            .cloned()
            .collect())
    }
}

#[async_trait(?Send)]
impl SubmissionTransport for RecordingServer {
    async fn submit(&self, _endpoint: &str, payload: &Payload) -> TransportResult<Value> {
        self.posted.borrow_mut().push(payload.clone());
        Ok(json!({"id": 1}))
    }
}
