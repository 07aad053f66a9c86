//! In-memory server used by unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use posboard_core::{InventoryId, ProductId};
use posboard_inventory::{CandidateProduct, InventoryBatch, StockCandidate};
use posboard_products::{ProductSummary, UniquenessCheck};

use crate::submission::Payload;
use crate::transport::{
    CatalogTransport, LookupTransport, SubmissionTransport, TransportError, TransportResult,
    check_reply,
};

pub fn candidate(id: i64, name: &str, saldo: i64) -> StockCandidate {
    StockCandidate {
        id: InventoryId::new(id),
        date_joined: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        product: CandidateProduct {
            id: ProductId::new(id * 10),
            name: name.to_string(),
            code: String::new(),
            full_name: String::new(),
            stock: saldo,
        },
        expiration_date: None,
        quantity: saldo,
        saldo: Decimal::from(saldo),
        value: None,
    }
}

/// Records every request and answers from fixed data.
pub struct FakeServer {
    pub catalog: Vec<StockCandidate>,
    /// Extra time a given search term takes to answer.
    pub latency: HashMap<String, Duration>,
    pub fail: bool,
    /// Ignore the exclusion list like a misbehaving server.
    pub ignore_exclusions: bool,
    pub requests: RefCell<Vec<String>>,
    pub reply: Value,
    pub submissions: RefCell<Vec<(String, Payload)>>,
    pub products: Vec<ProductSummary>,
    pub batches: HashMap<ProductId, Vec<InventoryBatch>>,
    pub taken: Vec<UniquenessCheck>,
}

impl Default for FakeServer {
    fn default() -> Self {
        Self {
            catalog: Vec::new(),
            latency: HashMap::new(),
            fail: false,
            ignore_exclusions: false,
            requests: RefCell::new(Vec::new()),
            reply: json!({}),
            submissions: RefCell::new(Vec::new()),
            products: Vec::new(),
            batches: HashMap::new(),
            taken: Vec::new(),
        }
    }
}

impl FakeServer {
    pub fn with_catalog(catalog: Vec<StockCandidate>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn submissions(&self) -> Vec<(String, Payload)> {
        self.submissions.borrow().clone()
    }

    fn down(&self) -> TransportResult<()> {
        if self.fail {
            return Err(TransportError::Network("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl LookupTransport for FakeServer {
    async fn search_product(
        &self,
        term: &str,
        exclude: &[InventoryId],
    ) -> TransportResult<Vec<StockCandidate>> {
        self.requests.borrow_mut().push(term.to_string());
        if let Some(latency) = self.latency.get(term) {
            tokio::time::sleep(*latency).await;
        }
        self.down()?;
        let term = term.to_lowercase();
        Ok(self
            .catalog
            .iter()
            .filter(|c| c.product.name.to_lowercase().contains(&term))
            .filter(|c| self.ignore_exclusions || !exclude.contains(&c.id))
            .cloned()
            .collect())
    }
}

#[async_trait(?Send)]
impl SubmissionTransport for FakeServer {
    async fn submit(&self, endpoint: &str, payload: &Payload) -> TransportResult<Value> {
        self.down()?;
        self.submissions
            .borrow_mut()
            .push((endpoint.to_string(), payload.clone()));
        check_reply(self.reply.clone())
    }
}

#[async_trait(?Send)]
impl CatalogTransport for FakeServer {
    async fn list_products(&self) -> TransportResult<Vec<ProductSummary>> {
        self.down()?;
        Ok(self.products.clone())
    }

    async fn search_inventory(&self, product: ProductId) -> TransportResult<Vec<InventoryBatch>> {
        self.down()?;
        Ok(self.batches.get(&product).cloned().unwrap_or_default())
    }

    async fn validate_data(&self, _endpoint: &str, check: &UniquenessCheck) -> TransportResult<bool> {
        self.down()?;
        Ok(!self.taken.contains(check))
    }
}
