//! HTTP transport for native builds.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use posboard_core::{InventoryId, ProductId};
use posboard_inventory::{InventoryBatch, StockCandidate};
use posboard_products::{ProductSummary, UniquenessCheck};

use crate::config::ClientConfig;
use crate::submission::Payload;
use crate::transport::{
    CatalogTransport, LookupTransport, SubmissionTransport, TransportError, TransportResult,
    decode_reply, search_product_pairs, validity,
};

/// Posts forms to the POS server with `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post_form(&self, path: &str, pairs: &[(String, String)]) -> TransportResult<Value> {
        let url = self.config.url(path);
        let action = pairs
            .iter()
            .find(|(k, _)| k == "action")
            .map(|(_, v)| v.as_str())
            .unwrap_or_default();
        debug!(%url, action, "posting form");

        let mut req = self
            .client
            .post(&url)
            .header("X-Requested-With", "XMLHttpRequest")
            .form(pairs);
        if let Some(token) = &self.config.csrf_token {
            req = req.header("X-CSRFToken", token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(TransportError::Status(
                resp.status().as_u16(),
                resp.text().await.unwrap_or_default(),
            ));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl LookupTransport for HttpTransport {
    async fn search_product(
        &self,
        term: &str,
        exclude: &[InventoryId],
    ) -> TransportResult<Vec<StockCandidate>> {
        let pairs = search_product_pairs(term, exclude);
        let reply = self.post_form(&self.config.endpoints.stock_adjustment, &pairs).await?;
        decode_reply(reply)
    }
}

#[async_trait(?Send)]
impl SubmissionTransport for HttpTransport {
    async fn submit(&self, endpoint: &str, payload: &Payload) -> TransportResult<Value> {
        let reply = self.post_form(endpoint, &payload.to_form_pairs()).await?;
        crate::transport::check_reply(reply)
    }
}

#[async_trait(?Send)]
impl CatalogTransport for HttpTransport {
    async fn list_products(&self) -> TransportResult<Vec<ProductSummary>> {
        let pairs = [("action".to_string(), "search".to_string())];
        let reply = self.post_form(&self.config.endpoints.product_list, &pairs).await?;
        decode_reply(reply)
    }

    async fn search_inventory(&self, product: ProductId) -> TransportResult<Vec<InventoryBatch>> {
        let pairs = [
            ("action".to_string(), "search_inventory".to_string()),
            ("id".to_string(), product.to_string()),
        ];
        let reply = self.post_form(&self.config.endpoints.product_list, &pairs).await?;
        decode_reply(reply)
    }

    async fn validate_data(&self, endpoint: &str, check: &UniquenessCheck) -> TransportResult<bool> {
        let reply = self.post_form(endpoint, &check.to_form_pairs()).await?;
        validity(reply)
    }
}
