//! Request/response collaborators the editors talk to.
//!
//! Every server action is a form POST with an `action` field; replies are JSON
//! and an object carrying `error` means the server refused.

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use posboard_core::{InventoryId, ProductId};
use posboard_inventory::{InventoryBatch, StockCandidate};
use posboard_products::{ProductSummary, UniquenessCheck};

use crate::submission::Payload;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server error ({0}): {1}")]
    Status(u16, String),
    #[error("decode error: {0}")]
    Decode(String),
    /// The server answered with an `error` entry.
    #[error("{0}")]
    Rejected(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

impl TransportError {
    /// Whether the message should be shown to the operator as-is.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, TransportError::Rejected(_))
    }
}

/// Map an `{"error": ...}` reply to [`TransportError::Rejected`].
///
/// Form errors arrive as an object of field -> messages; they are flattened
/// into one line.
pub fn check_reply(reply: Value) -> TransportResult<Value> {
    let Some(error) = reply.as_object().and_then(|o| o.get("error")) else {
        return Ok(reply);
    };
    let message = match error {
        Value::String(s) => s.clone(),
        Value::Object(fields) => fields
            .iter()
            .map(|(field, msgs)| match msgs {
                Value::Array(list) => {
                    let joined: Vec<String> = list.iter().map(plain).collect();
                    format!("{field}: {}", joined.join(", "))
                }
                other => format!("{field}: {}", plain(other)),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => plain(other),
    };
    Err(TransportError::Rejected(message))
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Decode a checked reply into `T`.
pub fn decode_reply<T: serde::de::DeserializeOwned>(reply: Value) -> TransportResult<T> {
    serde_json::from_value(check_reply(reply)?).map_err(|e| TransportError::Decode(e.to_string()))
}

/// Form pairs of the `search_product` action.
pub fn search_product_pairs(term: &str, exclude: &[InventoryId]) -> Vec<(String, String)> {
    let ids: Vec<i64> = exclude.iter().map(|id| id.get()).collect();
    vec![
        ("action".to_string(), "search_product".to_string()),
        ("term".to_string(), term.to_string()),
        ("ids".to_string(), serde_json::json!(ids).to_string()),
    ]
}

/// Candidates for the stock-adjustment detail.
#[async_trait(?Send)]
pub trait LookupTransport {
    /// Run `search_product`; `exclude` is sent along as a JSON id list.
    async fn search_product(
        &self,
        term: &str,
        exclude: &[InventoryId],
    ) -> TransportResult<Vec<StockCandidate>>;
}

/// Posts an assembled payload.
#[async_trait(?Send)]
pub trait SubmissionTransport {
    async fn submit(&self, endpoint: &str, payload: &Payload) -> TransportResult<Value>;
}

/// Product listing actions.
#[async_trait(?Send)]
pub trait CatalogTransport {
    /// Every product (`search`).
    async fn list_products(&self) -> TransportResult<Vec<ProductSummary>>;

    /// Active batches of one product (`search_inventory`).
    async fn search_inventory(&self, product: ProductId) -> TransportResult<Vec<InventoryBatch>>;

    /// Whether the probed name/code is still free (`validate_data`).
    async fn validate_data(&self, endpoint: &str, check: &UniquenessCheck) -> TransportResult<bool>;
}

#[async_trait(?Send)]
impl<T: LookupTransport + ?Sized> LookupTransport for Rc<T> {
    async fn search_product(
        &self,
        term: &str,
        exclude: &[InventoryId],
    ) -> TransportResult<Vec<StockCandidate>> {
        (**self).search_product(term, exclude).await
    }
}

#[async_trait(?Send)]
impl<T: SubmissionTransport + ?Sized> SubmissionTransport for Rc<T> {
    async fn submit(&self, endpoint: &str, payload: &Payload) -> TransportResult<Value> {
        (**self).submit(endpoint, payload).await
    }
}

#[async_trait(?Send)]
impl<T: CatalogTransport + ?Sized> CatalogTransport for Rc<T> {
    async fn list_products(&self) -> TransportResult<Vec<ProductSummary>> {
        (**self).list_products().await
    }

    async fn search_inventory(&self, product: ProductId) -> TransportResult<Vec<InventoryBatch>> {
        (**self).search_inventory(product).await
    }

    async fn validate_data(&self, endpoint: &str, check: &UniquenessCheck) -> TransportResult<bool> {
        (**self).validate_data(endpoint, check).await
    }
}

#[derive(Debug, serde::Deserialize)]
struct Validity {
    valid: bool,
}

/// Decode a `validate_data` reply.
pub fn validity(reply: Value) -> TransportResult<bool> {
    decode_reply::<Validity>(reply).map(|v| v.valid)
}
