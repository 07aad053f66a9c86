//! Turns a store snapshot and form fields into one request payload.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info};

use posboard_core::{EditorError, EditorResult, LineItem};
use posboard_products::FormAction;

use crate::store::LineItemStore;

/// Shown when a stock adjustment is submitted without lines.
pub const EMPTY_DETAIL_MESSAGE: &str = "Debe tener al menos un producto en su detalle";

/// How one page posts its detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionSpec {
    pub action: String,
    /// Form key the serialized detail goes under.
    pub items_key: &'static str,
    pub require_items: bool,
    pub empty_message: String,
}

impl SubmissionSpec {
    pub fn stock_adjustment() -> Self {
        Self {
            action: "create".to_string(),
            items_key: "products",
            require_items: true,
            empty_message: EMPTY_DETAIL_MESSAGE.to_string(),
        }
    }

    /// Product create/edit; a product may be saved without tiers.
    pub fn price_list(action: FormAction) -> Self {
        Self {
            action: action.as_str().to_string(),
            items_key: "price_list",
            require_items: false,
            empty_message: String::new(),
        }
    }
}

/// An assembled request.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub action: String,
    pub fields: BTreeMap<String, String>,
    pub items_key: String,
    /// JSON array of the snapshot, in store order.
    pub items: Value,
}

impl Payload {
    pub fn item_count(&self) -> usize {
        self.items.as_array().map_or(0, Vec::len)
    }

    /// Flatten to form-encoded pairs: action, form fields, then the detail.
    pub fn to_form_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.fields.len() + 2);
        pairs.push(("action".to_string(), self.action.clone()));
        pairs.extend(self.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs.push((self.items_key.clone(), self.items.to_string()));
        pairs
    }
}

/// Build the payload for `store`, failing fast on an empty required detail.
pub fn build_payload<T: LineItem>(
    spec: &SubmissionSpec,
    form_fields: impl IntoIterator<Item = (String, String)>,
    store: &LineItemStore<T>,
) -> EditorResult<Payload> {
    if spec.require_items && store.is_empty() {
        debug!(action = %spec.action, "submission blocked: empty detail");
        return Err(EditorError::empty_submission(spec.empty_message.clone()));
    }

    let fields: BTreeMap<String, String> = form_fields
        .into_iter()
        .filter(|(k, _)| k != "action" && k != spec.items_key)
        .collect();
    let items =
        serde_json::to_value(store.snapshot()).map_err(|e| EditorError::Encode(e.to_string()))?;

    let payload = Payload {
        action: spec.action.clone(),
        fields,
        items_key: spec.items_key.to_string(),
        items,
    };
    info!(
        action = %payload.action,
        key = %payload.items_key,
        items = payload.item_count(),
        "payload assembled"
    );
    Ok(payload)
}
