//! Browser transport: form posts through `window.fetch`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, UrlSearchParams, window};

use posboard_core::{InventoryId, ProductId};
use posboard_inventory::{InventoryBatch, StockCandidate};
use posboard_products::{ProductSummary, UniquenessCheck};

use crate::config::ClientConfig;
use crate::lookup::Delay;
use crate::submission::Payload;
use crate::transport::{
    CatalogTransport, LookupTransport, SubmissionTransport, TransportError, TransportResult,
    check_reply, decode_reply, search_product_pairs, validity,
};

fn js_error(value: JsValue) -> TransportError {
    TransportError::Network(format!("{value:?}"))
}

/// Configuration for the page the app was served from: same origin, CSRF
/// token from the `csrftoken` cookie.
pub fn page_config() -> ClientConfig {
    let Some(window) = window() else {
        return ClientConfig::default();
    };
    let mut config = ClientConfig::default();
    if let Ok(origin) = window.location().origin() {
        config = config.with_base_url(origin);
    }
    let cookie = window
        .document()
        .and_then(|doc| doc.dyn_into::<web_sys::HtmlDocument>().ok())
        .and_then(|doc| doc.cookie().ok())
        .unwrap_or_default();
    match csrf_from_cookie(&cookie) {
        Some(token) => config.with_csrf_token(token),
        None => config,
    }
}

fn csrf_from_cookie(cookie: &str) -> Option<String> {
    cookie
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == "csrftoken")
        .map(|(_, value)| value.to_string())
}

pub struct FetchTransport {
    config: ClientConfig,
}

impl FetchTransport {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post_form(&self, path: &str, pairs: &[(String, String)]) -> TransportResult<Value> {
        let window = window().ok_or_else(|| TransportError::Network("no window object".into()))?;
        let url = self.config.url(path);
        debug!(%url, "posting form");

        let body = UrlSearchParams::new().map_err(js_error)?;
        for (key, value) in pairs {
            body.append(key, value);
        }
        let headers = Headers::new().map_err(js_error)?;
        headers
            .set("X-Requested-With", "XMLHttpRequest")
            .map_err(js_error)?;
        if let Some(token) = &self.config.csrf_token {
            headers.set("X-CSRFToken", token).map_err(js_error)?;
        }

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&body);
        let request = Request::new_with_str_and_init(&url, &init).map_err(js_error)?;

        let resp: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;

        if !resp.ok() {
            let text = match resp.text() {
                Ok(promise) => JsFuture::from(promise).await.ok().and_then(|v| v.as_string()),
                Err(_) => None,
            };
            return Err(TransportError::Status(resp.status(), text.unwrap_or_default()));
        }

        let json = JsFuture::from(resp.json().map_err(js_error)?)
            .await
            .map_err(|e| TransportError::Decode(format!("{e:?}")))?;
        serde_wasm_bindgen::from_value(json).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl LookupTransport for FetchTransport {
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
impl SubmissionTransport for FetchTransport {
    async fn submit(&self, endpoint: &str, payload: &Payload) -> TransportResult<Value> {
        let reply = self.post_form(endpoint, &payload.to_form_pairs()).await?;
        check_reply(reply)
    }
}

#[async_trait(?Send)]
impl CatalogTransport for FetchTransport {
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

/// Debounce timer backed by `setTimeout`.
pub struct TimeoutDelay;

#[async_trait(?Send)]
impl Delay for TimeoutDelay {
    async fn sleep(&self, duration: Duration) {
        let ms = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let scheduled = window().and_then(|w| {
                w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                    .ok()
            });
            if scheduled.is_none() {
                let _ = resolve.call0(&JsValue::NULL);
            }
        });
        let _ = JsFuture::from(promise).await;
    }
}
