//! Client configuration.

use std::time::Duration;

use tracing::warn;

use crate::lookup::{DEFAULT_DEBOUNCE, DEFAULT_MIN_TERM_LEN, LookupSettings};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Endpoint paths, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub product_list: String,
    pub product_create: String,
    pub stock_adjustment: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            product_list: "/pos/inventory/product/".to_string(),
            product_create: "/pos/inventory/product/add/".to_string(),
            stock_adjustment: "/pos/inventory/product/stock/adjustment/".to_string(),
        }
    }
}

impl Endpoints {
    /// Edit form of one product.
    pub fn product_update(&self, id: posboard_core::ProductId) -> String {
        format!("{}update/{}/", self.product_list, id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Sent as `X-CSRFToken`.
    pub csrf_token: Option<String>,
    pub lookup_debounce: Duration,
    pub lookup_min_term: usize,
    pub endpoints: Endpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            csrf_token: None,
            lookup_debounce: DEFAULT_DEBOUNCE,
            lookup_min_term: DEFAULT_MIN_TERM_LEN,
            endpoints: Endpoints::default(),
        }
    }
}

impl ClientConfig {
    /// Read `POSBOARD_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults and
    /// unparseable numbers fall back with a warning.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = get("POSBOARD_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(url);
        }
        if let Some(token) = get("POSBOARD_CSRF_TOKEN").filter(|v| !v.is_empty()) {
            config = config.with_csrf_token(token);
        }
        if let Some(ms) = parse_var::<u64>(&get, "POSBOARD_LOOKUP_DEBOUNCE_MS") {
            config = config.with_lookup_debounce(Duration::from_millis(ms));
        }
        if let Some(min) = parse_var::<usize>(&get, "POSBOARD_LOOKUP_MIN_TERM") {
            config = config.with_lookup_min_term(min);
        }
        if let Some(path) = get("POSBOARD_PRODUCT_LIST_PATH") {
            config.endpoints.product_list = path;
        }
        if let Some(path) = get("POSBOARD_PRODUCT_CREATE_PATH") {
            config.endpoints.product_create = path;
        }
        if let Some(path) = get("POSBOARD_STOCK_ADJUSTMENT_PATH") {
            config.endpoints.stock_adjustment = path;
        }
        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    pub fn with_lookup_debounce(mut self, debounce: Duration) -> Self {
        self.lookup_debounce = debounce;
        self
    }

    pub fn with_lookup_min_term(mut self, min: usize) -> Self {
        self.lookup_min_term = min;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn lookup_settings(&self) -> LookupSettings {
        LookupSettings::default()
            .with_debounce(self.lookup_debounce)
            .with_min_term_len(self.lookup_min_term)
    }

    /// Absolute URL of an endpoint path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn parse_var<T: std::str::FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = get(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable setting; using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ClientConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let config = from(&[]);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.lookup_settings(), LookupSettings::default());
        assert_eq!(config.lookup_debounce, Duration::from_millis(300));
        assert_eq!(config.lookup_min_term, 3);
    }

    #[test]
    fn environment_overrides() {
        let config = from(&[
            ("POSBOARD_BASE_URL", "https://pos.example.com/"),
            ("POSBOARD_CSRF_TOKEN", "tok"),
            ("POSBOARD_LOOKUP_DEBOUNCE_MS", "150"),
            ("POSBOARD_LOOKUP_MIN_TERM", "2"),
            ("POSBOARD_STOCK_ADJUSTMENT_PATH", "/adjust/"),
        ]);
        assert_eq!(config.base_url, "https://pos.example.com");
        assert_eq!(config.csrf_token.as_deref(), Some("tok"));
        assert_eq!(config.lookup_debounce, Duration::from_millis(150));
        assert_eq!(config.lookup_min_term, 2);
        assert_eq!(config.url(&config.endpoints.stock_adjustment), "https://pos.example.com/adjust/");
    }

    #[test]
    fn bad_numbers_fall_back() {
        let config = from(&[("POSBOARD_LOOKUP_DEBOUNCE_MS", "soon"), ("POSBOARD_LOOKUP_MIN_TERM", "-1")]);
        assert_eq!(config.lookup_debounce, DEFAULT_DEBOUNCE);
        assert_eq!(config.lookup_min_term, DEFAULT_MIN_TERM_LEN);
    }

    #[test]
    fn update_path() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.product_update(posboard_core::ProductId::new(9)),
            "/pos/inventory/product/update/9/"
        );
    }
}
