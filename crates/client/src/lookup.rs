//! Search-as-you-type lookup of stock candidates.
//!
//! Every call takes the next sequence number. A debounced call only reaches
//! the transport if no newer call arrived while it waited, and any response
//! whose sequence is no longer the latest is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use posboard_core::InventoryId;
use posboard_inventory::{StockAdjustmentLine, StockCandidate};

use crate::transport::LookupTransport;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_MIN_TERM_LEN: usize = 3;

/// Timer used for the debounce window.
#[async_trait(?Send)]
pub trait Delay {
    async fn sleep(&self, duration: Duration);
}

/// Tokio timer (native builds).
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupSettings {
    pub debounce: Duration,
    pub min_term_len: usize,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            min_term_len: DEFAULT_MIN_TERM_LEN,
        }
    }
}

impl LookupSettings {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_min_term_len(mut self, min: usize) -> Self {
        self.min_term_len = min;
        self
    }
}

/// Result of one lookup call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Candidates for the newest call, already filtered by the exclusion list.
    Results(Vec<StockCandidate>),
    /// Term below the minimum length; nothing was sent.
    TooShort,
    /// A newer call took over; nothing to render.
    Superseded,
}

impl LookupOutcome {
    /// Candidates to render, if this outcome should replace what is shown.
    pub fn into_results(self) -> Option<Vec<StockCandidate>> {
        match self {
            LookupOutcome::Results(candidates) => Some(candidates),
            LookupOutcome::TooShort | LookupOutcome::Superseded => None,
        }
    }
}

pub struct RemoteLookup<L, D> {
    transport: L,
    delay: D,
    settings: LookupSettings,
    latest: AtomicU64,
}

impl<L: LookupTransport, D: Delay> RemoteLookup<L, D> {
    pub fn new(transport: L, delay: D, settings: LookupSettings) -> Self {
        Self {
            transport,
            delay,
            settings,
            latest: AtomicU64::new(0),
        }
    }

    pub fn transport(&self) -> &L {
        &self.transport
    }

    pub fn settings(&self) -> LookupSettings {
        self.settings
    }

    fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }

    /// Debounced autocomplete search.
    pub async fn search(&self, term: &str, exclude: &[InventoryId]) -> LookupOutcome {
        let seq = self.issue();
        if term.trim().chars().count() < self.settings.min_term_len {
            return LookupOutcome::TooShort;
        }
        self.delay.sleep(self.settings.debounce).await;
        if !self.is_latest(seq) {
            debug!(seq, "lookup debounced away");
            return LookupOutcome::Superseded;
        }
        self.query(seq, term, exclude).await
    }

    /// Immediate search for the staged results table; any term is allowed.
    pub async fn fetch(&self, term: &str, exclude: &[InventoryId]) -> LookupOutcome {
        let seq = self.issue();
        self.query(seq, term, exclude).await
    }

    async fn query(&self, seq: u64, term: &str, exclude: &[InventoryId]) -> LookupOutcome {
        let mut candidates = match self.transport.search_product(term, exclude).await {
            Ok(candidates) => candidates,
            Err(error) => {
                warn!(seq, term, %error, "lookup failed; showing no candidates");
                Vec::new()
            }
        };
        if !self.is_latest(seq) {
            debug!(seq, latest = self.latest.load(Ordering::SeqCst), "stale lookup response discarded");
            return LookupOutcome::Superseded;
        }
        candidates.retain(|c| !exclude.contains(&c.id));
        debug!(seq, term, found = candidates.len(), "lookup resolved");
        LookupOutcome::Results(candidates)
    }
}

/// Turn a chosen candidate into a detail line targeting its current balance.
pub fn select(candidate: StockCandidate) -> StockAdjustmentLine {
    debug!(id = %candidate.id, saldo = %candidate.saldo, "candidate selected");
    StockAdjustmentLine::from(candidate)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use rust_decimal::Decimal;

    use super::*;
    use crate::fakes::*;

    fn lookup(fake: FakeServer) -> RemoteLookup<Rc<FakeServer>, TokioDelay> {
        RemoteLookup::new(Rc::new(fake), TokioDelay, LookupSettings::default())
    }

    fn catalog() -> Vec<StockCandidate> {
        vec![candidate(1, "Cola", 5), candidate(2, "Cola Zero", 0), candidate(3, "Agua", 9)]
    }

    #[tokio::test(start_paused = true)]
    async fn burst_inside_window_sends_only_the_last_term() {
        let lookup = lookup(FakeServer::with_catalog(catalog()));
        let (first, second) = tokio::join!(lookup.search("col", &[]), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            lookup.search("cola", &[]).await
        });
        assert_eq!(first, LookupOutcome::Superseded);
        assert!(matches!(second, LookupOutcome::Results(ref c) if c.len() == 2));
        assert_eq!(lookup.transport().requests(), vec!["cola".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn short_terms_never_reach_the_server() {
        let lookup = lookup(FakeServer::with_catalog(catalog()));
        assert_eq!(lookup.search("co", &[]).await, LookupOutcome::TooShort);
        assert_eq!(lookup.search("  c ", &[]).await, LookupOutcome::TooShort);
        assert!(lookup.transport().requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_is_discarded() {
        let mut fake = FakeServer::with_catalog(catalog());
        fake.latency.insert("col".into(), Duration::from_millis(500));
        fake.latency.insert("agu".into(), Duration::from_millis(10));
        let lookup = lookup(fake);

        let (slow, fast) = tokio::join!(lookup.fetch("col", &[]), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            lookup.fetch("agu", &[]).await
        });
        assert_eq!(slow, LookupOutcome::Superseded);
        assert_eq!(fast, LookupOutcome::Results(vec![candidate(3, "Agua", 9)]));
    }

    #[tokio::test(start_paused = true)]
    async fn excluded_ids_are_dropped_even_if_server_ignores_them() {
        let mut fake = FakeServer::with_catalog(catalog());
        fake.ignore_exclusions = true;
        let lookup = lookup(fake);
        let outcome = lookup.search("cola", &[InventoryId::new(1)]).await;
        let ids: Vec<i64> = outcome
            .into_results()
            .unwrap()
            .iter()
            .map(|c| c.id.get())
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_request_degrades_to_no_candidates() {
        let mut fake = FakeServer::with_catalog(catalog());
        fake.fail = true;
        let lookup = lookup(fake);
        assert_eq!(lookup.search("cola", &[]).await, LookupOutcome::Results(vec![]));
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_skips_debounce_and_minimum() {
        let lookup = lookup(FakeServer::with_catalog(catalog()));
        let outcome = lookup.fetch("", &[]).await;
        assert_eq!(outcome.into_results().unwrap().len(), 3);
        assert_eq!(lookup.transport().requests(), vec![String::new()]);
    }

    #[test]
    fn selection_targets_the_balance() {
        let line = select(candidate(4, "Pan", 12));
        assert_eq!(line.newstock, 12);
        assert_eq!(line.saldo, Decimal::from(12));
        assert_eq!(line.product_name, "Pan");
    }
}
