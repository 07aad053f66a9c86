//! Stock-adjustment workbench: search batches, set target stock, submit.

use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info};

use posboard_core::{EditorError, EditorResult, InventoryId};
use posboard_inventory::{StockAdjustmentField, StockAdjustmentLine, StockCandidate};

use crate::grid::{GridBinding, GridEvent, GridOutcome, GridSchema, GridTarget, RowEmphasis};
use crate::lookup::{self, Delay, LookupOutcome, LookupSettings, RemoteLookup};
use crate::pages::SubmitError;
use crate::staging::{StagedSearch, format_date, format_optional_date};
use crate::store::{EditorPhase, LineItemStore};
use crate::submission::{Payload, SubmissionSpec, build_payload};
use crate::transport::{LookupTransport, SubmissionTransport};

/// Column layout of the adjustment detail.
pub fn adjustment_schema() -> GridSchema<StockAdjustmentLine> {
    GridSchema::<StockAdjustmentLine>::new("stock-adjustment")
        .remove_control()
        .display("Fecha de registro", |l| format_date(&l.date_joined))
        .display("Producto", |l| l.product_name.clone())
        .display("Fecha de caducidad", |l| format_optional_date(&l.expiration_date))
        .display("Cantidad", |l| l.quantity.to_string())
        .display("Saldo", |l| l.saldo.normalize().to_string())
        .editable("Nuevo stock", StockAdjustmentField::NewStock)
        .emphasize(|l| {
            if l.saldo.is_sign_negative() || l.saldo.is_zero() {
                RowEmphasis::Danger
            } else {
                RowEmphasis::Normal
            }
        })
}

pub struct StockAdjustmentWorkbench<T, D, G: GridTarget, H: GridTarget> {
    endpoint: String,
    detail: LineItemStore<StockAdjustmentLine>,
    grid: GridBinding<StockAdjustmentLine, G>,
    staged: StagedSearch<H>,
    lookup: Rc<RemoteLookup<T, D>>,
}

impl<T, D, G, H> StockAdjustmentWorkbench<T, D, G, H>
where
    T: LookupTransport + SubmissionTransport,
    D: Delay,
    G: GridTarget,
    H: GridTarget,
{
    pub fn new(
        transport: T,
        delay: D,
        settings: LookupSettings,
        detail_target: G,
        staged_target: H,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            detail: LineItemStore::new(),
            grid: GridBinding::new(adjustment_schema(), detail_target),
            staged: StagedSearch::new(staged_target),
            lookup: Rc::new(RemoteLookup::new(transport, delay, settings)),
        }
    }

    pub fn lines(&self) -> &[StockAdjustmentLine] {
        self.detail.snapshot()
    }

    pub fn phase(&self) -> EditorPhase {
        self.detail.phase()
    }

    /// Ids already in the detail; lookups never offer these again.
    pub fn detail_ids(&self) -> Vec<InventoryId> {
        self.detail.list_ids()
    }

    pub fn grid(&self) -> &GridBinding<StockAdjustmentLine, G> {
        &self.grid
    }

    pub fn staged(&self) -> &StagedSearch<H> {
        &self.staged
    }

    pub fn transport(&self) -> &T {
        self.lookup.transport()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Shared handle for callers that must not hold the page across an await.
    pub fn lookup_handle(&self) -> Rc<RemoteLookup<T, D>> {
        Rc::clone(&self.lookup)
    }

    /// Re-render the detail (e.g. to restore an input after a rejected edit).
    pub fn refresh(&mut self) {
        self.grid.render(&self.detail);
    }

    /// Autocomplete: debounced search excluding what is already added.
    pub async fn search(&self, term: &str) -> LookupOutcome {
        let exclude = self.detail_ids();
        let outcome = self.lookup.search(term, &exclude).await;
        self.offerable(outcome)
    }

    /// Drop candidates the detail gained while `outcome` was in flight.
    pub fn offerable(&self, outcome: LookupOutcome) -> LookupOutcome {
        match outcome {
            LookupOutcome::Results(candidates) => LookupOutcome::Results(
                candidates
                    .into_iter()
                    .filter(|c| !self.detail.contains_id(&c.id))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Add the chosen autocomplete candidate with `newstock = saldo`.
    pub fn select(&mut self, candidate: StockCandidate) -> EditorResult<usize> {
        let id = candidate.id;
        let position = self.detail.add_unique(lookup::select(candidate))?;
        self.grid.render(&self.detail);
        self.staged.discard(&id);
        Ok(position)
    }

    /// Fill the staged results table for `term`; returns how many rows it shows.
    pub async fn open_staged(&mut self, term: &str) -> usize {
        let exclude = self.detail_ids();
        let outcome = self.lookup.fetch(term, &exclude).await;
        self.load_staged(outcome)
    }

    /// Show a fetched result set in the staged table; stale outcomes keep
    /// whatever is shown.
    pub fn load_staged(&mut self, outcome: LookupOutcome) -> usize {
        match self.offerable(outcome) {
            LookupOutcome::Results(candidates) => self.staged.load(candidates),
            LookupOutcome::TooShort | LookupOutcome::Superseded => {
                debug!("staged search result dropped");
            }
        }
        self.staged.candidates().len()
    }

    /// Route a staged-table click; an add moves the row into the detail.
    ///
    /// A refused add leaves the staged row where it was.
    pub fn staged_event(&mut self, event: GridEvent) -> EditorResult<Option<usize>> {
        if let Some(candidate) = self.staged.add_target(&event)? {
            if self.detail.phase() == EditorPhase::Submitted {
                return Err(EditorError::Submitted);
            }
            if self.detail.contains_id(&candidate.id) {
                return Err(EditorError::duplicate(candidate.id));
            }
        }
        let Some(line) = self.staged.handle(event)? else {
            return Ok(None);
        };
        let position = self.detail.add_unique(line)?;
        self.grid.render(&self.detail);
        Ok(Some(position))
    }

    /// Route a detail-table interaction.
    pub fn handle(&mut self, event: GridEvent) -> EditorResult<GridOutcome<StockAdjustmentLine>> {
        self.grid.handle(&mut self.detail, event)
    }

    /// Drop every line (after the operator confirmed).
    pub fn remove_all(&mut self) -> EditorResult<usize> {
        let removed = self.detail.clear()?;
        self.grid.render(&self.detail);
        Ok(removed)
    }

    /// Post the detail; refused with the operator message while it is empty.
    pub async fn submit(&mut self) -> Result<Value, SubmitError> {
        let payload = self.payload()?;
        let reply = self.lookup.transport().submit(&self.endpoint, &payload).await?;
        self.mark_submitted(&payload);
        Ok(reply)
    }

    /// Assemble the request without sending it.
    pub fn payload(&self) -> EditorResult<Payload> {
        build_payload(&SubmissionSpec::stock_adjustment(), std::iter::empty(), &self.detail)
    }

    /// Freeze the detail once the server accepted `payload`.
    pub fn mark_submitted(&mut self, payload: &Payload) {
        self.detail.mark_submitted();
        info!(lines = payload.item_count(), "stock adjustment submitted");
    }
}
