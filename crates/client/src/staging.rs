//! Staged search: a results table the operator adds from one row at a time.

use tracing::debug;

use posboard_core::{EditorResult, InventoryId};
use posboard_inventory::{StockAdjustmentLine, StockCandidate};

use crate::grid::{
    GridBinding, GridEvent, GridEventKind, GridOutcome, GridSchema, GridTarget, RowEmphasis,
};
use crate::lookup;
use crate::store::LineItemStore;

pub(crate) fn format_date(date: &chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn format_optional_date(date: &Option<chrono::NaiveDate>) -> String {
    date.as_ref().map(format_date).unwrap_or_default()
}

/// Column layout of the staged results table.
pub fn staged_schema() -> GridSchema<StockCandidate> {
    GridSchema::<StockCandidate>::new("staged-search")
        .display("Fecha de registro", |c| format_date(&c.date_joined))
        .display("Producto", |c| c.product.display_name().to_string())
        .display("Fecha de caducidad", |c| format_optional_date(&c.expiration_date))
        .display("Cantidad", |c| c.quantity.to_string())
        .display("Saldo", |c| c.saldo.normalize().to_string())
        .add_control()
        .emphasize(|c| {
            if c.is_depleted() {
                RowEmphasis::Danger
            } else {
                RowEmphasis::Normal
            }
        })
}

pub struct StagedSearch<G: GridTarget> {
    results: LineItemStore<StockCandidate>,
    grid: GridBinding<StockCandidate, G>,
}

impl<G: GridTarget> StagedSearch<G> {
    pub fn new(target: G) -> Self {
        Self {
            results: LineItemStore::new(),
            grid: GridBinding::new(staged_schema(), target),
        }
    }

    /// Show a fresh result set, replacing the previous one.
    pub fn load(&mut self, candidates: Vec<StockCandidate>) {
        self.results = LineItemStore::with_items(candidates);
        self.grid.render(&self.results);
        debug!(staged = self.results.len(), "staged results loaded");
    }

    pub fn candidates(&self) -> &[StockCandidate] {
        self.results.snapshot()
    }

    /// Ids still on offer.
    pub fn staged_ids(&self) -> Vec<InventoryId> {
        self.results.list_ids()
    }

    pub fn grid(&self) -> &GridBinding<StockCandidate, G> {
        &self.grid
    }

    /// The candidate an add click on `event`'s row would take; `None` for
    /// any other interaction.
    pub fn add_target(&self, event: &GridEvent) -> EditorResult<Option<&StockCandidate>> {
        if event.kind != GridEventKind::AddClicked {
            return Ok(None);
        }
        let position = self.grid.resolve_row_position(event.row)?;
        Ok(self.results.get(position))
    }

    /// Drop the row offering `id`, if any; returns whether one was shown.
    pub fn discard(&mut self, id: &InventoryId) -> bool {
        let Some(position) = self.candidates().iter().position(|c| &c.id == id) else {
            return false;
        };
        if self.results.remove_at(position).is_err() {
            return false;
        }
        self.grid.render(&self.results);
        debug!(%id, "staged row discarded");
        true
    }

    /// Remove the row at `position` from the results and hand back its line.
    pub fn take(&mut self, position: usize) -> EditorResult<StockAdjustmentLine> {
        let candidate = self.results.remove_at(position)?;
        self.grid.render(&self.results);
        Ok(lookup::select(candidate))
    }

    /// Route one row interaction; an add click yields the line to append.
    pub fn handle(&mut self, event: GridEvent) -> EditorResult<Option<StockAdjustmentLine>> {
        match self.grid.handle(&mut self.results, event)? {
            GridOutcome::AddRequested { position } => self.take(position).map(Some),
            GridOutcome::Updated { .. } | GridOutcome::Removed { .. } => Ok(None),
        }
    }
}
