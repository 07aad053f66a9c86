//! Product create/edit page: the form plus its tiered price table.

use serde_json::Value;
use tracing::info;

use posboard_core::EditorResult;
use posboard_products::{FormAction, PriceTier, PriceTierField, ProductForm, SavedPriceTier, UniquenessCheck};

use crate::grid::{GridBinding, GridEvent, GridOutcome, GridSchema, GridTarget};
use crate::pages::SubmitError;
use crate::store::{EditorPhase, LineItemStore};
use crate::submission::{Payload, SubmissionSpec, build_payload};
use crate::transport::{CatalogTransport, SubmissionTransport, TransportResult};

pub fn price_list_schema() -> GridSchema<PriceTier> {
    GridSchema::<PriceTier>::new("price-list")
        .remove_control()
        .editable("Cantidad", PriceTierField::Quantity)
        .editable("Precio", PriceTierField::NetPrice)
}

pub struct PriceListEditor<G: GridTarget, S> {
    action: FormAction,
    endpoint: String,
    store: LineItemStore<PriceTier>,
    grid: GridBinding<PriceTier, G>,
    transport: S,
}

impl<G: GridTarget, S: SubmissionTransport> PriceListEditor<G, S> {
    /// Blank editor for a new product.
    pub fn create(target: G, transport: S, endpoint: impl Into<String>) -> Self {
        Self::build(FormAction::Add, Vec::new(), target, transport, endpoint.into())
    }

    /// Editor preloaded with the product's saved tiers.
    pub fn edit(
        saved: Vec<SavedPriceTier>,
        target: G,
        transport: S,
        endpoint: impl Into<String>,
    ) -> Self {
        let tiers = saved.into_iter().map(PriceTier::from).collect();
        Self::build(FormAction::Edit, tiers, target, transport, endpoint.into())
    }

    fn build(
        action: FormAction,
        tiers: Vec<PriceTier>,
        target: G,
        transport: S,
        endpoint: String,
    ) -> Self {
        let store = LineItemStore::with_items(tiers);
        let mut grid = GridBinding::new(price_list_schema(), target);
        grid.render(&store);
        Self {
            action,
            endpoint,
            store,
            grid,
            transport,
        }
    }

    pub fn action(&self) -> FormAction {
        self.action
    }

    pub fn tiers(&self) -> &[PriceTier] {
        self.store.snapshot()
    }

    pub fn phase(&self) -> EditorPhase {
        self.store.phase()
    }

    pub fn grid(&self) -> &GridBinding<PriceTier, G> {
        &self.grid
    }

    pub fn transport(&self) -> &S {
        &self.transport
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Re-render the table (e.g. to restore an input after a rejected edit).
    pub fn refresh(&mut self) {
        self.grid.render(&self.store);
    }

    /// Append a blank tier (1 unit at 0.00).
    pub fn add_tier(&mut self) -> EditorResult<usize> {
        let position = self.store.add(PriceTier::default())?;
        self.grid.render(&self.store);
        Ok(position)
    }

    pub fn handle(&mut self, event: GridEvent) -> EditorResult<GridOutcome<PriceTier>> {
        self.grid.handle(&mut self.store, event)
    }

    /// Drop every tier (after the operator confirmed).
    pub fn remove_all(&mut self) -> EditorResult<usize> {
        let removed = self.store.clear()?;
        self.grid.render(&self.store);
        Ok(removed)
    }

    /// Ask the server whether a name or code is still free.
    pub async fn check_unique<C: CatalogTransport>(
        &self,
        catalog: &C,
        check: &UniquenessCheck,
    ) -> TransportResult<bool> {
        catalog.validate_data(&self.endpoint, check).await
    }

    /// Validate the form and post it with the current tiers.
    pub async fn submit(&mut self, form: &ProductForm) -> Result<Value, SubmitError> {
        let payload = self.payload(form)?;
        let reply = self.transport.submit(&self.endpoint, &payload).await?;
        self.mark_submitted(&payload);
        Ok(reply)
    }

    /// Validate the form and assemble the request without sending it.
    pub fn payload(&self, form: &ProductForm) -> Result<Payload, SubmitError> {
        if self.store.phase() == EditorPhase::Submitted {
            return Err(posboard_core::EditorError::Submitted.into());
        }
        let valid = form.validate().map_err(SubmitError::InvalidForm)?;
        let spec = SubmissionSpec::price_list(self.action);
        Ok(build_payload(&spec, valid.into_fields(), &self.store)?)
    }

    /// Freeze the tiers once the server accepted `payload`.
    pub fn mark_submitted(&mut self, payload: &Payload) {
        self.store.mark_submitted();
        info!(action = self.action.as_str(), tiers = payload.item_count(), "product saved");
    }
}
