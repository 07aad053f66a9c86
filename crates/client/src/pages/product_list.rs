//! Product listing page.

use tracing::{info, warn};

use posboard_core::ProductId;
use posboard_inventory::InventoryBatch;
use posboard_products::ProductSummary;

use crate::listing::{ActionRequest, ListingKind, ListingRow, ProductListing, RowAction};
use crate::transport::{CatalogTransport, TransportResult};
use crate::types::{Page, Pagination};

pub struct ProductListPage<C> {
    catalog: C,
    listing: ProductListing,
    pagination: Pagination,
}

impl<C: CatalogTransport> ProductListPage<C> {
    pub fn new(catalog: C, kind: ListingKind, base_url: impl Into<String>) -> Self {
        Self {
            catalog,
            listing: ProductListing::new(kind, base_url),
            pagination: Pagination::default(),
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn listing(&self) -> &ProductListing {
        &self.listing
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Fetch every product and go back to the first page.
    pub async fn load(&mut self) -> TransportResult<usize> {
        let products = self.catalog.list_products().await?;
        Ok(self.show(products))
    }

    /// Replace the listed products with an already fetched set.
    pub fn show(&mut self, products: Vec<ProductSummary>) -> usize {
        let count = products.len();
        self.listing.load(products);
        self.pagination.page = 1;
        info!(products = count, "product listing loaded");
        count
    }

    pub fn attach_batches(&mut self, id: ProductId, batches: Vec<InventoryBatch>) -> bool {
        self.listing.attach_batches(id, batches)
    }

    pub fn current(&self) -> Page<ListingRow> {
        self.listing.page(self.pagination)
    }

    /// Jump to `page`; out-of-range pages clamp to the last one.
    pub fn go_to(&mut self, page: u32) -> Page<ListingRow> {
        self.pagination.page = page.max(1);
        let current = self.current();
        self.pagination.page = current.meta.page;
        current
    }

    /// Resolve a row button; drill-downs fetch and attach the batches first.
    pub async fn row_action(
        &mut self,
        id: ProductId,
        action: RowAction,
    ) -> TransportResult<Option<ActionRequest>> {
        let Some(request) = self.listing.action(id, action) else {
            warn!(%id, ?action, "row action ignored");
            return Ok(None);
        };
        if let ActionRequest::LoadInventory(product) = &request {
            let batches = self.catalog.search_inventory(*product).await?;
            self.attach_batches(*product, batches);
        }
        Ok(Some(request))
    }
}
