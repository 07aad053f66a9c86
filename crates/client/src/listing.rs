//! Product listing: one component, three column layouts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use posboard_core::ProductId;
use posboard_inventory::{InventoryBatch, sort_for_drilldown};
use posboard_products::{ProductSummary, StockBadge};

use crate::staging::{format_date, format_optional_date};
use crate::types::{Page, Pagination};

/// Which layout a listing uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Basic,
    /// Adds whether the product tracks expiration dates.
    WithExpiry,
    /// Adds a button that loads the product's inventory batches.
    WithInventoryDrilldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingColumn {
    Id,
    Name,
    Code,
    Category,
    Inventoried,
    Image,
    Barcode,
    Price,
    PriceList,
    Promotion,
    Expiry,
    Stock,
    Inventory,
    Actions,
}

use ListingColumn as C;

const BASIC: &[ListingColumn] = &[
    C::Id, C::Name, C::Code, C::Category, C::Inventoried, C::Image, C::Barcode, C::Price,
    C::PriceList, C::Promotion, C::Stock, C::Actions,
];
const WITH_EXPIRY: &[ListingColumn] = &[
    C::Id, C::Name, C::Code, C::Category, C::Inventoried, C::Expiry, C::Image, C::Barcode,
    C::Price, C::PriceList, C::Promotion, C::Stock, C::Actions,
];
const WITH_DRILLDOWN: &[ListingColumn] = &[
    C::Id, C::Name, C::Code, C::Category, C::Inventoried, C::Image, C::Barcode, C::Price,
    C::PriceList, C::Promotion, C::Stock, C::Inventory, C::Actions,
];

impl ListingColumn {
    pub fn header(&self) -> &'static str {
        match self {
            C::Id => "Nro",
            C::Name => "Nombre",
            C::Code => "Código",
            C::Category => "Categoría",
            C::Inventoried => "¿Es inventariado?",
            C::Image => "Imagen",
            C::Barcode => "Código de barra",
            C::Price => "Precio de Compra",
            C::PriceList => "Precios de Venta",
            C::Promotion => "Precio Promocional",
            C::Expiry => "¿Tiene caducidad?",
            C::Stock => "Stock",
            C::Inventory => "Inventario",
            C::Actions => "Opciones",
        }
    }
}

impl ListingKind {
    pub fn columns(&self) -> &'static [ListingColumn] {
        match self {
            ListingKind::Basic => BASIC,
            ListingKind::WithExpiry => WITH_EXPIRY,
            ListingKind::WithInventoryDrilldown => WITH_DRILLDOWN,
        }
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns().iter().map(ListingColumn::header).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Danger,
    Secondary,
}

/// Buttons a listing row offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    PreviewImage,
    PreviewBarcode,
    InventoryDrilldown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingCell {
    Text(String),
    Badge { tone: BadgeTone, text: String },
    Lines(Vec<String>),
    Button(RowAction),
    Links { edit: String, delete: String },
}

/// One listing row.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingRow {
    Basic(ProductSummary),
    WithExpiry {
        product: ProductSummary,
        tracks_expiry: bool,
    },
    WithInventoryDrilldown {
        product: ProductSummary,
        /// `None` until the drill-down was opened once.
        batches: Option<Vec<InventoryBatch>>,
    },
}

/// Money the way every listing prints it.
pub fn format_money(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

fn yes_no(flag: bool) -> String {
    if flag { "Si" } else { "No" }.to_string()
}

fn stock_cell(product: &ProductSummary) -> ListingCell {
    match product.stock_badge() {
        StockBadge::InStock(n) => ListingCell::Badge { tone: BadgeTone::Success, text: n.to_string() },
        StockBadge::Depleted(n) => ListingCell::Badge { tone: BadgeTone::Danger, text: n.to_string() },
        StockBadge::NotTracked => ListingCell::Badge {
            tone: BadgeTone::Secondary,
            text: "Sin stock".to_string(),
        },
    }
}

impl ListingRow {
    pub fn new(kind: ListingKind, product: ProductSummary) -> Self {
        match kind {
            ListingKind::Basic => ListingRow::Basic(product),
            ListingKind::WithExpiry => ListingRow::WithExpiry {
                tracks_expiry: product.has_expiration_date,
                product,
            },
            ListingKind::WithInventoryDrilldown => ListingRow::WithInventoryDrilldown {
                product,
                batches: None,
            },
        }
    }

    pub fn kind(&self) -> ListingKind {
        match self {
            ListingRow::Basic(_) => ListingKind::Basic,
            ListingRow::WithExpiry { .. } => ListingKind::WithExpiry,
            ListingRow::WithInventoryDrilldown { .. } => ListingKind::WithInventoryDrilldown,
        }
    }

    pub fn product(&self) -> &ProductSummary {
        match self {
            ListingRow::Basic(product)
            | ListingRow::WithExpiry { product, .. }
            | ListingRow::WithInventoryDrilldown { product, .. } => product,
        }
    }

    /// Loaded drill-down batches, if any.
    pub fn batches(&self) -> Option<&[InventoryBatch]> {
        match self {
            ListingRow::WithInventoryDrilldown { batches: Some(b), .. } => Some(b),
            _ => None,
        }
    }

    /// Cells in column order; `base_url` prefixes the edit/delete links.
    pub fn cells(&self, base_url: &str) -> Vec<ListingCell> {
        let p = self.product();
        self.kind()
            .columns()
            .iter()
            .map(|column| match column {
                C::Id => ListingCell::Text(p.id.to_string()),
                C::Name => ListingCell::Text(p.name.clone()),
                C::Code => ListingCell::Text(p.code.clone()),
                C::Category => ListingCell::Text(p.category.name.clone()),
                C::Inventoried => ListingCell::Text(yes_no(p.inventoried)),
                C::Image => ListingCell::Button(RowAction::PreviewImage),
                C::Barcode => ListingCell::Button(RowAction::PreviewBarcode),
                C::Price => ListingCell::Text(format_money(p.price)),
                // Tiers keep the order the server sent them in.
                C::PriceList => ListingCell::Lines(
                    p.price_list
                        .iter()
                        .map(|t| format!("Cantidad: {} = Precio: {:.2}", t.quantity, t.net_price.round_dp(2)))
                        .collect(),
                ),
                C::Promotion => ListingCell::Text(format_money(p.price_promotion)),
                C::Expiry => ListingCell::Text(match self {
                    ListingRow::WithExpiry { tracks_expiry, .. } => yes_no(*tracks_expiry),
                    _ => yes_no(p.has_expiration_date),
                }),
                C::Stock => stock_cell(p),
                C::Inventory => ListingCell::Button(RowAction::InventoryDrilldown),
                C::Actions => ListingCell::Links {
                    edit: format!("{base_url}update/{}/", p.id),
                    delete: format!("{base_url}delete/{}/", p.id),
                },
            })
            .collect()
    }
}

/// Cells of one drill-down batch row.
pub fn batch_cells(batch: &InventoryBatch, today: NaiveDate) -> Vec<String> {
    let days = if batch.expiration_date.is_some() {
        batch.days_to_expire(today).to_string()
    } else {
        String::new()
    };
    vec![
        format_date(&batch.date_joined),
        format_optional_date(&batch.expiration_date),
        days,
        batch.quantity.to_string(),
        batch.saldo.to_string(),
    ]
}

pub const BATCH_HEADERS: &[&str] = &[
    "Fecha de registro",
    "Fecha de caducidad",
    "Días para caducar",
    "Cantidad",
    "Saldo",
];

/// What a row button asks the page to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    /// Show the image at this URL (none when the product has no image).
    ShowImage(Option<String>),
    ShowBarcode(Option<String>),
    LoadInventory(ProductId),
}

/// A listing of products in one layout.
#[derive(Debug, Clone)]
pub struct ProductListing {
    kind: ListingKind,
    base_url: String,
    rows: Vec<ListingRow>,
}

impl ProductListing {
    pub fn new(kind: ListingKind, base_url: impl Into<String>) -> Self {
        Self {
            kind,
            base_url: base_url.into(),
            rows: Vec::new(),
        }
    }

    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn load(&mut self, products: Vec<ProductSummary>) {
        self.rows = products.into_iter().map(|p| ListingRow::new(self.kind, p)).collect();
        debug!(kind = ?self.kind, rows = self.rows.len(), "listing loaded");
    }

    pub fn rows(&self) -> &[ListingRow] {
        &self.rows
    }

    pub fn page(&self, pagination: Pagination) -> Page<ListingRow> {
        pagination.apply(&self.rows)
    }

    pub fn row(&self, id: ProductId) -> Option<&ListingRow> {
        self.rows.iter().find(|r| r.product().id == id)
    }

    /// Resolve a row button. `None` when the row is gone or the layout has no
    /// such button.
    pub fn action(&self, id: ProductId, action: RowAction) -> Option<ActionRequest> {
        let row = self.row(id)?;
        let product = row.product();
        match action {
            RowAction::PreviewImage => Some(ActionRequest::ShowImage(product.image.clone())),
            RowAction::PreviewBarcode => Some(ActionRequest::ShowBarcode(product.barcode.clone())),
            RowAction::InventoryDrilldown if row.kind() == ListingKind::WithInventoryDrilldown => {
                Some(ActionRequest::LoadInventory(id))
            }
            RowAction::InventoryDrilldown => None,
        }
    }

    /// Store the batches fetched for a drill-down; returns whether the row
    /// still exists.
    pub fn attach_batches(&mut self, id: ProductId, mut loaded: Vec<InventoryBatch>) -> bool {
        sort_for_drilldown(&mut loaded);
        for row in &mut self.rows {
            if let ListingRow::WithInventoryDrilldown { product, batches } = row {
                if product.id == id {
                    *batches = Some(loaded);
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use posboard_core::InventoryId;
    use serde_json::json;

    pub(crate) fn product(id: i64, inventoried: bool, stock: i64) -> ProductSummary {
        serde_json::from_value(json!({
            "id": id,
            "name": format!("Producto {id}"),
            "code": format!("P{id}"),
            "category": {"id": 1, "name": "Bebidas"},
            "inventoried": inventoried,
            "image": "/media/p.png",
            "barcode": null,
            "price": 1.5,
            "pvp": 2.25,
            "price_promotion": 0,
            "price_list": [
                {"quantity": 12, "net_price": 1.8, "gross_price": 2.016},
                {"quantity": 6, "net_price": 2, "gross_price": 2.24}
            ],
            "stock": stock
        }))
        .unwrap()
    }

    #[test]
    fn basic_row_rendering() {
        let row = ListingRow::new(ListingKind::Basic, product(7, true, 3));
        let cells = row.cells("/pos/inventory/product/");
        assert_eq!(cells.len(), ListingKind::Basic.headers().len());
        assert_eq!(cells[4], ListingCell::Text("Si".into()));
        assert_eq!(cells[7], ListingCell::Text("$1.50".into()));
        assert_eq!(
            cells[8],
            ListingCell::Lines(vec![
                "Cantidad: 12 = Precio: 1.80".into(),
                "Cantidad: 6 = Precio: 2.00".into(),
            ])
        );
        assert_eq!(cells[9], ListingCell::Text("$0.00".into()));
        assert_eq!(cells[10], ListingCell::Badge { tone: BadgeTone::Success, text: "3".into() });
        assert_eq!(
            cells[11],
            ListingCell::Links {
                edit: "/pos/inventory/product/update/7/".into(),
                delete: "/pos/inventory/product/delete/7/".into(),
            }
        );
    }

    #[test]
    fn stock_badges() {
        let depleted = ListingRow::new(ListingKind::Basic, product(1, true, 0)).cells("/");
        assert_eq!(depleted[10], ListingCell::Badge { tone: BadgeTone::Danger, text: "0".into() });
        let untracked = ListingRow::new(ListingKind::Basic, product(1, false, 9)).cells("/");
        assert_eq!(untracked[4], ListingCell::Text("No".into()));
        assert_eq!(
            untracked[10],
            ListingCell::Badge { tone: BadgeTone::Secondary, text: "Sin stock".into() }
        );
    }

    #[test]
    fn layouts_differ_only_in_their_extra_column() {
        assert!(ListingKind::WithExpiry.columns().contains(&C::Expiry));
        assert!(!ListingKind::Basic.columns().contains(&C::Expiry));
        assert!(ListingKind::WithInventoryDrilldown.columns().contains(&C::Inventory));
        let row = ListingRow::new(ListingKind::WithExpiry, product(2, true, 1));
        assert_eq!(row.cells("/")[5], ListingCell::Text("No".into()));
    }

    #[test]
    fn drilldown_only_where_offered() {
        let mut basic = ProductListing::new(ListingKind::Basic, "/");
        basic.load(vec![product(1, true, 1)]);
        assert_eq!(basic.action(ProductId::new(1), RowAction::InventoryDrilldown), None);
        assert_eq!(
            basic.action(ProductId::new(1), RowAction::PreviewImage),
            Some(ActionRequest::ShowImage(Some("/media/p.png".into())))
        );
        assert_eq!(
            basic.action(ProductId::new(1), RowAction::PreviewBarcode),
            Some(ActionRequest::ShowBarcode(None))
        );

        let mut drill = ProductListing::new(ListingKind::WithInventoryDrilldown, "/");
        drill.load(vec![product(1, true, 1)]);
        assert_eq!(
            drill.action(ProductId::new(1), RowAction::InventoryDrilldown),
            Some(ActionRequest::LoadInventory(ProductId::new(1)))
        );
    }

    #[test]
    fn attached_batches_are_sorted() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
        let batch = |id: i64, joined: u32, expires: Option<u32>| InventoryBatch {
            id: InventoryId::new(id),
            date_joined: day(joined),
            expiration_date: expires.map(day),
            quantity: 10,
            saldo: 4,
            active: true,
        };
        let mut listing = ProductListing::new(ListingKind::WithInventoryDrilldown, "/");
        listing.load(vec![product(5, true, 8)]);
        assert!(listing.attach_batches(
            ProductId::new(5),
            vec![batch(1, 1, None), batch(2, 2, Some(20)), batch(3, 3, Some(10))]
        ));
        let ids: Vec<i64> = listing.row(ProductId::new(5)).unwrap().batches().unwrap().iter().map(|b| b.id.get()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(!listing.attach_batches(ProductId::new(99), vec![]));

        let cells = batch_cells(&batch(3, 3, Some(10)), day(4));
        assert_eq!(cells, vec!["2024-06-03", "2024-06-10", "6", "10", "4"]);
    }

    #[test]
    fn pages_of_rows() {
        let mut listing = ProductListing::new(ListingKind::Basic, "/");
        listing.load((1..=15).map(|i| product(i, true, i)).collect());
        let page = listing.page(Pagination::new(Some(2), Some(10)));
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].product().id, ProductId::new(11));
    }
}
