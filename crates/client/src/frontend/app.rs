//! Leptos application with routing.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::*;
use leptos_router::*;

use posboard_core::{CategoryId, ProductId};
use posboard_inventory::StockCandidate;
use posboard_products::{ProductForm, ProductSummary, UniquenessCheck};

use crate::frontend::api::{FetchTransport, TimeoutDelay, page_config};
use crate::frontend::grid::{GridTable, SignalGrid};
use crate::grid::{GridEvent, GridOutcome};
use crate::listing::{ActionRequest, BATCH_HEADERS, ListingCell, ListingKind, RowAction, batch_cells};
use crate::lookup::LookupOutcome;
use crate::pages::{
    PriceListEditor, ProductListPage, StockAdjustmentWorkbench, SubmitError, adjustment_schema,
    price_list_schema,
};
use crate::staging::staged_schema;
use crate::transport::{CatalogTransport, SubmissionTransport};
use crate::types::Page;

type Workbench = StockAdjustmentWorkbench<Rc<FetchTransport>, TimeoutDelay, SignalGrid, SignalGrid>;
type Editor = PriceListEditor<SignalGrid, Rc<FetchTransport>>;

fn alert(message: &str) {
    if let Some(w) = web_sys::window() {
        let _ = w.alert_with_message(message);
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn show_submit_error(error: SubmitError) {
    match error.user_message() {
        Some(message) => alert(&message),
        None => tracing::error!(%error, "submission failed"),
    }
}

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <Routes>
                <Route path="/" view=ProductListView/>
                <Route path="/adjust" view=StockAdjustmentView/>
                <Route path="/product/new" view=NewProductView/>
                <Route path="/product/:id" view=EditProductView/>
            </Routes>
        </Router>
    }
}

#[component]
fn ProductListView() -> impl IntoView {
    let config = page_config();
    let base_url = config.endpoints.product_list.clone();
    let transport = Rc::new(FetchTransport::new(config));
    let page = Rc::new(RefCell::new(ProductListPage::new(
        transport,
        ListingKind::WithInventoryDrilldown,
        base_url,
    )));
    let current = create_rw_signal(page.borrow().current());

    {
        let page = page.clone();
        spawn_local(async move {
            let catalog = page.borrow().catalog().clone();
            match catalog.list_products().await {
                Ok(products) => {
                    let mut page = page.borrow_mut();
                    page.show(products);
                    current.set(page.current());
                }
                Err(e) => alert(&e.to_string()),
            }
        });
    }

    let go_to = {
        let page = page.clone();
        move |n: u32| current.set(page.borrow_mut().go_to(n))
    };
    let on_action = {
        let page = page.clone();
        Callback::new(move |(id, action): (ProductId, RowAction)| {
            let Some(request) = page.borrow().listing().action(id, action) else {
                return;
            };
            match request {
                ActionRequest::ShowImage(url) | ActionRequest::ShowBarcode(url) => {
                    if let (Some(url), Some(w)) = (url, web_sys::window()) {
                        let _ = w.open_with_url_and_target(&url, "_blank");
                    }
                }
                ActionRequest::LoadInventory(product) => {
                    let page = page.clone();
                    spawn_local(async move {
                        let catalog = page.borrow().catalog().clone();
                        match catalog.search_inventory(product).await {
                            Ok(batches) => {
                                let mut page = page.borrow_mut();
                                page.attach_batches(product, batches);
                                current.set(page.current());
                            }
                            Err(e) => alert(&e.to_string()),
                        }
                    });
                }
            }
        })
    };
    let headers = ListingKind::WithInventoryDrilldown.headers();
    let base = page.borrow().listing().base_url().to_string();

    view! {
        <div class="app">
            <header>
                <h1>"Productos"</h1>
                <A href="/product/new">"Nuevo registro"</A>
                " "
                <A href="/adjust">"Ajuste de stock"</A>
            </header>
            <main>
                <table class="table table-bordered">
                    <thead>
                        <tr>{headers.into_iter().map(|h| view! { <th>{h}</th> }).collect_view()}</tr>
                    </thead>
                    <tbody>
                        {move || {
                            let base = base.clone();
                            current
                                .get()
                                .items
                                .into_iter()
                                .map(|row| {
                                    let id = row.product().id;
                                    let batches = row.batches().map(<[_]>::to_vec);
                                    view! {
                                        <tr>
                                            {row
                                                .cells(&base)
                                                .into_iter()
                                                .map(|cell| listing_cell(id, cell, on_action))
                                                .collect_view()}
                                        </tr>
                                        {batches.map(|batches| batch_table(&batches))}
                                    }
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>
                <Pager current=current go_to=go_to/>
            </main>
        </div>
    }
}

fn listing_cell(id: ProductId, cell: ListingCell, on_action: Callback<(ProductId, RowAction)>) -> View {
    match cell {
        ListingCell::Text(text) => view! { <td>{text}</td> }.into_view(),
        ListingCell::Badge { tone, text } => {
            let class = match tone {
                crate::listing::BadgeTone::Success => "badge bg-success",
                crate::listing::BadgeTone::Danger => "badge bg-danger",
                crate::listing::BadgeTone::Secondary => "badge bg-secondary",
            };
            view! { <td><span class=class>{text}</span></td> }.into_view()
        }
        ListingCell::Lines(lines) => view! {
            <td>{lines.into_iter().map(|l| view! { <div>{l}</div> }).collect_view()}</td>
        }
        .into_view(),
        ListingCell::Button(action) => {
            let label = match action {
                RowAction::PreviewImage => "Imagen",
                RowAction::PreviewBarcode => "Código",
                RowAction::InventoryDrilldown => "Inventario",
            };
            view! {
                <td>
                    <button class="btn btn-secondary btn-sm" type="button"
                        on:click=move |_| on_action.call((id, action))>{label}</button>
                </td>
            }
            .into_view()
        }
        ListingCell::Links { delete, .. } => view! {
            <td>
                <A href=format!("/product/{id}")>"Editar"</A>
                " "
                <a href=delete>"Eliminar"</a>
            </td>
        }
        .into_view(),
    }
}

fn batch_table(batches: &[posboard_inventory::InventoryBatch]) -> impl IntoView {
    let today = chrono::Local::now().date_naive();
    let rows = batches
        .iter()
        .map(|b| {
            let cells = batch_cells(b, today);
            view! { <tr>{cells.into_iter().map(|c| view! { <td>{c}</td> }).collect_view()}</tr> }
        })
        .collect_view();
    view! {
        <tr>
            <td colspan="9">
                <table class="table table-sm">
                    <thead>
                        <tr>{BATCH_HEADERS.iter().map(|h| view! { <th>{*h}</th> }).collect_view()}</tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </td>
        </tr>
    }
}

#[component]
fn Pager<F>(current: RwSignal<Page<crate::listing::ListingRow>>, go_to: F) -> impl IntoView
where
    F: Fn(u32) + Clone + 'static,
{
    let prev = go_to.clone();
    view! {
        <nav class="pager">
            <button type="button" on:click=move |_| prev(current.get_untracked().meta.page.saturating_sub(1))>
                "Anterior"
            </button>
            <span>
                {move || {
                    let meta = current.get().meta;
                    let (from, to) = meta.range();
                    format!("{from}-{to} de {} (página {}/{})", meta.total, meta.page, meta.total_pages)
                }}
            </span>
            <button type="button" on:click=move |_| go_to(current.get_untracked().meta.page + 1)>
                "Siguiente"
            </button>
        </nav>
    }
}

#[component]
fn StockAdjustmentView() -> impl IntoView {
    let config = page_config();
    let settings = config.lookup_settings();
    let endpoint = config.endpoints.stock_adjustment.clone();
    let detail = SignalGrid::new();
    let staged = SignalGrid::new();
    let bench: Rc<RefCell<Workbench>> = Rc::new(RefCell::new(StockAdjustmentWorkbench::new(
        Rc::new(FetchTransport::new(config)),
        TimeoutDelay,
        settings,
        detail,
        staged,
        endpoint,
    )));

    let term = create_rw_signal(String::new());
    let suggestions = create_rw_signal(Vec::<StockCandidate>::new());
    let staged_open = create_rw_signal(false);
    let submitting = create_rw_signal(false);
    let navigate = use_navigate();

    let on_input = {
        let bench = bench.clone();
        move |ev: leptos::ev::Event| {
            let value = event_target_value(&ev);
            term.set(value.clone());
            let (lookup, exclude) = {
                let b = bench.borrow();
                (b.lookup_handle(), b.detail_ids())
            };
            let bench = bench.clone();
            spawn_local(async move {
                let outcome = lookup.search(&value, &exclude).await;
                match bench.borrow().offerable(outcome) {
                    LookupOutcome::Results(found) => suggestions.set(found),
                    LookupOutcome::TooShort => suggestions.set(Vec::new()),
                    LookupOutcome::Superseded => {}
                }
            });
        }
    };

    let choose = {
        let bench = bench.clone();
        move |candidate: StockCandidate| {
            if let Err(e) = bench.borrow_mut().select(candidate) {
                if e.is_user_visible() {
                    alert(&e.to_string());
                } else {
                    tracing::debug!(error = %e, "autocomplete selection refused");
                }
            }
            suggestions.set(Vec::new());
            term.set(String::new());
        }
    };

    let open_staged = {
        let bench = bench.clone();
        move |_| {
            let (lookup, exclude) = {
                let b = bench.borrow();
                (b.lookup_handle(), b.detail_ids())
            };
            let bench = bench.clone();
            let value = term.get_untracked();
            spawn_local(async move {
                let outcome = lookup.fetch(&value, &exclude).await;
                bench.borrow_mut().load_staged(outcome);
                staged_open.set(true);
            });
        }
    };

    let on_detail = {
        let bench = bench.clone();
        Callback::new(move |event: GridEvent| {
            let mut b = bench.borrow_mut();
            match b.handle(event) {
                Ok(GridOutcome::Updated { .. }) => b.refresh(),
                Ok(_) => {}
                Err(e) => {
                    b.refresh();
                    if e.is_user_visible() {
                        alert(&e.to_string());
                    }
                }
            }
        })
    };

    let on_staged = {
        let bench = bench.clone();
        Callback::new(move |event: GridEvent| {
            if let Err(e) = bench.borrow_mut().staged_event(event) {
                if e.is_user_visible() {
                    alert(&e.to_string());
                } else {
                    tracing::debug!(error = %e, "staged add refused");
                }
            }
        })
    };

    let remove_all = {
        let bench = bench.clone();
        move |_| {
            if bench.borrow().lines().is_empty() {
                return;
            }
            if confirm("¿Estas seguro de eliminar todos los items de tu detalle?") {
                if let Err(e) = bench.borrow_mut().remove_all() {
                    alert(&e.to_string());
                }
            }
        }
    };

    let submit = {
        let bench = bench.clone();
        move |_| {
            if submitting.get_untracked() {
                return;
            }
            let payload = match bench.borrow().payload() {
                Ok(payload) => payload,
                Err(e) => return show_submit_error(e.into()),
            };
            if !confirm("¿Estas seguro de realizar la siguiente acción?") {
                return;
            }
            submitting.set(true);
            let (transport, endpoint) = {
                let b = bench.borrow();
                (b.transport().clone(), b.endpoint().to_string())
            };
            let bench = bench.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                match transport.submit(&endpoint, &payload).await {
                    Ok(_) => {
                        bench.borrow_mut().mark_submitted(&payload);
                        navigate("/", Default::default());
                    }
                    Err(e) => show_submit_error(e.into()),
                }
                submitting.set(false);
            });
        }
    };

    view! {
        <div class="app">
            <header>
                <h1>"Ajuste de stock"</h1>
                <A href="/">"Productos"</A>
            </header>
            <main>
                <div class="input-group">
                    <input
                        type="text"
                        class="form-control"
                        autocomplete="off"
                        placeholder="Ingrese una descripción"
                        prop:value=move || term.get()
                        on:input=on_input
                    />
                    <button class="btn btn-info" type="button" on:click=open_staged>"Buscar"</button>
                    <button class="btn btn-danger" type="button" on:click=remove_all>"Eliminar todos"</button>
                </div>
                <ul class="autocomplete">
                    <For
                        each=move || suggestions.get()
                        key=|c: &StockCandidate| c.id
                        children=move |c: StockCandidate| {
                            let choose = choose.clone();
                            let label = c.label();
                            view! { <li on:click=move |_| choose(c.clone())>{label}</li> }
                        }
                    />
                </ul>
                <Show when=move || staged_open.get()>
                    <div class="staged">
                        <GridTable headers=staged_schema().headers() grid=staged on_event=on_staged/>
                        <button type="button" on:click=move |_| staged_open.set(false)>"Cerrar"</button>
                    </div>
                </Show>
                <GridTable headers=adjustment_schema().headers() grid=detail on_event=on_detail/>
                <button class="btn btn-primary" type="button" disabled=move || submitting.get() on:click=submit>
                    "Guardar"
                </button>
            </main>
        </div>
    }
}

#[component]
fn NewProductView() -> impl IntoView {
    view! { <ProductFormView product=None/> }
}

#[component]
fn EditProductView() -> impl IntoView {
    let params = use_params_map();
    let product_id = move || {
        params
            .with(|p| p.get("id").and_then(|raw| raw.parse::<ProductId>().ok()))
    };
    let product = create_local_resource(product_id, |id| async move {
        let id = id?;
        let transport = FetchTransport::new(page_config());
        match transport.list_products().await {
            Ok(products) => products.into_iter().find(|p| p.id == id),
            Err(e) => {
                alert(&e.to_string());
                None
            }
        }
    });
    view! {
        {move || match product.get() {
            None => view! { <p>"Cargando..."</p> }.into_view(),
            Some(None) => view! { <p>"Producto no encontrado"</p> }.into_view(),
            Some(Some(p)) => view! { <ProductFormView product=Some(p)/> }.into_view(),
        }}
    }
}

fn form_from(product: &ProductSummary) -> ProductForm {
    ProductForm {
        name: product.name.clone(),
        code: product.code.clone(),
        category: Some(product.category.id),
        inventoried: product.inventoried,
        image: None,
        price: product.price.to_string(),
        pvp: product.pvp.to_string(),
        ..ProductForm::default()
    }
}

#[component]
fn ProductFormView(product: Option<ProductSummary>) -> impl IntoView {
    let config = page_config();
    let transport = Rc::new(FetchTransport::new(config.clone()));
    let grid = SignalGrid::new();
    let (editor, initial) = match product {
        Some(p) => {
            let endpoint = config.endpoints.product_update(p.id);
            let form = form_from(&p);
            (Editor::edit(p.price_list, grid, transport, endpoint), form)
        }
        None => (
            Editor::create(grid, transport, config.endpoints.product_create.clone()),
            ProductForm::default(),
        ),
    };
    let editor = Rc::new(RefCell::new(editor));
    let form = create_rw_signal(initial);
    let submitting = create_rw_signal(false);
    let navigate = use_navigate();

    let check = {
        let editor = editor.clone();
        move |probe: Option<UniquenessCheck>| {
            let Some(probe) = probe else { return };
            let (catalog, endpoint) = {
                let e = editor.borrow();
                (e.transport().clone(), e.endpoint().to_string())
            };
            spawn_local(async move {
                match catalog.validate_data(&endpoint, &probe).await {
                    Ok(true) => {}
                    Ok(false) => alert("El registro ya existe"),
                    Err(e) => tracing::warn!(%e, "uniqueness check failed"),
                }
            });
        }
    };
    let check_name = check.clone();

    let on_tiers = {
        let editor = editor.clone();
        Callback::new(move |event: GridEvent| {
            let mut e = editor.borrow_mut();
            match e.handle(event) {
                Ok(GridOutcome::Updated { .. }) => e.refresh(),
                Ok(_) => {}
                Err(err) => {
                    e.refresh();
                    if err.is_user_visible() {
                        alert(&err.to_string());
                    }
                }
            }
        })
    };

    let add_tier = {
        let editor = editor.clone();
        move |_| {
            if let Err(e) = editor.borrow_mut().add_tier() {
                alert(&e.to_string());
            }
        }
    };

    let remove_all = {
        let editor = editor.clone();
        move |_| {
            if !editor.borrow().tiers().is_empty()
                && confirm("¿Estas seguro de eliminar todos los precios?")
            {
                if let Err(e) = editor.borrow_mut().remove_all() {
                    alert(&e.to_string());
                }
            }
        }
    };

    let submit = {
        let editor = editor.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if submitting.get_untracked() {
                return;
            }
            let payload = match editor.borrow().payload(&form.get_untracked()) {
                Ok(payload) => payload,
                Err(e) => return show_submit_error(e),
            };
            submitting.set(true);
            let (transport, endpoint) = {
                let e = editor.borrow();
                (e.transport().clone(), e.endpoint().to_string())
            };
            let editor = editor.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                match transport.submit(&endpoint, &payload).await {
                    Ok(_) => {
                        editor.borrow_mut().mark_submitted(&payload);
                        navigate("/", Default::default());
                    }
                    Err(e) => show_submit_error(e.into()),
                }
                submitting.set(false);
            });
        }
    };

    view! {
        <div class="app">
            <header>
                <h1>{if editor.borrow().action() == posboard_products::FormAction::Add { "Nuevo producto" } else { "Editar producto" }}</h1>
                <A href="/">"Productos"</A>
            </header>
            <form on:submit=submit>
                <label>"Nombre"
                    <input type="text" prop:value=move || form.with(|f| f.name.clone())
                        on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                        on:change=move |_| {
                            let f = form.get_untracked();
                            check_name(UniquenessCheck::name(&f.name, f.category))
                        }/>
                </label>
                <label>"Código"
                    <input type="text" prop:value=move || form.with(|f| f.code.clone())
                        on:input=move |ev| form.update(|f| f.code = event_target_value(&ev))
                        on:change=move |_| check(Some(UniquenessCheck::code(&form.get_untracked().code)))/>
                </label>
                <label>"Categoría"
                    <input type="number" min="1"
                        prop:value=move || form.with(|f| f.category.map(|c| c.to_string()).unwrap_or_default())
                        on:input=move |ev| {
                            let category = event_target_value(&ev).parse::<CategoryId>().ok();
                            form.update(|f| f.category = category)
                        }/>
                </label>
                <label>"Inventariado"
                    <input type="checkbox" prop:checked=move || form.with(|f| f.inventoried)
                        on:change=move |ev| form.update(|f| f.inventoried = event_target_checked(&ev))/>
                </label>
                <Show when=move || form.with(|f| f.shows_price())>
                    <label>"Precio de compra"
                        <input type="text" prop:value=move || form.with(|f| f.price.clone())
                            on:input=move |ev| form.update(|f| f.price = event_target_value(&ev))/>
                    </label>
                </Show>
                <label>"Precio de venta"
                    <input type="text" prop:value=move || form.with(|f| f.pvp.clone())
                        on:input=move |ev| form.update(|f| f.pvp = event_target_value(&ev))/>
                </label>

                <h2>"Lista de precios"</h2>
                <button type="button" class="btn btn-secondary" on:click=add_tier>"Agregar precio"</button>
                <button type="button" class="btn btn-danger" on:click=remove_all>"Eliminar todos"</button>
                <GridTable headers=price_list_schema().headers() grid=grid on_event=on_tiers/>

                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                    "Guardar"
                </button>
            </form>
        </div>
    }
}
