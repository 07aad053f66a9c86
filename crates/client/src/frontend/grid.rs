//! Grid rendering into leptos signals.

use leptos::*;

use crate::grid::{CellControl, GridEvent, GridRow, GridTarget, RowEmphasis, RowKey, RowLocator};

/// Render target whose rows live in a signal; the table view re-renders when
/// a controller replaces them.
#[derive(Debug, Clone, Copy)]
pub struct SignalGrid {
    rows: RwSignal<Vec<GridRow>>,
}

impl SignalGrid {
    pub fn new() -> Self {
        Self {
            rows: create_rw_signal(Vec::new()),
        }
    }

    pub fn rows(&self) -> RwSignal<Vec<GridRow>> {
        self.rows
    }
}

impl Default for SignalGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl RowLocator for SignalGrid {
    fn position_of(&self, key: RowKey) -> Option<usize> {
        self.rows
            .with_untracked(|rows| rows.iter().position(|row| row.key == key))
    }

    fn row_count(&self) -> usize {
        self.rows.with_untracked(Vec::len)
    }
}

impl GridTarget for SignalGrid {
    fn replace_rows(&mut self, rows: Vec<GridRow>) {
        self.rows.set(rows);
    }
}

/// Table over a [`SignalGrid`]; every interaction is reported as a [`GridEvent`].
#[component]
pub fn GridTable(
    headers: Vec<&'static str>,
    grid: SignalGrid,
    #[prop(into)] on_event: Callback<GridEvent>,
) -> impl IntoView {
    view! {
        <table class="table table-bordered table-sm">
            <thead>
                <tr>{headers.into_iter().map(|h| view! { <th>{h}</th> }).collect_view()}</tr>
            </thead>
            <tbody>
                <For
                    each=move || grid.rows().get()
                    key=|row: &GridRow| row.key
                    children=move |row: GridRow| grid_row(row, on_event)
                />
            </tbody>
        </table>
    }
}

fn grid_row(row: GridRow, on_event: Callback<GridEvent>) -> impl IntoView {
    let key = row.key;
    let class = match row.emphasis {
        RowEmphasis::Danger => "table-danger",
        RowEmphasis::Normal => "",
    };
    view! {
        <tr class=class data-row=key.as_raw().to_string()>
            {row.cells.into_iter().map(|cell| grid_cell(key, cell, on_event)).collect_view()}
        </tr>
    }
}

fn grid_cell(key: RowKey, cell: CellControl, on_event: Callback<GridEvent>) -> View {
    match cell {
        CellControl::Text(text) => view! { <td>{text}</td> }.into_view(),
        CellControl::Input { field, value, input } => view! {
            <td>
                <div class="input-group input-group-sm">
                    <button class="btn btn-outline-secondary" type="button"
                        on:click=move |_| on_event.call(GridEvent::step(key, field, false))>"-"</button>
                    <input
                        type="text"
                        class="form-control"
                        autocomplete="off"
                        name=field
                        value=value
                        on:keypress=move |ev: web_sys::KeyboardEvent| {
                            let pressed = ev.key();
                            let mut chars = pressed.chars();
                            // Named keys (Enter, Tab...) pass through.
                            if let (Some(ch), None) = (chars.next(), chars.next()) {
                                if !input.filter().accepts(ch, &event_target_value(&ev)) {
                                    ev.prevent_default();
                                }
                            }
                        }
                        on:change=move |ev| {
                            on_event.call(GridEvent::commit(key, field, &event_target_value(&ev)))
                        }
                    />
                    <button class="btn btn-outline-secondary" type="button"
                        on:click=move |_| on_event.call(GridEvent::step(key, field, true))>"+"</button>
                </div>
            </td>
        }
        .into_view(),
        CellControl::Remove => view! {
            <td>
                <button class="btn btn-danger btn-sm" type="button"
                    on:click=move |_| on_event.call(GridEvent::remove(key))>"x"</button>
            </td>
        }
        .into_view(),
        CellControl::Add => view! {
            <td>
                <button class="btn btn-success btn-sm" type="button"
                    on:click=move |_| on_event.call(GridEvent::add(key))>"+"</button>
            </td>
        }
        .into_view(),
    }
}
