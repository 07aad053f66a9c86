//! Grid binding: keeps a rendered table consistent with a line item store.
//!
//! A grid is a named component instance with an explicit column schema. Every
//! render mints fresh [`RowKey`]s; an interaction carries the key of the row it
//! came from and is mapped back to a store position by asking the render target
//! where that row currently sits. Keys from an older render never resolve.

use tracing::debug;

use posboard_core::{
    EditableField, EditorError, EditorResult, FieldValue, LineItem, NumericInput, ValidationError,
};

use crate::store::LineItemStore;

/// Opaque identifier of one rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(u64);

impl RowKey {
    /// Rebuild a key from the value a render target stored (e.g. a `data-row`
    /// attribute).
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowEmphasis {
    #[default]
    Normal,
    /// Highlighted row (e.g. a batch with nothing left).
    Danger,
}

/// What one cell shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellControl {
    Text(String),
    /// Numeric input pre-populated with the field's current value.
    Input {
        field: &'static str,
        value: String,
        input: NumericInput,
    },
    Remove,
    Add,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub key: RowKey,
    pub cells: Vec<CellControl>,
    pub emphasis: RowEmphasis,
}

/// Maps a rendered row back to its current place in the table.
pub trait RowLocator {
    /// Zero-based place of `key` among the currently rendered rows.
    fn position_of(&self, key: RowKey) -> Option<usize>;

    /// Number of currently rendered rows.
    fn row_count(&self) -> usize;
}

/// Something that can display rows (in-memory table, reactive signal, DOM).
pub trait GridTarget: RowLocator {
    /// Replace every rendered row.
    fn replace_rows(&mut self, rows: Vec<GridRow>);
}

/// Plain in-memory render target.
#[derive(Debug, Clone, Default)]
pub struct MemoryGrid {
    rows: Vec<GridRow>,
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// Key of the row currently rendered at `position`.
    pub fn key_at(&self, position: usize) -> Option<RowKey> {
        self.rows.get(position).map(|r| r.key)
    }
}

impl RowLocator for MemoryGrid {
    fn position_of(&self, key: RowKey) -> Option<usize> {
        self.rows.iter().position(|r| r.key == key)
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl GridTarget for MemoryGrid {
    fn replace_rows(&mut self, rows: Vec<GridRow>) {
        self.rows = rows;
    }
}

/// One column of a grid schema.
pub enum Column<T: LineItem> {
    Display {
        header: &'static str,
        render: fn(&T) -> String,
    },
    Editable {
        header: &'static str,
        field: T::Field,
    },
    Remove,
    Add,
}

impl<T: LineItem> Column<T> {
    pub fn header(&self) -> &'static str {
        match self {
            Column::Display { header, .. } | Column::Editable { header, .. } => header,
            Column::Remove | Column::Add => "",
        }
    }
}

/// Named column layout of one grid instance.
pub struct GridSchema<T: LineItem> {
    name: &'static str,
    columns: Vec<Column<T>>,
    emphasis: fn(&T) -> RowEmphasis,
}

impl<T: LineItem> GridSchema<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            columns: Vec::new(),
            emphasis: |_| RowEmphasis::Normal,
        }
    }

    pub fn display(mut self, header: &'static str, render: fn(&T) -> String) -> Self {
        self.columns.push(Column::Display { header, render });
        self
    }

    pub fn editable(mut self, header: &'static str, field: T::Field) -> Self {
        self.columns.push(Column::Editable { header, field });
        self
    }

    pub fn remove_control(mut self) -> Self {
        self.columns.push(Column::Remove);
        self
    }

    pub fn add_control(mut self) -> Self {
        self.columns.push(Column::Add);
        self
    }

    pub fn emphasize(mut self, emphasis: fn(&T) -> RowEmphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(Column::header).collect()
    }

    fn render_row(&self, key: RowKey, item: &T) -> GridRow {
        let cells = self
            .columns
            .iter()
            .map(|column| match column {
                Column::Display { render, .. } => CellControl::Text(render(item)),
                Column::Editable { field, .. } => {
                    let input = field.input();
                    CellControl::Input {
                        field: field.name(),
                        value: input.format(item.field_value(*field)),
                        input,
                    }
                }
                Column::Remove => CellControl::Remove,
                Column::Add => CellControl::Add,
            })
            .collect();
        GridRow {
            key,
            cells,
            emphasis: (self.emphasis)(item),
        }
    }

    /// Editable field of this grid named `name`.
    fn editable_field(&self, name: &str) -> Option<T::Field> {
        self.columns.iter().find_map(|c| match c {
            Column::Editable { field, .. } if field.name() == name => Some(*field),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEventKind {
    /// An input's committed (change) value.
    FieldCommitted { field: String, raw: String },
    /// Spinner button on an input.
    Step { field: String, up: bool },
    RemoveClicked,
    AddClicked,
}

/// A user interaction bubbling up from one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridEvent {
    pub row: RowKey,
    pub kind: GridEventKind,
}

impl GridEvent {
    pub fn commit(row: RowKey, field: &str, raw: &str) -> Self {
        Self {
            row,
            kind: GridEventKind::FieldCommitted {
                field: field.to_string(),
                raw: raw.to_string(),
            },
        }
    }

    pub fn step(row: RowKey, field: &str, up: bool) -> Self {
        Self {
            row,
            kind: GridEventKind::Step {
                field: field.to_string(),
                up,
            },
        }
    }

    pub fn remove(row: RowKey) -> Self {
        Self {
            row,
            kind: GridEventKind::RemoveClicked,
        }
    }

    pub fn add(row: RowKey) -> Self {
        Self {
            row,
            kind: GridEventKind::AddClicked,
        }
    }
}

/// What handling an event did.
#[derive(Debug, Clone, PartialEq)]
pub enum GridOutcome<T> {
    Updated { position: usize, value: FieldValue },
    Removed { position: usize, item: T },
    /// Staged tables: the caller decides what adding means.
    AddRequested { position: usize },
}

/// Binds one grid schema and render target to stores.
pub struct GridBinding<T: LineItem, G: GridTarget> {
    schema: GridSchema<T>,
    target: G,
    next_key: u64,
}

impl<T: LineItem, G: GridTarget> GridBinding<T, G> {
    pub fn new(schema: GridSchema<T>, target: G) -> Self {
        Self {
            schema,
            target,
            next_key: 0,
        }
    }

    pub fn schema(&self) -> &GridSchema<T> {
        &self.schema
    }

    pub fn target(&self) -> &G {
        &self.target
    }

    /// Replace the table's rows with one row per stored item, in order.
    pub fn render(&mut self, store: &LineItemStore<T>) {
        let rows: Vec<GridRow> = store
            .snapshot()
            .iter()
            .map(|item| {
                self.next_key += 1;
                self.schema.render_row(RowKey(self.next_key), item)
            })
            .collect();
        debug!(grid = self.schema.name, rows = rows.len(), "grid rendered");
        self.target.replace_rows(rows);
    }

    /// Store position of the row that produced an interaction.
    pub fn resolve_row_position(&self, row: RowKey) -> EditorResult<usize> {
        resolve_position(&self.target, row)
    }

    /// Whether a keystroke may go into the named input.
    pub fn accepts_keystroke(&self, field: &str, ch: char, current: &str) -> bool {
        self.schema
            .editable_field(field)
            .is_some_and(|f| f.input().filter().accepts(ch, current))
    }

    /// Apply one interaction to `store`.
    ///
    /// Field edits update the store in place; removals re-render since every
    /// later row moves up.
    pub fn handle(
        &mut self,
        store: &mut LineItemStore<T>,
        event: GridEvent,
    ) -> EditorResult<GridOutcome<T>> {
        let position = self.resolve_row_position(event.row)?;
        match event.kind {
            GridEventKind::FieldCommitted { field, raw } => {
                let field = self.field(&field)?;
                let value = field.input().parse(&raw)?;
                self.apply(store, position, field, value)
            }
            GridEventKind::Step { field, up } => {
                let field = self.field(&field)?;
                let current = store
                    .get(position)
                    .map(|item| item.field_value(field))
                    .ok_or_else(|| EditorError::out_of_range(position, store.len()))?;
                let input = field.input();
                let value = if up {
                    input.step_up(current)
                } else {
                    input.step_down(current)
                };
                self.apply(store, position, field, value)
            }
            GridEventKind::RemoveClicked => {
                let item = store.remove_at(position)?;
                self.render(store);
                Ok(GridOutcome::Removed { position, item })
            }
            GridEventKind::AddClicked => Ok(GridOutcome::AddRequested { position }),
        }
    }

    fn field(&self, name: &str) -> EditorResult<T::Field> {
        self.schema
            .editable_field(name)
            .ok_or_else(|| ValidationError::UnknownField(name.to_string()).into())
    }

    fn apply(
        &self,
        store: &mut LineItemStore<T>,
        position: usize,
        field: T::Field,
        value: FieldValue,
    ) -> EditorResult<GridOutcome<T>> {
        if store.update_field(position, field, value) {
            Ok(GridOutcome::Updated { position, value })
        } else if store.phase() == crate::store::EditorPhase::Submitted {
            Err(EditorError::Submitted)
        } else {
            Err(EditorError::out_of_range(position, store.len()))
        }
    }
}

/// Current store position of `row` according to `locator`.
///
/// A key that is no longer rendered is reported as one past the end.
pub fn resolve_position(locator: &impl RowLocator, row: RowKey) -> EditorResult<usize> {
    locator.position_of(row).ok_or_else(|| {
        let len = locator.row_count();
        EditorError::out_of_range(len, len)
    })
}
