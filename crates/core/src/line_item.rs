//! Line item trait: one editable row of an in-memory detail.

use core::fmt::{self, Debug, Display};
use core::hash::Hash;

use serde::Serialize;

use crate::numeric::{FieldValue, NumericInput};

/// A closed set of editable fields of one line item type.
pub trait EditableField: Copy + Eq + Debug + 'static {
    /// Name used by the input control and in submitted JSON.
    fn name(&self) -> &'static str;

    /// Numeric rule the input control enforces.
    fn input(&self) -> NumericInput;

    /// Every editable field, in column order.
    fn all() -> &'static [Self];

    /// Look a field up by its control name.
    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.name() == name)
    }
}

/// Line item marker + minimal interface.
///
/// Items are plain values; the store owns them and the grid only ever sees
/// snapshots.
pub trait LineItem: Clone + Debug + Serialize {
    /// Identifier used to exclude already-added records from lookups.
    type Id: Clone + Eq + Hash + Debug + Display + Serialize;

    type Field: EditableField;

    /// Returns the item identifier, `None` for items without one (price tiers).
    fn id(&self) -> Option<Self::Id>;

    /// Replace one field. The value is already parsed and coerced by the caller.
    fn set_field(&mut self, field: Self::Field, value: FieldValue);

    /// Current value of one editable field.
    fn field_value(&self, field: Self::Field) -> FieldValue;
}

/// Id type of items that never carry one (price tiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NoId {}

impl Display for NoId {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

/// Field set of read-only items (staged search rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoField {}

impl EditableField for NoField {
    fn name(&self) -> &'static str {
        match *self {}
    }

    fn input(&self) -> NumericInput {
        match *self {}
    }

    fn all() -> &'static [Self] {
        &[]
    }
}
