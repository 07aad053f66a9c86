//! In-memory line item store backing one editable grid.
//!
//! The store is owned by a page controller and lives as long as the page.
//! Positions are zero-based and always reflect the current order: removing an
//! item shifts every later item down by one.

use tracing::debug;

use posboard_core::{EditorError, EditorResult, FieldValue, LineItem};

/// Lifecycle of one editable detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Empty,
    Populated,
    /// Handed off to a successful submission; no further changes.
    Submitted,
}

/// Ordered, mutable collection of line items.
#[derive(Debug, Clone)]
pub struct LineItemStore<T: LineItem> {
    items: Vec<T>,
    submitted: bool,
}

impl<T: LineItem> Default for LineItemStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: LineItem> LineItemStore<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            submitted: false,
        }
    }

    /// Store preloaded with saved items (edit forms).
    pub fn with_items(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
            submitted: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn phase(&self) -> EditorPhase {
        if self.submitted {
            EditorPhase::Submitted
        } else if self.items.is_empty() {
            EditorPhase::Empty
        } else {
            EditorPhase::Populated
        }
    }

    fn ensure_open(&self) -> EditorResult<()> {
        if self.submitted {
            return Err(EditorError::Submitted);
        }
        Ok(())
    }

    /// Append an item and return its position.
    ///
    /// No uniqueness check: callers adding identified items pre-filter through
    /// the lookup exclusion list (or use [`LineItemStore::add_unique`]).
    pub fn add(&mut self, item: T) -> EditorResult<usize> {
        self.ensure_open()?;
        self.items.push(item);
        let position = self.items.len() - 1;
        debug!(position, "line item added");
        Ok(position)
    }

    /// Append an item unless another item already carries its id.
    pub fn add_unique(&mut self, item: T) -> EditorResult<usize> {
        if let Some(id) = item.id() {
            if self.contains_id(&id) {
                return Err(EditorError::duplicate(id.to_string()));
            }
        }
        self.add(item)
    }

    /// Replace one field of the item at `position`.
    ///
    /// Out-of-range positions (and submitted stores) are a silent no-op;
    /// returns whether the value was applied.
    pub fn update_field(&mut self, position: usize, field: T::Field, value: FieldValue) -> bool {
        if self.submitted {
            return false;
        }
        match self.items.get_mut(position) {
            Some(item) => {
                item.set_field(field, value);
                debug!(position, ?field, %value, "line item field updated");
                true
            }
            None => {
                debug!(position, len = self.items.len(), "field update ignored: position out of range");
                false
            }
        }
    }

    /// Remove the item at `position`; later items shift down by one.
    pub fn remove_at(&mut self, position: usize) -> EditorResult<T> {
        self.ensure_open()?;
        if position >= self.items.len() {
            return Err(EditorError::out_of_range(position, self.items.len()));
        }
        let removed = self.items.remove(position);
        debug!(position, remaining = self.items.len(), "line item removed");
        Ok(removed)
    }

    /// Drop every item; returns how many were removed.
    pub fn clear(&mut self) -> EditorResult<usize> {
        self.ensure_open()?;
        let removed = self.items.len();
        self.items.clear();
        debug!(removed, "detail cleared");
        Ok(removed)
    }

    /// Ids of the held items in order. Empty for items without ids.
    pub fn list_ids(&self) -> Vec<T::Id> {
        self.items.iter().filter_map(|item| item.id()).collect()
    }

    pub fn contains_id(&self, id: &T::Id) -> bool {
        self.items.iter().any(|item| item.id().as_ref() == Some(id))
    }

    pub fn get(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    /// Current items in order.
    pub fn snapshot(&self) -> &[T] {
        &self.items
    }

    /// Freeze the store after the submission it fed succeeded.
    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;
    use posboard_core::InventoryId;
    use posboard_inventory::{StockAdjustmentField, StockAdjustmentLine};
    use posboard_products::{PriceTier, PriceTierField};
    use rust_decimal::Decimal;

    pub(crate) fn line(id: i64) -> StockAdjustmentLine {
        StockAdjustmentLine {
            id: InventoryId::new(id),
            date_joined: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            product_name: format!("Product {id}"),
            expiration_date: None,
            quantity: 10,
            saldo: Decimal::from(id),
            newstock: id,
        }
    }

    #[test]
    fn phases_follow_contents() {
        let mut store = LineItemStore::new();
        assert_eq!(store.phase(), EditorPhase::Empty);
        store.add(PriceTier::default()).unwrap();
        assert_eq!(store.phase(), EditorPhase::Populated);
        store.update_field(0, PriceTierField::Quantity, FieldValue::Integer(3));
        assert_eq!(store.phase(), EditorPhase::Populated);
        store.remove_at(0).unwrap();
        assert_eq!(store.phase(), EditorPhase::Empty);
    }

    #[test]
    fn remove_out_of_range_fails() {
        let mut store = LineItemStore::with_items([line(1)]);
        assert_eq!(
            store.remove_at(1).unwrap_err(),
            EditorError::OutOfRangeIndex { position: 1, len: 1 }
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_out_of_range_is_a_noop() {
        let mut store = LineItemStore::with_items([line(1)]);
        let before = store.snapshot().to_vec();
        assert!(!store.update_field(5, StockAdjustmentField::NewStock, FieldValue::Integer(9)));
        assert_eq!(store.snapshot(), before.as_slice());
    }

    #[test]
    fn update_touches_only_the_target() {
        let mut store = LineItemStore::with_items([line(1), line(2), line(3)]);
        assert!(store.update_field(1, StockAdjustmentField::NewStock, FieldValue::Integer(50)));
        let mut expected = line(2);
        expected.newstock = 50;
        assert_eq!(store.snapshot(), &[line(1), expected, line(3)]);
    }

    #[test]
    fn add_unique_rejects_known_ids() {
        let mut store = LineItemStore::with_items([line(7)]);
        let err = store.add_unique(line(7)).unwrap_err();
        assert_eq!(err, EditorError::DuplicateCandidate("7".into()));
        assert_eq!(err.to_string(), "candidate 7 is already in the detail");
        assert_eq!(store.add_unique(line(8)).unwrap(), 1);
    }

    #[test]
    fn price_tiers_have_no_ids() {
        let store = LineItemStore::with_items([PriceTier::default(), PriceTier::default()]);
        assert!(store.list_ids().is_empty());
    }

    #[test]
    fn submitted_store_is_frozen() {
        let mut store = LineItemStore::with_items([line(1)]);
        store.mark_submitted();
        assert_eq!(store.phase(), EditorPhase::Submitted);
        assert_eq!(store.add(line(2)).unwrap_err(), EditorError::Submitted);
        assert_eq!(store.remove_at(0).unwrap_err(), EditorError::Submitted);
        assert!(!store.update_field(0, StockAdjustmentField::NewStock, FieldValue::Integer(0)));
        assert_eq!(store.clear().unwrap_err(), EditorError::Submitted);
    }

    #[test]
    fn clear_empties_the_detail() {
        let mut store = LineItemStore::with_items([line(1), line(2)]);
        assert_eq!(store.clear().unwrap(), 2);
        assert_eq!(store.phase(), EditorPhase::Empty);
    }

    #[test]
    fn edited_price_tier_snapshot() {
        let mut store = LineItemStore::new();
        store.add(PriceTier::default()).unwrap();
        store.update_field(0, PriceTierField::NetPrice, FieldValue::Decimal(Decimal::new(999, 2)));
        assert_eq!(store.snapshot(), &[PriceTier::new(1, Decimal::new(999, 2))]);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add,
            Remove(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![Just(Op::Add), (0usize..12).prop_map(Op::Remove)]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: ids are the added ids minus the removed ones, in add order.
            #[test]
            fn ids_follow_add_and_remove(ops in prop::collection::vec(op(), 0..40)) {
                let mut store = LineItemStore::new();
                let mut model: Vec<i64> = Vec::new();
                let mut next = 0i64;
                for op in ops {
                    match op {
                        Op::Add => {
                            next += 1;
                            store.add(line(next)).unwrap();
                            model.push(next);
                        }
                        Op::Remove(p) => {
                            let result = store.remove_at(p);
                            if p < model.len() {
                                let removed = model.remove(p);
                                prop_assert_eq!(result.unwrap().id.get(), removed);
                            } else {
                                prop_assert!(result.is_err());
                            }
                        }
                    }
                }
                let ids: Vec<i64> = store.list_ids().iter().map(|id| id.get()).collect();
                prop_assert_eq!(ids, model);
            }

            /// Property: removing `p` shifts every later item down by one.
            #[test]
            fn removal_shifts_later_items(n in 1usize..20, p_seed in 0usize..20) {
                let p = p_seed % n;
                let mut store = LineItemStore::with_items((0..n as i64).map(line));
                let before = store.snapshot().to_vec();
                store.remove_at(p).unwrap();
                let after = store.snapshot();
                prop_assert_eq!(after.len(), n - 1);
                for (i, item) in before.iter().enumerate() {
                    if i < p {
                        prop_assert_eq!(&after[i], item);
                    } else if i > p {
                        prop_assert_eq!(&after[i - 1], item);
                    }
                }
            }

            /// Property: an update never changes other items or fields.
            #[test]
            fn update_is_isolated(n in 1usize..10, p_seed in 0usize..10, v in 0i64..10_000_000) {
                let p = p_seed % n;
                let mut store = LineItemStore::with_items((0..n as i64).map(line));
                let before = store.snapshot().to_vec();
                store.update_field(p, StockAdjustmentField::NewStock, FieldValue::Integer(v));
                for (i, item) in store.snapshot().iter().enumerate() {
                    if i == p {
                        let mut expected = before[i].clone();
                        expected.newstock = v;
                        prop_assert_eq!(item, &expected);
                    } else {
                        prop_assert_eq!(item, &before[i]);
                    }
                }
            }
        }
    }
}
