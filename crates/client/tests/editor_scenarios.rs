mod common;

use std::rc::Rc;

use rust_decimal::Decimal;
use serde_json::json;

use common::{RecordingServer, batch};
use posboard_client::grid::{GridBinding, GridEvent, GridOutcome, MemoryGrid};
use posboard_client::lookup::{LookupSettings, TokioDelay, select};
use posboard_client::pages::{StockAdjustmentWorkbench, adjustment_schema, price_list_schema};
use posboard_client::store::{EditorPhase, LineItemStore};
use posboard_client::submission::{EMPTY_DETAIL_MESSAGE, SubmissionSpec, build_payload};
use posboard_core::{EditorError, InventoryId};
use posboard_products::PriceTier;

#[test]
fn price_tier_added_then_repriced() {
    let mut store = LineItemStore::<PriceTier>::new();
    let mut grid = GridBinding::new(price_list_schema(), MemoryGrid::new());

    store.add(PriceTier::default()).unwrap();
    grid.render(&store);
    let row = grid.target().key_at(0).unwrap();
    let outcome = grid.handle(&mut store, GridEvent::commit(row, "net_price", "9.99")).unwrap();
    assert!(matches!(outcome, GridOutcome::Updated { position: 0, .. }));

    assert_eq!(store.snapshot(), &[PriceTier::new(1, Decimal::new(999, 2))]);
    assert_eq!(
        serde_json::to_value(store.snapshot()).unwrap(),
        json!([{"quantity": 1, "net_price": 9.99}])
    );
}

#[test]
fn removing_the_middle_line_shifts_the_rest_up() {
    let mut store = LineItemStore::new();
    let mut grid = GridBinding::new(adjustment_schema(), MemoryGrid::new());
    for (id, name) in [(1, "A"), (2, "B"), (3, "C")] {
        store.add_unique(select(batch(id, name, 4))).unwrap();
    }
    grid.render(&store);

    let row_b = grid.target().key_at(1).unwrap();
    let outcome = grid.handle(&mut store, GridEvent::remove(row_b)).unwrap();
    assert!(matches!(outcome, GridOutcome::Removed { position: 1, ref item } if item.id == InventoryId::new(2)));

    assert_eq!(store.list_ids(), vec![InventoryId::new(1), InventoryId::new(3)]);
    assert_eq!(store.get(1).unwrap().id, InventoryId::new(3));

    // The removed row's key is gone; a second click on it changes nothing.
    let err = grid.handle(&mut store, GridEvent::remove(row_b)).unwrap_err();
    assert_eq!(err, EditorError::out_of_range(2, 2));
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn empty_adjustment_is_never_sent() {
    let server = Rc::new(RecordingServer::new(vec![batch(1, "Arroz", 3)]));
    let mut bench = StockAdjustmentWorkbench::new(
        Rc::clone(&server),
        TokioDelay,
        LookupSettings::default(),
        MemoryGrid::new(),
        MemoryGrid::new(),
        "/pos/inventory/product/stock/adjustment/",
    );

    let err = bench.submit().await.unwrap_err();
    assert_eq!(err.user_message().as_deref(), Some(EMPTY_DETAIL_MESSAGE));
    assert!(server.posted().is_empty());
    assert_eq!(bench.phase(), EditorPhase::Empty);
}

#[test]
fn payload_carries_the_snapshot_under_its_key() {
    let mut store = LineItemStore::new();
    store.add_unique(select(batch(7, "Azucar", 11))).unwrap();
    store.add_unique(select(batch(8, "Sal", 0))).unwrap();

    let payload = build_payload(&SubmissionSpec::stock_adjustment(), Vec::new(), &store).unwrap();
    let pairs = payload.to_form_pairs();
    assert_eq!(pairs[0], ("action".to_string(), "create".to_string()));
    let (key, items) = pairs.last().unwrap();
    assert_eq!(key, "products");
    let items: serde_json::Value = serde_json::from_str(items).unwrap();
    assert_eq!(items[0]["id"], 7);
    assert_eq!(items[0]["newstock"], 11);
    assert_eq!(items[1]["newstock"], 0);
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Add(i64),
        Remove(usize),
        Edit(usize, i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1i64..20).prop_map(Op::Add),
            (0usize..8).prop_map(Op::Remove),
            (0usize..8, 0i64..500).prop_map(|(p, v)| Op::Edit(p, v)),
        ]
    }

    proptest! {
        #[test]
        fn grid_always_mirrors_the_store(ops in proptest::collection::vec(op(), 1..40)) {
            let mut store = LineItemStore::new();
            let mut grid = GridBinding::new(adjustment_schema(), MemoryGrid::new());
            grid.render(&store);

            for op in ops {
                match op {
                    Op::Add(id) => {
                        if store.add_unique(select(batch(id, "X", 1))).is_ok() {
                            grid.render(&store);
                        }
                    }
                    Op::Remove(p) => {
                        if let Some(row) = grid.target().key_at(p) {
                            grid.handle(&mut store, GridEvent::remove(row)).unwrap();
                        }
                    }
                    Op::Edit(p, v) => {
                        if let Some(row) = grid.target().key_at(p) {
                            grid.handle(&mut store, GridEvent::commit(row, "newstock", &v.to_string())).unwrap();
                            prop_assert_eq!(store.get(p).unwrap().newstock, v);
                        }
                    }
                }

                prop_assert_eq!(grid.target().rows().len(), store.len());
                for p in 0..store.len() {
                    let row = grid.target().key_at(p).unwrap();
                    prop_assert_eq!(grid.resolve_row_position(row).unwrap(), p);
                }
                let ids = store.list_ids();
                let mut unique = ids.clone();
                unique.sort();
                unique.dedup();
                prop_assert_eq!(unique.len(), ids.len());
            }
        }
    }
}
