//! End-to-end ledger behavior against an on-disk database.

mod harness;

use harness::temp_pantry::TempPantry;
use pantry::application::inventory::TransactionRequest;
use pantry::domain::{
    ActionErrorKind, ItemFilter, ItemKey, ItemPatch, LedgerError, NewItem, RawAction,
    TransactionFilter, TransactionType,
};
use pantry::error::Error;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

fn action(kind: &str, data: serde_json::Value) -> RawAction {
    RawAction::new(kind, data)
}

fn history(pantry: &TempPantry, name: &str) -> Vec<pantry::domain::InventoryTransaction> {
    let item = pantry
        .services
        .inventory
        .get_item(&ItemKey::from(name))
        .expect("item exists");
    pantry
        .services
        .inventory
        .list_transactions(&TransactionFilter::for_item(item.id))
        .expect("list transactions")
        .transactions
}

fn assert_reconciled(pantry: &TempPantry) {
    for row in pantry.services.inventory.reconcile().expect("reconcile") {
        assert!(
            row.is_consistent(),
            "{} drifted: snapshot {} vs ledger {}",
            row.name,
            row.snapshot,
            row.ledger
        );
    }
}

#[test]
fn restocking_an_empty_item_logs_one_purchase() {
    let pantry = TempPantry::create();
    pantry
        .services
        .inventory
        .create_item(&NewItem::named("Flour"))
        .unwrap();

    let result = pantry.services.executor.execute(&action(
        "add_item",
        json!({"name": "Flour", "current_quantity": 50, "cost_per_unit": 2, "total_cost": 100}),
    ));
    assert!(result.success, "{}", result.message);

    let item = pantry
        .services
        .inventory
        .get_item(&ItemKey::from("Flour"))
        .unwrap();
    assert_eq!(item.current_quantity, dec!(50));
    assert_eq!(item.cost_per_unit, dec!(2));

    let log = history(&pantry, "Flour");
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].transaction_type, TransactionType::Purchase);
    assert_eq!(log[0].quantity, dec!(50));
    assert_eq!(log[0].cost, dec!(100));
}

#[test]
fn waste_reduces_stock_and_ranks_in_most_wasted() {
    let pantry = TempPantry::create();
    pantry.services.executor.execute(&action(
        "add_item",
        json!({"name": "Flour", "current_quantity": 50, "total_cost": 100}),
    ));

    let result = pantry.services.executor.execute(&action(
        "record_transaction",
        json!({"name": "Flour", "transaction_type": "waste", "quantity": 5}),
    ));
    assert!(result.success, "{}", result.message);
    assert_eq!(pantry.quantity("Flour"), dec!(45));

    let wasted = pantry.services.analytics.most_wasted(10).unwrap();
    assert_eq!(wasted.len(), 1);
    assert_eq!(wasted[0].name, "Flour");
    assert_eq!(wasted[0].quantity, dec!(5));
    assert_eq!(wasted[0].total_cost, dec!(10));
}

#[test]
fn recording_against_a_missing_name_writes_nothing() {
    let pantry = TempPantry::create();
    let result = pantry.services.executor.execute(&action(
        "record_transaction",
        json!({"name": "Saffron", "transaction_type": "usage", "quantity": 1}),
    ));

    assert!(!result.success);
    assert!(result.message.contains("not found"), "{}", result.message);
    assert_eq!(result.error, Some(ActionErrorKind::NotFound));

    let listing = pantry
        .services
        .inventory
        .list_transactions(&TransactionFilter::default())
        .unwrap();
    assert!(listing.transactions.is_empty());
}

#[test]
fn batch_keeps_going_past_an_unsupported_action() {
    let pantry = TempPantry::create();
    let results = pantry.services.executor.execute_batch(&[
        action("add_item", json!({"name": "Rice"})),
        action("bogus", json!({"name": "Rice"})),
    ]);

    assert_eq!(results.len(), 2);
    assert!(results[0].success);
    assert!(results[0].item_id.is_some());
    assert!(!results[1].success);
    assert_eq!(results[1].error, Some(ActionErrorKind::UnsupportedAction));

    let items = pantry
        .services
        .inventory
        .list_items(&ItemFilter::default())
        .unwrap();
    assert_eq!(items.len(), 1);
}

#[test]
fn snapshot_matches_replayed_log_after_mixed_activity() {
    let pantry = TempPantry::create();
    let executor = &pantry.services.executor;
    executor.execute(&action(
        "add_item",
        json!({"name": "Tomatoes", "current_quantity": 30, "cost_per_unit": 1.5, "unit": "kg"}),
    ));
    executor.execute(&action(
        "add_item",
        json!({"name": "Basil", "current_quantity": 10, "total_cost": 35}),
    ));
    for (name, kind, quantity) in [
        ("Tomatoes", "usage", 12),
        ("Tomatoes", "waste", 3),
        ("Basil", "donation", 2),
        ("Basil", "usage", 9),
    ] {
        let result = executor.execute(&action(
            "record_transaction",
            json!({"name": name, "transaction_type": kind, "quantity": quantity}),
        ));
        assert!(result.success, "{}", result.message);
    }
    executor.execute(&action(
        "update_quantity",
        json!({"name": "Tomatoes", "new_quantity": 20}),
    ));

    assert_eq!(pantry.quantity("Tomatoes"), dec!(20));
    assert_eq!(pantry.quantity("Basil"), dec!(-1));
    assert_reconciled(&pantry);
}

#[test]
fn negative_stock_is_allowed_and_flagged() {
    let pantry = TempPantry::create();
    pantry.services.executor.execute(&action(
        "add_item",
        json!({"name": "Eggs", "current_quantity": 2, "total_cost": 1, "min_quantity": 6}),
    ));
    pantry.services.executor.execute(&action(
        "record_transaction",
        json!({"name": "Eggs", "transaction_type": "usage", "quantity": 5}),
    ));

    assert_eq!(pantry.quantity("Eggs"), dec!(-3));
    let alerts = pantry.services.inventory.alerts(3).unwrap();
    assert_eq!(alerts.negative_stock.len(), 1);
    assert!(alerts.low_stock.is_empty());
}

#[test]
fn rejected_transaction_leaves_snapshot_untouched() {
    let pantry = TempPantry::create();
    let item = pantry
        .services
        .inventory
        .create_item(&NewItem {
            current_quantity: dec!(8),
            total_cost: dec!(16),
            ..NewItem::named("Butter")
        })
        .unwrap();

    let missing = pantry.services.inventory.record_transaction(&TransactionRequest {
        inventory_id: pantry::domain::ItemId::new(item.id.get() + 100),
        transaction_type: TransactionType::Usage,
        quantity: dec!(3),
        cost: Decimal::ZERO,
        notes: String::new(),
        date: None,
    });
    assert!(matches!(
        missing,
        Err(Error::Ledger(LedgerError::Referential { .. }))
    ));

    let negative = pantry.services.inventory.record_transaction(&TransactionRequest {
        inventory_id: item.id,
        transaction_type: TransactionType::Usage,
        quantity: dec!(-3),
        cost: Decimal::ZERO,
        notes: String::new(),
        date: None,
    });
    assert!(matches!(
        negative,
        Err(Error::Ledger(LedgerError::Validation { field: "quantity", .. }))
    ));

    assert_eq!(pantry.quantity("Butter"), dec!(8));
    assert_eq!(history(&pantry, "Butter").len(), 1);
}

#[test]
fn purchase_too_small_to_price_is_reported_not_applied() {
    let pantry = TempPantry::create();
    pantry
        .services
        .inventory
        .create_item(&NewItem::named("Saffron"))
        .unwrap();

    let result = pantry.services.executor.execute(&action(
        "record_transaction",
        json!({
            "name": "Saffron",
            "transaction_type": "purchase",
            "quantity": "0.0000000000000000000000000001",
            "cost": "1000000"
        }),
    ));
    assert!(!result.success);
    assert_eq!(result.error, Some(ActionErrorKind::Validation));
    assert_eq!(pantry.quantity("Saffron"), Decimal::ZERO);
    assert!(history(&pantry, "Saffron").is_empty());

    let result = pantry.services.executor.execute(&action(
        "record_transaction",
        json!({"name": "Saffron", "transaction_type": "purchase", "quantity": 1, "cost": 15}),
    ));
    assert!(result.success, "{}", result.message);
    assert_eq!(pantry.quantity("Saffron"), dec!(1));
    assert_reconciled(&pantry);
}

#[test]
fn quantity_edits_log_exactly_one_compensating_transaction() {
    let pantry = TempPantry::create();
    let item = pantry
        .services
        .inventory
        .create_item(&NewItem {
            current_quantity: dec!(10),
            total_cost: dec!(20),
            ..NewItem::named("Milk")
        })
        .unwrap();

    pantry
        .services
        .inventory
        .update_item(item.id, &ItemPatch::quantity(dec!(4)))
        .unwrap();
    let log = history(&pantry, "Milk");
    assert_eq!(log.len(), 2);
    let newest = &log[0];
    assert_eq!(newest.transaction_type, TransactionType::Usage);
    assert_eq!(newest.signed_quantity(), dec!(-6));

    pantry
        .services
        .inventory
        .update_item(item.id, &ItemPatch::quantity(dec!(4)))
        .unwrap();
    assert_eq!(history(&pantry, "Milk").len(), 2);

    let result = pantry.services.executor.execute(&action(
        "update_quantity",
        json!({"name": "milk", "new_quantity": 9}),
    ));
    assert!(result.success, "{}", result.message);
    let log = history(&pantry, "Milk");
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].transaction_type, TransactionType::Purchase);
    assert_eq!(log[0].signed_quantity(), dec!(5));
    assert_reconciled(&pantry);
}

#[test]
fn purchases_set_unit_cost_the_same_way_on_every_path() {
    let pantry = TempPantry::create();
    let executor = &pantry.services.executor;
    executor.execute(&action(
        "add_item",
        json!({"name": "Oil", "current_quantity": 10, "total_cost": 50}),
    ));
    executor.execute(&action(
        "add_item",
        json!({"name": "Vinegar", "current_quantity": 10, "total_cost": 50}),
    ));

    let by_action = executor.execute(&action(
        "record_transaction",
        json!({"name": "Oil", "transaction_type": "purchase", "quantity": 4, "cost": 28}),
    ));
    assert!(by_action.success, "{}", by_action.message);
    let by_restock = executor.execute(&action(
        "add_item",
        json!({"name": "Vinegar", "current_quantity": 4, "total_cost": 28}),
    ));
    assert!(by_restock.success, "{}", by_restock.message);

    let oil = pantry
        .services
        .inventory
        .get_item(&ItemKey::from("Oil"))
        .unwrap();
    let vinegar = pantry
        .services
        .inventory
        .get_item(&ItemKey::from("Vinegar"))
        .unwrap();
    assert_eq!(oil.cost_per_unit, dec!(7));
    assert_eq!(oil.cost_per_unit, vinegar.cost_per_unit);
    assert_eq!(oil.total_cost, dec!(78));
    assert_eq!(oil.total_cost, vinegar.total_cost);
}

#[test]
fn purchase_without_cost_waits_for_the_caller() {
    let pantry = TempPantry::create();
    pantry.services.executor.execute(&action("add_item", json!({"name": "Sugar"})));

    let result = pantry.services.executor.execute(&action(
        "record_transaction",
        json!({"name": "Sugar", "transaction_type": "purchase", "quantity": 5}),
    ));
    assert!(result.is_pending());
    assert!(history(&pantry, "Sugar").is_empty());

    let pending = result.pending.expect("pending action");
    assert_eq!(pending.missing_fields, vec!["cost".to_string()]);
    let mut supplied = serde_json::Map::new();
    supplied.insert("cost".into(), json!(12.5));

    let completed = pantry.services.executor.complete(pending, supplied);
    assert!(completed.success, "{}", completed.message);
    assert_eq!(pantry.quantity("Sugar"), dec!(5));
    let sugar = pantry
        .services
        .inventory
        .get_item(&ItemKey::from("Sugar"))
        .unwrap();
    assert_eq!(sugar.cost_per_unit, dec!(2.5));
}

#[test]
fn deleting_an_item_removes_its_history() {
    let pantry = TempPantry::create();
    pantry.services.executor.execute(&action(
        "add_item",
        json!({"name": "Cream", "current_quantity": 3, "total_cost": 9}),
    ));
    pantry.services.executor.execute(&action(
        "record_transaction",
        json!({"name": "Cream", "transaction_type": "waste", "quantity": 1}),
    ));

    let result = pantry
        .services
        .executor
        .execute(&action("delete_item", json!({"name": "Cream"})));
    assert!(result.success, "{}", result.message);
    assert!(result.message.contains("2 transactions"), "{}", result.message);

    assert!(pantry
        .services
        .inventory
        .get_item(&ItemKey::from("Cream"))
        .is_err());
    let listing = pantry
        .services
        .inventory
        .list_transactions(&TransactionFilter::default())
        .unwrap();
    assert!(listing.transactions.is_empty());

    let again = pantry
        .services
        .executor
        .execute(&action("delete_item", json!({"name": "Cream"})));
    assert_eq!(again.error, Some(ActionErrorKind::NotFound));
}

#[test]
fn reads_do_not_change_state() {
    let pantry = TempPantry::create();
    pantry.services.executor.execute(&action(
        "add_item",
        json!({"name": "Garlic", "current_quantity": 12, "total_cost": 6}),
    ));

    let inventory = &pantry.services.inventory;
    let first_items = inventory.list_items(&ItemFilter::default()).unwrap();
    let first_log = inventory
        .list_transactions(&TransactionFilter::default())
        .unwrap();
    let first_trends = pantry.services.analytics.weekly_trends().unwrap();

    assert_eq!(inventory.list_items(&ItemFilter::default()).unwrap(), first_items);
    assert_eq!(
        inventory
            .list_transactions(&TransactionFilter::default())
            .unwrap()
            .transactions,
        first_log.transactions
    );
    assert_eq!(pantry.services.analytics.weekly_trends().unwrap(), first_trends);
}
