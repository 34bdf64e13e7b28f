//! Handlers for the `tx` command group.

use rust_decimal::Decimal;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::{TransactionListArgs, TransactionRecordArgs};
use crate::adapter::inbound::cli::output;
use crate::application::inventory::TransactionRequest;
use crate::application::InventoryService;
use crate::domain::{InventoryTransaction, TransactionFilter, TransactionListing};
use crate::error::Result;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Notes")]
    notes: String,
}

impl From<&InventoryTransaction> for TransactionRow {
    fn from(tx: &InventoryTransaction) -> Self {
        Self {
            id: tx.id.to_string(),
            date: tx.date.to_string(),
            item: tx.inventory_id.to_string(),
            kind: tx.transaction_type.to_string(),
            quantity: tx.signed_quantity().normalize().to_string(),
            cost: tx.cost.normalize().to_string(),
            notes: tx.notes.clone(),
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Cost")]
    cost: String,
}

fn render(listing: &TransactionListing) -> (String, String) {
    let rows = Table::new(listing.transactions.iter().map(TransactionRow::from)).to_string();
    let summary = Table::new(listing.summary_by_type.iter().map(|(kind, s)| SummaryRow {
        kind: kind.to_string(),
        count: s.count,
        quantity: s.total_quantity.normalize().to_string(),
        cost: s.total_cost.normalize().to_string(),
    }))
    .to_string();
    (rows, summary)
}

/// Execute `tx record`.
pub fn record(inventory: &InventoryService, args: TransactionRecordArgs) -> Result<()> {
    let item = inventory.get_item(&args.item)?;
    let id = inventory.record_transaction(&TransactionRequest {
        inventory_id: item.id,
        transaction_type: args.transaction_type,
        quantity: args.quantity,
        cost: args.cost,
        notes: args.notes,
        date: args.date,
    })?;
    let after = inventory.get_item(&item.id.into())?;

    if output::is_json() {
        output::json_output(serde_json::json!({
            "command": "tx.record",
            "result": { "transaction_id": id, "item": after },
        }));
        return Ok(());
    }
    output::success(&format!(
        "Recorded {} of {} {} for {}",
        args.transaction_type,
        args.quantity.normalize(),
        after.unit,
        after.name
    ));
    output::field(
        "Quantity",
        format!(
            "{} -> {}",
            item.current_quantity.normalize(),
            after.current_quantity.normalize()
        ),
    );
    if after.current_quantity < Decimal::ZERO {
        output::warning(&format!("{} is now below zero", after.name));
    }
    Ok(())
}

/// Execute `tx list`.
pub fn list(inventory: &InventoryService, args: TransactionListArgs) -> Result<()> {
    let inventory_id = match &args.item {
        Some(key) => Some(inventory.get_item(key)?.id),
        None => None,
    };
    let listing = inventory.list_transactions(&TransactionFilter {
        inventory_id,
        transaction_type: args.transaction_type,
        since: args.since,
        until: args.until,
        limit: args.limit,
    })?;

    if output::is_json() {
        output::json_result("tx.list", &listing);
        return Ok(());
    }
    if listing.transactions.is_empty() {
        output::note("No transactions");
        return Ok(());
    }
    let (rows, summary) = render(&listing);
    output::table(&rows);
    output::section("By type");
    output::table(&summary);
    Ok(())
}
