//! Handlers for `alerts` and `reconcile`.

use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::items::render_items;
use crate::adapter::inbound::cli::output;
use crate::application::inventory::Reconciliation;
use crate::application::InventoryService;
use crate::error::{Error, Result};

#[derive(Tabled)]
struct DriftRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Snapshot")]
    snapshot: String,
    #[tabled(rename = "Ledger")]
    ledger: String,
    #[tabled(rename = "Drift")]
    drift: String,
}

fn render_drift(rows: &[&Reconciliation]) -> String {
    Table::new(rows.iter().map(|r| DriftRow {
        id: r.inventory_id.to_string(),
        name: r.name.clone(),
        snapshot: r.snapshot.normalize().to_string(),
        ledger: r.ledger.normalize().to_string(),
        drift: r.drift.normalize().to_string(),
    }))
    .to_string()
}

/// Execute `alerts`.
pub fn alerts(inventory: &InventoryService, days: u32) -> Result<()> {
    let alerts = inventory.alerts(days)?;

    if output::is_json() {
        output::json_result("alerts", &alerts);
        return Ok(());
    }
    if alerts.is_empty() {
        output::success("No stock alerts");
        return Ok(());
    }
    if !alerts.negative_stock.is_empty() {
        output::section("Negative stock");
        output::table(&render_items(&alerts.negative_stock));
    }
    if !alerts.low_stock.is_empty() {
        output::section("Low stock");
        output::table(&render_items(&alerts.low_stock));
    }
    if !alerts.expiring.is_empty() {
        output::section(&format!("Expiring within {days} days"));
        output::table(&render_items(&alerts.expiring));
    }
    Ok(())
}

/// Execute `reconcile`.
///
/// Fails when any item has drifted so scripts can detect it.
pub fn reconcile(inventory: &InventoryService) -> Result<()> {
    let report = inventory.reconcile()?;
    let drifted: Vec<&Reconciliation> = report.iter().filter(|r| !r.is_consistent()).collect();

    if output::is_json() {
        output::json_result("reconcile", &report);
    } else if drifted.is_empty() {
        output::success(&format!("{} items match the transaction log", report.len()));
    } else {
        output::section("Drifted items");
        output::table(&render_drift(&drifted));
    }

    if drifted.is_empty() {
        Ok(())
    } else {
        Err(Error::Database(format!(
            "{} items drifted from the transaction log",
            drifted.len()
        )))
    }
}
