//! Inventory use cases.
//!
//! Direct item and transaction operations, plus the two read-side checks
//! built on the log: reconciliation and stock alerts.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::aggregate;
use crate::domain::{
    InventoryItem, ItemFilter, ItemId, ItemKey, ItemPatch, LedgerError, NewItem,
    NewTransaction, StockStatus, TransactionFilter, TransactionId, TransactionListing,
    TransactionType,
};
use crate::error::Result;
use crate::port::outbound::ledger::LedgerStore;

/// Today's calendar date in local time.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A transaction submitted by id rather than through an action.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    pub inventory_id: ItemId,
    pub transaction_type: TransactionType,
    pub quantity: Decimal,
    pub cost: Decimal,
    pub notes: String,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
}

/// Snapshot quantity compared with the quantity the log implies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub inventory_id: ItemId,
    pub name: String,
    pub snapshot: Decimal,
    pub ledger: Decimal,
    /// `snapshot - ledger`.
    pub drift: Decimal,
}

impl Reconciliation {
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.drift.is_zero()
    }
}

/// Items that need attention.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryAlerts {
    /// At or below `min_quantity`, but not negative.
    pub low_stock: Vec<InventoryItem>,
    pub negative_stock: Vec<InventoryItem>,
    /// Expired or expiring within the configured window, soonest first.
    pub expiring: Vec<InventoryItem>,
}

impl InventoryAlerts {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.low_stock.is_empty() && self.negative_stock.is_empty() && self.expiring.is_empty()
    }
}

/// Item and transaction operations over a [`LedgerStore`].
pub struct InventoryService {
    ledger: Arc<dyn LedgerStore>,
}

impl InventoryService {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    /// Create an item, recording any opening stock as a purchase dated today.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank or duplicate name.
    pub fn create_item(&self, item: &NewItem) -> Result<InventoryItem> {
        let id = self.ledger.create_item(item, today())?;
        self.ledger.get_item(&ItemKey::Id(id))
    }

    /// # Errors
    ///
    /// `NotFound` when no item matches.
    pub fn get_item(&self, key: &ItemKey) -> Result<InventoryItem> {
        self.ledger.get_item(key)
    }

    pub fn list_items(&self, filter: &ItemFilter) -> Result<Vec<InventoryItem>> {
        self.ledger.list_items(filter)
    }

    /// Apply a field update; a quantity change is logged as a
    /// compensating transaction dated today.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Validation`.
    pub fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<InventoryItem> {
        if let Some(tx) = self.ledger.update_item(id, patch, today())? {
            debug!(id = %id, transaction = %tx, "Quantity edit logged as compensation");
        }
        self.ledger.get_item(&ItemKey::Id(id))
    }

    /// Delete an item and its history, returning the removed transaction count.
    ///
    /// # Errors
    ///
    /// `NotFound` when the item does not exist.
    pub fn delete_item(&self, id: ItemId) -> Result<usize> {
        self.ledger.delete_item(id)
    }

    /// Record a transaction against an item id.
    ///
    /// # Errors
    ///
    /// `Referential` when the item does not exist, `Validation` for
    /// negative amounts.
    pub fn record_transaction(&self, request: &TransactionRequest) -> Result<TransactionId> {
        let tx = NewTransaction::new(
            request.inventory_id,
            request.transaction_type,
            request.quantity,
            request.date.unwrap_or_else(today),
        )
        .with_cost(request.cost)
        .with_notes(request.notes.clone());
        self.ledger.append_transaction(&tx)
    }

    /// Transactions matching `filter` with per-type totals.
    pub fn list_transactions(&self, filter: &TransactionFilter) -> Result<TransactionListing> {
        Ok(TransactionListing::new(self.ledger.list_transactions(filter)?))
    }

    /// Replay the log for every item and compare with its snapshot.
    pub fn reconcile(&self) -> Result<Vec<Reconciliation>> {
        let items = self.ledger.list_items(&ItemFilter::default())?;
        let transactions = self.ledger.list_transactions(&TransactionFilter::default())?;

        let mut by_item: HashMap<ItemId, Vec<_>> = HashMap::new();
        for tx in &transactions {
            by_item.entry(tx.inventory_id).or_default().push(tx);
        }

        let report: Vec<Reconciliation> = items
            .into_iter()
            .map(|item| {
                let ledger = aggregate::ledger_quantity(
                    by_item.get(&item.id).into_iter().flatten().copied(),
                );
                Reconciliation {
                    inventory_id: item.id,
                    drift: item.current_quantity - ledger,
                    snapshot: item.current_quantity,
                    ledger,
                    name: item.name,
                }
            })
            .collect();

        for row in report.iter().filter(|r| !r.is_consistent()) {
            warn!(id = %row.inventory_id, name = %row.name, drift = %row.drift, "Snapshot drifted from ledger");
        }
        Ok(report)
    }

    /// Stock alerts as of today.
    pub fn alerts(&self, expiring_within_days: u32) -> Result<InventoryAlerts> {
        self.alerts_on(today(), expiring_within_days)
    }

    /// Stock alerts as of `today`.
    pub fn alerts_on(&self, today: NaiveDate, expiring_within_days: u32) -> Result<InventoryAlerts> {
        let mut alerts = InventoryAlerts::default();
        for item in self.ledger.list_items(&ItemFilter::default())? {
            if item.expires_within(today, expiring_within_days) {
                alerts.expiring.push(item.clone());
            }
            match item.stock_status() {
                StockStatus::Negative => alerts.negative_stock.push(item),
                StockStatus::Low => alerts.low_stock.push(item),
                StockStatus::Normal | StockStatus::Overstocked => {}
            }
        }
        alerts.expiring.sort_by_key(|item| item.expiration_date);
        Ok(alerts)
    }

    /// Resolve a name to an item, failing with `NotFound`.
    pub(crate) fn by_name(&self, name: &str) -> Result<InventoryItem> {
        self.ledger
            .find_item(&ItemKey::Name(name.trim().to_string()))?
            .ok_or_else(|| LedgerError::not_found("inventory item", name.trim()).into())
    }
}
