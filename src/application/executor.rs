//! Action executor.
//!
//! Validates structured actions and performs each one as a single logical
//! unit against the ledger. Failures never escape as errors: every action
//! produces an [`ActionResult`], and in a batch one failure leaves its
//! siblings alone.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::application::inventory::{today, InventoryService};
use crate::domain::action::{AddItem, DeleteItem, RecordTransaction, UpdateQuantity};
use crate::domain::{
    Action, ActionErrorKind, ActionResult, ItemKey, ItemPatch, NewTransaction, PendingAction,
    RawAction, TransactionType,
};
use crate::error::{Error, Result};
use crate::port::outbound::ledger::LedgerStore;

/// Note on purchases that restock an existing item through `add_item`.
const RESTOCK_NOTE: &str = "Restock";

/// Runs [`RawAction`]s against the ledger.
pub struct ActionExecutor {
    ledger: Arc<dyn LedgerStore>,
    inventory: InventoryService,
}

impl ActionExecutor {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self {
            inventory: InventoryService::new(Arc::clone(&ledger)),
            ledger,
        }
    }

    /// Execute one action dated today.
    pub fn execute(&self, raw: &RawAction) -> ActionResult {
        self.execute_on(raw, today())
    }

    /// Execute one action, dating any transaction it writes `today`.
    pub fn execute_on(&self, raw: &RawAction, today: NaiveDate) -> ActionResult {
        let action = match Action::decode(raw) {
            Ok(action) => action,
            Err(e) => {
                warn!(kind = %raw.kind, error = %e, "Rejected action");
                return ActionResult::failed(ActionErrorKind::from(&e), e.to_string());
            }
        };

        let missing = action.missing_fields();
        if !missing.is_empty() {
            debug!(kind = %action.kind(), missing = ?missing, "Action awaiting fields");
            return ActionResult::pending(PendingAction {
                action_type: action.kind(),
                data: raw.data.clone(),
                missing_fields: missing.into_iter().map(String::from).collect(),
            });
        }

        let kind = action.kind();
        match self.run(action, today) {
            Ok(result) => result,
            Err(e) => {
                warn!(kind = %kind, error = %e, "Action failed");
                ActionResult::failed(error_kind(&e), e.to_string())
            }
        }
    }

    /// Execute actions independently, in order.
    pub fn execute_batch(&self, actions: &[RawAction]) -> Vec<ActionResult> {
        let today = today();
        actions.iter().map(|raw| self.execute_on(raw, today)).collect()
    }

    /// Merge caller-supplied fields into a pending action and run it.
    pub fn complete(&self, pending: PendingAction, supplied: Map<String, Value>) -> ActionResult {
        self.execute(&pending.complete(supplied))
    }

    fn run(&self, action: Action, today: NaiveDate) -> Result<ActionResult> {
        match action {
            Action::AddItem(add) => self.add_item(&add, today),
            Action::UpdateQuantity(update) => self.update_quantity(&update, today),
            Action::RecordTransaction(record) => self.record_transaction(&record, today),
            Action::DeleteItem(delete) => self.delete_item(&delete),
        }
    }

    fn add_item(&self, add: &AddItem, today: NaiveDate) -> Result<ActionResult> {
        let name = add.name.trim();
        let Some(existing) = self.ledger.find_item(&ItemKey::Name(name.to_string()))? else {
            let id = self.ledger.create_item(&add.to_new_item()?, today)?;
            return Ok(ActionResult::completed(
                format!("Added {name} to inventory"),
                Some(id),
                None,
            ));
        };

        let quantity = add.quantity();
        if quantity <= Decimal::ZERO {
            return Ok(ActionResult::completed(
                format!("{} is already in inventory", existing.name),
                Some(existing.id),
                None,
            ));
        }

        let tx = NewTransaction::new(existing.id, TransactionType::Purchase, quantity, today)
            .with_cost(add.stock_cost()?)
            .with_notes(add.notes.clone().unwrap_or_else(|| RESTOCK_NOTE.to_string()));
        let tx_id = self.ledger.append_transaction(&tx)?;
        info!(id = %existing.id, name = %existing.name, quantity = %quantity, "Restocked existing item");
        Ok(ActionResult::completed(
            format!(
                "Added {quantity} {} to existing item {}",
                existing.unit, existing.name
            ),
            Some(existing.id),
            Some(tx_id),
        ))
    }

    fn update_quantity(&self, update: &UpdateQuantity, today: NaiveDate) -> Result<ActionResult> {
        let item = self.inventory.by_name(&update.name)?;
        let tx_id = self.ledger.update_item(
            item.id,
            &ItemPatch::quantity(update.new_quantity),
            today,
        )?;

        let message = if tx_id.is_some() {
            format!(
                "Updated {} from {} to {} {}",
                item.name, item.current_quantity, update.new_quantity, item.unit
            )
        } else {
            format!("{} already at {} {}", item.name, item.current_quantity, item.unit)
        };
        Ok(ActionResult::completed(message, Some(item.id), tx_id))
    }

    fn record_transaction(
        &self,
        record: &RecordTransaction,
        today: NaiveDate,
    ) -> Result<ActionResult> {
        let item = self.inventory.by_name(&record.name)?;
        let tx = NewTransaction::new(
            item.id,
            record.transaction_type,
            record.quantity,
            record.date.unwrap_or(today),
        )
        .with_cost(record.cost.unwrap_or(Decimal::ZERO))
        .with_notes(record.notes.clone().unwrap_or_default());
        let tx_id = self.ledger.append_transaction(&tx)?;

        Ok(ActionResult::completed(
            format!(
                "Recorded {} of {} {} {}",
                record.transaction_type, record.quantity, item.unit, item.name
            ),
            Some(item.id),
            Some(tx_id),
        ))
    }

    fn delete_item(&self, delete: &DeleteItem) -> Result<ActionResult> {
        let item = self.inventory.by_name(&delete.name)?;
        let removed = self.ledger.delete_item(item.id)?;
        Ok(ActionResult::completed(
            format!("Deleted {} and {removed} transactions", item.name),
            Some(item.id),
            None,
        ))
    }
}

fn error_kind(err: &Error) -> ActionErrorKind {
    err.as_ledger()
        .map_or(ActionErrorKind::Storage, ActionErrorKind::from)
}
