//! Ledger persistence port.
//!
//! The store owns durable storage of item snapshots and the transaction
//! log. Every write that touches both runs as one atomic unit, so a reader
//! never sees a log row without its snapshot update or the reverse.

use chrono::NaiveDate;

use crate::domain::{
    InventoryItem, InventoryTransaction, ItemFilter, ItemId, ItemKey, ItemPatch, NewItem,
    NewTransaction, TransactionFilter, TransactionId,
};
use crate::error::Result;

/// Storage operations for the inventory ledger.
pub trait LedgerStore: Send + Sync {
    /// Insert a new item.
    ///
    /// A positive opening quantity is recorded as a `purchase` dated
    /// `opening_date` in the same unit of work, so the snapshot never holds
    /// stock the log does not explain.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank name or a name already in use.
    fn create_item(&self, item: &NewItem, opening_date: NaiveDate) -> Result<ItemId>;

    /// Look up an item, returning `None` if absent.
    fn find_item(&self, key: &ItemKey) -> Result<Option<InventoryItem>>;

    /// Look up an item by id or case-insensitive name.
    ///
    /// # Errors
    ///
    /// `NotFound` when no item matches.
    fn get_item(&self, key: &ItemKey) -> Result<InventoryItem> {
        self.find_item(key)?.ok_or_else(|| {
            crate::domain::LedgerError::not_found("inventory item", key).into()
        })
    }

    /// List items ordered by name.
    fn list_items(&self, filter: &ItemFilter) -> Result<Vec<InventoryItem>>;

    /// Append a transaction and apply its effect to the item snapshot.
    ///
    /// # Errors
    ///
    /// `Referential` if the item does not exist; nothing is written.
    fn append_transaction(&self, tx: &NewTransaction) -> Result<TransactionId>;

    /// Update mutable item fields, bumping `updated_at`.
    ///
    /// A changed `current_quantity` is written as a compensating
    /// transaction dated `date`, whose id is returned.
    ///
    /// # Errors
    ///
    /// `NotFound` if the item does not exist.
    fn update_item(
        &self,
        id: ItemId,
        patch: &ItemPatch,
        date: NaiveDate,
    ) -> Result<Option<TransactionId>>;

    /// Delete an item together with its transaction history.
    ///
    /// Returns the number of transaction rows removed.
    ///
    /// # Errors
    ///
    /// `NotFound` if the item does not exist.
    fn delete_item(&self, id: ItemId) -> Result<usize>;

    /// List transactions, newest first by `date`, then `created_at`.
    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<InventoryTransaction>>;
}
