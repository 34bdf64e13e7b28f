//! Inventory aggregation rules.
//!
//! This module is the single authority for turning a transaction into a
//! change of the item snapshot:
//!
//! | type     | `current_quantity` | cost fields                                        |
//! |----------|--------------------|----------------------------------------------------|
//! | purchase | `+= quantity`      | `cost_per_unit := cost / quantity` if quantity > 0; `total_cost += cost` |
//! | usage    | `-= quantity`      | unchanged                                          |
//! | waste    | `-= quantity`      | unchanged                                          |
//! | donation | `-= quantity`      | unchanged                                          |
//!
//! A purchase with a zero quantity leaves `cost_per_unit` untouched.
//! Arithmetic is checked: values that would overflow the decimal range are
//! rejected as [`LedgerError::Validation`] instead of being applied.
//! Outbound movements may drive the quantity below zero; that is kept, not
//! clamped, and reported through [`StockLevels::is_negative`].

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::item::InventoryItem;
use super::transaction::{InventoryTransaction, NewTransaction, TransactionType};

/// Quantity with the sign of its effect on stock.
#[must_use]
pub fn signed_quantity(transaction_type: TransactionType, quantity: Decimal) -> Decimal {
    if transaction_type.is_inbound() {
        quantity
    } else {
        -quantity
    }
}

/// Change to apply to a snapshot for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotDelta {
    /// Signed change of `current_quantity`.
    pub quantity: Decimal,
    /// Replacement `cost_per_unit`, if the transaction sets one.
    pub cost_per_unit: Option<Decimal>,
    /// Addition to `total_cost`.
    pub total_cost: Decimal,
}

/// Compute the snapshot change for a transaction.
///
/// # Errors
/// Returns [`LedgerError::Validation`] on `quantity` when the unit cost of a
/// purchase is outside the decimal range.
pub fn effect(transaction_type: TransactionType, quantity: Decimal, cost: Decimal) -> Result<SnapshotDelta, LedgerError> {
    match transaction_type {
        TransactionType::Purchase => {
            let cost_per_unit = if quantity > Decimal::ZERO {
                Some(unit_cost(cost, quantity)?)
            } else {
                None
            };
            Ok(SnapshotDelta {
                quantity,
                cost_per_unit,
                total_cost: cost,
            })
        }
        TransactionType::Usage | TransactionType::Waste | TransactionType::Donation => {
            Ok(SnapshotDelta {
                quantity: -quantity,
                cost_per_unit: None,
                total_cost: Decimal::ZERO,
            })
        }
    }
}

/// Snapshot change for a pending append.
///
/// # Errors
/// See [`effect`].
pub fn effect_of(tx: &NewTransaction) -> Result<SnapshotDelta, LedgerError> {
    effect(tx.transaction_type, tx.quantity, tx.cost)
}

/// `cost / quantity`, rejecting results outside the decimal range.
///
/// # Errors
/// Returns [`LedgerError::Validation`] on `quantity`.
pub fn unit_cost(cost: Decimal, quantity: Decimal) -> Result<Decimal, LedgerError> {
    cost.checked_div(quantity).ok_or_else(|| {
        LedgerError::validation(
            "quantity",
            format!("{quantity} is too small to price a cost of {cost}"),
        )
    })
}

/// `quantity * per_unit`, rejecting results outside the decimal range.
///
/// # Errors
/// Returns [`LedgerError::Validation`] on `cost`.
pub fn extended_cost(quantity: Decimal, per_unit: Decimal) -> Result<Decimal, LedgerError> {
    quantity.checked_mul(per_unit).ok_or_else(|| {
        LedgerError::validation(
            "cost",
            format!("{quantity} at {per_unit} per unit is out of range"),
        )
    })
}

/// The derived fields of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StockLevels {
    pub current_quantity: Decimal,
    pub cost_per_unit: Decimal,
    pub total_cost: Decimal,
}

impl StockLevels {
    /// Apply a delta in place. On error the levels are left unchanged.
    ///
    /// # Errors
    /// Returns [`LedgerError::Validation`] when a running total would leave
    /// the decimal range.
    pub fn apply(&mut self, delta: SnapshotDelta) -> Result<(), LedgerError> {
        let current_quantity = self
            .current_quantity
            .checked_add(delta.quantity)
            .ok_or_else(|| LedgerError::validation("quantity", "stock level out of range"))?;
        let total_cost = self
            .total_cost
            .checked_add(delta.total_cost)
            .ok_or_else(|| LedgerError::validation("cost", "total cost out of range"))?;

        self.current_quantity = current_quantity;
        if let Some(cost_per_unit) = delta.cost_per_unit {
            self.cost_per_unit = cost_per_unit;
        }
        self.total_cost = total_cost;
        Ok(())
    }

    /// Whether stock has gone below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.current_quantity < Decimal::ZERO
    }
}

impl From<&InventoryItem> for StockLevels {
    fn from(item: &InventoryItem) -> Self {
        Self {
            current_quantity: item.current_quantity,
            cost_per_unit: item.cost_per_unit,
            total_cost: item.total_cost,
        }
    }
}

/// Transaction that reconciles the log with a direct quantity edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compensation {
    pub transaction_type: TransactionType,
    /// Unsigned quantity as it will be recorded.
    pub quantity: Decimal,
    /// Total cost of the movement.
    pub cost: Decimal,
}

/// Compensating transaction for moving `levels` to `new_quantity`.
///
/// A positive delta becomes a `purchase` valued at the current
/// `cost_per_unit`, which leaves the cost basis unchanged; a negative delta
/// becomes a zero-cost `usage`. Returns `None` when nothing changes.
///
/// # Errors
/// Returns [`LedgerError::Validation`] when the delta or its value is out of
/// the decimal range.
pub fn compensation(
    levels: &StockLevels,
    new_quantity: Decimal,
) -> Result<Option<Compensation>, LedgerError> {
    let delta = new_quantity
        .checked_sub(levels.current_quantity)
        .ok_or_else(|| LedgerError::validation("current_quantity", "change out of range"))?;
    if delta.is_zero() {
        return Ok(None);
    }
    let comp = if delta > Decimal::ZERO {
        Compensation {
            transaction_type: TransactionType::Purchase,
            quantity: delta,
            cost: extended_cost(delta, levels.cost_per_unit)?,
        }
    } else {
        Compensation {
            transaction_type: TransactionType::Usage,
            quantity: -delta,
            cost: Decimal::ZERO,
        }
    };
    Ok(Some(comp))
}

/// Quantity implied by replaying a set of transactions from zero.
pub fn ledger_quantity<'a>(transactions: impl IntoIterator<Item = &'a InventoryTransaction>) -> Decimal {
    transactions
        .into_iter()
        .map(InventoryTransaction::signed_quantity)
        .sum()
}
