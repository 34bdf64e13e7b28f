//! Inventory transaction log types.
//!
//! A transaction row is immutable once appended. Corrections are made by
//! appending a compensating transaction, never by editing a row.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregate;
use super::error::LedgerError;
use super::id::{ItemId, TransactionId};

/// Kind of stock movement recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Stock received. Adds to quantity and updates cost basis.
    Purchase,
    /// Stock consumed in the kitchen.
    Usage,
    /// Stock thrown away.
    Waste,
    /// Stock given away.
    Donation,
}

impl TransactionType {
    /// Every transaction type, in display order.
    pub const ALL: [TransactionType; 4] = [
        TransactionType::Purchase,
        TransactionType::Usage,
        TransactionType::Waste,
        TransactionType::Donation,
    ];

    /// Stored and wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TransactionType::Purchase => "purchase",
            TransactionType::Usage => "usage",
            TransactionType::Waste => "waste",
            TransactionType::Donation => "donation",
        }
    }

    /// Whether this type increases stock.
    #[must_use]
    pub const fn is_inbound(self) -> bool {
        matches!(self, TransactionType::Purchase)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "purchase" => Ok(TransactionType::Purchase),
            "usage" => Ok(TransactionType::Usage),
            "waste" => Ok(TransactionType::Waste),
            "donation" => Ok(TransactionType::Donation),
            other => Err(LedgerError::validation(
                "transaction_type",
                format!("'{other}' is not one of purchase, usage, waste, donation"),
            )),
        }
    }
}

/// One immutable row of the transaction log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryTransaction {
    pub id: TransactionId,
    pub inventory_id: ItemId,
    pub transaction_type: TransactionType,
    /// Quantity as recorded; the sign of its effect comes from the type.
    pub quantity: Decimal,
    /// Total cost of the movement, not per unit.
    pub cost: Decimal,
    pub notes: String,
    /// Business date of the movement.
    pub date: NaiveDate,
    /// Insertion time, distinct from `date`.
    pub created_at: DateTime<Utc>,
}

impl InventoryTransaction {
    /// Quantity with the sign of its effect on stock.
    #[must_use]
    pub fn signed_quantity(&self) -> Decimal {
        aggregate::signed_quantity(self.transaction_type, self.quantity)
    }
}

/// A transaction waiting to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub inventory_id: ItemId,
    pub transaction_type: TransactionType,
    pub quantity: Decimal,
    pub cost: Decimal,
    pub notes: String,
    pub date: NaiveDate,
}

impl NewTransaction {
    /// Build a transaction with zero cost and no notes.
    #[must_use]
    pub fn new(
        inventory_id: ItemId,
        transaction_type: TransactionType,
        quantity: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            inventory_id,
            transaction_type,
            quantity,
            cost: Decimal::ZERO,
            notes: String::new(),
            date,
        }
    }

    /// Set the total cost.
    #[must_use]
    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.cost = cost;
        self
    }

    /// Set the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Reject negative quantities and costs, and purchases whose unit cost
    /// cannot be represented.
    ///
    /// # Errors
    /// Returns [`LedgerError::Validation`] naming the offending field.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.quantity < Decimal::ZERO {
            return Err(LedgerError::validation(
                "quantity",
                format!("must not be negative, got {}", self.quantity),
            ));
        }
        if self.cost < Decimal::ZERO {
            return Err(LedgerError::validation(
                "cost",
                format!("must not be negative, got {}", self.cost),
            ));
        }
        aggregate::effect_of(self)?;
        Ok(())
    }
}

/// Filter for transaction log queries. Empty means everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub inventory_id: Option<ItemId>,
    pub transaction_type: Option<TransactionType>,
    /// Inclusive lower bound on `date`.
    pub since: Option<NaiveDate>,
    /// Inclusive upper bound on `date`.
    pub until: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Only transactions for one item.
    #[must_use]
    pub fn for_item(inventory_id: ItemId) -> Self {
        Self {
            inventory_id: Some(inventory_id),
            ..Self::default()
        }
    }

    /// Only transactions dated within `since..=until`.
    #[must_use]
    pub fn between(since: NaiveDate, until: NaiveDate) -> Self {
        Self {
            since: Some(since),
            until: Some(until),
            ..Self::default()
        }
    }
}

/// Per-type totals over a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeSummary {
    pub count: usize,
    pub total_quantity: Decimal,
    pub total_cost: Decimal,
}

/// Transactions plus their per-type summary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionListing {
    pub transactions: Vec<InventoryTransaction>,
    pub summary_by_type: BTreeMap<TransactionType, TypeSummary>,
}

impl TransactionListing {
    /// Summarize the given transactions. Every type appears, zero-filled.
    #[must_use]
    pub fn new(transactions: Vec<InventoryTransaction>) -> Self {
        let mut summary_by_type: BTreeMap<TransactionType, TypeSummary> = TransactionType::ALL
            .into_iter()
            .map(|kind| (kind, TypeSummary::default()))
            .collect();

        for tx in &transactions {
            let entry = summary_by_type.entry(tx.transaction_type).or_default();
            entry.count += 1;
            entry.total_quantity += tx.quantity;
            entry.total_cost += tx.cost;
        }

        Self {
            transactions,
            summary_by_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tx(kind: TransactionType, quantity: Decimal, cost: Decimal) -> InventoryTransaction {
        InventoryTransaction {
            id: TransactionId::new(1),
            inventory_id: ItemId::new(1),
            transaction_type: kind,
            quantity,
            cost,
            notes: String::new(),
            date: date("2026-03-01"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn parses_types_case_insensitively() {
        assert_eq!(
            "Waste".parse::<TransactionType>().unwrap(),
            TransactionType::Waste
        );
        assert_eq!(
            " purchase ".parse::<TransactionType>().unwrap(),
            TransactionType::Purchase
        );
    }

    #[test]
    fn rejects_unknown_type() {
        let err = "theft".parse::<TransactionType>().unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation {
                field: "transaction_type",
                ..
            }
        ));
    }

    #[test]
    fn type_serializes_lowercase() {
        let json = serde_json::to_string(&TransactionType::Donation).unwrap();
        assert_eq!(json, "\"donation\"");
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let new = NewTransaction::new(
            ItemId::new(1),
            TransactionType::Usage,
            dec!(-2),
            date("2026-03-01"),
        );
        assert!(matches!(
            new.validate(),
            Err(LedgerError::Validation {
                field: "quantity",
                ..
            })
        ));
    }

    #[test]
    fn zero_quantity_is_allowed() {
        let new = NewTransaction::new(
            ItemId::new(1),
            TransactionType::Purchase,
            Decimal::ZERO,
            date("2026-03-01"),
        );
        assert!(new.validate().is_ok());
    }

    #[test]
    fn listing_summary_is_zero_filled() {
        let listing = TransactionListing::new(vec![]);
        assert_eq!(listing.summary_by_type.len(), 4);
        assert!(listing
            .summary_by_type
            .values()
            .all(|s| s.count == 0 && s.total_quantity.is_zero()));
    }

    #[test]
    fn listing_summary_totals_by_type() {
        let listing = TransactionListing::new(vec![
            tx(TransactionType::Purchase, dec!(10), dec!(25)),
            tx(TransactionType::Waste, dec!(1.5), Decimal::ZERO),
            tx(TransactionType::Waste, dec!(0.5), Decimal::ZERO),
        ]);

        let waste = &listing.summary_by_type[&TransactionType::Waste];
        assert_eq!(waste.count, 2);
        assert_eq!(waste.total_quantity, dec!(2.0));

        let purchase = &listing.summary_by_type[&TransactionType::Purchase];
        assert_eq!(purchase.total_cost, dec!(25));
    }
}
