//! Inventory item snapshots.
//!
//! The snapshot is the mutable, current-state row for one item. Its
//! `current_quantity` is derived from the transaction log; see
//! [`super::aggregate`] for the rules that keep the two in step.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::aggregate;
use super::error::LedgerError;
use super::id::ItemId;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_UNIT: &str = "units";
pub const DEFAULT_SUPPLIER: &str = "Unknown";
pub const DEFAULT_STORAGE: &str = "Storage";
pub const DEFAULT_MIN_QUANTITY: Decimal = dec!(0);
pub const DEFAULT_MAX_QUANTITY: Decimal = dec!(100);

/// Current state of one inventory item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub unit: String,
    /// Signed; negative values are kept and surfaced as a data-quality signal.
    pub current_quantity: Decimal,
    pub min_quantity: Decimal,
    pub max_quantity: Decimal,
    pub cost_per_unit: Decimal,
    /// Cumulative spend on purchases.
    pub total_cost: Decimal,
    pub supplier: String,
    pub expiration_date: Option<NaiveDate>,
    pub storage_location: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Coarse stock classification used by alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Negative,
    Low,
    Normal,
    Overstocked,
}

impl InventoryItem {
    /// Classify the current quantity against the item's min/max levels.
    #[must_use]
    pub fn stock_status(&self) -> StockStatus {
        if self.current_quantity < Decimal::ZERO {
            StockStatus::Negative
        } else if self.current_quantity <= self.min_quantity {
            StockStatus::Low
        } else if self.max_quantity > Decimal::ZERO && self.current_quantity > self.max_quantity {
            StockStatus::Overstocked
        } else {
            StockStatus::Normal
        }
    }

    /// Whether the item expires on or before `today + days`.
    #[must_use]
    pub fn expires_within(&self, today: NaiveDate, days: u32) -> bool {
        match self.expiration_date {
            Some(expires) => (expires - today).num_days() <= i64::from(days),
            None => false,
        }
    }
}

/// Fields for a new item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub unit: String,
    /// Opening stock; recorded as a purchase when positive.
    pub current_quantity: Decimal,
    pub min_quantity: Decimal,
    pub max_quantity: Decimal,
    pub cost_per_unit: Decimal,
    /// Cost of the opening stock.
    pub total_cost: Decimal,
    pub supplier: String,
    pub expiration_date: Option<NaiveDate>,
    pub storage_location: String,
    pub notes: String,
}

impl NewItem {
    /// A new item with the documented defaults for everything but the name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: DEFAULT_CATEGORY.to_string(),
            unit: DEFAULT_UNIT.to_string(),
            current_quantity: Decimal::ZERO,
            min_quantity: DEFAULT_MIN_QUANTITY,
            max_quantity: DEFAULT_MAX_QUANTITY,
            cost_per_unit: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            supplier: DEFAULT_SUPPLIER.to_string(),
            expiration_date: None,
            storage_location: DEFAULT_STORAGE.to_string(),
            notes: String::new(),
        }
    }

    /// Cost attached to the opening purchase.
    ///
    /// Uses `total_cost` when set, otherwise `cost_per_unit * current_quantity`
    /// so a per-unit price alone does not get reset by a zero-cost purchase.
    ///
    /// # Errors
    /// Returns [`LedgerError::Validation`] when the product is out of range.
    pub fn opening_cost(&self) -> Result<Decimal, LedgerError> {
        if self.total_cost > Decimal::ZERO {
            Ok(self.total_cost)
        } else {
            aggregate::extended_cost(self.current_quantity, self.cost_per_unit)
        }
    }

    /// Check required fields.
    ///
    /// # Errors
    /// Returns [`LedgerError::Validation`] if the name is blank or a
    /// quantity bound is negative.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::validation("name", "must not be empty"));
        }
        if self.min_quantity < Decimal::ZERO {
            return Err(LedgerError::validation("min_quantity", "must not be negative"));
        }
        if self.max_quantity < Decimal::ZERO {
            return Err(LedgerError::validation("max_quantity", "must not be negative"));
        }
        if self.cost_per_unit < Decimal::ZERO || self.total_cost < Decimal::ZERO {
            return Err(LedgerError::validation("cost_per_unit", "must not be negative"));
        }
        Ok(())
    }
}

/// Partial update of an item's mutable fields.
///
/// A change to `current_quantity` is not written directly; the store turns
/// it into a compensating transaction so the log stays authoritative.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub current_quantity: Option<Decimal>,
    pub min_quantity: Option<Decimal>,
    pub max_quantity: Option<Decimal>,
    pub cost_per_unit: Option<Decimal>,
    pub supplier: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub storage_location: Option<String>,
    pub notes: Option<String>,
}

impl ItemPatch {
    /// Patch that only sets a new quantity.
    #[must_use]
    pub fn quantity(new_quantity: Decimal) -> Self {
        Self {
            current_quantity: Some(new_quantity),
            ..Self::default()
        }
    }

    /// Check the fields being set.
    ///
    /// # Errors
    /// Returns [`LedgerError::Validation`] for a blank name or a negative
    /// quantity, bound or price.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(LedgerError::validation("name", "must not be empty"));
            }
        }
        let numbers = [
            ("current_quantity", self.current_quantity),
            ("min_quantity", self.min_quantity),
            ("max_quantity", self.max_quantity),
            ("cost_per_unit", self.cost_per_unit),
        ];
        for (field, value) in numbers {
            if value.is_some_and(|v| v < Decimal::ZERO) {
                return Err(LedgerError::validation(field, "must not be negative"));
            }
        }
        Ok(())
    }
}

/// How an item is addressed by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKey {
    Id(ItemId),
    /// Case-insensitive name match.
    Name(String),
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKey::Id(id) => write!(f, "{id}"),
            ItemKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<ItemId> for ItemKey {
    fn from(id: ItemId) -> Self {
        ItemKey::Id(id)
    }
}

impl From<&str> for ItemKey {
    fn from(name: &str) -> Self {
        ItemKey::Name(name.to_string())
    }
}

/// Filter for item listings.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub category: Option<String>,
    /// Substring match on the name.
    pub search: Option<String>,
}
