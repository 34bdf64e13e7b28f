//! Database model types for Diesel ORM.
//!
//! Decimals are stored as canonical decimal text, calendar dates as
//! `YYYY-MM-DD` and timestamps as RFC 3339 with microseconds. The
//! conversions below are the only place that knows this.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::schema::{demand_calculations, inventory, inventory_transactions};
use crate::domain::{
    CalculationId, DemandCalculation, DemandOutcome, DemandRequest, IngredientAnalysis,
    InventoryItem, InventoryTransaction, ItemId, ItemPatch, NewItem, NewTransaction,
    TransactionId, TransactionType,
};
use crate::error::{Error, Result};

/// Format a timestamp for storage.
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_decimal(column: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| Error::Parse(format!("{column} '{value}': {e}")))
}

fn parse_date(column: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| Error::Parse(format!("{column} '{value}': {e}")))
}

fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| Error::Parse(format!("{column} '{value}': {e}")))
}

/// Database row for an inventory item.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = inventory)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ItemRow {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub current_quantity: String,
    pub min_quantity: String,
    pub max_quantity: String,
    pub cost_per_unit: String,
    pub total_cost: String,
    pub supplier: String,
    pub expiration_date: Option<String>,
    pub storage_location: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ItemRow> for InventoryItem {
    type Error = Error;

    fn try_from(row: ItemRow) -> Result<Self> {
        Ok(Self {
            id: ItemId::new(row.id),
            current_quantity: parse_decimal("current_quantity", &row.current_quantity)?,
            min_quantity: parse_decimal("min_quantity", &row.min_quantity)?,
            max_quantity: parse_decimal("max_quantity", &row.max_quantity)?,
            cost_per_unit: parse_decimal("cost_per_unit", &row.cost_per_unit)?,
            total_cost: parse_decimal("total_cost", &row.total_cost)?,
            expiration_date: row
                .expiration_date
                .as_deref()
                .map(|d| parse_date("expiration_date", d))
                .transpose()?,
            created_at: parse_timestamp("created_at", &row.created_at)?,
            updated_at: parse_timestamp("updated_at", &row.updated_at)?,
            name: row.name,
            category: row.category,
            unit: row.unit,
            supplier: row.supplier,
            storage_location: row.storage_location,
            notes: row.notes,
        })
    }
}

/// Database row for an inventory item (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = inventory)]
pub struct NewItemRow {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub current_quantity: String,
    pub min_quantity: String,
    pub max_quantity: String,
    pub cost_per_unit: String,
    pub total_cost: String,
    pub supplier: String,
    pub expiration_date: Option<String>,
    pub storage_location: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl NewItemRow {
    /// Row for a new item with empty stock; opening stock is added by a
    /// purchase afterwards.
    #[must_use]
    pub fn empty_stock(item: &NewItem, now: DateTime<Utc>) -> Self {
        let now = timestamp(now);
        Self {
            name: item.name.trim().to_string(),
            category: item.category.clone(),
            unit: item.unit.clone(),
            current_quantity: Decimal::ZERO.to_string(),
            min_quantity: item.min_quantity.to_string(),
            max_quantity: item.max_quantity.to_string(),
            cost_per_unit: item.cost_per_unit.to_string(),
            total_cost: Decimal::ZERO.to_string(),
            supplier: item.supplier.clone(),
            expiration_date: item.expiration_date.map(|d| d.to_string()),
            storage_location: item.storage_location.clone(),
            notes: item.notes.clone(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Changes to an item's descriptive fields. `None` leaves a column as is.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = inventory)]
pub struct ItemChangeset {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub min_quantity: Option<String>,
    pub max_quantity: Option<String>,
    pub cost_per_unit: Option<String>,
    pub supplier: Option<String>,
    pub expiration_date: Option<String>,
    pub storage_location: Option<String>,
    pub notes: Option<String>,
    pub updated_at: Option<String>,
}

impl ItemChangeset {
    /// Changeset for every patch field except `current_quantity`.
    #[must_use]
    pub fn from_patch(patch: &ItemPatch, now: DateTime<Utc>) -> Self {
        Self {
            name: patch.name.as_ref().map(|n| n.trim().to_string()),
            category: patch.category.clone(),
            unit: patch.unit.clone(),
            min_quantity: patch.min_quantity.map(|q| q.to_string()),
            max_quantity: patch.max_quantity.map(|q| q.to_string()),
            cost_per_unit: patch.cost_per_unit.map(|c| c.to_string()),
            supplier: patch.supplier.clone(),
            expiration_date: patch.expiration_date.map(|d| d.to_string()),
            storage_location: patch.storage_location.clone(),
            notes: patch.notes.clone(),
            updated_at: Some(timestamp(now)),
        }
    }
}

/// Database row for a transaction.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = inventory_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionRow {
    pub id: i32,
    pub inventory_id: i32,
    pub transaction_type: String,
    pub quantity: String,
    pub cost: String,
    pub notes: String,
    pub date: String,
    pub created_at: String,
}

impl TryFrom<TransactionRow> for InventoryTransaction {
    type Error = Error;

    fn try_from(row: TransactionRow) -> Result<Self> {
        let transaction_type = TransactionType::from_str(&row.transaction_type)
            .map_err(|e| Error::Parse(e.to_string()))?;
        Ok(Self {
            id: TransactionId::new(row.id),
            inventory_id: ItemId::new(row.inventory_id),
            transaction_type,
            quantity: parse_decimal("quantity", &row.quantity)?,
            cost: parse_decimal("cost", &row.cost)?,
            date: parse_date("date", &row.date)?,
            created_at: parse_timestamp("created_at", &row.created_at)?,
            notes: row.notes,
        })
    }
}

/// Database row for a transaction (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = inventory_transactions)]
pub struct NewTransactionRow {
    pub inventory_id: i32,
    pub transaction_type: String,
    pub quantity: String,
    pub cost: String,
    pub notes: String,
    pub date: String,
    pub created_at: String,
}

impl NewTransactionRow {
    #[must_use]
    pub fn new(tx: &NewTransaction, now: DateTime<Utc>) -> Self {
        Self {
            inventory_id: tx.inventory_id.get(),
            transaction_type: tx.transaction_type.as_str().to_string(),
            quantity: tx.quantity.to_string(),
            cost: tx.cost.to_string(),
            notes: tx.notes.clone(),
            date: tx.date.to_string(),
            created_at: timestamp(now),
        }
    }
}

/// Database row for a demand calculation.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = demand_calculations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CalculationRow {
    pub id: i32,
    pub dish_name: String,
    pub dish_price: String,
    pub major_ingredients: String,
    pub category: String,
    pub cuisine: String,
    pub emailed_in_promotions: i32,
    pub featured_on_homepage: i32,
    pub discount_applied: i32,
    pub discount_percentage: String,
    pub city_name: String,
    pub center_type: String,
    pub predicted_orders: Option<i64>,
    pub final_price: String,
    pub total_price: Option<String>,
    pub discount_amount: String,
    pub ingredient_analysis: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<CalculationRow> for DemandCalculation {
    type Error = Error;

    fn try_from(row: CalculationRow) -> Result<Self> {
        let ingredient_analysis = row
            .ingredient_analysis
            .as_deref()
            .map(serde_json::from_str::<IngredientAnalysis>)
            .transpose()?;
        Ok(Self {
            id: CalculationId::new(row.id),
            request: DemandRequest {
                dish_price: parse_decimal("dish_price", &row.dish_price)?,
                emailed_in_promotions: row.emailed_in_promotions != 0,
                featured_on_homepage: row.featured_on_homepage != 0,
                discount_applied: row.discount_applied != 0,
                discount_percentage: parse_decimal(
                    "discount_percentage",
                    &row.discount_percentage,
                )?,
                dish_name: row.dish_name,
                major_ingredients: row.major_ingredients,
                category: row.category,
                cuisine: row.cuisine,
                city_name: row.city_name,
                center_type: row.center_type,
            },
            predicted_orders: row.predicted_orders,
            final_price: parse_decimal("final_price", &row.final_price)?,
            total_price: row
                .total_price
                .as_deref()
                .map(|p| parse_decimal("total_price", p))
                .transpose()?,
            discount_amount: parse_decimal("discount_amount", &row.discount_amount)?,
            ingredient_analysis,
            created_at: parse_timestamp("created_at", &row.created_at)?,
            updated_at: parse_timestamp("updated_at", &row.updated_at)?,
        })
    }
}

/// Database row for a demand calculation (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = demand_calculations)]
pub struct NewCalculationRow {
    pub dish_name: String,
    pub dish_price: String,
    pub major_ingredients: String,
    pub category: String,
    pub cuisine: String,
    pub emailed_in_promotions: i32,
    pub featured_on_homepage: i32,
    pub discount_applied: i32,
    pub discount_percentage: String,
    pub city_name: String,
    pub center_type: String,
    pub predicted_orders: Option<i64>,
    pub final_price: String,
    pub total_price: Option<String>,
    pub discount_amount: String,
    pub created_at: String,
    pub updated_at: String,
}

impl NewCalculationRow {
    #[must_use]
    pub fn new(request: &DemandRequest, outcome: &DemandOutcome, now: DateTime<Utc>) -> Self {
        let now = timestamp(now);
        Self {
            dish_name: request.dish_name.trim().to_string(),
            dish_price: request.dish_price.to_string(),
            major_ingredients: request.major_ingredients.clone(),
            category: request.category.clone(),
            cuisine: request.cuisine.clone(),
            emailed_in_promotions: i32::from(request.emailed_in_promotions),
            featured_on_homepage: i32::from(request.featured_on_homepage),
            discount_applied: i32::from(request.discount_applied),
            discount_percentage: request.discount_percentage.to_string(),
            city_name: request.city_name.clone(),
            center_type: request.center_type.clone(),
            predicted_orders: outcome.predicted_orders,
            final_price: outcome.final_price.to_string(),
            total_price: outcome.total_price.map(|p| p.to_string()),
            discount_amount: outcome.discount_amount.to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Derived columns rewritten by a recalculation.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = demand_calculations)]
#[diesel(treat_none_as_null = true)]
pub struct OutcomeChangeset {
    pub predicted_orders: Option<i64>,
    pub final_price: String,
    pub total_price: Option<String>,
    pub discount_amount: String,
    pub updated_at: String,
}

impl OutcomeChangeset {
    #[must_use]
    pub fn new(outcome: &DemandOutcome, now: DateTime<Utc>) -> Self {
        Self {
            predicted_orders: outcome.predicted_orders,
            final_price: outcome.final_price.to_string(),
            total_price: outcome.total_price.map(|p| p.to_string()),
            discount_amount: outcome.discount_amount.to_string(),
            updated_at: timestamp(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn timestamps_sort_lexically() {
        let early = DateTime::parse_from_rfc3339("2026-03-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let late = early + chrono::Duration::microseconds(5);
        assert!(timestamp(early) < timestamp(late));
        assert_eq!(timestamp(early), "2026-03-01T08:00:00.000000Z");
    }

    #[test]
    fn item_row_converts_to_domain() {
        let row = ItemRow {
            id: 4,
            name: "Flour".into(),
            category: "Baking".into(),
            unit: "kg".into(),
            current_quantity: "12.5".into(),
            min_quantity: "5".into(),
            max_quantity: "100".into(),
            cost_per_unit: "2.00".into(),
            total_cost: "25.00".into(),
            supplier: "Mill".into(),
            expiration_date: Some("2026-06-30".into()),
            storage_location: "Dry Storage".into(),
            notes: String::new(),
            created_at: "2026-03-01T08:00:00.000000Z".into(),
            updated_at: "2026-03-01T08:00:00.000000Z".into(),
        };

        let item = InventoryItem::try_from(row).unwrap();
        assert_eq!(item.id, ItemId::new(4));
        assert_eq!(item.current_quantity, dec!(12.5));
        assert_eq!(item.expiration_date, NaiveDate::from_ymd_opt(2026, 6, 30));
    }

    #[test]
    fn corrupt_decimal_is_parse_error() {
        let row = TransactionRow {
            id: 1,
            inventory_id: 1,
            transaction_type: "usage".into(),
            quantity: "lots".into(),
            cost: "0".into(),
            notes: String::new(),
            date: "2026-03-01".into(),
            created_at: "2026-03-01T08:00:00.000000Z".into(),
        };
        let err = InventoryTransaction::try_from(row).unwrap_err();
        assert!(matches!(err, Error::Parse(msg) if msg.contains("quantity")));
    }

    #[test]
    fn changeset_skips_quantity() {
        let patch = ItemPatch {
            supplier: Some("Local Farm".into()),
            current_quantity: Some(dec!(3)),
            ..ItemPatch::default()
        };
        let changes = ItemChangeset::from_patch(&patch, Utc::now());
        assert_eq!(changes.supplier.as_deref(), Some("Local Farm"));
        assert!(changes.name.is_none());
        assert!(changes.updated_at.is_some());
    }
}
