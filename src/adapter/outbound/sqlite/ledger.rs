//! SQLite inventory ledger.
//!
//! Implements [`LedgerStore`] on top of the `inventory` and
//! `inventory_transactions` tables. Every write that touches the log and
//! the snapshot runs inside one `BEGIN IMMEDIATE` transaction, so the
//! write lock is taken before the snapshot is read.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::adapter::outbound::sqlite::database::connection::{checkout, DbConnection, DbPool};
use crate::adapter::outbound::sqlite::database::model::{
    timestamp, ItemChangeset, ItemRow, NewItemRow, NewTransactionRow, TransactionRow,
};
use crate::adapter::outbound::sqlite::database::schema::{inventory, inventory_transactions};
use crate::domain::aggregate::{self, StockLevels};
use crate::domain::{
    InventoryItem, InventoryTransaction, ItemFilter, ItemId, ItemKey, ItemPatch, LedgerError,
    NewItem, NewTransaction, TransactionFilter, TransactionId, TransactionType,
};
use crate::error::{Error, Result};
use crate::port::outbound::ledger::LedgerStore;

/// Note attached to the purchase that records opening stock.
const OPENING_STOCK_NOTE: &str = "Opening stock";

/// Note attached to compensating transactions from direct quantity edits.
const ADJUSTMENT_NOTE: &str = "Quantity adjustment";

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    #[diesel(column_name = "id")]
    id: i32,
}

fn last_insert_rowid(conn: &mut SqliteConnection) -> Result<i32> {
    let row = diesel::sql_query("SELECT last_insert_rowid() AS id")
        .get_result::<LastInsertRowId>(conn)?;
    Ok(row.id)
}

fn load_item(conn: &mut SqliteConnection, id: ItemId) -> Result<Option<InventoryItem>> {
    inventory::table
        .find(id.get())
        .select(ItemRow::as_select())
        .first::<ItemRow>(conn)
        .optional()?
        .map(InventoryItem::try_from)
        .transpose()
}

fn name_taken(conn: &mut SqliteConnection, name: &str, except: Option<ItemId>) -> Result<bool> {
    let mut query = inventory::table
        .filter(inventory::name.eq(name))
        .select(inventory::id)
        .into_boxed();
    if let Some(id) = except {
        query = query.filter(inventory::id.ne(id.get()));
    }
    Ok(query.first::<i32>(conn).optional()?.is_some())
}

/// Append a log row and write the resulting snapshot levels.
fn append_and_apply(
    conn: &mut SqliteConnection,
    mut levels: StockLevels,
    tx: &NewTransaction,
    now: DateTime<Utc>,
) -> Result<TransactionId> {
    diesel::insert_into(inventory_transactions::table)
        .values(&NewTransactionRow::new(tx, now))
        .execute(conn)?;
    let id = TransactionId::new(last_insert_rowid(conn)?);

    levels.apply(aggregate::effect_of(tx)?)?;
    diesel::update(inventory::table.find(tx.inventory_id.get()))
        .set((
            inventory::current_quantity.eq(levels.current_quantity.to_string()),
            inventory::cost_per_unit.eq(levels.cost_per_unit.to_string()),
            inventory::total_cost.eq(levels.total_cost.to_string()),
            inventory::updated_at.eq(timestamp(now)),
        ))
        .execute(conn)?;

    if levels.is_negative() {
        warn!(
            inventory_id = %tx.inventory_id,
            quantity = %levels.current_quantity,
            "Stock went negative"
        );
    }
    debug!(
        id = %id,
        inventory_id = %tx.inventory_id,
        kind = %tx.transaction_type,
        quantity = %tx.quantity,
        "Appended transaction"
    );
    Ok(id)
}

/// SQLite-backed inventory ledger.
pub struct SqliteLedger {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteLedger {
    /// Create a ledger over an already migrated pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConnection> {
        checkout(&self.pool)
    }
}

impl LedgerStore for SqliteLedger {
    fn create_item(&self, item: &NewItem, opening_date: NaiveDate) -> Result<ItemId> {
        item.validate()?;
        let now = Utc::now();
        let mut conn = self.conn()?;

        let id = conn.immediate_transaction::<_, Error, _>(|conn| {
            let name = item.name.trim();
            if name_taken(conn, name, None)? {
                return Err(LedgerError::validation(
                    "name",
                    format!("an item named '{name}' already exists"),
                )
                .into());
            }

            let row = NewItemRow::empty_stock(item, now);
            diesel::insert_into(inventory::table)
                .values(&row)
                .execute(conn)?;
            let id = ItemId::new(last_insert_rowid(conn)?);

            if item.current_quantity > Decimal::ZERO {
                let opening = NewTransaction::new(
                    id,
                    TransactionType::Purchase,
                    item.current_quantity,
                    opening_date,
                )
                .with_cost(item.opening_cost()?)
                .with_notes(OPENING_STOCK_NOTE);
                let levels = StockLevels {
                    cost_per_unit: item.cost_per_unit,
                    ..StockLevels::default()
                };
                append_and_apply(conn, levels, &opening, now)?;
            }
            Ok(id)
        })?;

        info!(id = %id, name = %item.name.trim(), "Created inventory item");
        Ok(id)
    }

    fn find_item(&self, key: &ItemKey) -> Result<Option<InventoryItem>> {
        let mut conn = self.conn()?;
        match key {
            ItemKey::Id(id) => load_item(&mut conn, *id),
            ItemKey::Name(name) => inventory::table
                .filter(inventory::name.eq(name.trim()))
                .select(ItemRow::as_select())
                .first::<ItemRow>(&mut conn)
                .optional()?
                .map(InventoryItem::try_from)
                .transpose(),
        }
    }

    fn list_items(&self, filter: &ItemFilter) -> Result<Vec<InventoryItem>> {
        let mut conn = self.conn()?;
        let mut query = inventory::table.select(ItemRow::as_select()).into_boxed();
        if let Some(category) = &filter.category {
            query = query.filter(inventory::category.eq(category.clone()));
        }
        if let Some(search) = &filter.search {
            query = query.filter(inventory::name.like(format!("%{}%", search.trim())));
        }

        let rows: Vec<ItemRow> = query
            .order((inventory::name.asc(), inventory::id.asc()))
            .load(&mut conn)?;
        rows.into_iter().map(InventoryItem::try_from).collect()
    }

    fn append_transaction(&self, tx: &NewTransaction) -> Result<TransactionId> {
        tx.validate()?;
        let now = Utc::now();
        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, Error, _>(|conn| {
            let item = load_item(conn, tx.inventory_id)?.ok_or(LedgerError::Referential {
                inventory_id: tx.inventory_id,
            })?;
            append_and_apply(conn, StockLevels::from(&item), tx, now)
        })
    }

    fn update_item(
        &self,
        id: ItemId,
        patch: &ItemPatch,
        date: NaiveDate,
    ) -> Result<Option<TransactionId>> {
        patch.validate()?;
        let now = Utc::now();
        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, Error, _>(|conn| {
            let item = load_item(conn, id)?
                .ok_or_else(|| LedgerError::not_found("inventory item", id))?;

            if let Some(name) = &patch.name {
                let name = name.trim();
                if name_taken(conn, name, Some(id))? {
                    return Err(LedgerError::validation(
                        "name",
                        format!("an item named '{name}' already exists"),
                    )
                    .into());
                }
            }

            diesel::update(inventory::table.find(id.get()))
                .set(&ItemChangeset::from_patch(patch, now))
                .execute(conn)?;

            let Some(new_quantity) = patch.current_quantity else {
                return Ok(None);
            };
            let mut levels = StockLevels::from(&item);
            if let Some(cost_per_unit) = patch.cost_per_unit {
                levels.cost_per_unit = cost_per_unit;
            }
            let Some(comp) = aggregate::compensation(&levels, new_quantity)? else {
                return Ok(None);
            };

            let tx = NewTransaction::new(id, comp.transaction_type, comp.quantity, date)
                .with_cost(comp.cost)
                .with_notes(ADJUSTMENT_NOTE);
            append_and_apply(conn, levels, &tx, now).map(Some)
        })
    }

    fn delete_item(&self, id: ItemId) -> Result<usize> {
        let mut conn = self.conn()?;

        let removed = conn.immediate_transaction::<_, Error, _>(|conn| {
            let exists = inventory::table
                .find(id.get())
                .select(inventory::id)
                .first::<i32>(conn)
                .optional()?;
            if exists.is_none() {
                return Err(LedgerError::not_found("inventory item", id).into());
            }

            let removed = diesel::delete(
                inventory_transactions::table
                    .filter(inventory_transactions::inventory_id.eq(id.get())),
            )
            .execute(conn)?;
            diesel::delete(inventory::table.find(id.get())).execute(conn)?;
            Ok(removed)
        })?;

        info!(id = %id, transactions = removed, "Deleted inventory item and its history");
        Ok(removed)
    }

    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<InventoryTransaction>> {
        let mut conn = self.conn()?;
        let mut query = inventory_transactions::table
            .select(TransactionRow::as_select())
            .into_boxed();

        if let Some(id) = filter.inventory_id {
            query = query.filter(inventory_transactions::inventory_id.eq(id.get()));
        }
        if let Some(kind) = filter.transaction_type {
            query = query.filter(inventory_transactions::transaction_type.eq(kind.as_str()));
        }
        if let Some(since) = filter.since {
            query = query.filter(inventory_transactions::date.ge(since.to_string()));
        }
        if let Some(until) = filter.until {
            query = query.filter(inventory_transactions::date.le(until.to_string()));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows: Vec<TransactionRow> = query
            .order((
                inventory_transactions::date.desc(),
                inventory_transactions::created_at.desc(),
                inventory_transactions::id.desc(),
            ))
            .load(&mut conn)?;
        rows.into_iter().map(InventoryTransaction::try_from).collect()
    }
}
