//! SQLite demand calculation store.

use chrono::Utc;
use diesel::prelude::*;
use tracing::debug;

use crate::adapter::outbound::sqlite::database::connection::{checkout, DbConnection, DbPool};
use crate::adapter::outbound::sqlite::database::model::{
    timestamp, CalculationRow, NewCalculationRow, OutcomeChangeset,
};
use crate::adapter::outbound::sqlite::database::schema::demand_calculations;
use crate::domain::{
    CalculationId, DemandCalculation, DemandOutcome, DemandRequest, IngredientAnalysis,
    LedgerError,
};
use crate::error::{Error, Result};
use crate::port::outbound::demand::DemandStore;

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    #[diesel(column_name = "id")]
    id: i32,
}

fn not_found(id: CalculationId) -> Error {
    LedgerError::not_found("demand calculation", id).into()
}

/// Fail with `NotFound` when an update or delete touched no row.
fn expect_row(affected: usize, id: CalculationId) -> Result<()> {
    if affected == 0 {
        Err(not_found(id))
    } else {
        Ok(())
    }
}

/// SQLite-backed demand calculation history.
pub struct SqliteDemandStore {
    pool: DbPool,
}

impl SqliteDemandStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConnection> {
        checkout(&self.pool)
    }
}

impl DemandStore for SqliteDemandStore {
    fn insert(&self, request: &DemandRequest, outcome: &DemandOutcome) -> Result<CalculationId> {
        request.validate()?;
        let row = NewCalculationRow::new(request, outcome, Utc::now());
        let mut conn = self.conn()?;

        let id = conn.transaction::<_, Error, _>(|conn| {
            diesel::insert_into(demand_calculations::table)
                .values(&row)
                .execute(conn)?;
            let row = diesel::sql_query("SELECT last_insert_rowid() AS id")
                .get_result::<LastInsertRowId>(conn)?;
            Ok(CalculationId::new(row.id))
        })?;

        debug!(id = %id, dish = %row.dish_name, "Stored demand calculation");
        Ok(id)
    }

    fn get(&self, id: CalculationId) -> Result<DemandCalculation> {
        let mut conn = self.conn()?;
        demand_calculations::table
            .find(id.get())
            .select(CalculationRow::as_select())
            .first::<CalculationRow>(&mut conn)
            .optional()?
            .ok_or_else(|| not_found(id))
            .and_then(DemandCalculation::try_from)
    }

    fn list(&self, limit: Option<usize>) -> Result<Vec<DemandCalculation>> {
        let mut conn = self.conn()?;
        let mut query = demand_calculations::table
            .select(CalculationRow::as_select())
            .order((
                demand_calculations::created_at.desc(),
                demand_calculations::id.desc(),
            ))
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows: Vec<CalculationRow> = query.load(&mut conn)?;
        rows.into_iter().map(DemandCalculation::try_from).collect()
    }

    fn update_outcome(&self, id: CalculationId, outcome: &DemandOutcome) -> Result<()> {
        let mut conn = self.conn()?;
        let affected = diesel::update(demand_calculations::table.find(id.get()))
            .set(&OutcomeChangeset::new(outcome, Utc::now()))
            .execute(&mut conn)?;
        expect_row(affected, id)
    }

    fn set_ingredient_analysis(
        &self,
        id: CalculationId,
        analysis: &IngredientAnalysis,
    ) -> Result<()> {
        let json = serde_json::to_string(analysis)?;
        let mut conn = self.conn()?;
        let affected = diesel::update(demand_calculations::table.find(id.get()))
            .set((
                demand_calculations::ingredient_analysis.eq(Some(json)),
                demand_calculations::updated_at.eq(timestamp(Utc::now())),
            ))
            .execute(&mut conn)?;
        expect_row(affected, id)
    }

    fn delete(&self, id: CalculationId) -> Result<()> {
        let mut conn = self.conn()?;
        let affected =
            diesel::delete(demand_calculations::table.find(id.get())).execute(&mut conn)?;
        expect_row(affected, id)
    }
}
