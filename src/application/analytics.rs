//! Analytics engine.
//!
//! Read-only views over the transaction log. Each view loads the rows in
//! the ten-week window and hands them to the pure functions in
//! [`crate::domain::analytics`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::inventory::today;
use crate::domain::analytics::{self as rules, window_start};
use crate::domain::{
    InventoryItem, InventoryTransaction, ItemFilter, ItemId, ShareBreakdown, TransactionFilter,
    WasteCostWeek, WastedItem, WeeklyTrend,
};
use crate::error::Result;
use crate::port::outbound::ledger::LedgerStore;

/// Default length of the most-wasted ranking.
pub const DEFAULT_MOST_WASTED_LIMIT: usize = 10;

/// Every view at once, computed from a single read of the log.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub today: NaiveDate,
    pub weekly_trends: Vec<WeeklyTrend>,
    pub waste_cost: Vec<WasteCostWeek>,
    pub this_week: ShareBreakdown,
    pub most_wasted: Vec<WastedItem>,
}

/// Computes rolling-window analytics from a [`LedgerStore`].
pub struct AnalyticsEngine {
    ledger: Arc<dyn LedgerStore>,
}

impl AnalyticsEngine {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    fn window(&self, today: NaiveDate) -> Result<Vec<InventoryTransaction>> {
        self.ledger
            .list_transactions(&TransactionFilter::between(window_start(today), today))
    }

    fn items(&self) -> Result<Vec<InventoryItem>> {
        self.ledger.list_items(&ItemFilter::default())
    }

    /// Ten weekly entries, oldest first.
    pub fn weekly_trends(&self) -> Result<Vec<WeeklyTrend>> {
        self.weekly_trends_on(today())
    }

    pub fn weekly_trends_on(&self, today: NaiveDate) -> Result<Vec<WeeklyTrend>> {
        Ok(rules::weekly_trends(today, &self.window(today)?))
    }

    /// Money wasted per week at current unit costs, oldest first.
    pub fn waste_cost_per_week(&self) -> Result<Vec<WasteCostWeek>> {
        self.waste_cost_per_week_on(today())
    }

    pub fn waste_cost_per_week_on(&self, today: NaiveDate) -> Result<Vec<WasteCostWeek>> {
        let costs = unit_costs(&self.items()?);
        Ok(rules::waste_cost_per_week(today, &self.window(today)?, &costs))
    }

    /// Usage, waste and donation shares for the current week.
    pub fn this_week_share(&self) -> Result<ShareBreakdown> {
        self.this_week_share_on(today())
    }

    pub fn this_week_share_on(&self, today: NaiveDate) -> Result<ShareBreakdown> {
        Ok(rules::this_week_share(today, &self.window(today)?))
    }

    /// Items with the most waste this week.
    pub fn most_wasted(&self, limit: usize) -> Result<Vec<WastedItem>> {
        self.most_wasted_on(today(), limit)
    }

    pub fn most_wasted_on(&self, today: NaiveDate, limit: usize) -> Result<Vec<WastedItem>> {
        Ok(rules::most_wasted(today, &self.window(today)?, &self.items()?, limit))
    }

    /// All views as of `today`.
    pub fn summary_on(&self, today: NaiveDate, most_wasted_limit: usize) -> Result<AnalyticsSummary> {
        let transactions = self.window(today)?;
        let items = self.items()?;
        Ok(AnalyticsSummary {
            today,
            weekly_trends: rules::weekly_trends(today, &transactions),
            waste_cost: rules::waste_cost_per_week(today, &transactions, &unit_costs(&items)),
            this_week: rules::this_week_share(today, &transactions),
            most_wasted: rules::most_wasted(today, &transactions, &items, most_wasted_limit),
        })
    }
}

fn unit_costs(items: &[InventoryItem]) -> HashMap<ItemId, Decimal> {
    items.iter().map(|item| (item.id, item.cost_per_unit)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::memory_pool;
    use crate::adapter::outbound::sqlite::SqliteLedger;
    use crate::domain::{NewItem, NewTransaction, TransactionType};
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn setup() -> (AnalyticsEngine, Arc<SqliteLedger>) {
        let ledger = Arc::new(SqliteLedger::new(memory_pool()));
        (AnalyticsEngine::new(ledger.clone()), ledger)
    }

    fn item(ledger: &SqliteLedger, name: &str, cost_per_unit: Decimal) -> ItemId {
        ledger
            .create_item(
                &NewItem {
                    current_quantity: dec!(100),
                    cost_per_unit,
                    ..NewItem::named(name)
                },
                day() - Duration::days(200),
            )
            .unwrap()
    }

    fn record(ledger: &SqliteLedger, id: ItemId, kind: TransactionType, quantity: Decimal, days_ago: i64) {
        ledger
            .append_transaction(&NewTransaction::new(
                id,
                kind,
                quantity,
                day() - Duration::days(days_ago),
            ))
            .unwrap();
    }

    #[test]
    fn empty_log_yields_zero_filled_views() {
        let (engine, _) = setup();
        let trends = engine.weekly_trends_on(day()).unwrap();
        assert_eq!(trends.len(), 10);
        assert!(trends.iter().all(|w| w.total.is_zero() && w.purchased.is_zero()));

        let waste = engine.waste_cost_per_week_on(day()).unwrap();
        assert_eq!(waste.len(), 10);
        assert!(waste.iter().all(|w| w.money_wasted.is_zero()));

        assert_eq!(engine.this_week_share_on(day()).unwrap(), ShareBreakdown::default());
        assert!(engine.most_wasted_on(day(), 10).unwrap().is_empty());
    }

    #[test]
    fn trends_bucket_by_week_and_skip_old_rows() {
        let (engine, ledger) = setup();
        let flour = item(&ledger, "Flour", dec!(2));
        record(&ledger, flour, TransactionType::Usage, dec!(4), 0);
        record(&ledger, flour, TransactionType::Waste, dec!(1), 6);
        record(&ledger, flour, TransactionType::Donation, dec!(2), 7);
        record(&ledger, flour, TransactionType::Usage, dec!(9), 70);

        let trends = engine.weekly_trends_on(day()).unwrap();
        let this_week = &trends[9];
        assert_eq!(this_week.week, 1);
        assert_eq!(this_week.used, dec!(4));
        assert_eq!(this_week.wasted, dec!(1));
        assert_eq!(this_week.total, dec!(5));
        assert_eq!(trends[8].donated, dec!(2));
        assert_eq!(
            trends.iter().map(|w| w.used).sum::<Decimal>(),
            dec!(4),
            "row 70 days back is outside the window"
        );
    }

    #[test]
    fn waste_cost_uses_current_unit_cost() {
        let (engine, ledger) = setup();
        let cream = item(&ledger, "Cream", dec!(3));
        record(&ledger, cream, TransactionType::Waste, dec!(2), 1);
        record(&ledger, cream, TransactionType::Waste, dec!(1), 10);
        ledger
            .append_transaction(
                &NewTransaction::new(cream, TransactionType::Purchase, dec!(10), day())
                    .with_cost(dec!(50)),
            )
            .unwrap();

        let waste = engine.waste_cost_per_week_on(day()).unwrap();
        assert_eq!(waste[9].money_wasted, dec!(10));
        assert_eq!(waste[8].money_wasted, dec!(5));
    }

    #[test]
    fn most_wasted_ranks_and_limits() {
        let (engine, ledger) = setup();
        let flour = item(&ledger, "Flour", dec!(2));
        let milk = item(&ledger, "Milk", dec!(1));
        let eggs = item(&ledger, "Eggs", dec!(0.25));
        record(&ledger, flour, TransactionType::Waste, dec!(5), 0);
        record(&ledger, milk, TransactionType::Waste, dec!(8), 2);
        record(&ledger, eggs, TransactionType::Waste, dec!(3), 3);
        record(&ledger, eggs, TransactionType::Waste, dec!(30), 20);

        let ranked = engine.most_wasted_on(day(), 2).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "Milk");
        assert_eq!(ranked[1].name, "Flour");
        assert_eq!(ranked[1].total_cost, dec!(10));
    }

    #[test]
    fn reads_are_idempotent() {
        let (engine, ledger) = setup();
        let flour = item(&ledger, "Flour", dec!(2));
        record(&ledger, flour, TransactionType::Waste, dec!(5), 0);

        let first = serde_json::to_value(engine.summary_on(day(), 10).unwrap()).unwrap();
        let second = serde_json::to_value(engine.summary_on(day(), 10).unwrap()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first["this_week"]["wasted"], serde_json::json!("5"));
    }
}
