//! Rolling-window analytics over the transaction log.
//!
//! Transactions are placed in 7-day buckets counted back from "today":
//! bucket 1 holds `daysAgo` 0..=6, bucket 10 holds 63..=69. Anything older,
//! or dated in the future, is ignored. Every function here is pure and
//! returns zero-filled output for an empty log.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::id::ItemId;
use super::item::InventoryItem;
use super::transaction::{InventoryTransaction, TransactionType};

/// Number of buckets in the rolling window.
pub const WEEKS: u32 = 10;

/// Length of one bucket in days.
pub const DAYS_PER_WEEK: i64 = 7;

/// Oldest date still inside the window.
#[must_use]
pub fn window_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(WEEKS) * DAYS_PER_WEEK - 1)
}

/// Bucket number for a transaction date, or `None` when outside the window.
#[must_use]
pub fn bucket(today: NaiveDate, date: NaiveDate) -> Option<u32> {
    let days_ago = (today - date).num_days();
    if !(0..i64::from(WEEKS) * DAYS_PER_WEEK).contains(&days_ago) {
        return None;
    }
    u32::try_from(days_ago / DAYS_PER_WEEK + 1).ok()
}

/// Inclusive date range covered by a bucket.
#[must_use]
pub fn bucket_range(today: NaiveDate, week: u32) -> (NaiveDate, NaiveDate) {
    let end = today - Duration::days(i64::from(week.saturating_sub(1)) * DAYS_PER_WEEK);
    (end - Duration::days(DAYS_PER_WEEK - 1), end)
}

/// Human label for a bucket.
#[must_use]
pub fn week_label(week: u32) -> String {
    match week {
        1 => "This week".to_string(),
        2 => "Last week".to_string(),
        n => format!("{} weeks ago", n - 1),
    }
}

/// Buckets from oldest to most recent.
fn weeks_oldest_first() -> impl Iterator<Item = u32> {
    (1..=WEEKS).rev()
}

/// Quantities moved during one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyTrend {
    pub week: u32,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub used: Decimal,
    pub wasted: Decimal,
    pub donated: Decimal,
    pub purchased: Decimal,
    /// `used + wasted + donated`; purchases are not part of the total.
    pub total: Decimal,
}

impl WeeklyTrend {
    fn empty(today: NaiveDate, week: u32) -> Self {
        let (start, end) = bucket_range(today, week);
        Self {
            week,
            label: week_label(week),
            start,
            end,
            used: Decimal::ZERO,
            wasted: Decimal::ZERO,
            donated: Decimal::ZERO,
            purchased: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    fn add(&mut self, transaction_type: TransactionType, quantity: Decimal) {
        match transaction_type {
            TransactionType::Usage => self.used += quantity,
            TransactionType::Waste => self.wasted += quantity,
            TransactionType::Donation => self.donated += quantity,
            TransactionType::Purchase => self.purchased += quantity,
        }
        self.total = self.used + self.wasted + self.donated;
    }
}

/// Per-type quantities for each of the last ten weeks, oldest first.
#[must_use]
pub fn weekly_trends(today: NaiveDate, transactions: &[InventoryTransaction]) -> Vec<WeeklyTrend> {
    let mut weeks: Vec<WeeklyTrend> = weeks_oldest_first()
        .map(|week| WeeklyTrend::empty(today, week))
        .collect();

    for tx in transactions {
        if let Some(week) = bucket(today, tx.date) {
            weeks[slot(week)].add(tx.transaction_type, tx.quantity);
        }
    }
    weeks
}

/// Index of a bucket in oldest-first output.
fn slot(week: u32) -> usize {
    (WEEKS - week) as usize
}

/// Money lost to waste during one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WasteCostWeek {
    pub week: u32,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub money_wasted: Decimal,
}

/// Waste cost per week, oldest first.
///
/// Each waste row is valued at the item's *current* `cost_per_unit`, so a
/// later price change rewrites history. Rows whose item is unknown count
/// as zero.
#[must_use]
pub fn waste_cost_per_week(
    today: NaiveDate,
    transactions: &[InventoryTransaction],
    cost_per_unit: &HashMap<ItemId, Decimal>,
) -> Vec<WasteCostWeek> {
    let mut weeks: Vec<WasteCostWeek> = weeks_oldest_first()
        .map(|week| {
            let (start, end) = bucket_range(today, week);
            WasteCostWeek {
                week,
                label: week_label(week),
                start,
                end,
                money_wasted: Decimal::ZERO,
            }
        })
        .collect();

    for tx in transactions {
        if tx.transaction_type != TransactionType::Waste {
            continue;
        }
        let Some(week) = bucket(today, tx.date) else {
            continue;
        };
        let unit_cost = cost_per_unit
            .get(&tx.inventory_id)
            .copied()
            .unwrap_or(Decimal::ZERO);
        weeks[slot(week)].money_wasted += tx.quantity * unit_cost;
    }
    weeks
}

/// Usage, waste and donation over the current week, with percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShareBreakdown {
    pub used: Decimal,
    pub wasted: Decimal,
    pub donated: Decimal,
    pub total: Decimal,
    pub used_pct: Decimal,
    pub wasted_pct: Decimal,
    pub donated_pct: Decimal,
}

fn percent(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        Decimal::ZERO
    } else {
        (part / total * Decimal::ONE_HUNDRED).round_dp(2)
    }
}

/// Outbound share for bucket 1 only. All zeros when there is nothing.
#[must_use]
pub fn this_week_share(today: NaiveDate, transactions: &[InventoryTransaction]) -> ShareBreakdown {
    let mut share = ShareBreakdown::default();
    for tx in transactions.iter().filter(|tx| bucket(today, tx.date) == Some(1)) {
        match tx.transaction_type {
            TransactionType::Usage => share.used += tx.quantity,
            TransactionType::Waste => share.wasted += tx.quantity,
            TransactionType::Donation => share.donated += tx.quantity,
            TransactionType::Purchase => {}
        }
    }
    share.total = share.used + share.wasted + share.donated;
    share.used_pct = percent(share.used, share.total);
    share.wasted_pct = percent(share.wasted, share.total);
    share.donated_pct = percent(share.donated, share.total);
    share
}

/// An item ranked by waste in the current week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WastedItem {
    pub inventory_id: ItemId,
    pub name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub cost_per_unit: Decimal,
    /// `quantity * cost_per_unit`, at today's price.
    pub total_cost: Decimal,
}

/// Top `limit` items by waste quantity over the trailing week.
///
/// Ties are broken by name so the ranking is stable.
#[must_use]
pub fn most_wasted(
    today: NaiveDate,
    transactions: &[InventoryTransaction],
    items: &[InventoryItem],
    limit: usize,
) -> Vec<WastedItem> {
    let mut wasted: HashMap<ItemId, Decimal> = HashMap::new();
    for tx in transactions {
        if tx.transaction_type == TransactionType::Waste && bucket(today, tx.date) == Some(1) {
            *wasted.entry(tx.inventory_id).or_default() += tx.quantity;
        }
    }

    let mut ranked: Vec<WastedItem> = items
        .iter()
        .filter_map(|item| {
            let quantity = *wasted.get(&item.id)?;
            Some(WastedItem {
                inventory_id: item.id,
                name: item.name.clone(),
                unit: item.unit.clone(),
                quantity,
                cost_per_unit: item.cost_per_unit,
                total_cost: quantity * item.cost_per_unit,
            })
        })
        .collect();

    ranked.sort_by(|a, b| match b.quantity.cmp(&a.quantity) {
        Ordering::Equal => a.name.cmp(&b.name),
        other => other,
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::TransactionId;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn days_ago(n: i64) -> NaiveDate {
        today() - Duration::days(n)
    }

    fn tx(item: i32, kind: TransactionType, quantity: Decimal, date: NaiveDate) -> InventoryTransaction {
        InventoryTransaction {
            id: TransactionId::new(1),
            inventory_id: ItemId::new(item),
            transaction_type: kind,
            quantity,
            cost: Decimal::ZERO,
            notes: String::new(),
            date,
            created_at: Utc::now(),
        }
    }

    fn item(id: i32, name: &str, cost_per_unit: Decimal) -> InventoryItem {
        InventoryItem {
            id: ItemId::new(id),
            name: name.into(),
            category: "General".into(),
            unit: "kg".into(),
            current_quantity: dec!(10),
            min_quantity: Decimal::ZERO,
            max_quantity: dec!(100),
            cost_per_unit,
            total_cost: Decimal::ZERO,
            supplier: "Unknown".into(),
            expiration_date: None,
            storage_location: "Storage".into(),
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(bucket(today(), days_ago(0)), Some(1));
        assert_eq!(bucket(today(), days_ago(6)), Some(1));
        assert_eq!(bucket(today(), days_ago(7)), Some(2));
        assert_eq!(bucket(today(), days_ago(69)), Some(10));
        assert_eq!(bucket(today(), days_ago(70)), None);
        assert_eq!(bucket(today(), days_ago(-1)), None);
    }

    #[test]
    fn bucket_range_covers_seven_days() {
        let (start, end) = bucket_range(today(), 1);
        assert_eq!(end, today());
        assert_eq!(start, days_ago(6));

        let (start, end) = bucket_range(today(), 10);
        assert_eq!(end, days_ago(63));
        assert_eq!(start, days_ago(69));
        assert_eq!(start, window_start(today()));
    }

    #[test]
    fn empty_log_gives_ten_zero_weeks() {
        let weeks = weekly_trends(today(), &[]);
        assert_eq!(weeks.len(), 10);
        assert!(weeks.iter().all(|w| w.used.is_zero()
            && w.wasted.is_zero()
            && w.donated.is_zero()
            && w.purchased.is_zero()
            && w.total.is_zero()));
        assert_eq!(weeks.first().unwrap().week, 10);
        assert_eq!(weeks.last().unwrap().week, 1);
        assert_eq!(weeks.last().unwrap().label, "This week");
    }

    #[test]
    fn weekly_trends_sum_by_type_and_exclude_purchases_from_total() {
        let txs = [
            tx(1, TransactionType::Usage, dec!(3), days_ago(1)),
            tx(1, TransactionType::Waste, dec!(2), days_ago(2)),
            tx(1, TransactionType::Donation, dec!(1), days_ago(3)),
            tx(1, TransactionType::Purchase, dec!(20), days_ago(3)),
            tx(1, TransactionType::Usage, dec!(4), days_ago(8)),
            tx(1, TransactionType::Usage, dec!(100), days_ago(80)),
        ];
        let weeks = weekly_trends(today(), &txs);

        let current = &weeks[9];
        assert_eq!(current.used, dec!(3));
        assert_eq!(current.wasted, dec!(2));
        assert_eq!(current.donated, dec!(1));
        assert_eq!(current.purchased, dec!(20));
        assert_eq!(current.total, dec!(6));

        let last = &weeks[8];
        assert_eq!(last.week, 2);
        assert_eq!(last.used, dec!(4));

        let all_used: Decimal = weeks.iter().map(|w| w.used).sum();
        assert_eq!(all_used, dec!(7));
    }

    #[test]
    fn waste_cost_uses_current_cost_per_unit() {
        let txs = [
            tx(1, TransactionType::Waste, dec!(5), days_ago(0)),
            tx(1, TransactionType::Usage, dec!(5), days_ago(0)),
            tx(2, TransactionType::Waste, dec!(2), days_ago(14)),
        ];
        let costs = HashMap::from([(ItemId::new(1), dec!(2)), (ItemId::new(2), dec!(1.5))]);
        let weeks = waste_cost_per_week(today(), &txs, &costs);

        assert_eq!(weeks.len(), 10);
        assert_eq!(weeks[9].money_wasted, dec!(10));
        assert_eq!(weeks[7].week, 3);
        assert_eq!(weeks[7].money_wasted, dec!(3.0));
    }

    #[test]
    fn share_is_zero_filled_when_empty() {
        let share = this_week_share(today(), &[]);
        assert_eq!(share, ShareBreakdown::default());
    }

    #[test]
    fn share_only_counts_current_week() {
        let txs = [
            tx(1, TransactionType::Usage, dec!(6), days_ago(0)),
            tx(1, TransactionType::Waste, dec!(3), days_ago(1)),
            tx(1, TransactionType::Donation, dec!(1), days_ago(2)),
            tx(1, TransactionType::Waste, dec!(50), days_ago(9)),
        ];
        let share = this_week_share(today(), &txs);
        assert_eq!(share.total, dec!(10));
        assert_eq!(share.used_pct, dec!(60));
        assert_eq!(share.wasted_pct, dec!(30));
        assert_eq!(share.donated_pct, dec!(10));
    }

    #[test]
    fn most_wasted_ranks_and_limits() {
        let items = [
            item(1, "Flour", dec!(2)),
            item(2, "Milk", dec!(1)),
            item(3, "Basil", dec!(3)),
        ];
        let txs = [
            tx(1, TransactionType::Waste, dec!(5), days_ago(0)),
            tx(2, TransactionType::Waste, dec!(7), days_ago(1)),
            tx(2, TransactionType::Waste, dec!(1), days_ago(20)),
            tx(3, TransactionType::Usage, dec!(9), days_ago(0)),
        ];

        let ranked = most_wasted(today(), &txs, &items, 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "Milk");
        assert_eq!(ranked[0].quantity, dec!(7));
        assert_eq!(ranked[1].name, "Flour");
        assert_eq!(ranked[1].total_cost, dec!(10));

        let top = most_wasted(today(), &txs, &items, 1);
        assert_eq!(top.len(), 1);
    }
}
