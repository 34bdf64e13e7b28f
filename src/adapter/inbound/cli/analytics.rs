//! Handlers for the `analytics` command group.

use rust_decimal::Decimal;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::application::inventory::today;
use crate::application::AnalyticsEngine;
use crate::domain::{ShareBreakdown, WasteCostWeek, WastedItem, WeeklyTrend};
use crate::error::Result;

fn num(value: Decimal) -> String {
    value.normalize().to_string()
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Week")]
    label: String,
    #[tabled(rename = "From")]
    start: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Wasted")]
    wasted: String,
    #[tabled(rename = "Donated")]
    donated: String,
    #[tabled(rename = "Purchased")]
    purchased: String,
    #[tabled(rename = "Total Out")]
    total: String,
}

#[derive(Tabled)]
struct WasteRow {
    #[tabled(rename = "Week")]
    label: String,
    #[tabled(rename = "From")]
    start: String,
    #[tabled(rename = "Money Wasted")]
    money_wasted: String,
}

#[derive(Tabled)]
struct WastedRow {
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Cost/Unit")]
    cost_per_unit: String,
    #[tabled(rename = "Total Cost")]
    total_cost: String,
}

fn render_trends(trends: &[WeeklyTrend]) -> String {
    Table::new(trends.iter().map(|w| TrendRow {
        label: w.label.clone(),
        start: w.start.to_string(),
        used: num(w.used),
        wasted: num(w.wasted),
        donated: num(w.donated),
        purchased: num(w.purchased),
        total: num(w.total),
    }))
    .to_string()
}

fn render_waste(weeks: &[WasteCostWeek]) -> String {
    Table::new(weeks.iter().map(|w| WasteRow {
        label: w.label.clone(),
        start: w.start.to_string(),
        money_wasted: num(w.money_wasted),
    }))
    .to_string()
}

fn render_wasted(items: &[WastedItem]) -> String {
    Table::new(items.iter().map(|item| WastedRow {
        name: item.name.clone(),
        quantity: format!("{} {}", num(item.quantity), item.unit),
        cost_per_unit: num(item.cost_per_unit),
        total_cost: num(item.total_cost),
    }))
    .to_string()
}

fn print_share(share: &ShareBreakdown) {
    if share.total.is_zero() {
        output::note("Nothing used, wasted or donated this week");
        return;
    }
    output::field("Used", format!("{} ({}%)", num(share.used), num(share.used_pct)));
    output::field(
        "Wasted",
        format!("{} ({}%)", num(share.wasted), output::negative(num(share.wasted_pct))),
    );
    output::field("Donated", format!("{} ({}%)", num(share.donated), num(share.donated_pct)));
}

/// Execute `analytics trends`.
pub fn trends(engine: &AnalyticsEngine) -> Result<()> {
    let trends = engine.weekly_trends()?;
    if output::is_json() {
        output::json_result("analytics.trends", &trends);
        return Ok(());
    }
    output::section("Weekly trends");
    output::table(&render_trends(&trends));
    Ok(())
}

/// Execute `analytics waste`.
pub fn waste(engine: &AnalyticsEngine) -> Result<()> {
    let weeks = engine.waste_cost_per_week()?;
    if output::is_json() {
        output::json_result("analytics.waste", &weeks);
        return Ok(());
    }
    output::section("Money wasted per week");
    output::table(&render_waste(&weeks));
    let total: Decimal = weeks.iter().map(|w| w.money_wasted).sum();
    output::field("Total", num(total));
    Ok(())
}

/// Execute `analytics share`.
pub fn share(engine: &AnalyticsEngine) -> Result<()> {
    let share = engine.this_week_share()?;
    if output::is_json() {
        output::json_result("analytics.share", &share);
        return Ok(());
    }
    output::section("This week");
    print_share(&share);
    Ok(())
}

/// Execute `analytics wasted`.
pub fn most_wasted(engine: &AnalyticsEngine, limit: usize) -> Result<()> {
    let items = engine.most_wasted(limit)?;
    if output::is_json() {
        output::json_result("analytics.wasted", &items);
        return Ok(());
    }
    output::section("Most wasted this week");
    if items.is_empty() {
        output::note("No waste recorded this week");
    } else {
        output::table(&render_wasted(&items));
    }
    Ok(())
}

/// Execute `analytics summary`.
pub fn summary(engine: &AnalyticsEngine, limit: usize) -> Result<()> {
    let summary = engine.summary_on(today(), limit)?;
    if output::is_json() {
        output::json_result("analytics.summary", &summary);
        return Ok(());
    }
    output::section("Weekly trends");
    output::table(&render_trends(&summary.weekly_trends));
    output::section("Money wasted per week");
    output::table(&render_waste(&summary.waste_cost));
    output::section("This week");
    print_share(&summary.this_week);
    if !summary.most_wasted.is_empty() {
        output::section("Most wasted this week");
        output::table(&render_wasted(&summary.most_wasted));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemId;
    use rust_decimal_macros::dec;

    #[test]
    fn wasted_table_lists_items_with_units() {
        let table = render_wasted(&[WastedItem {
            inventory_id: ItemId::new(1),
            name: "Milk".into(),
            unit: "l".into(),
            quantity: dec!(8.0),
            cost_per_unit: dec!(1.10),
            total_cost: dec!(8.80),
        }]);
        assert!(table.contains("8 l"));
        assert!(table.contains("8.8"));
    }
}
