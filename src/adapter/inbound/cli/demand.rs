//! Handlers for the `demand` command group.

use rust_decimal::Decimal;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::DemandCreateArgs;
use crate::adapter::inbound::cli::output;
use crate::application::DemandService;
use crate::domain::{CalculationId, DemandCalculation, DemandRequest};
use crate::error::Result;

#[derive(Tabled)]
struct CalculationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Dish")]
    dish: String,
    #[tabled(rename = "Final Price")]
    final_price: String,
    #[tabled(rename = "Orders")]
    orders: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Created")]
    created: String,
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn render(calculations: &[DemandCalculation]) -> String {
    Table::new(calculations.iter().map(|c| CalculationRow {
        id: c.id.to_string(),
        dish: c.request.dish_name.clone(),
        final_price: c.final_price.normalize().to_string(),
        orders: or_dash(c.predicted_orders),
        total: or_dash(c.total_price.map(|t| t.normalize())),
        created: c.created_at.format("%Y-%m-%d %H:%M").to_string(),
    }))
    .to_string()
}

fn print_calculation(calc: &DemandCalculation) {
    output::field("ID", calc.id);
    output::field("Dish", &calc.request.dish_name);
    output::field("Price", calc.request.dish_price.normalize());
    output::field("Discount", calc.discount_amount.normalize());
    output::field("Final price", calc.final_price.normalize());
    match calc.predicted_orders {
        Some(orders) => output::field("Orders", output::highlight(orders)),
        None => output::warning("Demand predictor unavailable, no order estimate"),
    }
    if let Some(total) = calc.total_price {
        output::field("Total", total.normalize());
    }

    let Some(analysis) = &calc.ingredient_analysis else {
        return;
    };
    output::section("Ingredients");
    if let Some(raw) = &analysis.raw_response {
        output::note(raw);
        return;
    }
    for ingredient in &analysis.ingredients {
        output::field(
            &ingredient.name,
            format!(
                "{} {} ({} per dish)",
                ingredient.total_quantity.normalize(),
                ingredient.unit,
                ingredient.quantity_per_dish.normalize()
            ),
        );
    }
    if !analysis.notes.is_empty() {
        output::note(&analysis.notes);
    }
}

fn respond(command: &str, calc: &DemandCalculation) {
    if output::is_json() {
        output::json_result(command, calc);
    } else {
        print_calculation(calc);
    }
}

impl From<DemandCreateArgs> for DemandRequest {
    fn from(args: DemandCreateArgs) -> Self {
        Self {
            dish_name: args.dish_name,
            dish_price: args.dish_price,
            major_ingredients: args.ingredients,
            category: args.category,
            cuisine: args.cuisine,
            emailed_in_promotions: args.emailed,
            featured_on_homepage: args.featured,
            discount_applied: args.discount.is_some(),
            discount_percentage: args.discount.unwrap_or(Decimal::ZERO),
            city_name: args.city,
            center_type: args.center_type,
        }
    }
}

/// Execute `demand create`.
pub async fn create(demand: &DemandService, args: DemandCreateArgs) -> Result<()> {
    let calc = demand.create(&args.into()).await?;
    if !output::is_json() {
        output::success(&format!("Stored calculation {}", calc.id));
    }
    respond("demand.create", &calc);
    Ok(())
}

/// Execute `demand recalculate`.
pub async fn recalculate(demand: &DemandService, id: CalculationId) -> Result<()> {
    let calc = demand.recalculate(id).await?;
    respond("demand.recalculate", &calc);
    Ok(())
}

/// Execute `demand show`.
pub fn show(demand: &DemandService, id: CalculationId) -> Result<()> {
    respond("demand.show", &demand.get(id)?);
    Ok(())
}

/// Execute `demand list`.
pub fn list(demand: &DemandService, limit: Option<usize>) -> Result<()> {
    let calculations = demand.list(limit)?;
    if output::is_json() {
        output::json_result("demand.list", &calculations);
        return Ok(());
    }
    if calculations.is_empty() {
        output::note("No demand calculations");
        return Ok(());
    }
    output::table(&render(&calculations));
    Ok(())
}

/// Execute `demand delete`.
pub fn delete(demand: &DemandService, id: CalculationId) -> Result<()> {
    demand.delete(id)?;
    if output::is_json() {
        output::json_output(serde_json::json!({
            "command": "demand.delete",
            "result": { "id": id },
        }));
        return Ok(());
    }
    output::success(&format!("Deleted calculation {id}"));
    Ok(())
}

/// Execute `demand analyze`.
pub async fn analyze(demand: &DemandService, id: CalculationId) -> Result<()> {
    let spinner = output::spinner("Estimating ingredients");
    let result = demand.analyze_ingredients(id).await;
    output::spinner_done(&spinner);
    respond("demand.analyze", &result?);
    Ok(())
}
