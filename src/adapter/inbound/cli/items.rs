//! Handlers for the `item` command group.

use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::{ItemAddArgs, ItemListArgs, ItemUpdateArgs};
use crate::adapter::inbound::cli::output;
use crate::application::InventoryService;
use crate::domain::item::{
    DEFAULT_CATEGORY, DEFAULT_MAX_QUANTITY, DEFAULT_MIN_QUANTITY, DEFAULT_STORAGE,
    DEFAULT_SUPPLIER, DEFAULT_UNIT,
};
use crate::domain::{InventoryItem, ItemFilter, ItemKey, ItemPatch, NewItem, StockStatus};
use crate::error::Result;

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Cost/Unit")]
    cost_per_unit: String,
    #[tabled(rename = "Expires")]
    expires: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&InventoryItem> for ItemRow {
    fn from(item: &InventoryItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: format!("{} {}", item.current_quantity.normalize(), item.unit),
            min: item.min_quantity.normalize().to_string(),
            cost_per_unit: item.cost_per_unit.normalize().to_string(),
            expires: item
                .expiration_date
                .map_or_else(|| "-".to_string(), |d| d.to_string()),
            status: status_label(item.stock_status()),
        }
    }
}

pub(crate) fn status_label(status: StockStatus) -> String {
    match status {
        StockStatus::Negative => output::negative("negative"),
        StockStatus::Low => output::negative("low"),
        StockStatus::Normal => output::positive("ok"),
        StockStatus::Overstocked => output::highlight("overstocked"),
    }
}

pub(crate) fn render_items(items: &[InventoryItem]) -> String {
    Table::new(items.iter().map(ItemRow::from)).to_string()
}

fn print_item(item: &InventoryItem) {
    output::field("ID", item.id);
    output::field("Name", &item.name);
    output::field("Category", &item.category);
    output::field(
        "Quantity",
        format!("{} {}", item.current_quantity.normalize(), item.unit),
    );
    output::field(
        "Range",
        format!(
            "{} - {}",
            item.min_quantity.normalize(),
            item.max_quantity.normalize()
        ),
    );
    output::field("Cost/unit", item.cost_per_unit.normalize());
    output::field("Total cost", item.total_cost.normalize());
    output::field("Supplier", &item.supplier);
    output::field("Location", &item.storage_location);
    if let Some(expires) = item.expiration_date {
        output::field("Expires", expires);
    }
    if !item.notes.is_empty() {
        output::field("Notes", &item.notes);
    }
    output::field("Status", status_label(item.stock_status()));
}

/// Execute `item add`.
pub fn add(inventory: &InventoryService, args: ItemAddArgs) -> Result<()> {
    let new = NewItem {
        name: args.name,
        category: args.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        unit: args.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        current_quantity: args.quantity,
        min_quantity: args.min.unwrap_or(DEFAULT_MIN_QUANTITY),
        max_quantity: args.max.unwrap_or(DEFAULT_MAX_QUANTITY),
        cost_per_unit: args.cost_per_unit,
        total_cost: args.total_cost,
        supplier: args.supplier.unwrap_or_else(|| DEFAULT_SUPPLIER.to_string()),
        expiration_date: args.expires,
        storage_location: args.location.unwrap_or_else(|| DEFAULT_STORAGE.to_string()),
        notes: args.notes,
    };
    let item = inventory.create_item(&new)?;

    if output::is_json() {
        output::json_result("item.add", &item);
        return Ok(());
    }
    output::success(&format!("Created {} (id {})", item.name, item.id));
    print_item(&item);
    Ok(())
}

/// Execute `item list`.
pub fn list(inventory: &InventoryService, args: ItemListArgs) -> Result<()> {
    let items = inventory.list_items(&ItemFilter {
        category: args.category,
        search: args.search,
    })?;

    if output::is_json() {
        output::json_result("item.list", &items);
        return Ok(());
    }
    if items.is_empty() {
        output::note("No items");
        return Ok(());
    }
    output::table(&render_items(&items));
    Ok(())
}

/// Execute `item show`.
pub fn show(inventory: &InventoryService, key: &ItemKey) -> Result<()> {
    let item = inventory.get_item(key)?;

    if output::is_json() {
        output::json_result("item.show", &item);
        return Ok(());
    }
    output::section(&item.name);
    print_item(&item);
    Ok(())
}

/// Execute `item update`.
pub fn update(inventory: &InventoryService, args: ItemUpdateArgs) -> Result<()> {
    let item = inventory.get_item(&args.item)?;
    let patch = ItemPatch {
        name: args.name,
        category: args.category,
        unit: args.unit,
        current_quantity: args.quantity,
        min_quantity: args.min,
        max_quantity: args.max,
        cost_per_unit: args.cost_per_unit,
        supplier: args.supplier,
        expiration_date: args.expires,
        storage_location: args.location,
        notes: args.notes,
    };
    let updated = inventory.update_item(item.id, &patch)?;

    if output::is_json() {
        output::json_result("item.update", &updated);
        return Ok(());
    }
    output::success(&format!("Updated {}", updated.name));
    if updated.current_quantity != item.current_quantity {
        output::note(&format!(
            "Quantity {} -> {} logged as a compensating transaction",
            item.current_quantity.normalize(),
            updated.current_quantity.normalize()
        ));
    }
    Ok(())
}

/// Execute `item delete`.
pub fn delete(inventory: &InventoryService, key: &ItemKey) -> Result<()> {
    let item = inventory.get_item(key)?;
    let removed = inventory.delete_item(item.id)?;

    if output::is_json() {
        output::json_output(serde_json::json!({
            "command": "item.delete",
            "result": { "inventory_id": item.id, "name": item.name, "transactions_deleted": removed },
        }));
        return Ok(());
    }
    output::success(&format!("Deleted {} and {removed} transactions", item.name));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::domain::ItemId;
    use rust_decimal_macros::dec;

    fn item() -> InventoryItem {
        InventoryItem {
            id: ItemId::new(7),
            name: "Tomatoes".into(),
            category: "Produce".into(),
            unit: "kg".into(),
            current_quantity: dec!(12.50),
            min_quantity: dec!(5),
            max_quantity: dec!(40),
            cost_per_unit: dec!(1.20),
            total_cost: dec!(15),
            supplier: "Farm".into(),
            expiration_date: None,
            storage_location: "Walk-in".into(),
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn row_shows_quantity_with_unit() {
        let row = ItemRow::from(&item());
        assert_eq!(row.quantity, "12.5 kg");
        assert_eq!(row.cost_per_unit, "1.2");
        assert_eq!(row.expires, "-");
    }

    #[test]
    fn rendered_table_has_headers() {
        let table = render_items(&[item()]);
        assert!(table.contains("Cost/Unit"));
        assert!(table.contains("Tomatoes"));
    }
}
