//! Command-line interface definitions.
//!
//! Defines the CLI structure for the pantry application using `clap`.
//! Subcommands cover items, the transaction log, structured actions,
//! analytics, demand calculations, the assistant and configuration.

use std::convert::Infallible;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use super::paths;
use crate::domain::{CalculationId, ItemId, ItemKey, TransactionType};

/// Restaurant inventory ledger
#[derive(Parser, Debug)]
#[command(name = "pantry")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Path to the SQLite database (overrides `database` in config)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Forced setting, or `None` for terminal detection.
    #[must_use]
    pub const fn forced(&self) -> Option<bool> {
        match self {
            Self::Auto => None,
            Self::Always => Some(true),
            Self::Never => Some(false),
        }
    }
}

/// Top-level subcommands for the pantry CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage inventory items
    #[command(subcommand)]
    Item(ItemCommand),

    /// Record and list stock movements
    #[command(subcommand)]
    Tx(TransactionCommand),

    /// Execute structured actions
    #[command(subcommand)]
    Action(ActionCommand),

    /// Rolling ten-week analytics
    #[command(subcommand)]
    Analytics(AnalyticsCommand),

    /// Show low, negative and expiring stock
    Alerts(AlertsArgs),

    /// Compare item quantities with the transaction log
    Reconcile,

    /// Demand calculations
    #[command(subcommand)]
    Demand(DemandCommand),

    /// Ask the inventory assistant
    Chat(ChatArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Parse an item reference: a numeric id or a name.
pub fn parse_item_key(raw: &str) -> Result<ItemKey, Infallible> {
    Ok(match raw.trim().parse::<i32>() {
        Ok(id) => ItemKey::Id(ItemId::new(id)),
        Err(_) => ItemKey::Name(raw.trim().to_string()),
    })
}

fn parse_calculation_id(raw: &str) -> Result<CalculationId, std::num::ParseIntError> {
    raw.trim().parse::<i32>().map(CalculationId::new)
}

/// Subcommands for `pantry item`.
#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    /// Create an item; opening stock is logged as a purchase
    Add(ItemAddArgs),
    /// List items
    List(ItemListArgs),
    /// Show one item by id or name
    Show(ItemRefArg),
    /// Update item fields
    Update(ItemUpdateArgs),
    /// Delete an item and its transaction history
    Delete(ItemRefArg),
}

/// An item id or name.
#[derive(Args, Debug)]
pub struct ItemRefArg {
    /// Item id or name
    #[arg(value_parser = parse_item_key)]
    pub item: ItemKey,
}

/// Arguments for `pantry item add`.
#[derive(Args, Debug)]
pub struct ItemAddArgs {
    pub name: String,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub unit: Option<String>,
    /// Opening stock
    #[arg(long, default_value = "0")]
    pub quantity: Decimal,
    #[arg(long)]
    pub min: Option<Decimal>,
    #[arg(long)]
    pub max: Option<Decimal>,
    #[arg(long, default_value = "0")]
    pub cost_per_unit: Decimal,
    /// Total cost of the opening stock
    #[arg(long, default_value = "0")]
    pub total_cost: Decimal,
    #[arg(long)]
    pub supplier: Option<String>,
    /// Expiration date (YYYY-MM-DD)
    #[arg(long)]
    pub expires: Option<NaiveDate>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, default_value = "")]
    pub notes: String,
}

/// Arguments for `pantry item list`.
#[derive(Args, Debug)]
pub struct ItemListArgs {
    #[arg(long)]
    pub category: Option<String>,
    /// Substring of the item name
    #[arg(long)]
    pub search: Option<String>,
}

/// Arguments for `pantry item update`.
#[derive(Args, Debug)]
pub struct ItemUpdateArgs {
    /// Item id or name
    #[arg(value_parser = parse_item_key)]
    pub item: ItemKey,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub unit: Option<String>,
    /// New quantity; the difference is logged as a compensating transaction
    #[arg(long)]
    pub quantity: Option<Decimal>,
    #[arg(long)]
    pub min: Option<Decimal>,
    #[arg(long)]
    pub max: Option<Decimal>,
    #[arg(long)]
    pub cost_per_unit: Option<Decimal>,
    #[arg(long)]
    pub supplier: Option<String>,
    #[arg(long)]
    pub expires: Option<NaiveDate>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

/// Subcommands for `pantry tx`.
#[derive(Subcommand, Debug)]
pub enum TransactionCommand {
    /// Append a transaction to the log
    Record(TransactionRecordArgs),
    /// List transactions with per-type totals
    List(TransactionListArgs),
}

/// Arguments for `pantry tx record`.
#[derive(Args, Debug)]
pub struct TransactionRecordArgs {
    /// Item id or name
    #[arg(value_parser = parse_item_key)]
    pub item: ItemKey,
    /// purchase, usage, waste or donation
    pub transaction_type: TransactionType,
    pub quantity: Decimal,
    #[arg(long, default_value = "0")]
    pub cost: Decimal,
    #[arg(long, default_value = "")]
    pub notes: String,
    /// Transaction date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Arguments for `pantry tx list`.
#[derive(Args, Debug)]
pub struct TransactionListArgs {
    /// Only this item (id or name)
    #[arg(long, value_parser = parse_item_key)]
    pub item: Option<ItemKey>,
    #[arg(long = "type")]
    pub transaction_type: Option<TransactionType>,
    #[arg(long)]
    pub since: Option<NaiveDate>,
    #[arg(long)]
    pub until: Option<NaiveDate>,
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Subcommands for `pantry action`.
#[derive(Subcommand, Debug)]
pub enum ActionCommand {
    /// Execute one action object or an array of them
    Run(ActionRunArgs),
    /// Complete a pending action with the missing fields
    Complete(ActionCompleteArgs),
}

/// Arguments for `pantry action run`.
#[derive(Args, Debug)]
pub struct ActionRunArgs {
    /// JSON `{"type": ..., "data": {...}}` or an array of them; `-` reads stdin
    pub actions: String,
}

/// Arguments for `pantry action complete`.
#[derive(Args, Debug)]
pub struct ActionCompleteArgs {
    /// The `pending` object from an earlier result
    pub pending: String,
    /// JSON object with the missing fields
    pub fields: String,
}

/// Subcommands for `pantry analytics`.
#[derive(Subcommand, Debug)]
pub enum AnalyticsCommand {
    /// Quantities per week by transaction type
    Trends,
    /// Money wasted per week
    Waste,
    /// Usage, waste and donation shares this week
    Share,
    /// Items with the most waste this week
    Wasted(LimitArg),
    /// Every view at once
    Summary(LimitArg),
}

/// Optional ranking length.
#[derive(Args, Debug)]
pub struct LimitArg {
    /// Defaults to `analytics.most_wasted_limit`
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for `pantry alerts`.
#[derive(Args, Debug)]
pub struct AlertsArgs {
    /// Expiry window in days; defaults to `analytics.expiring_within_days`
    #[arg(long)]
    pub days: Option<u32>,
}

/// Subcommands for `pantry demand`.
#[derive(Subcommand, Debug)]
pub enum DemandCommand {
    /// Price a dish and predict its orders
    Create(DemandCreateArgs),
    /// Re-run pricing and prediction for a stored calculation
    Recalculate(CalculationArg),
    /// Show one calculation
    Show(CalculationArg),
    /// List calculations, newest first
    List(DemandListArgs),
    /// Delete a calculation
    Delete(CalculationArg),
    /// Estimate ingredient needs with the LLM
    Analyze(CalculationArg),
}

/// A stored calculation id.
#[derive(Args, Debug)]
pub struct CalculationArg {
    #[arg(value_parser = parse_calculation_id)]
    pub id: CalculationId,
}

/// Arguments for `pantry demand create`.
#[derive(Args, Debug)]
pub struct DemandCreateArgs {
    pub dish_name: String,
    pub dish_price: Decimal,
    #[arg(long, default_value = "")]
    pub ingredients: String,
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long, default_value = "")]
    pub cuisine: String,
    #[arg(long)]
    pub emailed: bool,
    #[arg(long)]
    pub featured: bool,
    /// Discount percentage; implies a discount is applied
    #[arg(long)]
    pub discount: Option<Decimal>,
    #[arg(long, default_value = "")]
    pub city: String,
    #[arg(long, default_value = "")]
    pub center_type: String,
}

/// Arguments for `pantry demand list`.
#[derive(Args, Debug)]
pub struct DemandListArgs {
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for `pantry chat`.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Message for the assistant
    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,
}

/// Subcommands for `pantry config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a new configuration file from template.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate the configuration file.
    Validate,
}

/// Arguments for `pantry config init`.
#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output path; defaults to `--config`
    pub path: Option<PathBuf>,
    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}
