//! Storage-agnostic inventory domain.
//!
//! Pure types and rules: items, the transaction log, the aggregation
//! effect table, structured actions, analytics bucketing and demand
//! pricing. Nothing in here performs I/O.

pub mod action;
pub mod aggregate;
pub mod analytics;
pub mod demand;
pub mod error;
pub mod id;
pub mod item;
pub mod transaction;

pub use action::{Action, ActionErrorKind, ActionKind, ActionResult, PendingAction, RawAction};
pub use aggregate::{Compensation, SnapshotDelta, StockLevels};
pub use analytics::{ShareBreakdown, WasteCostWeek, WastedItem, WeeklyTrend};
pub use demand::{
    DemandCalculation, DemandFeatures, DemandOutcome, DemandRequest, IngredientAnalysis,
    IngredientEstimate, Pricing,
};
pub use error::LedgerError;
pub use id::{CalculationId, ItemId, TransactionId};
pub use item::{InventoryItem, ItemFilter, ItemKey, ItemPatch, NewItem, StockStatus};
pub use transaction::{
    InventoryTransaction, NewTransaction, TransactionFilter, TransactionListing, TransactionType,
    TypeSummary,
};
