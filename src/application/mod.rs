//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod analytics;
pub mod assistant;
pub mod demand;
pub mod executor;
pub mod inventory;

pub use analytics::AnalyticsEngine;
pub use assistant::Assistant;
pub use demand::DemandService;
pub use executor::ActionExecutor;
pub use inventory::InventoryService;
