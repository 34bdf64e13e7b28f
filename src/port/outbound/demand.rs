//! Demand calculation persistence port.

use crate::domain::{
    CalculationId, DemandCalculation, DemandOutcome, DemandRequest, IngredientAnalysis,
};
use crate::error::Result;

/// Storage operations for demand calculations.
pub trait DemandStore: Send + Sync {
    /// Store a new calculation.
    fn insert(&self, request: &DemandRequest, outcome: &DemandOutcome) -> Result<CalculationId>;

    /// Get a calculation by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if it does not exist.
    fn get(&self, id: CalculationId) -> Result<DemandCalculation>;

    /// List calculations, newest first.
    fn list(&self, limit: Option<usize>) -> Result<Vec<DemandCalculation>>;

    /// Overwrite the derived prediction fields.
    fn update_outcome(&self, id: CalculationId, outcome: &DemandOutcome) -> Result<()>;

    /// Attach or replace the ingredient analysis.
    fn set_ingredient_analysis(
        &self,
        id: CalculationId,
        analysis: &IngredientAnalysis,
    ) -> Result<()>;

    /// Delete a calculation.
    ///
    /// # Errors
    ///
    /// `NotFound` if it does not exist.
    fn delete(&self, id: CalculationId) -> Result<()>;
}
