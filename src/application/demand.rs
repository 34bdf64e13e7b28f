//! Demand calculation use cases.
//!
//! Pricing is computed locally; the order count comes from an optional
//! [`DemandPredictor`] and the ingredient breakdown from an optional
//! [`Llm`]. Either collaborator may be missing or failing without losing
//! the calculation.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::{
    CalculationId, DemandCalculation, DemandOutcome, DemandRequest, IngredientAnalysis,
    IngredientEstimate,
};
use crate::error::{ConfigError, Error, Result};
use crate::port::outbound::demand::DemandStore;
use crate::port::outbound::llm::{extract_json, Llm};
use crate::port::outbound::predictor::DemandPredictor;

const INGREDIENT_SYSTEM_PROMPT: &str = r#"You are a kitchen planner estimating ingredient needs for a dish.

Return JSON only:
```json
{
  "ingredients": [{"name": "Flour", "quantity_per_dish": 0.2, "unit": "kg"}],
  "notes": "Short planning note"
}
```

Rules:
- One entry per ingredient, quantities per single serving
- Use metric units (kg, g, l, ml) or "units" for countable items
"#;

#[derive(Deserialize)]
struct IngredientReply {
    #[serde(default)]
    ingredients: Vec<IngredientEstimate>,
    #[serde(default)]
    notes: String,
}

/// Creates, recalculates and analyzes demand calculations.
pub struct DemandService {
    store: Arc<dyn DemandStore>,
    predictor: Option<Arc<dyn DemandPredictor>>,
    llm: Option<Arc<dyn Llm>>,
}

impl DemandService {
    pub fn new(
        store: Arc<dyn DemandStore>,
        predictor: Option<Arc<dyn DemandPredictor>>,
        llm: Option<Arc<dyn Llm>>,
    ) -> Self {
        Self {
            store,
            predictor,
            llm,
        }
    }

    /// Ask the predictor for an order count; `None` when it is absent or fails.
    async fn predict(&self, request: &DemandRequest) -> Option<i64> {
        let predictor = self.predictor.as_ref()?;
        match predictor.predict(&request.features()).await {
            Ok(orders) => {
                debug!(predictor = predictor.name(), orders, "Predicted demand");
                Some(orders)
            }
            Err(e) => {
                warn!(predictor = predictor.name(), error = %e, "Demand prediction unavailable");
                None
            }
        }
    }

    /// Price the request, predict orders and store the calculation.
    ///
    /// # Errors
    ///
    /// `Validation` for a malformed request, or a storage error.
    pub async fn create(&self, request: &DemandRequest) -> Result<DemandCalculation> {
        request.validate()?;
        let orders = self.predict(request).await;
        let outcome = DemandOutcome::new(request.pricing(), orders);
        let id = self.store.insert(request, &outcome)?;
        info!(id = %id, dish = %request.dish_name, predicted_orders = ?orders, "Stored demand calculation");
        self.store.get(id)
    }

    /// Re-run pricing and prediction for a stored calculation in place.
    ///
    /// An existing ingredient analysis is rescaled to the new order count.
    pub async fn recalculate(&self, id: CalculationId) -> Result<DemandCalculation> {
        let calculation = self.store.get(id)?;
        let orders = self.predict(&calculation.request).await;
        let outcome = DemandOutcome::new(calculation.request.pricing(), orders);
        self.store.update_outcome(id, &outcome)?;

        if let Some(mut analysis) = calculation.ingredient_analysis {
            for ingredient in &mut analysis.ingredients {
                ingredient.total_quantity = Decimal::ZERO;
            }
            analysis.scale_to(orders.unwrap_or(0));
            self.store.set_ingredient_analysis(id, &analysis)?;
        }
        self.store.get(id)
    }

    pub fn get(&self, id: CalculationId) -> Result<DemandCalculation> {
        self.store.get(id)
    }

    /// Newest first.
    pub fn list(&self, limit: Option<usize>) -> Result<Vec<DemandCalculation>> {
        self.store.list(limit)
    }

    pub fn delete(&self, id: CalculationId) -> Result<()> {
        self.store.delete(id)
    }

    /// Ask the LLM for an ingredient breakdown and store it.
    ///
    /// A reply that is not usable JSON is kept raw with no ingredients.
    ///
    /// # Errors
    ///
    /// A config error when no LLM is configured, or the LLM call error.
    pub async fn analyze_ingredients(&self, id: CalculationId) -> Result<DemandCalculation> {
        let llm = self
            .llm
            .as_ref()
            .ok_or(Error::Config(ConfigError::MissingField { field: "llm" }))?;
        let calculation = self.store.get(id)?;

        let prompt = ingredient_prompt(&calculation);
        let reply = llm.complete(INGREDIENT_SYSTEM_PROMPT, &prompt).await?;
        let mut analysis = parse_ingredients(&reply);
        analysis.scale_to(calculation.predicted_orders.unwrap_or(0));

        self.store.set_ingredient_analysis(id, &analysis)?;
        debug!(id = %id, provider = llm.name(), ingredients = analysis.ingredients.len(), "Stored ingredient analysis");
        self.store.get(id)
    }
}

fn ingredient_prompt(calculation: &DemandCalculation) -> String {
    let request = &calculation.request;
    let mut prompt = format!(
        "Dish: {}\nCategory: {}\nCuisine: {}\nMajor ingredients: {}\n",
        request.dish_name, request.category, request.cuisine, request.major_ingredients
    );
    if let Some(orders) = calculation.predicted_orders {
        prompt.push_str(&format!("Predicted orders: {orders}\n"));
    }
    prompt
}

fn parse_ingredients(reply: &str) -> IngredientAnalysis {
    let parsed = extract_json(reply)
        .and_then(|json| serde_json::from_str::<IngredientReply>(json).map_err(Into::into));
    match parsed {
        Ok(parsed) => IngredientAnalysis {
            ingredients: parsed.ingredients,
            notes: parsed.notes,
            raw_response: None,
        },
        Err(e) => {
            warn!(error = %e, "Ingredient reply was not valid JSON, storing raw text");
            IngredientAnalysis::unparsed(reply)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::llm::client::tests::MockLlm;
    use crate::adapter::outbound::predictor::http::tests::FixedPredictor;
    use crate::adapter::outbound::sqlite::database::connection::memory_pool;
    use crate::adapter::outbound::sqlite::SqliteDemandStore;
    use crate::domain::LedgerError;
    use rust_decimal_macros::dec;

    fn request() -> DemandRequest {
        DemandRequest {
            dish_name: "Margherita".into(),
            dish_price: dec!(250),
            major_ingredients: "flour, tomato, mozzarella".into(),
            category: "Pizza".into(),
            cuisine: "Italian".into(),
            emailed_in_promotions: true,
            featured_on_homepage: false,
            discount_applied: true,
            discount_percentage: dec!(10),
            city_name: "Springfield".into(),
            center_type: "TYPE_A".into(),
        }
    }

    fn service(orders: Option<i64>, llm: Option<MockLlm>) -> DemandService {
        DemandService::new(
            Arc::new(SqliteDemandStore::new(memory_pool())),
            Some(Arc::new(FixedPredictor(orders))),
            llm.map(|l| Arc::new(l) as Arc<dyn Llm>),
        )
    }

    #[tokio::test]
    async fn create_prices_and_predicts() {
        let calc = service(Some(120), None).create(&request()).await.unwrap();
        assert_eq!(calc.discount_amount, dec!(25));
        assert_eq!(calc.final_price, dec!(225));
        assert_eq!(calc.predicted_orders, Some(120));
        assert_eq!(calc.total_price, Some(dec!(27000)));
        assert!(calc.ingredient_analysis.is_none());
    }

    #[tokio::test]
    async fn predictor_failure_still_stores_calculation() {
        let service = service(None, None);
        let calc = service.create(&request()).await.unwrap();
        assert_eq!(calc.predicted_orders, None);
        assert_eq!(calc.total_price, None);
        assert_eq!(calc.final_price, dec!(225));
        assert_eq!(service.list(None).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_request_is_rejected() {
        let bad = DemandRequest {
            dish_name: " ".into(),
            ..request()
        };
        let err = service(Some(1), None).create(&bad).await.unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::Validation { .. })));
    }

    #[tokio::test]
    async fn analysis_scales_to_predicted_orders() {
        let reply = r#"{"ingredients": [{"name": "Flour", "quantity_per_dish": 0.2, "unit": "kg"}], "notes": "Order flour early"}"#;
        let service = service(Some(50), Some(MockLlm::new(reply)));
        let calc = service.create(&request()).await.unwrap();

        let analyzed = service.analyze_ingredients(calc.id).await.unwrap();
        let analysis = analyzed.ingredient_analysis.unwrap();
        assert_eq!(analysis.ingredients.len(), 1);
        assert_eq!(analysis.ingredients[0].total_quantity, dec!(10));
        assert_eq!(analysis.notes, "Order flour early");
        assert!(analysis.raw_response.is_none());
    }

    #[tokio::test]
    async fn malformed_analysis_is_stored_raw() {
        let service = service(Some(50), Some(MockLlm::new("Flour, lots of it.")));
        let calc = service.create(&request()).await.unwrap();

        let analysis = service
            .analyze_ingredients(calc.id)
            .await
            .unwrap()
            .ingredient_analysis
            .unwrap();
        assert!(analysis.ingredients.is_empty());
        assert_eq!(analysis.raw_response.as_deref(), Some("Flour, lots of it."));
    }

    #[tokio::test]
    async fn analysis_without_llm_is_config_error() {
        let service = service(Some(5), None);
        let calc = service.create(&request()).await.unwrap();
        let err = service.analyze_ingredients(calc.id).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingField { field: "llm" })));
    }

    #[tokio::test]
    async fn recalculate_updates_in_place() {
        let store = Arc::new(SqliteDemandStore::new(memory_pool()));
        let offline = DemandService::new(store.clone(), None, None);
        let calc = offline.create(&request()).await.unwrap();
        assert_eq!(calc.predicted_orders, None);

        let online = DemandService::new(store, Some(Arc::new(FixedPredictor(Some(80)))), None);
        let recalculated = online.recalculate(calc.id).await.unwrap();
        assert_eq!(recalculated.id, calc.id);
        assert_eq!(recalculated.predicted_orders, Some(80));
        assert_eq!(recalculated.total_price, Some(dec!(18000)));
        assert_eq!(online.list(None).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let service = service(Some(5), None);
        let calc = service.create(&request()).await.unwrap();
        service.delete(calc.id).unwrap();
        assert!(matches!(
            service.get(calc.id).unwrap_err().as_ledger(),
            Some(LedgerError::NotFound { .. })
        ));
    }
}
