//! Demand calculation records and pricing.
//!
//! A calculation captures one prediction request, the prices derived from
//! it, the predicted order count, and an optional ingredient breakdown.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::id::CalculationId;

/// Dish and restaurant attributes submitted for a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRequest {
    pub dish_name: String,
    pub dish_price: Decimal,
    #[serde(default)]
    pub major_ingredients: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub emailed_in_promotions: bool,
    #[serde(default)]
    pub featured_on_homepage: bool,
    #[serde(default)]
    pub discount_applied: bool,
    #[serde(default)]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub city_name: String,
    #[serde(default)]
    pub center_type: String,
}

impl DemandRequest {
    /// Check the request before pricing.
    ///
    /// # Errors
    /// Returns [`LedgerError::Validation`] for a blank dish name, a negative
    /// price, or a discount outside `0..=100`.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.dish_name.trim().is_empty() {
            return Err(LedgerError::validation("dish_name", "must not be empty"));
        }
        if self.dish_price < Decimal::ZERO {
            return Err(LedgerError::validation("dish_price", "must not be negative"));
        }
        if self.discount_applied
            && !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&self.discount_percentage)
        {
            return Err(LedgerError::validation(
                "discount_percentage",
                format!("must be between 0 and 100, got {}", self.discount_percentage),
            ));
        }
        Ok(())
    }

    /// Effective discount percentage; zero when no discount is applied.
    #[must_use]
    pub fn effective_discount(&self) -> Decimal {
        if self.discount_applied {
            self.discount_percentage
        } else {
            Decimal::ZERO
        }
    }

    /// Price after discount.
    #[must_use]
    pub fn pricing(&self) -> Pricing {
        Pricing::new(self.dish_price, self.effective_discount())
    }

    /// Features for the demand predictor.
    #[must_use]
    pub fn features(&self) -> DemandFeatures {
        let pricing = self.pricing();
        DemandFeatures {
            checkout_price: pricing.final_price,
            base_price: self.dish_price,
            emailer_for_promotion: u8::from(self.emailed_in_promotions),
            homepage_featured: u8::from(self.featured_on_homepage),
            center_type: self.center_type.clone(),
            category: self.category.clone(),
            cuisine: self.cuisine.clone(),
            discount_amount: pricing.discount_amount,
            discount_percent: self.effective_discount(),
            discounted: !pricing.discount_amount.is_zero(),
        }
    }
}

/// Price breakdown, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pricing {
    pub discount_amount: Decimal,
    pub final_price: Decimal,
}

impl Pricing {
    #[must_use]
    pub fn new(price: Decimal, discount_percentage: Decimal) -> Self {
        let discount_amount = (price * discount_percentage / Decimal::ONE_HUNDRED).round_dp(2);
        Self {
            discount_amount,
            final_price: (price - discount_amount).round_dp(2),
        }
    }

    /// Revenue for a predicted order count.
    #[must_use]
    pub fn total_price(&self, predicted_orders: i64) -> Decimal {
        (self.final_price * Decimal::from(predicted_orders)).round_dp(2)
    }
}

/// Feature vector consumed by the predictor, in its column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandFeatures {
    pub checkout_price: Decimal,
    pub base_price: Decimal,
    pub emailer_for_promotion: u8,
    pub homepage_featured: u8,
    pub center_type: String,
    pub category: String,
    pub cuisine: String,
    pub discount_amount: Decimal,
    pub discount_percent: Decimal,
    pub discounted: bool,
}

/// Estimated use of one ingredient for the predicted orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientEstimate {
    pub name: String,
    #[serde(default)]
    pub quantity_per_dish: Decimal,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub total_quantity: Decimal,
}

/// Ingredient breakdown attached to a calculation.
///
/// When the model reply could not be parsed, `ingredients` is empty and
/// `raw_response` holds the reply as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientAnalysis {
    #[serde(default)]
    pub ingredients: Vec<IngredientEstimate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl IngredientAnalysis {
    /// An analysis that only carries the unparsed reply.
    pub fn unparsed(raw: impl Into<String>) -> Self {
        Self {
            ingredients: Vec::new(),
            notes: String::new(),
            raw_response: Some(raw.into()),
        }
    }

    /// Fill in missing totals from the per-dish quantity.
    pub fn scale_to(&mut self, predicted_orders: i64) {
        let orders = Decimal::from(predicted_orders);
        for ingredient in &mut self.ingredients {
            if ingredient.total_quantity.is_zero() {
                ingredient.total_quantity = ingredient.quantity_per_dish * orders;
            }
        }
    }
}

/// A stored demand calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandCalculation {
    pub id: CalculationId,
    #[serde(flatten)]
    pub request: DemandRequest,
    /// `None` when the predictor was unavailable.
    pub predicted_orders: Option<i64>,
    pub final_price: Decimal,
    pub total_price: Option<Decimal>,
    pub discount_amount: Decimal,
    pub ingredient_analysis: Option<IngredientAnalysis>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived fields written on create and on recalculation.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandOutcome {
    pub predicted_orders: Option<i64>,
    pub final_price: Decimal,
    pub total_price: Option<Decimal>,
    pub discount_amount: Decimal,
}

impl DemandOutcome {
    /// Combine pricing with an optional prediction.
    #[must_use]
    pub fn new(pricing: Pricing, predicted_orders: Option<i64>) -> Self {
        Self {
            predicted_orders,
            final_price: pricing.final_price,
            total_price: predicted_orders.map(|orders| pricing.total_price(orders)),
            discount_amount: pricing.discount_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn pricing_applies_discount() {
        let pricing = request().pricing();
        assert_eq!(pricing.discount_amount, dec!(25));
        assert_eq!(pricing.final_price, dec!(225));
        assert_eq!(pricing.total_price(40), dec!(9000));
    }

    #[test]
    fn discount_ignored_when_not_applied() {
        let mut req = request();
        req.discount_applied = false;
        let pricing = req.pricing();
        assert!(pricing.discount_amount.is_zero());
        assert_eq!(pricing.final_price, dec!(250));
        assert!(!req.features().discounted);
        assert!(req.features().discount_percent.is_zero());
    }

    #[test]
    fn features_follow_request() {
        let features = request().features();
        assert_eq!(features.checkout_price, dec!(225));
        assert_eq!(features.base_price, dec!(250));
        assert_eq!(features.emailer_for_promotion, 1);
        assert_eq!(features.homepage_featured, 0);
        assert!(features.discounted);
    }

    #[test]
    fn validate_rejects_bad_discount() {
        let mut req = request();
        req.discount_percentage = dec!(120);
        assert!(matches!(
            req.validate(),
            Err(LedgerError::Validation {
                field: "discount_percentage",
                ..
            })
        ));
    }

    #[test]
    fn outcome_without_prediction_has_no_total() {
        let outcome = DemandOutcome::new(request().pricing(), None);
        assert!(outcome.total_price.is_none());
        assert_eq!(outcome.final_price, dec!(225));
    }

    #[test]
    fn analysis_scales_missing_totals() {
        let mut analysis = IngredientAnalysis {
            ingredients: vec![IngredientEstimate {
                name: "flour".into(),
                quantity_per_dish: dec!(0.2),
                unit: "kg".into(),
                total_quantity: Decimal::ZERO,
            }],
            notes: String::new(),
            raw_response: None,
        };
        analysis.scale_to(50);
        assert_eq!(analysis.ingredients[0].total_quantity, dec!(10.0));
    }
}
