//! Structured inventory actions.
//!
//! Actions arrive as loosely-typed `{type, data}` objects, either from a
//! caller or from the natural-language extractor. [`Action::decode`] turns
//! them into one variant per kind, validating required fields at the
//! boundary. Unknown kinds decode to [`LedgerError::UnsupportedAction`].

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::aggregate;
use super::error::LedgerError;
use super::id::{ItemId, TransactionId};
use super::item::{
    NewItem, DEFAULT_CATEGORY, DEFAULT_MAX_QUANTITY, DEFAULT_MIN_QUANTITY, DEFAULT_STORAGE,
    DEFAULT_SUPPLIER, DEFAULT_UNIT,
};
use super::transaction::TransactionType;

/// An action as submitted, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

impl RawAction {
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

/// Supported action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AddItem,
    UpdateQuantity,
    RecordTransaction,
    DeleteItem,
}

impl ActionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ActionKind::AddItem => "add_item",
            ActionKind::UpdateQuantity => "update_quantity",
            ActionKind::RecordTransaction => "record_transaction",
            ActionKind::DeleteItem => "delete_item",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "add_item" => Ok(ActionKind::AddItem),
            "update_quantity" => Ok(ActionKind::UpdateQuantity),
            "record_transaction" => Ok(ActionKind::RecordTransaction),
            "delete_item" => Ok(ActionKind::DeleteItem),
            other => Err(LedgerError::UnsupportedAction {
                kind: other.to_string(),
            }),
        }
    }
}

/// Payload of `add_item`. Everything but the name has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddItem {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub current_quantity: Option<Decimal>,
    #[serde(default)]
    pub min_quantity: Option<Decimal>,
    #[serde(default)]
    pub max_quantity: Option<Decimal>,
    #[serde(default)]
    pub cost_per_unit: Option<Decimal>,
    #[serde(default)]
    pub total_cost: Option<Decimal>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub storage_location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AddItem {
    /// Quantity being added, zero when absent.
    #[must_use]
    pub fn quantity(&self) -> Decimal {
        self.current_quantity.unwrap_or(Decimal::ZERO)
    }

    /// Cost fields the caller still has to supply.
    ///
    /// Stock cannot be added without knowing what it cost.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        if self.quantity() > Decimal::ZERO
            && self.cost_per_unit.is_none()
            && self.total_cost.is_none()
        {
            vec!["cost_per_unit"]
        } else {
            Vec::new()
        }
    }

    /// Total cost of the stock being added, derived from whichever cost
    /// field was supplied.
    ///
    /// # Errors
    /// Returns [`LedgerError::Validation`] when the product is out of range.
    pub fn stock_cost(&self) -> Result<Decimal, LedgerError> {
        match (self.total_cost, self.cost_per_unit) {
            (Some(total), _) => Ok(total),
            (None, Some(per_unit)) => aggregate::extended_cost(self.quantity(), per_unit),
            (None, None) => Ok(Decimal::ZERO),
        }
    }

    /// Item fields with documented defaults filled in.
    ///
    /// # Errors
    /// Returns [`LedgerError::Validation`] when a derived cost is out of range.
    pub fn to_new_item(&self) -> Result<NewItem, LedgerError> {
        let quantity = self.quantity();
        let cost_per_unit = match (self.cost_per_unit, self.total_cost) {
            (Some(per_unit), _) => per_unit,
            (None, Some(total)) if quantity > Decimal::ZERO => {
                aggregate::unit_cost(total, quantity)?
            }
            _ => Decimal::ZERO,
        };

        Ok(NewItem {
            name: self.name.trim().to_string(),
            category: or_default(&self.category, DEFAULT_CATEGORY),
            unit: or_default(&self.unit, DEFAULT_UNIT),
            current_quantity: quantity,
            min_quantity: self.min_quantity.unwrap_or(DEFAULT_MIN_QUANTITY),
            max_quantity: self.max_quantity.unwrap_or(DEFAULT_MAX_QUANTITY),
            cost_per_unit,
            total_cost: self.stock_cost()?,
            supplier: or_default(&self.supplier, DEFAULT_SUPPLIER),
            expiration_date: self.expiration_date,
            storage_location: or_default(&self.storage_location, DEFAULT_STORAGE),
            notes: self.notes.clone().unwrap_or_default(),
        })
    }
}

fn or_default(value: &Option<String>, default: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Payload of `update_quantity`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateQuantity {
    pub name: String,
    #[serde(alias = "quantity")]
    pub new_quantity: Decimal,
}

/// Payload of `record_transaction`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordTransaction {
    pub name: String,
    #[serde(deserialize_with = "transaction_type")]
    pub transaction_type: TransactionType,
    pub quantity: Decimal,
    #[serde(default)]
    pub cost: Option<Decimal>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl RecordTransaction {
    /// A purchase needs its cost; other types are zero-cost movements.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        if self.transaction_type == TransactionType::Purchase && self.cost.is_none() {
            vec!["cost"]
        } else {
            Vec::new()
        }
    }
}

fn transaction_type<'de, D>(deserializer: D) -> Result<TransactionType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

/// Payload of `delete_item`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteItem {
    pub name: String,
}

/// A validated action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddItem(AddItem),
    UpdateQuantity(UpdateQuantity),
    RecordTransaction(RecordTransaction),
    DeleteItem(DeleteItem),
}

impl Action {
    /// Validate a raw action into its typed variant.
    ///
    /// # Errors
    /// [`LedgerError::UnsupportedAction`] for an unknown kind,
    /// [`LedgerError::Validation`] for malformed or missing fields.
    pub fn decode(raw: &RawAction) -> Result<Self, LedgerError> {
        let kind: ActionKind = raw.kind.parse()?;
        let data = if raw.data.is_null() {
            Value::Object(Map::new())
        } else {
            raw.data.clone()
        };

        let action = match kind {
            ActionKind::AddItem => Action::AddItem(payload(data)?),
            ActionKind::UpdateQuantity => Action::UpdateQuantity(payload(data)?),
            ActionKind::RecordTransaction => Action::RecordTransaction(payload(data)?),
            ActionKind::DeleteItem => Action::DeleteItem(payload(data)?),
        };

        if action.name().trim().is_empty() {
            return Err(LedgerError::validation("name", "must not be empty"));
        }
        Ok(action)
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::AddItem(_) => ActionKind::AddItem,
            Action::UpdateQuantity(_) => ActionKind::UpdateQuantity,
            Action::RecordTransaction(_) => ActionKind::RecordTransaction,
            Action::DeleteItem(_) => ActionKind::DeleteItem,
        }
    }

    /// Name of the item the action targets.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Action::AddItem(a) => &a.name,
            Action::UpdateQuantity(a) => &a.name,
            Action::RecordTransaction(a) => &a.name,
            Action::DeleteItem(a) => &a.name,
        }
    }

    /// Fields that must be supplied before the action may run.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self {
            Action::AddItem(a) => a.missing_fields(),
            Action::RecordTransaction(a) => a.missing_fields(),
            Action::UpdateQuantity(_) | Action::DeleteItem(_) => Vec::new(),
        }
    }
}

fn payload<T: for<'de> Deserialize<'de>>(data: Value) -> Result<T, LedgerError> {
    serde_json::from_value(data).map_err(|e| LedgerError::validation("data", e.to_string()))
}

/// An action held back until the caller supplies missing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    pub action_type: ActionKind,
    /// The data submitted so far.
    pub data: Value,
    pub missing_fields: Vec<String>,
}

impl PendingAction {
    /// Merge supplied fields into the partial data and rebuild the action.
    #[must_use]
    pub fn complete(self, supplied: Map<String, Value>) -> RawAction {
        let mut data = match self.data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        data.extend(supplied);
        RawAction::new(self.action_type.as_str(), Value::Object(data))
    }
}

/// Why an action failed, for mapping to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionErrorKind {
    Validation,
    NotFound,
    Referential,
    UnsupportedAction,
    Storage,
}

impl From<&LedgerError> for ActionErrorKind {
    fn from(err: &LedgerError) -> Self {
        match err {
            LedgerError::Validation { .. } => ActionErrorKind::Validation,
            LedgerError::NotFound { .. } => ActionErrorKind::NotFound,
            LedgerError::Referential { .. } => ActionErrorKind::Referential,
            LedgerError::UnsupportedAction { .. } => ActionErrorKind::UnsupportedAction,
        }
    }
}

/// Outcome of one action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ActionErrorKind>,
}

impl ActionResult {
    pub fn completed(
        message: impl Into<String>,
        item_id: Option<ItemId>,
        transaction_id: Option<TransactionId>,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            item_id,
            transaction_id,
            pending: None,
            error: None,
        }
    }

    #[must_use]
    pub fn pending(pending: PendingAction) -> Self {
        let message = format!(
            "{} needs more information: {}",
            pending.action_type,
            pending.missing_fields.join(", ")
        );
        Self {
            success: false,
            message,
            item_id: None,
            transaction_id: None,
            pending: Some(pending),
            error: None,
        }
    }

    pub fn failed(kind: ActionErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            item_id: None,
            transaction_id: None,
            pending: None,
            error: Some(kind),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
