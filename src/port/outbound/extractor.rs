//! Natural-language action extraction port.
//!
//! The extractor turns a free-text request into structured actions. Its
//! output is untrusted: every action is validated again by the executor.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{InventoryItem, InventoryTransaction, RawAction};
use crate::error::Result;

/// Ledger state handed to the extractor alongside the message.
#[derive(Debug, Clone, Default)]
pub struct InventoryContext {
    /// Date that relative phrases such as "today" resolve to.
    pub today: NaiveDate,
    pub items: Vec<InventoryItem>,
    /// Most recent transactions, newest first.
    pub recent_transactions: Vec<InventoryTransaction>,
}

/// Structured reply from the extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedActions {
    /// Text meant for the user.
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub actions: Vec<RawAction>,
    /// Questions the user still has to answer.
    #[serde(default)]
    pub missing_info: Vec<String>,
}

impl ExtractedActions {
    /// A reply that only carries text.
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Self::default()
        }
    }
}

/// Turns free text into structured inventory actions.
#[async_trait]
pub trait ActionExtractor: Send + Sync {
    /// Return the extractor name for logging.
    fn name(&self) -> &'static str;

    /// Extract actions from `message`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the collaborator cannot be reached.
    /// Unparseable output is reported as text with no actions.
    async fn extract(&self, message: &str, context: &InventoryContext) -> Result<ExtractedActions>;
}
