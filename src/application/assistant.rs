//! Natural-language inventory assistant.
//!
//! A message goes to the [`ActionExtractor`] together with a snapshot of the
//! inventory and recent history; whatever actions come back are executed as
//! a batch. The extractor is untrusted and optional, so the reply always
//! degrades to text rather than failing the request.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::application::executor::ActionExecutor;
use crate::application::inventory::today;
use crate::domain::{ActionResult, ItemFilter, RawAction, TransactionFilter};
use crate::error::Result;
use crate::port::outbound::extractor::{ActionExtractor, InventoryContext};
use crate::port::outbound::ledger::LedgerStore;

/// Reply shown to the user when no extractor is configured.
pub const DISABLED_REPLY: &str = "The inventory assistant is not configured.";

/// What the assistant did with one message.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssistantReply {
    pub response: String,
    pub actions: Vec<RawAction>,
    /// One result per action, in the same order.
    pub results: Vec<ActionResult>,
    pub missing_info: Vec<String>,
}

impl AssistantReply {
    fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Self::default()
        }
    }
}

/// Chat front end over the [`ActionExecutor`].
pub struct Assistant {
    ledger: Arc<dyn LedgerStore>,
    executor: ActionExecutor,
    extractor: Option<Arc<dyn ActionExtractor>>,
    transaction_context: usize,
}

impl Assistant {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        extractor: Option<Arc<dyn ActionExtractor>>,
        transaction_context: usize,
    ) -> Self {
        Self {
            executor: ActionExecutor::new(Arc::clone(&ledger)),
            ledger,
            extractor,
            transaction_context,
        }
    }

    /// Handle a message as of today.
    ///
    /// # Errors
    ///
    /// Only when the ledger cannot be read for context.
    pub async fn chat(&self, message: &str) -> Result<AssistantReply> {
        self.chat_on(message, today()).await
    }

    pub async fn chat_on(&self, message: &str, today: NaiveDate) -> Result<AssistantReply> {
        let Some(extractor) = &self.extractor else {
            return Ok(AssistantReply::text(DISABLED_REPLY));
        };

        let context = InventoryContext {
            today,
            items: self.ledger.list_items(&ItemFilter::default())?,
            recent_transactions: self.ledger.list_transactions(&TransactionFilter {
                limit: Some(self.transaction_context),
                ..TransactionFilter::default()
            })?,
        };

        let extracted = match extractor.extract(message, &context).await {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!(extractor = extractor.name(), error = %e, "Action extraction failed");
                return Ok(AssistantReply::text(format!(
                    "The assistant is unavailable right now: {e}"
                )));
            }
        };

        let results: Vec<ActionResult> = extracted
            .actions
            .iter()
            .map(|raw| self.executor.execute_on(raw, today))
            .collect();
        let succeeded = results.iter().filter(|r| r.success).count();
        info!(
            extractor = extractor.name(),
            actions = results.len(),
            succeeded,
            "Assistant message handled"
        );

        Ok(AssistantReply {
            response: extracted.response,
            actions: extracted.actions,
            results,
            missing_info: extracted.missing_info,
        })
    }
}
