//! LLM-powered action extractor.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ItemId;
use crate::error::Result;
use crate::port::outbound::extractor::{ActionExtractor, ExtractedActions, InventoryContext};
use crate::port::outbound::llm::{extract_json, Llm};

const SYSTEM_PROMPT: &str = r#"You are the inventory assistant for a restaurant kitchen.
You read what staff say and turn it into inventory actions.

## Actions
- add_item: {"name", "category", "unit", "current_quantity", "min_quantity", "max_quantity", "cost_per_unit", "total_cost", "supplier", "expiration_date", "storage_location", "notes"}
- update_quantity: {"name", "new_quantity"}
- record_transaction: {"name", "transaction_type": "purchase" | "usage" | "waste" | "donation", "quantity", "cost", "notes", "date"}
- delete_item: {"name"}

## Output (JSON only)
```json
{
  "response": "Short reply to the user",
  "actions": [{"type": "record_transaction", "data": {"name": "Flour", "transaction_type": "waste", "quantity": 5}}],
  "missing_info": ["What did the flour cost per kg?"]
}
```

Rules:
- Use item names exactly as they appear in the inventory when referring to existing items
- Never invent costs or expiration dates; ask for them in missing_info instead
- Dates are YYYY-MM-DD
- Return an empty actions array when the message asks a question rather than requesting a change
"#;

/// Extracts actions by prompting an [`Llm`].
pub struct LlmActionExtractor {
    llm: Arc<dyn Llm>,
}

impl LlmActionExtractor {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    fn build_prompt(message: &str, context: &InventoryContext) -> String {
        let mut prompt = format!("Today is {}.\n\n## Inventory\n", context.today);
        if context.items.is_empty() {
            prompt.push_str("(empty)\n");
        }
        for item in &context.items {
            let _ = write!(
                prompt,
                "- {}: {} {} at {} per {} ({})",
                item.name,
                item.current_quantity,
                item.unit,
                item.cost_per_unit,
                item.unit,
                item.category
            );
            if let Some(expires) = item.expiration_date {
                let _ = write!(prompt, ", expires {expires}");
            }
            prompt.push('\n');
        }

        if !context.recent_transactions.is_empty() {
            let names: HashMap<ItemId, &str> = context
                .items
                .iter()
                .map(|i| (i.id, i.name.as_str()))
                .collect();
            prompt.push_str("\n## Recent transactions\n");
            for tx in &context.recent_transactions {
                let name = names.get(&tx.inventory_id).copied().unwrap_or("unknown item");
                let _ = writeln!(
                    prompt,
                    "- {} {} {} of {}",
                    tx.date, tx.transaction_type, tx.quantity, name
                );
            }
        }

        let _ = write!(prompt, "\n## Message\n{message}\n");
        prompt
    }

    /// Parse the model reply, keeping the raw text when it is not usable JSON.
    fn parse_response(response: &str) -> ExtractedActions {
        let parsed = extract_json(response).and_then(|json| {
            serde_json::from_str::<ExtractedActions>(json).map_err(Into::into)
        });
        match parsed {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!(error = %e, "Extractor reply was not valid JSON, returning raw text");
                ExtractedActions::text(response)
            }
        }
    }
}

#[async_trait]
impl ActionExtractor for LlmActionExtractor {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn extract(&self, message: &str, context: &InventoryContext) -> Result<ExtractedActions> {
        let prompt = Self::build_prompt(message, context);
        let response = self.llm.complete(SYSTEM_PROMPT, &prompt).await?;
        debug!(provider = self.llm.name(), "Action extraction complete");
        Ok(Self::parse_response(&response))
    }
}
