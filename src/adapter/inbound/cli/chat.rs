//! Handler for `chat`.

use crate::adapter::inbound::cli::action::print_results;
use crate::adapter::inbound::cli::output;
use crate::application::Assistant;
use crate::error::Result;

/// Execute `chat`.
pub async fn execute(assistant: &Assistant, message: &[String]) -> Result<()> {
    let message = message.join(" ");
    let spinner = output::spinner("Thinking");
    let reply = assistant.chat(&message).await;
    output::spinner_done(&spinner);
    let reply = reply?;

    if output::is_json() {
        output::json_result("chat", &reply);
        return Ok(());
    }

    if !reply.response.is_empty() {
        output::lines(&reply.response);
    }
    if !reply.results.is_empty() {
        output::section("Actions");
        print_results(&reply.results);
    }
    if !reply.missing_info.is_empty() {
        output::section("Needs more information");
        for question in &reply.missing_info {
            output::note(&format!("- {question}"));
        }
    }
    Ok(())
}
