//! Handlers for the `action` command group.

use std::io::Read;

use serde_json::{Map, Value};

use crate::adapter::inbound::cli::output;
use crate::application::ActionExecutor;
use crate::domain::{ActionResult, PendingAction, RawAction};
use crate::error::{Error, Result};

/// Read an argument, or stdin when it is `-`.
fn read_argument(raw: &str) -> Result<String> {
    if raw != "-" {
        return Ok(raw.to_string());
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Parse a single action object or an array of them.
pub(crate) fn parse_actions(input: &str) -> Result<Vec<RawAction>> {
    match serde_json::from_str::<Value>(input)? {
        Value::Array(values) => values
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(Error::from))
            .collect(),
        value => Ok(vec![serde_json::from_value(value)?]),
    }
}

fn parse_fields(input: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(input)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Parse(format!(
            "expected a JSON object of fields, got {other}"
        ))),
    }
}

/// Print one line per action result.
pub(crate) fn print_results(results: &[ActionResult]) {
    for result in results {
        if result.success {
            output::success(&result.message);
        } else if let Some(pending) = &result.pending {
            output::warning(&result.message);
            if let Ok(pending) = serde_json::to_string(pending) {
                output::hint(&format!(
                    "run pantry action complete '{pending}' '{{...}}' with the missing fields"
                ));
            }
        } else {
            output::error(&result.message);
        }
    }
}

/// Execute `action run`.
pub fn run(executor: &ActionExecutor, actions: &str) -> Result<()> {
    let actions = parse_actions(&read_argument(actions)?)?;
    let results = executor.execute_batch(&actions);

    if output::is_json() {
        output::json_result("action.run", &results);
        return Ok(());
    }
    print_results(&results);
    Ok(())
}

/// Execute `action complete`.
pub fn complete(executor: &ActionExecutor, pending: &str, fields: &str) -> Result<()> {
    let pending: PendingAction = serde_json::from_str(&read_argument(pending)?)?;
    let result = executor.complete(pending, parse_fields(fields)?);

    if output::is_json() {
        output::json_result("action.complete", &result);
        return Ok(());
    }
    print_results(std::slice::from_ref(&result));
    Ok(())
}
