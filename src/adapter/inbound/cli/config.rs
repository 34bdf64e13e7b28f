//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::PREDICTOR_URL_VAR;
use crate::infrastructure::config::Config;

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../../../config.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    if output::is_json() {
        output::json_output(serde_json::json!({
            "command": "config.init",
            "result": { "path": path.display().to_string() },
        }));
        return Ok(());
    }
    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your settings", path.display()));
    output::note("2. Set OPENAI_API_KEY or ANTHROPIC_API_KEY for the assistant");
    output::note(&format!("3. Run: pantry config validate -c {}", path.display()));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(config: &Config, database: &str) -> Result<()> {
    if output::is_json() {
        output::json_result("config.show", config);
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("Database", database);
    output::field(
        "Logging",
        format!("{} ({})", config.logging.level, config.logging.format),
    );

    output::section("LLM");
    let llm = config.llm.active();
    let key_var = config.llm.provider.key_var();
    output::field("Model", llm.model);
    output::field("Temperature", llm.temperature);
    output::field("Max tokens", llm.max_tokens);
    if std::env::var(key_var).is_ok() {
        output::success(&format!("API key loaded from {key_var}"));
    } else {
        output::warning(&format!("{key_var} not set, assistant and ingredient analysis disabled"));
    }

    output::section("Assistant");
    output::field("Enabled", if config.assistant.enabled { "yes" } else { "no" });
    output::field("Context", format!("{} transactions", config.assistant.transaction_context));

    output::section("Demand Predictor");
    match &config.predictor.url {
        Some(url) => {
            output::field("URL", url);
            output::field("Timeout", format!("{}s", config.predictor.timeout_secs));
        }
        None => output::note(&format!(
            "(not configured; set predictor.url or {PREDICTOR_URL_VAR})"
        )),
    }

    output::section("Analytics");
    output::field("Most wasted", config.analytics.most_wasted_limit);
    output::field(
        "Expiry window",
        format!("{} days", config.analytics.expiring_within_days),
    );
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    Config::load(path)?;

    if output::is_json() {
        output::json_output(serde_json::json!({
            "command": "config.validate",
            "result": { "path": path.display().to_string(), "valid": true },
        }));
        return Ok(());
    }
    output::section("Config Validation");
    output::field("Path", path.display());
    output::success("Config file is valid");
    output::field("Next", format!("pantry config show -c {}", path.display()));
    Ok(())
}
