//! Infrastructure bootstrap helpers for runtime wiring.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::adapter::outbound::extractor::LlmActionExtractor;
use crate::adapter::outbound::llm::anthropic::Anthropic;
use crate::adapter::outbound::llm::openai::OpenAi;
use crate::adapter::outbound::predictor::HttpPredictor;
use crate::adapter::outbound::sqlite::database::connection::{
    create_pool, create_pool_with_size, enable_wal, run_migrations, DbPool,
};
use crate::adapter::outbound::sqlite::{SqliteDemandStore, SqliteLedger};
use crate::application::{
    ActionExecutor, AnalyticsEngine, Assistant, DemandService, InventoryService,
};
use crate::error::Result;
use crate::infrastructure::config::llm::{LlmConfig, LlmProvider};
use crate::infrastructure::config::predictor::PredictorConfig;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::extractor::ActionExtractor;
use crate::port::outbound::ledger::LedgerStore;
use crate::port::outbound::llm::Llm;
use crate::port::outbound::predictor::DemandPredictor;

const MEMORY_DATABASE: &str = ":memory:";

/// Open the database at `path`, creating parent directories and running
/// migrations. File databases use WAL.
pub fn open_database(path: &str) -> Result<DbPool> {
    if path == MEMORY_DATABASE {
        let pool = create_pool_with_size(path, 1)?;
        run_migrations(&pool)?;
        return Ok(pool);
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let pool = create_pool(path)?;
    run_migrations(&pool)?;
    enable_wal(&pool)?;
    debug!(database = path, "Database ready");
    Ok(pool)
}

/// Build the LLM client for the selected provider.
///
/// Returns `None` when the provider's API key is not in the environment.
pub(crate) fn build_llm_client(config: &LlmConfig) -> Option<Arc<dyn Llm>> {
    let key_var = config.provider.key_var();
    let Ok(api_key) = std::env::var(key_var) else {
        warn!(key = key_var, "API key not set, LLM features disabled");
        return None;
    };
    let settings = config.active();

    let client: Arc<dyn Llm> = match config.provider {
        LlmProvider::Anthropic => Arc::new(Anthropic::new(
            api_key,
            settings.model,
            settings.max_tokens,
            settings.temperature,
        )),
        LlmProvider::OpenAi => Arc::new(OpenAi::new(
            api_key,
            settings.model,
            settings.max_tokens,
            settings.temperature,
        )),
    };

    info!(provider = client.name(), model = settings.model, "LLM client initialized");
    Some(client)
}

/// Build the demand predictor when an endpoint is configured.
pub(crate) fn build_predictor(config: &PredictorConfig) -> Option<Arc<dyn DemandPredictor>> {
    let url = config.url.as_deref()?;
    match HttpPredictor::new(url, Duration::from_secs(config.timeout_secs)) {
        Ok(predictor) => {
            info!(url, "Demand predictor configured");
            Some(Arc::new(predictor))
        }
        Err(e) => {
            warn!(url, error = %e, "Failed to build demand predictor");
            None
        }
    }
}

/// Every application service, wired to one database.
pub struct Services {
    pub inventory: InventoryService,
    pub executor: ActionExecutor,
    pub analytics: AnalyticsEngine,
    pub demand: DemandService,
    pub assistant: Assistant,
}

impl Services {
    /// Wire services from configuration against the database at `database`.
    ///
    /// LLM-backed features are left unconfigured when the API key is
    /// missing or the assistant is disabled.
    pub fn build(config: &Config, database: &str) -> Result<Self> {
        let pool = open_database(database)?;
        let llm = build_llm_client(&config.llm);
        let predictor = build_predictor(&config.predictor);
        Ok(Self::with_collaborators(config, pool, llm, predictor))
    }

    /// Wire services from explicit collaborators.
    pub fn with_collaborators(
        config: &Config,
        pool: DbPool,
        llm: Option<Arc<dyn Llm>>,
        predictor: Option<Arc<dyn DemandPredictor>>,
    ) -> Self {
        let ledger: Arc<dyn LedgerStore> = Arc::new(SqliteLedger::new(pool.clone()));
        let extractor = llm
            .clone()
            .filter(|_| config.assistant.enabled)
            .map(|llm| Arc::new(LlmActionExtractor::new(llm)) as Arc<dyn ActionExtractor>);

        Self {
            inventory: InventoryService::new(Arc::clone(&ledger)),
            executor: ActionExecutor::new(Arc::clone(&ledger)),
            analytics: AnalyticsEngine::new(Arc::clone(&ledger)),
            demand: DemandService::new(Arc::new(SqliteDemandStore::new(pool)), predictor, llm),
            assistant: Assistant::new(ledger, extractor, config.assistant.transaction_context),
        }
    }
}
