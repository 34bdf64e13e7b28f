//! Command dispatch.
//!
//! Loads configuration, initializes logging and output, wires services
//! against the database and routes each subcommand to its handler.

use std::path::Path;

use tracing::debug;

use crate::adapter::inbound::cli::command::{
    ActionCommand, AnalyticsCommand, Cli, Commands, ConfigCommand, DemandCommand, ItemCommand,
    TransactionCommand,
};
use crate::adapter::inbound::cli::{
    action, analytics, chat, config, demand, items, output, paths, stock, transactions,
};
use crate::error::Result;
use crate::infrastructure::bootstrap::Services;
use crate::infrastructure::config::Config;

/// Database path: `--database`, then `database` in config, then the default.
fn database_path(cli_database: Option<&Path>, config: &Config) -> String {
    match (cli_database, &config.database) {
        (Some(path), _) => path.display().to_string(),
        (None, Some(path)) => path.clone(),
        (None, None) => paths::default_database().display().to_string(),
    }
}

/// Raise the log level for `-v` when `RUST_LOG` is not set.
fn apply_verbosity(config: &mut Config, verbose: u8) {
    match verbose {
        0 => {}
        1 => config.logging.level = "info".into(),
        2 => config.logging.level = "debug".into(),
        _ => config.logging.level = "trace".into(),
    }
}

/// Run the parsed command line.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    output::set_color(cli.color.forced());

    // These must work with a missing or broken config file.
    match &cli.command {
        Commands::Config(ConfigCommand::Init(args)) => {
            let path = args.path.as_deref().unwrap_or(&cli.config);
            return config::execute_init(path, args.force);
        }
        Commands::Config(ConfigCommand::Validate) => {
            return config::execute_validate(&cli.config);
        }
        _ => {}
    }

    let mut settings = Config::load_or_default(&cli.config)?;
    apply_verbosity(&mut settings, output::verbosity());
    settings.init_logging();

    let database = database_path(cli.database.as_deref(), &settings);
    debug!(config = %cli.config.display(), database = %database, "Starting command");

    if let Commands::Config(ConfigCommand::Show) = &cli.command {
        return config::execute_show(&settings, &database);
    }

    let services = Services::build(&settings, &database)?;
    let most_wasted_limit = settings.analytics.most_wasted_limit;

    match cli.command {
        Commands::Item(command) => match command {
            ItemCommand::Add(args) => items::add(&services.inventory, args),
            ItemCommand::List(args) => items::list(&services.inventory, args),
            ItemCommand::Show(args) => items::show(&services.inventory, &args.item),
            ItemCommand::Update(args) => items::update(&services.inventory, args),
            ItemCommand::Delete(args) => items::delete(&services.inventory, &args.item),
        },
        Commands::Tx(command) => match command {
            TransactionCommand::Record(args) => transactions::record(&services.inventory, args),
            TransactionCommand::List(args) => transactions::list(&services.inventory, args),
        },
        Commands::Action(command) => match command {
            ActionCommand::Run(args) => action::run(&services.executor, &args.actions),
            ActionCommand::Complete(args) => {
                action::complete(&services.executor, &args.pending, &args.fields)
            }
        },
        Commands::Analytics(command) => match command {
            AnalyticsCommand::Trends => analytics::trends(&services.analytics),
            AnalyticsCommand::Waste => analytics::waste(&services.analytics),
            AnalyticsCommand::Share => analytics::share(&services.analytics),
            AnalyticsCommand::Wasted(args) => analytics::most_wasted(
                &services.analytics,
                args.limit.unwrap_or(most_wasted_limit),
            ),
            AnalyticsCommand::Summary(args) => analytics::summary(
                &services.analytics,
                args.limit.unwrap_or(most_wasted_limit),
            ),
        },
        Commands::Alerts(args) => stock::alerts(
            &services.inventory,
            args.days.unwrap_or(settings.analytics.expiring_within_days),
        ),
        Commands::Reconcile => stock::reconcile(&services.inventory),
        Commands::Demand(command) => match command {
            DemandCommand::Create(args) => demand::create(&services.demand, args).await,
            DemandCommand::Recalculate(args) => demand::recalculate(&services.demand, args.id).await,
            DemandCommand::Show(args) => demand::show(&services.demand, args.id),
            DemandCommand::List(args) => demand::list(&services.demand, args.limit),
            DemandCommand::Delete(args) => demand::delete(&services.demand, args.id),
            DemandCommand::Analyze(args) => demand::analyze(&services.demand, args.id).await,
        },
        Commands::Chat(args) => chat::execute(&services.assistant, &args.message).await,
        Commands::Config(_) => Ok(()),
    }
}
