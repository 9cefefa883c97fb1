pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ridewise_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig};

#[derive(Debug, Parser)]
#[command(
    name = "ridewise",
    about = "Ridewise operator CLI",
    long_about = "Rank two-wheeler catalogs against rider profiles, explain scores, and inspect configuration.",
    after_help = "Examples:\n  ridewise recommend --user demo-commuter --category for-you\n  ridewise explain --profile rider.json --vehicle 101\n  ridewise catalog --catalog bikes.json\n  ridewise config"
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Explicit ridewise.toml path")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compute recommendation buckets for a rider profile and print them as JSON")]
    Recommend(commands::recommend::RecommendArgs),
    #[command(about = "Print the per-component score breakdown of one vehicle for a rider profile")]
    Explain(commands::explain::ExplainArgs),
    #[command(about = "Summarize the catalog snapshot the engine would rank")]
    Catalog(commands::catalog::CatalogArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Recommend(_) => "recommend",
            Self::Explain(_) => "explain",
            Self::Catalog(_) => "catalog",
            Self::Config => "config",
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let command_name = cli.command.name();

    let config = match AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: ConfigOverrides::default(),
    }) {
        Ok(config) => config,
        Err(error) => {
            let result = commands::CommandResult::failure(
                command_name,
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&config.logging);

    let result = match cli.command {
        Command::Recommend(args) => commands::recommend::run(&config, &args),
        Command::Explain(args) => commands::explain::run(&config, &args),
        Command::Catalog(args) => commands::catalog::run(&config, &args),
        Command::Config => commands::CommandResult {
            exit_code: 0,
            output: commands::config::run(&config, cli.config.as_deref()),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(logging: &LoggingConfig) {
    use tracing::Level;

    let log_level = logging.level.parse::<Level>().unwrap_or(Level::WARN);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(log_level);

    let _ = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
