use std::path::PathBuf;

use clap::{ArgGroup, Args};

use ridewise_core::config::AppConfig;
use ridewise_core::domain::vehicle::VehicleId;
use ridewise_core::errors::ApplicationError;
use ridewise_core::recommendations::{RecommendationEngine, ScoreBreakdown};

use super::{block_on, catalog_provider, CommandFailure, CommandResult, ProfileSource};

const COMMAND: &str = "explain";

#[derive(Debug, Clone, Default, Args)]
#[command(group(ArgGroup::new("rider").required(true).args(["profile", "user"])))]
pub struct ExplainArgs {
    #[arg(long, value_name = "PATH", help = "Rider profile JSON file")]
    pub profile: Option<PathBuf>,
    #[arg(long, value_name = "USER_ID", help = "Stored rider profile id, e.g. demo-commuter")]
    pub user: Option<String>,
    #[arg(long, value_name = "PATH", help = "Catalog JSON file (defaults to catalog.path)")]
    pub catalog: Option<PathBuf>,
    #[arg(long, value_name = "VEHICLE_ID", help = "Vehicle to score")]
    pub vehicle: u64,
}

pub fn run(config: &AppConfig, args: &ExplainArgs) -> CommandResult {
    block_on(COMMAND, explain(config, args))
}

async fn explain(config: &AppConfig, args: &ExplainArgs) -> Result<ScoreBreakdown, CommandFailure> {
    let profile =
        ProfileSource::from_args(args.profile.as_ref(), args.user.as_deref())?.resolve().await?;
    let vehicle_id = VehicleId(args.vehicle);
    let vehicle = catalog_provider(config, args.catalog.as_deref())
        .find(vehicle_id)
        .await?
        .ok_or(ApplicationError::VehicleNotFound(vehicle_id))?;

    let engine = RecommendationEngine::with_settings(config.recommendations);
    Ok(engine.explain(&profile, &vehicle))
}
