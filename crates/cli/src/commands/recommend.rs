use std::path::PathBuf;

use clap::{ArgGroup, Args};

use ridewise_core::config::AppConfig;
use ridewise_core::domain::vehicle::VehicleId;
use ridewise_core::errors::ApplicationError;
use ridewise_core::recommendations::{
    RecommendationEngine, RecommendationRequest, RecommendationSet,
};

use super::{block_on, catalog_provider, CommandFailure, CommandResult, ProfileSource};

const COMMAND: &str = "recommend";

#[derive(Debug, Clone, Default, Args)]
#[command(group(ArgGroup::new("rider").required(true).args(["profile", "user"])))]
pub struct RecommendArgs {
    #[arg(long, value_name = "PATH", help = "Rider profile JSON file")]
    pub profile: Option<PathBuf>,
    #[arg(long, value_name = "USER_ID", help = "Stored rider profile id, e.g. demo-commuter")]
    pub user: Option<String>,
    #[arg(long, value_name = "PATH", help = "Catalog JSON file (defaults to catalog.path)")]
    pub catalog: Option<PathBuf>,
    #[arg(
        long = "category",
        value_name = "TAG",
        help = "for-you|trending|similar|budget; repeatable, all when omitted"
    )]
    pub categories: Vec<String>,
    #[arg(long, value_name = "VEHICLE_ID", help = "Anchor vehicle for the similar bucket")]
    pub anchor: Option<u64>,
    #[arg(long, help = "Per-category cap (defaults to recommendations.max_results)")]
    pub max_results: Option<usize>,
}

pub fn run(config: &AppConfig, args: &RecommendArgs) -> CommandResult {
    block_on(COMMAND, recommend(config, args))
}

async fn recommend(
    config: &AppConfig,
    args: &RecommendArgs,
) -> Result<RecommendationSet, CommandFailure> {
    let profile =
        ProfileSource::from_args(args.profile.as_ref(), args.user.as_deref())?.resolve().await?;
    let catalog = catalog_provider(config, args.catalog.as_deref()).snapshot().await?;

    let mut request = if args.categories.is_empty() {
        RecommendationRequest::all_categories()
    } else {
        RecommendationRequest::new(args.categories.iter().cloned())
    };
    if let Some(anchor_id) = args.anchor {
        let anchor = catalog
            .iter()
            .find(|vehicle| vehicle.id == VehicleId(anchor_id))
            .cloned()
            .ok_or(ApplicationError::VehicleNotFound(VehicleId(anchor_id)))?;
        request = request.with_anchor(anchor);
    }
    if let Some(max_results) = args.max_results {
        request = request.with_max_results(max_results);
    }

    let engine = RecommendationEngine::with_settings(config.recommendations);
    let set = engine
        .compute_recommendations(&profile, &catalog, &request)
        .map_err(ApplicationError::from)?;

    tracing::info!(
        event_name = "cli.recommend.completed",
        categories = set.categories().count(),
        items = set.total_items(),
        catalog_size = catalog.len(),
        "recommendations computed"
    );
    Ok(set)
}
