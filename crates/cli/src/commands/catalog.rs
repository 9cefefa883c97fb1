use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use ridewise_core::config::AppConfig;
use ridewise_core::domain::vehicle::VehicleCandidate;

use super::{block_on, catalog_provider, CommandFailure, CommandResult};

const COMMAND: &str = "catalog";

#[derive(Debug, Clone, Default, Args)]
pub struct CatalogArgs {
    #[arg(long, value_name = "PATH", help = "Catalog JSON file (defaults to catalog.path)")]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct CatalogSummary {
    pub source: String,
    pub vehicles: usize,
    pub trending: usize,
    pub discounted: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_fuel_type: BTreeMap<String, usize>,
    pub price_range: Option<(u64, u64)>,
    pub listings: Vec<CatalogListing>,
}

#[derive(Debug, Serialize)]
pub struct CatalogListing {
    pub id: u64,
    pub brand: String,
    pub name: String,
    pub price: u64,
    pub fuel_type: String,
    pub category: String,
}

pub fn run(config: &AppConfig, args: &CatalogArgs) -> CommandResult {
    block_on(COMMAND, summarize(config, args))
}

async fn summarize(
    config: &AppConfig,
    args: &CatalogArgs,
) -> Result<CatalogSummary, CommandFailure> {
    let source = args
        .catalog
        .as_deref()
        .or(config.catalog.path.as_deref())
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "built-in demo catalog".to_string());
    let vehicles = catalog_provider(config, args.catalog.as_deref()).snapshot().await?;
    Ok(summary(source, &vehicles))
}

fn summary(source: String, vehicles: &[VehicleCandidate]) -> CatalogSummary {
    let mut by_category = BTreeMap::new();
    let mut by_fuel_type = BTreeMap::new();
    for vehicle in vehicles {
        *by_category.entry(vehicle.normalized_category()).or_insert(0) += 1;
        *by_fuel_type.entry(vehicle.fuel_type.as_str().to_string()).or_insert(0) += 1;
    }

    let prices = vehicles.iter().map(VehicleCandidate::effective_price);
    let price_range = prices.clone().min().zip(prices.max());

    CatalogSummary {
        source,
        vehicles: vehicles.len(),
        trending: vehicles.iter().filter(|vehicle| vehicle.is_trending()).count(),
        discounted: vehicles.iter().filter(|vehicle| vehicle.discount_percent().is_some()).count(),
        by_category,
        by_fuel_type,
        price_range,
        listings: vehicles
            .iter()
            .map(|vehicle| CatalogListing {
                id: vehicle.id.0,
                brand: vehicle.brand.clone(),
                name: vehicle.name.clone(),
                price: vehicle.effective_price(),
                fuel_type: vehicle.fuel_type.as_str().to_string(),
                category: vehicle.category.clone(),
            })
            .collect(),
    }
}
