use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use ridewise_core::domain::profile::UserProfile;
use ridewise_core::domain::vehicle::{VehicleCandidate, VehicleId};

use super::{CatalogProvider, ProviderError};

/// Catalog snapshot read from a JSON file on every call, so edits on disk are
/// picked up without a restart.
#[derive(Clone, Debug)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl CatalogProvider for JsonFileCatalog {
    async fn snapshot(&self) -> Result<Vec<VehicleCandidate>, ProviderError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ProviderError::Io { path: self.path.clone(), source })?;
        let vehicles = decode_catalog(&self.path, &raw)?;
        tracing::debug!(
            event_name = "catalog.file.loaded",
            path = %self.path.display(),
            vehicles = vehicles.len(),
            "catalog snapshot loaded"
        );
        Ok(vehicles)
    }

    async fn find(&self, id: VehicleId) -> Result<Option<VehicleCandidate>, ProviderError> {
        let vehicles = self.snapshot().await?;
        Ok(vehicles.into_iter().find(|vehicle| vehicle.id == id))
    }
}

/// Accepts either a bare array of vehicles or `{"vehicles": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Bare(Vec<VehicleCandidate>),
    Wrapped { vehicles: Vec<VehicleCandidate> },
}

pub fn read_catalog_file(path: &Path) -> Result<Vec<VehicleCandidate>, ProviderError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ProviderError::Io { path: path.to_path_buf(), source })?;
    decode_catalog(path, &raw)
}

pub fn read_profile_file(path: &Path) -> Result<UserProfile, ProviderError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ProviderError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw)
        .map_err(|source| ProviderError::Decode { path: path.to_path_buf(), source })
}

/// Duplicate ids keep the last entry and the result is ordered by id.
fn decode_catalog(path: &Path, raw: &str) -> Result<Vec<VehicleCandidate>, ProviderError> {
    let document: CatalogDocument = serde_json::from_str(raw)
        .map_err(|source| ProviderError::Decode { path: path.to_path_buf(), source })?;
    let vehicles = match document {
        CatalogDocument::Bare(vehicles) | CatalogDocument::Wrapped { vehicles } => vehicles,
    };

    let unique: BTreeMap<VehicleId, VehicleCandidate> =
        vehicles.into_iter().map(|vehicle| (vehicle.id, vehicle)).collect();
    Ok(unique.into_values().collect())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use ridewise_core::domain::vehicle::{FuelType, VehicleId};

    use super::{read_catalog_file, read_profile_file, JsonFileCatalog};
    use crate::providers::{CatalogProvider, ProviderError};

    const CATALOG: &str = r#"[
        {"id": 12, "brand": "Bajaj", "name": "Pulsar 150", "price": 110000,
         "fuel_type": "petrol", "features": ["ABS"], "rating": 4.2, "category": "bike"},
        {"id": 11, "brand": "Ola", "name": "S1 Pro", "price": 140000, "original_price": 150000,
         "fuel_type": "electric", "category": "electric", "trending_signal": 880}
    ]"#;

    #[tokio::test]
    async fn file_catalog_reads_bare_array_sorted_by_id() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("catalog.json");
        fs::write(&path, CATALOG).expect("write catalog");

        let catalog = JsonFileCatalog::new(&path);
        let vehicles = catalog.snapshot().await.expect("snapshot");

        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[0].id, VehicleId(11));
        assert_eq!(vehicles[0].fuel_type, FuelType::Electric);
        assert_eq!(vehicles[0].discount_percent(), Some(7));
        assert!(vehicles[1].features.contains("ABS"));

        let found = catalog.find(VehicleId(12)).await.expect("find");
        assert_eq!(found.map(|vehicle| vehicle.name), Some("Pulsar 150".to_owned()));
    }

    #[test]
    fn wrapped_document_is_accepted_and_duplicates_collapse() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"{"vehicles": [
                {"id": 5, "brand": "TVS", "name": "Raider", "price": 95000,
                 "fuel_type": "petrol", "category": "commuter"},
                {"id": 5, "brand": "TVS", "name": "Raider 125", "price": 97000,
                 "fuel_type": "petrol", "category": "commuter"}
            ]}"#,
        )
        .expect("write catalog");

        let vehicles = read_catalog_file(&path).expect("catalog");

        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].name, "Raider 125");
    }

    #[test]
    fn malformed_catalog_is_a_decode_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"{"cars": []}"#).expect("write catalog");

        assert!(matches!(read_catalog_file(&path), Err(ProviderError::Decode { .. })));
    }

    #[test]
    fn missing_profile_file_is_an_io_error() {
        let dir = TempDir::new().expect("tempdir");
        let result = read_profile_file(&dir.path().join("missing.json"));

        assert!(matches!(result, Err(ProviderError::Io { .. })));
    }

    #[test]
    fn profile_file_decodes_with_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("profile.json");
        fs::write(&path, r#"{"budget_range": {"min": 60000, "max": 120000}}"#)
            .expect("write profile");

        let profile = read_profile_file(&path).expect("profile");

        assert_eq!(profile.budget_range.bounds(), (60_000, 120_000));
        assert!(profile.preferred_brands.is_empty());
    }
}
