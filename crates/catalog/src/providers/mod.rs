use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use ridewise_core::domain::profile::UserProfile;
use ridewise_core::domain::vehicle::{VehicleCandidate, VehicleId};
use ridewise_core::errors::ApplicationError;

pub mod file;
pub mod memory;

pub use file::{read_catalog_file, read_profile_file, JsonFileCatalog};
pub use memory::{InMemoryCatalog, InMemoryProfileStore};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("could not read `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("could not decode `{path}`: {source}")]
    Decode { path: PathBuf, source: serde_json::Error },
}

impl From<ProviderError> for ApplicationError {
    fn from(value: ProviderError) -> Self {
        ApplicationError::Catalog(value.to_string())
    }
}

/// Source of the candidate vehicles a recommendation run ranks.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Full catalog, ordered by vehicle id.
    async fn snapshot(&self) -> Result<Vec<VehicleCandidate>, ProviderError>;

    async fn find(&self, id: VehicleId) -> Result<Option<VehicleCandidate>, ProviderError>;
}

/// Lookup of stored rider profiles by user id.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn profile_for(&self, user_id: &str) -> Result<Option<UserProfile>, ProviderError>;
}
