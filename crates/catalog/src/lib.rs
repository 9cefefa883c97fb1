pub mod fixtures;
pub mod providers;

pub use fixtures::{demo_catalog, demo_profiles, DEMO_COMMUTER_ID, DEMO_TOURER_ID};
pub use providers::{
    read_catalog_file, read_profile_file, CatalogProvider, InMemoryCatalog, InMemoryProfileStore,
    JsonFileCatalog, ProfileProvider, ProviderError,
};
