use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;

use ridewise_core::domain::profile::UserProfile;
use ridewise_core::domain::vehicle::{VehicleCandidate, VehicleId};

use super::{CatalogProvider, ProfileProvider, ProviderError};

#[derive(Default)]
pub struct InMemoryCatalog {
    vehicles: RwLock<BTreeMap<VehicleId, VehicleCandidate>>,
}

impl InMemoryCatalog {
    /// Later entries with a repeated id replace earlier ones.
    pub fn with_vehicles(vehicles: impl IntoIterator<Item = VehicleCandidate>) -> Self {
        let vehicles = vehicles.into_iter().map(|vehicle| (vehicle.id, vehicle)).collect();
        Self { vehicles: RwLock::new(vehicles) }
    }

    pub async fn save(&self, vehicle: VehicleCandidate) {
        let mut vehicles = self.vehicles.write().await;
        vehicles.insert(vehicle.id, vehicle);
    }

}

#[async_trait::async_trait]
impl CatalogProvider for InMemoryCatalog {
    async fn snapshot(&self) -> Result<Vec<VehicleCandidate>, ProviderError> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.values().cloned().collect())
    }

    async fn find(&self, id: VehicleId) -> Result<Option<VehicleCandidate>, ProviderError> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.get(&id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryProfileStore {
    pub fn with_profiles<I, S>(profiles: I) -> Self
    where
        I: IntoIterator<Item = (S, UserProfile)>,
        S: Into<String>,
    {
        let profiles = profiles.into_iter().map(|(user_id, profile)| (user_id.into(), profile));
        Self { profiles: RwLock::new(profiles.collect()) }
    }

    pub async fn save(&self, user_id: impl Into<String>, profile: UserProfile) {
        let mut profiles = self.profiles.write().await;
        profiles.insert(user_id.into(), profile);
    }
}

#[async_trait::async_trait]
impl ProfileProvider for InMemoryProfileStore {
    async fn profile_for(&self, user_id: &str) -> Result<Option<UserProfile>, ProviderError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(user_id.trim()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use ridewise_core::domain::profile::{BudgetRange, UserProfile};
    use ridewise_core::domain::vehicle::{FuelType, VehicleCandidate, VehicleId};

    use crate::providers::{CatalogProvider, InMemoryCatalog, InMemoryProfileStore, ProfileProvider};

    fn scooter(id: u64) -> VehicleCandidate {
        VehicleCandidate::new(id, "TVS", "Jupiter", 76_000, FuelType::Petrol, "scooter")
    }

    #[tokio::test]
    async fn catalog_snapshot_is_ordered_by_id() {
        let catalog = InMemoryCatalog::with_vehicles([scooter(30), scooter(10), scooter(20)]);

        let snapshot = catalog.snapshot().await.expect("snapshot");
        let ids: Vec<u64> = snapshot.iter().map(|vehicle| vehicle.id.0).collect();

        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn catalog_save_replaces_vehicle_with_same_id() {
        let catalog = InMemoryCatalog::default();
        catalog.save(scooter(7)).await;
        catalog.save(scooter(7).with_rating(4.9)).await;

        assert_eq!(catalog.snapshot().await.expect("snapshot").len(), 1);
        let found = catalog.find(VehicleId(7)).await.expect("find").expect("vehicle 7");
        assert_eq!(found.rating, 4.9);
        assert!(catalog.find(VehicleId(8)).await.expect("find").is_none());
    }

    #[tokio::test]
    async fn profile_store_looks_up_trimmed_user_id() {
        let profile = UserProfile::new(BudgetRange::new(50_000, 90_000));
        let store = InMemoryProfileStore::with_profiles([("rider-1", profile.clone())]);

        assert_eq!(store.profile_for(" rider-1 ").await.expect("lookup"), Some(profile));
        assert_eq!(store.profile_for("rider-2").await.expect("lookup"), None);
    }
}
