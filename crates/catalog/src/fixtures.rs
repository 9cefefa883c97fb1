use ridewise_core::domain::profile::{BudgetRange, UsagePattern, UserProfile};
use ridewise_core::domain::vehicle::{FuelType, VehicleCandidate};

pub const DEMO_COMMUTER_ID: &str = "demo-commuter";
pub const DEMO_TOURER_ID: &str = "demo-tourer";

struct VehicleSeed {
    id: u64,
    brand: &'static str,
    name: &'static str,
    price: i64,
    original_price: Option<i64>,
    fuel_type: FuelType,
    features: &'static [&'static str],
    rating: f64,
    category: &'static str,
    trending_signal: Option<u64>,
}

/// Demo marketplace listings, used when no catalog file is configured.
const SEED_VEHICLES: &[VehicleSeed] = &[
    VehicleSeed {
        id: 101,
        brand: "Honda",
        name: "CB350",
        price: 125_000,
        original_price: None,
        fuel_type: FuelType::Petrol,
        features: &["ABS", "LED Lights", "Digital Console"],
        rating: 4.5,
        category: "bike",
        trending_signal: Some(640),
    },
    VehicleSeed {
        id: 102,
        brand: "Honda",
        name: "Activa 6G",
        price: 78_000,
        original_price: Some(82_000),
        fuel_type: FuelType::Petrol,
        features: &["LED Lights", "External Fuel Lid"],
        rating: 4.3,
        category: "scooter",
        trending_signal: Some(910),
    },
    VehicleSeed {
        id: 103,
        brand: "Ather",
        name: "450X",
        price: 145_000,
        original_price: Some(155_000),
        fuel_type: FuelType::Electric,
        features: &["ABS", "Touchscreen", "Fast Charging"],
        rating: 4.6,
        category: "scooter",
        trending_signal: Some(770),
    },
    VehicleSeed {
        id: 104,
        brand: "Royal Enfield",
        name: "Classic 350",
        price: 193_000,
        original_price: Some(205_000),
        fuel_type: FuelType::Petrol,
        features: &["ABS", "Dual Channel ABS"],
        rating: 4.4,
        category: "cruiser",
        trending_signal: None,
    },
    VehicleSeed {
        id: 105,
        brand: "Hero",
        name: "Splendor Plus",
        price: 72_000,
        original_price: None,
        fuel_type: FuelType::Petrol,
        features: &["i3S"],
        rating: 4.1,
        category: "commuter",
        trending_signal: None,
    },
    VehicleSeed {
        id: 106,
        brand: "KTM",
        name: "Duke 390",
        price: 311_000,
        original_price: None,
        fuel_type: FuelType::Petrol,
        features: &["ABS", "Quickshifter", "TFT Display"],
        rating: 4.7,
        category: "sports",
        trending_signal: Some(520),
    },
    VehicleSeed {
        id: 107,
        brand: "TVS",
        name: "iQube",
        price: 118_000,
        original_price: Some(125_000),
        fuel_type: FuelType::Electric,
        features: &["Touchscreen", "Fast Charging"],
        rating: 4.2,
        category: "electric",
        trending_signal: Some(430),
    },
    VehicleSeed {
        id: 108,
        brand: "Bajaj",
        name: "Pulsar N160",
        price: 131_000,
        original_price: None,
        fuel_type: FuelType::Petrol,
        features: &["ABS", "LED Lights"],
        rating: 4.3,
        category: "bike",
        trending_signal: None,
    },
    VehicleSeed {
        id: 109,
        brand: "Royal Enfield",
        name: "Himalayan 450",
        price: 285_000,
        original_price: None,
        fuel_type: FuelType::Petrol,
        features: &["ABS", "Switchable ABS", "TFT Display"],
        rating: 4.6,
        category: "adventure",
        trending_signal: Some(580),
    },
    VehicleSeed {
        id: 110,
        brand: "Bajaj",
        name: "Freedom 125",
        price: 95_000,
        original_price: None,
        fuel_type: FuelType::Cng,
        features: &["Dual Fuel", "LED Lights"],
        rating: 4.0,
        category: "commuter",
        trending_signal: Some(300),
    },
    VehicleSeed {
        id: 111,
        brand: "Yamaha",
        name: "Fascino 125 Hybrid",
        price: 89_000,
        original_price: Some(92_000),
        fuel_type: FuelType::Hybrid,
        features: &["Smart Motor Generator", "LED Lights"],
        rating: 4.2,
        category: "scooter",
        trending_signal: None,
    },
    VehicleSeed {
        id: 112,
        brand: "Ola",
        name: "S1 Air",
        price: 105_000,
        original_price: Some(120_000),
        fuel_type: FuelType::Electric,
        features: &["Touchscreen", "Cruise Control"],
        rating: 3.9,
        category: "electric",
        trending_signal: Some(690),
    },
];

impl VehicleSeed {
    fn to_candidate(&self) -> VehicleCandidate {
        let mut vehicle = VehicleCandidate::new(
            self.id,
            self.brand,
            self.name,
            self.price,
            self.fuel_type,
            self.category,
        )
        .with_features(self.features.iter().copied())
        .with_rating(self.rating);
        if let Some(original_price) = self.original_price {
            vehicle = vehicle.with_original_price(original_price);
        }
        if let Some(signal) = self.trending_signal {
            vehicle = vehicle.with_trending_signal(signal);
        }
        vehicle
    }
}

pub fn demo_catalog() -> Vec<VehicleCandidate> {
    SEED_VEHICLES.iter().map(VehicleSeed::to_candidate).collect()
}

pub fn demo_profiles() -> Vec<(String, UserProfile)> {
    let commuter = UserProfile::new(BudgetRange::new(75_000, 180_000))
        .with_brands(["Honda"])
        .with_fuel_types([FuelType::Petrol])
        .with_features(["ABS"])
        .with_usage_pattern(UsagePattern::DailyCommute);

    let tourer = UserProfile::new(BudgetRange::new(180_000, 300_000))
        .with_brands(["Royal Enfield", "KTM"])
        .with_fuel_types([FuelType::Petrol])
        .with_features(["ABS", "TFT Display"])
        .with_usage_pattern(UsagePattern::Touring);

    vec![(DEMO_COMMUTER_ID.to_owned(), commuter), (DEMO_TOURER_ID.to_owned(), tourer)]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use ridewise_core::recommendations::{
        BadgeTag, RecommendationCategory, RecommendationEngine, RecommendationRequest,
    };

    use super::{demo_catalog, demo_profiles, DEMO_COMMUTER_ID};

    #[test]
    fn demo_catalog_ids_are_unique() {
        let catalog = demo_catalog();
        let ids: HashSet<_> = catalog.iter().map(|vehicle| vehicle.id).collect();

        assert_eq!(ids.len(), catalog.len());
        assert!(catalog.len() >= 12);
    }

    #[test]
    fn demo_commuter_gets_the_reference_perfect_match_first() {
        let (_, profile) = demo_profiles()
            .into_iter()
            .find(|(user_id, _)| user_id == DEMO_COMMUTER_ID)
            .expect("commuter profile");

        let set = RecommendationEngine::new()
            .compute_recommendations(
                &profile,
                &demo_catalog(),
                &RecommendationRequest::new(["for-you"]),
            )
            .expect("recommendations");

        let for_you = set.get(RecommendationCategory::ForYou).expect("for-you bucket");
        assert_eq!(for_you[0].vehicle_id.0, 101);
        assert_eq!(for_you[0].match_score, 99);
        assert_eq!(for_you[0].badge, BadgeTag::PerfectMatch);
    }
}
