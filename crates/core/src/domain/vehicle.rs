use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::normalize_tag;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
    Cng,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Petrol => "petrol",
            Self::Diesel => "diesel",
            Self::Electric => "electric",
            Self::Hybrid => "hybrid",
            Self::Cng => "cng",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listing the catalog provider hands to the recommendation engine.
///
/// Candidates are read-only inputs. Numeric fields are stored as received and
/// sanitized through the `effective_*` accessors: the engine is an advisory
/// ranking aid, so a malformed listing is clamped into range and still ranked
/// instead of failing the whole request. Callers that need strict validation
/// must do it before the catalog reaches the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleCandidate {
    pub id: VehicleId,
    pub brand: String,
    pub name: String,
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<i64>,
    pub fuel_type: FuelType,
    #[serde(default)]
    pub features: BTreeSet<String>,
    #[serde(default)]
    pub rating: f64,
    pub category: String,
    /// Opaque popularity signal from the catalog feed. Presence alone makes the
    /// candidate eligible for the trending bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trending_signal: Option<u64>,
}

impl VehicleCandidate {
    pub fn new(
        id: u64,
        brand: impl Into<String>,
        name: impl Into<String>,
        price: i64,
        fuel_type: FuelType,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: VehicleId(id),
            brand: brand.into(),
            name: name.into(),
            price,
            original_price: None,
            fuel_type,
            features: BTreeSet::new(),
            rating: 0.0,
            category: category.into(),
            trending_signal: None,
        }
    }

    pub fn with_original_price(mut self, original_price: i64) -> Self {
        self.original_price = Some(original_price);
        self
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_trending_signal(mut self, signal: u64) -> Self {
        self.trending_signal = Some(signal);
        self
    }

    /// Price with negative values clamped to zero.
    pub fn effective_price(&self) -> u64 {
        self.price.max(0) as u64
    }

    /// Original price, only when it is a real markdown over the current price.
    pub fn effective_original_price(&self) -> Option<u64> {
        let original = self.original_price?.max(0) as u64;
        (original > self.effective_price()).then_some(original)
    }

    /// Rating clamped into `0.0..=5.0`; non-finite ratings count as unrated.
    pub fn effective_rating(&self) -> f64 {
        if self.rating.is_finite() {
            self.rating.clamp(0.0, 5.0)
        } else {
            0.0
        }
    }

    /// Whole-number discount against the original price, if any.
    pub fn discount_percent(&self) -> Option<u8> {
        let original = self.effective_original_price()?;
        let saved = original - self.effective_price();
        let percent = (saved as f64 / original as f64 * 100.0).round() as u8;
        (percent > 0).then_some(percent)
    }

    pub fn is_trending(&self) -> bool {
        self.trending_signal.is_some()
    }

    pub fn normalized_brand(&self) -> String {
        normalize_tag(&self.brand)
    }

    pub fn normalized_category(&self) -> String {
        normalize_tag(&self.category)
    }

    pub fn normalized_features(&self) -> BTreeSet<String> {
        self.features.iter().map(|feature| normalize_tag(feature)).collect()
    }

    /// True when `other` shares a brand or catalog category with this vehicle.
    pub fn shares_brand_or_category(&self, other: &VehicleCandidate) -> bool {
        self.normalized_brand() == other.normalized_brand()
            || self.normalized_category() == other.normalized_category()
    }
}

#[cfg(test)]
mod tests {
    use super::{FuelType, VehicleCandidate, VehicleId};

    fn activa() -> VehicleCandidate {
        VehicleCandidate::new(7, "Honda", "Activa 6G", 76_000, FuelType::Petrol, "scooter")
    }

    #[test]
    fn negative_price_is_clamped_to_zero() {
        let mut vehicle = activa();
        vehicle.price = -500;
        assert_eq!(vehicle.effective_price(), 0);
    }

    #[test]
    fn rating_is_clamped_and_nan_counts_as_unrated() {
        assert_eq!(activa().with_rating(7.5).effective_rating(), 5.0);
        assert_eq!(activa().with_rating(-1.0).effective_rating(), 0.0);
        assert_eq!(activa().with_rating(f64::NAN).effective_rating(), 0.0);
        assert_eq!(activa().with_rating(4.2).effective_rating(), 4.2);
    }

    #[test]
    fn discount_requires_original_above_price() {
        assert_eq!(activa().discount_percent(), None);
        assert_eq!(activa().with_original_price(76_000).discount_percent(), None);
        assert_eq!(activa().with_original_price(60_000).discount_percent(), None);
        assert_eq!(activa().with_original_price(80_000).discount_percent(), Some(5));
    }

    #[test]
    fn brand_or_category_match_ignores_case() {
        let anchor = activa();
        let same_brand =
            VehicleCandidate::new(8, "HONDA", "Shine", 80_000, FuelType::Petrol, "bike");
        let same_category =
            VehicleCandidate::new(9, "TVS", "Jupiter", 74_000, FuelType::Petrol, "Scooter");
        let unrelated =
            VehicleCandidate::new(10, "Bajaj", "Pulsar", 120_000, FuelType::Petrol, "bike");

        assert!(anchor.shares_brand_or_category(&same_brand));
        assert!(anchor.shares_brand_or_category(&same_category));
        assert!(!anchor.shares_brand_or_category(&unrelated));
    }

    #[test]
    fn candidate_deserializes_with_optional_fields_missing() {
        let raw = r#"{
            "id": 101,
            "brand": "Honda",
            "name": "CB350",
            "price": 125000,
            "fuel_type": "petrol",
            "category": "bike"
        }"#;

        let vehicle: VehicleCandidate = serde_json::from_str(raw).expect("candidate json");
        assert_eq!(vehicle.id, VehicleId(101));
        assert!(vehicle.features.is_empty());
        assert_eq!(vehicle.trending_signal, None);
        assert_eq!(vehicle.rating, 0.0);
    }
}
