use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::vehicle::FuelType;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UsagePattern {
    #[default]
    DailyCommute,
    Touring,
    OffRoad,
    Performance,
    Delivery,
}

/// Inclusive price band the rider is shopping in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: i64,
    pub max: i64,
}

impl BudgetRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Bounds with negatives clamped to zero and an inverted pair swapped.
    pub fn bounds(&self) -> (u64, u64) {
        let min = self.min.max(0) as u64;
        let max = self.max.max(0) as u64;
        if min <= max {
            (min, max)
        } else {
            (max, min)
        }
    }

    pub fn contains(&self, price: u64) -> bool {
        let (min, max) = self.bounds();
        (min..=max).contains(&price)
    }
}

/// Rider preferences as supplied by the profile provider. Immutable for the
/// duration of a recommendation request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub budget_range: BudgetRange,
    #[serde(default)]
    pub preferred_brands: BTreeSet<String>,
    #[serde(default)]
    pub preferred_fuel_types: BTreeSet<FuelType>,
    #[serde(default)]
    pub preferred_features: BTreeSet<String>,
    #[serde(default)]
    pub usage_pattern: UsagePattern,
}

impl UserProfile {
    pub fn new(budget_range: BudgetRange) -> Self {
        Self {
            budget_range,
            preferred_brands: BTreeSet::new(),
            preferred_fuel_types: BTreeSet::new(),
            preferred_features: BTreeSet::new(),
            usage_pattern: UsagePattern::default(),
        }
    }

    pub fn with_brands<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_brands = brands.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fuel_types<I>(mut self, fuel_types: I) -> Self
    where
        I: IntoIterator<Item = FuelType>,
    {
        self.preferred_fuel_types = fuel_types.into_iter().collect();
        self
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_usage_pattern(mut self, usage_pattern: UsagePattern) -> Self {
        self.usage_pattern = usage_pattern;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{BudgetRange, UsagePattern, UserProfile};

    #[test]
    fn inverted_budget_is_swapped() {
        let budget = BudgetRange::new(180_000, 75_000);
        assert_eq!(budget.bounds(), (75_000, 180_000));
        assert!(budget.contains(125_000));
    }

    #[test]
    fn negative_budget_bounds_clamp_to_zero() {
        assert_eq!(BudgetRange::new(-10, 50_000).bounds(), (0, 50_000));
        assert_eq!(BudgetRange::new(-10, -5).bounds(), (0, 0));
    }

    #[test]
    fn profile_deserializes_with_defaults() {
        let raw = r#"{ "budget_range": { "min": 50000, "max": 90000 } }"#;
        let profile: UserProfile = serde_json::from_str(raw).expect("profile json");

        assert!(profile.preferred_brands.is_empty());
        assert!(profile.preferred_fuel_types.is_empty());
        assert_eq!(profile.usage_pattern, UsagePattern::DailyCommute);
    }

    #[test]
    fn usage_pattern_uses_kebab_case_tags() {
        let parsed: UsagePattern = serde_json::from_str("\"off-road\"").expect("usage tag");
        assert_eq!(parsed, UsagePattern::OffRoad);
    }
}
