//! Scoring algorithms for vehicle recommendations

use std::collections::{BTreeSet, HashSet};

use crate::domain::normalize_tag;
use crate::domain::profile::UserProfile;
use crate::domain::vehicle::{FuelType, VehicleCandidate};
use crate::errors::DomainError;

use super::types::*;
use super::{
    BEST_VALUE_THRESHOLD, DEFAULT_BUDGET_PICK_FACTOR, DEFAULT_BUDGET_TOLERANCE,
    DEFAULT_MAX_RESULTS, MAX_COMPONENT_REASONS, MAX_MATCH_REASONS, MAX_MATCH_SCORE,
    PERFECT_MATCH_THRESHOLD,
};

/// Maximum points per scoring component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Points for a price inside the budget band (default: 30)
    pub budget: u32,
    /// Points for a preferred brand (default: 25)
    pub brand: u32,
    /// Points for a preferred fuel type (default: 20)
    pub fuel: u32,
    /// Points for full preferred-feature coverage (default: 15)
    pub feature: u32,
    /// Points for a 5/5 rating (default: 10)
    pub rating: u32,
}

impl ScoringWeights {
    /// Sum of all weights, saturating at `u32::MAX`.
    pub fn total(&self) -> u32 {
        [self.budget, self.brand, self.fuel, self.feature, self.rating]
            .into_iter()
            .fold(0, u32::saturating_add)
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Tunables for a recommendation engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationSettings {
    pub weights: ScoringWeights,
    pub max_results: usize,
    pub budget_tolerance: f64,
    pub budget_pick_factor: f64,
    pub perfect_match_threshold: u8,
    pub best_value_threshold: u8,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            max_results: DEFAULT_MAX_RESULTS,
            budget_tolerance: DEFAULT_BUDGET_TOLERANCE,
            budget_pick_factor: DEFAULT_BUDGET_PICK_FACTOR,
            perfect_match_threshold: PERFECT_MATCH_THRESHOLD,
            best_value_threshold: BEST_VALUE_THRESHOLD,
        }
    }
}

impl RecommendationSettings {
    /// Recalibrated settings must stay on the 0-100 scale and keep badge
    /// thresholds ordered.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.weights.total() != u32::from(MAX_MATCH_SCORE) {
            return Err(DomainError::InvariantViolation(format!(
                "scoring weights must sum to {MAX_MATCH_SCORE}, got {}",
                self.weights.total()
            )));
        }
        if self.max_results == 0 {
            return Err(DomainError::InvariantViolation(
                "max_results must be greater than zero".to_owned(),
            ));
        }
        if !self.budget_tolerance.is_finite() || self.budget_tolerance <= 0.0 {
            return Err(DomainError::InvariantViolation(
                "budget_tolerance must be a positive number".to_owned(),
            ));
        }
        if !self.budget_pick_factor.is_finite() || self.budget_pick_factor < 1.0 {
            return Err(DomainError::InvariantViolation(
                "budget_pick_factor must be at least 1.0".to_owned(),
            ));
        }
        if self.perfect_match_threshold > MAX_MATCH_SCORE
            || self.best_value_threshold >= self.perfect_match_threshold
        {
            return Err(DomainError::InvariantViolation(
                "badge thresholds must satisfy best_value < perfect_match <= 100".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Profile with tags case-folded and the budget band normalized, built once
/// per request so every candidate is scored against the same view.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProfile {
    pub budget: (u64, u64),
    pub brands: HashSet<String>,
    pub fuel_types: BTreeSet<FuelType>,
    pub features: BTreeSet<String>,
}

impl From<&UserProfile> for NormalizedProfile {
    fn from(profile: &UserProfile) -> Self {
        Self {
            budget: profile.budget_range.bounds(),
            brands: profile
                .preferred_brands
                .iter()
                .map(|brand| normalize_tag(brand))
                .filter(|brand| !brand.is_empty())
                .collect(),
            fuel_types: profile.preferred_fuel_types.clone(),
            features: profile
                .preferred_features
                .iter()
                .map(|feature| normalize_tag(feature))
                .filter(|feature| !feature.is_empty())
                .collect(),
        }
    }
}

/// Score calculator for vehicle recommendations
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    settings: RecommendationSettings,
}

impl ScoreCalculator {
    /// Create a new score calculator with default settings
    pub fn new() -> Self {
        Self { settings: RecommendationSettings::default() }
    }

    /// Create with custom settings
    pub fn with_settings(settings: RecommendationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RecommendationSettings {
        &self.settings
    }

    /// Full points inside the band, decaying linearly to zero once the price
    /// is `budget_tolerance` (relative to the violated bound) outside it.
    pub fn budget_score(&self, price: u64, budget: (u64, u64)) -> u32 {
        let weight = self.settings.weights.budget;
        let (min, max) = budget;
        if (min..=max).contains(&price) {
            return weight;
        }

        let (distance, bound) = if price < min { (min - price, min) } else { (price - max, max) };
        let tolerance = self.settings.budget_tolerance;
        if bound == 0 || tolerance <= 0.0 {
            return 0;
        }

        let divergence = distance as f64 / bound as f64;
        if divergence >= tolerance {
            return 0;
        }

        (f64::from(weight) * (1.0 - divergence / tolerance)).round() as u32
    }

    pub fn brand_score(&self, candidate: &VehicleCandidate, profile: &NormalizedProfile) -> u32 {
        if profile.brands.contains(&candidate.normalized_brand()) {
            self.settings.weights.brand
        } else {
            0
        }
    }

    pub fn fuel_score(&self, candidate: &VehicleCandidate, profile: &NormalizedProfile) -> u32 {
        if profile.fuel_types.contains(&candidate.fuel_type) {
            self.settings.weights.fuel
        } else {
            0
        }
    }

    /// Share of preferred features the vehicle carries, scaled to the weight.
    pub fn feature_score(&self, candidate: &VehicleCandidate, profile: &NormalizedProfile) -> u32 {
        if profile.features.is_empty() {
            return 0;
        }

        let offered = candidate.normalized_features();
        let matched = profile.features.iter().filter(|feature| offered.contains(*feature)).count();
        let coverage = matched as f64 / profile.features.len().max(1) as f64;

        (f64::from(self.settings.weights.feature) * coverage).round() as u32
    }

    pub fn rating_score(&self, candidate: &VehicleCandidate) -> u32 {
        (candidate.effective_rating() * f64::from(self.settings.weights.rating) / 5.0).round()
            as u32
    }

    pub fn component_scores(
        &self,
        candidate: &VehicleCandidate,
        profile: &NormalizedProfile,
    ) -> ComponentScores {
        ComponentScores {
            budget: self.budget_score(candidate.effective_price(), profile.budget),
            brand: self.brand_score(candidate, profile),
            fuel: self.fuel_score(candidate, profile),
            feature: self.feature_score(candidate, profile),
            rating: self.rating_score(candidate),
        }
    }

    /// Calculate total score, clamped to the 0-100 scale
    pub fn calculate_total_score(&self, component_scores: &ComponentScores) -> u8 {
        component_scores.sum().min(u32::from(MAX_MATCH_SCORE)) as u8
    }

    /// Whether a candidate belongs in a recommendation bucket.
    ///
    /// `similar` requires an anchor and matches on brand or catalog category;
    /// the anchor itself (same id) is never returned as similar to itself.
    /// `budget` admits prices up to `budget_pick_factor` times the budget floor.
    pub fn is_eligible(
        &self,
        category: RecommendationCategory,
        candidate: &VehicleCandidate,
        profile: &NormalizedProfile,
        anchor: Option<&VehicleCandidate>,
    ) -> bool {
        match category {
            RecommendationCategory::ForYou => true,
            RecommendationCategory::Trending => candidate.is_trending(),
            RecommendationCategory::Similar => anchor.is_some_and(|anchor| {
                anchor.id != candidate.id && anchor.shares_brand_or_category(candidate)
            }),
            RecommendationCategory::Budget => {
                let ceiling = profile.budget.0 as f64 * self.settings.budget_pick_factor;
                candidate.effective_price() as f64 <= ceiling
            }
        }
    }

    pub fn determine_badge(&self, match_score: u8, category: RecommendationCategory) -> BadgeTag {
        if match_score >= self.settings.perfect_match_threshold {
            BadgeTag::PerfectMatch
        } else if category == RecommendationCategory::Budget
            && match_score >= self.settings.best_value_threshold
        {
            BadgeTag::BestValue
        } else if category == RecommendationCategory::Trending {
            BadgeTag::Trending
        } else {
            BadgeTag::GoodMatch
        }
    }

    /// Generate human-readable reasons: the two strongest components, then an
    /// optional category-specific line.
    pub fn generate_reasons(
        &self,
        component_scores: &ComponentScores,
        contextual: Option<String>,
    ) -> Vec<String> {
        let mut reasons: Vec<String> = component_scores
            .ranked()
            .into_iter()
            .take(MAX_COMPONENT_REASONS)
            .map(|(component, points)| self.component_reason(component, points).to_owned())
            .collect();

        if let Some(reason) = contextual {
            reasons.push(reason);
        }

        reasons.truncate(MAX_MATCH_REASONS);
        reasons
    }

    fn component_reason(&self, component: ScoreComponent, points: u32) -> &'static str {
        match component {
            ScoreComponent::Budget if points >= self.settings.weights.budget => {
                "Within your budget range"
            }
            ScoreComponent::Budget => "Close to your budget range",
            ScoreComponent::Brand => "Matches your preferred brand",
            ScoreComponent::Fuel => "Matches your preferred fuel type",
            ScoreComponent::Feature => "Has features you asked for",
            ScoreComponent::Rating => "Well rated by owners",
        }
    }

    /// Line tied to the bucket rather than to the profile
    pub fn contextual_reason(
        &self,
        category: RecommendationCategory,
        candidate: &VehicleCandidate,
        anchor: Option<&VehicleCandidate>,
    ) -> Option<String> {
        match (category, anchor) {
            (RecommendationCategory::Similar, Some(anchor)) => {
                Some(format!("Similar to the {} {}", anchor.brand, anchor.name))
            }
            (RecommendationCategory::Trending, _) => {
                Some("Trending with riders right now".to_owned())
            }
            _ => candidate
                .discount_percent()
                .map(|percent| format!("{percent}% off the original price")),
        }
    }

    /// Sort by score, then price, then id; drop repeated ids; cap the length.
    pub fn rank_and_truncate(
        &self,
        mut items: Vec<RecommendationItem>,
        max_results: usize,
    ) -> Vec<RecommendationItem> {
        items.sort_by(|a, b| {
            b.match_score
                .cmp(&a.match_score)
                .then_with(|| a.price.cmp(&b.price))
                .then_with(|| a.vehicle_id.cmp(&b.vehicle_id))
        });

        let mut seen = HashSet::new();
        items.retain(|item| seen.insert(item.vehicle_id));
        items.truncate(max_results);
        items
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::BudgetRange;

    fn commuter_profile() -> NormalizedProfile {
        NormalizedProfile::from(
            &UserProfile::new(BudgetRange::new(75_000, 180_000))
                .with_brands(["Honda"])
                .with_fuel_types([FuelType::Petrol])
                .with_features(["ABS"]),
        )
    }

    fn item(id: u64, score: u8, price: u64) -> RecommendationItem {
        RecommendationItem {
            vehicle_id: crate::domain::vehicle::VehicleId(id),
            brand: "Honda".to_owned(),
            name: format!("Model {id}"),
            price,
            original_price: None,
            discount_percent: None,
            match_score: score,
            match_reasons: Vec::new(),
            badge: BadgeTag::GoodMatch,
            component_scores: ComponentScores::default(),
        }
    }

    #[test]
    fn default_weights_sum_to_max_score() {
        assert_eq!(ScoringWeights::default().total(), 100);
        assert!(RecommendationSettings::default().validate().is_ok());
    }

    #[test]
    fn unbalanced_weights_fail_validation() {
        let settings = RecommendationSettings {
            weights: ScoringWeights { budget: 40, ..ScoringWeights::default() },
            ..RecommendationSettings::default()
        };
        assert!(matches!(settings.validate(), Err(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn oversized_weights_saturate_instead_of_wrapping() {
        // wrapping addition would land exactly on 100
        let weights =
            ScoringWeights { budget: u32::MAX, brand: 101, fuel: 0, feature: 0, rating: 0 };
        assert_eq!(weights.total(), u32::MAX);

        let settings = RecommendationSettings { weights, ..RecommendationSettings::default() };
        assert!(matches!(settings.validate(), Err(DomainError::InvariantViolation(_))));

        let scores =
            ComponentScores { budget: u32::MAX, brand: 1, fuel: 0, feature: 0, rating: 0 };
        assert_eq!(scores.sum(), u32::MAX);
        assert_eq!(ScoreCalculator::new().calculate_total_score(&scores), 100);
    }

    #[test]
    fn budget_score_decays_linearly_outside_the_band() {
        let calculator = ScoreCalculator::new();
        let band = (100_000, 200_000);

        assert_eq!(calculator.budget_score(150_000, band), 30);
        assert_eq!(calculator.budget_score(100_000, band), 30);
        assert_eq!(calculator.budget_score(200_000, band), 30);
        // 25% over the ceiling is half way to the 50% cut-off
        assert_eq!(calculator.budget_score(250_000, band), 15);
        // 10% under the floor
        assert_eq!(calculator.budget_score(90_000, band), 24);
        assert_eq!(calculator.budget_score(300_000, band), 0);
        assert_eq!(calculator.budget_score(50_000, band), 0);
        assert_eq!(calculator.budget_score(10_000, band), 0);
    }

    #[test]
    fn zero_budget_ceiling_gives_no_partial_credit() {
        let calculator = ScoreCalculator::new();
        assert_eq!(calculator.budget_score(0, (0, 0)), 30);
        assert_eq!(calculator.budget_score(1, (0, 0)), 0);
    }

    #[test]
    fn feature_score_is_proportional_to_coverage() {
        let calculator = ScoreCalculator::new();
        let profile = NormalizedProfile::from(
            &UserProfile::new(BudgetRange::new(0, 1)).with_features(["abs", "usb charging", "led"]),
        );
        let vehicle =
            VehicleCandidate::new(1, "TVS", "Raider", 95_000, FuelType::Petrol, "commuter")
                .with_features(["ABS", "LED"]);

        // 2 of 3 preferred features -> round(10.0)
        assert_eq!(calculator.feature_score(&vehicle, &profile), 10);
    }

    #[test]
    fn empty_preferences_contribute_nothing() {
        let calculator = ScoreCalculator::new();
        let profile = NormalizedProfile::from(&UserProfile::new(BudgetRange::new(0, 0)));
        let vehicle = VehicleCandidate::new(1, "Honda", "Shine", 80_000, FuelType::Petrol, "bike")
            .with_features(["ABS"]);

        assert_eq!(calculator.brand_score(&vehicle, &profile), 0);
        assert_eq!(calculator.fuel_score(&vehicle, &profile), 0);
        assert_eq!(calculator.feature_score(&vehicle, &profile), 0);
    }

    #[test]
    fn reference_candidate_scores_ninety_nine() {
        let calculator = ScoreCalculator::new();
        let vehicle =
            VehicleCandidate::new(101, "Honda", "CB350", 125_000, FuelType::Petrol, "bike")
                .with_features(["ABS"])
                .with_rating(4.5);

        let scores = calculator.component_scores(&vehicle, &commuter_profile());
        assert_eq!(
            scores,
            ComponentScores { budget: 30, brand: 25, fuel: 20, feature: 15, rating: 9 }
        );
        assert_eq!(calculator.calculate_total_score(&scores), 99);
    }

    #[test]
    fn total_score_is_clamped_for_overweight_settings() {
        let calculator = ScoreCalculator::with_settings(RecommendationSettings {
            weights: ScoringWeights { budget: 60, brand: 60, fuel: 0, feature: 0, rating: 0 },
            ..RecommendationSettings::default()
        });
        let scores = ComponentScores { budget: 60, brand: 60, ..ComponentScores::default() };
        assert_eq!(calculator.calculate_total_score(&scores), 100);
    }

    #[test]
    fn badge_follows_score_then_category() {
        let calculator = ScoreCalculator::new();

        assert_eq!(
            calculator.determine_badge(95, RecommendationCategory::Trending),
            BadgeTag::PerfectMatch
        );
        let cases = [
            (85, RecommendationCategory::Budget, BadgeTag::BestValue),
            (70, RecommendationCategory::Budget, BadgeTag::GoodMatch),
            (85, RecommendationCategory::ForYou, BadgeTag::GoodMatch),
            (40, RecommendationCategory::Trending, BadgeTag::Trending),
        ];
        for (score, category, badge) in cases {
            assert_eq!(calculator.determine_badge(score, category), badge, "{score} {category:?}");
        }
    }

    #[test]
    fn reasons_take_top_two_components_plus_context() {
        let calculator = ScoreCalculator::new();
        let scores = ComponentScores { budget: 12, brand: 25, fuel: 20, feature: 0, rating: 8 };

        let reasons =
            calculator.generate_reasons(&scores, Some("Trending with riders right now".to_owned()));
        assert_eq!(
            reasons,
            vec![
                "Matches your preferred brand".to_owned(),
                "Matches your preferred fuel type".to_owned(),
                "Trending with riders right now".to_owned(),
            ]
        );
    }

    #[test]
    fn partial_budget_credit_gets_its_own_reason() {
        let calculator = ScoreCalculator::new();
        let scores = ComponentScores { budget: 18, ..ComponentScores::default() };
        assert_eq!(calculator.generate_reasons(&scores, None), vec!["Close to your budget range"]);
    }

    #[test]
    fn zero_scores_give_no_component_reasons() {
        let calculator = ScoreCalculator::new();
        assert!(calculator.generate_reasons(&ComponentScores::default(), None).is_empty());
    }

    #[test]
    fn budget_bucket_uses_floor_times_pick_factor() {
        let calculator = ScoreCalculator::new();
        let profile = commuter_profile();
        let at_ceiling =
            VehicleCandidate::new(1, "Hero", "HF Deluxe", 82_500, FuelType::Petrol, "commuter");
        let above_ceiling =
            VehicleCandidate::new(2, "Hero", "Splendor", 82_501, FuelType::Petrol, "commuter");

        assert!(calculator.is_eligible(
            RecommendationCategory::Budget,
            &at_ceiling,
            &profile,
            None
        ));
        assert!(!calculator.is_eligible(
            RecommendationCategory::Budget,
            &above_ceiling,
            &profile,
            None
        ));
    }

    #[test]
    fn similar_bucket_needs_an_anchor_and_skips_it() {
        let calculator = ScoreCalculator::new();
        let profile = commuter_profile();
        let anchor =
            VehicleCandidate::new(1, "Honda", "Activa", 76_000, FuelType::Petrol, "scooter");
        let sibling = VehicleCandidate::new(2, "Honda", "Dio", 72_000, FuelType::Petrol, "scooter");

        assert!(!calculator.is_eligible(RecommendationCategory::Similar, &sibling, &profile, None));
        assert!(calculator.is_eligible(
            RecommendationCategory::Similar,
            &sibling,
            &profile,
            Some(&anchor)
        ));
        assert!(!calculator.is_eligible(
            RecommendationCategory::Similar,
            &anchor,
            &profile,
            Some(&anchor)
        ));
    }

    #[test]
    fn ranking_breaks_ties_by_price_then_id_and_dedups() {
        let calculator = ScoreCalculator::new();
        let items = vec![
            item(5, 80, 90_000),
            item(3, 80, 90_000),
            item(4, 80, 85_000),
            item(9, 95, 150_000),
            item(3, 60, 90_000),
        ];

        let ranked = calculator.rank_and_truncate(items, 10);
        let order: Vec<(u64, u8)> =
            ranked.iter().map(|item| (item.vehicle_id.0, item.match_score)).collect();

        assert_eq!(order, vec![(9, 95), (4, 80), (3, 80), (5, 80)]);
    }

    #[test]
    fn ranking_truncates_to_max_results() {
        let calculator = ScoreCalculator::new();
        let items = (1..=30).map(|id| item(id, 50, 100_000)).collect();
        let ranked = calculator.rank_and_truncate(items, 20);

        assert_eq!(ranked.len(), 20);
        assert_eq!(ranked[0].vehicle_id.0, 1);
        assert_eq!(ranked[19].vehicle_id.0, 20);
    }
}
