//! Recommendation Engine implementation

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::profile::UserProfile;
use crate::domain::vehicle::VehicleCandidate;
use crate::errors::DomainError;

use super::scoring::{NormalizedProfile, RecommendationSettings, ScoreCalculator};
use super::types::*;
use super::RecommendationResult;

/// Stateless ranking engine. Holds only its settings, so one instance can be
/// shared across concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    calculator: ScoreCalculator,
}

impl RecommendationEngine {
    /// Create a new engine with the reference settings
    pub fn new() -> Self {
        Self { calculator: ScoreCalculator::new() }
    }

    /// Create with custom settings
    pub fn with_settings(settings: RecommendationSettings) -> Self {
        Self { calculator: ScoreCalculator::with_settings(settings) }
    }

    pub fn settings(&self) -> &RecommendationSettings {
        self.calculator.settings()
    }

    /// Rank `catalog` for `profile` into every requested bucket.
    ///
    /// An empty catalog yields an empty sequence per category. The only failure
    /// is an empty or unrecognized category set.
    pub fn compute_recommendations(
        &self,
        profile: &UserProfile,
        catalog: &[VehicleCandidate],
        request: &RecommendationRequest,
    ) -> RecommendationResult<RecommendationSet> {
        let categories = parse_categories(&request.categories)?;
        let preferences = NormalizedProfile::from(profile);
        let anchor = request.anchor.as_ref();
        let max_results = request.max_results.unwrap_or(self.settings().max_results).max(1);

        // Category only affects eligibility, badge and the contextual reason,
        // so each candidate is scored once.
        let scored: Vec<(&VehicleCandidate, ComponentScores, u8)> = catalog
            .iter()
            .map(|candidate| {
                let scores = self.calculator.component_scores(candidate, &preferences);
                let total = self.calculator.calculate_total_score(&scores);
                (candidate, scores, total)
            })
            .collect();

        let mut set = RecommendationSet::default();
        for category in categories {
            let items = scored
                .iter()
                .filter(|(candidate, _, _)| {
                    self.calculator.is_eligible(category, candidate, &preferences, anchor)
                })
                .map(|(candidate, scores, total)| {
                    self.build_item(category, candidate, *scores, *total, anchor)
                })
                .collect::<Vec<_>>();

            let eligible = items.len();
            let ranked = self.calculator.rank_and_truncate(items, max_results);
            debug!(
                event_name = "recommendations.engine.category_ranked",
                category = category.as_str(),
                eligible,
                returned = ranked.len(),
                "recommendation category ranked"
            );
            set.insert(category, ranked);
        }

        debug!(
            event_name = "recommendations.engine.computed",
            catalog_size = catalog.len(),
            categories = set.categories().count(),
            total_items = set.total_items(),
            has_anchor = anchor.is_some(),
            "recommendation set computed"
        );

        Ok(set)
    }

    /// Score one vehicle without bucket context
    pub fn explain(&self, profile: &UserProfile, candidate: &VehicleCandidate) -> ScoreBreakdown {
        let preferences = NormalizedProfile::from(profile);
        let component_scores = self.calculator.component_scores(candidate, &preferences);
        let match_score = self.calculator.calculate_total_score(&component_scores);
        let eligible_categories = RecommendationCategory::ALL
            .into_iter()
            .filter(|category| {
                self.calculator.is_eligible(*category, candidate, &preferences, None)
            })
            .collect();

        ScoreBreakdown {
            vehicle_id: candidate.id,
            match_score,
            component_scores,
            match_reasons: self.calculator.generate_reasons(
                &component_scores,
                self.calculator.contextual_reason(
                    RecommendationCategory::ForYou,
                    candidate,
                    None,
                ),
            ),
            eligible_categories,
        }
    }

    fn build_item(
        &self,
        category: RecommendationCategory,
        candidate: &VehicleCandidate,
        component_scores: ComponentScores,
        match_score: u8,
        anchor: Option<&VehicleCandidate>,
    ) -> RecommendationItem {
        let contextual = self.calculator.contextual_reason(category, candidate, anchor);

        RecommendationItem {
            vehicle_id: candidate.id,
            brand: candidate.brand.clone(),
            name: candidate.name.clone(),
            price: candidate.effective_price(),
            original_price: candidate.effective_original_price(),
            discount_percent: candidate.discount_percent(),
            match_score,
            match_reasons: self.calculator.generate_reasons(&component_scores, contextual),
            badge: self.calculator.determine_badge(match_score, category),
            component_scores,
        }
    }
}

/// Rank with the reference settings.
pub fn compute_recommendations(
    profile: &UserProfile,
    catalog: &[VehicleCandidate],
    request: &RecommendationRequest,
) -> RecommendationResult<RecommendationSet> {
    RecommendationEngine::new().compute_recommendations(profile, catalog, request)
}

fn parse_categories(tags: &[String]) -> RecommendationResult<BTreeSet<RecommendationCategory>> {
    if tags.is_empty() {
        return Err(DomainError::NoCategories);
    }

    tags.iter().map(|tag| tag.parse::<RecommendationCategory>()).collect()
}
