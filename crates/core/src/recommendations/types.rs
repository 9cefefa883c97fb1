//! Types for the Recommendation Engine

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::vehicle::{VehicleCandidate, VehicleId};
use crate::errors::DomainError;

/// Recommendation bucket a presentation layer can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationCategory {
    /// Every candidate, ranked by profile fit
    ForYou,
    /// Candidates carrying an upstream trending signal
    Trending,
    /// Candidates sharing a brand or category with the anchor vehicle
    Similar,
    /// Candidates priced at the low end of the rider's budget
    Budget,
}

impl RecommendationCategory {
    pub const ALL: [RecommendationCategory; 4] =
        [Self::ForYou, Self::Trending, Self::Similar, Self::Budget];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForYou => "for-you",
            Self::Trending => "trending",
            Self::Similar => "similar",
            Self::Budget => "budget",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::ForYou => "Picked for your riding profile",
            Self::Trending => "Popular with riders right now",
            Self::Similar => "Similar to the vehicle you are viewing",
            Self::Budget => "Easy on your budget",
        }
    }
}

impl fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendationCategory {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "for-you" => Ok(Self::ForYou),
            "trending" => Ok(Self::Trending),
            "similar" => Ok(Self::Similar),
            "budget" => Ok(Self::Budget),
            _ => Err(DomainError::InvalidCategory { tag: value.to_owned() }),
        }
    }
}

/// Coarse label shown next to a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeTag {
    PerfectMatch,
    BestValue,
    Trending,
    GoodMatch,
}

impl BadgeTag {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PerfectMatch => "Perfect match",
            Self::BestValue => "Best value",
            Self::Trending => "Trending",
            Self::GoodMatch => "Good match",
        }
    }
}

/// One of the five scoring components, declared in tie-break priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreComponent {
    Budget,
    Brand,
    Fuel,
    Feature,
    Rating,
}

impl ScoreComponent {
    pub const PRIORITY: [ScoreComponent; 5] =
        [Self::Budget, Self::Brand, Self::Fuel, Self::Feature, Self::Rating];
}

/// Individual scoring components, in points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentScores {
    pub budget: u32,
    pub brand: u32,
    pub fuel: u32,
    pub feature: u32,
    pub rating: u32,
}

impl ComponentScores {
    pub fn get(&self, component: ScoreComponent) -> u32 {
        match component {
            ScoreComponent::Budget => self.budget,
            ScoreComponent::Brand => self.brand,
            ScoreComponent::Fuel => self.fuel,
            ScoreComponent::Feature => self.feature,
            ScoreComponent::Rating => self.rating,
        }
    }

    pub fn sum(&self) -> u32 {
        [self.budget, self.brand, self.fuel, self.feature, self.rating]
            .into_iter()
            .fold(0, u32::saturating_add)
    }

    /// Non-zero components, largest first, ties in [`ScoreComponent::PRIORITY`] order.
    pub fn ranked(&self) -> Vec<(ScoreComponent, u32)> {
        let mut ranked: Vec<_> = ScoreComponent::PRIORITY
            .iter()
            .map(|component| (*component, self.get(*component)))
            .filter(|(_, points)| *points > 0)
            .collect();
        // stable sort keeps priority order among equal values
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Request for a recommendation set
#[derive(Debug, Clone, Default)]
pub struct RecommendationRequest {
    /// Raw category tags; parsed by the engine
    pub categories: Vec<String>,
    /// Reference vehicle for the `similar` bucket
    pub anchor: Option<VehicleCandidate>,
    /// Per-category cap; falls back to the engine settings when unset
    pub max_results: Option<usize>,
}

impl RecommendationRequest {
    /// Create a request for the given category tags
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            anchor: None,
            max_results: None,
        }
    }

    /// Request every known category
    pub fn all_categories() -> Self {
        Self::new(RecommendationCategory::ALL.iter().map(RecommendationCategory::as_str))
    }

    /// Set the anchor used by the `similar` bucket
    pub fn with_anchor(mut self, anchor: VehicleCandidate) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Set max results per category
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }
}

/// A scored vehicle inside one recommendation bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub vehicle_id: VehicleId,
    pub brand: String,
    pub name: String,
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<u8>,
    /// Total score (0 - 100)
    pub match_score: u8,
    /// Most significant first, at most three
    pub match_reasons: Vec<String>,
    pub badge: BadgeTag,
    pub component_scores: ComponentScores,
}

impl RecommendationItem {
    /// Get display percentage
    pub fn display_percentage(&self) -> String {
        format!("{}% match", self.match_score)
    }
}

/// Ranked items per requested category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationSet {
    categories: BTreeMap<RecommendationCategory, Vec<RecommendationItem>>,
}

impl RecommendationSet {
    pub(crate) fn insert(
        &mut self,
        category: RecommendationCategory,
        items: Vec<RecommendationItem>,
    ) {
        self.categories.insert(category, items);
    }

    /// Items for a category, or `None` when the category was not requested
    pub fn get(&self, category: RecommendationCategory) -> Option<&[RecommendationItem]> {
        self.categories.get(&category).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = RecommendationCategory> + '_ {
        self.categories.keys().copied()
    }

    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (RecommendationCategory, &[RecommendationItem])> + '_ {
        self.categories.iter().map(|(category, items)| (*category, items.as_slice()))
    }

    /// Total number of items across all categories
    pub fn total_items(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

/// Single-vehicle scoring detail, for operators debugging a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub vehicle_id: VehicleId,
    pub match_score: u8,
    pub component_scores: ComponentScores,
    pub match_reasons: Vec<String>,
    /// Buckets the vehicle qualifies for without an anchor
    pub eligible_categories: Vec<RecommendationCategory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_tags_parse_case_insensitively() {
        assert_eq!("for-you".parse::<RecommendationCategory>(), Ok(RecommendationCategory::ForYou));
        assert_eq!("FOR_YOU".parse::<RecommendationCategory>(), Ok(RecommendationCategory::ForYou));
        assert_eq!(
            " Budget ".parse::<RecommendationCategory>(),
            Ok(RecommendationCategory::Budget)
        );
    }

    #[test]
    fn unknown_category_tag_is_rejected() {
        assert_eq!(
            "popular".parse::<RecommendationCategory>(),
            Err(DomainError::InvalidCategory { tag: "popular".to_owned() })
        );
    }

    #[test]
    fn ranked_components_break_ties_by_priority() {
        let scores = ComponentScores { budget: 0, brand: 20, fuel: 20, feature: 15, rating: 20 };
        let ranked = scores.ranked();

        assert_eq!(
            ranked.iter().map(|(component, _)| *component).collect::<Vec<_>>(),
            vec![
                ScoreComponent::Brand,
                ScoreComponent::Fuel,
                ScoreComponent::Rating,
                ScoreComponent::Feature
            ]
        );
    }

    #[test]
    fn recommendation_set_serializes_with_category_keys() {
        let mut set = RecommendationSet::default();
        set.insert(RecommendationCategory::ForYou, Vec::new());
        set.insert(RecommendationCategory::Budget, Vec::new());

        let json = serde_json::to_value(&set).expect("serialize set");
        assert!(json.get("for-you").is_some());
        assert!(json.get("budget").is_some());
        assert_eq!(set.total_items(), 0);
    }

    #[test]
    fn badge_tags_serialize_kebab_case() {
        let json = serde_json::to_string(&BadgeTag::PerfectMatch).expect("badge json");
        assert_eq!(json, "\"perfect-match\"");
    }
}
