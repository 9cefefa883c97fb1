pub mod config;
pub mod domain;
pub mod errors;
pub mod recommendations;

pub use domain::profile::{BudgetRange, UsagePattern, UserProfile};
pub use domain::vehicle::{FuelType, VehicleCandidate, VehicleId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use recommendations::{
    compute_recommendations, BadgeTag, ComponentScores, RecommendationCategory,
    RecommendationEngine, RecommendationItem, RecommendationRequest, RecommendationSet,
    RecommendationSettings, ScoreBreakdown, ScoringWeights,
};
