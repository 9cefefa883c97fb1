//! Recommendation Engine
//!
//! Ranks a vehicle catalog against a rider profile and partitions the result
//! into recommendation buckets (`for-you`, `trending`, `similar`, `budget`).
//! Scoring is a pure, deterministic function of profile and candidate: five
//! weighted components (budget, brand, fuel, features, rating) summed into a
//! 0-100 match score.

mod engine;
mod scoring;
mod types;

pub use engine::{compute_recommendations, RecommendationEngine};
pub use scoring::{NormalizedProfile, RecommendationSettings, ScoreCalculator, ScoringWeights};
pub use types::*;

use crate::errors::DomainError;

/// Result type for recommendation operations
pub type RecommendationResult<T> = Result<T, DomainError>;

/// Reference scoring weights. They sum to [`MAX_MATCH_SCORE`].
pub const DEFAULT_WEIGHTS: ScoringWeights =
    ScoringWeights { budget: 30, brand: 25, fuel: 20, feature: 15, rating: 10 };

/// Upper bound of a match score
pub const MAX_MATCH_SCORE: u8 = 100;

/// Default cap on items per category
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Relative divergence outside the budget band at which the budget score reaches zero
pub const DEFAULT_BUDGET_TOLERANCE: f64 = 0.5;

/// Multiple of the budget floor under which a vehicle counts as a budget pick
pub const DEFAULT_BUDGET_PICK_FACTOR: f64 = 1.1;

pub const PERFECT_MATCH_THRESHOLD: u8 = 90;
pub const BEST_VALUE_THRESHOLD: u8 = 80;

/// Component reasons kept per item, before the optional contextual reason
pub const MAX_COMPONENT_REASONS: usize = 2;

/// Hard cap on reasons per item
pub const MAX_MATCH_REASONS: usize = 3;
