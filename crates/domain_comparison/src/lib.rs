//! KDRG Comparison Engine
//!
//! Joins the hospital's predicted classifications with the payer's
//! adjudicated ones by claim number, classifies each mismatch, infers
//! likely causes from free-text adjustment reasons, scores review risk,
//! and aggregates accuracy statistics with a monthly trend and templated
//! improvement recommendations.
//!
//! Records present on only one side of the join are dropped; the smaller
//! matched total is the only trace of them.

pub mod engine;
pub mod record;
pub mod statistics;

pub use engine::ComparisonEngine;
pub use record::{
    AdjudicatedClassification, ComparisonRecord, MismatchType, PredictedClassification,
};
pub use statistics::{
    bundle_accuracy, improvement_recommendations, BundleAccuracy, ComparisonStatistics,
    ImprovementRecommendation, MismatchDetail, MismatchPattern, Priority, TrendLabel,
};
