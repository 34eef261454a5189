//! Optimization suggestions

use core_kernel::{KdrgCode, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of coding change a suggestion proposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Higher severity within the same adjacent group
    SeverityUpgrade,
    /// Document an additional complication or comorbidity code
    ComplicationAddition,
    /// Add the procedure that qualifies a bundled-payment group
    BundleConversion,
    /// Reclassify a non-surgical grouping that carries procedures
    CodingImprovement,
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SuggestionKind::SeverityUpgrade => "severity_upgrade",
            SuggestionKind::ComplicationAddition => "complication_addition",
            SuggestionKind::BundleConversion => "bundle_conversion",
            SuggestionKind::CodingImprovement => "coding_improvement",
        };
        write!(f, "{s}")
    }
}

/// Review risk carried by acting on a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Legitimate coding improvement
    Low,
    /// Needs clinical review before claiming
    Medium,
    /// Audit exposure
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        write!(f, "{s}")
    }
}

/// One candidate alternate classification for an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    pub kind: SuggestionKind,
    pub current_kdrg: KdrgCode,
    pub suggested_kdrg: KdrgCode,
    pub current_amount: Money,
    pub suggested_amount: Money,
    /// Suggested minus current amount; always positive for emitted suggestions
    pub revenue_delta: Money,
    /// Delta as a percentage of the current amount, 2 decimal places
    pub delta_percent: Decimal,
    pub required_actions: Vec<String>,
    pub risk: RiskLevel,
    /// Confidence that the suggestion is actionable, 0-100
    pub confidence: u8,
    pub rationale: String,
}
