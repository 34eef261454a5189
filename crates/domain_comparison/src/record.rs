//! Comparison input and output records
//!
//! Both sides carry their codes as plain strings: adjudicated extracts come
//! from payer files and may be shorter than 5 characters or otherwise
//! malformed. Decomposition is lenient and comparison never fails.

use chrono::NaiveDate;
use core_kernel::{CodeParts, Money};
use reference_data::MismatchCause;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How far apart the predicted and adjudicated codes are
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchType {
    /// Codes are identical
    ExactMatch,
    /// Same adjacent group, different severity digit
    SeverityDiff,
    /// Same major category, different adjacent group
    AadrgDiff,
    /// Different major category
    MdcDiff,
}

impl MismatchType {
    /// Base review-risk score for this mismatch type
    pub fn base_risk(&self) -> u8 {
        match self {
            MismatchType::ExactMatch => 0,
            MismatchType::SeverityDiff => 30,
            MismatchType::AadrgDiff => 60,
            MismatchType::MdcDiff => 90,
        }
    }
}

impl fmt::Display for MismatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MismatchType::ExactMatch => "exact_match",
            MismatchType::SeverityDiff => "severity_diff",
            MismatchType::AadrgDiff => "aadrg_diff",
            MismatchType::MdcDiff => "mdc_diff",
        };
        write!(f, "{s}")
    }
}

/// The hospital's own pre-adjudication classification of one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedClassification {
    pub claim_number: String,
    pub patient_id: String,
    pub admission_date: NaiveDate,
    pub los: i32,
    pub main_diagnosis: String,
    pub kdrg: String,
    pub amount: Money,
}

/// The payer's final adjudicated classification of the same claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjudicatedClassification {
    pub claim_number: String,
    pub kdrg: String,
    pub amount: Money,
    /// Free-text adjustment reason from the adjudication notice
    #[serde(default)]
    pub adjustment_reason: Option<String>,
}

/// One matched predicted/adjudicated pair with its analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub claim_number: String,
    pub patient_id: String,
    pub admission_date: NaiveDate,
    pub los: i32,
    pub main_diagnosis: String,

    pub predicted_kdrg: String,
    pub predicted_parts: CodeParts,
    pub predicted_amount: Money,

    pub actual_kdrg: String,
    pub actual_parts: CodeParts,
    pub actual_amount: Money,

    /// Predicted minus adjudicated amount
    pub amount_delta: Money,
    pub is_match: bool,
    pub mismatch_type: MismatchType,
    pub causes: Vec<MismatchCause>,
    pub adjustment_reason: Option<String>,

    /// Review-risk score, 0-100
    pub risk_score: u8,
    pub recommendation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_risk_table() {
        assert_eq!(MismatchType::ExactMatch.base_risk(), 0);
        assert_eq!(MismatchType::SeverityDiff.base_risk(), 30);
        assert_eq!(MismatchType::AadrgDiff.base_risk(), 60);
        assert_eq!(MismatchType::MdcDiff.base_risk(), 90);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&MismatchType::SeverityDiff).unwrap(),
            "\"severity_diff\""
        );
    }
}
