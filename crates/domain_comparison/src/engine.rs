//! The predicted/adjudicated comparison pipeline

use std::collections::HashMap;

use core_kernel::{CodeParts, Money};
use reference_data::MismatchCause;
use tracing::{debug, instrument};

use crate::record::{
    AdjudicatedClassification, ComparisonRecord, MismatchType, PredictedClassification,
};

const LARGE_DELTA_WON: i64 = 500_000;
const NOTABLE_DELTA_WON: i64 = 200_000;
const MAX_RISK: u8 = 100;

/// Compares predicted classifications against payer adjudications
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonEngine;

impl ComparisonEngine {
    pub fn new() -> Self {
        Self
    }

    /// Inner-joins both sides on claim number and analyzes each pair
    ///
    /// Output order follows the predicted input; unjoinable records on
    /// either side are dropped.
    #[instrument(skip(self, predicted, adjudicated), fields(predicted = predicted.len(), adjudicated = adjudicated.len()))]
    pub fn compare(
        &self,
        predicted: &[PredictedClassification],
        adjudicated: &[AdjudicatedClassification],
    ) -> Vec<ComparisonRecord> {
        let adjudicated_by_claim: HashMap<&str, &AdjudicatedClassification> = adjudicated
            .iter()
            .map(|a| (a.claim_number.as_str(), a))
            .collect();

        let records: Vec<ComparisonRecord> = predicted
            .iter()
            .filter(|p| !p.claim_number.is_empty())
            .filter_map(|p| {
                adjudicated_by_claim
                    .get(p.claim_number.as_str())
                    .map(|a| self.compare_pair(p, a))
            })
            .collect();

        debug!(matched = records.len(), "comparison join complete");
        records
    }

    fn compare_pair(
        &self,
        predicted: &PredictedClassification,
        adjudicated: &AdjudicatedClassification,
    ) -> ComparisonRecord {
        let predicted_kdrg = predicted.kdrg.trim().to_ascii_uppercase();
        let actual_kdrg = adjudicated.kdrg.trim().to_ascii_uppercase();

        let predicted_parts = CodeParts::decompose(&predicted_kdrg);
        let actual_parts = CodeParts::decompose(&actual_kdrg);

        let mismatch_type = classify_mismatch(&predicted_kdrg, &actual_kdrg);
        let is_match = mismatch_type == MismatchType::ExactMatch;

        let causes = infer_causes(mismatch_type, adjudicated.adjustment_reason.as_deref());
        let amount_delta = predicted.amount - adjudicated.amount;
        let risk_score = risk_score(mismatch_type, amount_delta, predicted.los);
        let recommendation =
            recommendation(mismatch_type, &causes, &predicted_parts, &actual_parts);

        ComparisonRecord {
            claim_number: predicted.claim_number.clone(),
            patient_id: predicted.patient_id.clone(),
            admission_date: predicted.admission_date,
            los: predicted.los,
            main_diagnosis: predicted.main_diagnosis.clone(),
            predicted_kdrg,
            predicted_parts,
            predicted_amount: predicted.amount,
            actual_kdrg,
            actual_parts,
            actual_amount: adjudicated.amount,
            amount_delta,
            is_match,
            mismatch_type,
            causes,
            adjustment_reason: adjudicated.adjustment_reason.clone(),
            risk_score,
            recommendation,
        }
    }
}

/// Mismatch precedence: exact, then severity, then adjacent group, then
/// major category
fn classify_mismatch(predicted: &str, actual: &str) -> MismatchType {
    if predicted == actual {
        return MismatchType::ExactMatch;
    }

    let p = CodeParts::decompose(predicted);
    let a = CodeParts::decompose(actual);

    if p.aadrg == a.aadrg {
        MismatchType::SeverityDiff
    } else if p.major_category == a.major_category {
        MismatchType::AadrgDiff
    } else {
        MismatchType::MdcDiff
    }
}

/// Keyword-matches the adjustment reason, then falls back to per-type
/// defaults, then to unknown
fn infer_causes(mismatch_type: MismatchType, adjustment_reason: Option<&str>) -> Vec<MismatchCause> {
    let mut causes = Vec::new();
    let reason = adjustment_reason.unwrap_or("").to_lowercase();

    if !reason.is_empty() {
        for cause in MismatchCause::KEYWORD_CAUSES {
            if cause.keywords().iter().any(|kw| reason.contains(kw)) {
                causes.push(cause);
            }
        }
    }

    match mismatch_type {
        MismatchType::SeverityDiff => {
            if !causes.contains(&MismatchCause::SeverityAssessment) {
                causes.push(MismatchCause::SeverityAssessment);
            }
        }
        MismatchType::AadrgDiff => {
            if causes.is_empty() {
                causes.push(MismatchCause::ProcedureCoding);
            }
        }
        MismatchType::MdcDiff => {
            if causes.is_empty() {
                causes.push(MismatchCause::DiagnosisCoding);
            }
        }
        MismatchType::ExactMatch => {}
    }

    if causes.is_empty() {
        causes.push(MismatchCause::Unknown);
    }

    causes
}

/// Base score by mismatch type plus amount and stay-length bumps, capped
fn risk_score(mismatch_type: MismatchType, amount_delta: Money, los: i32) -> u8 {
    let mut score = mismatch_type.base_risk();

    let magnitude = amount_delta.abs();
    if magnitude > Money::from_won(LARGE_DELTA_WON) {
        score += 10;
    } else if magnitude > Money::from_won(NOTABLE_DELTA_WON) {
        score += 5;
    }

    if los > 14 {
        score += 5;
    }

    score.min(MAX_RISK)
}

fn recommendation(
    mismatch_type: MismatchType,
    causes: &[MismatchCause],
    predicted: &CodeParts,
    actual: &CodeParts,
) -> String {
    let mut lines = Vec::new();

    match mismatch_type {
        MismatchType::SeverityDiff => {
            lines.push(format!(
                "Re-review the severity assessment: {}{} vs {}{}",
                predicted.aadrg, predicted.severity_digit, actual.aadrg, actual.severity_digit
            ));
            lines.push("Check for missed complication/comorbidity codes".to_string());
        }
        MismatchType::AadrgDiff => {
            lines.push(format!(
                "Re-review the adjacent-group assignment: {} vs {}",
                predicted.aadrg, actual.aadrg
            ));
            lines.push("Verify procedure code accuracy".to_string());
        }
        MismatchType::MdcDiff => {
            lines.push(format!(
                "Re-review the principal diagnosis: category {} vs {}",
                predicted.major_category, actual.major_category
            ));
            lines.push("Refresh principal-diagnosis selection training".to_string());
        }
        MismatchType::ExactMatch => {}
    }

    if causes.contains(&MismatchCause::Documentation) {
        lines.push("Improve chart documentation completeness".to_string());
    }

    if lines.is_empty() {
        "Further analysis required".to_string()
    } else {
        lines.join(" | ")
    }
}
