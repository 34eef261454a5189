//! Per-encounter suggestion generation
//!
//! Four independent generators run over the current classification and the
//! reference catalog. Their outputs are concatenated and sorted by
//! descending revenue delta; only positive-delta suggestions are emitted.

use core_kernel::{normalize_clinical_code, KdrgCode, Severity};
use tracing::{debug, instrument};

use domain_grouping::{ClassificationResult, Encounter};
use reference_data::rules::{ComplicationCode, CC_UPGRADE_CODES, MCC_UPGRADE_CODES};
use reference_data::{KdrgEntry, ReferenceCatalog};

use crate::suggestion::{OptimizationSuggestion, RiskLevel, SuggestionKind};

const SEVERITY_CONFIDENCE_CAP: u8 = 95;
const COMPLICATION_CONFIDENCE: u8 = 45;
const BUNDLE_CONVERSION_CONFIDENCE: u8 = 60;
const CODING_IMPROVEMENT_CONFIDENCE: u8 = 55;
const COMPLICATION_CANDIDATE_LIMIT: usize = 3;

/// The optimization analyzer, borrowing the shared reference catalog
#[derive(Debug, Clone, Copy)]
pub struct OptimizationAnalyzer<'c> {
    catalog: &'c ReferenceCatalog,
}

impl<'c> OptimizationAnalyzer<'c> {
    pub fn new(catalog: &'c ReferenceCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c ReferenceCatalog {
        self.catalog
    }

    /// Evaluates all four generators for one classified encounter
    ///
    /// Returns an empty list when the classified code has no catalog entry;
    /// lookup misses never abort a batch.
    #[instrument(skip(self, encounter, result), fields(kdrg = %result.kdrg))]
    pub fn analyze_single(
        &self,
        encounter: &Encounter,
        result: &ClassificationResult,
    ) -> Vec<OptimizationSuggestion> {
        let Some(current) = self.catalog.get(&result.kdrg) else {
            debug!("classified code not in catalog, no suggestions");
            return Vec::new();
        };

        let mut suggestions = Vec::new();
        suggestions.extend(self.severity_upgrades(current, encounter));
        suggestions.extend(self.complication_additions(current, encounter));
        suggestions.extend(self.bundle_conversions(current, encounter));
        suggestions.extend(self.coding_improvements(current, encounter));

        // Deterministic order: biggest delta first, code breaks ties
        suggestions.sort_by(|a, b| {
            b.revenue_delta
                .cmp(&a.revenue_delta)
                .then_with(|| a.suggested_kdrg.cmp(&b.suggested_kdrg))
        });

        debug!(count = suggestions.len(), "suggestions generated");
        suggestions
    }

    fn severity_upgrades(
        &self,
        current: &KdrgEntry,
        encounter: &Encounter,
    ) -> Vec<OptimizationSuggestion> {
        if current.severity >= Severity::Major {
            return Vec::new();
        }

        let mut suggestions = Vec::new();
        for alt in self.catalog.alternatives(&current.code) {
            if alt.severity <= current.severity {
                continue;
            }
            let delta = alt.base_amount - current.base_amount;
            if !delta.is_positive() {
                continue;
            }

            let gap = alt.severity.gap_from(current.severity);
            let (mut actions, risk, mut confidence) = if gap == 1 {
                (
                    vec![
                        "Review for an additional complication/comorbidity (CC) code"
                            .to_string(),
                        "Check the medical record for undocumented comorbidities".to_string(),
                    ],
                    RiskLevel::Low,
                    75u8,
                )
            } else {
                (
                    vec![
                        "Major complication (MCC) code required".to_string(),
                        "Review intensive-care and major procedure records".to_string(),
                    ],
                    RiskLevel::Medium,
                    50u8,
                )
            };

            if encounter.age >= 70 {
                confidence += 5;
                actions.push("Elderly patient: comorbidity codes are often under-documented".to_string());
            }
            if encounter.los > i32::from(current.los_upper) {
                confidence += 5;
                actions.push("Extended stay: check for complications during the admission".to_string());
            }

            suggestions.push(OptimizationSuggestion {
                kind: SuggestionKind::SeverityUpgrade,
                current_kdrg: current.code.clone(),
                suggested_kdrg: alt.code.clone(),
                current_amount: current.base_amount,
                suggested_amount: alt.base_amount,
                revenue_delta: delta,
                delta_percent: delta.percent_of(current.base_amount),
                required_actions: actions,
                risk,
                confidence: confidence.min(SEVERITY_CONFIDENCE_CAP),
                rationale: format!(
                    "Raising severity {} to {} increases expected revenue by {}",
                    current.severity, alt.severity, delta
                ),
            });
        }
        suggestions
    }

    fn complication_additions(
        &self,
        current: &KdrgEntry,
        encounter: &Encounter,
    ) -> Vec<OptimizationSuggestion> {
        let existing: Vec<String> = encounter.all_diagnoses_normalized();

        let (candidates, bump): (&[ComplicationCode], u8) =
            if current.severity < Severity::Moderate {
                (CC_UPGRADE_CODES, 1)
            } else {
                (MCC_UPGRADE_CODES, 2)
            };

        let mut suggestions = Vec::new();
        for candidate in candidates.iter().take(COMPLICATION_CANDIDATE_LIMIT) {
            let normalized = normalize_clinical_code(candidate.code);
            if existing.iter().any(|dx| dx == &normalized) {
                continue;
            }

            let target_severity = Severity::try_from((current.severity.level() + bump).min(4))
                .unwrap_or(Severity::MAX);
            let target_code = current.aadrg.with_severity(target_severity);
            let Some(target) = self.catalog.get(&target_code) else {
                continue;
            };
            let delta = target.base_amount - current.base_amount;
            if !delta.is_positive() {
                continue;
            }

            suggestions.push(OptimizationSuggestion {
                kind: SuggestionKind::ComplicationAddition,
                current_kdrg: current.code.clone(),
                suggested_kdrg: target.code.clone(),
                current_amount: current.base_amount,
                suggested_amount: target.base_amount,
                revenue_delta: delta,
                delta_percent: delta.percent_of(current.base_amount),
                required_actions: vec![
                    format!(
                        "Consider documenting '{}' ({})",
                        candidate.name, candidate.code
                    ),
                    format!("Applies to: {}", candidate.context),
                    "Verify the diagnosis is recorded in the chart".to_string(),
                ],
                risk: RiskLevel::Medium,
                confidence: COMPLICATION_CONFIDENCE,
                rationale: format!(
                    "Documenting {} would raise revenue by {}",
                    candidate.name, delta
                ),
            });
        }
        suggestions
    }

    fn bundle_conversions(
        &self,
        current: &KdrgEntry,
        encounter: &Encounter,
    ) -> Vec<OptimizationSuggestion> {
        if current.bundle.is_some() {
            return Vec::new();
        }

        let main_dx = encounter.main_diagnosis_normalized();
        let procedures = encounter.procedures_normalized();

        let mut suggestions = Vec::new();
        for def in self.catalog.bundles() {
            if def.diagnosis_only()
                || !def.matches_diagnosis(&main_dx)
                || def.matches_procedure_prefix(&procedures)
            {
                continue;
            }

            let target_code = match KdrgCode::new(format!("{}10", def.group)) {
                Ok(code) => code,
                Err(_) => continue,
            };
            let Some(target) = self.catalog.get(&target_code) else {
                continue;
            };
            let delta = target.base_amount - current.base_amount;
            if !delta.is_positive() {
                continue;
            }

            suggestions.push(OptimizationSuggestion {
                kind: SuggestionKind::BundleConversion,
                current_kdrg: current.code.clone(),
                suggested_kdrg: target.code.clone(),
                current_amount: current.base_amount,
                suggested_amount: target.base_amount,
                revenue_delta: delta,
                delta_percent: delta.percent_of(current.base_amount),
                required_actions: vec![
                    format!(
                        "Bundled-payment group '{}' ({}) is reachable",
                        target.name,
                        def.group
                    ),
                    "Verify the qualifying procedure was performed and coded".to_string(),
                    "Bundled payment makes stay-length management critical".to_string(),
                ],
                risk: RiskLevel::Low,
                confidence: BUNDLE_CONVERSION_CONFIDENCE,
                rationale: format!(
                    "Converting to bundled group {} would raise revenue by {}",
                    def.group, delta
                ),
            });
        }
        suggestions
    }

    fn coding_improvements(
        &self,
        current: &KdrgEntry,
        encounter: &Encounter,
    ) -> Vec<OptimizationSuggestion> {
        if current.surgical || encounter.procedures_normalized().is_empty() {
            return Vec::new();
        }

        let Some(best) = self.catalog.best_surgical(current.major_category) else {
            return Vec::new();
        };
        let delta = best.base_amount - current.base_amount;
        if !delta.is_positive() {
            return Vec::new();
        }

        vec![OptimizationSuggestion {
            kind: SuggestionKind::CodingImprovement,
            current_kdrg: current.code.clone(),
            suggested_kdrg: best.code.clone(),
            current_amount: current.base_amount,
            suggested_amount: best.base_amount,
            revenue_delta: delta,
            delta_percent: delta.percent_of(current.base_amount),
            required_actions: vec![
                "Check that procedure codes were reflected in the grouping".to_string(),
                "Review the relation between the main diagnosis and the procedures".to_string(),
                format!("Surgical group '{}' may apply", best.name),
            ],
            risk: RiskLevel::Medium,
            confidence: CODING_IMPROVEMENT_CONFIDENCE,
            rationale:
                "Procedures are recorded but the encounter grouped to a non-surgical code"
                    .to_string(),
        }]
    }
}

/// Total positive optimization potential of a suggestion list
pub(crate) fn total_potential(suggestions: &[OptimizationSuggestion]) -> core_kernel::Money {
    suggestions
        .iter()
        .filter(|s| s.revenue_delta.is_positive())
        .map(|s| s.revenue_delta)
        .sum()
}
