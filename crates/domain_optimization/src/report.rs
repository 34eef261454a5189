//! Batch optimization analysis and reporting
//!
//! Per-encounter analyses run in parallel; aggregation happens in a single
//! sequential pass over the collected results so totals and orderings are
//! deterministic regardless of worker scheduling.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use core_kernel::{KdrgCode, MajorCategory, Money, ReportId, Severity};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use domain_grouping::{ClassificationResult, Encounter};
use reference_data::rules::category_name;

use crate::analyzer::{total_potential, OptimizationAnalyzer};
use crate::suggestion::{OptimizationSuggestion, RiskLevel};

const TOP_OPPORTUNITY_LIMIT: usize = 20;
const TOP_SUGGESTIONS_PER_CATEGORY: usize = 5;

/// One encounter's full optimization picture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterAnalysis {
    pub patient_id: String,
    pub claim_number: Option<String>,
    pub current_kdrg: KdrgCode,
    pub major_category: MajorCategory,
    pub severity: Severity,
    pub current_amount: Money,
    pub los: i32,
    pub suggestions: Vec<OptimizationSuggestion>,
    /// Sum of all positive revenue deltas
    pub total_potential: Money,
    /// The top suggestion by revenue delta, when any exist
    pub best_suggestion: Option<OptimizationSuggestion>,
}

/// Count of best suggestions per risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl RiskDistribution {
    fn record(&mut self, risk: RiskLevel) {
        match risk {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::High => self.high += 1,
        }
    }
}

/// Aggregate optimization figures for one major diagnostic category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorCategorySummary {
    pub major_category: MajorCategory,
    pub name: String,
    pub total_cases: usize,
    pub current_revenue: Money,
    pub potential_revenue: Money,
    pub optimization_potential: Money,
    /// Percentage of cases with at least one suggestion, 2 decimal places
    pub optimization_rate: Decimal,
    pub top_suggestions: Vec<OptimizationSuggestion>,
}

/// The batch optimization report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub report_id: ReportId,
    pub generated_at: DateTime<Utc>,
    pub total_cases: usize,
    pub total_current_revenue: Money,
    pub total_potential_revenue: Money,
    pub total_optimization_potential: Money,
    /// Percentage of analyzed cases with positive potential, 2 decimal places
    pub optimization_rate: Decimal,
    pub category_summaries: Vec<MajorCategorySummary>,
    pub top_opportunities: Vec<EncounterAnalysis>,
    pub risk_distribution: RiskDistribution,
}

impl<'c> OptimizationAnalyzer<'c> {
    /// Runs the generators for one encounter and packages the outcome
    pub fn analyze_encounter(
        &self,
        encounter: &Encounter,
        result: &ClassificationResult,
    ) -> EncounterAnalysis {
        let suggestions = self.analyze_single(encounter, result);
        let potential = total_potential(&suggestions);
        let current_amount = self
            .catalog()
            .get(&result.kdrg)
            .map(|e| e.base_amount)
            .unwrap_or(result.base_amount);

        EncounterAnalysis {
            patient_id: result.patient_id.clone(),
            claim_number: result.claim_number.clone(),
            current_kdrg: result.kdrg.clone(),
            major_category: result.major_category,
            severity: result.severity,
            current_amount,
            los: result.los,
            best_suggestion: suggestions.first().cloned(),
            total_potential: potential,
            suggestions,
        }
    }

    /// Analyzes a batch of classified encounters
    ///
    /// `category_filter` restricts the analysis to one major category;
    /// `min_potential` drops encounters whose total potential falls below
    /// the threshold.
    #[instrument(skip(self, cases), fields(cases = cases.len()))]
    pub fn analyze_batch(
        &self,
        cases: &[(Encounter, ClassificationResult)],
        category_filter: Option<MajorCategory>,
        min_potential: Money,
    ) -> OptimizationReport {
        let mut analyses: Vec<EncounterAnalysis> = cases
            .par_iter()
            .filter(|(_, result)| {
                category_filter.map_or(true, |mdc| result.major_category == mdc)
            })
            .map(|(encounter, result)| self.analyze_encounter(encounter, result))
            .filter(|analysis| analysis.total_potential >= min_potential)
            .collect();

        // Single-pass sequential aggregation over worker results
        let mut per_category: BTreeMap<MajorCategory, CategoryAccumulator> = BTreeMap::new();
        let mut risk_distribution = RiskDistribution::default();
        let mut total_current = Money::zero();
        let mut total_potential_sum = Money::zero();
        let mut cases_with_potential = 0usize;

        for analysis in &analyses {
            total_current = total_current + analysis.current_amount;
            total_potential_sum = total_potential_sum + analysis.total_potential;
            if analysis.total_potential.is_positive() {
                cases_with_potential += 1;
            }

            let acc = per_category.entry(analysis.major_category).or_default();
            acc.cases += 1;
            acc.current_revenue = acc.current_revenue + analysis.current_amount;
            acc.potential_revenue =
                acc.potential_revenue + analysis.current_amount + analysis.total_potential;
            if let Some(best) = &analysis.best_suggestion {
                risk_distribution.record(best.risk);
                acc.best_suggestions.push(best.clone());
            }
        }

        let category_summaries = per_category
            .into_iter()
            .map(|(category, mut acc)| {
                let suggested_cases = acc.best_suggestions.len();
                acc.best_suggestions.sort_by(|a, b| {
                    b.revenue_delta
                        .cmp(&a.revenue_delta)
                        .then_with(|| a.suggested_kdrg.cmp(&b.suggested_kdrg))
                });
                acc.best_suggestions.truncate(TOP_SUGGESTIONS_PER_CATEGORY);
                MajorCategorySummary {
                    major_category: category,
                    name: category_name(category.as_char())
                        .unwrap_or("Other")
                        .to_string(),
                    total_cases: acc.cases,
                    current_revenue: acc.current_revenue,
                    potential_revenue: acc.potential_revenue,
                    optimization_potential: acc.potential_revenue - acc.current_revenue,
                    optimization_rate: percentage(suggested_cases, acc.cases),
                    top_suggestions: acc.best_suggestions,
                }
            })
            .collect();

        analyses.sort_by(|a, b| {
            b.total_potential
                .cmp(&a.total_potential)
                .then_with(|| a.patient_id.cmp(&b.patient_id))
        });

        let total_cases = analyses.len();
        let report = OptimizationReport {
            report_id: ReportId::new_v7(),
            generated_at: Utc::now(),
            total_cases,
            total_current_revenue: total_current,
            total_potential_revenue: total_current + total_potential_sum,
            total_optimization_potential: total_potential_sum,
            optimization_rate: percentage(cases_with_potential, total_cases),
            category_summaries,
            top_opportunities: analyses
                .into_iter()
                .take(TOP_OPPORTUNITY_LIMIT)
                .collect(),
            risk_distribution,
        };
        debug!(cases = report.total_cases, potential = %report.total_optimization_potential, "batch analysis complete");
        report
    }
}

#[derive(Default)]
struct CategoryAccumulator {
    cases: usize,
    current_revenue: Money,
    potential_revenue: Money,
    best_suggestions: Vec<OptimizationSuggestion>,
}

fn percentage(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part as u64) / Decimal::from(whole as u64) * Decimal::ONE_HUNDRED).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use domain_grouping::{DischargeStatus, PreGrouper, Sex};
    use reference_data::ReferenceCatalog;

    fn encounter(id: &str, main_dx: &str, procedures: Vec<&str>, age: i32, los: i32) -> Encounter {
        let admission = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        Encounter {
            patient_id: id.to_string(),
            age,
            sex: Sex::Male,
            admission_date: admission,
            discharge_date: admission + chrono::Days::new(los.max(0) as u64),
            los,
            main_diagnosis: main_dx.to_string(),
            secondary_diagnoses: vec![],
            procedures: procedures.into_iter().map(String::from).collect(),
            discharge_status: DischargeStatus::Routine,
            claim_number: Some(format!("CLM-{id}")),
        }
    }

    fn classified(
        catalog: &ReferenceCatalog,
        encounters: Vec<Encounter>,
    ) -> Vec<(Encounter, ClassificationResult)> {
        let grouper = PreGrouper::new(catalog);
        encounters
            .into_iter()
            .map(|e| {
                let r = grouper.classify(&e);
                (e, r)
            })
            .collect()
    }

    #[test]
    fn test_batch_report_totals_and_grouping() {
        let catalog = ReferenceCatalog::standard_2024();
        let analyzer = OptimizationAnalyzer::new(&catalog);

        let cases = classified(
            &catalog,
            vec![
                encounter("P-1", "J35.0", vec!["Q2161"], 30, 2),
                encounter("P-2", "J35.0", vec!["Q2161"], 75, 2),
                encounter("P-3", "O80.0", vec![], 28, 3),
            ],
        );

        let report = analyzer.analyze_batch(&cases, None, Money::zero());

        assert_eq!(report.total_cases, 3);
        assert_eq!(
            report.total_optimization_potential,
            report.total_potential_revenue - report.total_current_revenue
        );
        // D12 cases group under C, the delivery under N
        let categories: Vec<char> = report
            .category_summaries
            .iter()
            .map(|s| s.major_category.as_char())
            .collect();
        assert_eq!(categories, vec!['C', 'N']);
        assert!(report.top_opportunities.len() <= TOP_OPPORTUNITY_LIMIT);
        assert!(report
            .top_opportunities
            .windows(2)
            .all(|w| w[0].total_potential >= w[1].total_potential));
    }

    #[test]
    fn test_category_filter() {
        let catalog = ReferenceCatalog::standard_2024();
        let analyzer = OptimizationAnalyzer::new(&catalog);

        let cases = classified(
            &catalog,
            vec![
                encounter("P-1", "J35.0", vec!["Q2161"], 30, 2),
                encounter("P-2", "O80.0", vec![], 28, 3),
            ],
        );

        let only_n = MajorCategory::new('N').unwrap();
        let report = analyzer.analyze_batch(&cases, Some(only_n), Money::zero());
        assert_eq!(report.total_cases, 1);
        assert_eq!(report.category_summaries.len(), 1);
        assert_eq!(report.category_summaries[0].major_category, only_n);
    }

    #[test]
    fn test_min_potential_threshold() {
        let catalog = ReferenceCatalog::standard_2024();
        let analyzer = OptimizationAnalyzer::new(&catalog);

        let cases = classified(
            &catalog,
            vec![encounter("P-1", "J35.0", vec!["Q2161"], 30, 2)],
        );

        let report = analyzer.analyze_batch(&cases, None, Money::from_won(100_000_000));
        assert_eq!(report.total_cases, 0);
        assert_eq!(report.optimization_rate, Decimal::ZERO);
    }

    #[test]
    fn test_risk_distribution_counts_best_suggestions() {
        let catalog = ReferenceCatalog::standard_2024();
        let analyzer = OptimizationAnalyzer::new(&catalog);

        let cases = classified(
            &catalog,
            vec![
                encounter("P-1", "J35.0", vec!["Q2161"], 30, 2),
                encounter("P-2", "K80.2", vec!["Q7651"], 50, 4),
            ],
        );

        let report = analyzer.analyze_batch(&cases, None, Money::zero());
        let counted =
            report.risk_distribution.low + report.risk_distribution.medium + report.risk_distribution.high;
        let with_best = report
            .top_opportunities
            .iter()
            .filter(|a| a.best_suggestion.is_some())
            .count();
        assert_eq!(counted, with_best);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1, 3), Decimal::new(3333, 2));
        assert_eq!(percentage(0, 0), Decimal::ZERO);
    }
}
