//! Accuracy statistics, trend detection, and improvement recommendations
//!
//! Everything here is a pure aggregation over an already-compared record
//! set. Maps are B-tree keyed so serialized reports list months, causes,
//! and bundles in a stable order.

use std::collections::BTreeMap;

use core_kernel::Money;
use reference_data::{BundleGroup, MismatchCause};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::{ComparisonRecord, MismatchType};

const TOP_PATTERN_LIMIT: usize = 20;
const BUNDLE_MISMATCH_DETAIL_LIMIT: usize = 5;
const ACCURACY_TARGET: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
const TREND_BAND: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// A recurring predicted-to-adjudicated code transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchPattern {
    pub predicted: String,
    pub actual: String,
    pub count: usize,
    /// Summed predicted-minus-adjudicated amount over the pattern
    pub total_delta: Money,
}

/// Direction of the monthly accuracy series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// One templated process-improvement action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImprovementRecommendation {
    pub priority: Priority,
    pub category: String,
    pub issue: String,
    pub recommendation: String,
    pub affected_cases: usize,
    pub potential_impact: Money,
}

/// Aggregate accuracy view over a comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonStatistics {
    pub total_cases: usize,
    pub exact_matches: usize,
    pub severity_mismatches: usize,
    pub aadrg_mismatches: usize,
    pub mdc_mismatches: usize,

    /// Percent of cases that matched exactly
    pub exact_accuracy: Decimal,
    /// Percent counting severity-only misses as correct
    pub severity_tolerant_accuracy: Decimal,
    /// Percent counting everything but category misses as correct
    pub aadrg_tolerant_accuracy: Decimal,

    pub total_predicted_amount: Money,
    pub total_actual_amount: Money,
    /// Predicted minus adjudicated, summed
    pub total_difference: Money,

    pub cause_distribution: BTreeMap<MismatchCause, usize>,
    pub top_mismatch_patterns: Vec<MismatchPattern>,
    /// Exact-match rate per admission month (`YYYY-MM`)
    pub monthly_accuracy: BTreeMap<String, Decimal>,
    pub trend: TrendLabel,
}

impl ComparisonStatistics {
    pub fn from_records(records: &[ComparisonRecord]) -> Self {
        let total_cases = records.len();

        let mut exact_matches = 0usize;
        let mut severity_mismatches = 0usize;
        let mut aadrg_mismatches = 0usize;
        let mut mdc_mismatches = 0usize;
        for record in records {
            match record.mismatch_type {
                MismatchType::ExactMatch => exact_matches += 1,
                MismatchType::SeverityDiff => severity_mismatches += 1,
                MismatchType::AadrgDiff => aadrg_mismatches += 1,
                MismatchType::MdcDiff => mdc_mismatches += 1,
            }
        }

        let total_predicted_amount: Money = records.iter().map(|r| r.predicted_amount).sum();
        let total_actual_amount: Money = records.iter().map(|r| r.actual_amount).sum();
        let total_difference: Money = records.iter().map(|r| r.amount_delta).sum();

        let mut cause_distribution: BTreeMap<MismatchCause, usize> = BTreeMap::new();
        for record in records {
            for cause in &record.causes {
                *cause_distribution.entry(*cause).or_insert(0) += 1;
            }
        }

        let monthly_accuracy = monthly_accuracy(records);
        let trend = trend(&monthly_accuracy);

        debug!(
            total_cases,
            exact_matches, severity_mismatches, aadrg_mismatches, mdc_mismatches,
            "comparison statistics aggregated"
        );

        Self {
            total_cases,
            exact_matches,
            severity_mismatches,
            aadrg_mismatches,
            mdc_mismatches,
            exact_accuracy: percentage(exact_matches, total_cases),
            severity_tolerant_accuracy: percentage(exact_matches + severity_mismatches, total_cases),
            aadrg_tolerant_accuracy: percentage(
                total_cases.saturating_sub(mdc_mismatches),
                total_cases,
            ),
            total_predicted_amount,
            total_actual_amount,
            total_difference,
            cause_distribution,
            top_mismatch_patterns: top_patterns(records),
            monthly_accuracy,
            trend,
        }
    }
}

fn percentage(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part as u64) * Decimal::ONE_HUNDRED / Decimal::from(whole as u64)).round_dp(2)
}

fn monthly_accuracy(records: &[ComparisonRecord]) -> BTreeMap<String, Decimal> {
    let mut per_month: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for record in records {
        let month = record.admission_date.format("%Y-%m").to_string();
        let bucket = per_month.entry(month).or_insert((0, 0));
        bucket.1 += 1;
        if record.is_match {
            bucket.0 += 1;
        }
    }

    per_month
        .into_iter()
        .map(|(month, (matches, total))| (month, percentage(matches, total)))
        .collect()
}

/// Compares the mean accuracy of the later half of the monthly series
/// against the earlier half, with a flat band read as stable
fn trend(monthly: &BTreeMap<String, Decimal>) -> TrendLabel {
    if monthly.len() < 2 {
        return TrendLabel::InsufficientData;
    }

    let series: Vec<Decimal> = monthly.values().copied().collect();
    let split = series.len() / 2;
    let early = mean(&series[..split]);
    let late = mean(&series[split..]);

    if late > early + TREND_BAND {
        TrendLabel::Improving
    } else if late < early - TREND_BAND {
        TrendLabel::Declining
    } else {
        TrendLabel::Stable
    }
}

fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().copied().sum::<Decimal>() / Decimal::from(values.len() as u64)
}

fn top_patterns(records: &[ComparisonRecord]) -> Vec<MismatchPattern> {
    let mut by_pair: BTreeMap<(String, String), (usize, Money)> = BTreeMap::new();
    for record in records.iter().filter(|r| !r.is_match) {
        let key = (record.predicted_kdrg.clone(), record.actual_kdrg.clone());
        let entry = by_pair.entry(key).or_insert((0, Money::zero()));
        entry.0 += 1;
        entry.1 = entry.1 + record.amount_delta;
    }

    let mut patterns: Vec<MismatchPattern> = by_pair
        .into_iter()
        .map(|((predicted, actual), (count, total_delta))| MismatchPattern {
            predicted,
            actual,
            count,
            total_delta,
        })
        .collect();

    // count descending; the B-tree walk already ordered ties by code pair
    patterns.sort_by(|a, b| b.count.cmp(&a.count));
    patterns.truncate(TOP_PATTERN_LIMIT);
    patterns
}

/// Templated improvement actions derived from the cause distribution
///
/// Cause volume drives priority. A below-target exact accuracy prepends a
/// whole-process recommendation carrying the summed amount difference as
/// its impact.
pub fn improvement_recommendations(
    statistics: &ComparisonStatistics,
) -> Vec<ImprovementRecommendation> {
    let mut by_volume: Vec<(MismatchCause, usize)> = statistics
        .cause_distribution
        .iter()
        .map(|(cause, count)| (*cause, *count))
        .collect();
    by_volume.sort_by(|a, b| b.1.cmp(&a.1));

    let mut recommendations = Vec::new();
    for (cause, count) in by_volume {
        let (category, action) = match cause {
            MismatchCause::DiagnosisCoding => (
                "Diagnosis coding",
                "Retrain principal-diagnosis selection and refresh the coding guidelines",
            ),
            MismatchCause::ProcedureCoding => (
                "Procedure coding",
                "Audit and update the procedure code mapping tables",
            ),
            MismatchCause::SeverityAssessment => (
                "Severity assessment",
                "Introduce a complication/comorbidity coding checklist",
            ),
            MismatchCause::Complication => (
                "Complication capture",
                "Add automated alerts for missing secondary diagnoses",
            ),
            MismatchCause::Documentation => (
                "Documentation",
                "Monitor chart completeness and close the feedback loop",
            ),
            _ => continue,
        };

        let priority = if count >= 10 {
            Priority::High
        } else if count >= 5 {
            Priority::Medium
        } else {
            Priority::Low
        };

        recommendations.push(ImprovementRecommendation {
            priority,
            category: category.to_string(),
            issue: format!("{count} mismatches attributed to this cause"),
            recommendation: action.to_string(),
            affected_cases: count,
            potential_impact: Money::zero(),
        });
    }

    if statistics.exact_accuracy < ACCURACY_TARGET && statistics.total_cases > 0 {
        recommendations.insert(
            0,
            ImprovementRecommendation {
                priority: Priority::High,
                category: "Overall process".to_string(),
                issue: format!(
                    "Exact-match accuracy {}% is below the 80% target",
                    statistics.exact_accuracy
                ),
                recommendation:
                    "Review the full pre-adjudication classification workflow end to end"
                        .to_string(),
                affected_cases: statistics.total_cases - statistics.exact_matches,
                potential_impact: statistics.total_difference.abs(),
            },
        );
    }

    recommendations
}

/// One mismatched claim inside a bundle bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchDetail {
    pub claim_number: String,
    pub predicted: String,
    pub actual: String,
    pub amount_delta: Money,
}

/// Accuracy of one bundle bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleAccuracy {
    pub total: usize,
    pub matches: usize,
    pub accuracy: Decimal,
    pub total_delta: Money,
    /// Largest-delta mismatches in the bucket, at most five
    pub mismatches: Vec<MismatchDetail>,
}

/// Buckets records by the bundle group of the predicted code
///
/// Every bundle group gets a bucket even when empty; predictions outside
/// any bundle land in `OTHER`.
pub fn bundle_accuracy(records: &[ComparisonRecord]) -> BTreeMap<String, BundleAccuracy> {
    let mut buckets: BTreeMap<String, (usize, usize, Money, Vec<MismatchDetail>)> =
        BundleGroup::ALL
            .iter()
            .map(|g| (g.as_str().to_string(), (0, 0, Money::zero(), Vec::new())))
            .chain(std::iter::once((
                "OTHER".to_string(),
                (0, 0, Money::zero(), Vec::new()),
            )))
            .collect();

    for record in records {
        let key = BundleGroup::ALL
            .iter()
            .find(|g| record.predicted_kdrg.starts_with(g.as_str()))
            .map(|g| g.as_str().to_string())
            .unwrap_or_else(|| "OTHER".to_string());

        let bucket = buckets
            .get_mut(&key)
            .expect("every bundle key is pre-seeded");
        bucket.0 += 1;
        bucket.2 = bucket.2 + record.amount_delta;
        if record.is_match {
            bucket.1 += 1;
        } else {
            bucket.3.push(MismatchDetail {
                claim_number: record.claim_number.clone(),
                predicted: record.predicted_kdrg.clone(),
                actual: record.actual_kdrg.clone(),
                amount_delta: record.amount_delta,
            });
        }
    }

    buckets
        .into_iter()
        .map(|(key, (total, matches, total_delta, mut mismatches))| {
            mismatches.sort_by(|a, b| {
                b.amount_delta
                    .abs()
                    .cmp(&a.amount_delta.abs())
                    .then_with(|| a.claim_number.cmp(&b.claim_number))
            });
            mismatches.truncate(BUNDLE_MISMATCH_DETAIL_LIMIT);
            (
                key,
                BundleAccuracy {
                    total,
                    matches,
                    accuracy: percentage(matches, total),
                    total_delta,
                    mismatches,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_kernel::CodeParts;
    use rust_decimal_macros::dec;

    fn record(
        claim: &str,
        month: u32,
        predicted: &str,
        actual: &str,
        delta_won: i64,
    ) -> ComparisonRecord {
        let mismatch_type = if predicted == actual {
            MismatchType::ExactMatch
        } else if predicted[..4] == actual[..4] {
            MismatchType::SeverityDiff
        } else if predicted[..1] == actual[..1] {
            MismatchType::AadrgDiff
        } else {
            MismatchType::MdcDiff
        };

        ComparisonRecord {
            claim_number: claim.to_string(),
            patient_id: format!("P-{claim}"),
            admission_date: NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
            los: 3,
            main_diagnosis: "J35.0".to_string(),
            predicted_kdrg: predicted.to_string(),
            predicted_parts: CodeParts::decompose(predicted),
            predicted_amount: Money::from_won(100_000 + delta_won.max(0)),
            actual_kdrg: actual.to_string(),
            actual_parts: CodeParts::decompose(actual),
            actual_amount: Money::from_won(100_000 - delta_won.min(0)),
            amount_delta: Money::from_won(delta_won),
            is_match: mismatch_type == MismatchType::ExactMatch,
            mismatch_type,
            causes: vec![MismatchCause::Unknown],
            adjustment_reason: None,
            risk_score: mismatch_type.base_risk(),
            recommendation: String::new(),
        }
    }

    fn ten_records() -> Vec<ComparisonRecord> {
        let mut records = Vec::new();
        for i in 0..6 {
            records.push(record(&format!("E{i}"), 1, "D1210", "D1210", 0));
        }
        records.push(record("S0", 1, "D1210", "D1211", -6_960));
        records.push(record("S1", 1, "D1210", "D1212", -15_660));
        records.push(record("A0", 1, "D1210", "D1310", -4_350));
        records.push(record("M0", 1, "D1210", "H0611", -46_110));
        records
    }

    #[test]
    fn test_accuracy_tiers() {
        let stats = ComparisonStatistics::from_records(&ten_records());

        assert_eq!(stats.total_cases, 10);
        assert_eq!(stats.exact_matches, 6);
        assert_eq!(stats.severity_mismatches, 2);
        assert_eq!(stats.aadrg_mismatches, 1);
        assert_eq!(stats.mdc_mismatches, 1);

        assert_eq!(stats.exact_accuracy, dec!(60.00));
        assert_eq!(stats.severity_tolerant_accuracy, dec!(80.00));
        assert_eq!(stats.aadrg_tolerant_accuracy, dec!(90.00));
    }

    #[test]
    fn test_amount_totals() {
        let stats = ComparisonStatistics::from_records(&ten_records());
        assert_eq!(stats.total_difference, Money::from_won(-73_080));
        assert_eq!(
            stats.total_predicted_amount - stats.total_actual_amount,
            stats.total_difference
        );
    }

    #[test]
    fn test_empty_input() {
        let stats = ComparisonStatistics::from_records(&[]);
        assert_eq!(stats.total_cases, 0);
        assert_eq!(stats.exact_accuracy, Decimal::ZERO);
        assert_eq!(stats.trend, TrendLabel::InsufficientData);
        assert!(improvement_recommendations(&stats).is_empty());
    }

    #[test]
    fn test_top_patterns_ordering() {
        let mut records = ten_records();
        records.push(record("S2", 1, "D1210", "D1211", -6_960));

        let stats = ComparisonStatistics::from_records(&records);
        let first = &stats.top_mismatch_patterns[0];
        assert_eq!(first.predicted, "D1210");
        assert_eq!(first.actual, "D1211");
        assert_eq!(first.count, 2);
        assert_eq!(first.total_delta, Money::from_won(-13_920));
    }

    #[test]
    fn test_trend_labels() {
        let mut improving = BTreeMap::new();
        improving.insert("2024-01".to_string(), dec!(60));
        improving.insert("2024-02".to_string(), dec!(62));
        improving.insert("2024-03".to_string(), dec!(80));
        improving.insert("2024-04".to_string(), dec!(85));
        assert_eq!(trend(&improving), TrendLabel::Improving);

        let mut declining = BTreeMap::new();
        declining.insert("2024-01".to_string(), dec!(90));
        declining.insert("2024-02".to_string(), dec!(70));
        assert_eq!(trend(&declining), TrendLabel::Declining);

        let mut stable = BTreeMap::new();
        stable.insert("2024-01".to_string(), dec!(80));
        stable.insert("2024-02".to_string(), dec!(82));
        assert_eq!(trend(&stable), TrendLabel::Stable);

        let mut single = BTreeMap::new();
        single.insert("2024-01".to_string(), dec!(80));
        assert_eq!(trend(&single), TrendLabel::InsufficientData);
    }

    #[test]
    fn test_monthly_series() {
        let mut records = ten_records(); // all January, 60%
        for i in 0..4 {
            records.push(record(&format!("F{i}"), 2, "D1210", "D1210", 0));
        }
        records.push(record("F4", 2, "D1210", "D1211", -6_960));

        let stats = ComparisonStatistics::from_records(&records);
        assert_eq!(stats.monthly_accuracy["2024-01"], dec!(60.00));
        assert_eq!(stats.monthly_accuracy["2024-02"], dec!(80.00));
        assert_eq!(stats.trend, TrendLabel::Improving);
    }

    #[test]
    fn test_low_accuracy_prepends_process_recommendation() {
        let stats = ComparisonStatistics::from_records(&ten_records());
        assert!(stats.exact_accuracy < dec!(80));

        let recs = improvement_recommendations(&stats);
        assert!(!recs.is_empty());
        let first = &recs[0];
        assert_eq!(first.priority, Priority::High);
        assert_eq!(first.category, "Overall process");
        assert_eq!(first.affected_cases, 4);
        assert_eq!(first.potential_impact, Money::from_won(73_080));
    }

    #[test]
    fn test_cause_volume_drives_priority() {
        let mut records = Vec::new();
        for i in 0..12 {
            let mut r = record(&format!("X{i}"), 1, "D1210", "D1211", -6_960);
            r.causes = vec![MismatchCause::SeverityAssessment];
            records.push(r);
        }
        for i in 0..6 {
            let mut r = record(&format!("Y{i}"), 1, "D1210", "H0611", -46_110);
            r.causes = vec![MismatchCause::DiagnosisCoding];
            records.push(r);
        }

        let stats = ComparisonStatistics::from_records(&records);
        let recs = improvement_recommendations(&stats);

        // accuracy is 0, so the process recommendation leads
        assert_eq!(recs[0].category, "Overall process");
        assert_eq!(recs[1].category, "Severity assessment");
        assert_eq!(recs[1].priority, Priority::High);
        assert_eq!(recs[2].category, "Diagnosis coding");
        assert_eq!(recs[2].priority, Priority::Medium);
    }

    #[test]
    fn test_bundle_buckets() {
        let buckets = bundle_accuracy(&ten_records());

        // all eight groups plus the fee-for-service bucket
        assert_eq!(buckets.len(), 9);
        let d12 = &buckets["D12"];
        assert_eq!(d12.total, 10);
        assert_eq!(d12.matches, 6);
        assert_eq!(d12.accuracy, dec!(60.00));
        assert_eq!(d12.mismatches.len(), 4);
        // sorted by delta magnitude
        assert_eq!(d12.mismatches[0].claim_number, "M0");
        assert_eq!(buckets["OTHER"].total, 0);
    }
}
