//! The nine-step grouping pipeline
//!
//! Step order is a contract, not an implementation detail: severity feeds
//! the code and the weight, the bundle match feeds the weight and the LOS
//! bounds, and the outlier verdict feeds the payment estimate.

use core_kernel::{AadrgCode, PointRate, Severity};
use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, instrument};

use reference_data::rules::{major_category_for, matches_cc, matches_mcc, DEFAULT_LOS_RANGE};
use reference_data::{BundleDefinition, ReferenceCatalog};

use crate::encounter::Encounter;
use crate::result::{ClassificationResult, LosOutlier, TrailStep};
use crate::validation::{validate_encounter, ClassificationWarning};

const NO_BUNDLE_PENALTY: i32 = 20;
const PER_WARNING_PENALTY: i32 = 5;
const NO_PROCEDURE_PENALTY: i32 = 10;
const CONFIDENCE_FLOOR: i32 = 30;

const SHORT_STAY_FACTOR: Decimal = dec!(0.9);
const LONG_STAY_PER_DIEM_FACTOR: Decimal = dec!(0.3);

/// The KDRG pre-grouper, borrowing the shared reference catalog
#[derive(Debug, Clone, Copy)]
pub struct PreGrouper<'c> {
    catalog: &'c ReferenceCatalog,
}

impl<'c> PreGrouper<'c> {
    pub fn new(catalog: &'c ReferenceCatalog) -> Self {
        Self { catalog }
    }

    /// Classifies one encounter; never fails
    #[instrument(skip(self, encounter), fields(patient_id = %encounter.patient_id))]
    pub fn classify(&self, encounter: &Encounter) -> ClassificationResult {
        let mut warnings = validate_encounter(encounter);
        let validation_warning_count = warnings.len();
        let mut trail = Vec::with_capacity(5);

        let main_dx = encounter.main_diagnosis_normalized();
        let procedures = encounter.procedures_normalized();

        // 1. Major category from the main diagnosis
        let mdc_rule = major_category_for(&main_dx);
        let major_category = core_kernel::MajorCategory::new(mdc_rule.category)
            .expect("rule table categories are letters");
        trail.push(TrailStep::MajorCategory {
            category: major_category,
            name: mdc_rule.name.to_string(),
        });

        // 2. Bundled-payment-group check; first match wins
        let bundle = self.match_bundle(&main_dx, &procedures);
        match bundle {
            Some(def) => trail.push(TrailStep::BundleMatched {
                group: def.group,
                name: def.group.name().to_string(),
            }),
            None => trail.push(TrailStep::NoBundleMatched),
        }

        // 3. Severity from CC/MCC lists plus age and stay adjustments
        let severity = self.compute_severity(encounter);
        trail.push(TrailStep::SeverityAssigned { severity });

        // 4. Parent group
        let aadrg = self.generate_aadrg(mdc_rule.category, bundle, &procedures);
        trail.push(TrailStep::ParentGroupAssigned { aadrg: aadrg.clone() });

        // 5. Full code
        let kdrg = aadrg.with_severity(severity);
        trail.push(TrailStep::CodeAssigned { kdrg: kdrg.clone() });

        // 6. Relative weight
        let base_weight = bundle.map(|d| d.base_weight).unwrap_or(dec!(1.0));
        let mut weight = base_weight * severity.weight_multiplier();
        if encounter.los > 7 {
            weight *= dec!(1.1);
        } else if encounter.los < 2 {
            weight *= dec!(0.95);
        }
        let weight = weight.round_dp(4);

        // 7. LOS outlier against the bundle range, or the default range
        let (los_lower, los_upper) = bundle
            .map(|d| (d.los_lower, d.los_upper))
            .unwrap_or(DEFAULT_LOS_RANGE);
        let los_outlier = if encounter.los < i32::from(los_lower) {
            LosOutlier::Short
        } else if encounter.los > i32::from(los_upper) {
            LosOutlier::Long
        } else {
            LosOutlier::Normal
        };
        if los_outlier != LosOutlier::Normal {
            warnings.push(ClassificationWarning::LosOutlier {
                outlier: los_outlier,
                los: encounter.los,
                lower: los_lower,
                upper: los_upper,
            });
        }

        // 8. Payment estimate
        let rate = self.catalog.point_rate();
        let base_amount = rate.amount_for(weight);
        let estimated_amount = match los_outlier {
            LosOutlier::Short => base_amount.multiply(SHORT_STAY_FACTOR),
            LosOutlier::Long => {
                let extra_days = Decimal::from(encounter.los - i32::from(los_upper));
                base_amount + long_stay_surcharge(rate, extra_days)
            }
            LosOutlier::Normal => base_amount,
        }
        .round_to_won();

        // 9. Confidence
        let mut confidence: i32 = 100;
        if bundle.is_none() {
            confidence -= NO_BUNDLE_PENALTY;
        }
        confidence -= PER_WARNING_PENALTY * validation_warning_count as i32;
        if procedures.is_empty() {
            confidence -= NO_PROCEDURE_PENALTY;
        }
        let confidence = confidence.max(CONFIDENCE_FLOOR) as u8;

        let surgical = bundle
            .map(|d| !d.diagnosis_only())
            .unwrap_or(!procedures.is_empty());

        debug!(kdrg = %kdrg, severity = %severity, confidence, "encounter classified");

        ClassificationResult {
            patient_id: encounter.patient_id.clone(),
            claim_number: encounter.claim_number.clone(),
            major_category,
            major_category_name: mdc_rule.name.to_string(),
            aadrg,
            kdrg,
            severity,
            relative_weight: weight,
            base_amount,
            estimated_amount,
            los: encounter.los,
            los_lower,
            los_upper,
            los_outlier,
            bundle: bundle.map(|d| d.group),
            surgical,
            trail,
            warnings,
            confidence,
        }
    }

    /// Classifies a batch in parallel, preserving input order
    pub fn classify_batch(&self, encounters: &[Encounter]) -> Vec<ClassificationResult> {
        encounters.par_iter().map(|e| self.classify(e)).collect()
    }

    fn match_bundle(
        &self,
        main_dx: &str,
        procedures: &[String],
    ) -> Option<&'c BundleDefinition> {
        self.catalog.bundles().iter().find(|def| {
            def.matches_diagnosis(main_dx)
                && (def.diagnosis_only() || def.matches_procedures(procedures))
        })
    }

    fn compute_severity(&self, encounter: &Encounter) -> Severity {
        let diagnoses = encounter.all_diagnoses_normalized();

        let mut severity = if diagnoses.iter().any(|dx| matches_mcc(dx)) {
            Severity::Major
        } else if diagnoses.iter().any(|dx| matches_cc(dx)) {
            Severity::Moderate
        } else {
            Severity::None
        };

        if encounter.age >= 70 || encounter.age < 1 {
            severity = severity.saturating_inc();
        }
        if encounter.los > 14 {
            severity = severity.saturating_inc();
        }

        severity
    }

    fn generate_aadrg(
        &self,
        category: char,
        bundle: Option<&BundleDefinition>,
        procedures: &[String],
    ) -> AadrgCode {
        let code = match bundle {
            Some(def) => format!("{}1", def.group),
            None if !procedures.is_empty() => format!("{category}01A"),
            None => format!("{category}60A"),
        };
        AadrgCode::new(code).expect("generated AADRG is 4 alphanumeric chars")
    }
}

fn long_stay_surcharge(rate: PointRate, extra_days: Decimal) -> core_kernel::Money {
    core_kernel::Money::new(extra_days * rate.won_per_point() * LONG_STAY_PER_DIEM_FACTOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encounter::{DischargeStatus, Sex};
    use chrono::NaiveDate;
    use core_kernel::Money;

    fn encounter(main_dx: &str, procedures: Vec<&str>, age: i32, los: i32) -> Encounter {
        let admission = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        Encounter {
            patient_id: "P-1".to_string(),
            age,
            sex: Sex::Male,
            admission_date: admission,
            discharge_date: admission + chrono::Days::new(los.max(0) as u64),
            los,
            main_diagnosis: main_dx.to_string(),
            secondary_diagnoses: vec![],
            procedures: procedures.into_iter().map(String::from).collect(),
            discharge_status: DischargeStatus::Routine,
            claim_number: None,
        }
    }

    #[test]
    fn test_tonsillectomy_bundle_path() {
        let catalog = ReferenceCatalog::standard_2024();
        let grouper = PreGrouper::new(&catalog);

        let result = grouper.classify(&encounter("J35.0", vec!["Q2161"], 30, 2));

        assert_eq!(result.major_category.as_char(), 'C');
        assert_eq!(result.bundle, Some(reference_data::BundleGroup::D12));
        assert_eq!(result.aadrg.as_str(), "D121");
        assert_eq!(result.kdrg.as_str(), "D1210");
        assert_eq!(result.severity, Severity::None);
        assert_eq!(result.relative_weight, dec!(0.72));
        assert_eq!(result.base_amount, Money::from_won(62_640));
        assert_eq!(result.estimated_amount, Money::from_won(62_640));
        assert_eq!(result.los_outlier, LosOutlier::Normal);
        assert_eq!(result.confidence, 100);
        assert!(result.surgical);
    }

    #[test]
    fn test_medical_path_without_procedures() {
        let catalog = ReferenceCatalog::standard_2024();
        let grouper = PreGrouper::new(&catalog);

        let result = grouper.classify(&encounter("I50.0", vec![], 55, 5));

        // I50 is on the MCC list, so severity starts at 3
        assert_eq!(result.major_category.as_char(), 'E');
        assert_eq!(result.aadrg.as_str(), "E60A");
        assert_eq!(result.kdrg.as_str(), "E60A3");
        assert_eq!(result.severity, Severity::Major);
        assert!(!result.surgical);
        // no bundle (-20), no procedures (-10)
        assert_eq!(result.confidence, 70);
    }

    #[test]
    fn test_age_and_stay_raise_severity() {
        let catalog = ReferenceCatalog::standard_2024();
        let grouper = PreGrouper::new(&catalog);

        let result = grouper.classify(&encounter("I50.0", vec![], 72, 20));
        assert_eq!(result.severity, Severity::Extreme);

        let infant = grouper.classify(&encounter("J45.0", vec![], 0, 3));
        // CC base 2, infant bonus
        assert_eq!(infant.severity, Severity::Major);
    }

    #[test]
    fn test_short_stay_discounts_payment() {
        let catalog = ReferenceCatalog::standard_2024();
        let grouper = PreGrouper::new(&catalog);

        // H06 expects at least 3 days
        let result = grouper.classify(&encounter("K80.2", vec!["Q7651"], 50, 1));
        assert_eq!(result.los_outlier, LosOutlier::Short);
        // weight 1.2 * 0.9 * 0.95 = 1.026 -> 89262 won, short factor 0.9
        assert_eq!(result.base_amount, Money::from_won(89_262));
        assert_eq!(result.estimated_amount, Money::new(dec!(80335.8)).round_to_won());
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, ClassificationWarning::LosOutlier { .. })));
    }

    #[test]
    fn test_long_stay_adds_per_diem_surcharge() {
        let catalog = ReferenceCatalog::standard_2024();
        let grouper = PreGrouper::new(&catalog);

        let result = grouper.classify(&encounter("O80.0", vec![], 28, 6));
        assert_eq!(result.bundle, Some(reference_data::BundleGroup::O60));
        assert_eq!(result.los_outlier, LosOutlier::Long);
        // weight 1.0 * 0.9 = 0.9 -> 78300; 2 extra days * 87000 * 0.3 = 52200
        assert_eq!(result.estimated_amount, Money::from_won(130_500));
    }

    #[test]
    fn test_validation_warnings_lower_confidence() {
        let catalog = ReferenceCatalog::standard_2024();
        let grouper = PreGrouper::new(&catalog);

        let mut enc = encounter("", vec![], 130, -1);
        enc.discharge_date = enc.admission_date - chrono::Days::new(1);

        let result = grouper.classify(&enc);
        // four validation warnings, no bundle, no procedures
        assert_eq!(result.major_category.as_char(), 'W');
        assert_eq!(result.confidence, 50);
    }

    #[test]
    fn test_confidence_floor() {
        let catalog = ReferenceCatalog::standard(PointRate::krw_2024());
        let grouper = PreGrouper::new(&catalog);

        let mut enc = encounter("", vec![], -5, -3);
        enc.discharge_date = enc.admission_date - chrono::Days::new(2);
        enc.main_diagnosis = String::new();

        let result = grouper.classify(&enc);
        assert!(result.confidence >= 30);
    }

    #[test]
    fn test_batch_preserves_order() {
        let catalog = ReferenceCatalog::standard_2024();
        let grouper = PreGrouper::new(&catalog);

        let encounters = vec![
            encounter("J35.0", vec!["Q2161"], 30, 2),
            encounter("K80.2", vec!["Q7651"], 50, 4),
            encounter("I50.0", vec![], 55, 5),
        ];
        let results = grouper.classify_batch(&encounters);

        let codes: Vec<&str> = results.iter().map(|r| r.kdrg.as_str()).collect();
        assert_eq!(codes, vec!["D1210", "H0610", "E60A3"]);
    }
}
