//! End-to-end classification tests over the standard catalog

use core_kernel::Money;
use domain_grouping::{LosOutlier, PreGrouper, TrailStep};
use proptest::prelude::*;
use reference_data::{BundleGroup, ReferenceCatalog};
use rust_decimal_macros::dec;
use test_utils::{assert_kdrg_shape, encounter_strategy, EncounterBuilder, EncounterFixtures};

#[test]
fn test_bundled_surgical_stay_end_to_end() {
    let catalog = ReferenceCatalog::standard_2024();
    let grouper = PreGrouper::new(&catalog);

    let result = grouper.classify(&EncounterFixtures::tonsillectomy());

    assert_eq!(result.major_category.as_char(), 'C');
    assert_eq!(result.bundle, Some(BundleGroup::D12));
    assert_eq!(result.kdrg.as_str(), "D1210");
    assert_eq!(result.relative_weight, dec!(0.72));
    assert_eq!(result.base_amount, Money::from_won(62_640));
    assert_eq!(result.estimated_amount, Money::from_won(62_640));
    assert_eq!(result.los_outlier, LosOutlier::Normal);
    assert!(!result.is_outlier());
    assert_eq!(result.confidence, 100);
    assert!(result.warnings.is_empty());

    // the audit trail covers every decision point
    assert!(result
        .trail
        .iter()
        .any(|s| matches!(s, TrailStep::MajorCategory { .. })));
    assert!(result
        .trail
        .iter()
        .any(|s| matches!(s, TrailStep::BundleMatched { .. })));
    assert!(result
        .trail
        .iter()
        .any(|s| matches!(s, TrailStep::CodeAssigned { .. })));
}

#[test]
fn test_fixture_batch_codes() {
    let catalog = ReferenceCatalog::standard_2024();
    let grouper = PreGrouper::new(&catalog);

    let results = grouper.classify_batch(&EncounterFixtures::mixed_batch());
    let codes: Vec<&str> = results.iter().map(|r| r.kdrg.as_str()).collect();

    // tonsillectomy, heart failure (MCC + elderly), cholecystectomy with a
    // CC, diagnosis-only delivery, pneumonia with respiratory failure
    assert_eq!(codes, vec!["D1210", "E60A4", "H0612", "O6010", "C60A3"]);
}

#[test]
fn test_medical_fallback_reduces_confidence() {
    let catalog = ReferenceCatalog::standard_2024();
    let grouper = PreGrouper::new(&catalog);

    let result = grouper.classify(&EncounterFixtures::heart_failure());

    assert!(result.bundle.is_none());
    assert!(!result.surgical);
    // no bundle and no procedures
    assert_eq!(result.confidence, 70);
}

#[test]
fn test_diagnosis_only_bundle_counts_as_non_surgical() {
    let catalog = ReferenceCatalog::standard_2024();
    let grouper = PreGrouper::new(&catalog);

    let result = grouper.classify(&EncounterFixtures::vaginal_delivery());

    assert_eq!(result.bundle, Some(BundleGroup::O60));
    assert!(!result.surgical);
    assert_eq!(result.confidence, 90);
}

#[test]
fn test_long_stay_estimate_exceeds_base() {
    let catalog = ReferenceCatalog::standard_2024();
    let grouper = PreGrouper::new(&catalog);

    let enc = EncounterBuilder::new()
        .with_main_diagnosis("O80.0")
        .without_procedures()
        .with_age(28)
        .with_los(6)
        .build();
    let result = grouper.classify(&enc);

    assert_eq!(result.los_outlier, LosOutlier::Long);
    assert!(result.is_outlier());
    assert!(result.estimated_amount > result.base_amount);
}

#[test]
fn test_short_stay_estimate_is_discounted() {
    let catalog = ReferenceCatalog::standard_2024();
    let grouper = PreGrouper::new(&catalog);

    let enc = EncounterBuilder::new()
        .with_main_diagnosis("K80.2")
        .with_procedures(vec!["Q7651"])
        .with_age(50)
        .with_los(1)
        .build();
    let result = grouper.classify(&enc);

    assert_eq!(result.los_outlier, LosOutlier::Short);
    assert!(result.is_outlier());
    assert!(result.estimated_amount < result.base_amount);
}

#[test]
fn test_batch_matches_sequential_classification() {
    let catalog = ReferenceCatalog::standard_2024();
    let grouper = PreGrouper::new(&catalog);
    let encounters = EncounterFixtures::mixed_batch();

    let batch = grouper.classify_batch(&encounters);
    let sequential: Vec<_> = encounters.iter().map(|e| grouper.classify(e)).collect();

    assert_eq!(batch, sequential);
}

proptest! {
    #[test]
    fn test_classification_never_panics_and_code_is_well_formed(
        encounter in encounter_strategy()
    ) {
        let catalog = ReferenceCatalog::standard_2024();
        let grouper = PreGrouper::new(&catalog);

        let result = grouper.classify(&encounter);

        assert_kdrg_shape(result.kdrg.as_str());
        let aadrg = result.kdrg.aadrg();
        prop_assert_eq!(aadrg.as_str(), result.aadrg.as_str());
        prop_assert_eq!(result.kdrg.severity(), result.severity);
    }

    #[test]
    fn test_confidence_stays_in_band(encounter in encounter_strategy()) {
        let catalog = ReferenceCatalog::standard_2024();
        let grouper = PreGrouper::new(&catalog);

        let result = grouper.classify(&encounter);
        prop_assert!((30..=100).contains(&result.confidence));
    }

    #[test]
    fn test_adding_an_mcc_never_lowers_severity(encounter in encounter_strategy()) {
        let catalog = ReferenceCatalog::standard_2024();
        let grouper = PreGrouper::new(&catalog);

        let baseline = grouper.classify(&encounter);

        let mut worse = encounter;
        worse.secondary_diagnoses.push("J96.0".to_string());
        let upgraded = grouper.classify(&worse);

        prop_assert!(upgraded.severity >= baseline.severity);
    }

    #[test]
    fn test_classification_is_deterministic(encounter in encounter_strategy()) {
        let catalog = ReferenceCatalog::standard_2024();
        let grouper = PreGrouper::new(&catalog);

        prop_assert_eq!(grouper.classify(&encounter), grouper.classify(&encounter));
    }

    #[test]
    fn test_weight_and_amounts_are_positive(encounter in encounter_strategy()) {
        let catalog = ReferenceCatalog::standard_2024();
        let grouper = PreGrouper::new(&catalog);

        let result = grouper.classify(&encounter);
        prop_assert!(result.relative_weight > dec!(0));
        prop_assert!(result.base_amount.is_positive());
        prop_assert!(result.estimated_amount.is_positive());
    }
}
