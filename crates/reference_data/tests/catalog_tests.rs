//! Integration tests for the reference catalog and rule tables

use core_kernel::{normalize_clinical_code, KdrgCode, MajorCategory, Money};
use proptest::prelude::*;
use reference_data::rules::{major_category_for, matches_cc, matches_mcc, DEFAULT_LOS_RANGE};
use reference_data::{BundleGroup, ReferenceCatalog};
use rust_decimal_macros::dec;

#[test]
fn every_entry_code_is_consistent() {
    let catalog = ReferenceCatalog::standard_2024();
    for entry in catalog.bundled_entries() {
        assert_eq!(entry.code.aadrg(), entry.aadrg);
        assert_eq!(entry.code.severity(), entry.severity);
        assert_eq!(entry.code.major_category(), entry.major_category);
    }
}

#[test]
fn weights_increase_with_severity_within_a_group() {
    let catalog = ReferenceCatalog::standard_2024();
    for aadrg in ["D121", "H061", "E011", "R601"] {
        let code = KdrgCode::new(format!("{aadrg}0")).unwrap();
        let ladder = catalog.severity_options(&code);
        assert_eq!(ladder.len(), 4, "ladder for {aadrg}");
        assert!(ladder
            .windows(2)
            .all(|w| w[0].relative_weight < w[1].relative_weight));
        assert!(ladder.windows(2).all(|w| w[0].base_amount < w[1].base_amount));
    }
}

#[test]
fn bundle_groups_all_have_catalog_entries() {
    let catalog = ReferenceCatalog::standard_2024();
    for group in BundleGroup::ALL {
        let code = format!("{group}10");
        let entry = catalog
            .lookup(&code)
            .unwrap_or_else(|| panic!("missing {code}"));
        assert_eq!(entry.bundle, Some(group));
    }
}

#[test]
fn vaginal_delivery_bundle_needs_no_procedure() {
    let catalog = ReferenceCatalog::standard_2024();
    let delivery = catalog.bundle(BundleGroup::O60).unwrap();
    assert!(delivery.diagnosis_only());
    assert!(delivery.matches_diagnosis(&normalize_clinical_code("O80.0")));
}

#[test]
fn tonsillectomy_bundle_parameters() {
    let catalog = ReferenceCatalog::standard_2024();
    let tonsil = catalog.bundle(BundleGroup::D12).unwrap();
    assert_eq!(tonsil.base_weight, dec!(0.8));
    assert_eq!((tonsil.los_lower, tonsil.los_upper), (1, 3));
    assert!(tonsil.matches_diagnosis(&normalize_clinical_code("J35.0")));
    assert!(tonsil.matches_procedures(&["Q2161".to_string()]));
}

#[test]
fn revenue_difference_one_severity_step() {
    let catalog = ReferenceCatalog::standard_2024();
    let delta = catalog.revenue_difference("D1210", "D1211").unwrap();
    assert_eq!(delta.amount, Money::from_won(6_960));
    assert_eq!(delta.percent, dec!(11.11));
}

#[test]
fn major_category_table_covers_common_chapters() {
    assert_eq!(major_category_for("J350").category, 'C');
    assert_eq!(major_category_for("J44").category, 'D');
    assert_eq!(major_category_for("I50").category, 'E');
    assert_eq!(major_category_for("K80").category, 'F');
    assert_eq!(major_category_for("O800").category, 'N');
    assert_eq!(major_category_for("ZZZ").category, 'W');
}

#[test]
fn cc_and_mcc_lists_are_disjoint_on_samples() {
    assert!(matches_mcc("J960") && !matches_cc("J960"));
    assert!(matches_cc("I10") && !matches_mcc("I10"));
}

#[test]
fn default_los_range_for_unbundled_groups() {
    assert_eq!(DEFAULT_LOS_RANGE, (3, 10));
}

#[test]
fn best_surgical_ignores_medical_groups() {
    let catalog = ReferenceCatalog::standard_2024();
    let category = MajorCategory::new('A').unwrap();
    let best = catalog.best_surgical(category).unwrap();
    assert_eq!(best.code.as_str(), "A0113");
    assert!(best.surgical);
}

proptest! {
    #[test]
    fn lookup_never_panics_on_arbitrary_input(code in ".{0,10}") {
        let catalog = ReferenceCatalog::standard_2024();
        let _ = catalog.lookup(&code);
    }

    #[test]
    fn alternatives_stay_within_the_adjacent_group(aadrg in prop::sample::select(vec![
        "D121", "H061", "E601", "A011", "R601",
    ])) {
        let catalog = ReferenceCatalog::standard_2024();
        let code = KdrgCode::new(format!("{aadrg}1")).unwrap();
        let alts = catalog.alternatives(&code);
        prop_assert_eq!(alts.len(), 3);
        for alt in alts {
            prop_assert_eq!(alt.aadrg.as_str(), aadrg);
            prop_assert_ne!(alt.code.as_str(), code.as_str());
        }
    }
}
