//! Property-Based Test Generators
//!
//! Proptest strategies for random test data that stays inside the domain
//! invariants: well-formed clinical codes, catalog codes that actually
//! resolve, and encounters the validator accepts.

use chrono::NaiveDate;
use domain_grouping::{DischargeStatus, Encounter, Sex};
use proptest::prelude::*;
use reference_data::ReferenceCatalog;

/// Strategy for generating well-formed diagnosis codes (letter plus digits)
pub fn diagnosis_code_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Z][0-9]{2}(\\.[0-9]{1,2})?").expect("valid code pattern")
}

/// Strategy for generating well-formed procedure codes
pub fn procedure_code_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Z][0-9]{4}").expect("valid code pattern")
}

/// Strategy for generating codes present in the standard catalog
pub fn catalog_code_strategy() -> impl Strategy<Value = String> {
    let mut codes: Vec<String> = ReferenceCatalog::standard_2024()
        .entries()
        .map(|e| e.code.as_str().to_string())
        .collect();
    codes.sort();
    proptest::sample::select(codes)
}

/// Strategy for generating patient sex values
pub fn sex_strategy() -> impl Strategy<Value = Sex> {
    prop_oneof![Just(Sex::Male), Just(Sex::Female), Just(Sex::Unknown)]
}

/// Strategy for generating plausible patient ages
pub fn age_strategy() -> impl Strategy<Value = i32> {
    0i32..110i32
}

/// Strategy for generating plausible lengths of stay
pub fn los_strategy() -> impl Strategy<Value = i32> {
    0i32..60i32
}

/// Strategy for generating admission dates within 2024
pub fn admission_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..365u64).prop_map(|days| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(days)
    })
}

/// Strategy for generating encounters that pass input validation
pub fn encounter_strategy() -> impl Strategy<Value = Encounter> {
    (
        diagnosis_code_strategy(),
        proptest::collection::vec(diagnosis_code_strategy(), 0..4),
        proptest::collection::vec(procedure_code_strategy(), 0..3),
        age_strategy(),
        sex_strategy(),
        los_strategy(),
        admission_date_strategy(),
        0u32..100_000u32,
    )
        .prop_map(
            |(main_dx, secondary, procedures, age, sex, los, admission, patient_seq)| Encounter {
                patient_id: format!("P-{patient_seq:05}"),
                age,
                sex,
                admission_date: admission,
                discharge_date: admission + chrono::Days::new(los as u64),
                los,
                main_diagnosis: main_dx,
                secondary_diagnoses: secondary,
                procedures,
                discharge_status: DischargeStatus::Routine,
                claim_number: Some(format!("CLM-{patient_seq:05}")),
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_grouping::validate_encounter;

    proptest! {
        #[test]
        fn test_generated_encounters_pass_validation(encounter in encounter_strategy()) {
            prop_assert!(validate_encounter(&encounter).is_empty());
        }

        #[test]
        fn test_catalog_codes_resolve(code in catalog_code_strategy()) {
            let catalog = ReferenceCatalog::standard_2024();
            prop_assert!(catalog.lookup(&code).is_some());
        }
    }
}
