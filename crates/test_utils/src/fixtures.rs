//! Pre-built Test Fixtures
//!
//! Ready-to-use encounters and predicted/adjudicated claim pairs for the
//! common clinical scenarios. Fixtures are deterministic so assertions can
//! pin exact codes and amounts.

use chrono::NaiveDate;
use core_kernel::Money;
use domain_comparison::{AdjudicatedClassification, PredictedClassification};
use domain_grouping::{DischargeStatus, Encounter, Sex};

/// Fixture encounters covering the classifier's main paths
pub struct EncounterFixtures;

impl EncounterFixtures {
    /// Two-day tonsillectomy stay, groups into the D12 bundle with no
    /// complications
    pub fn tonsillectomy() -> Encounter {
        Encounter {
            patient_id: "P-1001".to_string(),
            age: 30,
            sex: Sex::Female,
            admission_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            discharge_date: NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
            los: 2,
            main_diagnosis: "J35.0".to_string(),
            secondary_diagnoses: Vec::new(),
            procedures: vec!["Q2161".to_string()],
            discharge_status: DischargeStatus::Routine,
            claim_number: Some("CLM-2024-0001".to_string()),
        }
    }

    /// Elderly heart-failure admission with hypertension, no procedures;
    /// takes the non-surgical fallback path
    pub fn heart_failure() -> Encounter {
        Encounter {
            patient_id: "P-1002".to_string(),
            age: 74,
            sex: Sex::Male,
            admission_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            discharge_date: NaiveDate::from_ymd_opt(2024, 5, 16).unwrap(),
            los: 6,
            main_diagnosis: "I50.9".to_string(),
            secondary_diagnoses: vec!["I10".to_string()],
            procedures: Vec::new(),
            discharge_status: DischargeStatus::Routine,
            claim_number: Some("CLM-2024-0002".to_string()),
        }
    }

    /// Cholecystectomy in the H06 bundle with a diabetic comorbidity
    pub fn cholecystectomy() -> Encounter {
        Encounter {
            patient_id: "P-1003".to_string(),
            age: 67,
            sex: Sex::Female,
            admission_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            discharge_date: NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
            los: 3,
            main_diagnosis: "K80.2".to_string(),
            secondary_diagnoses: vec!["E11.9".to_string()],
            procedures: vec!["Q7651".to_string()],
            discharge_status: DischargeStatus::Routine,
            claim_number: Some("CLM-2024-0003".to_string()),
        }
    }

    /// Vaginal delivery, O60 is the diagnosis-only bundle
    pub fn vaginal_delivery() -> Encounter {
        Encounter {
            patient_id: "P-1004".to_string(),
            age: 29,
            sex: Sex::Female,
            admission_date: NaiveDate::from_ymd_opt(2024, 9, 20).unwrap(),
            discharge_date: NaiveDate::from_ymd_opt(2024, 9, 23).unwrap(),
            los: 3,
            main_diagnosis: "O80.0".to_string(),
            secondary_diagnoses: Vec::new(),
            procedures: Vec::new(),
            discharge_status: DischargeStatus::Routine,
            claim_number: Some("CLM-2024-0004".to_string()),
        }
    }

    /// Pneumonia with acute respiratory failure, hits the MCC short-circuit
    pub fn respiratory_failure() -> Encounter {
        Encounter {
            patient_id: "P-1005".to_string(),
            age: 58,
            sex: Sex::Male,
            admission_date: NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
            discharge_date: NaiveDate::from_ymd_opt(2024, 11, 12).unwrap(),
            los: 10,
            main_diagnosis: "J18.9".to_string(),
            secondary_diagnoses: vec!["J96.0".to_string()],
            procedures: Vec::new(),
            discharge_status: DischargeStatus::Routine,
            claim_number: Some("CLM-2024-0005".to_string()),
        }
    }

    /// A small batch spanning several major categories
    pub fn mixed_batch() -> Vec<Encounter> {
        vec![
            Self::tonsillectomy(),
            Self::heart_failure(),
            Self::cholecystectomy(),
            Self::vaginal_delivery(),
            Self::respiratory_failure(),
        ]
    }
}

/// Fixture predicted/adjudicated claim pairs
pub struct ClaimPairFixtures;

impl ClaimPairFixtures {
    /// A claim the payer adjudicated exactly as predicted
    pub fn exact_match() -> (PredictedClassification, AdjudicatedClassification) {
        (
            PredictedClassification {
                claim_number: "CLM-2024-0001".to_string(),
                patient_id: "P-1001".to_string(),
                admission_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                los: 2,
                main_diagnosis: "J35.0".to_string(),
                kdrg: "D1210".to_string(),
                amount: Money::from_won(62_640),
            },
            AdjudicatedClassification {
                claim_number: "CLM-2024-0001".to_string(),
                kdrg: "D1210".to_string(),
                amount: Money::from_won(62_640),
                adjustment_reason: None,
            },
        )
    }

    /// A claim the payer bumped one severity level with a CC-coding note
    pub fn severity_upgrade() -> (PredictedClassification, AdjudicatedClassification) {
        (
            PredictedClassification {
                claim_number: "CLM-2024-0002".to_string(),
                patient_id: "P-1002".to_string(),
                admission_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
                los: 6,
                main_diagnosis: "I50.9".to_string(),
                kdrg: "E6010".to_string(),
                amount: Money::from_won(78_300),
            },
            AdjudicatedClassification {
                claim_number: "CLM-2024-0002".to_string(),
                kdrg: "E6011".to_string(),
                amount: Money::from_won(87_000),
                adjustment_reason: Some("Severity adjusted for documented comorbidity".to_string()),
            },
        )
    }

    /// A claim the payer regrouped into a different major category
    pub fn category_regroup() -> (PredictedClassification, AdjudicatedClassification) {
        (
            PredictedClassification {
                claim_number: "CLM-2024-0003".to_string(),
                patient_id: "P-1003".to_string(),
                admission_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
                los: 3,
                main_diagnosis: "K80.2".to_string(),
                kdrg: "H0610".to_string(),
                amount: Money::from_won(104_400),
            },
            AdjudicatedClassification {
                claim_number: "CLM-2024-0003".to_string(),
                kdrg: "I0910".to_string(),
                amount: Money::from_won(130_500),
                adjustment_reason: Some("Principal diagnosis revised on review".to_string()),
            },
        )
    }

    /// Unzipped fixture pairs ready for the comparison engine
    pub fn batch() -> (
        Vec<PredictedClassification>,
        Vec<AdjudicatedClassification>,
    ) {
        let pairs = vec![
            Self::exact_match(),
            Self::severity_upgrade(),
            Self::category_regroup(),
        ];
        pairs.into_iter().unzip()
    }
}
