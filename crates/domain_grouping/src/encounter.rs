//! Hospital discharge encounters

use chrono::NaiveDate;
use core_kernel::normalize_clinical_code;
use serde::{Deserialize, Serialize};

/// Patient sex as reported on the claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

/// How the stay ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DischargeStatus {
    #[default]
    Routine,
    Transferred,
    AgainstMedicalAdvice,
    Deceased,
}

/// One hospital stay, immutable once classified
///
/// Age and length-of-stay are signed so out-of-range submissions reach the
/// validator instead of failing at deserialization; validation reports them
/// as warnings and classification proceeds regardless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub patient_id: String,
    pub age: i32,
    pub sex: Sex,
    pub admission_date: NaiveDate,
    pub discharge_date: NaiveDate,
    /// Length of stay in days
    pub los: i32,
    pub main_diagnosis: String,
    #[serde(default)]
    pub secondary_diagnoses: Vec<String>,
    #[serde(default)]
    pub procedures: Vec<String>,
    #[serde(default)]
    pub discharge_status: DischargeStatus,
    /// External claim number; the join key for payer comparison
    #[serde(default)]
    pub claim_number: Option<String>,
}

impl Encounter {
    /// Main plus secondary diagnoses, normalized for prefix matching
    pub fn all_diagnoses_normalized(&self) -> Vec<String> {
        std::iter::once(self.main_diagnosis.as_str())
            .chain(self.secondary_diagnoses.iter().map(String::as_str))
            .map(normalize_clinical_code)
            .filter(|dx| !dx.is_empty())
            .collect()
    }

    /// Normalized main diagnosis
    pub fn main_diagnosis_normalized(&self) -> String {
        normalize_clinical_code(&self.main_diagnosis)
    }

    /// Normalized procedure codes
    pub fn procedures_normalized(&self) -> Vec<String> {
        self.procedures
            .iter()
            .map(|p| normalize_clinical_code(p))
            .filter(|p| !p.is_empty())
            .collect()
    }
}
