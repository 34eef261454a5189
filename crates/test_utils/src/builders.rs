//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults,
//! so tests only spell out the fields they care about.

use chrono::NaiveDate;
use core_kernel::Money;
use domain_comparison::{AdjudicatedClassification, PredictedClassification};
use domain_grouping::{DischargeStatus, Encounter, Sex};

/// Builder for hospital discharge encounters
///
/// Defaults to the uncomplicated two-day tonsillectomy stay; the
/// discharge date tracks the admission date plus the length of stay
/// unless set explicitly.
pub struct EncounterBuilder {
    patient_id: String,
    age: i32,
    sex: Sex,
    admission_date: NaiveDate,
    discharge_date: Option<NaiveDate>,
    los: i32,
    main_diagnosis: String,
    secondary_diagnoses: Vec<String>,
    procedures: Vec<String>,
    discharge_status: DischargeStatus,
    claim_number: Option<String>,
}

impl Default for EncounterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EncounterBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            patient_id: "P-TEST".to_string(),
            age: 30,
            sex: Sex::Female,
            admission_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            discharge_date: None,
            los: 2,
            main_diagnosis: "J35.0".to_string(),
            secondary_diagnoses: Vec::new(),
            procedures: vec!["Q2161".to_string()],
            discharge_status: DischargeStatus::Routine,
            claim_number: None,
        }
    }

    /// Sets the patient ID
    pub fn with_patient_id(mut self, id: impl Into<String>) -> Self {
        self.patient_id = id.into();
        self
    }

    /// Sets the patient age
    pub fn with_age(mut self, age: i32) -> Self {
        self.age = age;
        self
    }

    /// Sets the patient sex
    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = sex;
        self
    }

    /// Sets the admission date
    pub fn with_admission_date(mut self, date: NaiveDate) -> Self {
        self.admission_date = date;
        self
    }

    /// Sets the discharge date explicitly instead of deriving it
    pub fn with_discharge_date(mut self, date: NaiveDate) -> Self {
        self.discharge_date = Some(date);
        self
    }

    /// Sets the length of stay in days
    pub fn with_los(mut self, los: i32) -> Self {
        self.los = los;
        self
    }

    /// Sets the main diagnosis
    pub fn with_main_diagnosis(mut self, code: impl Into<String>) -> Self {
        self.main_diagnosis = code.into();
        self
    }

    /// Sets the secondary diagnoses
    pub fn with_secondary_diagnoses(mut self, codes: Vec<&str>) -> Self {
        self.secondary_diagnoses = codes.into_iter().map(String::from).collect();
        self
    }

    /// Adds one secondary diagnosis
    pub fn with_secondary_diagnosis(mut self, code: impl Into<String>) -> Self {
        self.secondary_diagnoses.push(code.into());
        self
    }

    /// Sets the procedure codes
    pub fn with_procedures(mut self, codes: Vec<&str>) -> Self {
        self.procedures = codes.into_iter().map(String::from).collect();
        self
    }

    /// Clears the procedure list for medical-path tests
    pub fn without_procedures(mut self) -> Self {
        self.procedures.clear();
        self
    }

    /// Sets the discharge status
    pub fn with_discharge_status(mut self, status: DischargeStatus) -> Self {
        self.discharge_status = status;
        self
    }

    /// Sets the claim number
    pub fn with_claim_number(mut self, number: impl Into<String>) -> Self {
        self.claim_number = Some(number.into());
        self
    }

    /// Builds the encounter
    pub fn build(self) -> Encounter {
        let discharge_date = self.discharge_date.unwrap_or_else(|| {
            self.admission_date + chrono::Days::new(self.los.max(0) as u64)
        });
        Encounter {
            patient_id: self.patient_id,
            age: self.age,
            sex: self.sex,
            admission_date: self.admission_date,
            discharge_date,
            los: self.los,
            main_diagnosis: self.main_diagnosis,
            secondary_diagnoses: self.secondary_diagnoses,
            procedures: self.procedures,
            discharge_status: self.discharge_status,
            claim_number: self.claim_number,
        }
    }
}

/// Builder for a predicted/adjudicated claim pair sharing a claim number
pub struct ClaimPairBuilder {
    claim_number: String,
    patient_id: String,
    admission_date: NaiveDate,
    los: i32,
    main_diagnosis: String,
    predicted_kdrg: String,
    predicted_amount: Money,
    actual_kdrg: String,
    actual_amount: Money,
    adjustment_reason: Option<String>,
}

impl Default for ClaimPairBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimPairBuilder {
    /// Creates a new builder defaulting to an exact match
    pub fn new() -> Self {
        Self {
            claim_number: "CLM-TEST-0001".to_string(),
            patient_id: "P-TEST".to_string(),
            admission_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            los: 2,
            main_diagnosis: "J35.0".to_string(),
            predicted_kdrg: "D1210".to_string(),
            predicted_amount: Money::from_won(62_640),
            actual_kdrg: "D1210".to_string(),
            actual_amount: Money::from_won(62_640),
            adjustment_reason: None,
        }
    }

    /// Sets the shared claim number
    pub fn with_claim_number(mut self, number: impl Into<String>) -> Self {
        self.claim_number = number.into();
        self
    }

    /// Sets the patient ID
    pub fn with_patient_id(mut self, id: impl Into<String>) -> Self {
        self.patient_id = id.into();
        self
    }

    /// Sets the admission date
    pub fn with_admission_date(mut self, date: NaiveDate) -> Self {
        self.admission_date = date;
        self
    }

    /// Sets the length of stay
    pub fn with_los(mut self, los: i32) -> Self {
        self.los = los;
        self
    }

    /// Sets the predicted side
    pub fn with_predicted(mut self, kdrg: impl Into<String>, amount_won: i64) -> Self {
        self.predicted_kdrg = kdrg.into();
        self.predicted_amount = Money::from_won(amount_won);
        self
    }

    /// Sets the adjudicated side
    pub fn with_actual(mut self, kdrg: impl Into<String>, amount_won: i64) -> Self {
        self.actual_kdrg = kdrg.into();
        self.actual_amount = Money::from_won(amount_won);
        self
    }

    /// Sets the free-text adjustment reason
    pub fn with_adjustment_reason(mut self, reason: impl Into<String>) -> Self {
        self.adjustment_reason = Some(reason.into());
        self
    }

    /// Builds the pair
    pub fn build(self) -> (PredictedClassification, AdjudicatedClassification) {
        (
            PredictedClassification {
                claim_number: self.claim_number.clone(),
                patient_id: self.patient_id,
                admission_date: self.admission_date,
                los: self.los,
                main_diagnosis: self.main_diagnosis,
                kdrg: self.predicted_kdrg,
                amount: self.predicted_amount,
            },
            AdjudicatedClassification {
                claim_number: self.claim_number,
                kdrg: self.actual_kdrg,
                amount: self.actual_amount,
                adjustment_reason: self.adjustment_reason,
            },
        )
    }
}
