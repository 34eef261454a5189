//! Input validation for encounters
//!
//! Validation never aborts a classification. Each finding becomes a typed
//! warning on the result; input-quality warnings additionally reduce the
//! confidence score.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::encounter::Encounter;
use crate::result::LosOutlier;

/// A warning attached to a classification result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ClassificationWarning {
    MissingMainDiagnosis,
    DischargeBeforeAdmission,
    AgeOutOfRange { age: i32 },
    NegativeLos { los: i32 },
    ExtendedStay { los: i32 },
    LosOutlier { outlier: LosOutlier, los: i32, lower: u16, upper: u16 },
}

impl ClassificationWarning {
    /// Input-quality warnings reduce the confidence score; the LOS-outlier
    /// warning is audit information only
    pub fn is_input_quality(&self) -> bool {
        !matches!(self, ClassificationWarning::LosOutlier { .. })
    }
}

impl fmt::Display for ClassificationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationWarning::MissingMainDiagnosis => {
                write!(f, "main diagnosis code is missing")
            }
            ClassificationWarning::DischargeBeforeAdmission => {
                write!(f, "discharge date precedes admission date")
            }
            ClassificationWarning::AgeOutOfRange { age } => {
                write!(f, "age out of range: {age}")
            }
            ClassificationWarning::NegativeLos { los } => {
                write!(f, "negative length of stay: {los}")
            }
            ClassificationWarning::ExtendedStay { los } => {
                write!(f, "extended stay: {los} days")
            }
            ClassificationWarning::LosOutlier { outlier, los, lower, upper } => {
                write!(f, "length-of-stay outlier: {outlier} ({los} days, expected {lower}-{upper})")
            }
        }
    }
}

/// Runs the input-quality checks for one encounter
pub fn validate_encounter(encounter: &Encounter) -> Vec<ClassificationWarning> {
    let mut warnings = Vec::new();

    if encounter.main_diagnosis.trim().is_empty() {
        warnings.push(ClassificationWarning::MissingMainDiagnosis);
    }

    if encounter.discharge_date < encounter.admission_date {
        warnings.push(ClassificationWarning::DischargeBeforeAdmission);
    }

    if !(0..=120).contains(&encounter.age) {
        warnings.push(ClassificationWarning::AgeOutOfRange { age: encounter.age });
    }

    if encounter.los < 0 {
        warnings.push(ClassificationWarning::NegativeLos { los: encounter.los });
    } else if encounter.los > 365 {
        warnings.push(ClassificationWarning::ExtendedStay { los: encounter.los });
    }

    warnings
}
