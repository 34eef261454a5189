//! Declarative classification rule tables
//!
//! The grouping and analysis engines are interpreters over these tables;
//! rule updates (new prefixes, revised bundle definitions, schedule
//! revisions) happen here without touching engine logic.
//!
//! All diagnosis prefixes are stored normalized (uppercase, dots removed) so
//! matching is a plain `starts_with` against a normalized input code.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One major-diagnostic-category rule: a category letter and the diagnosis
/// prefixes that select it
#[derive(Debug, Clone, Copy)]
pub struct MajorCategoryRule {
    pub category: char,
    pub name: &'static str,
    pub prefixes: &'static [&'static str],
}

/// Ordered major-category table; first matching prefix wins
///
/// Order is load-bearing: `F` (digestive, prefix `K`) precedes `G`
/// (hepatobiliary, prefixes `K7`/`K8`), so `K7x` diagnoses group under `F`.
/// `W` is the fallback for unmatched diagnoses.
pub const MAJOR_CATEGORY_RULES: &[MajorCategoryRule] = &[
    MajorCategoryRule { category: 'A', name: "Nervous system", prefixes: &["G", "F0", "R40", "R41"] },
    MajorCategoryRule { category: 'B', name: "Eye", prefixes: &["H0", "H1", "H2", "H3", "H4", "H5"] },
    MajorCategoryRule { category: 'C', name: "Ear, nose, mouth and throat", prefixes: &["H6", "H7", "H8", "H9", "J0", "J1", "J2", "J3"] },
    MajorCategoryRule { category: 'D', name: "Respiratory system", prefixes: &["J4", "J5", "J6", "J7", "J8", "J9"] },
    MajorCategoryRule { category: 'E', name: "Circulatory system", prefixes: &["I"] },
    MajorCategoryRule { category: 'F', name: "Digestive system", prefixes: &["K"] },
    MajorCategoryRule { category: 'G', name: "Hepatobiliary system and pancreas", prefixes: &["K7", "K8"] },
    MajorCategoryRule { category: 'H', name: "Musculoskeletal system and connective tissue", prefixes: &["M"] },
    MajorCategoryRule { category: 'I', name: "Skin, subcutaneous tissue and breast", prefixes: &["L", "C50"] },
    MajorCategoryRule { category: 'J', name: "Endocrine, nutritional and metabolic", prefixes: &["E"] },
    MajorCategoryRule { category: 'K', name: "Kidney and urinary tract", prefixes: &["N0", "N1", "N2", "N3", "N4"] },
    MajorCategoryRule { category: 'L', name: "Male reproductive system", prefixes: &["N40", "N41", "N42", "N43", "N44", "N45", "N46", "N47", "N48", "N49", "N50", "N51"] },
    MajorCategoryRule { category: 'M', name: "Female reproductive system", prefixes: &["N6", "N7", "N8", "N9"] },
    MajorCategoryRule { category: 'N', name: "Pregnancy, childbirth and puerperium", prefixes: &["O"] },
    MajorCategoryRule { category: 'O', name: "Perinatal conditions", prefixes: &["P"] },
    MajorCategoryRule { category: 'P', name: "Blood and blood-forming organs", prefixes: &["D5", "D6", "D7", "D8"] },
    MajorCategoryRule { category: 'Q', name: "Myeloproliferative disorders", prefixes: &["C81", "C82", "C83", "C84", "C85", "C86", "C88", "C90", "C91", "C92", "C93", "C94", "C95", "C96"] },
    MajorCategoryRule { category: 'R', name: "Infectious and parasitic diseases", prefixes: &["A", "B"] },
    MajorCategoryRule { category: 'S', name: "Mental diseases and disorders", prefixes: &["F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9"] },
    MajorCategoryRule { category: 'T', name: "Alcohol and drug use", prefixes: &["F10", "F11", "F12", "F13", "F14", "F15", "F16", "F17", "F18", "F19"] },
    MajorCategoryRule { category: 'U', name: "Injuries, poisonings and toxic effects", prefixes: &["S", "T"] },
    MajorCategoryRule { category: 'V', name: "Burns", prefixes: &["T20", "T21", "T22", "T23", "T24", "T25", "T26", "T27", "T28", "T29", "T30", "T31"] },
    MajorCategoryRule { category: 'W', name: "Other", prefixes: &[] },
    MajorCategoryRule { category: 'X', name: "Other malignant neoplasms", prefixes: &["C"] },
    MajorCategoryRule { category: 'Y', name: "HIV infection", prefixes: &["B20", "B21", "B22", "B23", "B24"] },
    MajorCategoryRule { category: 'Z', name: "Multiple significant trauma", prefixes: &["T07"] },
];

/// The fallback category for unmatched diagnoses
pub const FALLBACK_CATEGORY: char = 'W';

/// Resolves a normalized main diagnosis to its major-category rule
pub fn major_category_for(normalized_diagnosis: &str) -> &'static MajorCategoryRule {
    for rule in MAJOR_CATEGORY_RULES {
        if rule
            .prefixes
            .iter()
            .any(|p| normalized_diagnosis.starts_with(p))
        {
            return rule;
        }
    }
    MAJOR_CATEGORY_RULES
        .iter()
        .find(|r| r.category == FALLBACK_CATEGORY)
        .expect("fallback category present in table")
}

/// Display name for a major category letter
pub fn category_name(category: char) -> Option<&'static str> {
    MAJOR_CATEGORY_RULES
        .iter()
        .find(|r| r.category == category)
        .map(|r| r.name)
}

/// The bundled-payment DRG groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BundleGroup {
    D12,
    D13,
    G08,
    H06,
    I09,
    L08,
    O01,
    O60,
}

impl BundleGroup {
    /// All groups, in classification precedence order (first match wins)
    pub const ALL: [BundleGroup; 8] = [
        BundleGroup::D12,
        BundleGroup::D13,
        BundleGroup::G08,
        BundleGroup::H06,
        BundleGroup::I09,
        BundleGroup::L08,
        BundleGroup::O01,
        BundleGroup::O60,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BundleGroup::D12 => "D12",
            BundleGroup::D13 => "D13",
            BundleGroup::G08 => "G08",
            BundleGroup::H06 => "H06",
            BundleGroup::I09 => "I09",
            BundleGroup::L08 => "L08",
            BundleGroup::O01 => "O01",
            BundleGroup::O60 => "O60",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BundleGroup::D12 => "Tonsillectomy and adenoidectomy",
            BundleGroup::D13 => "Sinus surgery",
            BundleGroup::G08 => "Inguinal and femoral hernia repair",
            BundleGroup::H06 => "Cholecystectomy",
            BundleGroup::I09 => "Anal surgery",
            BundleGroup::L08 => "Extracorporeal shock wave lithotripsy",
            BundleGroup::O01 => "Cesarean section",
            BundleGroup::O60 => "Vaginal delivery",
        }
    }
}

impl fmt::Display for BundleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of one bundled-payment group: the diagnosis prefixes and
/// procedure codes that select it, plus grouping parameters
#[derive(Debug, Clone)]
pub struct BundleDefinition {
    pub group: BundleGroup,
    /// Normalized diagnosis prefixes
    pub diagnosis_prefixes: &'static [&'static str],
    /// Qualifying procedure codes; empty for diagnosis-only groups
    pub procedures: &'static [&'static str],
    pub base_weight: Decimal,
    pub los_lower: u16,
    pub los_upper: u16,
}

impl BundleDefinition {
    /// True when the normalized main diagnosis falls under this group
    pub fn matches_diagnosis(&self, normalized_diagnosis: &str) -> bool {
        self.diagnosis_prefixes
            .iter()
            .any(|p| normalized_diagnosis.starts_with(p))
    }

    /// True when any supplied procedure code is in this group's set
    /// (exact match on normalized codes)
    pub fn matches_procedures(&self, normalized_procedures: &[String]) -> bool {
        normalized_procedures
            .iter()
            .any(|proc_code| self.procedures.contains(&proc_code.as_str()))
    }

    /// True when any supplied procedure shares a 4-character prefix with a
    /// group procedure; used when probing near-miss conversions
    pub fn matches_procedure_prefix(&self, normalized_procedures: &[String]) -> bool {
        normalized_procedures.iter().any(|proc_code| {
            let prefix: String = proc_code.chars().take(4).collect();
            !prefix.is_empty() && self.procedures.iter().any(|p| p.starts_with(&prefix))
        })
    }

    /// Diagnosis-only groups qualify without any procedure
    pub fn diagnosis_only(&self) -> bool {
        self.procedures.is_empty()
    }
}

/// Returns the bundle definitions in classification precedence order
pub fn bundle_definitions() -> Vec<BundleDefinition> {
    vec![
        BundleDefinition {
            group: BundleGroup::D12,
            diagnosis_prefixes: &["J35", "J36", "J03"],
            procedures: &["Q2161", "Q2162", "Q2163", "Q2164", "Q2171", "Q2172"],
            base_weight: dec!(0.8),
            los_lower: 1,
            los_upper: 3,
        },
        BundleDefinition {
            group: BundleGroup::D13,
            diagnosis_prefixes: &["J32", "J33", "J34"],
            procedures: &["Q2131", "Q2132", "Q2133", "Q2134", "Q2141", "Q2142"],
            base_weight: dec!(1.0),
            los_lower: 2,
            los_upper: 5,
        },
        BundleDefinition {
            group: BundleGroup::G08,
            diagnosis_prefixes: &["K40", "K41"],
            procedures: &["Q2891", "Q2892", "Q2893", "Q2894", "Q2901", "Q2902"],
            base_weight: dec!(0.9),
            los_lower: 1,
            los_upper: 4,
        },
        BundleDefinition {
            group: BundleGroup::H06,
            diagnosis_prefixes: &["K80", "K81", "K82"],
            procedures: &["Q7651", "Q7652", "Q7653", "Q7654", "Q7661", "Q7662"],
            base_weight: dec!(1.2),
            los_lower: 3,
            los_upper: 7,
        },
        BundleDefinition {
            group: BundleGroup::I09,
            diagnosis_prefixes: &["K60", "K61", "K62", "K64"],
            procedures: &["Q2971", "Q2972", "Q2973", "Q2981", "Q2982"],
            base_weight: dec!(0.6),
            los_lower: 1,
            los_upper: 3,
        },
        BundleDefinition {
            group: BundleGroup::L08,
            diagnosis_prefixes: &["N20", "N21", "N22", "N23"],
            procedures: &["R3911", "R3912", "R3913", "R3914", "R3915"],
            base_weight: dec!(0.7),
            los_lower: 1,
            los_upper: 2,
        },
        BundleDefinition {
            group: BundleGroup::O01,
            diagnosis_prefixes: &["O82", "O84"],
            procedures: &["R4507", "R4508", "R4509", "R4510", "R4511"],
            base_weight: dec!(1.5),
            los_lower: 4,
            los_upper: 7,
        },
        // Vaginal delivery qualifies on diagnosis alone
        BundleDefinition {
            group: BundleGroup::O60,
            diagnosis_prefixes: &["O80", "O81", "O83"],
            procedures: &[],
            base_weight: dec!(1.0),
            los_lower: 2,
            los_upper: 4,
        },
    ]
}

/// Expected LOS range when no bundle matched
pub const DEFAULT_LOS_RANGE: (u16, u16) = (3, 10);

/// Major complication/comorbidity prefixes (normalized)
pub const MCC_PREFIXES: &[&str] = &[
    "J96", "I50", "N17", "K72", "E101", "E111", "A41", "R57", "I21", "I22", "J80", "K704", "K711",
    "G931", "G934",
];

/// Complication/comorbidity prefixes (normalized)
pub const CC_PREFIXES: &[&str] = &[
    "E11", "I10", "I25", "J44", "J45", "N18", "E78", "K21", "M81", "F32", "G40", "K25", "K26",
    "K27", "K29", "D50",
];

/// True when a normalized diagnosis hits the major CC list
pub fn matches_mcc(normalized_diagnosis: &str) -> bool {
    MCC_PREFIXES
        .iter()
        .any(|p| normalized_diagnosis.starts_with(p))
}

/// True when a normalized diagnosis hits the lesser CC list
pub fn matches_cc(normalized_diagnosis: &str) -> bool {
    CC_PREFIXES
        .iter()
        .any(|p| normalized_diagnosis.starts_with(p))
}

/// A candidate complication/comorbidity code the optimizer may suggest
/// documenting, with the clinical context it applies to
#[derive(Debug, Clone, Copy)]
pub struct ComplicationCode {
    pub code: &'static str,
    pub name: &'static str,
    pub context: &'static str,
}

/// Major-CC candidates for severity upgrades
pub const MCC_UPGRADE_CODES: &[ComplicationCode] = &[
    ComplicationCode { code: "J96.0", name: "Acute respiratory failure", context: "pneumonia, respiratory disease" },
    ComplicationCode { code: "I50.0", name: "Congestive heart failure", context: "circulatory disease" },
    ComplicationCode { code: "N17.0", name: "Acute kidney failure", context: "renal disease" },
    ComplicationCode { code: "E11.65", name: "Diabetic hyperglycemic crisis", context: "diabetic patients" },
    ComplicationCode { code: "A41.9", name: "Sepsis, unspecified organism", context: "infection" },
];

/// Lesser-CC candidates for severity upgrades
pub const CC_UPGRADE_CODES: &[ComplicationCode] = &[
    ComplicationCode { code: "E11.9", name: "Type 2 diabetes mellitus", context: "abnormal glucose" },
    ComplicationCode { code: "I10", name: "Essential hypertension", context: "abnormal blood pressure" },
    ComplicationCode { code: "J44.1", name: "COPD with acute exacerbation", context: "smokers, respiratory disease" },
    ComplicationCode { code: "N18.3", name: "Chronic kidney disease, stage 3", context: "reduced renal function" },
];

/// Inferred cause tag for a predicted/adjudicated mismatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchCause {
    DiagnosisCoding,
    ProcedureCoding,
    SeverityAssessment,
    Complication,
    GrouperVersion,
    Documentation,
    RuleChange,
    Unknown,
}

impl MismatchCause {
    /// Keywords that map free-text adjustment reasons to this cause;
    /// matched lowercase-contains
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            MismatchCause::DiagnosisCoding => {
                &["diagnosis", "icd", "principal", "primary condition"]
            }
            MismatchCause::ProcedureCoding => &["procedure", "surgery", "operation", "surgical"],
            MismatchCause::SeverityAssessment => &["severity", "cc", "mcc"],
            MismatchCause::Complication => &["complication", "comorbid", "secondary condition"],
            MismatchCause::GrouperVersion => &["grouper version"],
            MismatchCause::Documentation => &["record", "document", "missing", "incomplete"],
            MismatchCause::RuleChange => &["criteria", "revision", "notice", "rule change"],
            MismatchCause::Unknown => &[],
        }
    }

    /// Causes probed during keyword inference, in table order
    pub const KEYWORD_CAUSES: [MismatchCause; 6] = [
        MismatchCause::DiagnosisCoding,
        MismatchCause::ProcedureCoding,
        MismatchCause::SeverityAssessment,
        MismatchCause::Complication,
        MismatchCause::Documentation,
        MismatchCause::RuleChange,
    ];
}

impl fmt::Display for MismatchCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MismatchCause::DiagnosisCoding => "diagnosis_coding",
            MismatchCause::ProcedureCoding => "procedure_coding",
            MismatchCause::SeverityAssessment => "severity_assessment",
            MismatchCause::Complication => "complication",
            MismatchCause::GrouperVersion => "grouper_version",
            MismatchCause::Documentation => "documentation",
            MismatchCause::RuleChange => "rule_change",
            MismatchCause::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_category_first_match_wins() {
        // K72 is on the MCC list and under 'F' (digestive, prefix K), which
        // precedes 'G' (hepatobiliary, K7) in the table
        assert_eq!(major_category_for("K72").category, 'F');
        assert_eq!(major_category_for("J350").category, 'C');
        assert_eq!(major_category_for("I21").category, 'E');
    }

    #[test]
    fn test_major_category_fallback() {
        assert_eq!(major_category_for("Q999").category, 'W');
        assert_eq!(major_category_for("").category, 'W');
    }

    #[test]
    fn test_bundle_diagnosis_match() {
        let defs = bundle_definitions();
        let tonsil = &defs[0];
        assert_eq!(tonsil.group, BundleGroup::D12);
        assert!(tonsil.matches_diagnosis("J350"));
        assert!(!tonsil.matches_diagnosis("K80"));
    }

    #[test]
    fn test_bundle_procedure_exact_match() {
        let defs = bundle_definitions();
        let tonsil = &defs[0];
        assert!(tonsil.matches_procedures(&["Q2161".to_string()]));
        assert!(!tonsil.matches_procedures(&["Q9999".to_string()]));
    }

    #[test]
    fn test_vaginal_delivery_is_diagnosis_only() {
        let defs = bundle_definitions();
        let delivery = defs.iter().find(|d| d.group == BundleGroup::O60).unwrap();
        assert!(delivery.diagnosis_only());
        assert!(delivery.matches_diagnosis("O80"));
    }

    #[test]
    fn test_mcc_overrides_nothing_here_but_matches() {
        assert!(matches_mcc("J960"));
        assert!(matches_mcc("E1011"));
        assert!(!matches_mcc("E119"));
        assert!(matches_cc("E119"));
        assert!(!matches_cc("Z000"));
    }

    #[test]
    fn test_cause_keywords() {
        assert!(MismatchCause::SeverityAssessment
            .keywords()
            .contains(&"mcc"));
        assert!(MismatchCause::Unknown.keywords().is_empty());
    }
}
