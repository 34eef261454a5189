//! Classification results and the audit trail

use core_kernel::{AadrgCode, KdrgCode, MajorCategory, Money, Severity};
use reference_data::BundleGroup;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::ClassificationWarning;

/// Where the length of stay falls relative to the expected range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LosOutlier {
    Short,
    Normal,
    Long,
}

impl fmt::Display for LosOutlier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LosOutlier::Short => "short",
            LosOutlier::Normal => "normal",
            LosOutlier::Long => "long",
        };
        write!(f, "{s}")
    }
}

/// One step of the classification pipeline, recorded for audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "step")]
pub enum TrailStep {
    MajorCategory { category: MajorCategory, name: String },
    BundleMatched { group: BundleGroup, name: String },
    NoBundleMatched,
    SeverityAssigned { severity: Severity },
    ParentGroupAssigned { aadrg: AadrgCode },
    CodeAssigned { kdrg: KdrgCode },
}

impl fmt::Display for TrailStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailStep::MajorCategory { category, name } => {
                write!(f, "major category: {category} ({name})")
            }
            TrailStep::BundleMatched { group, name } => {
                write!(f, "bundled payment group: {group} ({name})")
            }
            TrailStep::NoBundleMatched => write!(f, "no bundled payment group (fee for service)"),
            TrailStep::SeverityAssigned { severity } => write!(f, "severity: {severity}"),
            TrailStep::ParentGroupAssigned { aadrg } => write!(f, "AADRG: {aadrg}"),
            TrailStep::CodeAssigned { kdrg } => write!(f, "KDRG: {kdrg}"),
        }
    }
}

/// The pre-grouper's verdict for one encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub patient_id: String,
    pub claim_number: Option<String>,

    pub major_category: MajorCategory,
    pub major_category_name: String,
    pub aadrg: AadrgCode,
    pub kdrg: KdrgCode,
    pub severity: Severity,

    /// Relative weight after severity and LOS adjustments, 4 decimal places
    pub relative_weight: Decimal,
    /// Weight times the per-point rate
    pub base_amount: Money,
    /// Base amount after outlier adjustment, rounded to whole won
    pub estimated_amount: Money,

    pub los: i32,
    pub los_lower: u16,
    pub los_upper: u16,
    pub los_outlier: LosOutlier,

    /// Bundled-payment group, when one matched
    pub bundle: Option<BundleGroup>,
    /// Whether the grouping took a surgical path
    pub surgical: bool,

    pub trail: Vec<TrailStep>,
    pub warnings: Vec<ClassificationWarning>,
    /// Confidence score, always in [30, 100]
    pub confidence: u8,
}

impl ClassificationResult {
    /// True when the stay fell outside the expected LOS range
    pub fn is_outlier(&self) -> bool {
        self.los_outlier != LosOutlier::Normal
    }
}
