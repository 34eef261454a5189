//! Scheduled KDRG catalog entries

use core_kernel::{AadrgCode, KdrgCode, MajorCategory, Money, PointRate, Severity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::rules::BundleGroup;

/// One scheduled KDRG: the payment parameters for a 5-character code
///
/// Entries are immutable after catalog construction. The base amount is
/// derived from relative weight times the catalog's point rate, never stored
/// as an independent literal, so `code == aadrg + severity digit` and
/// `base_amount == weight * rate` hold for every entry by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdrgEntry {
    /// Full 5-character code
    pub code: KdrgCode,
    /// 4-character adjacent group
    pub aadrg: AadrgCode,
    /// Major diagnostic category letter
    pub major_category: MajorCategory,
    /// Severity encoded in the final digit
    pub severity: Severity,
    /// Display name
    pub name: String,
    /// Relative weight (points)
    pub relative_weight: Decimal,
    /// Scheduled base amount: weight times the per-point rate
    pub base_amount: Money,
    /// Expected length-of-stay lower bound (days)
    pub los_lower: u16,
    /// Expected length-of-stay upper bound (days)
    pub los_upper: u16,
    /// Per-diem rate applied beyond the upper bound
    pub long_stay_per_diem: Money,
    /// Whether this group is a surgical path
    pub surgical: bool,
    /// Bundled-payment group, when the code belongs to one
    pub bundle: Option<BundleGroup>,
}

impl KdrgEntry {
    /// Builds an entry from its AADRG and severity, deriving the code and
    /// base amount
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        aadrg: AadrgCode,
        severity: Severity,
        name: impl Into<String>,
        relative_weight: Decimal,
        rate: PointRate,
        los_lower: u16,
        los_upper: u16,
        long_stay_per_diem: Money,
        surgical: bool,
        bundle: Option<BundleGroup>,
    ) -> Self {
        let code = aadrg.with_severity(severity);
        let major_category = aadrg.major_category();
        Self {
            code,
            aadrg,
            major_category,
            severity,
            name: name.into(),
            relative_weight,
            base_amount: rate.amount_for(relative_weight),
            los_lower,
            los_upper,
            long_stay_per_diem,
            surgical,
            bundle,
        }
    }
}
