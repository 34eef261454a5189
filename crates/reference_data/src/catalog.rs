//! The immutable KDRG reference catalog
//!
//! Built once at startup from the published fee schedule and shared by
//! reference across every engine. All query methods that return collections
//! sort their output so batch runs are reproducible.

use std::collections::HashMap;

use core_kernel::{AadrgCode, KdrgCode, MajorCategory, Money, PointRate, Severity};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::entry::KdrgEntry;
use crate::error::CatalogError;
use crate::rules::{bundle_definitions, BundleDefinition, BundleGroup};

/// Revenue difference between two catalog codes, as seen from the first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueDelta {
    /// `to` base amount minus `from` base amount
    pub amount: Money,
    /// Relative-weight difference
    pub weight: Decimal,
    /// Amount as a percentage of the `from` base amount, 2 decimal places
    pub percent: Decimal,
}

/// Scheduled KDRG entries plus the per-point conversion rate
#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    entries: HashMap<KdrgCode, KdrgEntry>,
    bundles: Vec<BundleDefinition>,
    rate: PointRate,
}

impl ReferenceCatalog {
    /// Builds the standard schedule priced at the given per-point rate
    pub fn standard(rate: PointRate) -> Self {
        let mut catalog = Self {
            entries: HashMap::new(),
            bundles: bundle_definitions(),
            rate,
        };
        catalog.seed_schedule();
        catalog
    }

    /// The standard schedule at the 2024 conversion rate
    pub fn standard_2024() -> Self {
        Self::standard(PointRate::krw_2024())
    }

    pub fn point_rate(&self) -> PointRate {
        self.rate
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All schedule entries, in no particular order
    pub fn entries(&self) -> impl Iterator<Item = &KdrgEntry> {
        self.entries.values()
    }

    /// Bundle definitions in classification precedence order
    pub fn bundles(&self) -> &[BundleDefinition] {
        &self.bundles
    }

    pub fn bundle(&self, group: BundleGroup) -> Option<&BundleDefinition> {
        self.bundles.iter().find(|b| b.group == group)
    }

    /// Looks up a code leniently: trims, uppercases, and validates the shape
    /// before the map probe, returning `None` for malformed input
    pub fn lookup(&self, code: &str) -> Option<&KdrgEntry> {
        let code = KdrgCode::new(code).ok()?;
        self.entries.get(&code)
    }

    pub fn get(&self, code: &KdrgCode) -> Option<&KdrgEntry> {
        self.entries.get(code)
    }

    /// All severity variants of one adjacent group, ascending by severity
    pub fn by_aadrg(&self, aadrg: &AadrgCode) -> Vec<&KdrgEntry> {
        let mut entries: Vec<&KdrgEntry> =
            self.entries.values().filter(|e| &e.aadrg == aadrg).collect();
        entries.sort_by_key(|e| e.severity);
        entries
    }

    /// All entries under one major diagnostic category, sorted by code
    pub fn by_major_category(&self, category: MajorCategory) -> Vec<&KdrgEntry> {
        let mut entries: Vec<&KdrgEntry> = self
            .entries
            .values()
            .filter(|e| e.major_category == category)
            .collect();
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        entries
    }

    /// All entries belonging to bundled-payment groups, sorted by code
    pub fn bundled_entries(&self) -> Vec<&KdrgEntry> {
        let mut entries: Vec<&KdrgEntry> =
            self.entries.values().filter(|e| e.bundle.is_some()).collect();
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        entries
    }

    /// The other severity levels of this code's adjacent group, ascending:
    /// the severity ladder minus the code itself
    pub fn alternatives(&self, code: &KdrgCode) -> Vec<&KdrgEntry> {
        if !self.entries.contains_key(code) {
            return Vec::new();
        }
        self.by_aadrg(&code.aadrg())
            .into_iter()
            .filter(|e| &e.code != code)
            .collect()
    }

    /// The severity ladder for a code's adjacent group, ascending
    pub fn severity_options(&self, code: &KdrgCode) -> Vec<&KdrgEntry> {
        self.by_aadrg(&code.aadrg())
    }

    /// Revenue difference from one code to another
    pub fn revenue_difference(&self, from: &str, to: &str) -> Result<RevenueDelta, CatalogError> {
        let from_entry = self
            .lookup(from)
            .ok_or_else(|| CatalogError::UnknownCode(from.to_string()))?;
        let to_entry = self
            .lookup(to)
            .ok_or_else(|| CatalogError::UnknownCode(to.to_string()))?;

        let amount = to_entry.base_amount - from_entry.base_amount;
        let percent = amount.percent_of(from_entry.base_amount);
        Ok(RevenueDelta {
            amount,
            weight: to_entry.relative_weight - from_entry.relative_weight,
            percent,
        })
    }

    /// The highest-paying surgical entry in a category, used when probing
    /// surgical regrouping candidates
    pub fn best_surgical(&self, category: MajorCategory) -> Option<&KdrgEntry> {
        self.entries
            .values()
            .filter(|e| e.surgical && e.major_category == category)
            .max_by(|a, b| {
                a.base_amount
                    .cmp(&b.base_amount)
                    .then_with(|| b.code.cmp(&a.code))
            })
    }

    fn insert(&mut self, entry: KdrgEntry) {
        self.entries.insert(entry.code.clone(), entry);
    }

    /// Adds the four-step severity ladder for one adjacent group
    #[allow(clippy::too_many_arguments)]
    fn ladder(
        &mut self,
        aadrg: &str,
        name: &str,
        rows: [(Decimal, u16, u16); 4],
        per_diem: i64,
        surgical: bool,
        bundle: Option<BundleGroup>,
    ) {
        let aadrg = AadrgCode::new(aadrg).expect("schedule AADRG codes are 4 chars");
        for (level, (weight, lo, hi)) in rows.into_iter().enumerate() {
            let severity = Severity::try_from(level as u8).expect("ladder has 4 rows");
            self.insert(KdrgEntry::new(
                aadrg.clone(),
                severity,
                name,
                weight,
                self.rate,
                lo,
                hi,
                Money::from_won(per_diem),
                surgical,
                bundle,
            ));
        }
    }

    /// The published schedule: bundled-payment groups first, then the
    /// fee-for-service groups the comparison and optimization paths need
    fn seed_schedule(&mut self) {
        self.ladder(
            "D121",
            "Tonsillectomy and adenoidectomy",
            [
                (dec!(0.72), 1, 3),
                (dec!(0.80), 1, 4),
                (dec!(0.92), 2, 5),
                (dec!(1.15), 2, 7),
            ],
            26_100,
            true,
            Some(BundleGroup::D12),
        );
        self.ladder(
            "D131",
            "Sinus surgery",
            [
                (dec!(0.95), 2, 4),
                (dec!(1.05), 2, 5),
                (dec!(1.18), 3, 6),
                (dec!(1.45), 3, 8),
            ],
            27_600,
            true,
            Some(BundleGroup::D13),
        );
        self.ladder(
            "G081",
            "Inguinal and femoral hernia repair",
            [
                (dec!(0.85), 1, 3),
                (dec!(0.95), 1, 4),
                (dec!(1.10), 2, 5),
                (dec!(1.40), 3, 7),
            ],
            24_600,
            true,
            Some(BundleGroup::G08),
        );
        self.ladder(
            "H061",
            "Cholecystectomy",
            [
                (dec!(1.10), 3, 5),
                (dec!(1.25), 3, 6),
                (dec!(1.45), 4, 8),
                (dec!(1.85), 5, 12),
            ],
            31_900,
            true,
            Some(BundleGroup::H06),
        );
        self.ladder(
            "I091",
            "Anal surgery",
            [
                (dec!(0.55), 1, 2),
                (dec!(0.62), 1, 3),
                (dec!(0.72), 2, 4),
                (dec!(0.92), 2, 6),
            ],
            15_900,
            true,
            Some(BundleGroup::I09),
        );
        self.ladder(
            "L081",
            "Extracorporeal shock wave lithotripsy",
            [
                (dec!(0.65), 1, 2),
                (dec!(0.72), 1, 2),
                (dec!(0.82), 1, 3),
                (dec!(1.05), 2, 4),
            ],
            18_800,
            true,
            Some(BundleGroup::L08),
        );
        self.ladder(
            "O011",
            "Cesarean section",
            [
                (dec!(1.35), 4, 6),
                (dec!(1.50), 4, 7),
                (dec!(1.75), 5, 8),
                (dec!(2.20), 5, 10),
            ],
            39_100,
            true,
            Some(BundleGroup::O01),
        );
        self.ladder(
            "O601",
            "Vaginal delivery",
            [
                (dec!(0.90), 2, 3),
                (dec!(1.00), 2, 4),
                (dec!(1.15), 3, 5),
                (dec!(1.45), 3, 7),
            ],
            26_100,
            false,
            Some(BundleGroup::O60),
        );

        self.ladder(
            "A011",
            "Craniotomy",
            [
                (dec!(3.50), 7, 14),
                (dec!(4.20), 8, 18),
                (dec!(5.10), 10, 25),
                (dec!(6.50), 14, 35),
            ],
            43_500,
            true,
            None,
        );
        self.ladder(
            "A601",
            "Stroke",
            [
                (dec!(1.20), 5, 10),
                (dec!(1.45), 7, 14),
                (dec!(1.85), 10, 21),
                (dec!(2.50), 14, 30),
            ],
            34_800,
            false,
            None,
        );
        self.ladder(
            "E011",
            "Coronary artery bypass graft",
            [
                (dec!(4.80), 10, 18),
                (dec!(5.60), 12, 21),
                (dec!(6.80), 14, 28),
                (dec!(8.50), 18, 40),
            ],
            46_400,
            true,
            None,
        );
        self.ladder(
            "E021",
            "Cardiac valve procedure",
            [
                (dec!(5.50), 12, 20),
                (dec!(6.50), 14, 24),
                (dec!(8.00), 16, 30),
                (dec!(10.50), 20, 45),
            ],
            47_800,
            true,
            None,
        );
        self.ladder(
            "E601",
            "Heart failure",
            [
                (dec!(0.85), 4, 8),
                (dec!(1.05), 5, 10),
                (dec!(1.35), 7, 14),
                (dec!(1.80), 10, 21),
            ],
            24_600,
            false,
            None,
        );
        self.ladder(
            "F011",
            "Gastrectomy",
            [
                (dec!(2.20), 7, 12),
                (dec!(2.60), 8, 14),
                (dec!(3.20), 10, 18),
                (dec!(4.20), 14, 28),
            ],
            38_400,
            true,
            None,
        );
        self.ladder(
            "F601",
            "Gastrointestinal hemorrhage",
            [
                (dec!(0.75), 3, 6),
                (dec!(0.92), 4, 8),
                (dec!(1.18), 5, 10),
                (dec!(1.55), 7, 14),
            ],
            21_700,
            false,
            None,
        );
        self.ladder(
            "H011",
            "Hip replacement",
            [
                (dec!(2.80), 10, 16),
                (dec!(3.30), 12, 18),
                (dec!(4.00), 14, 24),
                (dec!(5.20), 18, 35),
            ],
            40_600,
            true,
            None,
        );
        self.ladder(
            "H021",
            "Knee replacement",
            [
                (dec!(2.50), 10, 14),
                (dec!(2.90), 11, 16),
                (dec!(3.50), 13, 20),
                (dec!(4.50), 16, 28),
            ],
            36_200,
            true,
            None,
        );
        self.ladder(
            "K011",
            "Nephrectomy",
            [
                (dec!(2.40), 7, 12),
                (dec!(2.85), 8, 14),
                (dec!(3.50), 10, 18),
                (dec!(4.60), 14, 28),
            ],
            34_800,
            true,
            None,
        );
        self.ladder(
            "K601",
            "Renal failure",
            [
                (dec!(0.95), 4, 8),
                (dec!(1.20), 5, 10),
                (dec!(1.55), 7, 14),
                (dec!(2.10), 10, 21),
            ],
            27_500,
            false,
            None,
        );
        self.ladder(
            "R601",
            "Septicemia",
            [
                (dec!(1.30), 5, 10),
                (dec!(1.65), 7, 14),
                (dec!(2.20), 10, 21),
                (dec!(3.20), 14, 35),
            ],
            37_700,
            false,
            None,
        );
    }
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::standard_2024()
    }
}
