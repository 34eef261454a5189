//! Code-to-code revenue simulation
//!
//! Reports the revenue and weight delta between two arbitrary catalog codes
//! together with a feasibility assessment of actually making the change.
//! A major-category change implies recoding the primary diagnosis, which is
//! an audit red flag; the assessment marks it infeasible rather than
//! suggesting it.

use core_kernel::{KdrgCode, Money, Severity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use reference_data::{KdrgEntry, RevenueDelta};

use crate::analyzer::OptimizationAnalyzer;
use crate::error::OptimizationError;

/// How hard the assessed change is to substantiate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Low => "low",
            Difficulty::Medium => "medium",
            Difficulty::High => "high",
        };
        write!(f, "{s}")
    }
}

/// Whether and how a code change could be substantiated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feasibility {
    pub possible: bool,
    pub difficulty: Difficulty,
    pub requirements: Vec<String>,
    pub warnings: Vec<String>,
}

/// The catalog view of one side of a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSnapshot {
    pub code: KdrgCode,
    pub name: String,
    pub severity: Severity,
    pub relative_weight: Decimal,
    pub base_amount: Money,
}

impl From<&KdrgEntry> for CodeSnapshot {
    fn from(entry: &KdrgEntry) -> Self {
        Self {
            code: entry.code.clone(),
            name: entry.name.clone(),
            severity: entry.severity,
            relative_weight: entry.relative_weight,
            base_amount: entry.base_amount,
        }
    }
}

/// Result of simulating a change from one code to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub current: CodeSnapshot,
    pub target: CodeSnapshot,
    pub delta: RevenueDelta,
    pub feasibility: Feasibility,
}

impl<'c> OptimizationAnalyzer<'c> {
    /// Simulates changing `current` to `target`
    ///
    /// Errors when either code is missing from the catalog; this path is
    /// caller-driven, so unknown codes are reported instead of swallowed.
    pub fn simulate(
        &self,
        current: &str,
        target: &str,
    ) -> Result<SimulationOutcome, OptimizationError> {
        let current_entry = self
            .catalog()
            .lookup(current)
            .ok_or_else(|| OptimizationError::UnknownCode(current.to_string()))?;
        let target_entry = self
            .catalog()
            .lookup(target)
            .ok_or_else(|| OptimizationError::UnknownCode(target.to_string()))?;

        let delta = self
            .catalog()
            .revenue_difference(current_entry.code.as_str(), target_entry.code.as_str())?;

        Ok(SimulationOutcome {
            current: current_entry.into(),
            target: target_entry.into(),
            delta,
            feasibility: assess_feasibility(current_entry, target_entry),
        })
    }
}

fn assess_feasibility(current: &KdrgEntry, target: &KdrgEntry) -> Feasibility {
    let mut feasibility = Feasibility {
        possible: true,
        difficulty: Difficulty::Low,
        requirements: Vec::new(),
        warnings: Vec::new(),
    };

    if current.aadrg == target.aadrg {
        // Severity move within the adjacent group
        let gap = target.severity.gap_from(current.severity);
        if gap == 1 {
            feasibility
                .requirements
                .push("Add at least one complication/comorbidity (CC) code".to_string());
        } else if gap == 2 {
            feasibility
                .requirements
                .push("An MCC code, or two or more CC codes, required".to_string());
            feasibility.difficulty = Difficulty::Medium;
        } else if gap >= 3 {
            feasibility
                .requirements
                .push("Multiple MCC codes required".to_string());
            feasibility.difficulty = Difficulty::High;
            feasibility
                .warnings
                .push("High audit exposure".to_string());
        }
    } else if current.major_category == target.major_category {
        feasibility
            .requirements
            .push("Primary procedure or primary diagnosis change required".to_string());
        feasibility.difficulty = Difficulty::Medium;
        feasibility
            .warnings
            .push("Regrouping logic needs review".to_string());
    } else {
        feasibility
            .requirements
            .push("Primary diagnosis change required".to_string());
        feasibility.difficulty = Difficulty::High;
        feasibility
            .warnings
            .push("Changing the primary diagnosis carries high audit risk".to_string());
        feasibility.possible = false;
    }

    feasibility
}
