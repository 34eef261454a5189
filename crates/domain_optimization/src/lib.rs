//! KDRG Optimization Analyzer
//!
//! Evaluates whether a different, legitimate coding of an encounter would
//! yield higher reimbursement. Four independent suggestion generators run
//! per encounter; batch analysis aggregates per major category; a
//! simulation path reports the delta and feasibility of any code-to-code
//! change.
//!
//! Every suggestion names the supporting actions it requires. Changing the
//! primary diagnosis to shift the major category is treated as an audit red
//! flag and is never silently suggested.

pub mod analyzer;
pub mod error;
pub mod report;
pub mod simulation;
pub mod suggestion;

pub use analyzer::OptimizationAnalyzer;
pub use error::OptimizationError;
pub use report::{
    EncounterAnalysis, MajorCategorySummary, OptimizationReport, RiskDistribution,
};
pub use simulation::{CodeSnapshot, Difficulty, Feasibility, SimulationOutcome};
pub use suggestion::{OptimizationSuggestion, RiskLevel, SuggestionKind};
