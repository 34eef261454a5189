//! Core Kernel - Foundational types for the KDRG classification engine
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Won-denominated money with precise decimal arithmetic
//! - KDRG/AADRG code value objects and severity levels
//! - Strongly-typed identifiers

pub mod codes;
pub mod identifiers;
pub mod money;

pub use codes::{
    normalize_clinical_code, AadrgCode, CodeError, CodeParts, KdrgCode, MajorCategory, Severity,
};
pub use identifiers::ReportId;
pub use money::{Money, PointRate};
