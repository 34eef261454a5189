//! Test Utilities Crate
//!
//! Provides shared test infrastructure for the KDRG test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built encounters and claim pairs for common scenarios
//! - `builders`: Builder patterns for test data construction
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod generators;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use generators::*;
