//! Reference catalog errors

use thiserror::Error;

/// Errors raised by catalog queries
///
/// Plain lookups return `Option` so batch jobs continue past unknown codes;
/// this error covers operations that need both sides resolved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("KDRG code not in catalog: {0}")]
    UnknownCode(String),
}
