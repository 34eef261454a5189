//! Optimization errors

use thiserror::Error;

/// Errors raised by the optimization analyzer
///
/// Per-encounter analysis degrades to an empty suggestion list rather than
/// erroring; only the explicit simulation path, where the caller names both
/// codes, reports unknown codes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptimizationError {
    #[error("KDRG code not in catalog: {0}")]
    UnknownCode(String),
}

impl From<reference_data::CatalogError> for OptimizationError {
    fn from(err: reference_data::CatalogError) -> Self {
        match err {
            reference_data::CatalogError::UnknownCode(code) => {
                OptimizationError::UnknownCode(code)
            }
        }
    }
}
