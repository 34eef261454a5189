//! KDRG Reference Data
//!
//! The immutable code catalog and the declarative rule tables the engines
//! interpret: scheduled KDRG entries with weights and payment bounds,
//! major-category prefix rules, bundled-payment-group definitions, CC/MCC
//! lists, the complication upgrade catalog, and the cause keyword table.
//!
//! Everything here is loaded once at startup and never mutated; the catalog
//! is safe for unbounded concurrent read access.

pub mod catalog;
pub mod entry;
pub mod error;
pub mod rules;

pub use catalog::{ReferenceCatalog, RevenueDelta};
pub use entry::KdrgEntry;
pub use error::CatalogError;
pub use rules::{
    BundleDefinition, BundleGroup, ComplicationCode, MajorCategoryRule, MismatchCause,
};
