//! KDRG Pre-Grouper
//!
//! Classifies one hospital discharge encounter into a KDRG code with
//! severity, relative weight, estimated payment, length-of-stay outlier
//! status, a confidence score, and an auditable decision trail.
//!
//! Classification never fails: malformed input degrades confidence and
//! populates the warnings list, but every encounter gets a result. Payment
//! estimates are advisory, not authoritative.

pub mod classifier;
pub mod encounter;
pub mod result;
pub mod validation;

pub use classifier::PreGrouper;
pub use encounter::{DischargeStatus, Encounter, Sex};
pub use result::{ClassificationResult, LosOutlier, TrailStep};
pub use validation::{validate_encounter, ClassificationWarning};
