//! KDRG code value objects
//!
//! A KDRG code is always 5 characters: a 4-character AADRG (adjacent group)
//! followed by exactly one severity digit 0-4. The first character of the
//! AADRG is the major diagnostic category letter. These shapes are wire
//! contracts for every caller, so they are enforced at construction.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when constructing code value objects
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    #[error("KDRG code must be 5 characters, got {0:?}")]
    BadKdrgLength(String),

    #[error("AADRG code must be 4 characters, got {0:?}")]
    BadAadrgLength(String),

    #[error("Severity digit must be 0-4, got {0:?}")]
    BadSeverityDigit(char),

    #[error("Major category must be an ASCII letter, got {0:?}")]
    BadMajorCategory(char),
}

/// Major diagnostic category: one uppercase letter A-Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MajorCategory(char);

impl MajorCategory {
    pub fn new(letter: char) -> Result<Self, CodeError> {
        if letter.is_ascii_alphabetic() {
            Ok(Self(letter.to_ascii_uppercase()))
        } else {
            Err(CodeError::BadMajorCategory(letter))
        }
    }

    pub fn as_char(&self) -> char {
        self.0
    }
}

impl fmt::Display for MajorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity level 0-4, the payment-multiplier ordinal
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Severity {
    /// No complication or comorbidity
    #[default]
    None = 0,
    /// Minor
    Minor = 1,
    /// Moderate
    Moderate = 2,
    /// Major
    Major = 3,
    /// Extreme
    Extreme = 4,
}

impl Severity {
    /// The maximum severity level
    pub const MAX: Severity = Severity::Extreme;

    /// Returns the level as a number 0-4
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Returns the severity digit used as the 5th KDRG character
    pub fn digit(&self) -> char {
        (b'0' + self.level()) as char
    }

    /// Parses a severity digit
    pub fn from_digit(digit: char) -> Result<Self, CodeError> {
        match digit {
            '0' => Ok(Severity::None),
            '1' => Ok(Severity::Minor),
            '2' => Ok(Severity::Moderate),
            '3' => Ok(Severity::Major),
            '4' => Ok(Severity::Extreme),
            other => Err(CodeError::BadSeverityDigit(other)),
        }
    }

    /// Increments by one level, saturating at [`Severity::MAX`]
    pub fn saturating_inc(&self) -> Self {
        Severity::try_from(self.level() + 1).unwrap_or(Severity::MAX)
    }

    /// The relative-weight multiplier for this severity level
    pub fn weight_multiplier(&self) -> Decimal {
        match self {
            Severity::None => dec!(0.9),
            Severity::Minor => dec!(1.0),
            Severity::Moderate => dec!(1.1),
            Severity::Major => dec!(1.25),
            Severity::Extreme => dec!(1.5),
        }
    }

    /// Gap in levels between two severities (target minus current)
    pub fn gap_from(&self, current: Severity) -> i8 {
        self.level() as i8 - current.level() as i8
    }
}

impl From<Severity> for u8 {
    fn from(s: Severity) -> u8 {
        s.level()
    }
}

impl TryFrom<u8> for Severity {
    type Error = CodeError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Severity::None),
            1 => Ok(Severity::Minor),
            2 => Ok(Severity::Moderate),
            3 => Ok(Severity::Major),
            4 => Ok(Severity::Extreme),
            other => Err(CodeError::BadSeverityDigit((b'0' + other.min(9)) as char)),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// 4-character adjacent group (AADRG) code
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AadrgCode(String);

impl AadrgCode {
    pub fn new(code: impl Into<String>) -> Result<Self, CodeError> {
        let code: String = code.into().trim().to_ascii_uppercase();
        if code.len() != 4 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CodeError::BadAadrgLength(code));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The major category letter (first character)
    pub fn major_category(&self) -> MajorCategory {
        // Constructor guarantees an ASCII alphanumeric first char; digits
        // cannot start a real AADRG, but tolerate them as-is.
        MajorCategory(self.0.chars().next().unwrap_or('W'))
    }

    /// Appends a severity digit to form the full KDRG code
    pub fn with_severity(&self, severity: Severity) -> KdrgCode {
        KdrgCode(format!("{}{}", self.0, severity.digit()))
    }
}

impl fmt::Display for AadrgCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AadrgCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Full 5-character KDRG code: AADRG plus severity digit
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KdrgCode(String);

impl KdrgCode {
    pub fn new(code: impl Into<String>) -> Result<Self, CodeError> {
        let code: String = code.into().trim().to_ascii_uppercase();
        if code.len() != 5 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CodeError::BadKdrgLength(code));
        }
        let digit = code.chars().nth(4).unwrap_or('0');
        Severity::from_digit(digit)?;
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The major category letter (first character)
    pub fn major_category(&self) -> MajorCategory {
        MajorCategory(self.0.chars().next().unwrap_or('W'))
    }

    /// The 4-character AADRG part
    pub fn aadrg(&self) -> AadrgCode {
        AadrgCode(self.0[..4].to_string())
    }

    /// The severity encoded in the final digit
    pub fn severity(&self) -> Severity {
        Severity::from_digit(self.0.chars().nth(4).unwrap_or('0')).unwrap_or(Severity::None)
    }
}

impl fmt::Display for KdrgCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for KdrgCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Normalizes a clinical code (ICD-10 diagnosis or procedure) for prefix
/// matching: uppercase with dots removed, so `"J35.0"` becomes `"J350"`.
pub fn normalize_clinical_code(code: &str) -> String {
    code.trim()
        .chars()
        .filter(|c| *c != '.')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Lenient decomposition of an externally-supplied code string
///
/// Payer extracts carry codes the hospital never produced, so this never
/// fails: codes shorter than 4 characters decompose into empty parts, and a
/// missing severity digit reads as `'0'`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeParts {
    pub major_category: String,
    pub aadrg: String,
    pub severity_digit: String,
}

impl CodeParts {
    pub fn decompose(code: &str) -> Self {
        let chars: Vec<char> = code.trim().to_ascii_uppercase().chars().collect();
        if chars.len() < 4 {
            return Self {
                major_category: String::new(),
                aadrg: String::new(),
                severity_digit: String::new(),
            };
        }
        let severity_digit = chars
            .get(4)
            .map(|c| c.to_string())
            .unwrap_or_else(|| "0".to_string());
        Self {
            major_category: chars[0].to_string(),
            aadrg: chars[..4].iter().collect(),
            severity_digit,
        }
    }

    /// True when all parts are empty (code was too short to decompose)
    pub fn is_empty(&self) -> bool {
        self.aadrg.is_empty()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn kdrg_code_is_aadrg_plus_digit(
            aadrg in "[A-Z][0-9]{2}[A-Z0-9]",
            level in 0u8..=4u8
        ) {
            let severity = Severity::try_from(level).unwrap();
            let code = AadrgCode::new(aadrg.clone()).unwrap().with_severity(severity);

            prop_assert_eq!(code.as_str().len(), 5);
            let code_aadrg = code.aadrg();
            prop_assert_eq!(code_aadrg.as_str(), aadrg.as_str());
            prop_assert_eq!(code.severity(), severity);
        }

        #[test]
        fn decompose_never_panics(code in ".{0,12}") {
            let _ = CodeParts::decompose(&code);
        }
    }
}
