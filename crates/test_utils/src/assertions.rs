//! Custom Test Assertions
//!
//! Assertion helpers for domain types that give more meaningful error
//! messages than standard assertions.

use core_kernel::Money;
use rust_decimal::Decimal;

/// Asserts that two Money values are equal within a tolerance
///
/// # Panics
///
/// Panics if the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: Money, expected: Money, tolerance: Decimal) {
    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is positive
pub fn assert_money_positive(money: Money) {
    assert!(
        money.is_positive(),
        "Expected positive money, got \u{20a9}{}",
        money.amount()
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got \u{20a9}{}",
        money.amount()
    );
}

/// Asserts that money values sum to a total
///
/// # Panics
///
/// Panics if the sum doesn't equal the total
pub fn assert_money_sum_equals(parts: &[Money], total: Money) {
    let sum: Money = parts.iter().copied().sum();
    assert_eq!(
        sum.amount(),
        total.amount(),
        "Sum of parts ({}) doesn't equal total ({})",
        sum.amount(),
        total.amount()
    );
}

/// Asserts that a KDRG code string is well-formed (four alphanumerics
/// plus a severity digit)
pub fn assert_kdrg_shape(code: &str) {
    assert_eq!(code.len(), 5, "KDRG code must be 5 characters: {code}");
    assert!(
        code.chars().take(4).all(|c| c.is_ascii_alphanumeric()),
        "KDRG group part must be alphanumeric: {code}"
    );
    let severity = code.chars().nth(4).unwrap();
    assert!(
        ('0'..='4').contains(&severity),
        "KDRG severity digit must be 0-4: {code}"
    );
}
