//! Integer arithmetic primitives for the matching engine.

use crate::errors::{LedgerError, Result};

/// Floor square root of a non-negative integer.
///
/// Returns the unique `r` with `r * r <= x < (r + 1) * (r + 1)`;
/// `floor_sqrt(0) == 0`. Pure: identical input always yields identical
/// output.
///
/// Babylonian iteration with integer division. The estimate sequence is
/// strictly decreasing until it crosses the floor root, so the loop
/// terminates with `y` holding the answer.
///
/// Negative input is a caller bug; amounts are validated positive at the
/// public API boundary.
pub fn floor_sqrt(x: i128) -> i128 {
    debug_assert!(x >= 0, "floor_sqrt of negative value {x}");
    if x == 0 {
        return 0;
    }
    // Seed with ceil(x / 2), written to stay in range at i128::MAX.
    let mut z = x / 2 + (x & 1);
    let mut y = x;
    while z < y {
        y = z;
        z = (x / z + z) / 2;
    }
    y
}

/// Checked addition that rejects overflow instead of wrapping.
pub(crate) fn add_checked(a: i128, b: i128, context: &'static str) -> Result<i128> {
    a.checked_add(b)
        .ok_or(LedgerError::ArithmeticOverflow { context })
}

/// Checked multiplication that rejects overflow instead of wrapping.
pub(crate) fn mul_checked(a: i128, b: i128, context: &'static str) -> Result<i128> {
    a.checked_mul(b)
        .ok_or(LedgerError::ArithmeticOverflow { context })
}
