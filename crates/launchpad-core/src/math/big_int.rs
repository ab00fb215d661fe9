//! Big integer operations for high-precision math
//!
//! Reserve products exceed 128 bits long before the reserves themselves do,
//! so every product is formed in a 256-bit intermediate and only narrowed
//! after the division.

use ethnum::U256;
use integer_sqrt::IntegerSquareRoot;

use crate::errors::{CoreResult, LaunchpadError};

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum Rounding {
    /// Round down (towards zero)
    Down,
    /// Round up (away from zero)
    Up,
}

impl Rounding {
    /// Direction for anything the protocol pays out
    pub const PAYOUT: Rounding = Rounding::Down;

    /// Direction for anything the protocol collects or keeps
    pub const COLLECT: Rounding = Rounding::Up;
}

/// Full 256-bit product of two u128 values
pub fn widening_mul(a: u128, b: u128) -> U256 {
    U256::from(a) * U256::from(b)
}

/// Divide a 256-bit value, rounding as requested
pub fn div_rounding(numerator: U256, denominator: U256, rounding: Rounding) -> CoreResult<U256> {
    if denominator == U256::ZERO {
        return Err(LaunchpadError::DivisionByZero);
    }
    let quotient = numerator / denominator;
    match rounding {
        Rounding::Up if numerator % denominator != U256::ZERO => Ok(quotient + U256::ONE),
        _ => Ok(quotient),
    }
}

/// Narrow a 256-bit value back to u128
pub fn narrow(value: U256) -> CoreResult<u128> {
    let (hi, lo) = value.into_words();
    if hi != 0 {
        return Err(LaunchpadError::Overflow);
    }
    Ok(lo)
}

/// `a * b / denominator` without intermediate overflow
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> CoreResult<u128> {
    let product = widening_mul(a, b);
    narrow(div_rounding(product, U256::from(denominator), rounding)?)
}

/// `product / denominator` for a precomputed 256-bit product
pub fn div_product(product: U256, denominator: u128, rounding: Rounding) -> CoreResult<u128> {
    narrow(div_rounding(product, U256::from(denominator), rounding)?)
}

/// Integer square root of a 256-bit value, rounded down
pub fn sqrt_u256(value: U256) -> U256 {
    let (hi, lo) = value.into_words();
    if hi == 0 {
        return U256::from(lo.integer_sqrt());
    }

    // Newton's method from a power-of-two guess that is never below the root
    let bits = 256 - value.leading_zeros();
    let mut x = U256::ONE << ((bits + 1) / 2);
    let mut y = (x + value / x) >> 1;
    while y < x {
        x = y;
        y = (x + value / x) >> 1;
    }
    x
}

/// Integer square root of `a * b`, rounded down
pub fn sqrt_product(a: u128, b: u128) -> u128 {
    // sqrt of a 256-bit value always fits in 128 bits
    sqrt_u256(widening_mul(a, b)).into_words().1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_rounding() {
        assert_eq!(mul_div(10, 10, 3, Rounding::Down).unwrap(), 33);
        assert_eq!(mul_div(10, 10, 3, Rounding::Up).unwrap(), 34);
        assert_eq!(mul_div(10, 9, 3, Rounding::Up).unwrap(), 30);
    }

    #[test]
    fn test_mul_div_wide_intermediate() {
        // u128::MAX * 4 overflows 128 bits before the division brings it back
        let result = mul_div(u128::MAX, 4, 8, Rounding::Down).unwrap();
        assert_eq!(result, u128::MAX / 2);
    }

    #[test]
    fn test_mul_div_errors() {
        assert_eq!(mul_div(1, 1, 0, Rounding::Down), Err(LaunchpadError::DivisionByZero));
        assert_eq!(mul_div(u128::MAX, u128::MAX, 1, Rounding::Down), Err(LaunchpadError::Overflow));
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(sqrt_product(1_000, 10), 100);
        assert_eq!(sqrt_product(15, 1), 3);
        assert_eq!(sqrt_product(0, 5), 0);
        assert_eq!(sqrt_product(u128::MAX, u128::MAX), u128::MAX);

        let wide = widening_mul(1u128 << 100, 1u128 << 100);
        assert_eq!(sqrt_u256(wide), U256::from(1u128 << 100));
    }
}
