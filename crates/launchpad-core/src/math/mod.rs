//! # Fixed-Point Math
//!
//! Overflow-checked primitives shared by every engine. Divisions truncate
//! unless a [`Rounding`] is requested explicitly; quote code always picks the
//! direction that favours the protocol.

pub mod big_int;
pub mod safe_math;

// Re-export commonly used functions
pub use big_int::*;
pub use safe_math::*;

use ethnum::U256;

use crate::constants::{BPS_DENOMINATOR, PRICE_SCALE};
use crate::errors::{CoreResult, LaunchpadError};

/// Marginal price `reserve / supply`, scaled by [`PRICE_SCALE`]
pub fn marginal_price(reserve: u128, supply: u128) -> CoreResult<u128> {
    if supply == 0 {
        return Err(LaunchpadError::DivisionByZero);
    }
    mul_div(reserve, PRICE_SCALE, supply, Rounding::Down)
}

/// Relative move of the marginal price `reserve / supply` between two
/// points, in basis points.
///
/// Works on the cross products `r1 * s0` and `r0 * s1` so the result does not
/// depend on how coarsely [`PRICE_SCALE`] resolves small prices.
pub fn price_change_bps(
    reserve_before: u128,
    supply_before: u128,
    reserve_after: u128,
    supply_after: u128,
) -> CoreResult<u64> {
    let before = widening_mul(reserve_before, supply_after);
    let after = widening_mul(reserve_after, supply_before);
    let delta = if after > before { after - before } else { before - after };
    let scaled = delta
        .checked_mul(U256::from(BPS_DENOMINATOR))
        .ok_or(LaunchpadError::Overflow)?;
    let bps = narrow(div_rounding(scaled, before, Rounding::Down)?)?;
    safe_cast_u128_to_u64(bps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marginal_price() {
        // 30M reserve over 1B supply = 0.03
        assert_eq!(marginal_price(30_000_000, 1_000_000_000).unwrap(), 30_000_000);
        assert_eq!(marginal_price(1, 0), Err(LaunchpadError::DivisionByZero));
    }

    #[test]
    fn test_price_change_bps() {
        // Price 1.0 -> 1.1
        assert_eq!(price_change_bps(100, 100, 110, 100).unwrap(), 1_000);
        // Price 1.0 -> 0.5, reported unsigned
        assert_eq!(price_change_bps(100, 100, 100, 200).unwrap(), 5_000);
        // Prices too small for PRICE_SCALE still resolve
        assert_eq!(price_change_bps(1, 1u128 << 80, 2, 1u128 << 80).unwrap(), 10_000);
        assert_eq!(price_change_bps(0, 1, 1, 1), Err(LaunchpadError::DivisionByZero));
    }
}
