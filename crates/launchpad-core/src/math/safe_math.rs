//! # Safe Math Operations
//!
//! Overflow-checked arithmetic on the integer widths the engine stores.

use crate::constants::BPS_DENOMINATOR;
use crate::errors::{CoreResult, LaunchpadError};
use crate::math::big_int::{mul_div, Rounding};

/// Macro to generate safe arithmetic functions
macro_rules! safe_arith {
    // Binary operations with checked methods
    ($fn_name:ident, $type:ty, $checked_method:ident, $error:expr) => {
        /// Checked binary operation, failing instead of wrapping
        pub fn $fn_name(a: $type, b: $type) -> CoreResult<$type> {
            a.$checked_method(b).ok_or($error)
        }
    };

    // Division operations with zero check
    (div, $fn_name:ident, $type:ty) => {
        /// Safe division with zero check, truncating toward zero
        pub fn $fn_name(a: $type, b: $type) -> CoreResult<$type> {
            if b == 0 {
                return Err(LaunchpadError::DivisionByZero);
            }
            Ok(a / b)
        }
    };

    // Simple cast with only max check
    (cast_max, $fn_name:ident, $from_type:ty, $to_type:ty, $max_val:expr) => {
        /// Safe narrowing cast
        pub fn $fn_name(value: $from_type) -> CoreResult<$to_type> {
            if value > $max_val {
                return Err(LaunchpadError::Overflow);
            }
            Ok(value as $to_type)
        }
    };
}

safe_arith!(safe_add_u64, u64, checked_add, LaunchpadError::Overflow);
safe_arith!(safe_sub_u64, u64, checked_sub, LaunchpadError::Underflow);

safe_arith!(safe_add_u128, u128, checked_add, LaunchpadError::Overflow);
safe_arith!(safe_sub_u128, u128, checked_sub, LaunchpadError::Underflow);
safe_arith!(safe_mul_u128, u128, checked_mul, LaunchpadError::Overflow);
safe_arith!(div, safe_div_u128, u128);

safe_arith!(cast_max, safe_cast_u128_to_u64, u128, u64, u64::MAX as u128);

/// Take `bps` basis points of `amount`
pub fn apply_bps(amount: u128, bps: u16, rounding: Rounding) -> CoreResult<u128> {
    if bps as u64 > BPS_DENOMINATOR {
        return Err(LaunchpadError::invalid_config("bps", "must be at most 10000"));
    }
    mul_div(amount, bps as u128, BPS_DENOMINATOR as u128, rounding)
}

/// Express `numerator / denominator` in basis points
pub fn ratio_bps(numerator: u128, denominator: u128, rounding: Rounding) -> CoreResult<u64> {
    let bps = mul_div(numerator, BPS_DENOMINATOR as u128, denominator, rounding)?;
    safe_cast_u128_to_u64(bps)
}
