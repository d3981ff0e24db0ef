//! Constants and precision values for the lending orders SDK

use crate::error::{ErrorKind, OrderError, Result};
use alloy::primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// 100% expressed in basis points
pub const ONE_HUNDRED_PCT_IN_BPS: u32 = 10_000;

/// 100% expressed in percents
pub const FULL_PCT: u32 = 100;

/// Lowest LTV (in percents) an LTV-based order may trigger at
pub const MIN_LTV_THRESHOLD_PCT: u32 = 1;

/// Highest LTV (in percents) an LTV-based order may trigger at
pub const MAX_LTV_THRESHOLD_PCT: u32 = 99;

/// Number of fractional bits of the on-chain scaled fractions ("sf" fields)
pub const FRACTION_BITS: u32 = 60;

/// Largest representable scaled fraction
///
/// This is also the only legal parameter of a "repay all debt" opportunity.
pub const MAX_FRACTION_SF: u128 = u128::MAX;

/// Decimal places kept when unscaling a fraction
///
/// A 60-bit fraction resolves steps of about `8.7e-19`, so rounding to 17 places recovers
/// every value of up to 17 places that was scaled with [`scale_fraction`].
pub const UNSCALED_FRACTION_DP: u32 = 17;

/// Number of order slots of a single obligation
pub const ORDER_SLOTS: usize = 2;

/// Convert percents to a fraction (e.g. `75` -> `0.75`)
pub fn pct_to_fraction(pct: Decimal) -> Decimal {
    (pct / Decimal::from(FULL_PCT)).normalize()
}

/// Convert a fraction to percents (e.g. `0.75` -> `75`)
pub fn fraction_to_pct(fraction: Decimal) -> Decimal {
    (fraction * Decimal::from(FULL_PCT)).normalize()
}

/// Convert basis points to a fraction (e.g. `150` -> `0.015`)
pub fn bps_to_fraction(bps: Decimal) -> Decimal {
    (bps / Decimal::from(ONE_HUNDRED_PCT_IN_BPS)).normalize()
}

/// Convert a fraction to basis points (e.g. `0.015` -> `150`)
pub fn fraction_to_bps(fraction: Decimal) -> Decimal {
    (fraction * Decimal::from(ONE_HUNDRED_PCT_IN_BPS)).normalize()
}

/// Divide, failing instead of panicking on a zero divisor or an overflow
pub fn checked_div(numerator: Decimal, denominator: Decimal) -> Result<Decimal> {
    numerator.checked_div(denominator).ok_or_else(|| {
        OrderError::new(
            ErrorKind::Range,
            format!("cannot divide {numerator} by {denominator}"),
        )
        .into()
    })
}

/// Round a fraction to the nearest whole number of basis points
pub fn round_to_bps(fraction: Decimal) -> Result<u16> {
    fraction_to_bps(fraction)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u16()
        .ok_or_else(|| {
            OrderError::new(
                ErrorKind::Range,
                format!("rate {fraction} does not fit in on-chain basis points"),
            )
            .into()
        })
}

/// Scale a non-negative decimal to a 60-bit fixed-point fraction (rounding down)
pub fn scale_fraction(value: Decimal) -> Result<u128> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(OrderError::new(
            ErrorKind::Range,
            format!("cannot scale negative value {value}"),
        )
        .into());
    }
    let mantissa = U256::from(value.mantissa().unsigned_abs());
    let divisor = U256::from(10u64).pow(U256::from(value.scale()));
    let scaled = (mantissa << FRACTION_BITS as usize) / divisor;
    u128::try_from(scaled).map_err(|_| {
        OrderError::new(
            ErrorKind::Range,
            format!("value {value} exceeds the on-chain fraction range"),
        )
        .into()
    })
}

/// Unscale a 60-bit fixed-point fraction to a decimal
///
/// The result is rounded to [`UNSCALED_FRACTION_DP`] places, dropping the flooring of
/// [`scale_fraction`].
pub fn unscale_fraction(sf: u128) -> Decimal {
    let integer = sf >> FRACTION_BITS;
    let fractional = sf & ((1u128 << FRACTION_BITS) - 1);
    let one = Decimal::from_i128_with_scale(1i128 << FRACTION_BITS, 0);
    let value = Decimal::from_i128_with_scale(integer as i128, 0)
        + Decimal::from_i128_with_scale(fractional as i128, 0) / one;
    value.round_dp(UNSCALED_FRACTION_DP).normalize()
}
