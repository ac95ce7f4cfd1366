//! Arbitrary-precision arithmetic for quote/order bookkeeping.
//!
//! All monetary amounts in the data model are decimal strings of nonnegative
//! integers in the asset's smallest unit. Every bookkeeping operation parses
//! them into [`BigInt`], operates exactly, and re-serializes base-10. Price
//! comparison across instruments with different decimal scales uses
//! [`rust_decimal::Decimal`] rather than `f64` to keep the scale-shift exact.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::utils::response::{AppError, ErrorKind};

/// Parses a decimal string of a nonnegative integer into a [`BigInt`].
///
/// Returns `InvalidArgument` on malformed input, matching the source's
/// "parsing failures are fatal for the request" rule.
pub fn parse_amount(raw: &str) -> Result<BigInt, AppError> {
    let value = BigInt::from_str(raw)
        .map_err(|_| AppError::new(ErrorKind::InvalidArgument, format!("invalid integer amount: {raw}")))?;
    if value.is_negative() {
        return Err(AppError::new(ErrorKind::InvalidArgument, format!("amount must be nonnegative: {raw}")));
    }
    Ok(value)
}

pub fn to_amount_string(value: &BigInt) -> String {
    value.to_str_radix(10)
}

pub fn zero() -> BigInt {
    BigInt::zero()
}

/// Gross-up fee for an ASK-side quote creation / ASK-side taker (`BuyQuote`):
/// `totalVolume = volume / (1 - rate)`, `fee = totalVolume - volume`. `rate`
/// is expressed as a ratio of two small integers (numerator over
/// denominator) to keep the whole computation in exact integer arithmetic
/// instead of floating point.
///
/// The source serializes the float64 division with `"%.0f"`, which rounds to
/// the nearest integer rather than truncating (confirmed by the worked
/// example in the spec: volume 100000000 at rate 0.002 yields a fee of
/// 200401, not the 200400 that floor division gives) — so this reproduces
/// that with exact-rational round-half-up rather than re-deriving the same
/// answer through lossy `f64` division.
///
/// With `rate = numer/denom`, `totalVolume = round(volume * denom / (denom - numer))`.
pub fn gross_up_fee(volume: &BigInt, rate_numer: i64, rate_denom: i64) -> (BigInt, BigInt) {
    let denom = BigInt::from(rate_denom);
    let numer = BigInt::from(rate_numer);
    let divisor = &denom - &numer;
    let total_volume = round_half_up_div(&(volume * &denom), &divisor);
    let fee = &total_volume - volume;
    (total_volume, fee)
}

/// Flat fee for a BID-side taker (`SellQuote`) and BID-side quote creation:
/// `fee = rate * volume`, rounded to nearest the same way as [`gross_up_fee`].
pub fn flat_fee(volume: &BigInt, rate_numer: i64, rate_denom: i64) -> BigInt {
    round_half_up_div(&(volume * BigInt::from(rate_numer)), &BigInt::from(rate_denom))
}

/// `rate` as `(numerator, denominator)` for the default platform fee `0.002`.
pub const DEFAULT_FEE_RATE: (i64, i64) = (2, 1000);

/// Converts a decimal fee rate (e.g. `0.002`) carried on a `Member` record
/// into a `(numerator, denominator)` pair with a fixed denominator of
/// `1_000_000`, preserving up to 6 decimal digits of precision.
pub fn rate_as_fraction(rate: Decimal) -> (i64, i64) {
    const DENOM: i64 = 1_000_000;
    let numer = (rate * Decimal::from(DENOM)).round();
    (numer.to_string().parse().unwrap_or(0), DENOM)
}

/// round-half-up integer division, used for `value = round(price * volume)`.
pub fn round_half_up_div(numerator: &BigInt, denominator: &BigInt) -> BigInt {
    let two = BigInt::from(2);
    let doubled = numerator * &two;
    let half_denom = denominator * &two;
    (doubled + denominator) / half_denom
}

/// Computes `round(price * volume)` for REGULAR-quote value derivation.
/// `price` carries `scale` decimal digits, represented as an integer
/// `price_scaled = price * 10^scale`.
pub fn round_price_times_volume(price_scaled: &BigInt, scale: u32, volume: &BigInt) -> BigInt {
    let pow = BigInt::from(10).pow(scale);
    round_half_up_div(&(price_scaled * volume), &pow)
}

/// Converts a `price` with up to `scale` fractional digits into its scaled
/// integer representation (`price * 10^scale`), for feeding
/// [`round_price_times_volume`]. `InvalidArgument` if `price` carries more
/// fractional digits than `scale` allows.
pub fn decimal_to_scaled_int(price: Decimal, scale: u32) -> Result<BigInt, AppError> {
    let scaled = price * Decimal::from(10i64.pow(scale));
    if scaled.fract() != Decimal::ZERO {
        return Err(AppError::new(ErrorKind::InvalidArgument, format!("price {price} exceeds scale {scale}")));
    }
    BigInt::from_str(&scaled.trunc().to_string())
        .map_err(|_| AppError::new(ErrorKind::InvalidArgument, format!("price {price} out of range")))
}

/// Derives `price = value / volume` as a [`Decimal`] for a WHOLESALE quote or
/// a taker's implied price, from each asset's own smallest-unit integer
/// amounts. `base_decimal`/`quote_decimal` select how many fractional digits
/// the result is rounded to for display.
pub fn derive_price(value: &BigInt, volume: &BigInt, base_decimal: u32, quote_decimal: u32) -> Decimal {
    let value_dec = Decimal::from_str(&to_amount_string(value)).unwrap_or_default();
    let volume_dec = Decimal::from_str(&to_amount_string(volume)).unwrap_or(Decimal::ONE);
    let price = if volume_dec.is_zero() { Decimal::ZERO } else { value_dec / volume_dec };
    price.round_dp(base_decimal.max(quote_decimal).min(28))
}

/// Decimal-scale shift ("ImprFloat"): shifts `value` by `10^shift` (shift may
/// be negative). Exposed as a standalone helper for instruments whose base
/// and quote assets are expressed in incompatible display conventions; the
/// default order-taking path (see [`prices_match`]) does not need it because
/// `price = value / volume` is already computed from each asset's own
/// smallest-unit amounts and is directly comparable to the quote's stored
/// price in that same convention.
pub fn shift_scale(value: Decimal, shift: i32) -> Decimal {
    if shift >= 0 {
        value * Decimal::from(10i64.pow(shift as u32))
    } else {
        value / Decimal::from(10i64.pow((-shift) as u32))
    }
}

/// Compares a freshly-derived price against a quote's stored price, allowing
/// `±0.01` drift. `base_decimal`/`quote_decimal` are accepted for callers
/// that need [`shift_scale`] first; the default comparison applies no shift.
pub fn prices_match(derived: Decimal, stored: Decimal, _base_decimal: u32, _quote_decimal: u32) -> bool {
    let tolerance = Decimal::new(1, 2); // 0.01
    (derived - stored).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn gross_up_matches_scenario_one() {
        let volume = BigInt::from(100_000_000i64);
        let (total, fee) = gross_up_fee(&volume, 2, 1000);
        assert_eq!(to_amount_string(&total), "100200401");
        assert_eq!(to_amount_string(&fee), "200401");
    }

    #[test]
    fn flat_fee_is_straight_multiply() {
        let volume = BigInt::from(100_000_000i64);
        let fee = flat_fee(&volume, 2, 1000);
        assert_eq!(to_amount_string(&fee), "200000");
    }

    #[test]
    fn parse_amount_rejects_negative_and_garbage() {
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("0").is_ok());
    }

    #[test]
    fn round_half_up_matches_spec_rounding() {
        // price=0.001 (scale 3 -> price_scaled=1), volume=100000000 -> value=100000
        let price_scaled = BigInt::from(1);
        let volume = BigInt::from(100_000_000i64);
        let value = round_price_times_volume(&price_scaled, 3, &volume);
        assert_eq!(to_amount_string(&value), "100000");
    }

    #[test]
    fn prices_match_within_tolerance() {
        assert!(prices_match(dec!(0.001), dec!(0.001), 8, 2));
        assert!(prices_match(dec!(0.0095), dec!(0.001), 8, 2));
        assert!(!prices_match(dec!(0.02), dec!(0.001), 8, 2));
    }
}
