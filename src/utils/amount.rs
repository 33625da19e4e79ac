//! Exact token quantity arithmetic
//!
//! Raw quantities are unsigned big integers; the human amount is
//! `raw * 10^-decimals`. Strings are produced by digit insertion so large
//! supplies and tiny fractions never pass through floating point or
//! exponent notation.

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint, Sign};
use serde::Serializer;

/// Scale a raw quantity by `10^-decimals`
pub fn scale_quantity(raw: &BigUint, decimals: u8) -> BigDecimal {
    BigDecimal::new(BigInt::from(raw.clone()), i64::from(decimals))
}

/// Decimal string for a raw quantity, keeping every fractional digit
///
/// # Example
/// ```
/// use num_bigint::BigUint;
/// use bch_slp_toolkit::utils::amount::format_quantity;
///
/// assert_eq!(format_quantity(&BigUint::from(100u32), 2), "1.00");
/// assert_eq!(format_quantity(&BigUint::from(1u32), 9), "0.000000001");
/// ```
pub fn format_quantity(raw: &BigUint, decimals: u8) -> String {
    insert_point(raw.to_str_radix(10), i64::from(decimals))
}

/// Plain (non-exponent) string form of a decimal
pub fn format_decimal(value: &BigDecimal) -> String {
    let (int, scale) = value.as_bigint_and_exponent();
    let digits = int.magnitude().to_str_radix(10);
    let plain = if scale >= 0 {
        insert_point(digits, scale)
    } else if int.sign() == Sign::NoSign {
        "0".to_string()
    } else {
        let zeros = "0".repeat(scale.unsigned_abs() as usize);
        format!("{}{}", digits, zeros)
    };

    if int.sign() == Sign::Minus {
        format!("-{}", plain)
    } else {
        plain
    }
}

fn insert_point(digits: String, scale: i64) -> String {
    let scale = scale as usize;
    if scale == 0 {
        return digits;
    }
    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
    } else {
        digits
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    format!("{}.{}", int_part, frac_part)
}

pub fn serialize_biguint<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_str_radix(10))
}

pub fn serialize_biguint_vec<S: Serializer>(
    values: &[BigUint],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|v| v.to_str_radix(10)))
}

pub fn serialize_biguint_opt<S: Serializer>(
    value: &Option<BigUint>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_str(&v.to_str_radix(10)),
        None => serializer.serialize_none(),
    }
}

pub fn serialize_decimal_opt<S: Serializer>(
    value: &Option<BigDecimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_str(&format_decimal(v)),
        None => serializer.serialize_none(),
    }
}
