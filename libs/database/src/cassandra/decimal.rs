//! Fixed-point conversions for CQL `decimal` columns
//!
//! Domain code keeps money as integer minor units (cents); the column maps to
//! a `BigDecimal` through the driver. A value is `units × 10^-scale`.

use bigdecimal::{BigDecimal, ToPrimitive, Zero};

/// Digits in `i64::MAX`
const I64_DIGITS: i64 = 19;

/// `units × 10^-scale` as a decimal
pub fn decimal_from_scaled(units: i64, scale: i64) -> BigDecimal {
    BigDecimal::new(units.into(), scale)
}

/// Integer units at `scale`
///
/// Returns `None` when the value does not fit in an `i64` or carries more
/// fractional digits than `scale` can represent.
pub fn scaled_from_decimal(decimal: &BigDecimal, scale: i64) -> Option<i64> {
    if decimal.is_zero() {
        return Some(0);
    }

    let (_, exponent) = decimal.as_bigint_and_exponent();
    if scale.checked_sub(exponent)? > I64_DIGITS {
        return None;
    }

    let rescaled = decimal.with_scale(scale);
    if rescaled != *decimal {
        return None;
    }

    let (units, _) = rescaled.into_bigint_and_exponent();
    units.to_i64()
}
