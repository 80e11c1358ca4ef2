//! Big-integer arithmetic backends for IPv4 normalization.
//!
//! The generalized IPv4 grammar lets a single label hold up to `256^5`,
//! so the normalizer needs arithmetic that is exact at least up to
//! `256^6`. The [`Calculator`] trait is the capability seam: a backend
//! is chosen once when a normalizer is constructed and never changes.

use core::cmp::Ordering;
use core::fmt;

use num_bigint::BigUint;

use crate::error::MissingBackendError;

/// The largest IPv4 address value, `2^32 - 1`.
const MAX_IPV4: u64 = u32::MAX as u64;

/// A capability set over an opaque unsigned-integer type.
///
/// All operations must be exact for magnitudes up to at least `256^6`.
/// Implementations are stateless after construction, so a normalizer
/// holding one is freely shareable across threads.
pub trait Calculator {
    /// The opaque unsigned-integer type the backend computes with.
    type Num: Clone + PartialEq + fmt::Debug;

    /// Converts a digit string in the given base (8, 10 or 16) to a value.
    ///
    /// An empty digit string converts to zero. Returns `None` when the
    /// digits are invalid for the base or the value exceeds what the
    /// backend can represent exactly; any such value is necessarily
    /// larger than [`max_ipv4`](Self::max_ipv4).
    fn base_convert(&self, digits: &str, base: u32) -> Option<Self::Num>;

    /// Returns `a + b`.
    fn add(&self, a: &Self::Num, b: &Self::Num) -> Self::Num;

    /// Returns `a - b`. The caller must ensure `a >= b`.
    fn sub(&self, a: &Self::Num, b: &Self::Num) -> Self::Num;

    /// Returns `a * b`.
    fn multiply(&self, a: &Self::Num, b: &Self::Num) -> Self::Num;

    /// Returns the integer quotient `a / d`. The caller must ensure `d != 0`.
    fn div(&self, a: &Self::Num, d: &Self::Num) -> Self::Num;

    /// Returns the remainder `a mod d`. The caller must ensure `d != 0`.
    fn rem(&self, a: &Self::Num, d: &Self::Num) -> Self::Num;

    /// Returns `base^exp`.
    fn pow(&self, base: u32, exp: u32) -> Self::Num;

    /// Compares two values.
    fn compare(&self, a: &Self::Num, b: &Self::Num) -> Ordering;

    /// Converts a value to `u8`. The caller must ensure the value is
    /// less than 256.
    fn to_u8(&self, n: &Self::Num) -> u8;

    /// The precomputed largest IPv4 address value, `2^32 - 1`.
    fn max_ipv4(&self) -> &Self::Num;
}

/// Fixed-width native arithmetic.
///
/// Backed by `u128`, which comfortably covers the `256^6` requirement.
/// Digit strings whose value overflows the native width fail
/// [`base_convert`](Calculator::base_convert); every such value exceeds
/// `2^32 - 1` and would be rejected by the normalizer anyway.
#[derive(Clone, Debug)]
pub struct NativeCalculator {
    max_ipv4: u128,
}

impl NativeCalculator {
    /// Creates the native backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_ipv4: MAX_IPV4 as u128,
        }
    }

    /// Creates the native backend, verifying that native arithmetic
    /// is exact over the required range.
    ///
    /// # Errors
    ///
    /// Returns [`MissingBackendError`] when the probe fails. This does
    /// not happen on any target with a conforming `u128`.
    pub fn probe() -> Result<Self, MissingBackendError> {
        let calc = Self::new();
        if calc.pow(256, 6) == 1u128 << 48 && calc.base_convert("ffffffff", 16) == Some(calc.max_ipv4)
        {
            Ok(calc)
        } else {
            Err(MissingBackendError(()))
        }
    }
}

impl Default for NativeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator for NativeCalculator {
    type Num = u128;

    fn base_convert(&self, digits: &str, base: u32) -> Option<u128> {
        if digits.is_empty() {
            return Some(0);
        }
        u128::from_str_radix(digits, base).ok()
    }

    fn add(&self, a: &u128, b: &u128) -> u128 {
        a.checked_add(*b).unwrap_or(u128::MAX)
    }

    fn sub(&self, a: &u128, b: &u128) -> u128 {
        a.saturating_sub(*b)
    }

    fn multiply(&self, a: &u128, b: &u128) -> u128 {
        a.checked_mul(*b).unwrap_or(u128::MAX)
    }

    fn div(&self, a: &u128, d: &u128) -> u128 {
        a / d
    }

    fn rem(&self, a: &u128, d: &u128) -> u128 {
        a % d
    }

    fn pow(&self, base: u32, exp: u32) -> u128 {
        u128::from(base).pow(exp)
    }

    fn compare(&self, a: &u128, b: &u128) -> Ordering {
        a.cmp(b)
    }

    fn to_u8(&self, n: &u128) -> u8 {
        debug_assert!(*n < 256);
        *n as u8
    }

    fn max_ipv4(&self) -> &u128 {
        &self.max_ipv4
    }
}

/// Exact arbitrary-precision arithmetic over [`BigUint`].
#[derive(Clone, Debug)]
pub struct BigIntCalculator {
    max_ipv4: BigUint,
}

impl BigIntCalculator {
    /// Creates the arbitrary-precision backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_ipv4: BigUint::from(MAX_IPV4),
        }
    }
}

impl Default for BigIntCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator for BigIntCalculator {
    type Num = BigUint;

    fn base_convert(&self, digits: &str, base: u32) -> Option<BigUint> {
        if digits.is_empty() {
            return Some(BigUint::from(0u32));
        }
        BigUint::parse_bytes(digits.as_bytes(), base)
    }

    fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        a + b
    }

    fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        a - b
    }

    fn multiply(&self, a: &BigUint, b: &BigUint) -> BigUint {
        a * b
    }

    fn div(&self, a: &BigUint, d: &BigUint) -> BigUint {
        a / d
    }

    fn rem(&self, a: &BigUint, d: &BigUint) -> BigUint {
        a % d
    }

    fn pow(&self, base: u32, exp: u32) -> BigUint {
        let base = BigUint::from(base);
        let mut out = BigUint::from(1u32);
        for _ in 0..exp {
            out = &out * &base;
        }
        out
    }

    fn compare(&self, a: &BigUint, b: &BigUint) -> Ordering {
        a.cmp(b)
    }

    fn to_u8(&self, n: &BigUint) -> u8 {
        debug_assert!(n < &BigUint::from(256u32));
        n.to_u32_digits().first().copied().unwrap_or(0) as u8
    }

    fn max_ipv4(&self) -> &BigUint {
        &self.max_ipv4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<C: Calculator>(calc: &C) {
        let a = calc.base_convert("0300", 8).unwrap();
        let b = calc.base_convert("c0", 16).unwrap();
        assert_eq!(calc.compare(&a, &b), Ordering::Equal);

        let max = calc.base_convert("4294967295", 10).unwrap();
        assert_eq!(calc.compare(&max, calc.max_ipv4()), Ordering::Equal);

        let bound = calc.pow(256, 5);
        let one = calc.base_convert("1", 10).unwrap();
        let back = calc.sub(&calc.add(&bound, &one), &one);
        assert_eq!(calc.compare(&back, &bound), Ordering::Equal);

        let d = calc.pow(256, 1);
        let q = calc.div(&bound, &d);
        assert_eq!(calc.compare(&q, &calc.pow(256, 4)), Ordering::Equal);
        let r = calc.rem(&bound, &d);
        assert_eq!(calc.to_u8(&r), 0);

        // empty digits convert to zero
        let zero = calc.base_convert("", 16).unwrap();
        assert_eq!(calc.to_u8(&zero), 0);

        // invalid digits for the base
        assert!(calc.base_convert("89", 8).is_none());
        assert!(calc.base_convert("fg", 16).is_none());
    }

    #[test]
    fn native_backend() {
        exercise(&NativeCalculator::new());
        assert!(NativeCalculator::probe().is_ok());
    }

    #[test]
    fn bigint_backend() {
        exercise(&BigIntCalculator::new());

        // exact far beyond the native width
        let calc = BigIntCalculator::new();
        let huge = calc.base_convert(&"9".repeat(60), 10).unwrap();
        assert_eq!(calc.compare(&huge, calc.max_ipv4()), Ordering::Greater);
    }
}
