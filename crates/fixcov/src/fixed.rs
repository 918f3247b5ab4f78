//! Signed 16.16 fixed-point arithmetic
//!
//! [`Fixed`] stores a real value as a two's-complement `i32` scaled by
//! `2^16`, giving 16 integer bits (sign included) and 16 fractional bits.
//! Every operation is integer-only, so results are bit-for-bit reproducible
//! across platforms.
//!
//! Rounding rules:
//! - multiplication and division widen to `i64` and truncate toward zero
//! - overflow of the 32-bit result is reported as [`ArithmeticError::Overflow`]
//! - division by zero is reported as [`ArithmeticError::DivisionByZero`]
//!
//! Conversions to `f64` exist for reporting and tests only.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of fractional bits in the representation
pub const FRAC_BITS: u32 = 16;

const SCALE: i64 = 1 << FRAC_BITS;

/// `10^16 / 2^16`, used to print the fractional part exactly
const FRACTION_TO_DECIMAL: u64 = 152_587_890_625;

/// Decimal digits needed to print any 16-bit binary fraction exactly
const DECIMAL_DIGITS: usize = 16;

/// Fractional digits considered when parsing; anything past this is dropped
const MAX_PARSE_DIGITS: usize = 30;

/// Errors raised by fixed-point arithmetic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    /// Result does not fit in the 16.16 range
    #[error("Fixed-point overflow in {op}")]
    Overflow {
        /// Operation that overflowed
        op: &'static str,
    },

    /// Divisor was zero
    #[error("Fixed-point division by zero")]
    DivisionByZero,

    /// Malformed decimal literal
    #[error("Invalid fixed-point literal: {0:?}")]
    Parse(String),
}

/// Signed 16.16 fixed-point number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(i32);

impl Fixed {
    /// Additive identity
    pub const ZERO: Self = Self(0);

    /// Multiplicative identity
    pub const ONE: Self = Self(1 << FRAC_BITS);

    /// Largest representable value (just under 32768)
    pub const MAX: Self = Self(i32::MAX);

    /// Smallest representable value (-32768)
    pub const MIN: Self = Self(i32::MIN);

    /// Smallest positive value, `2^-16`
    pub const EPSILON: Self = Self(1);

    /// Build from the raw scaled representation
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw scaled representation (`value * 2^16`)
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Build from an unscaled magnitude and a sign flag
    ///
    /// `from_unscaled(94, false)` is `94.0`, `from_unscaled(3, true)` is `-3.0`.
    pub fn from_unscaled(mag: u32, sign: bool) -> Result<Self, ArithmeticError> {
        let scaled = i64::from(mag) * SCALE;
        narrow(if sign { -scaled } else { scaled }, "from_unscaled")
    }

    /// Build from a signed integer
    pub fn from_int(value: i32) -> Result<Self, ArithmeticError> {
        narrow(i64::from(value) * SCALE, "from_int")
    }

    /// Whether the value is strictly below zero
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Whether the value is exactly zero
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(self, rhs: Self) -> Result<Self, ArithmeticError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(ArithmeticError::Overflow { op: "add" })
    }

    /// Checked subtraction
    pub fn checked_sub(self, rhs: Self) -> Result<Self, ArithmeticError> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(ArithmeticError::Overflow { op: "sub" })
    }

    /// Checked negation (fails only for [`Fixed::MIN`])
    pub fn checked_neg(self) -> Result<Self, ArithmeticError> {
        self.0
            .checked_neg()
            .map(Self)
            .ok_or(ArithmeticError::Overflow { op: "neg" })
    }

    /// Checked multiplication, truncating toward zero
    pub fn checked_mul(self, rhs: Self) -> Result<Self, ArithmeticError> {
        let product = i64::from(self.0) * i64::from(rhs.0);
        narrow(product / SCALE, "mul")
    }

    /// Checked division, truncating toward zero
    pub fn checked_div(self, rhs: Self) -> Result<Self, ArithmeticError> {
        if rhs.0 == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        let numerator = i64::from(self.0) * SCALE;
        narrow(numerator / i64::from(rhs.0), "div")
    }

    /// Raise to a non-negative integer power by repeated squaring
    ///
    /// Each intermediate product is truncated like [`Fixed::checked_mul`].
    /// `x.pow(0)` is [`Fixed::ONE`] for every `x`, zero included.
    pub fn pow(self, exp: u32) -> Result<Self, ArithmeticError> {
        let mut base = self;
        let mut exp = exp;
        let mut acc = Self::ONE;

        while exp > 0 {
            if exp & 1 == 1 {
                acc = acc.checked_mul(base)?;
            }
            exp >>= 1;
            if exp > 0 {
                base = base.checked_mul(base)?;
            }
        }

        Ok(acc)
    }

    /// Lossless conversion to `f64`, for reporting only
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / SCALE as f64
    }
}

fn narrow(value: i64, op: &'static str) -> Result<Fixed, ArithmeticError> {
    i32::try_from(value)
        .map(Fixed)
        .map_err(|_| ArithmeticError::Overflow { op })
}

impl fmt::Display for Fixed {
    /// Prints the exact decimal expansion, trailing zeros trimmed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = i64::from(self.0).unsigned_abs();
        let integer = magnitude >> FRAC_BITS;
        let fraction = magnitude & (SCALE as u64 - 1);
        let sign = if self.0 < 0 { "-" } else { "" };

        if fraction == 0 {
            return write!(f, "{sign}{integer}");
        }

        let digits = format!(
            "{:0width$}",
            fraction * FRACTION_TO_DECIMAL,
            width = DECIMAL_DIGITS
        );
        write!(f, "{sign}{integer}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for Fixed {
    type Err = ArithmeticError;

    /// Parses `[+-]digits[.digits]` exactly, truncating toward zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ArithmeticError::Parse(s.to_string());
        let trimmed = s.trim();

        let (negative, body) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(invalid());
        }

        let mut integer: i64 = 0;
        for digit in int_part.bytes() {
            integer = integer * 10 + i64::from(digit - b'0');
            if integer > SCALE {
                return Err(ArithmeticError::Overflow { op: "parse" });
            }
        }

        let mut numerator: u128 = 0;
        let mut denominator: u128 = 1;
        for digit in frac_part.bytes().take(MAX_PARSE_DIGITS) {
            numerator = numerator * 10 + u128::from(digit - b'0');
            denominator *= 10;
        }
        // numerator < denominator, so the quotient is below SCALE
        let fraction = (numerator * SCALE as u128 / denominator) as i64;

        let magnitude = integer * SCALE + fraction;
        narrow(if negative { -magnitude } else { magnitude }, "parse")
    }
}

impl Serialize for Fixed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fixed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        literal.parse().map_err(de::Error::custom)
    }
}
