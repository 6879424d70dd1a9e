//! Non-negative big numbers for resource stocks, costs, and FLOPS.
//!
//! Late-game totals pass 1e300 and keep growing, which is out of reach for
//! any fixed-width integer or fixed-point type. [`Big`] keeps values below
//! 1e15 as a plain `f64` (so integer bookkeeping like "mine 100 times" stays
//! exact) and switches to a normalized mantissa/exponent pair above that.
//!
//! Every representation is canonical: a value has exactly one `(mantissa,
//! exponent)` form, so equality and ordering are plain field comparisons.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Sub, SubAssign};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Prefix marking a serialized [`Big`] inside a save document.
pub const DECIMAL_TAG: &str = "__D__";

/// Values below this are stored as a plain `f64` with exponent 0.
const SMALL_LIMIT: f64 = 1e15;
const SMALL_EXPONENT: i64 = 15;

/// Exponent gaps wider than this are below `f64` precision; the smaller
/// operand of an add/sub is dropped.
const MAX_EXPONENT_GAP: i64 = 17;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to parse a [`Big`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseBigError {
    #[error("empty numeric string")]
    Empty,
    #[error("invalid numeric string: {0:?}")]
    Invalid(String),
    #[error("negative value not allowed: {0:?}")]
    Negative(String),
}

// ---------------------------------------------------------------------------
// Big
// ---------------------------------------------------------------------------

/// A non-negative number with unbounded exponent.
///
/// Below 1e15 the value lives in `mantissa` with `exponent == 0`. At or above
/// 1e15 the mantissa is normalized to `[1, 10)` and `exponent >= 15`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Big {
    mantissa: f64,
    exponent: i64,
}

impl Big {
    pub const ZERO: Big = Big {
        mantissa: 0.0,
        exponent: 0,
    };
    pub const ONE: Big = Big {
        mantissa: 1.0,
        exponent: 0,
    };

    /// Build `mantissa × 10^exponent`. Non-finite or non-positive mantissas
    /// collapse to zero.
    pub fn new(mantissa: f64, exponent: i64) -> Self {
        if !mantissa.is_finite() || mantissa < f64::MIN_POSITIVE {
            return Self::ZERO;
        }
        if exponent == 0 && mantissa < SMALL_LIMIT {
            return Self {
                mantissa,
                exponent: 0,
            };
        }

        let shift = mantissa.log10().floor() as i64;
        let mut m = mantissa / pow10(shift);
        let mut e = exponent.saturating_add(shift);
        // log10 rounding can leave the mantissa one step outside [1, 10).
        if m >= 10.0 {
            m /= 10.0;
            e += 1;
        } else if m < 1.0 {
            m *= 10.0;
            e -= 1;
        }

        if e < SMALL_EXPONENT {
            let v = m * pow10(e);
            if v < SMALL_LIMIT {
                return Self::new(v, 0);
            }
            return Self {
                mantissa: v / SMALL_LIMIT,
                exponent: SMALL_EXPONENT,
            };
        }
        Self {
            mantissa: m,
            exponent: e,
        }
    }

    /// Convert from `f64`. NaN, infinities, and negatives become zero.
    pub fn from_f64(v: f64) -> Self {
        Self::new(v, 0)
    }

    pub fn is_zero(self) -> bool {
        self.mantissa == 0.0
    }

    /// Lossy conversion for display and scalar math. Saturates to
    /// `f64::INFINITY` past 1e308.
    pub fn to_f64(self) -> f64 {
        if self.exponent == 0 {
            self.mantissa
        } else {
            self.mantissa * pow10(self.exponent)
        }
    }

    /// Normalized `(mantissa, exponent)` with the mantissa in `[1, 10)`.
    /// Zero is `(0.0, 0)`.
    pub fn to_parts(self) -> (f64, i64) {
        if self.exponent != 0 || self.is_zero() {
            return (self.mantissa, self.exponent);
        }
        let shift = self.mantissa.log10().floor() as i64;
        let mut m = self.mantissa / pow10(shift);
        let mut e = shift;
        if m >= 10.0 {
            m /= 10.0;
            e += 1;
        } else if m < 1.0 {
            m *= 10.0;
            e -= 1;
        }
        (m, e)
    }

    /// Base-10 order of magnitude (`floor(log10(self))`). Zero reports 0.
    pub fn magnitude(self) -> i64 {
        self.to_parts().1
    }

    /// `self - rhs`, or `None` if the result would be negative.
    pub fn checked_sub(self, rhs: Big) -> Option<Big> {
        match self.cmp(&rhs) {
            Ordering::Less => None,
            Ordering::Equal => Some(Self::ZERO),
            Ordering::Greater => Some(self.sub_unchecked(rhs)),
        }
    }

    /// `self / rhs`, or `None` for a zero divisor.
    pub fn checked_div(self, rhs: Big) -> Option<Big> {
        if rhs.is_zero() {
            return None;
        }
        if self.exponent == 0 && rhs.exponent == 0 {
            return Some(Self::from_f64(self.mantissa / rhs.mantissa));
        }
        Some(Self::new(
            self.mantissa / rhs.mantissa,
            self.exponent - rhs.exponent,
        ))
    }

    /// Integer power by repeated squaring.
    pub fn powi(self, mut n: u32) -> Big {
        let mut base = self;
        let mut acc = Self::ONE;
        while n > 0 {
            if n & 1 == 1 {
                acc = acc * base;
            }
            base = base * base;
            n >>= 1;
        }
        acc
    }

    /// True when `self` and `other` differ by at most `rel_tol` of the larger.
    pub fn approx_eq(self, other: Big, rel_tol: f64) -> bool {
        let (hi, lo) = if self >= other {
            (self, other)
        } else {
            (other, self)
        };
        (hi - lo) <= hi * rel_tol
    }

    fn add_big(self, rhs: Big) -> Big {
        if self.is_zero() {
            return rhs;
        }
        if rhs.is_zero() {
            return self;
        }
        if self.exponent == 0 && rhs.exponent == 0 {
            return Self::from_f64(self.mantissa + rhs.mantissa);
        }
        let (hi, lo) = if self >= rhs { (self, rhs) } else { (rhs, self) };
        let (hm, he) = hi.to_parts();
        let (lm, le) = lo.to_parts();
        let gap = he - le;
        if gap > MAX_EXPONENT_GAP {
            return hi;
        }
        Self::new(hm + lm / pow10(gap), he)
    }

    /// Requires `self > rhs`.
    fn sub_unchecked(self, rhs: Big) -> Big {
        if rhs.is_zero() {
            return self;
        }
        if self.exponent == 0 && rhs.exponent == 0 {
            return Self::from_f64(self.mantissa - rhs.mantissa);
        }
        let (hm, he) = self.to_parts();
        let (lm, le) = rhs.to_parts();
        let gap = he - le;
        if gap > MAX_EXPONENT_GAP {
            return self;
        }
        Self::new(hm - lm / pow10(gap), he)
    }

    fn mul_big(self, rhs: Big) -> Big {
        if self.is_zero() || rhs.is_zero() {
            return Self::ZERO;
        }
        if self.exponent == 0 && rhs.exponent == 0 {
            return Self::from_f64(self.mantissa * rhs.mantissa);
        }
        Self::new(
            self.mantissa * rhs.mantissa,
            self.exponent.saturating_add(rhs.exponent),
        )
    }
}

/// `10^e` as an `f64`, saturating to 0 or infinity outside the `f64` range.
fn pow10(e: i64) -> f64 {
    if e > 308 {
        f64::INFINITY
    } else if e < -340 {
        0.0
    } else {
        10f64.powi(e as i32)
    }
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

impl Add for Big {
    type Output = Big;
    fn add(self, rhs: Big) -> Big {
        self.add_big(rhs)
    }
}

impl AddAssign for Big {
    fn add_assign(&mut self, rhs: Big) {
        *self = self.add_big(rhs);
    }
}

/// Saturating: results below zero clamp to zero. Use [`Big::checked_sub`]
/// when underflow must be observed.
impl Sub for Big {
    type Output = Big;
    fn sub(self, rhs: Big) -> Big {
        self.checked_sub(rhs).unwrap_or(Self::ZERO)
    }
}

impl SubAssign for Big {
    fn sub_assign(&mut self, rhs: Big) {
        *self = *self - rhs;
    }
}

impl Mul for Big {
    type Output = Big;
    fn mul(self, rhs: Big) -> Big {
        self.mul_big(rhs)
    }
}

impl Mul<f64> for Big {
    type Output = Big;
    fn mul(self, rhs: f64) -> Big {
        self.mul_big(Big::from_f64(rhs))
    }
}

impl MulAssign<f64> for Big {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

/// Division by zero yields zero. Use [`Big::checked_div`] to detect it.
impl Div for Big {
    type Output = Big;
    fn div(self, rhs: Big) -> Big {
        self.checked_div(rhs).unwrap_or(Self::ZERO)
    }
}

impl Sum for Big {
    fn sum<I: Iterator<Item = Big>>(iter: I) -> Big {
        iter.fold(Big::ZERO, |acc, v| acc + v)
    }
}

impl From<u32> for Big {
    fn from(v: u32) -> Self {
        Big::from_f64(f64::from(v))
    }
}

impl From<f64> for Big {
    fn from(v: f64) -> Self {
        Big::from_f64(v)
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

impl PartialEq for Big {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Big {}

impl PartialOrd for Big {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Big {
    fn cmp(&self, other: &Self) -> Ordering {
        self.exponent
            .cmp(&other.exponent)
            .then_with(|| self.mantissa.total_cmp(&other.mantissa))
    }
}

// ---------------------------------------------------------------------------
// Text form
// ---------------------------------------------------------------------------

/// Canonical text: plain decimal below 1e15, `<mantissa>e<exponent>` above.
/// Parsing the output yields the identical value.
impl fmt::Display for Big {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exponent == 0 {
            write!(f, "{}", self.mantissa)
        } else {
            write!(f, "{}e{}", self.mantissa, self.exponent)
        }
    }
}

impl FromStr for Big {
    type Err = ParseBigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseBigError::Empty);
        }
        let invalid = || ParseBigError::Invalid(s.to_string());

        let Some(split) = s.find(['e', 'E']) else {
            let v: f64 = s.parse().map_err(|_| invalid())?;
            return finite_non_negative(v, s).map(Big::from_f64);
        };

        let mantissa: f64 = s[..split].parse().map_err(|_| invalid())?;
        let exponent: i64 = s[split + 1..].parse().map_err(|_| invalid())?;
        let mantissa = finite_non_negative(mantissa, s)?;
        // Within f64 range the whole literal parses with correct rounding.
        if exponent < SMALL_EXPONENT {
            if let Ok(v) = s.parse::<f64>() {
                return Ok(Big::from_f64(v));
            }
        }
        Ok(Big::new(mantissa, exponent))
    }
}

fn finite_non_negative(v: f64, s: &str) -> Result<f64, ParseBigError> {
    if !v.is_finite() {
        Err(ParseBigError::Invalid(s.to_string()))
    } else if v < 0.0 {
        Err(ParseBigError::Negative(s.to_string()))
    } else {
        Ok(v)
    }
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

impl Serialize for Big {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{DECIMAL_TAG}{self}"))
    }
}

/// Accepts the tagged form, a bare numeric string, or a JSON number.
impl<'de> Deserialize<'de> for Big {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BigVisitor)
    }
}

struct BigVisitor;

impl Visitor<'_> for BigVisitor {
    type Value = Big;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative number or numeric string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Big, E> {
        let body = v.strip_prefix(DECIMAL_TAG).unwrap_or(v);
        body.parse().map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Big, E> {
        finite_non_negative(v, &v.to_string())
            .map(Big::from_f64)
            .map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Big, E> {
        Ok(Big::from_f64(v as f64))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Big, E> {
        if v < 0 {
            return Err(E::custom(ParseBigError::Negative(v.to_string())));
        }
        Ok(Big::from_f64(v as f64))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
