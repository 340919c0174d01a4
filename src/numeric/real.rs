//! Arbitrary-precision dyadic reals: `mantissa * 2^exp`.
//!
//! Addition, subtraction and multiplication of dyadic values are exact;
//! results are rounded explicitly, with a directed mode and an inexactness
//! flag, so the interval layer can fold every rounding error into a radius
//! instead of losing it.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{Float, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

/// Directed rounding mode. `Down` truncates toward zero, `Up` rounds away
/// from zero. For non-negative quantities (radii, error sums) `Up` is the
/// sound direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Round {
    Down,
    Up,
}

/// A dyadic real number with an unbounded mantissa.
///
/// The representation is not unique; equality and ordering compare values,
/// not representations. Constructors and rounding strip trailing zero bits
/// to keep mantissas small.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Real {
    mantissa: BigInt,
    exp: i64,
}

impl Real {
    pub fn zero() -> Self {
        Self::default()
    }

    /// `2^exp`.
    pub fn pow2(exp: i64) -> Self {
        Real {
            mantissa: BigInt::from(1),
            exp,
        }
    }

    pub fn from_i64(value: i64) -> Self {
        Real {
            mantissa: BigInt::from(value),
            exp: 0,
        }
        .normalized()
    }

    /// Exact conversion from a finite `f64`.
    ///
    /// Panics on NaN or infinity; those have no dyadic representation.
    pub fn from_f64(value: f64) -> Self {
        assert!(value.is_finite(), "Real::from_f64 requires a finite value");
        if value == 0.0 {
            return Self::zero();
        }
        let (mantissa, exp, sign) = Float::integer_decode(value);
        let mantissa = BigInt::from(mantissa) * BigInt::from(sign as i64);
        Real {
            mantissa,
            exp: exp as i64,
        }
        .normalized()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.mantissa.sign() == Sign::Minus
    }

    pub fn neg(&self) -> Self {
        Real {
            mantissa: -&self.mantissa,
            exp: self.exp,
        }
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// One unit in the last place of this representation: `2^exp`.
    /// A sound bound on the error introduced by a single rounding that
    /// produced this value.
    pub fn ulp(&self) -> Self {
        Self::pow2(self.exp)
    }

    /// Exact sum.
    pub fn add_exact(&self, rhs: &Real) -> Self {
        if self.is_zero() {
            return rhs.clone();
        }
        if rhs.is_zero() {
            return self.clone();
        }
        let (a, b, exp) = align(self, rhs);
        Real { mantissa: a + b, exp }.normalized()
    }

    /// Exact difference.
    pub fn sub_exact(&self, rhs: &Real) -> Self {
        self.add_exact(&rhs.neg())
    }

    /// Exact product.
    pub fn mul_exact(&self, rhs: &Real) -> Self {
        Real {
            mantissa: &self.mantissa * &rhs.mantissa,
            exp: self.exp + rhs.exp,
        }
        .normalized()
    }

    /// Rounds to at most `prec` mantissa bits in the given direction.
    /// Returns the rounded value and whether any information was lost.
    pub fn round(&self, prec: u32, dir: Round) -> (Real, bool) {
        let bits = self.mantissa.bits();
        if bits <= prec as u64 {
            return (self.clone(), false);
        }
        let shift = bits - prec as u64;
        let sign = self.mantissa.sign();
        let mag = self.mantissa.magnitude();
        let kept: BigUint = mag >> shift;
        let inexact = (&kept << shift) != *mag;
        let kept = if inexact && dir == Round::Up {
            kept + 1u32
        } else {
            kept
        };
        let rounded = Real {
            mantissa: BigInt::from_biguint(sign, kept),
            exp: self.exp + shift as i64,
        };
        (rounded.normalized(), inexact)
    }

    /// Exact sum rounded to `prec` bits.
    pub fn add_round(&self, rhs: &Real, prec: u32, dir: Round) -> Real {
        self.add_exact(rhs).round(prec, dir).0
    }

    /// Quotient rounded to `prec` bits in the given direction.
    /// Returns the quotient and whether it is inexact.
    ///
    /// Panics if `rhs` is zero; interval-level code guards divisions with
    /// a zero-containment test before reaching this point.
    pub fn div_round(&self, rhs: &Real, prec: u32, dir: Round) -> (Real, bool) {
        assert!(!rhs.is_zero(), "Real::div_round: division by zero");
        if self.is_zero() {
            return (Self::zero(), false);
        }
        let nb = self.mantissa.bits() as i64;
        let db = rhs.mantissa.bits() as i64;
        // Scale the numerator so the integer quotient carries at least
        // prec + 2 significant bits.
        let scale = (prec as i64 + 2 + db - nb).max(0) as u64;
        let num: BigUint = self.mantissa.magnitude() << scale;
        let den = rhs.mantissa.magnitude();
        let q = &num / den;
        let rem = &num % den;
        let mut inexact = !rem.is_zero();

        let mut exp = self.exp - rhs.exp - scale as i64;
        let bits = q.bits();
        let q = if bits > prec as u64 {
            let shift = bits - prec as u64;
            let kept: BigUint = &q >> shift;
            if (&kept << shift) != q {
                inexact = true;
            }
            exp += shift as i64;
            kept
        } else {
            q
        };
        let q = if inexact && dir == Round::Up {
            q + 1u32
        } else {
            q
        };

        let sign = if self.mantissa.sign() == rhs.mantissa.sign() {
            Sign::Plus
        } else {
            Sign::Minus
        };
        let quotient = Real {
            mantissa: BigInt::from_biguint(sign, q),
            exp,
        };
        (quotient.normalized(), inexact)
    }

    /// Compares absolute values.
    pub fn cmp_abs(&self, other: &Real) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => cmp_magnitudes(self, other),
        }
    }

    /// Nearest-`f64` approximation, for display and tests only.
    pub fn to_f64(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        let bits = self.mantissa.bits();
        let shift = bits.saturating_sub(53);
        let top: BigUint = self.mantissa.magnitude() >> shift;
        let mut value = top.to_f64().unwrap_or(f64::MAX);
        let exp = (self.exp + shift as i64).clamp(-1100, 1100) as i32;
        value *= 2f64.powi(exp);
        if self.is_negative() {
            -value
        } else {
            value
        }
    }

    fn normalized(mut self) -> Self {
        match self.mantissa.trailing_zeros() {
            None => {
                // Canonical zero.
                self.exp = 0;
                self
            }
            Some(0) => self,
            Some(tz) => {
                self.mantissa >>= tz;
                self.exp += tz as i64;
                self
            }
        }
    }
}

/// Brings two nonzero values to a common exponent. The shift is bounded by
/// the operands' exponent gap, which in rounded computations stays within
/// the working dynamic range.
fn align(a: &Real, b: &Real) -> (BigInt, BigInt, i64) {
    if a.exp >= b.exp {
        let shift = (a.exp - b.exp) as u64;
        (&a.mantissa << shift, b.mantissa.clone(), b.exp)
    } else {
        let shift = (b.exp - a.exp) as u64;
        (a.mantissa.clone(), &b.mantissa << shift, a.exp)
    }
}

/// Magnitude comparison of two nonzero values.
fn cmp_magnitudes(a: &Real, b: &Real) -> Ordering {
    // Compare most-significant-bit positions first to avoid aligning
    // mantissas with wildly different exponents.
    let pos_a = a.exp + a.mantissa.bits() as i64;
    let pos_b = b.exp + b.mantissa.bits() as i64;
    match pos_a.cmp(&pos_b) {
        Ordering::Equal => {}
        other => return other,
    }
    if a.exp >= b.exp {
        let shifted: BigUint = a.mantissa.magnitude() << (a.exp - b.exp) as u64;
        shifted.cmp(b.mantissa.magnitude())
    } else {
        let shifted: BigUint = b.mantissa.magnitude() << (b.exp - a.exp) as u64;
        a.mantissa.magnitude().cmp(&shifted)
    }
}

impl PartialEq for Real {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Real {}

impl PartialOrd for Real {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Real {
    fn cmp(&self, other: &Self) -> Ordering {
        use Sign::*;
        match (self.mantissa.sign(), other.mantissa.sign()) {
            (NoSign, NoSign) => Ordering::Equal,
            (NoSign, Plus) | (Minus, NoSign) | (Minus, Plus) => Ordering::Less,
            (NoSign, Minus) | (Plus, NoSign) | (Plus, Minus) => Ordering::Greater,
            (Plus, Plus) => cmp_magnitudes(self, other),
            (Minus, Minus) => cmp_magnitudes(other, self),
        }
    }
}

impl Add for &Real {
    type Output = Real;
    fn add(self, rhs: &Real) -> Real {
        self.add_exact(rhs)
    }
}

impl Sub for &Real {
    type Output = Real;
    fn sub(self, rhs: &Real) -> Real {
        self.sub_exact(rhs)
    }
}

impl Mul for &Real {
    type Output = Real;
    fn mul(self, rhs: &Real) -> Real {
        self.mul_exact(rhs)
    }
}

impl Neg for &Real {
    type Output = Real;
    fn neg(self) -> Real {
        Real::neg(self)
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}
