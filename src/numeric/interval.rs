//! Midpoint-radius intervals over [`Real`].
//!
//! An `Interval` stands for every real within `rad` of `mid`. Midpoints
//! are rounded toward zero at the working precision and the rounding error
//! is folded into the radius; radius arithmetic always rounds up. The
//! enclosure is therefore sound at any precision, only its tightness
//! depends on the bit count.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use super::real::{Real, Round};
use crate::error::{Error, Result};
use crate::precision::precision;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    mid: Real,
    rad: Real,
}

impl Interval {
    pub fn zero() -> Self {
        Self::default()
    }

    /// An interval with the given midpoint and radius. The radius is taken
    /// by absolute value, keeping the `rad >= 0` invariant unconditional.
    pub fn from_parts(mid: Real, rad: Real) -> Self {
        Interval {
            mid,
            rad: rad.abs(),
        }
    }

    /// A point interval (radius zero).
    pub fn exact(mid: Real) -> Self {
        Interval {
            mid,
            rad: Real::zero(),
        }
    }

    pub fn from_f64(mid: f64) -> Self {
        Self::exact(Real::from_f64(mid))
    }

    pub fn with_radius(mid: f64, rad: f64) -> Self {
        Self::from_parts(Real::from_f64(mid), Real::from_f64(rad))
    }

    pub fn from_i64(mid: i64) -> Self {
        Self::exact(Real::from_i64(mid))
    }

    /// Midpoint.
    pub fn val(&self) -> Real {
        self.mid.clone()
    }

    /// Radius.
    pub fn error(&self) -> Real {
        self.rad.clone()
    }

    pub fn set_zero(&mut self) {
        *self = Self::zero();
    }

    /// `|x|` in the arb sense: the midpoint's absolute value with the
    /// radius unchanged.
    pub fn abs(&self) -> Self {
        Interval {
            mid: self.mid.abs(),
            rad: self.rad.clone(),
        }
    }

    pub fn neg(&self) -> Self {
        Interval {
            mid: self.mid.neg(),
            rad: self.rad.clone(),
        }
    }

    /// True when the enclosure admits zero, i.e. `|mid| <= rad`.
    pub fn contains_zero(&self) -> bool {
        self.mid.cmp_abs(&self.rad) != Ordering::Greater
    }

    /// Upper bound of `|x|` over the enclosure, rounded up.
    pub fn abs_ubound(&self) -> Real {
        self.mid
            .abs()
            .add_exact(&self.rad)
            .round(precision(), Round::Up)
            .0
    }

    /// Lower bound of `|x|` over the enclosure, rounded down. Zero when
    /// the interval contains zero.
    pub fn abs_lbound(&self) -> Real {
        let lo = self.mid.abs().sub_exact(&self.rad);
        if lo.is_negative() {
            Real::zero()
        } else {
            lo.round(precision(), Round::Down).0
        }
    }

    pub fn add(&self, rhs: &Interval) -> Self {
        let p = precision();
        let (mid, inexact) = self.mid.add_exact(&rhs.mid).round(p, Round::Down);
        let mut rad = self.rad.add_exact(&rhs.rad);
        if inexact {
            rad = rad.add_exact(&mid.ulp());
        }
        Interval {
            rad: rad.round(p, Round::Up).0,
            mid,
        }
    }

    pub fn sub(&self, rhs: &Interval) -> Self {
        self.add(&rhs.neg())
    }

    pub fn mul(&self, rhs: &Interval) -> Self {
        let p = precision();
        let (mid, inexact) = self.mid.mul_exact(&rhs.mid).round(p, Round::Down);
        // |a| rb + |b| ra + ra rb, all exact before the final rounding.
        let mut rad = self
            .mid
            .abs()
            .mul_exact(&rhs.rad)
            .add_exact(&rhs.mid.abs().mul_exact(&self.rad))
            .add_exact(&self.rad.mul_exact(&rhs.rad));
        if inexact {
            rad = rad.add_exact(&mid.ulp());
        }
        Interval {
            rad: rad.round(p, Round::Up).0,
            mid,
        }
    }

    /// Quotient. Fails when the divisor may contain zero: no quotient
    /// enclosure exists in that case and the caller must treat it as a
    /// domain error, not retry.
    pub fn try_div(&self, rhs: &Interval) -> Result<Self> {
        if rhs.contains_zero() {
            return Err(Error::DivisorContainsZero);
        }
        Ok(self.mul(&rhs.inv()))
    }

    /// Reciprocal of an interval known not to contain zero.
    ///
    /// For `|m| > r >= 0` the exact range of `1/x` lies within
    /// `1/m ± r / (m (m - r))` (signs handled on the midpoint).
    fn inv(&self) -> Self {
        let p = precision();
        let m = self.mid.abs();
        let one = Real::from_i64(1);
        let (recip, inexact) = one.div_round(&m, p, Round::Down);
        let den = m.mul_exact(&m.sub_exact(&self.rad));
        let (mut rad, _) = self.rad.div_round(&den, p, Round::Up);
        if inexact {
            rad = rad.add_exact(&recip.ulp()).round(p, Round::Up).0;
        }
        let mid = if self.mid.is_negative() {
            recip.neg()
        } else {
            recip
        };
        Interval { mid, rad }
    }
}

impl Add for &Interval {
    type Output = Interval;
    fn add(self, rhs: &Interval) -> Interval {
        Interval::add(self, rhs)
    }
}

impl Sub for &Interval {
    type Output = Interval;
    fn sub(self, rhs: &Interval) -> Interval {
        Interval::sub(self, rhs)
    }
}

impl Mul for &Interval {
    type Output = Interval;
    fn mul(self, rhs: &Interval) -> Interval {
        Interval::mul(self, rhs)
    }
}

impl Neg for &Interval {
    type Output = Interval;
    fn neg(self) -> Interval {
        Interval::neg(self)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} +/- {}]", self.mid.to_f64(), self.rad.to_f64())
    }
}
