//! Matrix storage and the Gaussian-elimination family of consumers of the
//! instrumented arithmetic: determinants and linear solves, in plain,
//! dynamically improved (tape) and statically improved flavors.

pub mod dets;
pub mod gauss;
pub mod leqs;
pub mod matrix;

pub use matrix::Matrix;

use crate::error::Result;
use crate::numeric::{Interval, Real};
use crate::track::Tracked;

/// The arithmetic seam shared by plain intervals and tracked values, so
/// every elimination routine is written once. The `*_like` constructors
/// take a sibling entry so tracked constants land on the right tape.
pub trait Entry: Clone {
    fn one_like(&self) -> Self;
    fn zero_like(&self) -> Self;
    fn add(&self, rhs: &Self) -> Self;
    fn sub(&self, rhs: &Self) -> Self;
    fn mul(&self, rhs: &Self) -> Self;
    fn try_div(&self, rhs: &Self) -> Result<Self>;
    fn neg(&self) -> Self;
    fn contains_zero(&self) -> bool;
    fn abs_ubound(&self) -> Real;
}

impl Entry for Interval {
    fn one_like(&self) -> Self {
        Interval::from_i64(1)
    }
    fn zero_like(&self) -> Self {
        Interval::zero()
    }
    fn add(&self, rhs: &Self) -> Self {
        Interval::add(self, rhs)
    }
    fn sub(&self, rhs: &Self) -> Self {
        Interval::sub(self, rhs)
    }
    fn mul(&self, rhs: &Self) -> Self {
        Interval::mul(self, rhs)
    }
    fn try_div(&self, rhs: &Self) -> Result<Self> {
        Interval::try_div(self, rhs)
    }
    fn neg(&self) -> Self {
        Interval::neg(self)
    }
    fn contains_zero(&self) -> bool {
        Interval::contains_zero(self)
    }
    fn abs_ubound(&self) -> Real {
        Interval::abs_ubound(self)
    }
}

impl Entry for Tracked {
    fn one_like(&self) -> Self {
        Tracked::new(self.tape(), Interval::from_i64(1))
    }
    fn zero_like(&self) -> Self {
        Tracked::new(self.tape(), Interval::zero())
    }
    fn add(&self, rhs: &Self) -> Self {
        self + rhs
    }
    fn sub(&self, rhs: &Self) -> Self {
        self - rhs
    }
    fn mul(&self, rhs: &Self) -> Self {
        self * rhs
    }
    fn try_div(&self, rhs: &Self) -> Result<Self> {
        Tracked::try_div(self, rhs)
    }
    fn neg(&self) -> Self {
        -self
    }
    fn contains_zero(&self) -> bool {
        self.value().contains_zero()
    }
    fn abs_ubound(&self) -> Real {
        self.value().abs_ubound()
    }
}
