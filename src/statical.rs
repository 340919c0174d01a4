//! The statical engine: closed-form backward adjoint propagation over a
//! completed Gaussian-elimination trace.
//!
//! Where the tape replays recorded commands one by one, this engine knows
//! the elimination schedule in advance and walks it in reverse directly
//! on the matrix, undoing each row update while accumulating the adjoints
//! of the initial entries in `da`.

use crate::error::Result;
use crate::linalg::Matrix;
use crate::numeric::{Interval, Real, Round};
use crate::precision::precision;

/// Improved radius from the adjoints: Σ |da[i,j]| · error(a[i,j]),
/// collapsed to midpoint plus radius, rounded away from zero.
pub fn compute_error(a: &Matrix<Interval>, da: &Matrix<Interval>) -> Real {
    let mut acc = Interval::zero();
    for i in 0..a.nrow() {
        for j in 0..a.ncol() {
            let dval = da.at(i, j).abs();
            let err = Interval::exact(a.at(i, j).error());
            acc = Interval::add(&acc, &Interval::mul(&dval, &err));
        }
    }
    acc.val().add_round(&acc.error(), precision(), Round::Up).abs()
}

/// Propagates adjoints backwards through the elimination trace.
///
/// `a` is the eliminated matrix with the row multipliers stored in the
/// eliminated positions; it is consumed because each step restores it one
/// update closer to the initial matrix. `da` arrives seeded with the
/// adjoints of the final quantity with respect to the eliminated entries
/// and leaves holding the adjoints with respect to the initial entries.
pub fn gauss_inverse(mut a: Matrix<Interval>, da: &mut Matrix<Interval>) -> Result<()> {
    let n = a.nrow();
    let m = a.ncol();
    if n < 2 {
        return Ok(());
    }

    for i in (0..n - 1).rev() {
        for j in (i + 1..n).rev() {
            let mut dot = Interval::zero();
            for k in i + 1..m {
                dot = Interval::add(&dot, &Interval::mul(da.at(j, k), a.at(i, k)));
            }
            *da.at_mut(j, i) = Interval::sub(da.at(j, i), &dot);

            for k in i + 1..m {
                let t = Interval::mul(da.at(j, k), a.at(j, i));
                *da.at_mut(i, k) = Interval::sub(da.at(i, k), &t);
            }

            for k in i + 1..m {
                let t = Interval::mul(a.at(j, i), a.at(i, k));
                *a.at_mut(j, k) = Interval::add(a.at(j, k), &t);
            }

            let t = Interval::mul(da.at(j, i), a.at(j, i)).try_div(a.at(i, i))?;
            *da.at_mut(i, i) = Interval::sub(da.at(i, i), &t);
            *da.at_mut(j, i) = da.at(j, i).try_div(a.at(i, i))?;

            *a.at_mut(j, i) = Interval::mul(a.at(j, i), a.at(i, i));
        }
    }
    Ok(())
}
