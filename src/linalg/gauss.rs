//! Gaussian elimination over any [`Entry`] type.
//!
//! Elimination stores the row multiplier in the eliminated position, so
//! the resulting matrix carries the full trace the statical engine needs.

use super::{Entry, Matrix};
use crate::error::{Error, Result};

/// The pivot row for column `c` among rows `r..`: the row with the largest
/// absolute upper bound whose entry cannot contain zero. `None` when every
/// candidate may contain zero, in which case elimination cannot proceed.
pub fn find_pivot<T: Entry>(matrix: &Matrix<T>, r: usize, c: usize) -> Option<usize> {
    let mut best: Option<usize> = None;
    for i in r..matrix.nrow() {
        if matrix.at(i, c).contains_zero() {
            continue;
        }
        match best {
            None => best = Some(i),
            Some(b) => {
                if matrix.at(i, c).abs_ubound() > matrix.at(b, c).abs_ubound() {
                    best = Some(i);
                }
            }
        }
    }
    best
}

/// In-place elimination without pivoting. A pivot whose interval may
/// contain zero surfaces as a domain error from the division.
pub fn gauss_elimination<T: Entry>(matrix: &mut Matrix<T>) -> Result<()> {
    let n = matrix.nrow();
    let m = matrix.ncol();
    for i in 0..n {
        for j in i + 1..n {
            let z = matrix.at(j, i).try_div(matrix.at(i, i))?;
            *matrix.at_mut(j, i) = z.clone();
            for k in i + 1..m {
                let t = z.mul(matrix.at(i, k));
                *matrix.at_mut(j, k) = matrix.at(j, k).sub(&t);
            }
        }
    }
    Ok(())
}

/// In-place elimination with pivoting. Returns `(-1)^permutations`.
pub fn gauss_elimination_pivot<T: Entry>(matrix: &mut Matrix<T>) -> Result<i32> {
    let n = matrix.nrow();
    let m = matrix.ncol();
    let mut sign = 1;
    for i in 0..n {
        let r = find_pivot(matrix, i, i).ok_or(Error::DivisorContainsZero)?;
        if r != i {
            matrix.swap_rows(i, r);
            sign = -sign;
        }
        for j in i + 1..n {
            let z = matrix.at(j, i).try_div(matrix.at(i, i))?;
            *matrix.at_mut(j, i) = z.clone();
            for k in i + 1..m {
                let t = z.mul(matrix.at(i, k));
                *matrix.at_mut(j, k) = matrix.at(j, k).sub(&t);
            }
        }
    }
    Ok(sign)
}
