//! Linear-system solves on an augmented `n x (n+1)` matrix: plain
//! elimination plus back substitution, the dynamic (tape) improvement with
//! one sink per solution entry, and the statical per-column improvement.

use super::gauss::gauss_elimination;
use super::{Entry, Matrix};
use crate::error::{Error, Result};
use crate::numeric::Interval;
use crate::statical::{compute_error, gauss_inverse};
use crate::track::{new_tape, Tracked, TrackedResult};

fn check_augmented<T>(m: &Matrix<T>) -> Result<usize> {
    let n = m.nrow();
    if n == 0 || m.ncol() != n + 1 {
        return Err(Error::precondition(
            "linear solve requires a non-empty augmented n x (n+1) matrix",
        ));
    }
    Ok(n)
}

/// Solves `Ax = b` on the augmented matrix `[A|b]` by Gaussian elimination
/// and back substitution. The matrix is left in eliminated form.
pub fn linear_solve<T: Entry>(m: &mut Matrix<T>) -> Result<Vec<T>> {
    let n = check_augmented(m)?;
    gauss_elimination(m)?;

    let mut xs = vec![m.at(0, 0).zero_like(); n];
    for i in (0..n).rev() {
        let mut x = m.at(i, n).clone();
        for j in i + 1..n {
            x = x.sub(&m.at(i, j).mul(&xs[j]));
        }
        xs[i] = x.try_div(m.at(i, i))?;
    }
    Ok(xs)
}

/// Solves the system on the dynamic engine: every entry becomes a tracked
/// value on a fresh tape, and each solution entry is resolved as its own
/// output against the shared recording.
pub fn linear_solve_tracked(m: &Matrix<Interval>) -> Result<Vec<TrackedResult>> {
    check_augmented(m)?;
    let tape = new_tape();
    let mut tracked = m.map(|x| Tracked::new(&tape, x.clone()));
    tape.borrow_mut().init()?;

    let xs = linear_solve(&mut tracked)?;
    xs.iter().map(TrackedResult::resolve).collect()
}

/// Solves the system with the statically improved error bound.
///
/// For each solution entry the back-substitution adjoints are seeded over
/// the eliminated matrix, propagated back through the trace by
/// [`gauss_inverse`], and collapsed against the declared entry errors.
pub fn linear_solve_improved(m: &Matrix<Interval>) -> Result<Vec<Interval>> {
    let n = check_augmented(m)?;
    let w = m.ncol();

    let init = m.clone();
    let mut elim = m.clone();
    let mut xs = linear_solve(&mut elim)?;
    if n == 1 {
        return Ok(xs);
    }

    for c in 0..n {
        let f = xs[c].clone();
        let mut dm = Matrix::filled(n, w, Interval::zero());
        let df = Interval::from_i64(1);

        for i in c..n {
            let mut t = Interval::mul(&xs[i], elim.at(i, i));
            let mut dt = df.try_div(elim.at(i, i))?;
            let pivot_adj = Interval::mul(&f, &df).try_div(elim.at(i, i))?;
            *dm.at_mut(i, i) = Interval::sub(dm.at(i, i), &pivot_adj);

            for j in (i + 1..n).rev() {
                let z = Interval::mul(elim.at(i, j), &xs[j]);
                t = Interval::add(&t, &z);
                *dm.at_mut(i, j) = Interval::add(dm.at(i, j), &Interval::mul(&t, &dt));
                dt = Interval::add(&dt, &Interval::mul(elim.at(i, j), &dt));
            }
            *dm.at_mut(i, n) = Interval::add(dm.at(i, n), &dt);
        }

        gauss_inverse(elim.clone(), &mut dm)?;
        xs[c] = Interval::from_parts(f.val(), compute_error(&init, &dm));
    }
    Ok(xs)
}
