//! Dense row-major matrix storage. Element access only; the algorithms
//! live in `gauss`, `dets` and `leqs`.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    nrow: usize,
    ncol: usize,
    data: Vec<T>,
}

impl<T: Clone> Matrix<T> {
    /// An `nrow x ncol` matrix with every entry set to `value`.
    pub fn filled(nrow: usize, ncol: usize, value: T) -> Self {
        Matrix {
            nrow,
            ncol,
            data: vec![value; nrow * ncol],
        }
    }

    /// Builds from row vectors. Panics on ragged input.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let nrow = rows.len();
        let ncol = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(nrow * ncol);
        for row in rows {
            assert_eq!(row.len(), ncol, "ragged rows");
            data.extend(row);
        }
        Matrix { nrow, ncol, data }
    }
}

impl<T> Matrix<T> {
    #[inline(always)]
    pub fn nrow(&self) -> usize {
        self.nrow
    }

    #[inline(always)]
    pub fn ncol(&self) -> usize {
        self.ncol
    }

    #[inline(always)]
    pub fn at(&self, r: usize, c: usize) -> &T {
        &self.data[r * self.ncol + c]
    }

    #[inline(always)]
    pub fn at_mut(&mut self, r: usize, c: usize) -> &mut T {
        &mut self.data[r * self.ncol + c]
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for c in 0..self.ncol {
            self.data.swap(a * self.ncol + c, b * self.ncol + c);
        }
    }

    /// Entry-wise image under `f`, e.g. lifting an interval matrix into
    /// tracked values on a tape.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Matrix<U> {
        Matrix {
            nrow: self.nrow,
            ncol: self.ncol,
            data: self.data.iter().map(&mut f).collect(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.nrow {
            for c in 0..self.ncol {
                if c > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.at(r, c))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_and_access() {
        let mut m = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(m.nrow(), 2);
        assert_eq!(m.ncol(), 2);
        assert_eq!(*m.at(1, 0), 3);
        *m.at_mut(1, 0) = 7;
        assert_eq!(*m.at(1, 0), 7);
    }

    #[test]
    fn test_swap_rows() {
        let mut m = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]);
        m.swap_rows(0, 1);
        assert_eq!(*m.at(0, 0), 3);
        assert_eq!(*m.at(1, 1), 2);
    }

    #[test]
    fn test_map() {
        let m = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]);
        let doubled = m.map(|x| x * 2);
        assert_eq!(*doubled.at(1, 1), 8);
    }
}
