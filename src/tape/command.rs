//! Reverse-step commands and the operator derivative table.
//!
//! Commands are plain data interpreted by the tape's replay loop, so a
//! recorded sequence can be inspected (and serialized) independently of
//! execution.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::error::Result;
use crate::numeric::Interval;

/// Index of a slot on one tape. Addresses are assigned at registration and
/// never reused within a tape generation.
pub type Addr = usize;

/// The elementary operators the tape can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpKind {
    Add,
    Sub,
    Mul,
    Div,
}

/// One reverse step. During replay (strict reverse order of recording),
/// with `s` the current adjoint:
///
/// - `Corr`: `slot[addr] += coeff * s`
/// - `Null`: `s = slot[addr]; slot[addr] = 0`
/// - `INull`: `s = |slot[addr]|; slot[addr] = 0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Corr { addr: Addr, coeff: Interval },
    Null { addr: Addr },
    INull { addr: Addr },
}

impl Command {
    pub fn addr(&self) -> Addr {
        match self {
            Command::Corr { addr, .. } | Command::Null { addr } | Command::INull { addr } => *addr,
        }
    }
}

impl OpKind {
    /// Forward interval result. Division propagates the domain error for a
    /// zero-containing divisor.
    pub fn apply(self, a: &Interval, b: &Interval) -> Result<Interval> {
        match self {
            OpKind::Add => Ok(a.add(b)),
            OpKind::Sub => Ok(a.sub(b)),
            OpKind::Mul => Ok(a.mul(b)),
            OpKind::Div => a.try_div(b),
        }
    }

    /// The reverse steps for one recorded operation: a `Corr` per operand
    /// carrying its partial derivative, then a `Null` that hands the
    /// adjoint over to the result slot. Derivatives that depend on operand
    /// values (`Mul`, `Div`) capture them at recording time.
    pub fn reverse_steps(
        self,
        a: Addr,
        b: Addr,
        va: &Interval,
        vb: &Interval,
        result: Addr,
    ) -> Result<SmallVec<[Command; 3]>> {
        let one = Interval::from_i64(1);
        // (d/da, d/db)
        let (da, db) = match self {
            OpKind::Add => (one.clone(), one),
            OpKind::Sub => (one, Interval::from_i64(-1)),
            OpKind::Mul => (vb.clone(), va.clone()),
            OpKind::Div => {
                let da = one.try_div(vb)?;
                let db = va.neg().try_div(vb)?.try_div(vb)?;
                (da, db)
            }
        };
        Ok(smallvec![
            Command::Corr { addr: b, coeff: db },
            Command::Corr { addr: a, coeff: da },
            Command::Null { addr: result },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::numeric::Real;
    use rstest::rstest;

    fn coeff_of(cmd: &Command) -> &Interval {
        match cmd {
            Command::Corr { coeff, .. } => coeff,
            other => panic!("expected Corr, got {:?}", other),
        }
    }

    #[rstest]
    #[case(OpKind::Add, 1.0, 1.0)]
    #[case(OpKind::Sub, 1.0, -1.0)]
    // For va = 3, vb = 2: d/da = vb, d/db = va (mul); 1/vb, -va/vb^2 (div).
    #[case(OpKind::Mul, 2.0, 3.0)]
    #[case(OpKind::Div, 0.5, -0.75)]
    fn test_derivative_table(#[case] op: OpKind, #[case] expect_da: f64, #[case] expect_db: f64) {
        let va = Interval::from_f64(3.0);
        let vb = Interval::from_f64(2.0);
        let steps = op.reverse_steps(0, 1, &va, &vb, 2).unwrap();
        assert_eq!(steps.len(), 3);
        // Recording order: corr(b), corr(a), null(result).
        assert_eq!(steps[0].addr(), 1);
        assert_eq!(coeff_of(&steps[0]).val(), Real::from_f64(expect_db));
        assert_eq!(steps[1].addr(), 0);
        assert_eq!(coeff_of(&steps[1]).val(), Real::from_f64(expect_da));
        assert_eq!(steps[2], Command::Null { addr: 2 });
    }

    #[test]
    fn test_div_steps_fail_on_zero_containing_divisor() {
        let va = Interval::from_f64(1.0);
        let vb = Interval::with_radius(0.25, 0.5);
        let err = OpKind::Div.reverse_steps(0, 1, &va, &vb, 2).unwrap_err();
        assert_eq!(err, Error::DivisorContainsZero);
    }

    #[test]
    fn test_apply_matches_interval_arithmetic() {
        let a = Interval::with_radius(6.0, 0.5);
        let b = Interval::with_radius(2.0, 0.25);
        assert_eq!(OpKind::Add.apply(&a, &b).unwrap(), a.add(&b));
        assert_eq!(OpKind::Sub.apply(&a, &b).unwrap(), a.sub(&b));
        assert_eq!(OpKind::Mul.apply(&a, &b).unwrap(), a.mul(&b));
        assert_eq!(
            OpKind::Div.apply(&a, &b).unwrap(),
            a.try_div(&b).unwrap()
        );
    }

    #[test]
    fn test_commands_serialize_for_inspection() {
        let cmds = vec![
            Command::Corr {
                addr: 1,
                coeff: Interval::from_i64(1),
            },
            Command::INull { addr: 0 },
        ];
        let json = serde_json::to_string(&cmds).unwrap();
        let back: Vec<Command> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmds);
    }
}
