//! Tracked interval values: every arithmetic operation both computes its
//! forward interval result and records its reverse step on the tape.

use std::cell::RefCell;
use std::ops::{Add, Mul, Neg, Sub};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::numeric::Interval;
use crate::tape::{Addr, OpKind, Tape};

/// Shared handle to the tape a computation records onto. The tape is
/// caller-owned and passed into every tracked value; nothing is global.
pub type TapeHandle = Rc<RefCell<Tape>>;

/// A fresh, empty tape behind a handle.
pub fn new_tape() -> TapeHandle {
    Rc::new(RefCell::new(Tape::new()))
}

/// An interval paired with the tape slot holding it.
///
/// Tracked values are immutable: each operation registers a new slot and
/// returns a new value. `+`, `-`, `*` and unary negation are operators;
/// division is [`Tracked::try_div`] because a zero-containing divisor is a
/// genuine runtime failure, not a caller bug.
///
/// The address is only meaningful for the tape generation the value was
/// created under; once `evaluate` clears the tape the value is stale.
#[derive(Debug, Clone)]
pub struct Tracked {
    tape: TapeHandle,
    value: Interval,
    addr: Addr,
    generation: u64,
}

impl Tracked {
    /// Registers `value` as a slot on `tape`. Before `init` this declares
    /// a primary input; after `init`, an exact constant.
    pub fn new(tape: &TapeHandle, value: Interval) -> Self {
        let mut t = tape.borrow_mut();
        let addr = t.register_value(value.clone());
        let generation = t.generation();
        Tracked {
            tape: Rc::clone(tape),
            value,
            addr,
            generation,
        }
    }

    /// The forward-computed interval (the traditional bound).
    pub fn value(&self) -> &Interval {
        &self.value
    }

    pub fn addr(&self) -> Addr {
        self.addr
    }

    pub fn tape(&self) -> &TapeHandle {
        &self.tape
    }

    /// Records `self op rhs` on the shared tape.
    pub fn binary(&self, rhs: &Tracked, op: OpKind) -> Result<Tracked> {
        assert!(
            Rc::ptr_eq(&self.tape, &rhs.tape),
            "tracked values belong to different tapes"
        );
        let mut tape = self.tape.borrow_mut();
        let generation = tape.generation();
        if self.generation != generation || rhs.generation != generation {
            return Err(Error::precondition(
                "tracked value is stale: its tape generation was cleared by evaluate",
            ));
        }
        let (value, addr) = tape.record_binary_op(op, self.addr, rhs.addr)?;
        Ok(Tracked {
            tape: Rc::clone(&self.tape),
            value,
            addr,
            generation,
        })
    }

    pub fn try_div(&self, rhs: &Tracked) -> Result<Tracked> {
        self.binary(rhs, OpKind::Div)
    }

    /// Operator body for the infallible operations. Add, sub and mul have
    /// no runtime failure mode; any error here is tape misuse, which is
    /// fail-fast by contract.
    fn apply(&self, rhs: &Tracked, op: OpKind) -> Tracked {
        match self.binary(rhs, op) {
            Ok(value) => value,
            Err(e) => panic!("tracked {:?}: {}", op, e),
        }
    }
}

impl Add for &Tracked {
    type Output = Tracked;
    fn add(self, rhs: &Tracked) -> Tracked {
        self.apply(rhs, OpKind::Add)
    }
}

impl Sub for &Tracked {
    type Output = Tracked;
    fn sub(self, rhs: &Tracked) -> Tracked {
        self.apply(rhs, OpKind::Sub)
    }
}

impl Mul for &Tracked {
    type Output = Tracked;
    fn mul(self, rhs: &Tracked) -> Tracked {
        self.apply(rhs, OpKind::Mul)
    }
}

impl Neg for &Tracked {
    type Output = Tracked;
    /// `-x` as `0 - x`, so the negation is itself a recorded operation.
    fn neg(self) -> Tracked {
        let zero = Tracked::new(&self.tape, Interval::zero());
        &zero - self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::Real;

    #[test]
    fn test_construction_registers_slots_in_order() {
        let tape = new_tape();
        let x0 = Tracked::new(&tape, Interval::from_f64(1.0));
        let x1 = Tracked::new(&tape, Interval::from_f64(2.0));
        assert_eq!(x0.addr(), 0);
        assert_eq!(x1.addr(), 1);
        assert_eq!(tape.borrow().len(), 2);
    }

    #[test]
    fn test_operators_record_and_compute() {
        let tape = new_tape();
        let x0 = Tracked::new(&tape, Interval::with_radius(1.0, 0.01));
        let x1 = Tracked::new(&tape, Interval::with_radius(2.0, 0.03));
        tape.borrow_mut().init().unwrap();

        let sum = &x0 + &x1;
        assert_eq!(sum.value().val(), Real::from_f64(3.0));
        assert_eq!(sum.addr(), 2);

        let product = &x0 * &x1;
        assert_eq!(product.value().val(), Real::from_f64(2.0));

        let negated = -&x0;
        assert_eq!(negated.value().val(), Real::from_f64(-1.0));
    }

    #[test]
    fn test_div_by_zero_containing_tracked_value() {
        let tape = new_tape();
        let a = Tracked::new(&tape, Interval::from_f64(1.0));
        let b = Tracked::new(&tape, Interval::with_radius(0.0, 0.5));
        tape.borrow_mut().init().unwrap();
        assert_eq!(a.try_div(&b).unwrap_err(), Error::DivisorContainsZero);
    }

    #[test]
    #[should_panic(expected = "different tapes")]
    fn test_cross_tape_arithmetic_panics() {
        let tape_a = new_tape();
        let tape_b = new_tape();
        let a = Tracked::new(&tape_a, Interval::from_f64(1.0));
        let b = Tracked::new(&tape_b, Interval::from_f64(2.0));
        tape_a.borrow_mut().init().unwrap();
        tape_b.borrow_mut().init().unwrap();
        let _ = &a + &b;
    }

    #[test]
    fn test_stale_generation_is_precondition_violation() {
        let tape = new_tape();
        let a = Tracked::new(&tape, Interval::from_f64(1.0));
        let b = Tracked::new(&tape, Interval::from_f64(2.0));
        tape.borrow_mut().init().unwrap();
        let sum = &a + &b;
        tape.borrow_mut().evaluate().unwrap();
        let err = sum.binary(&a, OpKind::Add).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }
}
