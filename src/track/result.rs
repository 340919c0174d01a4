//! Output resolution: replaying the tape for one tracked value and keeping
//! the better of the improved and traditional bounds.

use super::proxy::Tracked;
use crate::error::Result;
use crate::numeric::Interval;

/// One resolved output: the tape-improved interval next to the
/// forward-computed one.
///
/// Resolving checkpoints the tape, replays it at the value's own address,
/// and restores the checkpoint, so several outputs can be resolved against
/// one shared recording in any order.
#[derive(Debug, Clone)]
pub struct TrackedResult {
    improved: Interval,
    direct: Interval,
}

impl TrackedResult {
    pub fn resolve(output: &Tracked) -> Result<Self> {
        let tape = output.tape();
        let saved = tape.borrow().checkpoint();
        let replayed = tape.borrow_mut().evaluate_at(output.addr());
        tape.borrow_mut().restore(saved);
        Ok(TrackedResult {
            improved: replayed?,
            direct: output.value().clone(),
        })
    }

    /// The tape-improved bound.
    pub fn improved(&self) -> &Interval {
        &self.improved
    }

    /// The traditional forward bound.
    pub fn direct(&self) -> &Interval {
        &self.direct
    }

    /// Whichever bound has the smaller radius. The resolved output is
    /// never worse than plain interval arithmetic; the improvement is
    /// first-order, so for large input errors the traditional bound can
    /// win and is kept.
    pub fn interval(&self) -> &Interval {
        if self.improved.error() <= self.direct.error() {
            &self.improved
        } else {
            &self.direct
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::Real;
    use crate::track::proxy::new_tape;

    fn close(x: &Real, expected: f64, tol: f64) -> bool {
        (x.to_f64() - expected).abs() <= tol
    }

    #[test]
    fn test_resolving_a_primary_input_returns_it_unchanged() {
        let tape = new_tape();
        let x = Tracked::new(&tape, Interval::with_radius(1.5, 0.125));
        tape.borrow_mut().init().unwrap();
        let resolved = TrackedResult::resolve(&x).unwrap();
        assert_eq!(resolved.interval().val(), Real::from_f64(1.5));
        assert_eq!(resolved.interval().error(), Real::from_f64(0.125));
    }

    #[test]
    fn test_quotient_chain_never_worse_and_sound() {
        // x2 = x0*x0, x3 = x1*x0, x4 = x3/x2 == x1/x0 up to rounding.
        let tape = new_tape();
        let x0 = Tracked::new(&tape, Interval::with_radius(1.0, 0.01));
        let x1 = Tracked::new(&tape, Interval::with_radius(2.0, 0.03));
        tape.borrow_mut().init().unwrap();

        let x2 = &x0 * &x0;
        let x3 = &x1 * &x0;
        let x4 = x3.try_div(&x2).unwrap();
        let resolved = TrackedResult::resolve(&x4).unwrap();

        // Midpoint matches the forward computation.
        assert!(close(&resolved.interval().val(), 2.0, 1e-9));
        // Never worse than the traditional bound.
        assert!(resolved.interval().error() <= x4.value().error());
        assert!(resolved.improved().error() <= resolved.direct().error());
        // Sound: the true value x1/x0 = 2 lies within the resolved bound.
        let distance = resolved.interval().val().sub_exact(&Real::from_f64(2.0)).abs();
        assert!(distance <= resolved.interval().error());
    }

    #[test]
    fn test_multiple_outputs_share_one_recording() {
        let tape = new_tape();
        let x0 = Tracked::new(&tape, Interval::with_radius(1.0, 0.01));
        let x1 = Tracked::new(&tape, Interval::with_radius(2.0, 0.03));
        tape.borrow_mut().init().unwrap();

        let sum = &x0 + &x1;
        let difference = &x1 - &x0;
        // Resolving in any order works because the output address is
        // explicit; the tape is checkpointed around each replay.
        let resolved_diff = TrackedResult::resolve(&difference).unwrap();
        let resolved_sum = TrackedResult::resolve(&sum).unwrap();

        assert!(close(&resolved_sum.interval().error(), 0.04, 1e-15));
        assert!(close(&resolved_diff.interval().error(), 0.04, 1e-15));
        assert_eq!(resolved_sum.interval().val(), Real::from_f64(3.0));
        assert_eq!(resolved_diff.interval().val(), Real::from_f64(1.0));
    }

    #[test]
    fn test_resolution_keeps_the_tape_usable() {
        let tape = new_tape();
        let x0 = Tracked::new(&tape, Interval::with_radius(2.0, 0.01));
        tape.borrow_mut().init().unwrap();
        let doubled = &x0 + &x0;
        TrackedResult::resolve(&doubled).unwrap();
        // Further arithmetic and a second resolution still work.
        let quadrupled = &doubled + &doubled;
        let resolved = TrackedResult::resolve(&quadrupled).unwrap();
        assert_eq!(resolved.interval().val(), Real::from_f64(8.0));
    }
}
