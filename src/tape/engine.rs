//! The tape: slot storage, the recorded command sequence, and the reverse
//! replay that turns both into an improved error bound.

use tracing::trace;

use super::command::{Addr, Command, OpKind};
use crate::error::{Error, Result};
use crate::numeric::{Interval, Real, Round};
use crate::precision::precision;

/// Lifecycle state. The required order is
/// `register inputs -> init -> record operations -> evaluate (once)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Accepting primary input registrations.
    Recording,
    /// `init` has run; operations may be recorded.
    Primed,
    /// `evaluate` has consumed the tape. Only `restore` (or a fresh round
    /// of registrations) makes it usable again.
    Consumed,
}

/// A tape of interval slots and reverse-step commands.
///
/// The tape is owned by the caller and passed explicitly (by handle) into
/// every tracked value; there is no process-wide instance. It is not
/// synchronized: use one tape per thread.
#[derive(Debug)]
pub struct Tape {
    slots: Vec<Interval>,
    commands: Vec<Command>,
    adjoint: Interval,
    phase: Phase,
    generation: u64,
}

/// A full copy of a tape's recorded state, restorable atomically. Lets
/// several outputs evaluate against one shared history: evaluate consumes
/// the tape, restoring brings the history back.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    slots: Vec<Interval>,
    commands: Vec<Command>,
    phase: Phase,
    generation: u64,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    pub fn new() -> Self {
        Tape {
            slots: Vec::new(),
            commands: Vec::new(),
            adjoint: Interval::zero(),
            phase: Phase::Recording,
            generation: 0,
        }
    }

    /// Number of registered slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bumped every time `evaluate` clears the tape. Tracked values carry
    /// the generation they were created under; a mismatch means a stale
    /// address.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The recorded command sequence, for inspection.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Forward value currently held in a slot.
    pub fn slot(&self, addr: Addr) -> Option<&Interval> {
        self.slots.get(addr)
    }

    /// Appends a value slot and returns its address.
    ///
    /// Before `init` this declares a primary input whose radius will seed
    /// the reverse pass. After `init` it declares an exact constant whose
    /// own error is not injected. Registering on a consumed tape begins a
    /// fresh recording.
    pub fn register_value(&mut self, value: Interval) -> Addr {
        if self.phase == Phase::Consumed {
            self.phase = Phase::Recording;
        }
        self.slots.push(value);
        self.slots.len() - 1
    }

    /// Records one elementary operation: computes the forward result,
    /// registers it as a new slot, and appends its reverse steps.
    pub fn record_binary_op(&mut self, op: OpKind, a: Addr, b: Addr) -> Result<(Interval, Addr)> {
        if self.phase != Phase::Primed {
            return Err(Error::precondition(
                "record_binary_op requires init to have run (register inputs, then init, then compute)",
            ));
        }
        self.check_addr(a)?;
        self.check_addr(b)?;

        let forward = op.apply(&self.slots[a], &self.slots[b])?;
        let result = self.slots.len();
        let steps = op.reverse_steps(a, b, &self.slots[a], &self.slots[b], result)?;
        self.slots.push(forward.clone());
        self.commands.extend(steps);
        Ok((forward, result))
    }

    /// Seeds the reverse pass: exactly once, after every primary input is
    /// registered and before any operation.
    ///
    /// For each primary slot the sequence injects that slot's *declared*
    /// radius (not its current value) into the accumulation exactly once
    /// and zeroes the slot immediately after use, so later `Corr` steps
    /// only accumulate legitimately attributed contributions. The first
    /// and last slots sit at the boundary of the chain and take
    /// single-sided treatment; interior slots are uniform.
    pub fn init(&mut self) -> Result<()> {
        match self.phase {
            Phase::Primed => return Err(Error::precondition("init called twice")),
            Phase::Consumed => {
                return Err(Error::precondition(
                    "init on a consumed tape; restore a checkpoint first",
                ))
            }
            Phase::Recording => {}
        }
        if self.slots.is_empty() {
            return Err(Error::precondition("init on an empty tape"));
        }

        let last = self.slots.len() - 1;
        let one = Interval::from_i64(1);

        // Downward accumulation chain: corr 0, then inull/corr pairs for
        // the interior slots.
        self.commands.push(Command::Corr {
            addr: 0,
            coeff: one.clone(),
        });
        for addr in 1..last {
            self.commands.push(Command::INull { addr });
            self.commands.push(Command::Corr {
                addr,
                coeff: one.clone(),
            });
        }

        // Error injection, last slot first.
        self.commands.push(Command::INull { addr: last });
        self.commands.push(Command::Corr {
            addr: last,
            coeff: Interval::exact(self.slots[last].error()),
        });
        self.commands.push(Command::INull { addr: last });
        for i in 1..=last {
            let addr = last - i;
            self.commands.push(Command::Corr {
                addr,
                coeff: Interval::exact(self.slots[addr].error()),
            });
            self.commands.push(Command::INull { addr });
        }

        self.phase = Phase::Primed;
        Ok(())
    }

    /// Replays the tape against its most recently registered slot.
    pub fn evaluate(&mut self) -> Result<Interval> {
        if self.slots.is_empty() {
            return self.evaluate_at(0); // uniform precondition reporting
        }
        self.evaluate_at(self.slots.len() - 1)
    }

    /// Replays every recorded command in strict reverse order, seeding the
    /// adjoint at `target`, and returns `target`'s original midpoint with
    /// the accumulated error bound as radius.
    ///
    /// Commands recorded *after* `target`'s expression replay as no-ops
    /// (every non-target slot starts at zero), so any registered slot is a
    /// valid target regardless of what was recorded later.
    ///
    /// Single-shot: the tape is cleared and its generation bumped.
    pub fn evaluate_at(&mut self, target: Addr) -> Result<Interval> {
        match self.phase {
            Phase::Recording => return Err(Error::precondition("evaluate before init")),
            Phase::Consumed => {
                return Err(Error::precondition(
                    "evaluate on a consumed tape; restore a checkpoint or register a new computation",
                ))
            }
            Phase::Primed => {}
        }
        self.check_addr(target)?;

        let original = self.slots[target].clone();

        for slot in &mut self.slots {
            slot.set_zero();
        }
        self.slots[target] = Interval::from_i64(1);
        self.adjoint = Interval::zero();

        let commands = std::mem::take(&mut self.commands);
        for command in commands.iter().rev() {
            self.step(command);
        }

        // The accumulated linear combination of input errors sits in slot
        // 0; its own radius covers the rounding of the accumulation.
        let accumulated = &self.slots[0];
        let radius = accumulated
            .val()
            .add_round(&accumulated.error(), precision(), Round::Up);
        let result = Interval::from_parts(original.val(), radius);

        self.slots.clear();
        self.adjoint = Interval::zero();
        self.phase = Phase::Consumed;
        self.generation += 1;
        Ok(result)
    }

    fn step(&mut self, command: &Command) {
        match command {
            Command::Corr { addr, coeff } => {
                trace!(target: "aposteriori::tape", addr, coeff = %coeff, adjoint = %self.adjoint, "corr");
                self.slots[*addr] = self.slots[*addr].add(&coeff.mul(&self.adjoint));
            }
            Command::Null { addr } => {
                trace!(target: "aposteriori::tape", addr, adjoint = %self.slots[*addr], "null");
                self.adjoint = self.slots[*addr].clone();
                self.slots[*addr].set_zero();
            }
            Command::INull { addr } => {
                trace!(target: "aposteriori::tape", addr, adjoint = %self.slots[*addr], "inull");
                self.adjoint = self.slots[*addr].abs();
                self.slots[*addr].set_zero();
            }
        }
    }

    /// Saves the full recorded state as a value.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            slots: self.slots.clone(),
            commands: self.commands.clone(),
            phase: self.phase,
            generation: self.generation,
        }
    }

    /// Restores a previously saved state, including the generation, so
    /// tracked values created before the checkpoint remain addressable.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.slots = checkpoint.slots;
        self.commands = checkpoint.commands;
        self.phase = checkpoint.phase;
        self.generation = checkpoint.generation;
        self.adjoint = Interval::zero();
    }

    fn check_addr(&self, addr: Addr) -> Result<()> {
        if addr >= self.slots.len() {
            return Err(Error::precondition(format!(
                "address {} out of range for a tape of {} slots (stale or foreign address)",
                addr,
                self.slots.len()
            )));
        }
        Ok(())
    }
}
