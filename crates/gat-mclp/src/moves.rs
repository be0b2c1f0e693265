//! The shared move set: close, open, swap (§4.1).
//!
//! Evaluators are pure functions of `(&Instance, &SolutionState)`; appliers
//! mutate a `&mut SolutionState` to match. Every customer touched by a move
//! is reached transitively through [`Instance::covered_by`], so each
//! evaluator/applier pair costs `O(|coveredBy[i]|)` (Glossary: Δobj).

use crate::instance::{CustomerId, FacilityId, Instance};
use crate::solution::SolutionState;

/// One atomic state transition drawn from the move set (Design Notes §9:
/// "tagged variant" in preference to ad-hoc tuples).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Close(FacilityId),
    Open(FacilityId),
    Swap { out: FacilityId, in_: FacilityId },
}

impl Move {
    /// The facilities this move touches — used by the tabu list to decide
    /// which entries to update, and whether the move is tabu.
    pub fn touches(&self) -> (FacilityId, Option<FacilityId>) {
        match *self {
            Move::Close(i) => (i, None),
            Move::Open(j) => (j, None),
            Move::Swap { out, in_ } => (out, Some(in_)),
        }
    }
}

/// The predicted effect of a move, computed without applying it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveEval {
    pub delta: f64,
    pub feasible: bool,
}

impl MoveEval {
    pub(crate) fn infeasible() -> Self {
        MoveEval {
            delta: 0.0,
            feasible: false,
        }
    }
}

/// Acceptance epsilon for "strictly improving" (§4.4).
pub const IMPROVEMENT_EPSILON: f64 = 1e-6;

impl SolutionState {
    /// Δclose(i): always budget-feasible. Loss is the demand of customers
    /// uniquely covered by `i` (Glossary: "Uniquely covered customer").
    pub fn eval_close(&self, instance: &Instance, i: FacilityId) -> MoveEval {
        if !self.is_open(i) {
            return MoveEval::infeasible();
        }
        let loss = uniquely_covered_demand(instance, self, i);
        MoveEval {
            delta: -loss,
            feasible: true,
        }
    }

    /// Δopen(j): feasible iff budget allows. Gain is the demand of customers
    /// newly reached.
    pub fn eval_open(&self, instance: &Instance, j: FacilityId) -> MoveEval {
        if self.is_open(j) {
            return MoveEval::infeasible();
        }
        let cost = instance.cost(j);
        if self.budget_used() + cost > instance.budget() + 1e-9 {
            return MoveEval::infeasible();
        }
        let mut gained = Vec::new();
        for c in instance.covered_by(j).ones() {
            if self.covered_count(CustomerId::new(c)) == 0 {
                gained.push(instance.demand(CustomerId::new(c)));
            }
        }
        MoveEval {
            delta: crate::instance::sum_sorted(&gained),
            feasible: true,
        }
    }

    /// Δswap(i_out, j_in): evaluated in a single pass, not as Δclose + Δopen
    /// — a customer uniquely covered by `i_out` that `j_in` also covers must
    /// count toward the gain, never the loss (§4.1).
    pub fn eval_swap(&self, instance: &Instance, out: FacilityId, in_: FacilityId) -> MoveEval {
        if !self.is_open(out) || self.is_open(in_) {
            return MoveEval::infeasible();
        }
        let cost_diff = instance.cost(in_) - instance.cost(out);
        if self.budget_used() + cost_diff > instance.budget() + 1e-9 {
            return MoveEval::infeasible();
        }

        let loss = uniquely_covered_demand(instance, self, out);

        let covered_by_out = instance.covered_by(out);
        let mut gained = Vec::new();
        for c in instance.covered_by(in_).ones() {
            let count = self.covered_count(CustomerId::new(c));
            if count == 0 || (count == 1 && covered_by_out.contains(c)) {
                gained.push(instance.demand(CustomerId::new(c)));
            }
        }
        let gain = crate::instance::sum_sorted(&gained);

        MoveEval {
            delta: gain - loss,
            feasible: true,
        }
    }

    /// Dispatch to the matching evaluator.
    pub fn eval(&self, instance: &Instance, mv: Move) -> MoveEval {
        match mv {
            Move::Close(i) => self.eval_close(instance, i),
            Move::Open(j) => self.eval_open(instance, j),
            Move::Swap { out, in_ } => self.eval_swap(instance, out, in_),
        }
    }

    /// Close facility `i`, mutating `K`, `budgetUsed`, `coveredCount`,
    /// `covered`, and `objective` in lockstep.
    pub fn apply_close(&mut self, instance: &Instance, i: FacilityId) {
        self.close_without_bookkeeping(instance, i);
        self.record_move();
        self.maybe_resync(instance);
    }

    /// Open facility `j`, mirroring [`Self::apply_close`].
    pub fn apply_open(&mut self, instance: &Instance, j: FacilityId) {
        self.open_without_bookkeeping(instance, j);
        self.record_move();
        self.maybe_resync(instance);
    }

    /// Apply a swap as close-then-open against the same state (§4.1: "Swap
    /// is applied as close-then-open sharing the same state").
    pub fn apply_swap(&mut self, instance: &Instance, out: FacilityId, in_: FacilityId) {
        self.close_without_bookkeeping(instance, out);
        self.open_without_bookkeeping(instance, in_);
        self.record_move();
        self.maybe_resync(instance);
    }

    /// Dispatch to the matching applier.
    pub fn apply(&mut self, instance: &Instance, mv: Move) {
        match mv {
            Move::Close(i) => self.apply_close(instance, i),
            Move::Open(j) => self.apply_open(instance, j),
            Move::Swap { out, in_ } => self.apply_swap(instance, out, in_),
        }
    }

    fn close_without_bookkeeping(&mut self, instance: &Instance, i: FacilityId) {
        self.open_mut().set(i.index(), false);
        self.set_budget_used(self.budget_used() - instance.cost(i));

        for c in instance.covered_by(i).ones().collect::<Vec<_>>() {
            let new_count = self.covered_count(CustomerId::new(c)) - 1;
            self.set_covered_count(CustomerId::new(c), new_count);
            if new_count == 0 {
                self.covered_mut().set(c, false);
                self.add_objective(-instance.demand(CustomerId::new(c)));
            }
        }
    }

    fn open_without_bookkeeping(&mut self, instance: &Instance, j: FacilityId) {
        self.open_mut().set(j.index(), true);
        self.set_budget_used(self.budget_used() + instance.cost(j));

        for c in instance.covered_by(j).ones().collect::<Vec<_>>() {
            if self.covered_count(CustomerId::new(c)) == 0 {
                self.covered_mut().set(c, true);
                self.add_objective(instance.demand(CustomerId::new(c)));
            }
            let new_count = self.covered_count(CustomerId::new(c)) + 1;
            self.set_covered_count(CustomerId::new(c), new_count);
        }
    }
}

/// Demand of customers covered only by `i` (i.e. `coveredCount[j] == 1` and
/// `j ∈ coveredBy[i]`) — the shared inner loop of Δclose and the loss term
/// of Δswap.
fn uniquely_covered_demand(instance: &Instance, state: &SolutionState, i: FacilityId) -> f64 {
    let mut lost = Vec::new();
    for c in instance.covered_by(i).ones() {
        if state.covered_count(CustomerId::new(c)) == 1 {
            lost.push(instance.demand(CustomerId::new(c)));
        }
    }
    crate::instance::sum_sorted(&lost)
}
