//! Mutable solution state shared by every search component (§3, §4.1).
//!
//! A [`SolutionState`] owns the open-facility set, the derived coverage-count
//! vector, and the cached objective. It is mutated only through
//! [`crate::moves`]'s applier methods, which keep the five invariants of §3
//! in lockstep. Every ~50 applied moves it resynchronizes its cached
//! objective against a from-scratch recomputation (the drift guard) — see
//! [`SolutionState::maybe_resync`].

use crate::instance::Instance;
use fixedbitset::FixedBitSet;

/// Number of applied moves between drift-guard resynchronizations (§4.1).
const REVALIDATE_INTERVAL: u64 = 50;

/// Numerical tolerance for the drift guard and for objective-consistency
/// assertions (§4.1, §8).
pub const DRIFT_EPSILON: f64 = 1e-4;

/// A cheap, immutable copy of the open-facility set and its objective.
///
/// Returned by every algorithm entry point and used internally as the
/// tabu search's global-best record — never mutated by shake or
/// intensification side effects (Glossary: "Global best snapshot").
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub facilities: FixedBitSet,
    pub objective: f64,
}

impl Snapshot {
    pub fn num_facilities(&self) -> usize {
        self.facilities.count_ones(..)
    }
}

/// The mutable triple `(K, coveredCount, objective)` plus `budgetUsed`,
/// maintained incrementally by [`crate::moves`] and periodically resynced
/// against ground truth.
#[derive(Debug, Clone)]
pub struct SolutionState {
    open: FixedBitSet,
    covered: FixedBitSet,
    covered_count: Vec<u32>,
    budget_used: f64,
    objective: f64,
    move_count: u64,
}

impl SolutionState {
    /// An empty solution state: no facilities open, nothing covered.
    pub fn empty(instance: &Instance) -> Self {
        SolutionState {
            open: FixedBitSet::with_capacity(instance.num_facilities()),
            covered: FixedBitSet::with_capacity(instance.num_customers()),
            covered_count: vec![0; instance.num_customers()],
            budget_used: 0.0,
            objective: 0.0,
            move_count: 0,
        }
    }

    /// Bulk-load a given facility set, recomputing every other field from
    /// scratch (§3, "Lifecycle"). Loading the same set twice is idempotent
    /// (§8, "Idempotence of re-initialization").
    pub fn load(instance: &Instance, facilities: &FixedBitSet) -> Self {
        let mut state = Self::empty(instance);
        state.open = facilities.clone();
        state.open.grow(instance.num_facilities());

        for i in state.open.ones() {
            let covered_by_i = instance.covered_by(crate::instance::FacilityId::new(i));
            for j in covered_by_i.ones() {
                state.covered_count[j] += 1;
                if state.covered_count[j] == 1 {
                    state.covered.insert(j);
                }
            }
        }

        state.budget_used = instance.cost_of(&state.open);
        state.objective = sum_covered_demand(instance, &state.covered);
        state
    }

    pub fn is_open(&self, i: crate::instance::FacilityId) -> bool {
        self.open.contains(i.index())
    }

    pub fn open_facilities(&self) -> &FixedBitSet {
        &self.open
    }

    pub fn covered(&self) -> &FixedBitSet {
        &self.covered
    }

    pub fn covered_count(&self, j: crate::instance::CustomerId) -> u32 {
        self.covered_count[j.index()]
    }

    pub fn budget_used(&self) -> f64 {
        self.budget_used
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn move_count(&self) -> u64 {
        self.move_count
    }

    pub fn remaining_budget(&self, instance: &Instance) -> f64 {
        instance.budget() - self.budget_used
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            facilities: self.open.clone(),
            objective: self.objective,
        }
    }

    pub(crate) fn record_move(&mut self) {
        self.move_count += 1;
    }

    /// Mutable access to `K`, used only by [`crate::moves`]'s appliers.
    pub(crate) fn open_mut(&mut self) -> &mut FixedBitSet {
        &mut self.open
    }

    /// Mutable access to `covered`, used only by [`crate::moves`]'s appliers.
    pub(crate) fn covered_mut(&mut self) -> &mut FixedBitSet {
        &mut self.covered
    }

    pub(crate) fn set_budget_used(&mut self, value: f64) {
        self.budget_used = value;
    }

    pub(crate) fn add_objective(&mut self, delta: f64) {
        self.objective += delta;
    }

    pub(crate) fn set_covered_count(&mut self, j: crate::instance::CustomerId, value: u32) {
        self.covered_count[j.index()] = value;
    }

    /// Called after every applied move. Every [`REVALIDATE_INTERVAL`] moves,
    /// recompute the objective from `covered` and compare against the cached
    /// value; repair silently outside test builds (§4.1, §7 kind 1).
    pub(crate) fn maybe_resync(&mut self, instance: &Instance) {
        if self.move_count % REVALIDATE_INTERVAL != 0 {
            return;
        }
        self.resync(instance);
    }

    /// Force an immediate resynchronization, bypassing the interval check.
    /// Used after a shake, whose moves are not themselves delta-evaluated
    /// (§4.6, "After shake, re-run the drift guard").
    pub fn resync(&mut self, instance: &Instance) {
        let recomputed = sum_covered_demand(instance, &self.covered);
        let drift = (self.objective - recomputed).abs();

        #[cfg(test)]
        {
            assert!(
                drift <= DRIFT_EPSILON,
                "objective drift detected: cached={}, recomputed={}, drift={}",
                self.objective,
                recomputed,
                drift
            );
        }

        if drift > DRIFT_EPSILON {
            tracing::warn!(
                cached = self.objective,
                recomputed,
                drift,
                "objective drift beyond epsilon, resynchronizing"
            );
        }
        self.objective = recomputed;

        #[cfg(test)]
        {
            let (_, recomputed_covered) = instance.compute_coverage(&self.open);
            assert_eq!(
                recomputed_covered, self.covered,
                "covered set diverged from coveredCount-derived set"
            );
        }
    }
}

/// Sum `demand[j]` over `j ∈ covered`, in ascending customer-id order.
pub(crate) fn sum_covered_demand(instance: &Instance, covered: &FixedBitSet) -> f64 {
    crate::instance::sum_sorted(
        &covered
            .ones()
            .map(|j| instance.demand(crate::instance::CustomerId::new(j)))
            .collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Instance;

    fn micro_instance() -> Instance {
        let cost = vec![2.0, 3.0, 2.5, 1.5];
        let demand = vec![5.0, 8.0, 3.0, 6.0, 4.0, 7.0, 2.0, 9.0];
        let coverage = vec![
            (1, 0),
            (1, 1),
            (3, 1),
            (3, 3),
            (1, 4),
            (3, 4),
            (3, 5),
            (1, 7),
            (3, 7),
            (0, 2),
            (2, 2),
            (0, 6),
            (2, 6),
        ];
        Instance::new("micro", cost, demand, &coverage, 5.0).unwrap()
    }

    #[test]
    fn loading_same_set_twice_is_idempotent() {
        let instance = micro_instance();
        let mut k = FixedBitSet::with_capacity(4);
        k.insert(1);
        k.insert(3);

        let a = SolutionState::load(&instance, &k);
        let b = SolutionState::load(&instance, &k);

        assert_eq!(a.covered(), b.covered());
        assert_eq!(a.objective(), b.objective());
        for j in instance.customer_ids() {
            assert_eq!(a.covered_count(j), b.covered_count(j));
        }
    }

    #[test]
    fn load_matches_instance_level_compute_coverage() {
        let instance = micro_instance();
        let mut k = FixedBitSet::with_capacity(4);
        k.insert(1);
        k.insert(3);

        let state = SolutionState::load(&instance, &k);
        let (objective, covered) = instance.compute_coverage(&k);

        assert_eq!(state.covered(), &covered);
        assert!((state.objective() - objective).abs() < 1e-9);
        assert!((state.budget_used() - 3.5).abs() < 1e-9);
    }
}
