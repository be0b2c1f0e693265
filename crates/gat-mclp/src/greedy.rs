//! Greedy constructive builder (§4.2).
//!
//! Repeatedly opens the unopened, budget-feasible facility with the highest
//! ratio of incremental covered demand to cost. No `seed` parameter: the
//! original source's `random.seed(seed)` call in this function is never
//! consulted by any decision it makes (ties break on facility id, not on
//! randomness), so this entry point omits the parameter entirely rather than
//! carrying a dead one forward (see `SPEC_FULL.md`'s entry-point note).

use crate::instance::{FacilityId, Instance};
use crate::solution::{SolutionState, Snapshot};

/// Result of [`solve_greedy`]. `num_moves`/`num_iterations` are always zero
/// (§6: "numMoves: total applied moves (builders → 0)") — opening a facility
/// during construction is not a tracked "move" in the §4.1 sense.
#[derive(Debug, Clone)]
pub struct GreedyOutcome {
    pub facilities: Snapshot,
}

/// Build a feasible `K` greedily. Ties prefer the lower facility id.
pub fn solve_greedy(instance: &Instance) -> GreedyOutcome {
    let mut state = SolutionState::empty(instance);
    let mut uncovered_gain: Vec<f64> = instance
        .facility_ids()
        .map(|i| {
            instance
                .covered_by(i)
                .ones()
                .map(|c| instance.demand(crate::instance::CustomerId::new(c)))
                .sum()
        })
        .collect();

    loop {
        let mut best: Option<(FacilityId, f64)> = None;
        for i in instance.facility_ids() {
            if state.is_open(i) {
                continue;
            }
            let gain = uncovered_gain[i.index()];
            if gain <= 0.0 {
                continue;
            }
            let cost = instance.cost(i);
            if state.budget_used() + cost > instance.budget() + 1e-9 {
                continue;
            }
            let ratio = gain / cost;
            match best {
                None => best = Some((i, ratio)),
                Some((_, best_ratio)) if ratio > best_ratio => best = Some((i, ratio)),
                _ => {}
            }
        }

        let Some((chosen, _)) = best else {
            break;
        };

        let newly_covered: Vec<usize> = instance
            .covered_by(chosen)
            .ones()
            .filter(|&c| state.covered_count(crate::instance::CustomerId::new(c)) == 0)
            .collect();

        state.apply_open(instance, chosen);

        for c in newly_covered {
            let customer = crate::instance::CustomerId::new(c);
            let demand = instance.demand(customer);
            for f in instance.covers_of(customer).ones() {
                uncovered_gain[f] -= demand;
            }
        }
    }

    tracing::debug!(
        instance = %instance.name(),
        num_facilities = state.open_facilities().count_ones(..),
        objective = state.objective(),
        "greedy construction complete"
    );

    GreedyOutcome {
        facilities: state.snapshot(),
    }
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
    fn greedy_returns_budget_feasible_solution_with_consistent_objective() {
        let instance = micro_instance();
        let outcome = solve_greedy(&instance);

        assert!(instance.is_feasible(&outcome.facilities.facilities));
        let (recomputed, _) = instance.compute_coverage(&outcome.facilities.facilities);
        assert!((recomputed - outcome.facilities.objective).abs() < 1e-9);
    }

    #[test]
    fn greedy_never_exceeds_the_budget() {
        let instance = micro_instance();
        let outcome = solve_greedy(&instance);
        let used = instance.cost_of(&outcome.facilities.facilities);
        assert!(used <= instance.budget() + 1e-9);
    }
}
