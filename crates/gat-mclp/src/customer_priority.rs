//! Customer-Priority constructive builder (§4.3).
//!
//! Processes customers by descending demand, opening the cheapest feasible
//! uncovered facility that can reach each still-uncovered customer. A
//! structurally different seed for multi-start than Greedy's facility-first
//! view.
//!
//! The original source names this `closest_neighbor_heuristic`, despite
//! using facility cost (not spatial distance) as its tie-breaker — see
//! `SPEC_FULL.md` §4.3's naming note. This crate uses the clearer name
//! throughout, including in [`crate::result::AlgorithmTag`]. No `seed`
//! parameter, for the same reason as [`crate::greedy::solve_greedy`].

use crate::instance::{CustomerId, FacilityId, Instance};
use crate::solution::{SolutionState, Snapshot};

#[derive(Debug, Clone)]
pub struct CustomerPriorityOutcome {
    pub facilities: Snapshot,
}

pub fn solve_customer_priority(instance: &Instance) -> CustomerPriorityOutcome {
    let mut order: Vec<CustomerId> = instance.customer_ids().collect();
    order.sort_by(|&a, &b| {
        instance
            .demand(b)
            .partial_cmp(&instance.demand(a))
            .unwrap()
            .then(a.index().cmp(&b.index()))
    });

    let mut state = SolutionState::empty(instance);

    for j in order {
        if state.covered_count(j) > 0 {
            continue;
        }

        let mut best: Option<(FacilityId, f64)> = None;
        for i in instance.covers_of(j).ones().map(FacilityId::new) {
            if state.is_open(i) {
                continue;
            }
            let cost = instance.cost(i);
            if state.budget_used() + cost > instance.budget() + 1e-9 {
                continue;
            }
            match best {
                None => best = Some((i, cost)),
                Some((bi, bc)) if cost < bc || (cost == bc && i.index() < bi.index()) => {
                    best = Some((i, cost))
                }
                _ => {}
            }
        }

        if let Some((chosen, _)) = best {
            state.apply_open(instance, chosen);
        }
    }

    tracing::debug!(
        instance = %instance.name(),
        num_facilities = state.open_facilities().count_ones(..),
        objective = state.objective(),
        "customer-priority construction complete"
    );

    CustomerPriorityOutcome {
        facilities: state.snapshot(),
    }
}
