//! Local Search (§4.4): full-neighborhood best-improvement over the move
//! set of §4.1.

use crate::config::LocalSearchConfig;
use crate::instance::{FacilityId, Instance};
use crate::moves::{Move, IMPROVEMENT_EPSILON};
use crate::solution::SolutionState;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Terminal result of a Local Search run (§4.4: "the returned tuple is
/// `(K, objective, movesApplied)`").
#[derive(Debug, Clone)]
pub struct LocalSearchOutcome {
    pub facilities: crate::solution::Snapshot,
    pub moves_applied: usize,
}

/// Run Local Search from `state` in place, returning when no improving move
/// remains in the full neighborhood or `max_moves` is reached. Guarantees
/// `state.objective()` never decreases (§8, "Non-degradation of local
/// search").
pub fn run_local_search(
    instance: &Instance,
    state: &mut SolutionState,
    config: &LocalSearchConfig,
    rng: &mut StdRng,
) -> LocalSearchOutcome {
    let mut moves_applied = 0usize;

    while moves_applied < config.max_moves {
        let mut open_ids: Vec<FacilityId> = instance
            .facility_ids()
            .filter(|&i| state.is_open(i))
            .collect();
        let mut closed_ids: Vec<FacilityId> = instance
            .facility_ids()
            .filter(|&i| !state.is_open(i))
            .collect();
        open_ids.shuffle(rng);
        closed_ids.shuffle(rng);

        let mut best: Option<(Move, f64)> = None;

        for &i in &open_ids {
            let eval = state.eval_close(instance, i);
            if eval.feasible && eval.delta > IMPROVEMENT_EPSILON {
                update_best(&mut best, Move::Close(i), eval.delta);
            }
        }
        for &j in &closed_ids {
            let eval = state.eval_open(instance, j);
            if eval.feasible && eval.delta > IMPROVEMENT_EPSILON {
                update_best(&mut best, Move::Open(j), eval.delta);
            }
        }
        for &i in &open_ids {
            for &j in &closed_ids {
                let eval = state.eval_swap(instance, i, j);
                if eval.feasible && eval.delta > IMPROVEMENT_EPSILON {
                    update_best(&mut best, Move::Swap { out: i, in_: j }, eval.delta);
                }
            }
        }

        let Some((mv, _)) = best else {
            break;
        };

        state.apply(instance, mv);
        moves_applied += 1;
    }

    tracing::debug!(
        instance = %instance.name(),
        moves_applied,
        objective = state.objective(),
        "local search terminated"
    );

    LocalSearchOutcome {
        facilities: state.snapshot(),
        moves_applied,
    }
}

fn update_best(best: &mut Option<(Move, f64)>, mv: Move, delta: f64) {
    match best {
        Some((_, best_delta)) if delta <= *best_delta => {}
        _ => *best = Some((mv, delta)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Instance;
    use crate::rng::rng_from_seed;
    use fixedbitset::FixedBitSet;

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
    fn local_search_never_degrades_the_objective() {
        let instance = micro_instance();
        let mut k = FixedBitSet::with_capacity(4);
        k.insert(0); // a deliberately weak start: facility 0 alone
        let mut state = SolutionState::load(&instance, &k);
        let initial_objective = state.objective();

        let mut rng = rng_from_seed(7);
        let outcome =
            run_local_search(&instance, &mut state, &LocalSearchConfig::default(), &mut rng);

        assert!(outcome.facilities.objective >= initial_objective - 1e-9);
        assert!(instance.is_feasible(&outcome.facilities.facilities));
    }

    #[test]
    fn local_search_terminates_within_max_moves() {
        let instance = micro_instance();
        let mut state = SolutionState::empty(&instance);
        let mut rng = rng_from_seed(1);
        let config = LocalSearchConfig { max_moves: 3 };

        let outcome = run_local_search(&instance, &mut state, &config, &mut rng);
        assert!(outcome.moves_applied <= 3);
    }
}
