//! Multi-Start Local Search (§4.5): a deterministic schedule of diverse
//! initializations, each finished off by [`crate::local_search::run_local_search`],
//! retaining the best result seen.

use crate::config::MultiStartConfig;
use crate::customer_priority::solve_customer_priority;
use crate::greedy::solve_greedy;
use crate::instance::{FacilityId, Instance};
use crate::local_search::run_local_search;
use crate::rng::rng_for_start;
use crate::solution::{SolutionState, Snapshot};
use fixedbitset::FixedBitSet;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Which initialization produced a given [`StartRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMethod {
    Greedy,
    CustomerPriority,
    PerturbedGreedy,
    RandomFeasible,
}

impl StartMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            StartMethod::Greedy => "greedy",
            StartMethod::CustomerPriority => "customer_priority",
            StartMethod::PerturbedGreedy => "perturbed_greedy",
            StartMethod::RandomFeasible => "random_feasible",
        }
    }
}

/// Per-start history record (§4.5: "method tag, initial objective, final
/// objective, move count").
#[derive(Debug, Clone)]
pub struct StartRecord {
    pub method: StartMethod,
    pub initial_objective: f64,
    pub final_objective: f64,
    pub moves_applied: usize,
}

/// Terminal result of a multi-start run.
#[derive(Debug, Clone)]
pub struct MultiStartOutcome {
    pub best: Snapshot,
    pub history: Vec<StartRecord>,
}

/// Run the §4.5 initialization schedule and return the best Local-Search
/// result across all starts, plus the per-start history.
pub fn run_multistart(
    instance: &Instance,
    config: &MultiStartConfig,
    base_seed: u64,
) -> MultiStartOutcome {
    let n = config.multistart_count;
    let perturbed_count = if n >= 2 { (n - 2) / 2 } else { 0 };

    let mut history = Vec::with_capacity(n);
    let mut best: Option<Snapshot> = None;

    for start_idx in 0..n {
        let mut rng = rng_for_start(base_seed, start_idx);

        let (method, initial_k) = if start_idx == 0 {
            (StartMethod::Greedy, solve_greedy(instance).facilities.facilities)
        } else if start_idx == 1 {
            (
                StartMethod::CustomerPriority,
                solve_customer_priority(instance).facilities.facilities,
            )
        } else if start_idx < 2 + perturbed_count {
            (
                StartMethod::PerturbedGreedy,
                perturbed_greedy(instance, config.perturbation_rate, &mut rng),
            )
        } else {
            (StartMethod::RandomFeasible, random_feasible(instance, &mut rng))
        };

        let mut state = SolutionState::load(instance, &initial_k);
        let initial_objective = state.objective();

        let outcome = run_local_search(instance, &mut state, &config.local_search, &mut rng);

        history.push(StartRecord {
            method,
            initial_objective,
            final_objective: outcome.facilities.objective,
            moves_applied: outcome.moves_applied,
        });

        best = Some(match best {
            None => outcome.facilities,
            Some(prev) if outcome.facilities.objective > prev.objective => outcome.facilities,
            Some(prev) => prev,
        });
    }

    tracing::debug!(
        instance = %instance.name(),
        starts = n,
        best_objective = best.as_ref().map(|s| s.objective).unwrap_or(0.0),
        "multi-start search complete"
    );

    MultiStartOutcome {
        best: best.expect("multistart_count must be at least 1"),
        history,
    }
}

/// Run Greedy, remove `max(1, floor(|K| * perturbation_rate))` open
/// facilities at random, then refill the freed budget by scanning a
/// shuffled candidate list and opening every facility that still fits
/// (§4.5 addition: "refill-up-to-capacity", taken from
/// `original_source/src/multistart.py::generate_perturbed_greedy`).
fn perturbed_greedy(instance: &Instance, perturbation_rate: f64, rng: &mut StdRng) -> FixedBitSet {
    let base = solve_greedy(instance).facilities.facilities;
    let mut state = SolutionState::load(instance, &base);

    let mut open_ids: Vec<FacilityId> = instance
        .facility_ids()
        .filter(|&i| state.is_open(i))
        .collect();
    open_ids.shuffle(rng);

    let num_remove = std::cmp::max(1, (open_ids.len() as f64 * perturbation_rate) as usize);
    for &i in open_ids.iter().take(num_remove) {
        state.apply_close(instance, i);
    }

    let mut closed_ids: Vec<FacilityId> = instance
        .facility_ids()
        .filter(|&i| !state.is_open(i))
        .collect();
    closed_ids.shuffle(rng);

    for j in closed_ids {
        if state.budget_used() + instance.cost(j) <= instance.budget() + 1e-9 {
            state.apply_open(instance, j);
        }
    }

    state.open_facilities().clone()
}

/// Shuffle `I` and add each facility if it still fits the remaining budget
/// (§4.5: "pure random feasible").
fn random_feasible(instance: &Instance, rng: &mut StdRng) -> FixedBitSet {
    let mut ids: Vec<FacilityId> = instance.facility_ids().collect();
    ids.shuffle(rng);

    let mut state = SolutionState::empty(instance);
    for i in ids {
        if state.budget_used() + instance.cost(i) <= instance.budget() + 1e-9 {
            state.apply_open(instance, i);
        }
    }
    state.open_facilities().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::greedy::solve_greedy;
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
    fn multistart_dominates_a_single_greedy_local_search_start() {
        let instance = micro_instance();
        let config = MultiStartConfig {
            multistart_count: 5,
            ..MultiStartConfig::default()
        };
        let outcome = run_multistart(&instance, &config, 42);

        let greedy_k = solve_greedy(&instance).facilities.facilities;
        let mut single_state = SolutionState::load(&instance, &greedy_k);
        let mut rng = crate::rng::rng_from_seed(42);
        let single =
            run_local_search(&instance, &mut single_state, &config.local_search, &mut rng);

        assert!(outcome.best.objective >= single.facilities.objective - 1e-9);
        assert!(instance.is_feasible(&outcome.best.facilities));
        assert_eq!(outcome.history.len(), 5);
    }

    #[test]
    fn first_two_starts_use_the_two_constructive_builders() {
        let instance = micro_instance();
        let config = MultiStartConfig {
            multistart_count: 5,
            ..MultiStartConfig::default()
        };
        let outcome = run_multistart(&instance, &config, 1);
        assert_eq!(outcome.history[0].method, StartMethod::Greedy);
        assert_eq!(outcome.history[1].method, StartMethod::CustomerPriority);
    }
}
