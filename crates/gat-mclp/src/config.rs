//! Configuration surface (§6). A plain `serde`-derived, `Clone`, `Default`
//! struct, mirroring the teacher's `TepSolverConfig` — a small config value
//! passed by reference into a `solve_*`/`run_*` free function rather than
//! threaded through builder state.

use serde::{Deserialize, Serialize};

/// Parameters for [`crate::local_search::run_local_search`] (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalSearchConfig {
    pub max_moves: usize,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        LocalSearchConfig { max_moves: 1000 }
    }
}

/// Parameters for [`crate::multistart::run_multistart`] (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiStartConfig {
    pub multistart_count: usize,
    pub perturbation_rate: f64,
    pub local_search: LocalSearchConfig,
}

impl Default for MultiStartConfig {
    fn default() -> Self {
        MultiStartConfig {
            multistart_count: 10,
            perturbation_rate: 0.3,
            local_search: LocalSearchConfig::default(),
        }
    }
}

/// Parameters for [`crate::tabu::run_tabu_search`] (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabuConfig {
    pub tenure: u64,
    pub candidate_list_size: usize,
    pub max_iterations: u64,
    pub stagnation_limit: u64,
    pub intensification_freq: u64,
    pub max_restarts: u64,
    pub intensification_max_moves: usize,
}

impl Default for TabuConfig {
    fn default() -> Self {
        TabuConfig {
            tenure: 10,
            candidate_list_size: 20,
            max_iterations: 500,
            stagnation_limit: 100,
            intensification_freq: 50,
            max_restarts: 100,
            intensification_max_moves: 50,
        }
    }
}

/// Aggregate configuration, letting a caller build one object and slice out
/// what each algorithm entry point needs (§6, "entry-point signature
/// uniformity" — mirrors `TepProblemBuilder` aggregating sub-configuration).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub seed: u64,
    pub local_search: LocalSearchConfig,
    pub multistart: MultiStartConfig,
    pub tabu: TabuConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            seed: 0,
            local_search: LocalSearchConfig::default(),
            multistart: MultiStartConfig::default(),
            tabu: TabuConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_specified_values() {
        let cfg = TabuConfig::default();
        assert_eq!(cfg.tenure, 10);
        assert_eq!(cfg.candidate_list_size, 20);
        assert_eq!(cfg.max_iterations, 500);
        assert_eq!(cfg.stagnation_limit, 100);
        assert_eq!(cfg.intensification_freq, 50);
        assert_eq!(cfg.max_restarts, 100);

        let ms = MultiStartConfig::default();
        assert!((ms.perturbation_rate - 0.3).abs() < 1e-9);
    }
}
