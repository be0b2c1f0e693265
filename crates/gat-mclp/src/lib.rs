//! Maximum Coverage Location Problem with Budget (MCLP-B)
//!
//! Given candidate facility sites, customer demand points, a coverage
//! relation between them, a per-site opening cost, and a total budget,
//! select a budget-feasible subset of sites maximizing covered demand.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Instance (facilities, customers, coverage, cost, demand, budget)  │
//! │        │                                                           │
//! │        ▼                                                           │
//! │  SolutionState (K, coveredCount, covered, objective, budgetUsed)    │
//! │        │                                                           │
//! │        ▼                                                           │
//! │  moves: Close(i) | Open(j) | Swap(i_out, j_in)  — Δobj + feasible   │
//! │        │                                                           │
//! │   ┌────┴─────────────┬───────────────────┬─────────────────────┐   │
//! │   ▼                  ▼                   ▼                     │   │
//! │ greedy           customer_priority   local_search          tabu  │   │
//! │ (facility-first)  (customer-first)   (best-improvement)  (short-│   │
//! │                                                          term   │   │
//! │                                                          memory)│   │
//! │   └────────┬─────────┘                   │                     │   │
//! │            ▼                              ▼                     │   │
//! │       multistart ───────────────────► run_local_search           │   │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No I/O, no CLI, no plotting: this crate is a solver core only. An
//! external orchestrator loads instances from whatever file format it
//! likes, constructs an [`Instance`] via [`Instance::new`], calls the
//! algorithm entry points below, and writes [`ResultRecord`]s to CSV itself.

pub mod config;
pub mod customer_priority;
pub mod error;
pub mod greedy;
pub mod instance;
pub mod local_search;
pub mod moves;
pub mod multistart;
pub mod result;
pub mod rng;
pub mod solution;
pub mod tabu;

pub use config::{LocalSearchConfig, MultiStartConfig, SolverConfig, TabuConfig};
pub use customer_priority::{solve_customer_priority, CustomerPriorityOutcome};
pub use error::{MclpError, MclpResult};
pub use greedy::{solve_greedy, GreedyOutcome};
pub use instance::{CustomerId, FacilityId, Instance};
pub use local_search::{run_local_search, LocalSearchOutcome};
pub use moves::{Move, MoveEval};
pub use multistart::{run_multistart, MultiStartOutcome, StartMethod, StartRecord};
pub use result::{AlgorithmTag, ResultRecord};
pub use solution::{Snapshot, SolutionState};
pub use tabu::{run_tabu_search, MoveKind, TabuHistoryEntry, TabuPhase, TabuSearchOutcome, TabuStats};
