//! Explicit random-stream construction (Design Notes §9: "the random stream
//! is an explicit parameter threaded through every stochastic step").
//!
//! No component in this crate ever reaches for a global or thread-local RNG.
//! Every stochastic entry point builds exactly one stream here and threads it
//! by `&mut` reference through perturbation, shake, and shuffle calls.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Build the single seeded stream for a stochastic entry point.
pub fn rng_from_seed(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Derive start `idx`'s stream from a multi-start base seed (§4.5: "the base
/// seed plus the start index gives each start a distinct, reproducible
/// random stream").
pub fn rng_for_start(base_seed: u64, idx: usize) -> StdRng {
    StdRng::seed_from_u64(base_seed.wrapping_add(idx as u64))
}
