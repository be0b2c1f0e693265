//! Error types for instance construction.
//!
//! Every fallible boundary of the crate funnels through [`MclpError`]. Once an
//! [`crate::Instance`] is built successfully, nothing downstream of it can fail on a
//! well-formed input — infeasible moves are filtered, not raised (see
//! [`crate::moves`]).

use crate::instance::CustomerId;
use thiserror::Error;

/// Errors produced while validating a candidate [`crate::Instance`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MclpError {
    /// A customer appears in no facility's coverage set.
    #[error("customer {0:?} is covered by no facility")]
    EmptyCoverage(CustomerId),

    /// The budget cannot afford even the cheapest facility.
    #[error("budget {budget} is smaller than the cheapest facility cost {min_cost}")]
    BudgetTooSmall { budget: f64, min_cost: f64 },

    /// A coverage pair referenced a facility index outside `0..num_facilities`.
    #[error("facility index {index} out of range (num_facilities = {num_facilities})")]
    UnknownFacility { index: usize, num_facilities: usize },

    /// A coverage pair referenced a customer index outside `0..num_customers`.
    #[error("customer index {index} out of range (num_customers = {num_customers})")]
    UnknownCustomer { index: usize, num_customers: usize },

    /// The instance declares zero facilities; no budget can ever be spent.
    #[error("instance has no facilities")]
    NoFacilities,

    /// The instance declares zero customers; nothing can ever be covered.
    #[error("instance has no customers")]
    NoCustomers,

    /// `cost.len()` did not match `num_facilities`, or `demand.len()` did not
    /// match `num_customers`.
    #[error("array length mismatch: {what} has length {got}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// A cost or demand value was negative.
    #[error("{what} must be non-negative, got {value}")]
    Negative { what: &'static str, value: f64 },
}

/// Convenience alias used throughout instance construction.
pub type MclpResult<T> = Result<T, MclpError>;
