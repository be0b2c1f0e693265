//! The immutable MCLP-B problem instance (§3).
//!
//! An [`Instance`] never changes after construction. Facility and customer
//! identities are dense `0..n` indices wrapped in [`FacilityId`]/[`CustomerId`]
//! newtypes, following the teacher's `BusId`/`CandidateId` convention — this
//! lets [`crate::solution::SolutionState`] use [`FixedBitSet`]s and plain
//! `Vec`s instead of hash-based sets, per the Design Notes on replacing
//! dynamic containers with dense, id-indexed ones.

use crate::error::{MclpError, MclpResult};
use fixedbitset::FixedBitSet;

/// Unique identifier for a candidate facility site. Wraps a dense `0..n` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FacilityId(u32);

impl FacilityId {
    pub fn new(index: usize) -> Self {
        FacilityId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Unique identifier for a customer demand point. Wraps a dense `0..n` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomerId(u32);

impl CustomerId {
    pub fn new(index: usize) -> Self {
        CustomerId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Immutable problem data for the Maximum Coverage Location Problem with
/// Budget, plus the two derived coverage indices described in §3.
#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    cost: Vec<f64>,
    demand: Vec<f64>,
    /// `covered_by[i]` is the set of customers facility `i` can cover.
    covered_by: Vec<FixedBitSet>,
    /// `covers_of[j]` is the set of facilities that can cover customer `j`.
    covers_of: Vec<FixedBitSet>,
    budget: f64,
    total_demand: f64,
    facility_labels: Vec<String>,
    customer_labels: Vec<String>,
}

impl Instance {
    /// Build and validate an instance from raw facility/customer arrays and a
    /// bipartite coverage relation given as `(facility_index, customer_index)`
    /// pairs — deriving both `covers_of` and `covered_by` from the same list
    /// of pairs makes the "coverage matrix symmetry" invariant (§3) hold by
    /// construction rather than by a separate cross-check.
    pub fn new(
        name: impl Into<String>,
        cost: Vec<f64>,
        demand: Vec<f64>,
        coverage: &[(usize, usize)],
        budget: f64,
    ) -> MclpResult<Self> {
        let num_facilities = cost.len();
        let num_customers = demand.len();

        if num_facilities == 0 {
            return Err(MclpError::NoFacilities);
        }
        if num_customers == 0 {
            return Err(MclpError::NoCustomers);
        }
        for &c in &cost {
            if c < 0.0 {
                return Err(MclpError::Negative {
                    what: "facility cost",
                    value: c,
                });
            }
        }
        for &d in &demand {
            if d < 0.0 {
                return Err(MclpError::Negative {
                    what: "customer demand",
                    value: d,
                });
            }
        }

        let mut covered_by = vec![FixedBitSet::with_capacity(num_customers); num_facilities];
        let mut covers_of = vec![FixedBitSet::with_capacity(num_facilities); num_customers];

        for &(i, j) in coverage {
            if i >= num_facilities {
                return Err(MclpError::UnknownFacility {
                    index: i,
                    num_facilities,
                });
            }
            if j >= num_customers {
                return Err(MclpError::UnknownCustomer {
                    index: j,
                    num_customers,
                });
            }
            covered_by[i].insert(j);
            covers_of[j].insert(i);
        }

        for (j, facilities) in covers_of.iter().enumerate() {
            if facilities.count_ones(..) == 0 {
                return Err(MclpError::EmptyCoverage(CustomerId::new(j)));
            }
        }

        let min_cost = cost.iter().cloned().fold(f64::INFINITY, f64::min);
        if budget < min_cost {
            return Err(MclpError::BudgetTooSmall { budget, min_cost });
        }

        let total_demand = sum_sorted(&demand);

        let facility_labels = (0..num_facilities).map(|i| i.to_string()).collect();
        let customer_labels = (0..num_customers).map(|j| j.to_string()).collect();

        let instance = Instance {
            name: name.into(),
            cost,
            demand,
            covered_by,
            covers_of,
            budget,
            total_demand,
            facility_labels,
            customer_labels,
        };

        tracing::debug!(
            instance = %instance.name,
            num_facilities,
            num_customers,
            budget,
            total_demand,
            coverage_density = coverage.len() as f64 / (num_facilities * num_customers) as f64,
            "validated MCLP-B instance"
        );

        Ok(instance)
    }

    /// Attach human-readable labels (e.g. the caller's original file-level
    /// identifiers) used only for display in [`crate::result::ResultRecord`].
    /// Computation always proceeds on the dense integer indices.
    pub fn with_labels(
        mut self,
        facility_labels: Vec<String>,
        customer_labels: Vec<String>,
    ) -> MclpResult<Self> {
        if facility_labels.len() != self.num_facilities() {
            return Err(MclpError::LengthMismatch {
                what: "facility_labels",
                got: facility_labels.len(),
                expected: self.num_facilities(),
            });
        }
        if customer_labels.len() != self.num_customers() {
            return Err(MclpError::LengthMismatch {
                what: "customer_labels",
                got: customer_labels.len(),
                expected: self.num_customers(),
            });
        }
        self.facility_labels = facility_labels;
        self.customer_labels = customer_labels;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_facilities(&self) -> usize {
        self.cost.len()
    }

    pub fn num_customers(&self) -> usize {
        self.demand.len()
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn total_demand(&self) -> f64 {
        self.total_demand
    }

    pub fn cost(&self, i: FacilityId) -> f64 {
        self.cost[i.index()]
    }

    pub fn demand(&self, j: CustomerId) -> f64 {
        self.demand[j.index()]
    }

    pub fn covered_by(&self, i: FacilityId) -> &FixedBitSet {
        &self.covered_by[i.index()]
    }

    pub fn covers_of(&self, j: CustomerId) -> &FixedBitSet {
        &self.covers_of[j.index()]
    }

    pub fn facility_label(&self, i: FacilityId) -> &str {
        &self.facility_labels[i.index()]
    }

    pub fn facility_ids(&self) -> impl Iterator<Item = FacilityId> + '_ {
        (0..self.num_facilities()).map(FacilityId::new)
    }

    pub fn customer_ids(&self) -> impl Iterator<Item = CustomerId> + '_ {
        (0..self.num_customers()).map(CustomerId::new)
    }

    /// Budget feasibility of an arbitrary facility set, recomputed from
    /// scratch (used by tests and by the oracle check in the drift guard).
    pub fn is_feasible(&self, facilities: &FixedBitSet) -> bool {
        self.cost_of(facilities) <= self.budget
    }

    pub fn cost_of(&self, facilities: &FixedBitSet) -> f64 {
        sum_sorted(
            &facilities
                .ones()
                .map(|i| self.cost[i])
                .collect::<Vec<_>>(),
        )
    }

    /// Recompute `(objective, covered)` for an arbitrary facility set from
    /// scratch, in ascending customer-id order — the oracle used by the
    /// drift guard and by property tests (§8, "Objective consistency").
    pub fn compute_coverage(&self, facilities: &FixedBitSet) -> (f64, FixedBitSet) {
        let mut covered = FixedBitSet::with_capacity(self.num_customers());
        for i in facilities.ones() {
            covered.union_with(&self.covered_by[i]);
        }
        let objective = sum_sorted(
            &covered
                .ones()
                .map(|j| self.demand[j])
                .collect::<Vec<_>>(),
        );
        (objective, covered)
    }
}

/// Deterministic floating-point summation: values are assumed to already be
/// in ascending-id order (every call site here iterates `FixedBitSet::ones()`
/// or a `0..n` range, both of which are ascending), per §5's requirement that
/// summation order not depend on hash-iteration order.
pub(crate) fn sum_sorted(values: &[f64]) -> f64 {
    values.iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn micro_instance() -> Instance {
        // I = {0,1,2,3}, J = {0..7}, costs (2.0, 3.0, 2.5, 1.5), B = 5.0.
        // Coverage chosen so K = {1,3} covers {0,1,3,4,5,7}.
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
    fn loads_four_facilities_eight_customers_budget_five() {
        let instance = micro_instance();
        assert_eq!(instance.num_facilities(), 4);
        assert_eq!(instance.num_customers(), 8);
        assert_eq!(instance.budget(), 5.0);
    }

    #[test]
    fn coverage_of_k_1_3_matches_expected_set_and_objective() {
        let instance = micro_instance();
        let mut k = FixedBitSet::with_capacity(4);
        k.insert(1);
        k.insert(3);

        let (objective, covered) = instance.compute_coverage(&k);
        let expected: Vec<usize> = vec![0, 1, 3, 4, 5, 7];
        let got: Vec<usize> = covered.ones().collect();
        assert_eq!(got, expected);

        let expected_obj: f64 = expected.iter().map(|&j| instance.demand(CustomerId::new(j))).sum();
        assert!((objective - expected_obj).abs() < 1e-9);
    }

    #[test]
    fn budget_feasibility_of_facility_sets() {
        let instance = micro_instance();

        let mut feasible = FixedBitSet::with_capacity(4);
        feasible.insert(0);
        feasible.insert(3);
        assert!(instance.is_feasible(&feasible)); // 2.0 + 1.5 = 3.5 <= 5.0

        let mut infeasible = FixedBitSet::with_capacity(4);
        infeasible.insert(0);
        infeasible.insert(1);
        infeasible.insert(2);
        assert!(!instance.is_feasible(&infeasible)); // 2.0 + 3.0 + 2.5 = 7.5 > 5.0
    }

    #[test]
    fn rejects_customer_with_no_coverage() {
        let cost = vec![1.0, 1.0];
        let demand = vec![1.0, 1.0];
        let coverage = vec![(0, 0)]; // customer 1 is never covered
        let err = Instance::new("bad", cost, demand, &coverage, 2.0).unwrap_err();
        assert_eq!(err, MclpError::EmptyCoverage(CustomerId::new(1)));
    }

    #[test]
    fn rejects_budget_below_cheapest_facility() {
        let cost = vec![10.0, 20.0];
        let demand = vec![1.0];
        let coverage = vec![(0, 0), (1, 0)];
        let err = Instance::new("bad", cost, demand, &coverage, 5.0).unwrap_err();
        assert_eq!(
            err,
            MclpError::BudgetTooSmall {
                budget: 5.0,
                min_cost: 10.0
            }
        );
    }

    #[test]
    fn rejects_out_of_range_facility_index() {
        let cost = vec![1.0];
        let demand = vec![1.0];
        let coverage = vec![(5, 0)];
        let err = Instance::new("bad", cost, demand, &coverage, 10.0).unwrap_err();
        assert_eq!(
            err,
            MclpError::UnknownFacility {
                index: 5,
                num_facilities: 1
            }
        );
    }
}
