//! Solution evaluator that computes route length, load, and feasibility.

use crate::distance::CostMatrix;
use crate::models::{CustomerSet, Route, Solution, VehicleId, DEPOT};

/// A type of constraint violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// Route load exceeds vehicle capacity.
    CapacityExceeded {
        /// Vehicle serving the route.
        vehicle: VehicleId,
        /// Load of the route.
        load: i64,
        /// Vehicle capacity.
        capacity: i32,
    },
    /// A customer is served by no route.
    MissingCustomer {
        /// Customer index.
        customer: usize,
    },
    /// A customer is served more than once.
    DuplicateCustomer {
        /// Customer index.
        customer: usize,
    },
    /// A route refers to an index outside the instance.
    UnknownCustomer {
        /// Vehicle serving the route.
        vehicle: VehicleId,
        /// Offending index.
        customer: usize,
    },
    /// The depot appears inside a route.
    DepotInRoute {
        /// Vehicle serving the route.
        vehicle: VehicleId,
    },
    /// A vehicle has a route without customers.
    EmptyRoute {
        /// Vehicle with the empty route.
        vehicle: VehicleId,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// Checks that every customer `1..num_nodes` is served exactly once and that
/// routes only hold valid, non-depot indices.
///
/// Needs no demand data, so it also serves consumers holding only a
/// [`CostMatrix`].
pub fn structural_violations(solution: &Solution, num_nodes: usize) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen = vec![0usize; num_nodes];

    for (vehicle, route) in solution.iter() {
        if route.is_empty() {
            violations.push(Violation::new(ViolationType::EmptyRoute { vehicle }));
        }
        for &customer in route.customers() {
            if customer == DEPOT {
                violations.push(Violation::new(ViolationType::DepotInRoute { vehicle }));
            } else if customer >= num_nodes {
                violations.push(Violation::new(ViolationType::UnknownCustomer {
                    vehicle,
                    customer,
                }));
            } else {
                seen[customer] += 1;
            }
        }
    }

    for (customer, &count) in seen.iter().enumerate().skip(1) {
        match count {
            0 => violations.push(Violation::new(ViolationType::MissingCustomer { customer })),
            1 => {}
            _ => violations.push(Violation::new(ViolationType::DuplicateCustomer { customer })),
        }
    }

    violations
}

/// Evaluates solutions against an instance and a vehicle capacity.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Customer, CustomerSet, Route, Solution, SolveStatus};
/// use u_cvrp::distance::CostMatrix;
/// use u_cvrp::evaluation::SolutionEvaluator;
///
/// let customers = CustomerSet::new(vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 3.0, 4.0, 10),
///     Customer::new(2, 6.0, 8.0, 20),
/// ]).unwrap();
/// let costs = CostMatrix::from_customers(&customers).unwrap();
///
/// let evaluator = SolutionEvaluator::new(&customers, &costs, 100);
/// let sol = Solution::from_routes(vec![Route::new(vec![1, 2])], SolveStatus::Heuristic);
/// let (cost, violations) = evaluator.evaluate(&sol);
/// assert!((cost - 20.0).abs() < 1e-10);
/// assert!(violations.is_empty());
/// ```
pub struct SolutionEvaluator<'a> {
    customers: &'a CustomerSet,
    costs: &'a CostMatrix,
    capacity: i32,
}

impl<'a> SolutionEvaluator<'a> {
    /// Creates a new evaluator for the given problem data.
    pub fn new(customers: &'a CustomerSet, costs: &'a CostMatrix, capacity: i32) -> Self {
        Self {
            customers,
            costs,
            capacity,
        }
    }

    /// Total demand served by `route`. Unknown indices count as zero.
    pub fn route_load(&self, route: &Route) -> i64 {
        route
            .customers()
            .iter()
            .filter_map(|&c| self.customers.get(c))
            .map(|c| i64::from(c.demand()))
            .sum()
    }

    /// Length of `route` including both depot legs.
    pub fn route_length(&self, route: &Route) -> f64 {
        self.costs.route_length(route)
    }

    /// Total length of all routes.
    pub fn total_distance(&self, solution: &Solution) -> f64 {
        solution.routes().map(|r| self.route_length(r)).sum()
    }

    /// Evaluates an entire solution, returning `(total distance, violations)`.
    ///
    /// A feasible solution has an empty violations list.
    pub fn evaluate(&self, solution: &Solution) -> (f64, Vec<Violation>) {
        let mut violations = structural_violations(solution, self.customers.len());
        if !violations.is_empty() {
            return (f64::INFINITY, violations);
        }

        let mut total = 0.0;
        for (vehicle, route) in solution.iter() {
            let load = self.route_load(route);
            if load > i64::from(self.capacity) {
                violations.push(Violation::new(ViolationType::CapacityExceeded {
                    vehicle,
                    load,
                    capacity: self.capacity,
                }));
            }
            total += self.route_length(route);
        }

        (total, violations)
    }

    /// Returns `true` if `solution` covers every customer once within capacity.
    pub fn is_feasible(&self, solution: &Solution) -> bool {
        self.evaluate(solution).1.is_empty()
    }
}
