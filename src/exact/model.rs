//! Arc formulation of the CVRP.
//!
//! Decision: for every ordered pair of nodes `(a, b)` a binary arc variable
//! `x_ab`. Each customer has exactly one incoming and one outgoing arc, the
//! depot has at most `K` outgoing arcs, and every route leaving the depot
//! carries at most `Q` units of demand. The objective is the sum of selected
//! arc costs.
//!
//! [`ArcSelection`] is an assignment of those variables, stored as the
//! successor of each customer plus the ordered list of depot departures.

use crate::distance::CostMatrix;
use crate::error::{Result, RoutingError};
use crate::models::{CustomerSet, Route, DEPOT};

/// Problem data of one exact solve.
#[derive(Debug, Clone)]
pub struct ArcModel<'a> {
    costs: &'a CostMatrix,
    demands: Vec<i32>,
    capacity: i32,
    max_vehicles: usize,
}

impl<'a> ArcModel<'a> {
    /// Builds the model, rejecting malformed parameters.
    pub fn new(
        customers: &CustomerSet,
        costs: &'a CostMatrix,
        capacity: i32,
        max_vehicles: usize,
    ) -> Result<Self> {
        if capacity <= 0 {
            return Err(RoutingError::invalid_parameter(format!(
                "vehicle capacity must be positive, got {capacity}"
            )));
        }
        if max_vehicles == 0 {
            return Err(RoutingError::invalid_parameter(
                "at least one vehicle is required",
            ));
        }
        costs.check_compatible(customers)?;
        // A vehicle serves at least one customer, so K above n is never used.
        Ok(Self {
            costs,
            demands: customers.demands(),
            capacity,
            max_vehicles: max_vehicles.min(customers.num_customers()),
        })
    }

    /// Rejects instances that no fleet of `K` vehicles can serve: a customer
    /// heavier than `Q`, or total demand above `K·Q`.
    pub fn check_feasibility(&self) -> Result<()> {
        if let Some((c, &d)) = self
            .demands
            .iter()
            .enumerate()
            .find(|&(_, &d)| d > self.capacity)
        {
            return Err(RoutingError::infeasible(format!(
                "customer {c} has demand {d} exceeding vehicle capacity {}",
                self.capacity
            )));
        }
        let fleet = self.fleet_capacity();
        if self.total_demand() > fleet {
            return Err(RoutingError::infeasible(format!(
                "total demand {} exceeds fleet capacity {fleet} ({} vehicles of {})",
                self.total_demand(),
                self.max_vehicles,
                self.capacity
            )));
        }
        Ok(())
    }

    /// Number of nodes including the depot.
    pub fn num_nodes(&self) -> usize {
        self.demands.len()
    }

    /// Cost of arc `(from, to)`.
    #[inline]
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.costs.get(from, to)
    }

    /// Demand of node `node`.
    #[inline]
    pub fn demand(&self, node: usize) -> i32 {
        self.demands[node]
    }

    /// Vehicle capacity `Q`.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Maximum number of depot departures, at most the number of customers.
    pub fn max_vehicles(&self) -> usize {
        self.max_vehicles
    }

    /// Sum of all demands.
    pub fn total_demand(&self) -> i64 {
        self.demands.iter().map(|&d| i64::from(d)).sum()
    }

    /// `K·Q`.
    pub fn fleet_capacity(&self) -> i64 {
        i64::try_from(self.max_vehicles)
            .unwrap_or(i64::MAX)
            .saturating_mul(i64::from(self.capacity))
    }

    /// Lower bound on the vehicles needed, `ceil(total / Q)`.
    pub fn min_vehicles(&self) -> usize {
        let q = i64::from(self.capacity);
        ((self.total_demand() + q - 1) / q) as usize
    }
}

/// A set of selected arcs.
///
/// # Examples
///
/// ```
/// use u_cvrp::exact::ArcSelection;
/// use u_cvrp::models::Route;
///
/// let arcs = ArcSelection::from_routes(4, &[Route::new(vec![2, 1]), Route::new(vec![3])]);
/// assert_eq!(arcs.num_departures(), 2);
/// let routes = arcs.routes().unwrap();
/// assert_eq!(routes[0].customers(), &[2, 1]);
/// assert_eq!(routes[1].customers(), &[3]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSelection {
    successor: Vec<Option<usize>>,
    departures: Vec<usize>,
}

impl ArcSelection {
    /// Creates an empty selection over `num_nodes` nodes.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            successor: vec![None; num_nodes],
            departures: Vec::new(),
        }
    }

    /// Encodes routes as arcs.
    pub fn from_routes(num_nodes: usize, routes: &[Route]) -> Self {
        let mut arcs = Self::new(num_nodes);
        for route in routes {
            for (from, to) in route.legs(DEPOT) {
                if from == DEPOT {
                    arcs.depart(to);
                } else {
                    arcs.select(from, to);
                }
            }
        }
        arcs
    }

    /// Selects the depot departure `(0, to)`.
    #[inline]
    pub fn depart(&mut self, to: usize) {
        self.departures.push(to);
    }

    /// Drops the most recent depot departure.
    #[inline]
    pub fn undo_depart(&mut self) {
        self.departures.pop();
    }

    /// Selects arc `(from, to)` for customer `from`.
    #[inline]
    pub fn select(&mut self, from: usize, to: usize) {
        self.successor[from] = Some(to);
    }

    /// Clears the outgoing arc of customer `from`.
    #[inline]
    pub fn unselect(&mut self, from: usize) {
        self.successor[from] = None;
    }

    /// Number of depot departures, i.e. vehicles used.
    pub fn num_departures(&self) -> usize {
        self.departures.len()
    }

    /// Sum of the costs of all selected arcs.
    pub fn objective(&self, costs: &CostMatrix) -> f64 {
        let departing: f64 = self.departures.iter().map(|&v| costs.get(DEPOT, v)).sum();
        let rest: f64 = self
            .successor
            .iter()
            .enumerate()
            .filter_map(|(from, to)| to.map(|to| costs.get(from, to)))
            .sum();
        departing + rest
    }

    /// Reconstructs one route per depot departure by following arcs until
    /// they return to the depot.
    ///
    /// Fails with [`RoutingError::CorruptSolution`] if an arc is missing, a
    /// customer is reached twice, or a customer lies on a cycle that avoids
    /// the depot.
    pub fn routes(&self) -> Result<Vec<Route>> {
        let n = self.successor.len();
        let mut reached = vec![false; n];
        let mut routes = Vec::with_capacity(self.departures.len());

        for &start in &self.departures {
            let mut members = Vec::new();
            let mut node = start;
            while node != DEPOT {
                if node >= n || reached[node] {
                    return Err(RoutingError::corrupt(format!(
                        "customer {node} is reached more than once or does not exist"
                    )));
                }
                reached[node] = true;
                members.push(node);
                node = self.successor[node].ok_or_else(|| {
                    RoutingError::corrupt(format!("customer {node} has no outgoing arc"))
                })?;
            }
            routes.push(Route::new(members));
        }

        if let Some(node) = (1..n).find(|&c| !reached[c]) {
            return Err(RoutingError::corrupt(format!(
                "customer {node} lies on a sub-tour not connected to the depot"
            )));
        }
        Ok(routes)
    }
}
