//! Validated, immutable set of customers.

use serde::{Deserialize, Serialize};

use super::{Customer, Position};
use crate::error::{Result, RoutingError};

/// Index of the depot in every customer set and cost matrix.
pub const DEPOT: usize = 0;

/// An ordered, immutable sequence of customers with the depot at index 0.
///
/// Indices are stable from creation: customer `i` sits at position `i`.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Customer, CustomerSet};
///
/// let set = CustomerSet::new(vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 3.0, 4.0, 10),
///     Customer::new(2, 6.0, 8.0, 20),
/// ]).unwrap();
/// assert_eq!(set.num_customers(), 2);
/// assert_eq!(set.total_demand(), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Customer>", into = "Vec<Customer>")]
pub struct CustomerSet {
    customers: Vec<Customer>,
}

impl CustomerSet {
    /// Validates and wraps a list of locations (index 0 = depot).
    ///
    /// Fails with [`RoutingError::InvalidParameter`] if the depot is missing
    /// or carries demand, if ids do not match positions, if any demand is
    /// negative, or if there is no customer besides the depot.
    pub fn new(customers: Vec<Customer>) -> Result<Self> {
        let depot = customers
            .first()
            .ok_or_else(|| RoutingError::invalid_parameter("customer set is empty"))?;
        if depot.demand() != 0 {
            return Err(RoutingError::invalid_parameter(format!(
                "depot must have zero demand, got {}",
                depot.demand()
            )));
        }
        if customers.len() < 2 {
            return Err(RoutingError::invalid_parameter(
                "at least one customer besides the depot is required",
            ));
        }
        for (index, c) in customers.iter().enumerate() {
            if c.id() != index {
                return Err(RoutingError::invalid_parameter(format!(
                    "customer at position {index} has id {}",
                    c.id()
                )));
            }
            if c.demand() < 0 {
                return Err(RoutingError::invalid_parameter(format!(
                    "customer {index} has negative demand {}",
                    c.demand()
                )));
            }
            if let Some(p) = c.position() {
                if !p.x.is_finite() || !p.y.is_finite() {
                    return Err(RoutingError::invalid_parameter(format!(
                        "customer {index} has a non-finite position"
                    )));
                }
            }
        }
        Ok(Self { customers })
    }

    /// Builds a set from a depot position and `(x, y, demand)` triples.
    pub fn from_points(depot: Position, points: &[(f64, f64, i32)]) -> Result<Self> {
        let mut customers = Vec::with_capacity(points.len() + 1);
        customers.push(Customer::depot(depot.x, depot.y));
        customers.extend(
            points
                .iter()
                .enumerate()
                .map(|(i, &(x, y, demand))| Customer::new(i + 1, x, y, demand)),
        );
        Self::new(customers)
    }

    /// Builds a position-free set from customer demands, for use with an
    /// externally supplied cost matrix.
    pub fn from_demands(demands: &[i32]) -> Result<Self> {
        let mut customers = Vec::with_capacity(demands.len() + 1);
        customers.push(Customer::unplaced(0, 0));
        customers.extend(
            demands
                .iter()
                .enumerate()
                .map(|(i, &d)| Customer::unplaced(i + 1, d)),
        );
        Self::new(customers)
    }

    /// All locations, depot first.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// The depot.
    pub fn depot(&self) -> &Customer {
        &self.customers[DEPOT]
    }

    /// Number of locations including the depot.
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Always `false`: a validated set holds the depot and one customer.
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Number of customers excluding the depot.
    pub fn num_customers(&self) -> usize {
        self.customers.len() - 1
    }

    /// Indices of the non-depot customers.
    pub fn customer_indices(&self) -> impl Iterator<Item = usize> {
        1..self.customers.len()
    }

    /// Returns the customer at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Customer> {
        self.customers.get(index)
    }

    /// Demand of customer `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn demand(&self, index: usize) -> i32 {
        self.customers[index].demand()
    }

    /// All demands, depot first.
    pub fn demands(&self) -> Vec<i32> {
        self.customers.iter().map(Customer::demand).collect()
    }

    /// All positions, depot first; `None` if any location is unplaced.
    pub fn positions(&self) -> Option<Vec<Position>> {
        self.customers.iter().map(Customer::position).collect()
    }

    /// Sum of all customer demands.
    pub fn total_demand(&self) -> i64 {
        self.customers.iter().map(|c| i64::from(c.demand())).sum()
    }

    /// Largest single customer demand.
    pub fn max_demand(&self) -> i32 {
        self.customers.iter().map(Customer::demand).max().unwrap_or(0)
    }

    /// Fails with [`RoutingError::InfeasibleInstance`] if some customer alone
    /// exceeds `capacity`.
    pub fn check_single_demands(&self, capacity: i32) -> Result<()> {
        match self.customers.iter().find(|c| c.demand() > capacity) {
            Some(c) => Err(RoutingError::infeasible(format!(
                "customer {} has demand {} exceeding vehicle capacity {capacity}",
                c.id(),
                c.demand()
            ))),
            None => Ok(()),
        }
    }
}

impl TryFrom<Vec<Customer>> for CustomerSet {
    type Error = RoutingError;

    fn try_from(customers: Vec<Customer>) -> Result<Self> {
        Self::new(customers)
    }
}

impl From<CustomerSet> for Vec<Customer> {
    fn from(set: CustomerSet) -> Self {
        set.customers
    }
}
