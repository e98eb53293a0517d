//! Route type.

use serde::{Deserialize, Serialize};

/// An ordered sequence of customer indices served by one vehicle.
///
/// The depot is not stored: every route implicitly departs from and returns
/// to it.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::Route;
///
/// let route = Route::new(vec![3, 1, 2]);
/// assert_eq!(route.len(), 3);
/// assert_eq!(route.first(), Some(3));
/// assert_eq!(route.last(), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route {
    customers: Vec<usize>,
}

impl Route {
    /// Creates a route visiting `customers` in order.
    pub fn new(customers: Vec<usize>) -> Self {
        Self { customers }
    }

    /// Customer indices in visit order.
    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    /// Number of customer visits (excluding depot).
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Returns `true` if this route has no customer visits.
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// First customer after leaving the depot.
    pub fn first(&self) -> Option<usize> {
        self.customers.first().copied()
    }

    /// Last customer before returning to the depot.
    pub fn last(&self) -> Option<usize> {
        self.customers.last().copied()
    }

    /// Returns `true` if the route visits `customer`.
    pub fn contains(&self, customer: usize) -> bool {
        self.customers.contains(&customer)
    }

    /// Iterates over the legs `(from, to)` including both depot legs.
    pub fn legs(&self, depot: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let stops = std::iter::once(depot)
            .chain(self.customers.iter().copied())
            .chain(std::iter::once(depot));
        stops.clone().zip(stops.skip(1)).take(if self.is_empty() { 0 } else { self.len() + 1 })
    }

    /// Consumes the route, returning the customer indices.
    pub fn into_customers(self) -> Vec<usize> {
        self.customers
    }
}

impl From<Vec<usize>> for Route {
    fn from(customers: Vec<usize>) -> Self {
        Self::new(customers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_empty() {
        let r = Route::default();
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.first(), None);
        assert_eq!(r.legs(0).count(), 0);
    }

    #[test]
    fn test_route_legs() {
        let r = Route::new(vec![5, 3]);
        let legs: Vec<_> = r.legs(0).collect();
        assert_eq!(legs, vec![(0, 5), (5, 3), (3, 0)]);
    }

    #[test]
    fn test_route_single_legs() {
        let r = Route::from(vec![2]);
        let legs: Vec<_> = r.legs(0).collect();
        assert_eq!(legs, vec![(0, 2), (2, 0)]);
        assert!(r.contains(2));
        assert!(!r.contains(0));
    }
}
