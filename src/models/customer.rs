//! Customer and position types.

use serde::{Deserialize, Serialize};

/// A point on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a position from coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A customer (or depot) in a routing problem.
///
/// Customer 0 is the depot. A customer carries a demand and, unless the
/// instance comes with an externally supplied cost matrix, a position.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::Customer;
///
/// let depot = Customer::depot(35.0, 35.0);
/// assert_eq!(depot.id(), 0);
/// assert_eq!(depot.demand(), 0);
///
/// let c = Customer::new(1, 41.0, 49.0, 10);
/// assert_eq!(c.id(), 1);
/// assert_eq!(c.demand(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
    demand: i32,
}

impl Customer {
    /// Creates a customer located at `(x, y)`.
    pub fn new(id: usize, x: f64, y: f64, demand: i32) -> Self {
        Self {
            id,
            position: Some(Position::new(x, y)),
            demand,
        }
    }

    /// Creates a customer with no position, for use with an external matrix.
    pub fn unplaced(id: usize, demand: i32) -> Self {
        Self {
            id,
            position: None,
            demand,
        }
    }

    /// Creates a depot at the given coordinates (id=0, demand=0).
    pub fn depot(x: f64, y: f64) -> Self {
        Self::new(0, x, y, 0)
    }

    /// Customer ID (0 = depot).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Location, if the customer was placed on the plane.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Demand at this customer.
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// Returns `true` for the depot.
    pub fn is_depot(&self) -> bool {
        self.id == 0
    }

    /// Euclidean distance to another customer, when both are placed.
    pub fn distance_to(&self, other: &Customer) -> Option<f64> {
        Some(self.position?.distance_to(&other.position?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_new() {
        let c = Customer::new(1, 10.0, 20.0, 5);
        assert_eq!(c.id(), 1);
        assert_eq!(c.position(), Some(Position::new(10.0, 20.0)));
        assert_eq!(c.demand(), 5);
        assert!(!c.is_depot());
    }

    #[test]
    fn test_customer_depot() {
        let d = Customer::depot(35.0, 35.0);
        assert_eq!(d.id(), 0);
        assert_eq!(d.demand(), 0);
        assert!(d.is_depot());
    }

    #[test]
    fn test_customer_distance() {
        let a = Customer::new(0, 0.0, 0.0, 0);
        let b = Customer::new(1, 3.0, 4.0, 0);
        let d = a.distance_to(&b).expect("both placed");
        assert!((d - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_customer_distance_symmetric() {
        let a = Customer::new(0, 1.0, 2.0, 0);
        let b = Customer::new(1, 4.0, 6.0, 0);
        let ab = a.distance_to(&b).expect("placed");
        let ba = b.distance_to(&a).expect("placed");
        assert!((ab - ba).abs() < 1e-10);
    }

    #[test]
    fn test_unplaced_has_no_distance() {
        let a = Customer::unplaced(1, 4);
        let b = Customer::new(2, 0.0, 0.0, 3);
        assert!(a.position().is_none());
        assert!(a.distance_to(&b).is_none());
    }

    #[test]
    fn test_serde_skips_missing_position() {
        let json = serde_json::to_string(&Customer::unplaced(3, 7)).expect("serialize");
        assert_eq!(json, r#"{"id":3,"demand":7}"#);
        let back: Customer = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Customer::unplaced(3, 7));
    }
}
