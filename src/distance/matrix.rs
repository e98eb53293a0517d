//! Dense cost matrix.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};
use crate::models::{CustomerSet, Route, DEPOT};

/// Tolerance used when checking externally supplied matrices.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A dense n×n cost matrix stored in row-major order.
///
/// Invariants: square, non-negative, finite, zero diagonal, symmetric.
/// Matrices computed from positions hold Euclidean distances; matrices
/// supplied from outside only need to satisfy the invariants.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Customer, CustomerSet};
/// use u_cvrp::distance::CostMatrix;
///
/// let customers = CustomerSet::new(vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 3.0, 4.0, 10),
///     Customer::new(2, 6.0, 8.0, 20),
/// ]).unwrap();
/// let costs = CostMatrix::from_customers(&customers).unwrap();
/// assert!((costs.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(costs.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct CostMatrix {
    data: Vec<f64>,
    size: usize,
}

impl CostMatrix {
    /// Computes a Euclidean cost matrix from customer positions.
    ///
    /// Fails if any location has no position.
    pub fn from_customers(customers: &CustomerSet) -> Result<Self> {
        let positions = customers.positions().ok_or_else(|| {
            RoutingError::invalid_parameter(
                "customer positions are required to derive a Euclidean matrix",
            )
        })?;
        let n = positions.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = positions[i].distance_to(&positions[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Ok(Self { data, size: n })
    }

    /// Accepts an explicit n×n grid in row-major order.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self> {
        if size == 0 {
            return Err(RoutingError::invalid_parameter("cost matrix is empty"));
        }
        if data.len() != size * size {
            return Err(RoutingError::invalid_parameter(format!(
                "cost matrix of size {size} needs {} entries, got {}",
                size * size,
                data.len()
            )));
        }
        let matrix = Self { data, size };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Accepts an explicit matrix given as rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(RoutingError::invalid_parameter(format!(
                "cost matrix is not square: row {i} has {} entries, expected {size}",
                row.len()
            )));
        }
        Self::from_data(size, rows.into_iter().flatten().collect())
    }

    fn validate(&self) -> Result<()> {
        for i in 0..self.size {
            if self.get(i, i) != 0.0 {
                return Err(RoutingError::invalid_parameter(format!(
                    "cost matrix diagonal entry ({i}, {i}) is {}",
                    self.get(i, i)
                )));
            }
            for j in 0..self.size {
                let c = self.get(i, j);
                if !c.is_finite() || c < 0.0 {
                    return Err(RoutingError::invalid_parameter(format!(
                        "cost ({i}, {j}) = {c} is not a finite non-negative number"
                    )));
                }
            }
        }
        if !self.is_symmetric(SYMMETRY_TOLERANCE) {
            return Err(RoutingError::invalid_parameter("cost matrix is not symmetric"));
        }
        Ok(())
    }

    /// Returns the cost from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Row `from` of the matrix.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Length of `route`, including both depot legs.
    pub fn route_length(&self, route: &Route) -> f64 {
        route.legs(DEPOT).map(|(a, b)| self.get(a, b)).sum()
    }

    /// Fails unless this matrix has one row per location of `customers`.
    pub fn check_compatible(&self, customers: &CustomerSet) -> Result<()> {
        if self.size != customers.len() {
            return Err(RoutingError::invalid_parameter(format!(
                "cost matrix has size {} but the customer set has {} locations",
                self.size,
                customers.len()
            )));
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<f64>>> for CostMatrix {
    type Error = RoutingError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<CostMatrix> for Vec<Vec<f64>> {
    fn from(matrix: CostMatrix) -> Self {
        matrix.data.chunks(matrix.size).map(<[f64]>::to_vec).collect()
    }
}
