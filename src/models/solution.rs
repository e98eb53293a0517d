//! Solution type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Route, VehicleId};

/// How a solution was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Exact search completed; the solution is optimal for the given fleet.
    Optimal,
    /// Exact search hit its time limit; possibly suboptimal.
    TimeLimited,
    /// Produced by a constructive heuristic.
    Heuristic,
}

impl SolveStatus {
    /// Returns `true` if optimality was proven.
    pub fn is_optimal(self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }

    /// Returns `true` if the exact search stopped early.
    pub fn is_time_limited(self) -> bool {
        matches!(self, SolveStatus::TimeLimited)
    }
}

/// A set of vehicle routes keyed by vehicle, iterated in id order.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Route, Solution, SolveStatus, VehicleId};
///
/// let sol = Solution::from_routes(vec![Route::new(vec![1, 2]), Route::new(vec![3])], SolveStatus::Heuristic);
/// assert_eq!(sol.num_vehicles(), 2);
/// assert_eq!(sol.route(VehicleId(1)).unwrap().customers(), &[3]);
/// assert_eq!(sol.num_served(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    routes: BTreeMap<VehicleId, Route>,
    status: SolveStatus,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new(status: SolveStatus) -> Self {
        Self {
            routes: BTreeMap::new(),
            status,
        }
    }

    /// Numbers `routes` as vehicles `0, 1, ...` in the given order.
    pub fn from_routes(routes: impl IntoIterator<Item = Route>, status: SolveStatus) -> Self {
        Self {
            routes: routes
                .into_iter()
                .enumerate()
                .map(|(i, r)| (VehicleId(i), r))
                .collect(),
            status,
        }
    }

    /// Assigns `route` to `vehicle`, returning the route it replaces.
    pub fn insert(&mut self, vehicle: VehicleId, route: Route) -> Option<Route> {
        self.routes.insert(vehicle, route)
    }

    /// Vehicle routes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (VehicleId, &Route)> {
        self.routes.iter().map(|(&v, r)| (v, r))
    }

    /// Route of `vehicle`, if used.
    pub fn route(&self, vehicle: VehicleId) -> Option<&Route> {
        self.routes.get(&vehicle)
    }

    /// Routes in vehicle id order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    /// Number of vehicles used.
    pub fn num_vehicles(&self) -> usize {
        self.routes.len()
    }

    /// Total number of customer visits across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.values().map(Route::len).sum()
    }

    /// How this solution was obtained.
    pub fn status(&self) -> SolveStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_empty() {
        let sol = Solution::new(SolveStatus::Optimal);
        assert_eq!(sol.num_vehicles(), 0);
        assert_eq!(sol.num_served(), 0);
        assert!(sol.status().is_optimal());
    }

    #[test]
    fn test_iteration_in_id_order() {
        let mut sol = Solution::new(SolveStatus::Heuristic);
        sol.insert(VehicleId(2), Route::new(vec![4]));
        sol.insert(VehicleId(0), Route::new(vec![1, 3]));
        let ids: Vec<_> = sol.iter().map(|(v, _)| v).collect();
        assert_eq!(ids, vec![VehicleId(0), VehicleId(2)]);
        assert_eq!(sol.num_served(), 3);
    }

    #[test]
    fn test_insert_replaces() {
        let mut sol = Solution::new(SolveStatus::Heuristic);
        assert!(sol.insert(VehicleId(0), Route::new(vec![1])).is_none());
        let old = sol.insert(VehicleId(0), Route::new(vec![2]));
        assert_eq!(old, Some(Route::new(vec![1])));
    }

    #[test]
    fn test_status_flags() {
        assert!(SolveStatus::TimeLimited.is_time_limited());
        assert!(!SolveStatus::Heuristic.is_optimal());
    }
}
