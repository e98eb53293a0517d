//! Ordered, cumulative-distance walk over a solution.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distance::CostMatrix;
use crate::error::{Result, RoutingError};
use crate::evaluation::structural_violations;
use crate::models::{Solution, VehicleId, DEPOT};

/// One stop of a vehicle, with the distance it has driven so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Vehicle making the stop.
    pub vehicle: VehicleId,
    /// Customer index (0 for the depot at departure and return).
    pub customer: usize,
    /// Distance driven since leaving the depot, this leg included.
    pub cumulative_distance: f64,
}

/// Flat sequence of visits, vehicle by vehicle in id order.
///
/// Each vehicle contributes a depot visit at distance 0, one visit per
/// customer, and a final depot visit carrying the route length.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Customer, CustomerSet, Route, Solution, SolveStatus};
/// use u_cvrp::distance::CostMatrix;
/// use u_cvrp::tour::build_visit_trace;
///
/// let customers = CustomerSet::new(vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 3.0, 4.0, 10),
///     Customer::new(2, 6.0, 8.0, 20),
/// ]).unwrap();
/// let costs = CostMatrix::from_customers(&customers).unwrap();
/// let sol = Solution::from_routes(vec![Route::new(vec![1, 2])], SolveStatus::Heuristic);
///
/// let trace = build_visit_trace(&sol, &costs).unwrap();
/// let distances: Vec<f64> = trace.visits().iter().map(|v| v.cumulative_distance).collect();
/// assert_eq!(distances, vec![0.0, 5.0, 10.0, 20.0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitTrace {
    visits: Vec<Visit>,
}

impl VisitTrace {
    /// All visits in replay order.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Number of visits.
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Returns `true` if the trace holds no visits.
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Visits with index ≤ `step`; the whole trace once `step` runs past it.
    pub fn up_to(&self, step: usize) -> &[Visit] {
        let end = step.saturating_add(1).min(self.visits.len());
        &self.visits[..end]
    }

    /// Node paths driven by each vehicle after `step` replay steps, for
    /// drawing partial routes.
    pub fn paths_up_to(&self, step: usize) -> BTreeMap<VehicleId, Vec<usize>> {
        let mut paths: BTreeMap<VehicleId, Vec<usize>> = BTreeMap::new();
        for visit in self.up_to(step) {
            paths.entry(visit.vehicle).or_default().push(visit.customer);
        }
        paths
    }

    /// Visits of a single vehicle.
    pub fn vehicle_visits(&self, vehicle: VehicleId) -> impl Iterator<Item = &Visit> {
        self.visits.iter().filter(move |v| v.vehicle == vehicle)
    }

    /// Route length of `vehicle`, if it appears in the trace.
    pub fn vehicle_total(&self, vehicle: VehicleId) -> Option<f64> {
        self.vehicle_visits(vehicle)
            .last()
            .map(|v| v.cumulative_distance)
    }

    /// Vehicles in replay order.
    pub fn vehicles(&self) -> Vec<VehicleId> {
        let mut vehicles: Vec<VehicleId> = self.visits.iter().map(|v| v.vehicle).collect();
        vehicles.dedup();
        vehicles
    }

    /// Number of vehicles in the trace.
    pub fn num_vehicles(&self) -> usize {
        self.vehicles().len()
    }

    /// Sum of all route lengths.
    pub fn total_distance(&self) -> f64 {
        self.vehicles()
            .into_iter()
            .filter_map(|v| self.vehicle_total(v))
            .sum()
    }
}

impl fmt::Display for VisitTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for visit in &self.visits {
            writeln!(
                f,
                "{} {} {:.2}",
                visit.vehicle, visit.customer, visit.cumulative_distance
            )?;
        }
        Ok(())
    }
}

/// Walks every route of `solution` in vehicle id order, accumulating leg
/// costs from `costs`.
///
/// # Errors
///
/// [`RoutingError::CorruptSolution`] if a customer is missing, duplicated, or
/// unknown, or a route is empty or contains the depot.
pub fn build_visit_trace(solution: &Solution, costs: &CostMatrix) -> Result<VisitTrace> {
    let violations = structural_violations(solution, costs.size());
    if let Some(first) = violations.first() {
        return Err(RoutingError::corrupt(format!(
            "{:?} ({} violation(s) in total)",
            first.kind,
            violations.len()
        )));
    }

    let mut visits = Vec::with_capacity(solution.num_served() + 2 * solution.num_vehicles());
    for (vehicle, route) in solution.iter() {
        let mut driven = 0.0;
        visits.push(Visit {
            vehicle,
            customer: DEPOT,
            cumulative_distance: driven,
        });
        for (from, to) in route.legs(DEPOT) {
            driven += costs.get(from, to);
            visits.push(Visit {
                vehicle,
                customer: to,
                cumulative_distance: driven,
            });
        }
    }

    log::debug!(
        "tour: built trace visits={} vehicles={}",
        visits.len(),
        solution.num_vehicles()
    );
    Ok(VisitTrace { visits })
}
