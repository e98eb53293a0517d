//! Clarke-Wright savings algorithm.
//!
//! # Algorithm
//!
//! The savings algorithm (Clarke & Wright, 1964) starts with each customer
//! on its own route (depot → customer → depot). It then merges routes by
//! computing the "savings" of serving two customers consecutively instead of
//! in separate round trips:
//!
//! ```text
//! s(i, j) = d(0, i) + d(0, j) - d(i, j)
//! ```
//!
//! Routes are merged in decreasing order of savings, subject to capacity
//! constraints. Equal savings are processed in ascending `(i, j)` order
//! (`i < j`), so results are reproducible. Pairs with negative savings never
//! merge; they only occur with non-metric cost matrices.
//!
//! # Complexity
//!
//! O(n² log n) where n = number of customers (dominated by sorting savings).
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use crate::distance::CostMatrix;
use crate::error::{Result, RoutingError};
use crate::models::{CustomerSet, Route, Solution, SolveStatus, DEPOT};

/// A savings value for serving customers `i` and `j` consecutively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saving {
    /// Smaller customer index of the pair.
    pub i: usize,
    /// Larger customer index of the pair.
    pub j: usize,
    /// `d(0, i) + d(0, j) - d(i, j)`.
    pub value: f64,
}

/// Computes the savings of every unordered customer pair, in processing
/// order: descending value, ties by ascending `(i, j)`.
pub fn savings_list(costs: &CostMatrix) -> Vec<Saving> {
    let n = costs.size();
    let mut savings = Vec::with_capacity(n.saturating_sub(1) * n.saturating_sub(2) / 2);
    for i in 1..n {
        for j in (i + 1)..n {
            let value = costs.get(DEPOT, i) + costs.get(DEPOT, j) - costs.get(i, j);
            savings.push(Saving { i, j, value });
        }
    }
    // Stable sort keeps the generation order for ties.
    savings.sort_by(|a, b| b.value.total_cmp(&a.value));
    savings
}

/// One route in the merge arena.
#[derive(Debug, Default)]
struct RouteRecord {
    members: Vec<usize>,
    load: i64,
}

/// Constructs a CVRP solution using the Clarke-Wright savings algorithm.
///
/// Starts with one route per customer, then merges routes in order of
/// decreasing savings while respecting vehicle capacity. The fleet is
/// unbounded: the number of routes follows from the merges. Pairs with
/// negative savings are never merged; they only occur with non-metric
/// matrices.
///
/// # Errors
///
/// - [`RoutingError::InvalidParameter`] if `capacity` is not positive or the
///   matrix does not match the customer set.
/// - [`RoutingError::InfeasibleInstance`] if a single customer's demand
///   exceeds `capacity`.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Customer, CustomerSet};
/// use u_cvrp::distance::CostMatrix;
/// use u_cvrp::constructive::clarke_wright;
///
/// let customers = CustomerSet::new(vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 1.0, 0.0, 10),
///     Customer::new(2, 2.0, 0.0, 10),
///     Customer::new(3, 3.0, 0.0, 10),
/// ]).unwrap();
/// let costs = CostMatrix::from_customers(&customers).unwrap();
///
/// let solution = clarke_wright(&customers, &costs, 30).unwrap();
/// assert_eq!(solution.num_served(), 3);
/// assert_eq!(solution.num_vehicles(), 1);
/// ```
pub fn clarke_wright(
    customers: &CustomerSet,
    costs: &CostMatrix,
    capacity: i32,
) -> Result<Solution> {
    if capacity <= 0 {
        return Err(RoutingError::invalid_parameter(format!(
            "vehicle capacity must be positive, got {capacity}"
        )));
    }
    costs.check_compatible(customers)?;
    customers.check_single_demands(capacity)?;

    let n = customers.len();
    log::debug!(
        "clarke_wright: start customers={} capacity={capacity}",
        n - 1
    );

    // records[r] starts as the round trip to customer r; records[DEPOT] stays empty.
    let mut records: Vec<RouteRecord> = (0..n)
        .map(|c| {
            if c == DEPOT {
                RouteRecord::default()
            } else {
                RouteRecord {
                    members: vec![c],
                    load: i64::from(customers.demand(c)),
                }
            }
        })
        .collect();
    let mut route_of: Vec<usize> = (0..n).collect();
    let capacity_limit = i64::from(capacity);
    let mut merges = 0usize;

    for saving in savings_list(costs) {
        if saving.value < 0.0 {
            break;
        }

        let ri = route_of[saving.i];
        let rj = route_of[saving.j];
        if ri == rj {
            continue;
        }

        let combined_load = records[ri].load + records[rj].load;
        if combined_load > capacity_limit {
            continue;
        }

        // Both customers must sit next to the depot in their routes.
        let i_at_start = records[ri].members.first() == Some(&saving.i);
        let i_at_end = records[ri].members.last() == Some(&saving.i);
        let j_at_start = records[rj].members.first() == Some(&saving.j);
        let j_at_end = records[rj].members.last() == Some(&saving.j);

        let (merge_from, merge_into, reverse_from, reverse_into) = if i_at_end && j_at_start {
            (rj, ri, false, false)
        } else if j_at_end && i_at_start {
            (ri, rj, false, false)
        } else if i_at_end && j_at_end {
            (rj, ri, true, false)
        } else if i_at_start && j_at_start {
            (rj, ri, false, true)
        } else {
            continue;
        };

        let mut moved = std::mem::take(&mut records[merge_from]);
        if reverse_from {
            moved.members.reverse();
        }
        if reverse_into {
            records[merge_into].members.reverse();
        }
        for &c in &moved.members {
            route_of[c] = merge_into;
        }
        let into = &mut records[merge_into];
        into.members.append(&mut moved.members);
        into.load = combined_load;
        merges += 1;
    }

    let solution = Solution::from_routes(
        records
            .into_iter()
            .filter(|r| !r.members.is_empty())
            .map(|r| Route::new(r.members)),
        SolveStatus::Heuristic,
    );

    log::info!(
        "clarke_wright: done merges={merges} vehicles={} distance={:.3}",
        solution.num_vehicles(),
        solution.routes().map(|r| costs.route_length(r)).sum::<f64>()
    );
    Ok(solution)
}
