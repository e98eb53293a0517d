//! Exact CVRP solving under a wall-clock budget.
//!
//! - [`ArcModel`] — arc formulation: degree, fleet-size, and capacity
//!   constraints over binary arc decisions
//! - [`ArcSelection`] — an assignment of arcs and its route reconstruction
//! - [`ExactSolver`] — depth-first branch-and-bound, warm-started with the
//!   Clarke-Wright solution when it fits the fleet
//!
//! If the search completes, the returned solution is optimal for the given
//! capacity and fleet size. If the budget runs out first, the best incumbent
//! is returned flagged [`SolveStatus::TimeLimited`].

mod limit;
mod model;
mod search;

use std::time::Duration;

pub use limit::TimeLimit;
pub use model::{ArcModel, ArcSelection};
pub use search::{SearchStatistics, TerminationReason};

use crate::config::SolverConfig;
use crate::constructive::clarke_wright;
use crate::distance::CostMatrix;
use crate::error::{Result, RoutingError};
use crate::models::{CustomerSet, Solution, SolveStatus};
use search::BranchAndBound;

/// Result of an exact solve.
#[derive(Debug, Clone)]
pub struct ExactOutcome {
    /// Routes reconstructed from the best arc selection.
    pub solution: Solution,
    /// Total cost of `solution`.
    pub objective: f64,
    /// Why the search stopped.
    pub reason: TerminationReason,
    /// Search counters.
    pub statistics: SearchStatistics,
}

/// Exact solver for a fixed capacity, fleet size, and time limit.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_cvrp::models::{CustomerSet, Position};
/// use u_cvrp::distance::CostMatrix;
/// use u_cvrp::exact::ExactSolver;
///
/// let customers = CustomerSet::from_points(
///     Position::new(0.0, 0.0),
///     &[(10.0, 0.0, 5), (0.0, 10.0, 5), (10.0, 10.0, 5)],
/// ).unwrap();
/// let costs = CostMatrix::from_customers(&customers).unwrap();
///
/// let outcome = ExactSolver::new(100, 2, Duration::from_secs(5))
///     .solve(&customers, &costs)
///     .unwrap();
/// assert!(outcome.solution.status().is_optimal());
/// assert!((outcome.objective - 40.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct ExactSolver {
    capacity: i32,
    max_vehicles: usize,
    time_limit: Duration,
    warm_start: bool,
}

impl ExactSolver {
    /// Creates a solver with capacity `Q`, at most `K` vehicles, and a budget.
    pub fn new(capacity: i32, max_vehicles: usize, time_limit: Duration) -> Self {
        Self {
            capacity,
            max_vehicles,
            time_limit,
            warm_start: true,
        }
    }

    /// Creates a solver from validated configuration.
    pub fn from_config(config: &SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.capacity,
            config.max_vehicles,
            config.time_limit()?,
        ))
    }

    /// Starts the search without a Clarke-Wright incumbent.
    pub fn without_warm_start(mut self) -> Self {
        self.warm_start = false;
        self
    }

    /// Solves the instance.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::InvalidParameter`] for a non-positive capacity, zero
    ///   vehicles, a zero time limit, or a mismatched matrix.
    /// - [`RoutingError::InfeasibleInstance`] if no assignment to at most `K`
    ///   vehicles exists.
    /// - [`RoutingError::Unsolved`] if the budget ran out before any feasible
    ///   solution was found.
    pub fn solve(&self, customers: &CustomerSet, costs: &CostMatrix) -> Result<ExactOutcome> {
        if self.time_limit.is_zero() {
            return Err(RoutingError::invalid_parameter("time limit must be positive"));
        }
        let limit = TimeLimit::new(self.time_limit);
        let model = ArcModel::new(customers, costs, self.capacity, self.max_vehicles)?;
        model.check_feasibility()?;
        self.run(&model, limit, customers, costs)
    }

    fn run(
        &self,
        model: &ArcModel<'_>,
        limit: TimeLimit,
        customers: &CustomerSet,
        costs: &CostMatrix,
    ) -> Result<ExactOutcome> {
        log::debug!(
            "exact: start customers={} capacity={} max_vehicles={} time_limit={:.1}s",
            model.num_nodes() - 1,
            self.capacity,
            self.max_vehicles,
            self.time_limit.as_secs_f64()
        );

        let mut search = BranchAndBound::new(model, limit);
        if self.warm_start {
            let seed = clarke_wright(customers, costs, self.capacity)?;
            if seed.num_vehicles() <= self.max_vehicles {
                let routes: Vec<_> = seed.routes().cloned().collect();
                let arcs = ArcSelection::from_routes(model.num_nodes(), &routes);
                let cost = arcs.objective(costs);
                log::debug!("exact: warm start objective={cost:.3}");
                search = search.with_incumbent(arcs, cost);
            }
        }

        let outcome = search.run();
        let statistics = outcome.statistics;
        let reason = outcome.reason;

        let Some((arcs, objective)) = outcome.best else {
            return Err(match reason {
                TerminationReason::TimeLimitReached => RoutingError::unsolved(format!(
                    "no feasible solution found within {:.1}s",
                    self.time_limit.as_secs_f64()
                )),
                _ => RoutingError::infeasible(format!(
                    "no assignment to at most {} vehicles of capacity {} exists",
                    self.max_vehicles, self.capacity
                )),
            });
        };

        let status = match reason {
            TerminationReason::TimeLimitReached => {
                log::warn!(
                    "exact: time limit reached, returning incumbent objective={objective:.3} (possibly suboptimal)"
                );
                SolveStatus::TimeLimited
            }
            _ => SolveStatus::Optimal,
        };
        let solution = Solution::from_routes(arcs.routes()?, status);

        log::info!(
            "exact: done reason={reason} objective={objective:.3} vehicles={} {statistics}",
            solution.num_vehicles()
        );
        Ok(ExactOutcome {
            solution,
            objective,
            reason,
            statistics,
        })
    }
}

/// Solves the instance exactly with at most `max_vehicles` vehicles of
/// capacity `capacity`, stopping after `time_limit`.
///
/// A time-limited result carries [`SolveStatus::TimeLimited`].
pub fn solve_exact(
    customers: &CustomerSet,
    costs: &CostMatrix,
    capacity: i32,
    max_vehicles: usize,
    time_limit: Duration,
) -> Result<Solution> {
    ExactSolver::new(capacity, max_vehicles, time_limit)
        .solve(customers, costs)
        .map(|outcome| outcome.solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::SolutionEvaluator;
    use crate::models::{Position, Route, VehicleId};

    fn instance(points: &[(f64, f64, i32)]) -> (CustomerSet, CostMatrix) {
        let customers = CustomerSet::from_points(Position::new(0.0, 0.0), points).expect("valid");
        let costs = CostMatrix::from_customers(&customers).expect("placed");
        (customers, costs)
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_square_optimal() {
        let (customers, costs) = instance(&[(10.0, 0.0, 5), (0.0, 10.0, 5), (10.0, 10.0, 5)]);
        let outcome = ExactSolver::new(100, 3, secs(10))
            .solve(&customers, &costs)
            .expect("feasible");
        assert_eq!(outcome.reason, TerminationReason::OptimalityProven);
        assert_eq!(outcome.solution.num_vehicles(), 1);
        assert!((outcome.objective - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_cold_start_matches_warm_start() {
        let (customers, costs) = instance(&[
            (12.0, 3.0, 7),
            (-4.0, 9.0, 9),
            (5.0, -8.0, 6),
            (-7.0, -6.0, 8),
            (9.0, 9.0, 5),
        ]);
        let warm = ExactSolver::new(15, 4, secs(10))
            .solve(&customers, &costs)
            .expect("feasible");
        let cold = ExactSolver::new(15, 4, secs(10))
            .without_warm_start()
            .solve(&customers, &costs)
            .expect("feasible");
        assert!((warm.objective - cold.objective).abs() < 1e-9);
        assert!(SolutionEvaluator::new(&customers, &costs, 15).is_feasible(&cold.solution));
    }

    #[test]
    fn test_exact_never_worse_than_heuristic() {
        let (customers, costs) = instance(&[
            (20.0, 5.0, 10),
            (18.0, -3.0, 12),
            (-15.0, 10.0, 9),
            (-12.0, 14.0, 11),
            (2.0, -20.0, 8),
            (6.0, -17.0, 7),
        ]);
        let heuristic = clarke_wright(&customers, &costs, 30).expect("feasible");
        let evaluator = SolutionEvaluator::new(&customers, &costs, 30);
        let exact = solve_exact(&customers, &costs, 30, heuristic.num_vehicles(), secs(10))
            .expect("feasible");
        assert!(evaluator.is_feasible(&exact));
        assert!(
            evaluator.total_distance(&exact) <= evaluator.total_distance(&heuristic) + 1e-9
        );
    }

    #[test]
    fn test_respects_fleet_size() {
        let (customers, costs) = instance(&[(10.0, 0.0, 10), (-10.0, 0.0, 10), (0.0, 10.0, 10)]);
        let solution = solve_exact(&customers, &costs, 20, 2, secs(10)).expect("feasible");
        assert!(solution.num_vehicles() <= 2);
        assert!(SolutionEvaluator::new(&customers, &costs, 20).is_feasible(&solution));
    }

    #[test]
    fn test_single_vehicle_over_capacity() {
        let (customers, costs) = instance(&[(10.0, 0.0, 40), (0.0, 10.0, 40)]);
        let err = solve_exact(&customers, &costs, 50, 1, secs(5)).expect_err("infeasible");
        assert!(matches!(err, RoutingError::InfeasibleInstance(_)));
    }

    #[test]
    fn test_demand_above_capacity() {
        let (customers, costs) = instance(&[(10.0, 0.0, 5), (0.0, 10.0, 5)]);
        let err = solve_exact(&customers, &costs, 4, 3, secs(5)).expect_err("infeasible");
        assert!(matches!(err, RoutingError::InfeasibleInstance(_)));
    }

    #[test]
    fn test_packing_infeasible_reported() {
        let (customers, costs) = instance(&[(1.0, 0.0, 60), (2.0, 0.0, 60), (3.0, 0.0, 60)]);
        let err = solve_exact(&customers, &costs, 100, 2, secs(5)).expect_err("infeasible");
        assert!(matches!(err, RoutingError::InfeasibleInstance(_)));
    }

    #[test]
    fn test_invalid_parameters() {
        let (customers, costs) = instance(&[(1.0, 0.0, 1)]);
        for solver in [
            ExactSolver::new(0, 1, secs(1)),
            ExactSolver::new(10, 0, secs(1)),
            ExactSolver::new(10, 1, Duration::ZERO),
        ] {
            assert!(matches!(
                solver.solve(&customers, &costs),
                Err(RoutingError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_time_limited_flag() {
        let (customers, costs) = instance(&[(1.0, 0.0, 1), (2.0, 0.0, 1), (3.0, 0.0, 1)]);
        let solver = ExactSolver::new(10, 3, secs(1));
        let model = ArcModel::new(&customers, &costs, 10, 3).expect("valid");
        let limit = TimeLimit::with_clock_check_mask(Duration::ZERO, 0);
        let outcome = solver
            .run(&model, limit, &customers, &costs)
            .expect("warm start kept");
        assert_eq!(outcome.reason, TerminationReason::TimeLimitReached);
        assert_eq!(outcome.solution.status(), SolveStatus::TimeLimited);
        assert_eq!(outcome.solution.num_served(), 3);
    }

    #[test]
    fn test_warm_start_counts_against_budget() {
        let (customers, costs) = instance(&[(1.0, 0.0, 1), (2.0, 0.0, 1), (3.0, 0.0, 1)]);
        let solver = ExactSolver::new(10, 3, Duration::from_millis(20));
        let model = ArcModel::new(&customers, &costs, 10, 3).expect("valid");
        let limit = TimeLimit::with_clock_check_mask(Duration::from_millis(20), 0);
        std::thread::sleep(Duration::from_millis(40));
        let outcome = solver
            .run(&model, limit, &customers, &costs)
            .expect("warm start kept");
        assert_eq!(outcome.reason, TerminationReason::TimeLimitReached);
        assert!(outcome.statistics.elapsed >= Duration::from_millis(40));
    }

    #[test]
    fn test_oversized_fleet_is_not_infeasible() {
        let (customers, costs) = instance(&[(3.0, 4.0, 5)]);
        let solution =
            solve_exact(&customers, &costs, 10, usize::MAX, secs(1)).expect("one vehicle suffices");
        assert_eq!(solution.num_vehicles(), 1);
        assert!(solution.status().is_optimal());
    }

    #[test]
    fn test_time_limit_without_incumbent_is_unsolved() {
        let (customers, costs) = instance(&[(1.0, 0.0, 1), (2.0, 0.0, 1)]);
        let solver = ExactSolver::new(10, 2, secs(1)).without_warm_start();
        let model = ArcModel::new(&customers, &costs, 10, 2).expect("valid");
        let limit = TimeLimit::with_clock_check_mask(Duration::ZERO, 0);
        let err = solver
            .run(&model, limit, &customers, &costs)
            .expect_err("nothing found");
        assert!(matches!(err, RoutingError::Unsolved(_)));
    }

    #[test]
    fn test_external_matrix() {
        let customers = CustomerSet::from_demands(&[3, 3, 3]).expect("valid");
        // Customers 1 and 2 are close, 3 is far from both.
        let costs = CostMatrix::from_rows(vec![
            vec![0.0, 4.0, 4.0, 5.0],
            vec![4.0, 0.0, 1.0, 8.0],
            vec![4.0, 1.0, 0.0, 8.0],
            vec![5.0, 8.0, 8.0, 0.0],
        ])
        .expect("valid");
        let outcome = ExactSolver::new(6, 2, secs(5))
            .solve(&customers, &costs)
            .expect("feasible");
        // [1, 2] = 9, [3] = 10
        assert!((outcome.objective - 19.0).abs() < 1e-9);
        assert_eq!(
            outcome.solution.route(VehicleId(0)),
            Some(&Route::new(vec![1, 2]))
        );
    }

    #[test]
    fn test_from_config() {
        let config = SolverConfig {
            capacity: 0,
            ..SolverConfig::default()
        };
        assert!(ExactSolver::from_config(&config).is_err());
        assert!(ExactSolver::from_config(&SolverConfig::default()).is_ok());

        let huge = SolverConfig {
            time_limit_secs: 1e30,
            ..SolverConfig::default()
        };
        assert!(matches!(
            ExactSolver::from_config(&huge),
            Err(RoutingError::InvalidParameter(_))
        ));
    }
}
