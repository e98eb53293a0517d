use std::time::Duration;

use proptest::prelude::*;
use u_cvrp::constructive::clarke_wright;
use u_cvrp::distance::CostMatrix;
use u_cvrp::evaluation::{structural_violations, SolutionEvaluator};
use u_cvrp::exact::ExactSolver;
use u_cvrp::models::{CustomerSet, Position, SolveStatus};
use u_cvrp::tour::build_visit_trace;
use u_cvrp::RoutingError;

prop_compose! {
    fn instance(max_customers: usize)
    (
        points in prop::collection::vec((0.0..100.0f64, 0.0..100.0f64, 1..=20i32), 1..=max_customers),
        depot in (0.0..100.0f64, 0.0..100.0f64),
    ) -> CustomerSet {
        CustomerSet::from_points(Position::new(depot.0, depot.1), &points).expect("valid instance")
    }
}

proptest! {
    #[test]
    fn euclidean_matrix_is_symmetric_with_zero_diagonal(customers in instance(12)) {
        let costs = CostMatrix::from_customers(&customers).expect("placed");
        let positions = customers.positions().expect("placed");
        for i in 0..costs.size() {
            prop_assert_eq!(costs.get(i, i), 0.0);
            for j in 0..costs.size() {
                prop_assert_eq!(costs.get(i, j), costs.get(j, i));
                let expected = positions[i].distance_to(&positions[j]);
                prop_assert!((costs.get(i, j) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn clarke_wright_is_feasible_and_deterministic(customers in instance(15), capacity in 20..=80i32) {
        let costs = CostMatrix::from_customers(&customers).expect("placed");
        let first = clarke_wright(&customers, &costs, capacity).expect("all demands fit");
        let second = clarke_wright(&customers, &costs, capacity).expect("all demands fit");
        prop_assert_eq!(&first, &second);
        prop_assert!(SolutionEvaluator::new(&customers, &costs, capacity).is_feasible(&first));
        prop_assert!(structural_violations(&first, costs.size()).is_empty());
    }

    #[test]
    fn clarke_wright_fails_only_on_oversized_demand(customers in instance(10), capacity in 1..=25i32) {
        let costs = CostMatrix::from_customers(&customers).expect("placed");
        match clarke_wright(&customers, &costs, capacity) {
            Ok(solution) => {
                prop_assert!(customers.max_demand() <= capacity);
                prop_assert_eq!(solution.num_served(), customers.num_customers());
            }
            Err(RoutingError::InfeasibleInstance(_)) => {
                prop_assert!(customers.max_demand() > capacity);
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn visit_trace_accumulates_route_lengths(customers in instance(12), capacity in 20..=60i32) {
        let costs = CostMatrix::from_customers(&customers).expect("placed");
        let solution = clarke_wright(&customers, &costs, capacity).expect("feasible");
        let trace = build_visit_trace(&solution, &costs).expect("valid");

        for (vehicle, route) in solution.iter() {
            let visits: Vec<_> = trace.vehicle_visits(vehicle).collect();
            prop_assert_eq!(visits.len(), route.len() + 2);
            prop_assert_eq!(visits[0].cumulative_distance, 0.0);
            for pair in visits.windows(2) {
                prop_assert!(pair[1].cumulative_distance >= pair[0].cumulative_distance);
            }
            let last = visits[visits.len() - 1].cumulative_distance;
            prop_assert!((last - costs.route_length(route)).abs() < 1e-9);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn exact_is_feasible_and_no_worse_than_savings(customers in instance(6), capacity in 20..=50i32) {
        let costs = CostMatrix::from_customers(&customers).expect("placed");
        let evaluator = SolutionEvaluator::new(&customers, &costs, capacity);
        let heuristic = clarke_wright(&customers, &costs, capacity).expect("feasible");
        let outcome = ExactSolver::new(capacity, heuristic.num_vehicles(), Duration::from_secs(20))
            .solve(&customers, &costs)
            .expect("warm start fits the fleet");

        prop_assert!(evaluator.is_feasible(&outcome.solution));
        prop_assert!(outcome.solution.num_vehicles() <= heuristic.num_vehicles());
        prop_assert!(outcome.objective <= evaluator.total_distance(&heuristic) + 1e-9);
        if outcome.solution.status() == SolveStatus::Optimal {
            prop_assert!((evaluator.total_distance(&outcome.solution) - outcome.objective).abs() < 1e-6);
        }
    }
}
