//! Domain model types for capacitated vehicle routing.
//!
//! Provides customers with positions and demands, the validated customer
//! set (depot at index 0), vehicle identifiers, routes, and solutions.

mod customer;
mod customer_set;
mod route;
mod solution;
mod vehicle;

pub use customer::{Customer, Position};
pub use customer_set::{CustomerSet, DEPOT};
pub use route::Route;
pub use solution::{Solution, SolveStatus};
pub use vehicle::VehicleId;
