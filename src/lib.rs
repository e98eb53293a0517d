//! # u-cvrp
//!
//! Capacitated vehicle routing: an exact branch-and-bound solver under a
//! time budget, the Clarke-Wright savings heuristic, and a tour builder that
//! turns either solver's routes into a stepwise, cumulative-distance replay.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Customer, CustomerSet, Route, Solution)
//! - [`distance`] — Symmetric cost matrix, Euclidean or externally supplied
//! - [`evaluation`] — Coverage and capacity checking, cost evaluation
//! - [`constructive`] — Clarke-Wright savings heuristic
//! - [`exact`] — Arc formulation solved by time-limited branch-and-bound
//! - [`tour`] — Visit traces for stepwise replay
//! - [`instance`] — Random instance generation
//! - [`config`] — Serde-backed configuration
//! - [`error`] — Crate error type

pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod exact;
pub mod instance;
pub mod models;
pub mod tour;

pub use error::{Result, RoutingError};
