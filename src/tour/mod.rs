//! Stepwise replay of solutions.
//!
//! Turns a [`Solution`](crate::models::Solution) into a [`VisitTrace`]: the
//! per-vehicle sequence of stops with cumulative driven distance, which
//! renderers index by step to draw partial tours.

mod trace;

pub use trace::{build_visit_trace, Visit, VisitTrace};
