//! Constructive heuristics for building CVRP solutions.
//!
//! - [`clarke_wright`] — Clarke-Wright savings algorithm (1964), O(n² log n)

mod clarke_wright;

pub use clarke_wright::{clarke_wright, savings_list, Saving};
