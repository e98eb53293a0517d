//! Cost matrices.
//!
//! Provides a dense, symmetric cost matrix derived from customer positions
//! or supplied from outside.

mod matrix;

pub use matrix::{CostMatrix, SYMMETRY_TOLERANCE};
