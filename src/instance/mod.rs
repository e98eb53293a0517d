//! Random problem instances.

mod generator;

pub use generator::{generate_instance, generate_seeded};
