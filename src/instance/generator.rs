//! Uniform random instance generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::InstanceConfig;
use crate::error::Result;
use crate::models::{Customer, CustomerSet};

/// Generates a random instance on a square grid.
///
/// The depot sits at the grid centre; customers are placed uniformly in
/// `[0, side]²` with integer demands drawn uniformly from
/// `[min_demand, max_demand]`.
///
/// # Examples
///
/// ```
/// use u_cvrp::config::InstanceConfig;
/// use u_cvrp::instance::generate_instance;
/// use rand::SeedableRng;
///
/// let config = InstanceConfig { num_customers: 5, ..InstanceConfig::default() };
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let set = generate_instance(&config, &mut rng).unwrap();
/// assert_eq!(set.num_customers(), 5);
/// ```
pub fn generate_instance<R: Rng>(config: &InstanceConfig, rng: &mut R) -> Result<CustomerSet> {
    config.validate()?;

    let centre = config.side / 2.0;
    let mut customers = Vec::with_capacity(config.num_customers + 1);
    customers.push(Customer::depot(centre, centre));
    for id in 1..=config.num_customers {
        let x = rng.random_range(0.0..=config.side);
        let y = rng.random_range(0.0..=config.side);
        let demand = rng.random_range(config.min_demand..=config.max_demand);
        customers.push(Customer::new(id, x, y, demand));
    }

    log::debug!(
        "instance: generated customers={} side={} demand=({}, {})",
        config.num_customers,
        config.side,
        config.min_demand,
        config.max_demand
    );
    CustomerSet::new(customers)
}

/// Generates an instance from `config.seed`, or from OS entropy if unset.
pub fn generate_seeded(config: &InstanceConfig) -> Result<CustomerSet> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    generate_instance(config, &mut rng)
}
