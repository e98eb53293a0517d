//! Vehicle identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable integer identifier of a vehicle in a solution.
///
/// Solvers number vehicles from 0. Letter labels are for display only.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::VehicleId;
///
/// assert_eq!(VehicleId(0).label(), "A");
/// assert_eq!(VehicleId(25).label(), "Z");
/// assert_eq!(VehicleId(26).label(), "V26");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VehicleId(pub usize);

impl VehicleId {
    /// Numeric index of this vehicle.
    pub fn index(self) -> usize {
        self.0
    }

    /// Human-readable label: `A`..`Z`, then `V26`, `V27`, ...
    pub fn label(self) -> String {
        match u8::try_from(self.0) {
            Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
            _ => format!("V{}", self.0),
        }
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<usize> for VehicleId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}
