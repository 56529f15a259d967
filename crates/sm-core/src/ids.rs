//! Strongly typed customer identifier.
//!
//! Ids are handed out by the simulation in strictly increasing order starting
//! at 1 and are never reused within a run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one simulated customer.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub u64);

impl CustomerId {
    /// The first id issued in a run.
    pub const FIRST: CustomerId = CustomerId(1);

    /// The id issued after `self`.
    #[inline]
    pub fn next(self) -> CustomerId {
        CustomerId(self.0 + 1)
    }
}

impl Default for CustomerId {
    #[inline]
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CustomerId> for u64 {
    #[inline]
    fn from(id: CustomerId) -> u64 {
        id.0
    }
}
