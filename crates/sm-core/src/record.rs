//! The `(timestamp, customer, location)` tuple emitted by the simulation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{CustomerId, Location};

/// One row of the trajectory log.
///
/// Field order is the sort and serialisation order; equality is exact tuple
/// equality, which the log uses for de-duplication.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    #[serde(with = "crate::timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "customer_no")]
    pub customer:  CustomerId,
    pub location:  Location,
}

impl TrajectoryRecord {
    #[inline]
    pub fn new(timestamp: NaiveDateTime, customer: CustomerId, location: Location) -> Self {
        Self { timestamp, customer, location }
    }
}
