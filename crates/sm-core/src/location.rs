//! Floor-plan sections and the customer state machine's states.
//!
//! # Canonical ordering
//!
//! `Location::ALL` fixes the order `checkout, dairy, drinks, fruit, spices`
//! once for the whole workspace.  Every probability vector indexed by
//! location (transition rows, sampled categorical outcomes) is aligned to
//! this order through [`Location::index`].
//!
//! The synthetic `entrance` pre-state is not a `Location`: it
//! lives only in [`CustomerState::Entrance`], so a trajectory record (which
//! stores a `Location`) can never contain it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A floor-plan section a customer can be recorded at.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Checkout,
    Dairy,
    Drinks,
    Fruit,
    Spices,
}

impl Location {
    /// Number of real (non-entrance) locations.
    pub const COUNT: usize = 5;

    /// Canonical ordering shared by every positional probability vector.
    pub const ALL: [Location; Location::COUNT] = [
        Location::Checkout,
        Location::Dairy,
        Location::Drinks,
        Location::Fruit,
        Location::Spices,
    ];

    /// Position of `self` in [`Location::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`index`](Self::index).  `None` if `i >= COUNT`.
    #[inline]
    pub fn from_index(i: usize) -> Option<Location> {
        Location::ALL.get(i).copied()
    }

    /// `true` for the terminal state.
    #[inline]
    pub fn is_terminal(self) -> bool {
        self == Location::Checkout
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Location::Checkout => "checkout",
            Location::Dairy    => "dairy",
            Location::Drinks   => "drinks",
            Location::Fruit    => "fruit",
            Location::Spices   => "spices",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "checkout" => Ok(Location::Checkout),
            "dairy"    => Ok(Location::Dairy),
            "drinks"   => Ok(Location::Drinks),
            "fruit"    => Ok(Location::Fruit),
            "spices"   => Ok(Location::Spices),
            other => Err(CoreError::Parse(format!(
                "unknown location {other:?}: expected one of checkout, dairy, drinks, fruit, spices"
            ))),
        }
    }
}

// ── CustomerState ─────────────────────────────────────────────────────────────

/// The six states of a customer: the synthetic initial `Entrance` plus one
/// state per [`Location`], of which `At(Checkout)` is terminal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum CustomerState {
    #[default]
    Entrance,
    At(Location),
}

impl CustomerState {
    /// The recorded location, or `None` while still at the entrance.
    #[inline]
    pub fn location(self) -> Option<Location> {
        match self {
            CustomerState::Entrance => None,
            CustomerState::At(loc)  => Some(loc),
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, CustomerState::At(Location::Checkout))
    }
}

impl fmt::Display for CustomerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerState::Entrance => f.write_str("entrance"),
            CustomerState::At(loc)  => loc.fmt(f),
        }
    }
}
