//! A single shopper's state machine.

use sm_core::{CustomerId, CustomerState, Location, SimRng};
use sm_model::TransitionModel;

use crate::{SimError, SimResult};

/// One customer inside the store.
///
/// Starts at [`CustomerState::Entrance`]; every call to [`advance`](Self::advance)
/// moves it to a real [`Location`].  `checkout` is terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Customer {
    pub id:    CustomerId,
    pub state: CustomerState,
}

impl Customer {
    pub fn new(id: CustomerId) -> Self {
        Self { id, state: CustomerState::Entrance }
    }

    /// Draw and enter the next location.
    ///
    /// From the entrance the first placement comes from the checkout row of
    /// `model`; any other non-terminal location uses its own row.
    pub fn advance(&mut self, model: &TransitionModel, rng: &mut SimRng) -> SimResult<Location> {
        let next = match self.state {
            CustomerState::Entrance                        => model.sample_entry(rng),
            CustomerState::At(from) if !from.is_terminal() => model.sample(from, rng),
            CustomerState::At(_)                           => return Err(SimError::CustomerExited(self.id)),
        };
        self.state = CustomerState::At(next);
        Ok(next)
    }

    #[inline]
    pub fn location(&self) -> Option<Location> {
        self.state.location()
    }

    #[inline]
    pub fn is_checked_out(&self) -> bool {
        self.state.is_terminal()
    }
}
