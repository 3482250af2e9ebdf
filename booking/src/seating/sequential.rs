use super::{SeatPool, SeatingStrategy};
use crate::types::SeatNumber;

/// Hands out seats in pool order.
#[derive(Clone, Debug, Default)]
pub struct SequentialAllocation {
    pool: SeatPool,
}

impl SequentialAllocation {
    /// Creates the strategy over `seats`
    #[must_use]
    pub fn new<I, S>(seats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SeatNumber>,
    {
        Self {
            pool: SeatPool::new(seats),
        }
    }
}

impl SeatingStrategy for SequentialAllocation {
    fn pool(&self) -> &SeatPool {
        &self.pool
    }

    fn pool_mut(&mut self) -> &mut SeatPool {
        &mut self.pool
    }

    fn select(&self, count: usize) -> Vec<SeatNumber> {
        self.pool.seats().iter().take(count).cloned().collect()
    }

    fn name(&self) -> &'static str {
        "SEQUENTIAL"
    }

    fn description(&self) -> &'static str {
        "Sequential seat allocation in order"
    }
}
