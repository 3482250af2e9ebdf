use super::{SeatPool, SeatingStrategy};
use crate::types::SeatNumber;

/// Window seats (columns A and F) first, then the rest, each in pool order.
#[derive(Clone, Debug, Default)]
pub struct WindowPriority {
    pool: SeatPool,
}

impl WindowPriority {
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

impl SeatingStrategy for WindowPriority {
    fn pool(&self) -> &SeatPool {
        &self.pool
    }

    fn pool_mut(&mut self) -> &mut SeatPool {
        &mut self.pool
    }

    fn select(&self, count: usize) -> Vec<SeatNumber> {
        let (window, other): (Vec<_>, Vec<_>) =
            self.pool.seats().iter().partition(|seat| seat.is_window());
        window.into_iter().chain(other).take(count).cloned().collect()
    }

    fn name(&self) -> &'static str {
        "WINDOW_PRIORITY"
    }

    fn description(&self) -> &'static str {
        "Window seats allocated first, then other seats"
    }
}
