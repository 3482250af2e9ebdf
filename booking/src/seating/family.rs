use super::{SeatPool, SeatingStrategy};
use crate::types::SeatNumber;
use std::collections::BTreeMap;

/// Keeps parties together by filling rows in ascending order.
///
/// Seats whose label has no row number sort after every numbered row.
#[derive(Clone, Debug, Default)]
pub struct FamilyAllocation {
    pool: SeatPool,
}

impl FamilyAllocation {
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

    fn seats_by_row(&self) -> BTreeMap<u32, Vec<&SeatNumber>> {
        let mut rows: BTreeMap<u32, Vec<&SeatNumber>> = BTreeMap::new();
        for seat in self.pool.seats() {
            rows.entry(seat.row().unwrap_or(u32::MAX)).or_default().push(seat);
        }
        rows
    }
}

impl SeatingStrategy for FamilyAllocation {
    fn pool(&self) -> &SeatPool {
        &self.pool
    }

    fn pool_mut(&mut self) -> &mut SeatPool {
        &mut self.pool
    }

    fn select(&self, count: usize) -> Vec<SeatNumber> {
        self.seats_by_row()
            .into_values()
            .flatten()
            .take(count)
            .cloned()
            .collect()
    }

    fn name(&self) -> &'static str {
        "FAMILY"
    }

    fn description(&self) -> &'static str {
        "Family-friendly allocation keeping passengers together"
    }
}
