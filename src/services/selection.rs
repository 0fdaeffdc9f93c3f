use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::seat_map::SeatMap;

/// Seats picked by the user on the reservation page, in click order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    seats: IndexSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the seat if absent, removes it if present. Occupied seats are
    /// left alone and `false` is returned.
    pub fn toggle(&mut self, seat_id: &str, occupied: bool) -> bool {
        if occupied {
            tracing::debug!(seat = %seat_id, "Ignoring toggle on occupied seat");
            return false;
        }

        if !self.seats.shift_remove(seat_id) {
            self.seats.insert(seat_id.to_string());
        }
        true
    }

    pub fn contains(&self, seat_id: &str) -> bool {
        self.seats.contains(seat_id)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.seats.iter()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.seats.iter().cloned().collect()
    }

    /// Sum of the selected seats' prices. Ids missing from `seat_map` count
    /// for nothing.
    pub fn total(&self, seat_map: &SeatMap) -> u32 {
        seat_map.resolve(self.ids()).iter().map(|s| s.price).sum()
    }

    /// Seats that are neither occupied nor selected
    pub fn free_count(&self, seat_map: &SeatMap) -> usize {
        seat_map
            .seats()
            .iter()
            .filter(|s| !s.occupied && !self.contains(&s.id))
            .count()
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            seats: iter.into_iter().map(Into::into).collect(),
        }
    }
}
