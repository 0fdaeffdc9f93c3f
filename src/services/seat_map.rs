//! Auditorium layout: turns per-row seat masks into seats.
//!
//! A row mask is a fixed-width string where `1` is a seat and `0` a gap.
//! Rows are lettered from `A`, seats numbered from 1 within each row, and
//! gaps never consume a number.

use std::collections::HashMap;

use indexmap::IndexMap;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::models::{Seat, SeatTier};

/// Auditorium contour, front row first
pub const DEFAULT_ROW_MASKS: [&str; 7] = [
    "0011111111111000", // A
    "0011111111111000", // B
    "0011111111111000", // C
    "0001111111110000", // D
    "0001111111110000", // E
    "0000111111100000", // F
    "0000111111100000", // G
];

pub const DEFAULT_PREMIUM_ROWS: [char; 2] = ['D', 'E'];
pub const DEFAULT_VIP_ROWS: [char; 2] = ['F', 'G'];

const MAX_ROWS: usize = 26;

/// Invalid layout description. Raised at startup, never per request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,

    #[error("layout has {0} rows, at most 26 can be lettered")]
    TooManyRows(usize),

    #[error("row {row} is {found} columns wide, expected {expected}")]
    UnevenRow {
        row: char,
        expected: usize,
        found: usize,
    },

    #[error("row {row} contains {found:?}, only '0' and '1' are allowed")]
    InvalidCharacter { row: char, found: char },
}

/// Validated layout description
#[derive(Debug, Clone, PartialEq)]
pub struct SeatLayout {
    masks: Vec<String>,
    premium_rows: Vec<char>,
    vip_rows: Vec<char>,
    columns: usize,
}

fn row_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

impl SeatLayout {
    /// Validates the masks and tier tables
    pub fn new<I, S>(masks: I, premium_rows: &[char], vip_rows: &[char]) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let masks: Vec<String> = masks.into_iter().map(Into::into).collect();

        let first = masks.first().ok_or(LayoutError::Empty)?;
        if masks.len() > MAX_ROWS {
            return Err(LayoutError::TooManyRows(masks.len()));
        }

        let columns = first.chars().count();
        for (index, mask) in masks.iter().enumerate() {
            let row = row_letter(index);
            let found = mask.chars().count();
            if found != columns {
                return Err(LayoutError::UnevenRow {
                    row,
                    expected: columns,
                    found,
                });
            }
            if let Some(found) = mask.chars().find(|c| *c != '0' && *c != '1') {
                return Err(LayoutError::InvalidCharacter { row, found });
            }
        }

        Ok(Self {
            masks,
            premium_rows: premium_rows.to_vec(),
            vip_rows: vip_rows.to_vec(),
            columns,
        })
    }

    /// The seven-row auditorium with premium rows D-E and VIP rows F-G
    pub fn cinema_default() -> Result<Self, LayoutError> {
        Self::new(DEFAULT_ROW_MASKS, &DEFAULT_PREMIUM_ROWS, &DEFAULT_VIP_ROWS)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// VIP membership wins over premium; everything else is standard
    pub fn tier_for(&self, row: char) -> SeatTier {
        if self.vip_rows.contains(&row) {
            SeatTier::Vip
        } else if self.premium_rows.contains(&row) {
            SeatTier::Premium
        } else {
            SeatTier::Standard
        }
    }

    /// Builds the seat map, marking each seat occupied with probability
    /// `occupancy_rate`. Occupancy differs from one build to the next.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R, occupancy_rate: f64) -> SeatMap {
        let rate = occupancy_rate.clamp(0.0, 1.0);
        self.assemble(|_| rng.gen_bool(rate))
    }

    /// Builds the seat map with every seat free, for id → price lookups
    pub fn catalog(&self) -> SeatMap {
        self.assemble(|_| false)
    }

    /// Builds the seat map with exactly the seats in `occupied_ids` taken.
    /// Ids that name no seat are ignored.
    pub fn with_occupied(&self, occupied_ids: &[String]) -> SeatMap {
        self.assemble(|id| occupied_ids.iter().any(|taken| taken == id))
    }

    fn assemble(&self, mut occupied: impl FnMut(&str) -> bool) -> SeatMap {
        let mut seats = Vec::new();

        for (row_index, mask) in self.masks.iter().enumerate() {
            let row = row_letter(row_index);
            let tier = self.tier_for(row);
            let mut number = 1;

            for (column, bit) in mask.chars().enumerate() {
                if bit == '1' {
                    let mut seat = Seat::new(row, column, number, tier, false);
                    seat.occupied = occupied(&seat.id);
                    seats.push(seat);
                    number += 1;
                }
            }
        }

        SeatMap::new(seats, self.columns)
    }
}

/// Ordered seats of one showing
#[derive(Debug, Clone, Serialize)]
pub struct SeatMap {
    seats: Vec<Seat>,
    columns: usize,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl SeatMap {
    fn new(seats: Vec<Seat>, columns: usize) -> Self {
        let index = seats
            .iter()
            .enumerate()
            .map(|(i, seat)| (seat.id.clone(), i))
            .collect();

        Self {
            seats,
            columns,
            index,
        }
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Seat> {
        self.index.get(id).map(|&i| &self.seats[i])
    }

    /// Seats grouped by row letter, front row first
    pub fn rows(&self) -> IndexMap<char, Vec<&Seat>> {
        let mut rows: IndexMap<char, Vec<&Seat>> = IndexMap::new();
        for seat in &self.seats {
            rows.entry(seat.row).or_default().push(seat);
        }
        rows
    }

    /// Looks up `ids`, silently dropping the ones that do not exist
    pub fn resolve<'a, I>(&self, ids: I) -> Vec<&Seat>
    where
        I: IntoIterator<Item = &'a String>,
    {
        ids.into_iter().filter_map(|id| self.get(id)).collect()
    }
}
