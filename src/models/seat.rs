use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Seat category, which alone decides the price
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SeatTier {
    Standard,
    Premium,
    Vip,
}

impl SeatTier {
    /// Price in whole currency units (DH)
    pub fn price(self) -> u32 {
        match self {
            SeatTier::Standard => 50,
            SeatTier::Premium => 75,
            SeatTier::Vip => 120,
        }
    }
}

impl Display for SeatTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeatTier::Standard => write!(f, "standard"),
            SeatTier::Premium => write!(f, "premium"),
            SeatTier::Vip => write!(f, "vip"),
        }
    }
}

/// One seat of an auditorium layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seat {
    /// Row letter followed by the per-row seat number, e.g. "E7"
    pub id: String,
    pub row: char,
    /// Zero-based position in the row mask, gaps included
    pub column: usize,
    /// Number printed on the seat, restarting at 1 on every row
    pub number: u32,
    pub tier: SeatTier,
    pub price: u32,
    /// Simulated pre-existing booking
    pub occupied: bool,
}

impl Seat {
    pub fn new(row: char, column: usize, number: u32, tier: SeatTier, occupied: bool) -> Self {
        Self {
            id: format!("{}{}", row, number),
            row,
            column,
            number,
            tier,
            price: tier.price(),
            occupied,
        }
    }

    /// Label shown on seat badges, e.g. "E 7"
    pub fn label(&self) -> String {
        format!("{} {}", self.row, self.number)
    }
}

/// Seat as shown in a booking summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeatLine {
    pub id: String,
    pub label: String,
    pub tier: SeatTier,
    pub price: u32,
}

impl From<&Seat> for SeatLine {
    fn from(seat: &Seat) -> Self {
        Self {
            id: seat.id.clone(),
            label: seat.label(),
            tier: seat.tier,
            price: seat.price,
        }
    }
}
