use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Movie, SeatLine};

/// Claims encoded into the ticket QR code. Unsigned: proves nothing by itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketPayload {
    pub booking: String,
    pub movie_id: String,
    pub seat_ids: Vec<String>,
    pub holder: String,
    pub total: f64,
    /// Milliseconds since the epoch at render time
    pub timestamp: i64,
}

/// Where the ticket total came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TotalSource {
    /// `total` query parameter, taken as is
    Supplied,
    /// Seat prices plus the service fee
    Computed,
}

/// Fully rendered ticket
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Ticket {
    pub booking_id: String,
    pub ticket_number: Option<u64>,
    pub movie_id: String,
    pub movie: Option<Movie>,
    /// Movie runtime as "2h 19min"
    pub runtime: Option<String>,
    /// Movie rating out of five
    pub rating: Option<f64>,
    pub cinema: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub seats: Vec<SeatLine>,
    pub holder: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subtotal: u32,
    pub service_fee: u32,
    pub total: f64,
    pub total_source: TotalSource,
    pub payload: TicketPayload,
    /// Serialized [`TicketPayload`], exactly what the QR code encodes
    pub qr_data: String,
    pub qr_svg: String,
    pub generated_at: DateTime<Utc>,
}

/// Downloadable ticket document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketFile {
    pub booking: String,
    pub movie: String,
    pub cinema: String,
    pub date: String,
    pub time: String,
    /// Seat ids joined with ", "
    pub seats: String,
    pub holder: String,
    pub total: f64,
    pub qr_code: String,
    pub generated: DateTime<Utc>,
}
