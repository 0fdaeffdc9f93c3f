pub mod backend;
pub mod booking_flow;
pub mod payment;
pub mod providers;
pub mod recommendations;
pub mod seat_map;
pub mod selection;
pub mod showtimes;
pub mod ticket;

pub use booking_flow::BookingFlow;
pub use seat_map::{SeatLayout, SeatMap};
pub use selection::Selection;
pub use ticket::TicketRenderer;
