pub mod booking;
pub mod cinema;
pub mod movie;
pub mod recommendation;
pub mod seat;
pub mod ticket;
pub mod user;

pub use booking::{BookingDraft, PaymentDetails, PersonalInfo, Stage};
pub use cinema::{CinemaShowtimes, Showtimes};
pub use movie::{Movie, MoviePage, MovieSummary, TmdbMovie, TmdbPage};
pub use recommendation::{ChatReply, ChatRequest, RecommendedMovie};
pub use seat::{Seat, SeatLine, SeatTier};
pub use ticket::{Ticket, TicketFile, TicketPayload, TotalSource};
pub use user::{
    CatalogMovie, CatalogPage, Credentials, LoginResponse, Registration, UserProfile,
    WatchlistEntry,
};
