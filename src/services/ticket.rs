//! Ticket rendering.
//!
//! Everything is rebuilt from the booking draft: seat tiers and prices come
//! from re-running the layout, the holder from the name parameters. The QR
//! code only carries what the client sent.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use qrcode::{render::svg, QrCode};

use super::booking_flow::generate_booking_id;
use super::providers::MovieProvider;
use super::seat_map::{SeatLayout, SeatMap};
use crate::{
    config::BookingConfig,
    error::{AppError, AppResult},
    models::{BookingDraft, Movie, SeatLine, Ticket, TicketFile, TicketPayload, TotalSource},
};

const QR_MIN_SIZE: u32 = 200;

/// Builds tickets and ticket files from booking drafts
#[derive(Debug, Clone)]
pub struct TicketRenderer {
    catalog: SeatMap,
    service_fee: u32,
    /// Printed when the draft names no cinema
    default_cinema: String,
}

impl TicketRenderer {
    pub fn new(layout: &SeatLayout, booking: &BookingConfig) -> Self {
        Self {
            catalog: layout.catalog(),
            service_fee: booking.service_fee,
            default_cinema: booking.default_cinema.clone(),
        }
    }

    pub fn service_fee(&self) -> u32 {
        self.service_fee
    }

    /// Known seats among `seat_ids`, with their prices, plus their sum
    pub fn price_seats(&self, seat_ids: &[String]) -> (Vec<SeatLine>, u32) {
        let seats: Vec<SeatLine> = self
            .catalog
            .resolve(seat_ids)
            .into_iter()
            .map(SeatLine::from)
            .collect();
        let subtotal = seats.iter().map(|s| s.price).sum();
        (seats, subtotal)
    }

    /// A supplied `total` wins; otherwise seat prices plus the service fee
    pub fn resolve_total(&self, draft: &BookingDraft, subtotal: u32) -> (f64, TotalSource) {
        match draft.total {
            Some(total) => (total, TotalSource::Supplied),
            None => (f64::from(subtotal + self.service_fee), TotalSource::Computed),
        }
    }

    pub fn render(
        &self,
        draft: &BookingDraft,
        movie: Option<Movie>,
        now: DateTime<Utc>,
    ) -> AppResult<Ticket> {
        let (seats, subtotal) = self.price_seats(&draft.seats);
        let (total, total_source) = self.resolve_total(draft, subtotal);

        if total_source == TotalSource::Supplied {
            tracing::debug!(total, computed = subtotal + self.service_fee, "Using supplied ticket total");
        }

        let booking_id = draft
            .booking_id
            .clone()
            .unwrap_or_else(|| generate_booking_id(&mut rand::thread_rng()));
        let movie_id = draft.movie_id.clone().unwrap_or_default();

        let payload = TicketPayload {
            booking: booking_id.clone(),
            movie_id: movie_id.clone(),
            seat_ids: draft.seats.clone(),
            holder: draft.holder(),
            total,
            timestamp: now.timestamp_millis(),
        };
        let qr_data = serde_json::to_string(&payload)
            .map_err(|e| AppError::Internal(format!("Ticket payload encoding error: {}", e)))?;
        let qr_svg = render_qr_svg(&qr_data)?;

        Ok(Ticket {
            booking_id,
            ticket_number: draft.ticket_number,
            movie_id,
            runtime: movie.as_ref().and_then(Movie::runtime_label),
            rating: movie.as_ref().and_then(Movie::rating_out_of_five),
            movie,
            cinema: draft
                .cinema
                .clone()
                .unwrap_or_else(|| self.default_cinema.clone()),
            date: draft.date.clone(),
            time: draft.time.clone(),
            seats,
            holder: payload.holder.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            subtotal,
            service_fee: self.service_fee,
            total,
            total_source,
            payload,
            qr_data,
            qr_svg,
            generated_at: now,
        })
    }

    /// Downloadable document for a rendered ticket
    pub fn ticket_file(&self, ticket: &Ticket) -> TicketFile {
        TicketFile {
            booking: ticket.booking_id.clone(),
            movie: ticket
                .movie
                .as_ref()
                .map(|m| m.title.clone())
                .unwrap_or_else(|| "Film".to_string()),
            cinema: ticket.cinema.clone(),
            date: ticket.date.clone().unwrap_or_default(),
            time: ticket.time.clone().unwrap_or_default(),
            seats: ticket
                .seats
                .iter()
                .map(|s| s.id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            holder: ticket.holder.clone(),
            total: ticket.total,
            qr_code: ticket.qr_data.clone(),
            generated: ticket.generated_at,
        }
    }
}

/// `billet-<booking>-<title>.json`, anything but ASCII alphanumerics in
/// either part replaced by '-' so the name is safe inside a header
pub fn ticket_file_name(ticket: &Ticket) -> String {
    let title = ticket
        .movie
        .as_ref()
        .map(|m| m.title.as_str())
        .unwrap_or("cinema");
    format!("billet-{}-{}.json", slug(&ticket.booking_id), slug(title))
}

fn slug(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

pub fn render_qr_svg(data: &str) -> AppResult<String> {
    let code = QrCode::new(data.as_bytes())
        .map_err(|e| AppError::Internal(format!("Failed to generate QR code: {}", e)))?;

    Ok(code
        .render()
        .min_dimensions(QR_MIN_SIZE, QR_MIN_SIZE)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

/// Fetches the movie a ticket refers to. A missing id is not an error; a
/// failed lookup is reported as [`AppError::MovieUnavailable`].
pub async fn load_movie(
    provider: &Arc<dyn MovieProvider>,
    draft: &BookingDraft,
) -> AppResult<Option<Movie>> {
    let Some(raw_id) = draft.movie_id.as_deref() else {
        return Ok(None);
    };

    let id: u64 = raw_id
        .parse()
        .map_err(|_| AppError::MovieUnavailable(raw_id.to_string()))?;

    match provider.get_movie(id).await {
        Ok(movie) => Ok(Some(movie)),
        Err(e) => {
            tracing::warn!(
                movie_id = id,
                provider = provider.name(),
                error = %e,
                "Movie lookup failed for ticket"
            );
            Err(AppError::MovieUnavailable(raw_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockMovieProvider;
    use chrono::TimeZone;

    fn renderer() -> TicketRenderer {
        TicketRenderer::new(&SeatLayout::cinema_default().unwrap(), &BookingConfig::default())
    }

    fn draft(query: &str) -> BookingDraft {
        BookingDraft::from_query(query).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 24, 18, 0, 0).unwrap()
    }

    fn movie() -> Movie {
        Movie {
            id: 550,
            title: "Fight Club".to_string(),
            overview: None,
            release_date: Some("1999-10-15".to_string()),
            runtime: Some(139),
            vote_average: Some(8.4),
            poster_url: None,
            backdrop_url: None,
        }
    }

    #[test]
    fn test_total_computed_from_seats() {
        let ticket = renderer()
            .render(&draft("movie=550&seats=E1,E2&bid=ABC123"), None, now())
            .unwrap();

        assert_eq!(ticket.subtotal, 150);
        assert_eq!(ticket.total, 155.0);
        assert_eq!(ticket.total_source, TotalSource::Computed);
    }

    #[test]
    fn test_supplied_total_wins() {
        let ticket = renderer()
            .render(&draft("movie=550&seats=E1,E2&total=999"), None, now())
            .unwrap();

        assert_eq!(ticket.total, 999.0);
        assert_eq!(ticket.subtotal, 150);
        assert_eq!(ticket.total_source, TotalSource::Supplied);
    }

    #[test]
    fn test_non_numeric_total_falls_back() {
        let ticket = renderer()
            .render(&draft("seats=A1&total=free"), None, now())
            .unwrap();
        assert_eq!(ticket.total, 55.0);
    }

    #[test]
    fn test_decimal_supplied_total() {
        let renderer = renderer();
        let ticket = renderer
            .render(&draft("seats=E1,E2&total=155.50"), None, now())
            .unwrap();

        assert_eq!(ticket.total, 155.5);
        assert_eq!(ticket.total_source, TotalSource::Supplied);
        assert_eq!(ticket.payload.total, 155.5);
        assert_eq!(renderer.ticket_file(&ticket).total, 155.5);
    }

    #[test]
    fn test_zero_total_falls_back() {
        let ticket = renderer()
            .render(&draft("seats=A1&total=0.0"), None, now())
            .unwrap();
        assert_eq!(ticket.total, 55.0);
        assert_eq!(ticket.total_source, TotalSource::Computed);
    }

    #[test]
    fn test_movie_runtime_and_rating() {
        let ticket = renderer()
            .render(&draft("movieId=550&seats=E1"), Some(movie()), now())
            .unwrap();
        assert_eq!(ticket.runtime.as_deref(), Some("2h 19min"));
        assert_eq!(ticket.rating, Some(4.2));

        let anonymous = renderer().render(&draft("seats=E1"), None, now()).unwrap();
        assert!(anonymous.runtime.is_none());
        assert!(anonymous.rating.is_none());
    }

    #[test]
    fn test_missing_cinema_uses_default() {
        let ticket = renderer().render(&draft("seats=E1"), None, now()).unwrap();
        assert_eq!(ticket.cinema, "Pathé Californie");

        let named = TicketRenderer::new(
            &SeatLayout::cinema_default().unwrap(),
            &BookingConfig {
                default_cinema: "Megarama".to_string(),
                ..BookingConfig::default()
            },
        );
        let ticket = named.render(&draft("seats=E1"), None, now()).unwrap();
        assert_eq!(ticket.cinema, "Megarama");
    }

    #[test]
    fn test_unknown_seats_skipped_in_prices_but_kept_in_payload() {
        let ticket = renderer()
            .render(&draft("seats=G1,Z99"), None, now())
            .unwrap();

        assert_eq!(ticket.seats.len(), 1);
        assert_eq!(ticket.seats[0].price, 120);
        assert_eq!(ticket.payload.seat_ids, vec!["G1", "Z99"]);
    }

    #[test]
    fn test_booking_id_generated_when_absent() {
        let ticket = renderer().render(&draft("seats=A1"), None, now()).unwrap();
        assert_eq!(ticket.booking_id.len(), 6);
    }

    #[test]
    fn test_qr_payload_contents() {
        let ticket = renderer()
            .render(
                &draft("movieId=550&seats=E1&firstName=Ada&lastName=Lovelace&bid=QR0001"),
                None,
                now(),
            )
            .unwrap();

        let payload: serde_json::Value = serde_json::from_str(&ticket.qr_data).unwrap();
        assert_eq!(payload["booking"], "QR0001");
        assert_eq!(payload["movieId"], "550");
        assert_eq!(payload["seatIds"], serde_json::json!(["E1"]));
        assert_eq!(payload["holder"], "Ada Lovelace");
        assert_eq!(payload["total"], 80.0);
        assert_eq!(payload["timestamp"], now().timestamp_millis());
        assert!(ticket.qr_svg.contains("<svg"));
    }

    #[test]
    fn test_ticket_file_fields() {
        let renderer = renderer();
        let ticket = renderer
            .render(
                &draft("movieId=550&seats=E1,Z1,E2&time=18%3A00&date=2025-06-24&cinema=Megarama&bid=FILE01"),
                Some(movie()),
                now(),
            )
            .unwrap();

        let file = renderer.ticket_file(&ticket);
        assert_eq!(file.booking, "FILE01");
        assert_eq!(file.movie, "Fight Club");
        assert_eq!(file.cinema, "Megarama");
        assert_eq!(file.date, "2025-06-24");
        assert_eq!(file.seats, "E1, E2");
        assert_eq!(file.qr_code, ticket.qr_data);

        let json = serde_json::to_value(&file).unwrap();
        for key in [
            "booking", "movie", "cinema", "date", "time", "seats", "holder", "total", "qrCode",
            "generated",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_ticket_file_name_slug() {
        let ticket = renderer()
            .render(&draft("seats=A1&bid=AB12CD"), Some(movie()), now())
            .unwrap();
        assert_eq!(ticket_file_name(&ticket), "billet-AB12CD-Fight-Club.json");

        let anonymous = renderer().render(&draft("bid=AB12CD"), None, now()).unwrap();
        assert_eq!(ticket_file_name(&anonymous), "billet-AB12CD-cinema.json");
    }

    #[test]
    fn test_ticket_file_name_sanitizes_booking_id() {
        let ticket = renderer()
            .render(&draft("bid=A%22B%3B%0D%0AC"), Some(movie()), now())
            .unwrap();

        assert_eq!(ticket.booking_id, "A\"B;\r\nC");
        assert_eq!(ticket_file_name(&ticket), "billet-A-B---C-Fight-Club.json");
    }

    #[tokio::test]
    async fn test_load_movie_without_id() {
        let provider: Arc<dyn MovieProvider> = Arc::new(MockMovieProvider::new());
        let movie = load_movie(&provider, &BookingDraft::default()).await.unwrap();
        assert!(movie.is_none());
    }

    #[tokio::test]
    async fn test_load_movie_failure_is_unavailable() {
        let mut mock = MockMovieProvider::new();
        mock.expect_get_movie()
            .returning(|_| Err(AppError::ExternalApi("TMDB returned status 404".to_string())));
        mock.expect_name().return_const("mock");
        let provider: Arc<dyn MovieProvider> = Arc::new(mock);

        let result = load_movie(&provider, &draft("movie=550")).await;
        assert!(matches!(result, Err(AppError::MovieUnavailable(id)) if id == "550"));
    }

    #[tokio::test]
    async fn test_load_movie_success() {
        let mut mock = MockMovieProvider::new();
        mock.expect_get_movie()
            .withf(|id| *id == 550)
            .returning(|_| Ok(movie()));
        let provider: Arc<dyn MovieProvider> = Arc::new(mock);

        let loaded = load_movie(&provider, &draft("movie=550")).await.unwrap();
        assert_eq!(loaded.map(|m| m.title), Some("Fight Club".to_string()));
    }
}
