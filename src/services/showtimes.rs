//! Demo showtimes: two Casablanca cinemas with fixed schedules, the same
//! whatever the movie or day.

use chrono::{Days, NaiveDate};
use indexmap::IndexMap;

use crate::models::{CinemaShowtimes, Showtimes};

const STRIP_RADIUS: u64 = 4;

fn cinema(
    id: u32,
    name: &str,
    address: &str,
    distance_km: f64,
    rating: f64,
    times: &[&str],
    prices: &[(&str, u32)],
) -> CinemaShowtimes {
    CinemaShowtimes {
        id,
        name: name.to_string(),
        address: address.to_string(),
        distance_km,
        rating,
        times: times.iter().map(|t| t.to_string()).collect(),
        prices: prices
            .iter()
            .map(|(format, price)| (format.to_string(), *price))
            .collect::<IndexMap<_, _>>(),
    }
}

pub fn demo_cinemas() -> Vec<CinemaShowtimes> {
    vec![
        cinema(
            1,
            "Pathé Californie",
            "Casablanca CT 1029 Aïn Chock",
            2.5,
            4.2,
            &["16:15", "18:00", "21:00"],
            &[("2D", 45), ("3D", 55), ("IMAX", 75)],
        ),
        cinema(
            2,
            "Megarama Casablanca",
            "Boulevard Moulay Youssef, Casablanca",
            4.8,
            4.5,
            &["15:30", "17:45", "20:15", "22:30"],
            &[("2D", 50), ("3D", 60), ("VIP", 120)],
        ),
    ]
}

/// Nine consecutive days with `date` in the middle
pub fn date_strip(date: NaiveDate) -> Vec<NaiveDate> {
    (0..=2 * STRIP_RADIUS)
        .filter_map(|offset| {
            date.checked_sub_days(Days::new(STRIP_RADIUS))?
                .checked_add_days(Days::new(offset))
        })
        .collect()
}

pub fn showtimes(movie_id: u64, date: NaiveDate) -> Showtimes {
    Showtimes {
        movie_id,
        date,
        days: date_strip(date),
        cinemas: demo_cinemas(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_strip_is_centred() {
        let strip = date_strip(day(2025, 6, 24));

        assert_eq!(strip.len(), 9);
        assert_eq!(strip[0], day(2025, 6, 20));
        assert_eq!(strip[4], day(2025, 6, 24));
        assert_eq!(strip[8], day(2025, 6, 28));
    }

    #[test]
    fn test_strip_crosses_month_boundary() {
        let strip = date_strip(day(2025, 3, 1));
        assert_eq!(strip[0], day(2025, 2, 25));
        assert_eq!(strip[8], day(2025, 3, 5));
    }

    #[test]
    fn test_demo_cinemas() {
        let cinemas = demo_cinemas();

        assert_eq!(cinemas.len(), 2);
        assert_eq!(cinemas[0].name, "Pathé Californie");
        assert_eq!(cinemas[0].prices["IMAX"], 75);
        assert_eq!(cinemas[1].times.len(), 4);
        assert_eq!(
            cinemas[1].prices.keys().collect::<Vec<_>>(),
            vec!["2D", "3D", "VIP"]
        );
    }

    #[test]
    fn test_showtimes_listing() {
        let listing = showtimes(385687, day(2025, 6, 24));
        assert_eq!(listing.movie_id, 385687);
        assert_eq!(listing.days.len(), 9);
        assert_eq!(listing.cinemas.len(), 2);
    }
}
