use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::BookingConfig;
use crate::error::{AppError, AppResult};

const MOVIE_ALIAS: &str = "movie";

/// Step of the booking flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    SeatSelection,
    PersonalInfo,
    Payment,
    Confirmed,
}

impl Stage {
    /// Front-end page that handles this stage
    pub fn path(self) -> &'static str {
        match self {
            Stage::SeatSelection => "/reservation",
            Stage::PersonalInfo => "/confirmation",
            Stage::Payment => "/payment",
            Stage::Confirmed => "/ticket",
        }
    }
}

/// Everything the flow knows about a booking in progress.
///
/// Never stored anywhere: each page receives it in its query string and hands
/// it on to the next one through [`BookingDraft::to_query`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<String>,

    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub cinema: Option<String>,

    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Seat ids, comma separated on the wire
    #[serde(default, with = "seat_list", skip_serializing_if = "Vec::is_empty")]
    pub seats: Vec<String>,

    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Pre-computed total, decimals allowed. Unparseable, infinite or zero
    /// values read as absent.
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,

    #[serde(
        rename = "bid",
        default,
        deserialize_with = "non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub booking_id: Option<String>,

    #[serde(
        rename = "ticket",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub ticket_number: Option<u64>,
}

impl BookingDraft {
    /// Parses a draft out of a raw query string. A leading `?` is ignored.
    /// When a key repeats, its first value wins; `movie` is read as `movieId`.
    pub fn from_query(query: &str) -> AppResult<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query.trim_start_matches('?'))
            .map_err(|e| AppError::InvalidInput(format!("Malformed booking parameters: {}", e)))?;

        let mut first: IndexMap<String, String> = IndexMap::new();
        for (key, value) in pairs {
            let key = if key == MOVIE_ALIAS { "movieId".to_string() } else { key };
            first.entry(key).or_insert(value);
        }

        let canonical = serde_urlencoded::to_string(&first)
            .map_err(|e| AppError::Internal(format!("Booking draft encoding error: {}", e)))?;
        serde_urlencoded::from_str(&canonical)
            .map_err(|e| AppError::InvalidInput(format!("Malformed booking parameters: {}", e)))
    }

    /// Serializes the draft into a query string for the next page
    pub fn to_query(&self) -> AppResult<String> {
        serde_urlencoded::to_string(self)
            .map_err(|e| AppError::Internal(format!("Booking draft encoding error: {}", e)))
    }

    /// Builds `<path>?<query>` for navigating to `stage`
    pub fn link(&self, stage: Stage) -> AppResult<String> {
        let query = self.to_query()?;
        if query.is_empty() {
            Ok(stage.path().to_string())
        } else {
            Ok(format!("{}?{}", stage.path(), query))
        }
    }

    /// Fills in the showing defaults for any missing movie, time or cinema
    pub fn with_defaults(mut self, config: &BookingConfig) -> Self {
        self.movie_id
            .get_or_insert_with(|| config.default_movie_id.clone());
        self.time.get_or_insert_with(|| config.default_time.clone());
        self.cinema
            .get_or_insert_with(|| config.default_cinema.clone());
        self
    }

    /// "First Last", trimmed; empty when neither name is known
    pub fn holder(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    pub fn apply_personal_info(&mut self, info: PersonalInfo) {
        self.first_name = Some(info.first_name.trim().to_string());
        self.last_name = Some(info.last_name.trim().to_string());
        self.email = Some(info.email.trim().to_string());
        self.phone = Some(info.phone.trim().to_string());
    }
}

/// Personal information form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl From<&BookingDraft> for PersonalInfo {
    fn from(draft: &BookingDraft) -> Self {
        PersonalInfo {
            first_name: draft.first_name.clone().unwrap_or_default(),
            last_name: draft.last_name.clone().unwrap_or_default(),
            email: draft.email.clone().unwrap_or_default(),
            phone: draft.phone.clone().unwrap_or_default(),
        }
    }
}

/// Payment form. Never leaves the process: the charge is simulated.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub card_number: String,
    /// MM/YY
    pub expiry: String,
    pub cvv: String,
    pub cardholder: String,
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr + Default + PartialEq,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|n| *n != T::default()))
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n != 0.0))
}

mod seat_list {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(seats: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&seats.join(","))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_reads_all_keys() {
        let draft = BookingDraft::from_query(
            "movieId=550&time=18%3A00&cinema=Megarama&seats=E1,E2&firstName=Ada&lastName=Lovelace\
             &email=ada%40example.com&phone=0612345678&total=155&bid=AB12CD&ticket=12345678",
        )
        .unwrap();

        assert_eq!(draft.movie_id.as_deref(), Some("550"));
        assert_eq!(draft.time.as_deref(), Some("18:00"));
        assert_eq!(draft.seats, vec!["E1", "E2"]);
        assert_eq!(draft.holder(), "Ada Lovelace");
        assert_eq!(draft.email.as_deref(), Some("ada@example.com"));
        assert_eq!(draft.total, Some(155.0));
        assert_eq!(draft.booking_id.as_deref(), Some("AB12CD"));
        assert_eq!(draft.ticket_number, Some(12345678));
    }

    #[test]
    fn test_movie_alias_accepted() {
        let draft = BookingDraft::from_query("?movie=42&seats=A1").unwrap();
        assert_eq!(draft.movie_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_repeated_keys_keep_first_value() {
        let draft = BookingDraft::from_query("movie=550&movieId=551&seats=E1").unwrap();
        assert_eq!(draft.movie_id.as_deref(), Some("550"));

        let draft = BookingDraft::from_query("seats=E1&seats=E2&time=18%3A00&time=21%3A00").unwrap();
        assert_eq!(draft.seats, vec!["E1"]);
        assert_eq!(draft.time.as_deref(), Some("18:00"));
    }

    #[test]
    fn test_decimal_total_kept() {
        assert_eq!(
            BookingDraft::from_query("seats=E1,E2&total=155.50").unwrap().total,
            Some(155.5)
        );
        assert_eq!(BookingDraft::from_query("total=1e3").unwrap().total, Some(1000.0));
        assert_eq!(BookingDraft::from_query("total=inf").unwrap().total, None);
        assert_eq!(BookingDraft::from_query("total=NaN").unwrap().total, None);
    }

    #[test]
    fn test_empty_seat_entries_dropped() {
        let draft = BookingDraft::from_query("seats=A1,,B2,").unwrap();
        assert_eq!(draft.seats, vec!["A1", "B2"]);
    }

    #[test]
    fn test_non_numeric_total_is_absent() {
        assert_eq!(BookingDraft::from_query("total=abc").unwrap().total, None);
        assert_eq!(BookingDraft::from_query("total=0").unwrap().total, None);
        assert_eq!(BookingDraft::from_query("total=").unwrap().total, None);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let draft = BookingDraft::from_query("utm_source=mail&time=21%3A00").unwrap();
        assert_eq!(draft.time.as_deref(), Some("21:00"));
    }

    #[test]
    fn test_to_query_skips_missing_fields() {
        let draft = BookingDraft {
            movie_id: Some("550".to_string()),
            seats: vec!["E1".to_string(), "E2".to_string()],
            ..Default::default()
        };

        assert_eq!(draft.to_query().unwrap(), "movieId=550&seats=E1%2CE2");
        assert_eq!(
            draft.link(Stage::PersonalInfo).unwrap(),
            "/confirmation?movieId=550&seats=E1%2CE2"
        );
    }

    #[test]
    fn test_link_without_parameters() {
        let draft = BookingDraft::default();
        assert_eq!(draft.link(Stage::SeatSelection).unwrap(), "/reservation");
    }

    #[test]
    fn test_query_survives_next_page() {
        let mut draft = BookingDraft {
            movie_id: Some("385687".to_string()),
            time: Some("13:00 VF".to_string()),
            cinema: Some("Pathé Californie".to_string()),
            seats: vec!["F3".to_string()],
            ..Default::default()
        };
        draft.apply_personal_info(PersonalInfo {
            first_name: " Ada ".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+212612345678".to_string(),
        });

        let decoded = BookingDraft::from_query(&draft.to_query().unwrap()).unwrap();
        assert_eq!(decoded, draft);
        assert_eq!(decoded.first_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_with_defaults_keeps_supplied_values() {
        let config = BookingConfig::default();
        let draft = BookingDraft {
            cinema: Some("Megarama Casablanca".to_string()),
            ..Default::default()
        }
        .with_defaults(&config);

        assert_eq!(draft.movie_id.as_deref(), Some("385687"));
        assert_eq!(draft.time.as_deref(), Some("13:00 VF"));
        assert_eq!(draft.cinema.as_deref(), Some("Megarama Casablanca"));
    }

    #[test]
    fn test_holder_with_single_name() {
        let draft = BookingDraft {
            last_name: Some("Lovelace".to_string()),
            ..Default::default()
        };
        assert_eq!(draft.holder(), "Lovelace");
        assert_eq!(BookingDraft::default().holder(), "");
    }
}
