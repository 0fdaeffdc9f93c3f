//! Booking flow controller.
//!
//! `SeatSelection → PersonalInfo → Payment → Confirmed`. Every transition is
//! gated by client-side style validation; a failed check leaves the stage
//! unchanged. Nothing is persisted: the result of each transition is the
//! draft to hand to the next page.

use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;
use serde::Serialize;

use super::payment::{PaymentProcessor, PaymentReceipt};
use super::seat_map::SeatMap;
use super::selection::Selection;
use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{BookingDraft, PaymentDetails, PersonalInfo, Stage},
};

const BOOKING_ID_LEN: usize = 6;
const BOOKING_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Where the client should go after a successful transition
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Transition {
    pub stage: Stage,
    pub draft: BookingDraft,
    /// `<page>?<draft query>`
    pub next: String,
}

/// One booking walking through the stages
#[derive(Debug, Clone)]
pub struct BookingFlow {
    stage: Stage,
    draft: BookingDraft,
}

impl BookingFlow {
    /// New booking on the seat selection page
    pub fn start(draft: BookingDraft) -> Self {
        Self::resume(Stage::SeatSelection, draft)
    }

    /// Picks a booking back up from the page that owns `stage`
    pub fn resume(stage: Stage, draft: BookingDraft) -> Self {
        Self { stage, draft }
    }

    /// Resumes at `stage` from a draft received in a query string, checking
    /// that the draft carries what the earlier stages would have produced.
    pub fn resume_checked(stage: Stage, draft: BookingDraft) -> AppResult<Self> {
        if stage != Stage::SeatSelection && draft.seats.is_empty() {
            return Err(AppError::InvalidInput(
                "No seats selected for this booking".to_string(),
            ));
        }

        if matches!(stage, Stage::Payment | Stage::Confirmed) {
            let errors = validate_personal_info(&PersonalInfo::from(&draft));
            if !errors.is_empty() {
                return Err(AppError::Validation(errors));
            }
        }

        if stage == Stage::Confirmed && draft.booking_id.is_none() {
            return Err(AppError::InvalidInput(
                "Booking has not been paid".to_string(),
            ));
        }

        Ok(Self::resume(stage, draft))
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Link to the page of the current stage
    pub fn transition(&self) -> AppResult<Transition> {
        Ok(Transition {
            stage: self.stage,
            draft: self.draft.clone(),
            next: self.draft.link(self.stage)?,
        })
    }

    fn expect_stage(&self, expected: Stage) -> AppResult<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(AppError::InvalidInput(format!(
                "Booking is at {:?}, expected {:?}",
                self.stage, expected
            )))
        }
    }

    /// SeatSelection → PersonalInfo. Needs at least one seat.
    pub fn confirm_seats(&mut self, selection: &Selection) -> AppResult<Transition> {
        self.expect_stage(Stage::SeatSelection)?;

        if selection.is_empty() {
            tracing::warn!("Seat confirmation rejected: empty selection");
            return Err(AppError::InvalidInput(
                "Select at least one seat".to_string(),
            ));
        }

        self.draft.seats = selection.to_vec();
        self.stage = Stage::PersonalInfo;

        tracing::info!(seats = selection.len(), "Seats confirmed");
        self.transition()
    }

    /// PersonalInfo → Payment. Needs names, a valid email and phone number.
    pub fn submit_personal_info(&mut self, info: PersonalInfo) -> AppResult<Transition> {
        self.expect_stage(Stage::PersonalInfo)?;

        let errors = validate_personal_info(&info);
        if !errors.is_empty() {
            tracing::warn!(fields = ?errors.keys().collect::<Vec<_>>(), "Personal info rejected");
            return Err(AppError::Validation(errors));
        }

        self.draft.apply_personal_info(info);
        self.stage = Stage::Payment;

        tracing::info!("Personal info captured");
        self.transition()
    }

    /// Amount charged at payment: seat prices from `catalog` plus the fee.
    /// A `total` carried in the draft is not trusted here.
    pub fn amount_due(&self, catalog: &SeatMap, service_fee: u32) -> u32 {
        let selection: Selection = self.draft.seats.iter().cloned().collect();
        selection.total(catalog) + service_fee
    }

    /// Payment → Confirmed. Validates the card form, charges through
    /// `processor`, then stamps the booking id and ticket number.
    pub async fn submit_payment(
        &mut self,
        payment: &PaymentDetails,
        amount: u32,
        processor: &dyn PaymentProcessor,
    ) -> AppResult<(Transition, PaymentReceipt)> {
        self.expect_stage(Stage::Payment)?;

        let errors = validate_payment(payment);
        if !errors.is_empty() {
            tracing::warn!(fields = ?errors.keys().collect::<Vec<_>>(), "Payment details rejected");
            return Err(AppError::Validation(errors));
        }

        let receipt = processor.charge(amount, payment).await?;

        {
            let mut rng = rand::thread_rng();
            if self.draft.booking_id.is_none() {
                self.draft.booking_id = Some(generate_booking_id(&mut rng));
            }
            self.draft.ticket_number = Some(generate_ticket_number(&mut rng));
        }
        self.draft.total = Some(f64::from(amount));
        self.stage = Stage::Confirmed;

        tracing::info!(
            booking_id = self.draft.booking_id.as_deref().unwrap_or_default(),
            amount,
            "Booking confirmed"
        );
        Ok((self.transition()?, receipt))
    }
}

/// Six uppercase alphanumeric characters
pub fn generate_booking_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..BOOKING_ID_LEN)
        .map(|_| BOOKING_ID_CHARSET[rng.gen_range(0..BOOKING_ID_CHARSET.len())] as char)
        .collect()
}

/// Eight digit ticket number
pub fn generate_ticket_number<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.gen_range(10_000_000..100_000_000)
}

static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
static PHONE: OnceLock<Option<Regex>> = OnceLock::new();
static CARD_NUMBER: OnceLock<Option<Regex>> = OnceLock::new();
static EXPIRY: OnceLock<Option<Regex>> = OnceLock::new();
static CVV: OnceLock<Option<Regex>> = OnceLock::new();

/// Compiles `pattern` once per cell. A pattern that fails to compile matches nothing.
fn is_match(cell: &'static OnceLock<Option<Regex>>, pattern: &str, value: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

fn digits_only(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn validate_personal_info(info: &PersonalInfo) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if info.first_name.trim().is_empty() {
        errors.insert("firstName", "First name is required".to_string());
    }
    if info.last_name.trim().is_empty() {
        errors.insert("lastName", "Last name is required".to_string());
    }
    if !is_match(&EMAIL, r"^[^\s@]+@[^\s@]+\.[^\s@]+$", info.email.trim()) {
        errors.insert("email", "Invalid email address".to_string());
    }
    let phone: String = info
        .phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.'))
        .collect();
    if !is_match(&PHONE, r"^\+?[0-9]{8,15}$", &phone) {
        errors.insert("phone", "Invalid phone number".to_string());
    }

    errors
}

pub fn validate_payment(payment: &PaymentDetails) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if !is_match(&CARD_NUMBER, r"^[0-9]{16}$", &digits_only(&payment.card_number)) {
        errors.insert("cardNumber", "Card number must be 16 digits".to_string());
    }
    if !is_match(&EXPIRY, r"^(0[1-9]|1[0-2])/[0-9]{2}$", payment.expiry.trim()) {
        errors.insert("expiry", "Expiry must be MM/YY".to_string());
    }
    if !is_match(&CVV, r"^[0-9]{3}$", payment.cvv.trim()) {
        errors.insert("cvv", "CVV must be 3 digits".to_string());
    }
    if payment.cardholder.trim().is_empty() {
        errors.insert("cardholder", "Cardholder name is required".to_string());
    }

    errors
}
