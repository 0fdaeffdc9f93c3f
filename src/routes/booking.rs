use axum::{extract::State, Extension, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{BookingDraft, PaymentDetails, PersonalInfo, SeatLine, Stage},
    routes::{extract::Draft, AppState},
    services::{
        booking_flow::{BookingFlow, Transition},
        payment::PaymentReceipt,
        selection::Selection,
    },
};

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    #[serde(flatten)]
    pub transition: Transition,
    pub receipt: PaymentReceipt,
}

/// Order summary shown next to the personal information form
#[derive(Debug, Serialize)]
pub struct ConfirmationSummary {
    pub draft: BookingDraft,
    pub seats: Vec<SeatLine>,
    pub subtotal: u32,
    pub service_fee: u32,
    pub total: u32,
}

/// SeatSelection → PersonalInfo with the seats carried in the draft
pub async fn confirm_seats(
    Extension(request_id): Extension<RequestId>,
    Draft(draft): Draft,
) -> AppResult<Json<Transition>> {
    let selection: Selection = draft.seats.iter().cloned().collect();
    let mut flow = BookingFlow::start(draft);

    tracing::info!(request_id = %request_id, seats = selection.len(), "Confirming seats");

    Ok(Json(flow.confirm_seats(&selection)?))
}

/// PersonalInfo → Payment
pub async fn personal_info(
    Extension(request_id): Extension<RequestId>,
    Draft(draft): Draft,
    Json(info): Json<PersonalInfo>,
) -> AppResult<Json<Transition>> {
    let mut flow = BookingFlow::resume_checked(Stage::PersonalInfo, draft)?;

    tracing::info!(request_id = %request_id, "Submitting personal info");

    Ok(Json(flow.submit_personal_info(info)?))
}

/// Payment → Confirmed. Charges seat prices plus the service fee, whatever
/// `total` the draft carries.
pub async fn payment(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Draft(draft): Draft,
    Json(details): Json<PaymentDetails>,
) -> AppResult<Json<PaymentResponse>> {
    let mut flow = BookingFlow::resume_checked(Stage::Payment, draft)?;
    let amount = flow.amount_due(&state.catalog, state.booking.service_fee);

    tracing::info!(request_id = %request_id, amount, "Processing payment");

    let (transition, receipt) = flow
        .submit_payment(&details, amount, state.payments.as_ref())
        .await?;

    tracing::info!(
        request_id = %request_id,
        next = %transition.next,
        "Payment completed"
    );

    Ok(Json(PaymentResponse {
        transition,
        receipt,
    }))
}

pub async fn confirmation(
    State(state): State<Arc<AppState>>,
    Draft(draft): Draft,
) -> AppResult<Json<ConfirmationSummary>> {
    let flow = BookingFlow::resume_checked(Stage::PersonalInfo, draft)?;
    let (seats, subtotal) = state.tickets.price_seats(&flow.draft().seats);
    let service_fee = state.tickets.service_fee();

    Ok(Json(ConfirmationSummary {
        draft: flow.draft().clone(),
        seats,
        subtotal,
        service_fee,
        total: subtotal + service_fee,
    }))
}
