use crate::http::AppState;
use crate::http::handler::{ApiError, ApiSuccess, non_blank};
use crate::models::{FindReservationRequest, GuestCount, Reservation, StartAt};
use crate::repositories::{CustomerRepository, ReservationRepository};
use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::response::Redirect;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationHttpRequest {
    start_at: String,
    num_guests: String,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationHttpResponse {
    id: Option<i64>,
    customer_id: i64,
    num_guests: i64,
    start_at: String,
    formatted_start_at: String,
    notes: Option<String>,
}

impl From<&Reservation> for ReservationHttpResponse {
    fn from(value: &Reservation) -> Self {
        Self {
            id: value.id(),
            customer_id: value.customer_id(),
            num_guests: value.num_guests().get(),
            start_at: value.start_at().to_form_value(),
            formatted_start_at: value.formatted_start_at(),
            notes: value.notes().map(ToString::to_string),
        }
    }
}

pub async fn create_reservation<CR: CustomerRepository, RR: ReservationRepository>(
    State(state): State<AppState<CR, RR>>,
    Path(customer_id): Path<i64>,
    body: Result<Form<ReservationHttpRequest>, FormRejection>,
) -> Result<Redirect, ApiError> {
    let Form(body) = body?;
    let start_at = StartAt::parse(&body.start_at)?;
    let num_guests = GuestCount::parse(&body.num_guests)?;
    let mut reservation =
        Reservation::new(customer_id, num_guests.get(), start_at, non_blank(body.notes))?;
    state
        .reservation_repo
        .save_reservation(&mut reservation)
        .await?;

    Ok(Redirect::to(&format!("/{customer_id}/")))
}

pub async fn edit_reservation_form<CR: CustomerRepository, RR: ReservationRepository>(
    State(state): State<AppState<CR, RR>>,
    Path(id): Path<i64>,
) -> Result<ApiSuccess<ReservationHttpResponse>, ApiError> {
    let reservation = state
        .reservation_repo
        .find_reservation(&FindReservationRequest::new(id))
        .await?;

    Ok(ApiSuccess::ok(ReservationHttpResponse::from(&reservation)))
}

pub async fn update_reservation<CR: CustomerRepository, RR: ReservationRepository>(
    State(state): State<AppState<CR, RR>>,
    Path(id): Path<i64>,
    body: Result<Form<ReservationHttpRequest>, FormRejection>,
) -> Result<Redirect, ApiError> {
    let Form(body) = body?;
    let start_at = StartAt::parse(&body.start_at)?;
    let num_guests = GuestCount::parse(&body.num_guests)?;

    let mut reservation = state
        .reservation_repo
        .find_reservation(&FindReservationRequest::new(id))
        .await?;
    reservation.set_start_at(start_at);
    reservation.set_num_guests(num_guests.get())?;
    reservation.set_notes(non_blank(body.notes));
    state
        .reservation_repo
        .save_reservation(&mut reservation)
        .await?;

    Ok(Redirect::to(&format!("/{}/", reservation.customer_id())))
}
