use crate::http::AppState;
use crate::http::handler::{ApiError, ApiSuccess, non_blank};
use crate::http::reservations::ReservationHttpResponse;
use crate::models::{Customer, FindCustomerRequest};
use crate::repositories::{CustomerRepository, ReservationRepository};
use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    search: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerHttpRequest {
    first_name: String,
    last_name: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerHttpResponse {
    id: Option<i64>,
    first_name: String,
    last_name: String,
    full_name: String,
    phone: String,
    notes: Option<String>,
}

impl From<&Customer> for CustomerHttpResponse {
    fn from(value: &Customer) -> Self {
        Self {
            id: value.id(),
            first_name: value.first_name().to_string(),
            last_name: value.last_name().to_string(),
            full_name: value.full_name(),
            phone: value.phone().to_string(),
            notes: value.notes().map(ToString::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerDetailHttpResponse {
    customer: CustomerHttpResponse,
    reservations: Vec<ReservationHttpResponse>,
}

fn customer_list(customers: &[Customer]) -> Vec<CustomerHttpResponse> {
    customers.iter().map(CustomerHttpResponse::from).collect()
}

/// Lists every customer, or only those matching `?search=` when it is given.
pub async fn list_customers<CR: CustomerRepository, RR: ReservationRepository>(
    State(state): State<AppState<CR, RR>>,
    Query(query): Query<ListCustomersQuery>,
) -> Result<ApiSuccess<Vec<CustomerHttpResponse>>, ApiError> {
    let customers = match query.search.as_deref().filter(|s| !s.is_empty()) {
        Some(fragment) => state.customer_repo.search_customers(fragment).await?,
        None => state.customer_repo.find_all_customers().await?,
    };

    Ok(ApiSuccess::ok(customer_list(&customers)))
}

pub async fn top_customers<CR: CustomerRepository, RR: ReservationRepository>(
    State(state): State<AppState<CR, RR>>,
) -> Result<ApiSuccess<Vec<CustomerHttpResponse>>, ApiError> {
    let customers = state.customer_repo.find_top_customers().await?;
    tracing::debug!(count = customers.len(), "loaded top customers");

    Ok(ApiSuccess::ok(customer_list(&customers)))
}

pub async fn create_customer<CR: CustomerRepository, RR: ReservationRepository>(
    State(state): State<AppState<CR, RR>>,
    body: Result<Form<CustomerHttpRequest>, FormRejection>,
) -> Result<Redirect, ApiError> {
    let Form(body) = body?;
    let mut customer = Customer::new(
        &body.first_name,
        &body.last_name,
        &body.phone,
        non_blank(body.notes),
    )?;
    let id = state.customer_repo.save_customer(&mut customer).await?;

    Ok(Redirect::to(&format!("/{id}/")))
}

/// A customer together with their reservations.
pub async fn customer_detail<CR: CustomerRepository, RR: ReservationRepository>(
    State(state): State<AppState<CR, RR>>,
    Path(id): Path<i64>,
) -> Result<ApiSuccess<CustomerDetailHttpResponse>, ApiError> {
    let customer = state
        .customer_repo
        .find_customer(&FindCustomerRequest::new(id))
        .await?;
    let reservations = state
        .reservation_repo
        .find_reservations_for_customer(id)
        .await?;

    Ok(ApiSuccess::ok(CustomerDetailHttpResponse {
        customer: CustomerHttpResponse::from(&customer),
        reservations: reservations
            .iter()
            .map(ReservationHttpResponse::from)
            .collect(),
    }))
}

pub async fn edit_customer_form<CR: CustomerRepository, RR: ReservationRepository>(
    State(state): State<AppState<CR, RR>>,
    Path(id): Path<i64>,
) -> Result<ApiSuccess<CustomerHttpResponse>, ApiError> {
    let customer = state
        .customer_repo
        .find_customer(&FindCustomerRequest::new(id))
        .await?;

    Ok(ApiSuccess::ok(CustomerHttpResponse::from(&customer)))
}

pub async fn update_customer<CR: CustomerRepository, RR: ReservationRepository>(
    State(state): State<AppState<CR, RR>>,
    Path(id): Path<i64>,
    body: Result<Form<CustomerHttpRequest>, FormRejection>,
) -> Result<Redirect, ApiError> {
    let Form(body) = body?;
    let mut customer = state
        .customer_repo
        .find_customer(&FindCustomerRequest::new(id))
        .await?;
    customer.set_phone(&body.phone)?;
    customer.set_first_name(&body.first_name);
    customer.set_last_name(&body.last_name);
    customer.set_notes(non_blank(body.notes));
    state.customer_repo.save_customer(&mut customer).await?;

    Ok(Redirect::to(&format!("/{id}/")))
}
