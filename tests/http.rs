use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use lunchly::database::{DefaultCustomerRepository, DefaultReservationRepository, establish_pool};
use lunchly::http::{AppState, router};
use serde_json::Value;
use tower::ServiceExt;

async fn app() -> Router {
    let pool = establish_pool("sqlite::memory:").await.unwrap();
    let state = AppState::new(
        DefaultCustomerRepository::new(pool.clone()),
        DefaultReservationRepository::new(pool),
    );
    router(state)
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, form: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn json_data(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    body["data"].clone()
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

#[tokio::test]
async fn adding_a_customer_redirects_to_their_page() {
    let app = app().await;

    let response = post_form(
        &app,
        "/add/",
        "firstName=Ada&lastName=Lovelace&phone=5551234567&notes=regular",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/1/");

    let response = get(&app, "/1/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = json_data(response).await;
    assert_eq!(data["customer"]["fullName"], "Ada Lovelace");
    assert_eq!(data["customer"]["phone"], "5551234567");
    assert_eq!(data["customer"]["notes"], "regular");
    assert_eq!(data["reservations"], Value::Array(vec![]));
}

#[tokio::test]
async fn short_phone_is_a_bad_request() {
    let app = app().await;

    let response = post_form(&app, "/add/", "firstName=Ada&lastName=Lovelace&phone=12345").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let data = json_data(get(&app, "/").await).await;
    assert_eq!(data, Value::Array(vec![]));
}

#[tokio::test]
async fn unknown_customer_is_not_found() {
    let app = app().await;

    let response = get(&app, "/42/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_data(response).await, "No such customer: 42");

    let response = post_form(
        &app,
        "/42/add-reservation/",
        "startAt=2024-06-01T15:00&numGuests=2",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn editing_a_customer() {
    let app = app().await;
    post_form(&app, "/add/", "firstName=Ada&lastName=Lovelace").await;

    let response = post_form(
        &app,
        "/1/edit/",
        "firstName=Augusta&lastName=King&phone=5559876543&notes=",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/1/");

    let data = json_data(get(&app, "/1/edit/").await).await;
    assert_eq!(data["fullName"], "Augusta King");
    assert_eq!(data["phone"], "5559876543");
    assert_eq!(data["notes"], Value::Null);

    let response = post_form(&app, "/1/edit/", "firstName=Augusta&lastName=King&phone=1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_and_searching_customers() {
    let app = app().await;
    post_form(&app, "/add/", "firstName=John&lastName=Smith").await;
    post_form(&app, "/add/", "firstName=Bob&lastName=Jones").await;

    let data = json_data(get(&app, "/").await).await;
    assert_eq!(data.as_array().unwrap().len(), 2);
    assert_eq!(data[0]["fullName"], "Bob Jones");

    let data = json_data(get(&app, "/?search=").await).await;
    assert_eq!(data.as_array().unwrap().len(), 2);

    let data = json_data(get(&app, "/?search=SMI").await).await;
    assert_eq!(data.as_array().unwrap().len(), 1);
    assert_eq!(data[0]["fullName"], "John Smith");
}

#[tokio::test]
async fn booking_and_editing_a_reservation() {
    let app = app().await;
    post_form(&app, "/add/", "firstName=Ada&lastName=Lovelace").await;

    let response = post_form(
        &app,
        "/1/add-reservation/",
        "startAt=2024-06-01T15:00&numGuests=4&notes=window",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/1/");

    let data = json_data(get(&app, "/1/").await).await;
    let reservation = &data["reservations"][0];
    assert_eq!(reservation["numGuests"], 4);
    assert_eq!(reservation["formattedStartAt"], "June 1st 2024, 3:00 pm");
    assert_eq!(reservation["notes"], "window");

    let response = post_form(
        &app,
        "/reservation/1/",
        "startAt=2024-06-02T18:45&numGuests=6&notes=patio",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/1/");

    let data = json_data(get(&app, "/reservation/1").await).await;
    assert_eq!(data["customerId"], 1);
    assert_eq!(data["numGuests"], 6);
    assert_eq!(data["startAt"], "2024-06-02T18:45");
    assert_eq!(data["formattedStartAt"], "June 2nd 2024, 6:45 pm");
    assert_eq!(data["notes"], "patio");
}

#[tokio::test]
async fn invalid_reservation_fields_are_bad_requests() {
    let app = app().await;
    post_form(&app, "/add/", "firstName=Ada&lastName=Lovelace").await;

    for form in [
        "startAt=2024-06-01T15:00&numGuests=0",
        "startAt=2024-06-01T15:00&numGuests=many",
        "startAt=not-a-date&numGuests=2",
    ] {
        let response = post_form(&app, "/1/add-reservation/", form).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{form}");
    }

    let data = json_data(get(&app, "/1/").await).await;
    assert_eq!(data["reservations"], Value::Array(vec![]));

    let response = get(&app, "/reservation/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn top_customers_route() {
    let app = app().await;
    post_form(&app, "/add/", "firstName=Carol&lastName=Able").await;
    post_form(&app, "/add/", "firstName=Alice&lastName=Zed").await;
    post_form(&app, "/add/", "firstName=Eve&lastName=Idle").await;
    for customer in [1, 1, 2] {
        post_form(
            &app,
            &format!("/{customer}/add-reservation/"),
            "startAt=2024-06-01T12:00&numGuests=2",
        )
        .await;
    }

    let data = json_data(get(&app, "/customers/top").await).await;
    let names: Vec<&str> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["fullName"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Carol Able", "Alice Zed"]);
}

#[tokio::test]
async fn missing_form_fields_are_bad_requests() {
    let app = app().await;

    let response = post_form(&app, "/add/", "lastName=L").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    post_form(&app, "/add/", "firstName=Ada&lastName=Lovelace").await;
    for form in ["numGuests=2", "startAt=2024-06-01T15:00", ""] {
        let response = post_form(&app, "/1/add-reservation/", form).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{form}");
    }

    let response = post_form(&app, "/1/edit/", "firstName=Ada").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let data = json_data(get(&app, "/1/").await).await;
    assert_eq!(data["customer"]["fullName"], "Ada Lovelace");
    assert_eq!(data["reservations"], Value::Array(vec![]));
}

#[tokio::test]
async fn trailing_slash_is_optional() {
    let app = app().await;

    let response = post_form(&app, "/add", "firstName=Ada&lastName=Lovelace").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(get(&app, "/1").await.status(), StatusCode::OK);
    assert_eq!(get(&app, "/1/edit").await.status(), StatusCode::OK);
    assert_eq!(get(&app, "/customers/top/").await.status(), StatusCode::OK);

    let response = post_form(
        &app,
        "/1/add-reservation",
        "startAt=2024-06-01T15:00&numGuests=2",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert_eq!(get(&app, "/reservation/1/").await.status(), StatusCode::OK);
    let response = post_form(
        &app,
        "/reservation/1",
        "startAt=2024-06-01T15:00&numGuests=3",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/1/");
}
