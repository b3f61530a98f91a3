mod customers;
pub mod handler;
mod reservations;

use crate::repositories::{CustomerRepository, ReservationRepository};
use anyhow::Context;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Debug)]
pub struct AppState<CR: CustomerRepository, RR: ReservationRepository> {
    customer_repo: Arc<CR>,
    reservation_repo: Arc<RR>,
}

impl<CR: CustomerRepository, RR: ReservationRepository> AppState<CR, RR> {
    pub fn new(customer_repo: CR, reservation_repo: RR) -> Self {
        Self {
            customer_repo: Arc::new(customer_repo),
            reservation_repo: Arc::new(reservation_repo),
        }
    }
}

impl<CR: CustomerRepository, RR: ReservationRepository> Clone for AppState<CR, RR> {
    fn clone(&self) -> Self {
        Self {
            customer_repo: Arc::clone(&self.customer_repo),
            reservation_repo: Arc::clone(&self.reservation_repo),
        }
    }
}

#[derive(Debug)]
pub struct HttpServerConfig {
    port: u16,
}

impl HttpServerConfig {
    pub const fn new(port: u16) -> Self {
        Self { port }
    }
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new<CR: CustomerRepository, RR: ReservationRepository>(
        state: AppState<CR, RR>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        let router = router(state);

        let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("Failed to bind to port {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!("listening on {}", self.listener.local_addr()?);
        axum::serve(self.listener, self.router)
            .await
            .context("Received error from running server")?;
        Ok(())
    }
}

/// Every mutating route answers with a redirect to the affected customer.
/// Paths other than `/` match with or without a trailing slash.
pub fn router<CR: CustomerRepository, RR: ReservationRepository>(
    state: AppState<CR, RR>,
) -> Router {
    let router = Router::new().route("/", get(customers::list_customers::<CR, RR>));
    let routes = [
        ("/add/", post(customers::create_customer::<CR, RR>)),
        ("/customers/top", get(customers::top_customers::<CR, RR>)),
        ("/{id}/", get(customers::customer_detail::<CR, RR>)),
        (
            "/{id}/edit/",
            get(customers::edit_customer_form::<CR, RR>).post(customers::update_customer::<CR, RR>),
        ),
        (
            "/{id}/add-reservation/",
            post(reservations::create_reservation::<CR, RR>),
        ),
        (
            "/reservation/{id}",
            get(reservations::edit_reservation_form::<CR, RR>)
                .post(reservations::update_reservation::<CR, RR>),
        ),
    ];

    routes
        .into_iter()
        .fold(router, |router, (path, method_router)| {
            let bare = path.trim_end_matches('/');
            router
                .route(bare, method_router.clone())
                .route(&format!("{bare}/"), method_router)
        })
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
