use lunchly::config::Config;
use lunchly::database::{DefaultCustomerRepository, DefaultReservationRepository, establish_pool};
use lunchly::http::{AppState, HttpServer, HttpServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    if config.uses_default_secret_key() {
        tracing::warn!("SECRET_KEY is not set, using the development secret");
    }

    let pool = establish_pool(config.database_url()).await?;
    tracing::info!(database_url = config.database_url(), "connected to database");

    let state = AppState::new(
        DefaultCustomerRepository::new(pool.clone()),
        DefaultReservationRepository::new(pool),
    );
    let server_config = HttpServerConfig::new(config.server_port());
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
