mod app_state;
mod config;
mod database;
mod models;
mod ranking;
mod resolver;
mod routes;
mod scheduler;
mod seed;
pub mod external;
pub use app_state::AppState;
pub use config::Config;

use crate::routes::make_app;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Config::init()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let port = config.port;
    let app = make_app(config).await?;
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("🚀 Server started successfully on port {}", port);
    axum::serve(listener, app).await?;
    Ok(())
}
