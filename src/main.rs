mod config;
mod constants;
mod error;
mod event;
mod handler;
mod handlers;
mod messages;
mod server;

use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::constants::DEFAULT_LOG_FILTER;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = server::run(Config::from_env()).await {
        tracing::error!("Server exited: {:?}", err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
