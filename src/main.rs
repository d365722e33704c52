use std::path::Path;

use axum::handler::HandlerWithoutStateExt;
use axum::routing::{get, post};
use axum::Router;
use backend::{BackendClient, BackendError};
use config::{Config, ConfigError};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_cookies::CookieManagerLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod backend;
mod config;
mod cookie;
mod middleware;
mod services;

const DEFAULT_LOG_FILTER: &str = "meal_planner_web=debug,tower_http=debug";

#[derive(Clone)]
struct MealPlannerState {
    backend: BackendClient,
}

#[derive(Error, Debug)]
enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Error building the backend client: {0}")]
    Backend(#[from] BackendError),
    #[error("Error binding listener: {0}")]
    Io(#[from] std::io::Error),
}

fn app(state: MealPlannerState, static_dir: &Path) -> Router {
    let api = Router::new()
        .route("/auth/login", post(services::login))
        .route("/auth/register", post(services::register))
        .route("/auth/logout", post(services::logout))
        .route("/auth/me", get(services::me))
        .route("/nutrition/calories", post(services::calories))
        .route("/meal-plans/sample", get(services::sample_plan))
        .fallback(services::proxy);

    Router::new()
        .nest("/api", api)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::create_span)
                .on_failure(()),
        )
        .layer(CookieManagerLayer::new())
        .fallback_service(
            ServeDir::new(static_dir).not_found_service(middleware::handle_error.into_service()),
        )
        .with_state(state)
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;
    tracing::debug!("Loaded configuration: {:?}", config);

    let state = MealPlannerState {
        backend: BackendClient::from_config(&config)?,
    };

    let listener = TcpListener::bind(config.bind_address).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state, &config.static_dir)).await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
