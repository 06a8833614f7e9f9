//! Documentation of a laptop selection criteria weighing service.
//!
//! # General Infrastructure
//! - User walks through a ranking and comparison session on the client, nothing is stored meanwhile
//! - Client sends the whole session in one `POST /api/save-submission`
//! - Server checks the payload, inserts one row into `submissions`, then renders and uploads a PDF report
//! - Database and bucket both live in one Supabase project, reached with the service role key
//!
//!
//!
//! # Request Lifecycle
//!
//! **Goal**: The database row is the canonical record. Everything after it is best effort.
//!
//! - Anything but POST is answered with 405
//! - Missing `ranked_criteria` or `comparisons` is a 400, so is anything failing the structural checks
//! - Failing to insert is a 500 and stops there, no report is rendered
//! - Rendering or uploading the report may fail, the response is still a success but says so
//! - The report is never returned to the caller, neither as bytes nor as a link
//!
//!
//!
//! # Notes
//!
//! ## Duplicate Submits
//! A submit that reached the database but whose response got lost would be retried by the user.
//! The client keeps the same `request_token` for every retry of one session and the column is unique,
//! so the retry is answered as already recorded instead of creating a second row and report.
//!
//! ## Payload Trust
//! The client only ever offers ranks 1-5 and importance 1-9, but the server does not rely on that.
//! Criterion ids, names, rank order and comparison adjacency are all checked before inserting.
//!
//!
//!
//! # Setup
//!
//! Environment.
//! ```sh
//! export SUPABASE_URL=https://<project>.supabase.co
//! export SUPABASE_SERVICE_ROLE_KEY=<service role key>   # or /run/secrets/SUPABASE_SERVICE_ROLE_KEY
//! export RUST_PORT=1111
//! export RUST_LOG=info
//! ```
//!
//! Run the server.
//! ```sh
//! cargo run -p weighing
//! ```
//!
//! Run a session against it.
//! ```sh
//! cargo run -p client -- --server http://localhost:1111
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{any::Any, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::post,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod fake;
pub mod report;
pub mod routes;
pub mod state;
pub mod storage;
pub mod supabase;
pub mod utils;

use config::Config;
use error::AppError;
use routes::{method_not_allowed, save_submission_handler};
use state::AppState;

pub use criteria::model::SAVE_SUBMISSION_PATH;

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(&config)?;

    info!("Starting server...");
    let app = build_router(state);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(
            SAVE_SUBMISSION_PATH,
            post(save_submission_handler).fallback(method_not_allowed),
        )
        .layer(cors)
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!("API Error: {detail}");

    AppError::Unexpected(detail).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            return std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
