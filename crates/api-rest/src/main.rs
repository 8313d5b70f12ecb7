//! Casebook REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server over the embedded document store, with
//! OpenAPI/Swagger UI mounted under `/swagger-ui`.

use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use casebook_core::{CoreConfig, Store};

/// Main entry point for the Casebook REST API server
///
/// # Environment Variables
/// - `CASEBOOK_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `CASEBOOK_DB_PATH`: Document store file (default: "casebook.db")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the document store schema cannot be created,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("CASEBOOK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let db_path = std::env::var("CASEBOOK_DB_PATH").unwrap_or_else(|_| "casebook.db".into());

    tracing::info!("-- Starting Casebook REST API on {}", addr);

    let cfg = CoreConfig::new(PathBuf::from(db_path))?;
    let store = Store::new(&cfg);
    store.initialise().await?;

    let app = router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
