use catalog_admin::{
    api::{AppState, create_router},
    config::{database, seed, server::ServerConfig},
    core::seed::seed_if_empty,
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed an empty catalog from the seed file, if there is one
    let seed_path = seed::seed_path();
    if seed_path.exists() {
        let document = seed::load_seed(&seed_path)
            .inspect_err(|e| error!("Failed to load seed file: {}", e))?;
        seed_if_empty(&db, &document).await?;
    } else {
        warn!("Seed file {} not found, starting without seed data", seed_path.display());
    }

    // 5. Serve the HTTP API
    let server = ServerConfig::from_env()?;
    let listener = tokio::net::TcpListener::bind(server.listen_addr).await?;
    info!("Listening on {}", server.listen_addr);
    axum::serve(listener, create_router(AppState::new(db))).await?;

    Ok(())
}
