use shared::{init_tracing, initialize_db, load_config, shutdown_signal};
use station_api::seed::seed_stations;
use station_api::state::AppState;
use station_api::store::{InMemoryStore, PostgresStore};
use station_api::uploads::Uploads;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let config = load_config()?;
    let uploads = Uploads::new(&config.server.uploads_dir);

    let state = match &config.postgres {
        Some(pg_config) => {
            let pool = initialize_db(pg_config, true).await?;
            AppState::new(PostgresStore::new(pool), uploads)
        }
        None => {
            warn!("no postgres configured; using in-memory store, data is lost on shutdown");
            AppState::new(InMemoryStore::new(), uploads)
        }
    };

    if let Some(path) = &config.seed.stations_file {
        let count = seed_stations(state.store.as_ref(), path).await?;
        info!(count, path = %path.display(), "seeded stations");
    }

    let listen_addr = &config.server.listen_addr;
    info!("starting server at {listen_addr}");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    axum::serve(listener, station_api::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
