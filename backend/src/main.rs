//! Backend entry-point: loads settings, seeds example data when enabled, keeps
//! the POI index fresh in the background, and serves the HTTP API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use poi_backend::domain::ports::PoiStore;
use poi_backend::domain::{PoiCommandService, PoiIndex, PoiIndexRefresher, PoiQueryService};
#[cfg(feature = "example-data")]
use poi_backend::example_data::{ExampleDataSettings, seed_example_data_on_startup};
use poi_backend::inbound::http::health::HealthState;
use poi_backend::inbound::http::state::HttpState;
use poi_backend::outbound::memory::InMemoryPoiStore;

use server::{ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| eyre!("failed to load server settings: {e}"))?;
    let bind_addr = settings
        .bind_addr()
        .wrap_err("POI_BIND_ADDR is not a socket address")?;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let memory_store = InMemoryPoiStore::new(Arc::clone(&clock));
    #[cfg(feature = "example-data")]
    seed_example_data(&memory_store).await?;
    let store: Arc<dyn PoiStore> = Arc::new(memory_store);

    let index = Arc::new(PoiIndex::new(
        Arc::clone(&store),
        clock,
        settings.index_config(),
    ));
    let refresher = PoiIndexRefresher::spawn(Arc::clone(&index));

    let http_state = web::Data::new(HttpState::new(
        Arc::new(PoiCommandService::new(store)),
        Arc::new(PoiQueryService::new(Arc::clone(&index))),
    ));
    let health_state = web::Data::new(HealthState::with_index(index));

    let server = create_server(health_state.clone(), http_state, bind_addr)?;
    info!(%bind_addr, "poi backend listening");
    let outcome = server.await;

    health_state.mark_unhealthy();
    refresher.shutdown().await;
    outcome.wrap_err("http server failed")
}

#[cfg(feature = "example-data")]
async fn seed_example_data(store: &InMemoryPoiStore) -> Result<()> {
    let settings =
        ExampleDataSettings::load_from_iter([std::ffi::OsString::from("poi-backend")])
            .map_err(|e| eyre!("failed to load example data settings: {e}"))?;
    seed_example_data_on_startup(&settings, store)
        .await
        .wrap_err("example data seeding failed")?;
    Ok(())
}
