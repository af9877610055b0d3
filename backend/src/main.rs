//! Back-office entry-point: loads settings, wires the store screen over
//! in-memory adapters, and verifies the command bus before serving a
//! first listing.

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backoffice::TraceId;
use backoffice::domain::grid::FilterParams;
use backoffice::domain::store::{Store, StoreAdmin, register_store_handlers, store_commands};
use backoffice::domain::{CommandBus, EntityId};
use backoffice::outbound::memory::{InMemoryFilterPreferences, InMemoryStoreRepository};
use backoffice::settings::AdminSettings;
use ortho_config::OrthoConfig;

fn demo_store(raw: u64, name: &str, city: &str, active: bool) -> Option<Store> {
    Some(Store {
        id: EntityId::new(raw)?,
        name: name.to_owned(),
        address: format!("{raw} Ocean Drive"),
        city: city.to_owned(),
        postcode: "33139".to_owned(),
        country: "United States".to_owned(),
        phone: String::new(),
        email: String::new(),
        active,
    })
}

fn demo_stores() -> Vec<Store> {
    [
        demo_store(1, "Dade County", "Miami", true),
        demo_store(2, "E Fort Lauderdale", "Fort Lauderdale", true),
        demo_store(3, "Pembroke Pines", "Pembroke Pines", false),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Application bootstrap.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AdminSettings::load().wrap_err("failed to load settings")?;
    let defaults = settings.grid_defaults()?;
    let messages = settings.message_table()?;

    let stores = Arc::new(InMemoryStoreRepository::new(demo_stores()));
    let bus = Arc::new(
        register_store_handlers(CommandBus::builder(), Arc::clone(&stores))?.build(),
    );
    bus.verify(&store_commands())?;
    info!(commands = ?bus.registered_commands(), "command bus ready");

    let admin = StoreAdmin::new(
        bus,
        stores,
        Arc::new(InMemoryFilterPreferences::new()),
        defaults,
        messages,
    );
    let employee = EntityId::new(1).ok_or_else(|| eyre!("employee id must be non-zero"))?;

    let trace_id = TraceId::generate();
    let page = TraceId::scope(trace_id, admin.index(employee, FilterParams::default())).await?;
    info!(
        %trace_id,
        total = page.total_count(),
        pages = page.page_count(),
        "store listing served"
    );
    Ok(())
}
