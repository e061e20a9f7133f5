use ::std::net::{Ipv6Addr, SocketAddr};

use ::coinwash_common::{
    config::DatabaseConfig, database::Database, error::Result, machine::FleetConfig,
    tracing::info,
};
use axum::{extract::State, routing::get, Router};
use machine::get_machine_router;
use notification::get_notification_router;
use serde::Deserialize;
use state::AppState;
use tower_http::trace::TraceLayer;

pub mod error;
pub(crate) mod machine;
pub(crate) mod notification;
pub(crate) mod state;

/// Configuration for coinwash server
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    pub database: DatabaseConfig,
    /// Machines created by initialization and seeding
    #[serde(default)]
    pub fleet: FleetConfig,
}

fn default_listen() -> SocketAddr {
    SocketAddr::from((Ipv6Addr::LOCALHOST, 3000))
}

/// This is the only entry for users to get the coinwash server.
/// # Return the router for the server
pub fn get_server<DB>(db: DB, fleet: FleetConfig) -> Router
where
    DB: Database,
{
    let app_state = AppState::new(db, fleet);

    Router::new()
        .route(
            "/",
            get(|_: State<AppState<DB>>| async { "welcome to coinwash" }),
        )
        .nest("/machines", get_machine_router())
        .nest("/notifications", get_notification_router())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Wipe the machine table and create the fleet again.
/// Return the number of machines created.
pub async fn seed_machines<DB: Database>(db: &DB, fleet: &FleetConfig) -> Result<usize> {
    db.remove_all_machines().await?;
    let machines = fleet.machines();
    let count = machines.len();
    db.add_machines(machines).await?;
    info!("Seeded {} machines", count);
    Ok(count)
}
