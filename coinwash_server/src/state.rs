//! Shared state between handlers.

use ::std::sync::Arc;

use ::coinwash_common::{database::Database, machine::FleetConfig};

pub(crate) struct AppState<DB: Database> {
    db: Arc<DB>,
    fleet: Arc<FleetConfig>,
}

// derive(Clone) would require `DB: Clone`
impl<DB: Database> Clone for AppState<DB> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            fleet: Arc::clone(&self.fleet),
        }
    }
}

impl<DB: Database> AppState<DB> {
    pub(crate) fn new(db: DB, fleet: FleetConfig) -> Self {
        Self {
            db: Arc::new(db),
            fleet: Arc::new(fleet),
        }
    }

    pub(crate) fn get_db(&self) -> &DB {
        &self.db
    }

    pub(crate) fn get_fleet(&self) -> &FleetConfig {
        &self.fleet
    }
}
