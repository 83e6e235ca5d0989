//! # Terminal Session
//!
//! Everything one terminal needs at run time: its configuration, the
//! database pool and the controller wired to a fresh model.
//!
//! ```text
//! KioskConfig ──► Database::new ──► StockRepository ──┐
//!                               └─► OrderRepository ──┴─► CustomerModel
//!                                                            │
//!                                                   CustomerController
//! ```

use std::sync::Arc;

use kiosk_db::{Database, DbConfig};
use tracing::info;

use crate::controller::CustomerController;
use crate::error::AppResult;
use crate::model::CustomerModel;
use crate::state::KioskConfig;

/// One terminal's runtime state.
#[derive(Debug)]
pub struct Session {
    config: KioskConfig,
    db: Database,
    controller: CustomerController,
}

impl Session {
    /// Opens the configured database (running migrations) and builds the
    /// model on top of it.
    pub async fn open(config: KioskConfig) -> AppResult<Self> {
        let db_path = config.database_path()?;
        info!(?db_path, "Database path determined");

        let db = Database::new(DbConfig::new(db_path)).await?;
        info!("Database connected and migrations applied");

        Ok(Session::with_database(config, db))
    }

    /// Builds a session around an already open database.
    pub fn with_database(config: KioskConfig, db: Database) -> Self {
        let model = CustomerModel::new(Arc::new(db.stock()), Arc::new(db.orders()));

        Session {
            config,
            db,
            controller: CustomerController::new(model),
        }
    }

    pub fn config(&self) -> &KioskConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn controller(&self) -> &CustomerController {
        &self.controller
    }

    /// Closes the database pool.
    pub async fn close(self) {
        self.db.close().await;
    }
}
