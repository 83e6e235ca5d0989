//! # State Module
//!
//! Run-time state of the customer terminal.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐        ┌──────────────────────────────────────┐  │
//! │  │   KioskConfig    │        │              Session                 │  │
//! │  │                  │ ─────► │  Database (SQLite pool)              │  │
//! │  │  store_name      │        │  CustomerController                  │  │
//! │  │  database_path   │        │    └── Arc<Mutex<CustomerModel>>     │  │
//! │  │  image_dir       │        │                                      │  │
//! │  └──────────────────┘        └──────────────────────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • KioskConfig: read-only after start-up                               │
//! │  • Database: internal connection pool                                  │
//! │  • CustomerModel: one action at a time behind the mutex                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::KioskConfig;
pub use session::Session;
