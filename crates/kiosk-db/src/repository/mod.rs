//! # Repository Module
//!
//! Data access for the terminal's tables.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CustomerModel                                                         │
//! │       │  (only sees kiosk-core traits)                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────┐  ┌──────────────────┐                            │
//! │  │ StockRepository  │  │ OrderRepository  │                            │
//! │  │ StockReadWriter  │  │ OrderProcessor   │                            │
//! │  └────────┬─────────┘  └────────┬─────────┘                            │
//! │           └──────────┬──────────┘                                      │
//! │                      ▼                                                  │
//! │                  SqlitePool                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every statement binds its inputs; no user text is ever spliced into SQL.

pub mod order;
pub mod stock;
