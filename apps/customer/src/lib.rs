//! # Kiosk Customer Library
//!
//! The customer self-service terminal: model, controller and a
//! line-oriented front end on stdin/stdout.
//!
//! ## Module Organization
//! ```text
//! kiosk_customer_lib/
//! ├── lib.rs          ◄─── You are here (start-up & input loop)
//! ├── model.rs        ◄─── CustomerModel state machine
//! ├── controller.rs   ◄─── CustomerController pass-through
//! ├── events.rs       ◄─── CustomerEvent (tagged status messages)
//! ├── commands.rs     ◄─── Command parsing and execution
//! ├── state/
//! │   ├── config.rs   ◄─── KioskConfig (TOML + KIOSK_* env)
//! │   └── session.rs  ◄─── Database + controller for one terminal
//! └── error.rs        ◄─── AppError for start-up failures
//! ```

pub mod commands;
pub mod controller;
pub mod error;
pub mod events;
pub mod model;
pub mod state;

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use commands::{execute, Command, Outcome};
use error::AppResult;
use state::{KioskConfig, Session};

/// Runs the terminal until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ──── tracing-subscriber, RUST_LOG, to stderr    │
/// │  2. Load Configuration ──── customer.toml, then KIOSK_* variables      │
/// │  3. Connect to Database ─── SQLite (WAL), pending migrations           │
/// │  4. Build Session ───────── model + controller, event logger           │
/// │  5. Read Commands ───────── one per line until quit / EOF              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config_path: Option<PathBuf>) -> AppResult<()> {
    init_tracing();

    info!("Starting kiosk customer terminal");

    let config = KioskConfig::load(config_path)?;
    let session = Session::open(config).await?;

    spawn_event_logger(&session).await;

    println!("{}", session.config().store_name);
    println!("{}", session.controller().ask_for_update().await);
    println!("{}", commands::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e.message);
                continue;
            }
        };

        match execute(&session, command).await {
            Outcome::Reply(text) => println!("{}", text),
            Outcome::Quit => break,
        }
    }

    info!("Terminal closing");
    session.close().await;
    Ok(())
}

/// Logs every model event, the way a second view would observe them.
async fn spawn_event_logger(session: &Session) {
    let mut events = session.controller().subscribe().await;

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) if event.is_error() => warn!(%event, "Customer action failed"),
                Ok(event) => debug!(?event, "Customer event"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event logger lagging"),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kiosk_db=trace` - Show trace for the database crate only
/// - Default: INFO, DEBUG for the kiosk crates
///
/// Logs go to stderr so they never mix with the terminal's replies.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kiosk=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
