//! # Kiosk Customer Terminal Entry Point
//!
//! ## Usage
//! ```bash
//! # Default config (platform config dir) and database (platform data dir)
//! cargo run -p kiosk-customer
//!
//! # Explicit config file
//! cargo run -p kiosk-customer -- --config ./customer.toml
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let mut config_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => config_path = args.next().map(PathBuf::from),
            "--help" | "-h" => {
                println!("Usage: kiosk-customer [--config <PATH>]");
                return ExitCode::SUCCESS;
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
    }

    // The actual setup is in lib.rs for testability
    match kiosk_customer_lib::run(config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("kiosk-customer: {}", e);
            ExitCode::FAILURE
        }
    }
}
