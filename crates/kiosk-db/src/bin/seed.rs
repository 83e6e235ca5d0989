//! # Seed Data Loader
//!
//! Loads the demo catalogue into a kiosk database.
//!
//! ## Usage
//! ```bash
//! # Seed ./kiosk_dev.db (or $KIOSK_DB_PATH)
//! cargo run -p kiosk-db --bin seed
//!
//! # Specify database path
//! cargo run -p kiosk-db --bin seed -- --db ./data/kiosk.db
//!
//! # Overwrite prices and stock levels in an existing database
//! cargo run -p kiosk-db --bin seed -- --force
//! ```

use std::env;

use kiosk_core::{Money, Product, StockReadWriter};
use kiosk_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// (number, description, picture, price, stock level)
const CATALOGUE: &[(&str, &str, &str, f64, i64)] = &[
    ("0001", "40 inch LED HD TV", "pic0001.jpg", 269.00, 90),
    ("0002", "DAB Radio", "pic0002.jpg", 29.99, 20),
    ("0003", "Toaster", "pic0003.jpg", 19.99, 33),
    ("0004", "Watch", "pic0004.jpg", 29.99, 10),
    ("0005", "Digital Camera", "pic0005.jpg", 89.99, 17),
    ("0006", "MP3 player", "pic0006.jpg", 7.99, 15),
    ("0007", "32Gb USB2 drive", "pic0007.jpg", 6.99, 1),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = env::var("KIOSK_DB_PATH").unwrap_or_else(|_| String::from("./kiosk_dev.db"));
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Kiosk Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kiosk_dev.db)");
                println!("  -f, --force        Reset catalogue entries that already exist");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(path = %db_path, "Seeding kiosk database");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let stock = db.stock();

    let existing = stock.count().await?;
    if existing > 0 && !force {
        warn!(
            existing,
            "Database already has products; skipping (use --force to reset them)"
        );
        return Ok(());
    }

    for (product_no, description, picture, price, level) in CATALOGUE {
        let product = Product::new(
            *product_no,
            *description,
            Money::from_decimal(*price).cents(),
            *level,
        );

        stock.modify_stock(&product).await?;
        stock.set_picture(product_no, picture).await?;
        info!(product_no = %product_no, description = %description, level, "Loaded");
    }

    info!(products = stock.count().await?, "Seed complete");
    db.close().await;

    Ok(())
}
