//! # Seed Data Generator
//!
//! Populates the database with a starter catalog, a handful of customers,
//! and a few open rentals for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p gamerack-db --bin seed
//!
//! # Specify database path
//! cargo run -p gamerack-db --bin seed -- --db ./data/gamerack.db
//! ```

use std::env;

use tracing::info;
use tracing_subscriber::EnvFilter;

use gamerack_core::{NewCustomer, NewGame};
use gamerack_db::{Database, DbConfig};

/// Starter catalog: (name, price per day in cents, copies owned).
const GAMES: &[(&str, i64, i64)] = &[
    ("Catan", 1500, 3),
    ("Azul", 1200, 2),
    ("Carcassonne", 1000, 2),
    ("Ticket to Ride", 1400, 2),
    ("7 Wonders", 1300, 1),
    ("Pandemic", 1600, 2),
    ("Splendor", 900, 3),
    ("Dixit", 800, 1),
];

/// Sample customers: (name, phone, cpf).
const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("Joana Lima", "21998877665", "12345678901"),
    ("Bruno Reis", "11988776655", "98765432100"),
    ("Carla Souza", "3133334444", "45678912300"),
    ("Diego Alves", "51999887766", "32165498700"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut db_path = String::from("./gamerack_dev.db");

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Gamerack Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./gamerack_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(db = %db_path, "Seeding development database");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    if db.games().count().await? > 0 {
        info!("Database already seeded; delete the file to regenerate");
        return Ok(());
    }

    for (name, phone, cpf) in CUSTOMERS {
        let customer = db.customers().insert(&NewCustomer::new(*name, *phone, *cpf)?).await?;
        info!(id = %customer.id, name = %customer.name, "Seeded customer");
    }

    for (name, price_per_day_cents, stock_total) in GAMES {
        let game = db
            .games()
            .insert(&NewGame::new(*name, *price_per_day_cents, *stock_total)?)
            .await?;
        info!(id = %game.id, name = %game.name, stock = %game.stock_total, "Seeded game");
    }

    // A couple of open rentals, created through the ledger so the stock
    // rules apply to the seed data too.
    let ledger = db.ledger();
    let first = ledger.open_rental(1, 1, 3).await?;
    let second = ledger.open_rental(2, 5, 7).await?;
    info!(first = first.id, second = second.id, "Seeded open rentals");

    info!("Seed complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: INFO, with sqlx noise reduced
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gamerack=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
