//! # gamerack-db: Database Layer for Gamerack
//!
//! This crate provides database access for the rental shop backend.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gamerack Data Flow                               │
//! │                                                                         │
//! │  RentalLedger (gamerack-core)                                          │
//! │       │  via CustomerStore / GameStore / RentalStore traits            │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     gamerack-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ customer/game │    │  (embedded)  │  │   │
//! │  │   │               │    │ /rental       │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ all SQL here  │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL mode, foreign keys on)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (customer, game, rental)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gamerack_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/gamerack.db")).await?;
//!
//! // Plain repository access
//! let games = db.games().list().await?;
//!
//! // Or the fully wired rental ledger
//! let rental = db.ledger().open_rental(customer_id, game_id, 3).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::game::GameRepository;
pub use repository::rental::RentalRepository;
