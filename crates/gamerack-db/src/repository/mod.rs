//! # Repository Module
//!
//! Database repository implementations for Gamerack.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  RentalLedger (gamerack-core)                                          │
//! │       │                                                                 │
//! │       │  store traits: CustomerStore / GameStore / RentalStore         │
//! │       ▼                                                                 │
//! │  CustomerRepository / GameRepository / RentalRepository                │
//! │       │                                                                 │
//! │       │  SQL (runtime-bound queries, manual row mapping)               │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place per table                              │
//! │  • The ledger tests against in-memory fakes                            │
//! │  • The repositories test against in-memory SQLite                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`customer::CustomerRepository`] - Customer CRUD with cpf uniqueness
//! - [`game::GameRepository`] - Game catalog with name uniqueness
//! - [`rental::RentalRepository`] - Rental rows, open counts, joined listing

pub mod customer;
pub mod game;
pub mod rental;
