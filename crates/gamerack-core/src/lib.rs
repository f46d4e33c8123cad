//! # gamerack-core: Pure Business Logic for Gamerack
//!
//! This crate is the **heart** of the rental shop backend. It contains the
//! rental lifecycle rules as pure logic with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Gamerack Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              ★ gamerack-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │ validation│  │   │
//! │  │   │  Customer │  │   Money   │  │  Rental   │  │   rules   │  │   │
//! │  │   │ Game/Rent │  │  (cents)  │  │  Ledger   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   store traits: CustomerStore / GameStore / RentalStore        │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ implemented by                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  gamerack-db (Database Layer)                   │   │
//! │  │            SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Game, Rental, listing rows)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - The RentalLedger: open, return, delete, list
//! - [`store`] - Capability traits the ledger depends on
//! - [`error`] - Domain error types and kinds
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **No I/O**: persistence is reached only through the injected store
//!    traits, so the ledger runs unchanged against SQLite or test fakes
//! 2. **Integer Money**: all monetary values are cent counts (i64); the
//!    delay-fee division is exact by construction
//! 3. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use gamerack_core::ledger::delay_fee;
//! use gamerack_core::Money;
//!
//! let rented = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
//! let returned = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
//!
//! // 3-day rental, R$45.00 snapshot, returned 2 days late.
//! let fee = delay_fee(rented, 3, returned, Money::from_cents(4500));
//! assert_eq!(fee.cents(), 3000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use gamerack_core::Money` instead of
// `use gamerack_core::money::Money`

pub use error::{CoreResult, ErrorKind, LedgerError, ValidationError};
pub use ledger::RentalLedger;
pub use money::Money;
pub use store::{CustomerStore, GameStore, RentalStore};
pub use types::*;
