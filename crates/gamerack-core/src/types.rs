//! # Domain Types
//!
//! Core domain types used throughout Gamerack.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │      Game       │   │     Rental      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  name           │   │  name (unique)  │   │  customer_id    │       │
//! │  │  phone          │   │  price_per_day  │   │  game_id        │       │
//! │  │  cpf (unique)   │   │  stock_total    │   │  rent_date      │       │
//! │  └─────────────────┘   └─────────────────┘   │  days_rented    │       │
//! │                                              │  return_date?   │       │
//! │  Ids are store-assigned positive rowids.     │  original_price │       │
//! │  A rental is OPEN while return_date is       │  delay_fee?     │       │
//! │  absent, CLOSED once it is set.              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! JSON wire names are camelCase (`customerId`, `rentDate`, ...), matching
//! the shop's established API shape. Money fields are cent counts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    validate_cpf, validate_customer_name, validate_game_name, validate_phone,
    validate_price_per_day, validate_stock_total,
};

// =============================================================================
// Customer
// =============================================================================

/// A registered customer of the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Store-assigned positive id.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Contact phone, 10 or 11 digits.
    pub phone: String,

    /// National id, exactly 11 digits. Unique across customers.
    pub cpf: String,
}

/// Validated input for creating or updating a customer.
///
/// Construction runs the field validators, so a `NewCustomer` that exists
/// is well-formed by definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub cpf: String,
}

impl NewCustomer {
    /// Validates the fields and builds the record.
    ///
    /// ## Example
    /// ```rust
    /// use gamerack_core::types::NewCustomer;
    ///
    /// let ok = NewCustomer::new("Joana Lima", "21998877665", "12345678901");
    /// assert!(ok.is_ok());
    ///
    /// let bad_cpf = NewCustomer::new("Joana Lima", "21998877665", "123");
    /// assert!(bad_cpf.is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        cpf: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let phone = phone.into();
        let cpf = cpf.into();

        validate_customer_name(&name)?;
        validate_phone(&phone)?;
        validate_cpf(&cpf)?;

        Ok(NewCustomer {
            name: name.trim().to_string(),
            phone,
            cpf,
        })
    }
}

// =============================================================================
// Game
// =============================================================================

/// A game in the rental catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Store-assigned positive id.
    pub id: i64,

    /// Catalog name. Unique across games.
    pub name: String,

    /// Rental price per day, in cents.
    pub price_per_day_cents: i64,

    /// Total copies the shop owns. Availability is derived:
    /// `stock_total - count_open`, never stored.
    pub stock_total: i64,
}

impl Game {
    /// Returns the per-day price as Money.
    #[inline]
    pub fn price_per_day(&self) -> Money {
        Money::from_cents(self.price_per_day_cents)
    }

    /// Checks whether another copy can go out, given the current number of
    /// open rentals for this game.
    #[inline]
    pub fn has_stock_for_another(&self, open_rentals: i64) -> bool {
        open_rentals < self.stock_total
    }
}

/// Validated input for adding a game to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub name: String,
    pub price_per_day_cents: i64,
    pub stock_total: i64,
}

impl NewGame {
    /// Validates the fields and builds the record.
    pub fn new(
        name: impl Into<String>,
        price_per_day_cents: i64,
        stock_total: i64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();

        validate_game_name(&name)?;
        validate_price_per_day(price_per_day_cents)?;
        validate_stock_total(stock_total)?;

        Ok(NewGame {
            name: name.trim().to_string(),
            price_per_day_cents,
            stock_total,
        })
    }
}

// =============================================================================
// Rental
// =============================================================================

/// A rental transaction.
///
/// Created open (no return date); closed exactly once by a return, which
/// also fixes the delay fee; deletable only once closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: i64,
    pub customer_id: i64,
    pub game_id: i64,

    /// Calendar date the rental was opened (server clock, date-only).
    pub rent_date: NaiveDate,

    /// Agreed rental length in days. Immutable.
    pub days_rented: i64,

    /// Absent while the rental is open.
    pub return_date: Option<NaiveDate>,

    /// Price snapshot at creation: `days_rented × price_per_day` at the
    /// time. Never recomputed from later catalog changes.
    pub original_price_cents: i64,

    /// Set exactly once, on return. Zero for on-time returns.
    pub delay_fee_cents: Option<i64>,
}

impl Rental {
    /// A rental is open iff no return date is recorded.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }

    /// The date the game is due back: `rent_date + days_rented`.
    pub fn due_date(&self) -> NaiveDate {
        self.rent_date + chrono::Duration::days(self.days_rented)
    }

    /// Returns the original price as Money.
    #[inline]
    pub fn original_price(&self) -> Money {
        Money::from_cents(self.original_price_cents)
    }

    /// The per-day price locked in when the rental was opened, recovered
    /// from the snapshot so later catalog price changes have no effect.
    #[inline]
    pub fn per_day_price(&self) -> Money {
        self.original_price().per_day_share(self.days_rented)
    }

    /// Returns the delay fee as Money, if the rental has been returned.
    #[inline]
    pub fn delay_fee(&self) -> Option<Money> {
        self.delay_fee_cents.map(Money::from_cents)
    }
}

/// Input for persisting a new rental row. Built by the ledger after
/// validation and the stock check; stores assign the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRental {
    pub customer_id: i64,
    pub game_id: i64,
    pub rent_date: NaiveDate,
    pub days_rented: i64,
    pub original_price_cents: i64,
}

// =============================================================================
// Joined Listing
// =============================================================================

/// Bare id + name pair used when embedding the owning customer and the
/// rented game in a listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

/// A rental enriched with the owning customer's and rented game's names,
/// as produced by the stores' join against current catalog state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalWithNames {
    #[serde(flatten)]
    pub rental: Rental,
    pub customer: NamedRef,
    pub game: NamedRef,
}

// =============================================================================
// Unit Tests
// =============================================================================
