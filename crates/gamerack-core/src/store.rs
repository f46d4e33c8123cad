//! # Store Traits
//!
//! Capability interfaces the [`RentalLedger`] depends on. The ledger never
//! touches a database directly: it receives these as injected dependencies,
//! so it can run against SQLite in production and in-memory fakes in tests.
//!
//! `gamerack-db` implements all three over SQLite repositories.
//!
//! [`RentalLedger`]: crate::ledger::RentalLedger

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{Customer, Game, NewRental, Rental, RentalWithNames};

/// Read-only customer lookup.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> CoreResult<Option<Customer>>;
}

/// Read-only game lookup.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> CoreResult<Option<Game>>;
}

/// Rental row persistence.
#[async_trait]
pub trait RentalStore: Send + Sync {
    /// Persists a new open rental and returns its store-assigned id.
    async fn insert(&self, rental: &NewRental) -> CoreResult<i64>;

    async fn find_by_id(&self, id: i64) -> CoreResult<Option<Rental>>;

    /// Number of rentals for the game with no return date recorded.
    async fn count_open(&self, game_id: i64) -> CoreResult<i64>;

    /// Inserts the rental only if the game still has a free copy, returning
    /// `None` when stock is exhausted.
    ///
    /// The default body is a plain count-then-insert: two concurrent calls
    /// against the last copy can both pass the count and both insert.
    /// Backends that can make the check-and-insert atomic (a serializable
    /// transaction, a conditional insert) should override this method; the
    /// SQLite store does.
    async fn insert_if_available(
        &self,
        rental: &NewRental,
        stock_total: i64,
    ) -> CoreResult<Option<i64>> {
        if self.count_open(rental.game_id).await? >= stock_total {
            return Ok(None);
        }
        Ok(Some(self.insert(rental).await?))
    }

    /// Records the return date and delay fee on an open rental. The fee is
    /// written exactly once; closed rentals are rejected upstream.
    async fn update_return(
        &self,
        id: i64,
        return_date: NaiveDate,
        delay_fee: Money,
    ) -> CoreResult<()>;

    /// Removes a rental row permanently.
    async fn delete(&self, id: i64) -> CoreResult<()>;

    /// All rentals joined with the owning customer's and rented game's
    /// names, ordered by rental id.
    async fn list_with_names(&self) -> CoreResult<Vec<RentalWithNames>>;
}
