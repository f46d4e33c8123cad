//! # Rental Ledger
//!
//! The rental lifecycle engine. Everything with a business rule lives here:
//! opening a rental (multi-step validation plus the stock check), returning
//! it (the delay-fee calculation), and deleting it (closed-only).
//!
//! ## Rental Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Rental Lifecycle                                  │
//! │                                                                         │
//! │  1. OPEN                                                                │
//! │     └── open_rental() → validate → customer? → game? → stock?          │
//! │         → insert { rent_date: today, original_price: days × per-day }  │
//! │                                                                         │
//! │  2. RETURN (exactly once)                                               │
//! │     └── return_rental() → closed? conflict : set return_date           │
//! │         and delay_fee = max(elapsed − days_rented, 0) × per-day        │
//! │                                                                         │
//! │  3. DELETE (closed rentals only)                                        │
//! │     └── delete_rental() → open? precondition failure : remove row      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The undated operations stamp the current server date; the `_on` variants
//! take an explicit date for backfills and deterministic tests.

use chrono::{NaiveDate, Utc};

use crate::error::{CoreResult, LedgerError};
use crate::money::Money;
use crate::store::{CustomerStore, GameStore, RentalStore};
use crate::types::{NewRental, Rental, RentalWithNames};
use crate::validation::{validate_days_rented, validate_id};

// =============================================================================
// Fee Calculation
// =============================================================================

/// Computes the delay fee for a return.
///
/// `elapsed_days` is the whole-day calendar difference between rent date and
/// return date (same-day return elapses 0 days). Days beyond the agreed
/// length are charged at the per-day price locked in when the rental was
/// opened, recovered from the price snapshot, so later catalog price
/// changes never leak into the fee.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use gamerack_core::ledger::delay_fee;
/// use gamerack_core::money::Money;
///
/// let rented = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
/// let returned = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
///
/// // 3-day rental at R$15.00/day, returned on day 5: 2 days late.
/// let fee = delay_fee(rented, 3, returned, Money::from_cents(4500));
/// assert_eq!(fee.cents(), 3000);
/// ```
pub fn delay_fee(
    rent_date: NaiveDate,
    days_rented: i64,
    return_date: NaiveDate,
    original_price: Money,
) -> Money {
    let elapsed_days = (return_date - rent_date).num_days();
    let delay_days = elapsed_days - days_rented;

    if delay_days > 0 {
        original_price.per_day_share(days_rented).multiply_days(delay_days)
    } else {
        Money::zero()
    }
}

// =============================================================================
// Rental Ledger
// =============================================================================

/// The rental lifecycle engine over injected stores.
///
/// ## Usage
/// ```rust,ignore
/// let ledger = RentalLedger::new(db.customers(), db.games(), db.rentals());
/// let rental = ledger.open_rental(customer_id, game_id, 3).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RentalLedger<C, G, R> {
    customers: C,
    games: G,
    rentals: R,
}

impl<C, G, R> RentalLedger<C, G, R>
where
    C: CustomerStore,
    G: GameStore,
    R: RentalStore,
{
    /// Creates a ledger over the given stores.
    pub fn new(customers: C, games: G, rentals: R) -> Self {
        RentalLedger {
            customers,
            games,
            rentals,
        }
    }

    /// Opens a rental dated today (server clock, date-only).
    pub async fn open_rental(
        &self,
        customer_id: i64,
        game_id: i64,
        days_rented: i64,
    ) -> CoreResult<Rental> {
        self.open_rental_on(customer_id, game_id, days_rented, today())
            .await
    }

    /// Opens a rental on an explicit date.
    ///
    /// ## Checks, in order
    /// 1. Well-formed ids and a positive day count, before any lookup
    /// 2. Customer exists (looked up before the game; the order is pinned)
    /// 3. Game exists
    /// 4. The game has a free copy: open rentals < stock_total
    ///
    /// On success exactly one rental row is persisted; the customer and
    /// game records are never mutated. The original price is snapshotted as
    /// `days_rented × price_per_day`.
    pub async fn open_rental_on(
        &self,
        customer_id: i64,
        game_id: i64,
        days_rented: i64,
        rent_date: NaiveDate,
    ) -> CoreResult<Rental> {
        validate_id("customerId", customer_id)?;
        validate_id("gameId", game_id)?;
        validate_days_rented(days_rented)?;

        let customer = self
            .customers
            .find_by_id(customer_id)
            .await?
            .ok_or(LedgerError::CustomerNotFound(customer_id))?;

        let game = self
            .games
            .find_by_id(game_id)
            .await?
            .ok_or(LedgerError::GameNotFound(game_id))?;

        let original_price = game.price_per_day().multiply_days(days_rented);
        let new_rental = NewRental {
            customer_id: customer.id,
            game_id: game.id,
            rent_date,
            days_rented,
            original_price_cents: original_price.cents(),
        };

        let id = self
            .rentals
            .insert_if_available(&new_rental, game.stock_total)
            .await?
            .ok_or(LedgerError::StockExhausted {
                game_id: game.id,
                stock_total: game.stock_total,
            })?;

        Ok(Rental {
            id,
            customer_id: new_rental.customer_id,
            game_id: new_rental.game_id,
            rent_date: new_rental.rent_date,
            days_rented: new_rental.days_rented,
            return_date: None,
            original_price_cents: new_rental.original_price_cents,
            delay_fee_cents: None,
        })
    }

    /// Returns a rental as of today (server clock, date-only).
    pub async fn return_rental(&self, rental_id: i64) -> CoreResult<Rental> {
        self.return_rental_on(rental_id, today()).await
    }

    /// Returns a rental on an explicit date, closing it and fixing the
    /// delay fee.
    ///
    /// Fails with [`LedgerError::AlreadyReturned`] when the rental is
    /// already closed; the recorded fee is never overwritten.
    pub async fn return_rental_on(
        &self,
        rental_id: i64,
        return_date: NaiveDate,
    ) -> CoreResult<Rental> {
        validate_id("rentalId", rental_id)?;

        let mut rental = self
            .rentals
            .find_by_id(rental_id)
            .await?
            .ok_or(LedgerError::RentalNotFound(rental_id))?;

        if !rental.is_open() {
            return Err(LedgerError::AlreadyReturned { rental_id });
        }

        let fee = delay_fee(
            rental.rent_date,
            rental.days_rented,
            return_date,
            rental.original_price(),
        );

        self.rentals
            .update_return(rental_id, return_date, fee)
            .await?;

        rental.return_date = Some(return_date);
        rental.delay_fee_cents = Some(fee.cents());
        Ok(rental)
    }

    /// Deletes a closed rental permanently.
    ///
    /// Open rentals are refused with [`LedgerError::RentalStillOpen`]:
    /// in-progress rental history must be closed before it can be dropped.
    /// No cascading effects: customer and game rows are untouched.
    pub async fn delete_rental(&self, rental_id: i64) -> CoreResult<()> {
        validate_id("rentalId", rental_id)?;

        let rental = self
            .rentals
            .find_by_id(rental_id)
            .await?
            .ok_or(LedgerError::RentalNotFound(rental_id))?;

        if rental.is_open() {
            return Err(LedgerError::RentalStillOpen { rental_id });
        }

        self.rentals.delete(rental_id).await
    }

    /// All rentals enriched with customer and game names, ordered by
    /// rental id. No pagination.
    pub async fn list_rentals(&self) -> CoreResult<Vec<RentalWithNames>> {
        self.rentals.list_with_names().await
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// =============================================================================
// Unit Tests (in-memory fake stores)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{Customer, Game, NamedRef};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeCustomers(HashMap<i64, Customer>);

    #[async_trait]
    impl CustomerStore for FakeCustomers {
        async fn find_by_id(&self, id: i64) -> CoreResult<Option<Customer>> {
            Ok(self.0.get(&id).cloned())
        }
    }

    struct FakeGames(HashMap<i64, Game>);

    #[async_trait]
    impl GameStore for FakeGames {
        async fn find_by_id(&self, id: i64) -> CoreResult<Option<Game>> {
            Ok(self.0.get(&id).cloned())
        }
    }

    /// Vec-backed rental store relying on the trait's default
    /// count-then-insert body for `insert_if_available`.
    #[derive(Default)]
    struct FakeRentals {
        rows: Mutex<Vec<Rental>>,
    }

    #[async_trait]
    impl RentalStore for FakeRentals {
        async fn insert(&self, rental: &NewRental) -> CoreResult<i64> {
            let mut rows = self.rows.lock().unwrap();
            let id = rows.len() as i64 + 1;
            rows.push(Rental {
                id,
                customer_id: rental.customer_id,
                game_id: rental.game_id,
                rent_date: rental.rent_date,
                days_rented: rental.days_rented,
                return_date: None,
                original_price_cents: rental.original_price_cents,
                delay_fee_cents: None,
            });
            Ok(id)
        }

        async fn find_by_id(&self, id: i64) -> CoreResult<Option<Rental>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned())
        }

        async fn count_open(&self, game_id: i64) -> CoreResult<i64> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.game_id == game_id && r.is_open())
                .count() as i64)
        }

        async fn update_return(
            &self,
            id: i64,
            return_date: NaiveDate,
            delay_fee: Money,
        ) -> CoreResult<()> {
            let mut rows = self.rows.lock().unwrap();
            let rental = rows
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or(LedgerError::RentalNotFound(id))?;
            rental.return_date = Some(return_date);
            rental.delay_fee_cents = Some(delay_fee.cents());
            Ok(())
        }

        async fn delete(&self, id: i64) -> CoreResult<()> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.id != id);
            if rows.len() == before {
                return Err(LedgerError::RentalNotFound(id));
            }
            Ok(())
        }

        async fn list_with_names(&self) -> CoreResult<Vec<RentalWithNames>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .map(|r| RentalWithNames {
                    rental: r.clone(),
                    customer: NamedRef {
                        id: r.customer_id,
                        name: format!("customer-{}", r.customer_id),
                    },
                    game: NamedRef {
                        id: r.game_id,
                        name: format!("game-{}", r.game_id),
                    },
                })
                .collect())
        }
    }

    fn ledger_with(
        stock_total: i64,
    ) -> RentalLedger<FakeCustomers, FakeGames, FakeRentals> {
        let mut customers = HashMap::new();
        customers.insert(
            1,
            Customer {
                id: 1,
                name: "Joana Lima".to_string(),
                phone: "21998877665".to_string(),
                cpf: "12345678901".to_string(),
            },
        );

        let mut games = HashMap::new();
        games.insert(
            1,
            Game {
                id: 1,
                name: "Catan".to_string(),
                price_per_day_cents: 1500,
                stock_total,
            },
        );

        RentalLedger::new(
            FakeCustomers(customers),
            FakeGames(games),
            FakeRentals::default(),
        )
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[tokio::test]
    async fn open_rejects_non_positive_days_before_any_lookup() {
        let ledger = ledger_with(3);

        // The customer id 999 does not exist; a Validation error (not
        // NotFound) proves the day count is rejected first.
        for bad_days in [0, -1, -30] {
            let err = ledger.open_rental(999, 999, bad_days).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "days = {bad_days}");
        }
    }

    #[tokio::test]
    async fn open_rejects_malformed_ids() {
        let ledger = ledger_with(3);

        let err = ledger.open_rental(0, 1, 3).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = ledger.open_rental(1, -2, 3).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn open_checks_customer_before_game() {
        let ledger = ledger_with(3);

        // Both ids unknown: the customer miss must win.
        let err = ledger.open_rental(42, 43, 3).await.unwrap_err();
        assert!(matches!(err, LedgerError::CustomerNotFound(42)));

        let err = ledger.open_rental(1, 43, 3).await.unwrap_err();
        assert!(matches!(err, LedgerError::GameNotFound(43)));
    }

    #[tokio::test]
    async fn open_snapshots_price_and_dates() {
        let ledger = ledger_with(3);

        let rental = ledger.open_rental_on(1, 1, 3, day(10)).await.unwrap();
        assert_eq!(rental.rent_date, day(10));
        assert_eq!(rental.days_rented, 3);
        assert_eq!(rental.original_price_cents, 4500);
        assert!(rental.is_open());
        assert_eq!(rental.delay_fee_cents, None);
        assert_eq!(rental.due_date(), day(13));
    }

    #[tokio::test]
    async fn open_fails_when_stock_exhausted() {
        let ledger = ledger_with(1);

        ledger.open_rental_on(1, 1, 3, day(10)).await.unwrap();
        let err = ledger.open_rental_on(1, 1, 3, day(10)).await.unwrap_err();

        assert!(matches!(
            err,
            LedgerError::StockExhausted {
                game_id: 1,
                stock_total: 1
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn returning_a_copy_frees_stock() {
        let ledger = ledger_with(1);

        let first = ledger.open_rental_on(1, 1, 3, day(10)).await.unwrap();
        ledger.return_rental_on(first.id, day(11)).await.unwrap();

        // The single copy is back on the shelf.
        assert!(ledger.open_rental_on(1, 1, 3, day(11)).await.is_ok());
    }

    #[tokio::test]
    async fn same_day_return_has_zero_fee() {
        let ledger = ledger_with(3);

        let rental = ledger.open_rental_on(1, 1, 3, day(10)).await.unwrap();
        let returned = ledger.return_rental_on(rental.id, day(10)).await.unwrap();

        assert_eq!(returned.return_date, Some(day(10)));
        assert_eq!(returned.delay_fee_cents, Some(0));
    }

    #[tokio::test]
    async fn early_return_has_zero_fee() {
        let ledger = ledger_with(3);

        let rental = ledger.open_rental_on(1, 1, 3, day(10)).await.unwrap();
        let returned = ledger.return_rental_on(rental.id, day(11)).await.unwrap();

        assert_eq!(returned.delay_fee_cents, Some(0));
    }

    #[tokio::test]
    async fn late_return_charges_per_day_snapshot() {
        let ledger = ledger_with(3);

        // Rented day 10 for 3 days, returned day 15: elapsed 5, delay 2.
        let rental = ledger.open_rental_on(1, 1, 3, day(10)).await.unwrap();
        let returned = ledger.return_rental_on(rental.id, day(15)).await.unwrap();

        assert_eq!(returned.delay_fee_cents, Some(2 * 1500));
        // Everything else is untouched.
        assert_eq!(returned.original_price_cents, 4500);
        assert_eq!(returned.days_rented, 3);
    }

    #[tokio::test]
    async fn double_return_is_a_conflict_and_preserves_fee() {
        let ledger = ledger_with(3);

        let rental = ledger.open_rental_on(1, 1, 3, day(10)).await.unwrap();
        ledger.return_rental_on(rental.id, day(15)).await.unwrap();

        let err = ledger
            .return_rental_on(rental.id, day(20))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyReturned { rental_id } if rental_id == rental.id));
        assert_eq!(err.kind(), ErrorKind::Conflict);

        // A later, longer delay never overwrites the recorded fee.
        let listed = ledger.list_rentals().await.unwrap();
        assert_eq!(listed[0].rental.delay_fee_cents, Some(2 * 1500));
        assert_eq!(listed[0].rental.return_date, Some(day(15)));
    }

    #[tokio::test]
    async fn return_unknown_rental_is_not_found() {
        let ledger = ledger_with(3);

        let err = ledger.return_rental_on(99, day(10)).await.unwrap_err();
        assert!(matches!(err, LedgerError::RentalNotFound(99)));

        let err = ledger.return_rental(-1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn delete_requires_a_closed_rental() {
        let ledger = ledger_with(3);

        let rental = ledger.open_rental_on(1, 1, 3, day(10)).await.unwrap();

        let err = ledger.delete_rental(rental.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::RentalStillOpen { .. }));
        assert_eq!(err.kind(), ErrorKind::FailedPrecondition);

        ledger.return_rental_on(rental.id, day(12)).await.unwrap();
        ledger.delete_rental(rental.id).await.unwrap();

        let err = ledger.return_rental_on(rental.id, day(12)).await.unwrap_err();
        assert!(matches!(err, LedgerError::RentalNotFound(_)));
    }

    #[tokio::test]
    async fn delete_unknown_rental_is_not_found() {
        let ledger = ledger_with(3);

        let err = ledger.delete_rental(7).await.unwrap_err();
        assert!(matches!(err, LedgerError::RentalNotFound(7)));
    }

    #[tokio::test]
    async fn list_is_stable_without_writes() {
        let ledger = ledger_with(3);

        ledger.open_rental_on(1, 1, 3, day(10)).await.unwrap();
        ledger.open_rental_on(1, 1, 2, day(11)).await.unwrap();

        let first = ledger.list_rentals().await.unwrap();
        let second = ledger.list_rentals().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn delay_fee_day_table() {
        let original = Money::from_cents(4500); // 3 days at R$15.00

        // (return day offset, expected fee)
        let cases = [
            (0, 0),    // same day
            (2, 0),    // early
            (3, 0),    // on the due date
            (4, 1500), // one day late
            (5, 3000), // two days late
            (10, 10500),
        ];

        for (offset, expected) in cases {
            let fee = delay_fee(day(10), 3, day(10 + offset), original);
            assert_eq!(fee.cents(), expected, "offset = {offset}");
        }
    }
}
