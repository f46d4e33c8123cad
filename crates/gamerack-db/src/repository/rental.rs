//! # Rental Repository
//!
//! Database operations for rental rows: insert, open-count, return, delete,
//! and the joined listing. This is where the stock check meets the database.
//!
//! ## Atomic Stock Check
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Stock-Checked Insert Strategy                           │
//! │                                                                         │
//! │  ❌ RACY: count, then insert (two statements)                           │
//! │     Two concurrent opens of the last copy can both pass the count.     │
//! │                                                                         │
//! │  ✅ ATOMIC: one conditional INSERT                                      │
//! │     INSERT INTO rentals (...)                                           │
//! │     SELECT ...                                                          │
//! │     WHERE (open count for the game) < stock_total                      │
//! │                                                                         │
//! │  SQLite executes the statement under a single write lock, so the       │
//! │  count and the insert cannot interleave. rows_affected = 0 means       │
//! │  the stock was exhausted.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use gamerack_core::{
    CoreResult, LedgerError, Money, NamedRef, NewRental, Rental, RentalStore, RentalWithNames,
};

/// Repository for rental database operations.
#[derive(Debug, Clone)]
pub struct RentalRepository {
    pool: SqlitePool,
}

impl RentalRepository {
    /// Creates a new RentalRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RentalRepository { pool }
    }

    /// Inserts an open rental unconditionally and returns its id.
    pub async fn insert(&self, rental: &NewRental) -> DbResult<i64> {
        debug!(
            customer_id = %rental.customer_id,
            game_id = %rental.game_id,
            "Inserting rental"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO rentals
                (customer_id, game_id, rent_date, days_rented,
                 return_date, original_price_cents, delay_fee_cents)
            VALUES (?, ?, ?, ?, NULL, ?, NULL)
            "#,
        )
        .bind(rental.customer_id)
        .bind(rental.game_id)
        .bind(rental.rent_date)
        .bind(rental.days_rented)
        .bind(rental.original_price_cents)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts an open rental only while the game has a free copy.
    ///
    /// The open-rental count and the insert run as one statement, so
    /// concurrent calls against the last copy serialize on SQLite's write
    /// lock and exactly one of them wins. Returns `None` when the stock
    /// was exhausted.
    pub async fn insert_if_available(
        &self,
        rental: &NewRental,
        stock_total: i64,
    ) -> DbResult<Option<i64>> {
        debug!(
            game_id = %rental.game_id,
            stock_total = %stock_total,
            "Stock-checked rental insert"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO rentals
                (customer_id, game_id, rent_date, days_rented,
                 return_date, original_price_cents, delay_fee_cents)
            SELECT ?, ?, ?, ?, NULL, ?, NULL
            WHERE (SELECT COUNT(*) FROM rentals
                    WHERE game_id = ? AND return_date IS NULL) < ?
            "#,
        )
        .bind(rental.customer_id)
        .bind(rental.game_id)
        .bind(rental.rent_date)
        .bind(rental.days_rented)
        .bind(rental.original_price_cents)
        .bind(rental.game_id)
        .bind(stock_total)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(result.last_insert_rowid()))
    }

    /// Gets a rental by id.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Rental>> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_id, game_id, rent_date, days_rented,
                   return_date, original_price_cents, delay_fee_cents
            FROM rentals
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_rental(&r)))
    }

    /// Counts open rentals (no return date) for a game. Served by the
    /// partial index on open rows.
    pub async fn count_open(&self, game_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM rentals
            WHERE game_id = ? AND return_date IS NULL
            "#,
        )
        .bind(game_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Records the return date and delay fee on an open rental.
    ///
    /// The `return_date IS NULL` guard makes the write first-return-wins at
    /// the database level as well. Returns whether a row was closed.
    pub async fn mark_returned(
        &self,
        id: i64,
        return_date: NaiveDate,
        delay_fee_cents: i64,
    ) -> DbResult<bool> {
        debug!(id = %id, fee = %delay_fee_cents, "Closing rental");

        let result = sqlx::query(
            r#"
            UPDATE rentals
            SET return_date = ?, delay_fee_cents = ?
            WHERE id = ? AND return_date IS NULL
            "#,
        )
        .bind(return_date)
        .bind(delay_fee_cents)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a rental row. Returns whether a row existed.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id = %id, "Deleting rental");

        let result = sqlx::query("DELETE FROM rentals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All rentals joined with customer and game names, ordered by id.
    pub async fn list_with_names(&self) -> DbResult<Vec<RentalWithNames>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.customer_id, r.game_id, r.rent_date, r.days_rented,
                   r.return_date, r.original_price_cents, r.delay_fee_cents,
                   c.name AS customer_name,
                   g.name AS game_name
            FROM rentals r
            JOIN customers c ON c.id = r.customer_id
            JOIN games g ON g.id = r.game_id
            ORDER BY r.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let rental = row_to_rental(&row);
                RentalWithNames {
                    customer: NamedRef {
                        id: rental.customer_id,
                        name: row.get("customer_name"),
                    },
                    game: NamedRef {
                        id: rental.game_id,
                        name: row.get("game_name"),
                    },
                    rental,
                }
            })
            .collect())
    }
}

fn row_to_rental(row: &SqliteRow) -> Rental {
    Rental {
        id: row.get("id"),
        customer_id: row.get("customer_id"),
        game_id: row.get("game_id"),
        rent_date: row.get("rent_date"),
        days_rented: row.get("days_rented"),
        return_date: row.get("return_date"),
        original_price_cents: row.get("original_price_cents"),
        delay_fee_cents: row.get("delay_fee_cents"),
    }
}

// =============================================================================
// Store Trait Implementation
// =============================================================================

#[async_trait]
impl RentalStore for RentalRepository {
    async fn insert(&self, rental: &NewRental) -> CoreResult<i64> {
        Ok(RentalRepository::insert(self, rental).await?)
    }

    async fn find_by_id(&self, id: i64) -> CoreResult<Option<Rental>> {
        Ok(RentalRepository::find_by_id(self, id).await?)
    }

    async fn count_open(&self, game_id: i64) -> CoreResult<i64> {
        Ok(RentalRepository::count_open(self, game_id).await?)
    }

    /// Overrides the trait's racy count-then-insert default with the
    /// atomic conditional insert.
    async fn insert_if_available(
        &self,
        rental: &NewRental,
        stock_total: i64,
    ) -> CoreResult<Option<i64>> {
        Ok(RentalRepository::insert_if_available(self, rental, stock_total).await?)
    }

    async fn update_return(
        &self,
        id: i64,
        return_date: NaiveDate,
        delay_fee: Money,
    ) -> CoreResult<()> {
        if self.mark_returned(id, return_date, delay_fee.cents()).await? {
            return Ok(());
        }

        // Nothing was closed: either the row is gone or someone returned it
        // between the ledger's check and this write.
        match RentalRepository::find_by_id(self, id).await? {
            Some(_) => Err(LedgerError::AlreadyReturned { rental_id: id }),
            None => Err(LedgerError::RentalNotFound(id)),
        }
    }

    async fn delete(&self, id: i64) -> CoreResult<()> {
        if RentalRepository::delete(self, id).await? {
            return Ok(());
        }
        Err(LedgerError::RentalNotFound(id))
    }

    async fn list_with_names(&self) -> CoreResult<Vec<RentalWithNames>> {
        Ok(RentalRepository::list_with_names(self).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use gamerack_core::{ErrorKind, NewCustomer, NewGame};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// One customer, one game, ready to rent.
    async fn seed_shop(db: &Database, stock_total: i64) -> (i64, i64) {
        let customer = db
            .customers()
            .insert(&NewCustomer::new("Joana Lima", "21998877665", "12345678901").unwrap())
            .await
            .unwrap();
        let game = db
            .games()
            .insert(&NewGame::new("Catan", 1500, stock_total).unwrap())
            .await
            .unwrap();
        (customer.id, game.id)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[tokio::test]
    async fn test_insert_find_and_count_open() {
        let db = test_db().await;
        let (customer_id, game_id) = seed_shop(&db, 3).await;
        let repo = db.rentals();

        let new_rental = NewRental {
            customer_id,
            game_id,
            rent_date: day(10),
            days_rented: 3,
            original_price_cents: 4500,
        };

        let id = repo.insert(&new_rental).await.unwrap();
        assert!(id > 0);
        assert_eq!(repo.count_open(game_id).await.unwrap(), 1);

        let rental = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(rental.rent_date, day(10));
        assert_eq!(rental.days_rented, 3);
        assert!(rental.is_open());
        assert_eq!(rental.original_price_cents, 4500);

        repo.mark_returned(id, day(12), 0).await.unwrap();
        assert_eq!(repo.count_open(game_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_conditional_insert_stops_at_stock_total() {
        let db = test_db().await;
        let (customer_id, game_id) = seed_shop(&db, 2).await;
        let repo = db.rentals();

        let new_rental = NewRental {
            customer_id,
            game_id,
            rent_date: day(10),
            days_rented: 3,
            original_price_cents: 4500,
        };

        assert!(repo
            .insert_if_available(&new_rental, 2)
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .insert_if_available(&new_rental, 2)
            .await
            .unwrap()
            .is_some());
        // Both copies are out.
        assert!(repo
            .insert_if_available(&new_rental, 2)
            .await
            .unwrap()
            .is_none());
        assert_eq!(repo.count_open(game_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_mark_returned_is_first_return_wins() {
        let db = test_db().await;
        let (customer_id, game_id) = seed_shop(&db, 3).await;
        let repo = db.rentals();

        let id = repo
            .insert(&NewRental {
                customer_id,
                game_id,
                rent_date: day(10),
                days_rented: 3,
                original_price_cents: 4500,
            })
            .await
            .unwrap();

        assert!(repo.mark_returned(id, day(15), 3000).await.unwrap());
        // A second close touches nothing.
        assert!(!repo.mark_returned(id, day(20), 9000).await.unwrap());

        let rental = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(rental.return_date, Some(day(15)));
        assert_eq!(rental.delay_fee_cents, Some(3000));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let (customer_id, game_id) = seed_shop(&db, 3).await;
        let repo = db.rentals();

        let id = repo
            .insert(&NewRental {
                customer_id,
                game_id,
                rent_date: day(10),
                days_rented: 3,
                original_price_cents: 4500,
            })
            .await
            .unwrap();

        assert!(RentalRepository::delete(&repo, id).await.unwrap());
        assert!(repo.find_by_id(id).await.unwrap().is_none());
        assert!(!RentalRepository::delete(&repo, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_with_names_joins_current_catalog() {
        let db = test_db().await;
        let (customer_id, game_id) = seed_shop(&db, 3).await;
        let repo = db.rentals();

        repo.insert(&NewRental {
            customer_id,
            game_id,
            rent_date: day(10),
            days_rented: 3,
            original_price_cents: 4500,
        })
        .await
        .unwrap();

        let listed = repo.list_with_names().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].customer.id, customer_id);
        assert_eq!(listed[0].customer.name, "Joana Lima");
        assert_eq!(listed[0].game.id, game_id);
        assert_eq!(listed[0].game.name, "Catan");

        // Idempotent without intervening writes.
        let again = repo.list_with_names().await.unwrap();
        assert_eq!(listed, again);
    }

    /// End-to-end flow through the wired ledger against real SQLite.
    #[tokio::test]
    async fn test_ledger_flow_over_sqlite() {
        let db = test_db().await;
        let (customer_id, game_id) = seed_shop(&db, 1).await;
        let ledger = db.ledger();

        let rental = ledger
            .open_rental_on(customer_id, game_id, 3, day(10))
            .await
            .unwrap();
        assert_eq!(rental.original_price_cents, 4500);

        // The single copy is out.
        let err = ledger
            .open_rental_on(customer_id, game_id, 3, day(10))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        // Deleting while open is refused.
        let err = ledger.delete_rental(rental.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::RentalStillOpen { .. }));

        // Two days late on a 3-day rental.
        let returned = ledger.return_rental_on(rental.id, day(15)).await.unwrap();
        assert_eq!(returned.delay_fee_cents, Some(3000));

        // Second return conflicts.
        let err = ledger.return_rental_on(rental.id, day(16)).await.unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyReturned { .. }));

        ledger.delete_rental(rental.id).await.unwrap();
        assert!(db.rentals().find_by_id(rental.id).await.unwrap().is_none());
    }

    /// N concurrent opens of the last copy: exactly one wins. Uses a
    /// file-backed pool so the tasks really run on separate connections.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_opens_respect_stock() {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("gamerack.db")).max_connections(8);
        let db = Database::new(config).await.unwrap();

        let (customer_id, game_id) = seed_shop(&db, 1).await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                db.ledger()
                    .open_rental_on(customer_id, game_id, 3, day(10))
                    .await
            }));
        }

        let mut ok = 0;
        let mut exhausted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(LedgerError::StockExhausted { .. }) => exhausted += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(exhausted, 7);
        assert_eq!(db.rentals().count_open(game_id).await.unwrap(), 1);
    }
}
