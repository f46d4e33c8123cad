//! # Game Repository
//!
//! Database operations for the game catalog. Single-table CRUD with one
//! business rule: catalog names are unique.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use gamerack_core::{CoreResult, Game, GameStore, NewGame};

/// Repository for game database operations.
#[derive(Debug, Clone)]
pub struct GameRepository {
    pool: SqlitePool,
}

impl GameRepository {
    /// Creates a new GameRepository.
    pub fn new(pool: SqlitePool) -> Self {
        GameRepository { pool }
    }

    /// Inserts a new game.
    ///
    /// ## Returns
    /// * `Ok(Game)` - Inserted game with its assigned id
    /// * `Err(DbError::UniqueViolation)` - name already in the catalog
    pub async fn insert(&self, game: &NewGame) -> DbResult<Game> {
        debug!(name = %game.name, "Inserting game");

        if self.find_by_name(&game.name).await?.is_some() {
            return Err(DbError::duplicate("name", &game.name));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO games (name, price_per_day_cents, stock_total)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&game.name)
        .bind(game.price_per_day_cents)
        .bind(game.stock_total)
        .execute(&self.pool)
        .await?;

        Ok(Game {
            id: result.last_insert_rowid(),
            name: game.name.clone(),
            price_per_day_cents: game.price_per_day_cents,
            stock_total: game.stock_total,
        })
    }

    /// Gets a game by id.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Game>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price_per_day_cents, stock_total
            FROM games
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_game))
    }

    /// Gets a game by its catalog name.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Game>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price_per_day_cents, stock_total
            FROM games
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_game))
    }

    /// Lists all games ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Game>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price_per_day_cents, stock_total
            FROM games
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_game).collect())
    }

    /// Counts games (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM games")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn row_to_game(row: SqliteRow) -> Game {
    Game {
        id: row.get("id"),
        name: row.get("name"),
        price_per_day_cents: row.get("price_per_day_cents"),
        stock_total: row.get("stock_total"),
    }
}

// =============================================================================
// Store Trait Implementation
// =============================================================================

#[async_trait]
impl GameStore for GameRepository {
    async fn find_by_id(&self, id: i64) -> CoreResult<Option<Game>> {
        Ok(GameRepository::find_by_id(self, id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
