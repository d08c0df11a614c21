use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

use super::connection::{DbPool, get_connection};
use super::models::DbStoreRating;
use crate::errors::{RankingError, RankingResult};
use crate::rating::store::{PairUpdate, RatingStore};
use crate::rating::types::{Rating, StoreId, UserId};

pub fn find_rating(conn: &Connection, user_id: i64, store_id: i64) -> Result<Option<DbStoreRating>> {
    let sql = "SELECT user_id, store_id, rating, comparisons, updated_at FROM store_ratings WHERE user_id = ?1 AND store_id = ?2";

    conn.query_row(sql, params![user_id, store_id], parse_rating_row)
        .optional()
        .context("Failed to query rating")
}

pub fn upsert_rating(conn: &Connection, rating: &Rating, updated_at: NaiveDateTime) -> Result<()> {
    let sql = "INSERT INTO store_ratings (user_id, store_id, rating, comparisons, updated_at) VALUES (?1, ?2, ?3, ?4, ?5) \
               ON CONFLICT(user_id, store_id) DO UPDATE SET rating = excluded.rating, comparisons = excluded.comparisons, updated_at = excluded.updated_at";

    conn.execute(
        sql,
        params![rating.user_id, rating.store_id, rating.value, rating.comparisons, updated_at],
    )
    .context("Failed to upsert rating")
    .map(|_| ())
}

pub fn list_for_user(conn: &Connection, user_id: i64) -> Result<Vec<DbStoreRating>> {
    let sql = "SELECT user_id, store_id, rating, comparisons, updated_at FROM store_ratings WHERE user_id = ?1";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![user_id], parse_rating_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list ratings for user")?;

    Ok(rows)
}

fn parse_rating_row(row: &rusqlite::Row) -> rusqlite::Result<DbStoreRating> {
    Ok(DbStoreRating {
        user_id: row.get(0)?,
        store_id: row.get(1)?,
        rating: row.get(2)?,
        comparisons: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

/// Rating store backed by the `store_ratings` table.
///
/// Pair updates run in `BEGIN IMMEDIATE` transactions: SQLite admits one
/// writer at a time, so read-modify-write cycles on the same key can never
/// interleave.
#[derive(Clone)]
pub struct SqliteRatingStore {
    pool: DbPool,
}

impl SqliteRatingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(&self) -> RankingResult<super::DbConn> {
        get_connection(&self.pool).map_err(RankingError::unavailable)
    }
}

impl RatingStore for SqliteRatingStore {
    fn get(&self, user_id: UserId, store_id: StoreId) -> RankingResult<Option<Rating>> {
        let conn = self.connection()?;
        let row = find_rating(&conn, user_id, store_id).map_err(RankingError::storage)?;
        Ok(row.map(Rating::from))
    }

    fn upsert(&self, rating: &Rating) -> RankingResult<()> {
        let conn = self.connection()?;
        upsert_rating(&conn, rating, Utc::now().naive_utc()).map_err(RankingError::storage)
    }

    fn list(&self, user_id: UserId) -> RankingResult<Vec<Rating>> {
        let conn = self.connection()?;
        let rows = list_for_user(&conn, user_id).map_err(RankingError::storage)?;
        Ok(rows.into_iter().map(Rating::from).collect())
    }

    fn update_pair(
        &self,
        user_id: UserId,
        first: StoreId,
        second: StoreId,
        update: &mut PairUpdate<'_>,
    ) -> RankingResult<(Rating, Rating)> {
        if first == second {
            return Err(RankingError::InvalidComparison { store_id: first });
        }

        let mut conn = self.connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current_first = find_rating(&tx, user_id, first).map_err(RankingError::storage)?;
        let current_second = find_rating(&tx, user_id, second).map_err(RankingError::storage)?;
        let (new_first, new_second) = update(
            current_first.map(Rating::from),
            current_second.map(Rating::from),
        );

        let now = Utc::now().naive_utc();
        upsert_rating(&tx, &new_first, now).map_err(RankingError::storage)?;
        upsert_rating(&tx, &new_second, now).map_err(RankingError::storage)?;
        tx.commit()?;

        Ok((new_first, new_second))
    }
}
