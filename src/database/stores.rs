use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::connection::{DbPool, get_connection};
use super::models::{DbItem, DbStore, DbUser};
use crate::domain::catalog::StoreCatalog;
use crate::domain::models::{StoreCategory, StoreInfo};
use crate::errors::{RankingError, RankingResult};
use crate::rating::types::UserId;

pub fn ensure_user(conn: &Connection, username: &str) -> Result<DbUser> {
    if let Some(existing) = find_user_by_name(conn, username)? {
        return Ok(existing);
    }

    let sql = "INSERT INTO users (username) VALUES (?1) RETURNING id, username, created_at";
    conn.query_row(sql, params![username], parse_user_row)
        .context("Failed to insert new user")
}

fn find_user_by_name(conn: &Connection, username: &str) -> Result<Option<DbUser>> {
    let sql = "SELECT id, username, created_at FROM users WHERE username = ?1";

    conn.query_row(sql, params![username], parse_user_row)
        .optional()
        .context("Failed to query user by username")
}

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<DbUser> {
    Ok(DbUser {
        id: row.get(0)?,
        username: row.get(1)?,
        created_at: row.get(2)?,
    })
}

/// Stores are unique by name; an existing store keeps its first category.
pub fn upsert_store(conn: &Connection, name: &str, category: StoreCategory) -> Result<DbStore> {
    if let Some(existing) = find_store_by_name(conn, name)? {
        return Ok(existing);
    }

    let sql = "INSERT INTO stores (name, store_type) VALUES (?1, ?2) RETURNING id, name, store_type";
    conn.query_row(sql, params![name, category.as_str()], parse_store_row)
        .context("Failed to insert new store")
}

fn find_store_by_name(conn: &Connection, name: &str) -> Result<Option<DbStore>> {
    let sql = "SELECT id, name, store_type FROM stores WHERE name = ?1";

    conn.query_row(sql, params![name], parse_store_row)
        .optional()
        .context("Failed to query store by name")
}

fn parse_store_row(row: &rusqlite::Row) -> rusqlite::Result<DbStore> {
    Ok(DbStore {
        id: row.get(0)?,
        name: row.get(1)?,
        store_type: row.get(2)?,
    })
}

pub fn delete_store(conn: &Connection, store_id: i64) -> Result<()> {
    conn.execute("DELETE FROM stores WHERE id = ?1", params![store_id])
        .context("Failed to delete store")
        .map(|_| ())
}

pub fn insert_item(conn: &Connection, user_id: i64, store_id: i64, notes: Option<&str>) -> Result<DbItem> {
    let sql = "INSERT INTO items (user_id, store_id, notes) VALUES (?1, ?2, ?3) RETURNING id, user_id, store_id, notes, created_at";

    conn.query_row(sql, params![user_id, store_id, notes], |row| {
        Ok(DbItem {
            id: row.get(0)?,
            user_id: row.get(1)?,
            store_id: row.get(2)?,
            notes: row.get(3)?,
            created_at: row.get(4)?,
        })
    })
    .context("Failed to insert item")
}

/// Distinct stores the user has logged at least one item against.
pub fn list_for_user(conn: &Connection, user_id: i64) -> Result<Vec<DbStore>> {
    let sql = "SELECT DISTINCT s.id, s.name, s.store_type FROM stores s JOIN items i ON i.store_id = s.id WHERE i.user_id = ?1 ORDER BY s.id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![user_id], parse_store_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list stores for user")?;

    Ok(rows)
}

fn to_store_info(store: DbStore) -> Result<StoreInfo> {
    let category = store
        .store_type
        .parse::<StoreCategory>()
        .with_context(|| format!("Store {} has an invalid type", store.id))?;
    Ok(StoreInfo::new(store.id, store.name, category))
}

/// Catalog backed by the wardrobe `stores` and `items` tables.
#[derive(Clone)]
pub struct SqliteStoreCatalog {
    pool: DbPool,
}

impl SqliteStoreCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl StoreCatalog for SqliteStoreCatalog {
    fn stores_for_user(&self, user_id: UserId) -> RankingResult<Vec<StoreInfo>> {
        let conn = get_connection(&self.pool).map_err(RankingError::unavailable)?;
        list_for_user(&conn, user_id)
            .and_then(|rows| rows.into_iter().map(to_store_info).collect())
            .map_err(RankingError::storage)
    }
}
