use chrono::NaiveDateTime;

use crate::rating::types::Rating;

#[derive(Debug, Clone)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct DbStore {
    pub id: i64,
    pub name: String,
    pub store_type: String,
}

#[derive(Debug, Clone)]
pub struct DbItem {
    pub id: i64,
    pub user_id: i64,
    pub store_id: i64,
    pub notes: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct DbStoreRating {
    pub user_id: i64,
    pub store_id: i64,
    pub rating: f64,
    pub comparisons: u32,
    pub updated_at: NaiveDateTime,
}

impl From<DbStoreRating> for Rating {
    fn from(row: DbStoreRating) -> Self {
        Rating {
            user_id: row.user_id,
            store_id: row.store_id,
            value: row.rating,
            comparisons: row.comparisons,
        }
    }
}
