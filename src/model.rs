use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted book row. `id` and `created_at` are assigned by the database
/// on insert and never change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// Request body for create and update. Fields are optional on purpose: a
/// missing title or author is bound as NULL and rejected by the column
/// constraints, not by this layer.
#[derive(Debug, Deserialize)]
pub struct BookPayload {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
}
