use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tourist {
    pub id: i64,
    pub name: String,
    pub nationality: String,
    pub age: Option<i64>,
    pub created_at: NaiveDateTime,
}

/// A validated tourist ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTourist {
    pub name: String,
    pub nationality: String,
    pub age: Option<i64>,
}
