use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Visit {
    pub id: i64,
    pub tourist_id: i64,
    pub destination_id: i64,
    pub visit_date: NaiveDateTime,
    pub rating: Option<i64>,
}

/// A validated visit. References are checked against the store on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVisit {
    pub tourist_id: i64,
    pub destination_id: i64,
    pub visit_date: Option<NaiveDateTime>,
    pub rating: Option<i64>,
}
