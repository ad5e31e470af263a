use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Destination {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub country: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDestination {
    pub name: String,
    pub city: String,
    pub country: String,
    pub price: f64,
}
