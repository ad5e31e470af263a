use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::AppError;
use crate::models::{Destination, NewDestination, NewTourist, NewVisit, Tourist, Visit};

pub async fn insert_tourist(db: &SqlitePool, new: &NewTourist) -> Result<Tourist, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO tourists (name, nationality, age, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&new.name)
    .bind(&new.nationality)
    .bind(new.age)
    .bind(Utc::now().naive_utc())
    .fetch_one(db)
    .await
}

pub async fn insert_destination(
    db: &SqlitePool,
    new: &NewDestination,
) -> Result<Destination, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO destinations (name, city, country, price)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&new.name)
    .bind(&new.city)
    .bind(&new.country)
    .bind(new.price)
    .fetch_one(db)
    .await
}

/// Insert a visit after checking that both references resolve.
///
/// Fails with [`AppError::MissingReference`] rather than leaving a dangling row.
pub async fn insert_visit(db: &SqlitePool, new: &NewVisit) -> Result<Visit, AppError> {
    let mut tx = db.begin().await?;

    let tourist: Option<(i64,)> = sqlx::query_as("SELECT id FROM tourists WHERE id = ?")
        .bind(new.tourist_id)
        .fetch_optional(&mut *tx)
        .await?;
    if tourist.is_none() {
        return Err(AppError::MissingReference(format!(
            "Tourist {} does not exist",
            new.tourist_id
        )));
    }

    let destination: Option<(i64,)> = sqlx::query_as("SELECT id FROM destinations WHERE id = ?")
        .bind(new.destination_id)
        .fetch_optional(&mut *tx)
        .await?;
    if destination.is_none() {
        return Err(AppError::MissingReference(format!(
            "Destination {} does not exist",
            new.destination_id
        )));
    }

    let visit_date = new.visit_date.unwrap_or_else(|| Utc::now().naive_utc());

    let visit: Visit = sqlx::query_as(
        r#"
        INSERT INTO visits (tourist_id, destination_id, visit_date, rating)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(new.tourist_id)
    .bind(new.destination_id)
    .bind(visit_date)
    .bind(new.rating)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(visit)
}

pub async fn list_tourists<'e, E: SqliteExecutor<'e>>(ex: E) -> Result<Vec<Tourist>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tourists ORDER BY id")
        .fetch_all(ex)
        .await
}

pub async fn list_destinations<'e, E: SqliteExecutor<'e>>(
    ex: E,
) -> Result<Vec<Destination>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM destinations ORDER BY id")
        .fetch_all(ex)
        .await
}

pub async fn list_visits<'e, E: SqliteExecutor<'e>>(ex: E) -> Result<Vec<Visit>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM visits ORDER BY id")
        .fetch_all(ex)
        .await
}

/// All three tables read inside one transaction.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub tourists: Vec<Tourist>,
    pub destinations: Vec<Destination>,
    pub visits: Vec<Visit>,
}

impl Snapshot {
    pub async fn load(db: &SqlitePool) -> Result<Self, sqlx::Error> {
        let mut tx = db.begin().await?;
        let tourists = list_tourists(&mut *tx).await?;
        let destinations = list_destinations(&mut *tx).await?;
        let visits = list_visits(&mut *tx).await?;
        tx.commit().await?;

        Ok(Self {
            tourists,
            destinations,
            visits,
        })
    }
}
