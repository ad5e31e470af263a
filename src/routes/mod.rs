pub mod api;
pub mod export;
pub mod pages;
pub mod records;

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{Destination, Tourist, Visit};
use crate::store;
use crate::validation::{DestinationInput, TouristInput, VisitInput};

// Shared by the HTML form posts and the JSON API.

pub(crate) async fn create_tourist(db: &SqlitePool, input: TouristInput) -> Result<Tourist, AppError> {
    let new = input.validate()?;
    let tourist = store::insert_tourist(db, &new).await?;
    tracing::info!(tourist_id = tourist.id, "tourist created");
    Ok(tourist)
}

pub(crate) async fn create_destination(
    db: &SqlitePool,
    input: DestinationInput,
) -> Result<Destination, AppError> {
    let new = input.validate()?;
    let destination = store::insert_destination(db, &new).await?;
    tracing::info!(destination_id = destination.id, "destination created");
    Ok(destination)
}

pub(crate) async fn create_visit(db: &SqlitePool, input: VisitInput) -> Result<Visit, AppError> {
    let new = input.validate()?;
    let visit = store::insert_visit(db, &new).await?;
    tracing::info!(
        visit_id = visit.id,
        tourist_id = visit.tourist_id,
        destination_id = visit.destination_id,
        "visit recorded"
    );
    Ok(visit)
}
