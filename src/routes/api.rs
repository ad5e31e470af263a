use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::analytics::Dashboard;
use crate::error::AppError;
use crate::models::{Destination, Tourist, Visit};
use crate::store::{self, Snapshot};
use crate::validation::{DestinationInput, TouristInput, VisitInput};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tourists", get(get_tourists).post(post_tourist))
        .route("/api/destinations", get(get_destinations).post(post_destination))
        .route("/api/visits", get(get_visits).post(post_visit))
        .route("/api/dashboard", get(get_dashboard))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

async fn get_tourists(State(state): State<AppState>) -> Result<Json<Vec<Tourist>>, AppError> {
    Ok(Json(store::list_tourists(&state.db).await?))
}

async fn post_tourist(
    State(state): State<AppState>,
    payload: Result<Json<TouristInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let tourist = super::create_tourist(&state.db, json_body(payload)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Tourist added successfully", "tourist": tourist })),
    ))
}

async fn get_destinations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Destination>>, AppError> {
    Ok(Json(store::list_destinations(&state.db).await?))
}

async fn post_destination(
    State(state): State<AppState>,
    payload: Result<Json<DestinationInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let destination = super::create_destination(&state.db, json_body(payload)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Destination added successfully", "destination": destination })),
    ))
}

async fn get_visits(State(state): State<AppState>) -> Result<Json<Vec<Visit>>, AppError> {
    Ok(Json(store::list_visits(&state.db).await?))
}

async fn post_visit(
    State(state): State<AppState>,
    payload: Result<Json<VisitInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let visit = super::create_visit(&state.db, json_body(payload)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Visit recorded successfully", "visit": visit })),
    ))
}

async fn get_dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, AppError> {
    let snapshot = Snapshot::load(&state.db).await?;
    Ok(Json(Dashboard::build(&snapshot)))
}
